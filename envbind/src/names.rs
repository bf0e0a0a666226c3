//! Environment variable name derivation
//!
//! Every leaf field is looked up under an ordered list of candidate names,
//! most specific first. The rules, in order:
//!
//! 1. A field with an alternate name (`#[env(alt = "...")]`) is looked up under
//!    the upper-cased alternate as is, then under `<PREFIX>_<ALT>`. Inside
//!    repeated-struct elements, which are addressed by position, only
//!    `<PREFIX>_<ALT>` is tried.
//! 2. Otherwise the field is looked up under `<PREFIX>_<NAME>`, where `NAME` is
//!    the upper-cased field name, split into words first when
//!    `#[env(split_words)]` is set.
//! 3. With an empty prefix the name is used alone.
//! 4. When the unprefixed fallback is enabled, top-level fields without an
//!    alternate are also looked up under the bare `NAME`.

use crate::schema::FieldDescriptor;

/// Where in the configuration tree a field sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    /// Declared on the root struct (or a struct flattened into it)
    Root,
    /// Inside a nested struct
    Nested,
    /// Inside an element of a repeated struct
    Element,
}

impl Scope {
    /// Scope of the fields of a nested struct declared in this scope
    pub fn descend(self) -> Scope {
        match self {
            Scope::Element => Scope::Element,
            _ => Scope::Nested,
        }
    }

    /// Whether alternate names are looked up without the prefix in this scope
    pub fn allows_absolute(self) -> bool {
        self != Scope::Element
    }
}

/// Split a compound identifier into upper-cased, underscore-separated words.
///
/// A word is a capital followed by non-capitals, a run of non-capitals, or a run
/// of capitals. A run of capitals directly followed by non-capitals gives up its
/// last capital to the next word, so acronyms stay together. Existing
/// underscores separate words; digits never start a new word.
///
/// ```rust
/// assert_eq!(envbind::split_words("MultiWordACRWithAutoSplit"), "MULTI_WORD_ACR_WITH_AUTO_SPLIT");
/// assert_eq!(envbind::split_words("max_idle_conns"), "MAX_IDLE_CONNS");
/// ```
pub fn split_words(name: &str) -> String {
    let mut words: Vec<String> = Vec::new();

    for piece in name.split('_').filter(|piece| !piece.is_empty()) {
        let chars: Vec<char> = piece.chars().collect();
        let mut i = 0;

        while i < chars.len() {
            let start = i;

            if !is_capital(chars[i]) {
                while i < chars.len() && !is_capital(chars[i]) {
                    i += 1;
                }
                words.push(chars[start..i].iter().collect());
                continue;
            }

            while i < chars.len() && is_capital(chars[i]) {
                i += 1;
            }
            let tail = i;
            while i < chars.len() && !is_capital(chars[i]) {
                i += 1;
            }

            if i > tail && tail - start > 1 {
                words.push(chars[start..tail - 1].iter().collect());
                words.push(chars[tail - 1..i].iter().collect());
            } else {
                words.push(chars[start..i].iter().collect());
            }
        }
    }

    words.join("_").to_uppercase()
}

fn is_capital(c: char) -> bool {
    c.is_ascii_uppercase()
}

/// Upper-cased name of a field, without any prefix
pub fn derive_name(field: &FieldDescriptor) -> String {
    if field.split_words {
        split_words(field.name)
    } else {
        field.name.to_uppercase()
    }
}

/// Name a field contributes after the prefix: its alternate, or its derived name
pub fn segment(field: &FieldDescriptor) -> String {
    match field.alt {
        Some(alt) => alt.to_uppercase(),
        None => derive_name(field),
    }
}

/// Join a prefix and a name with an underscore, unless the prefix is empty
pub fn join(prefix: &str, name: &str) -> String {
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{prefix}_{name}")
    }
}

/// Candidate variable names for a leaf field, most specific first
///
/// The list is never empty, and its first entry is the name reported when a
/// required field is missing.
pub fn candidates(
    prefix: &str,
    field: &FieldDescriptor,
    scope: Scope,
    unprefixed_fallback: bool,
) -> Vec<String> {
    if let Some(alt) = field.alt {
        let alt = alt.to_uppercase();
        return if prefix.is_empty() {
            vec![alt]
        } else if scope.allows_absolute() {
            let prefixed = join(prefix, &alt);
            vec![alt, prefixed]
        } else {
            vec![join(prefix, &alt)]
        };
    }

    let name = derive_name(field);
    if unprefixed_fallback && scope == Scope::Root && !prefix.is_empty() {
        vec![join(prefix, &name), name]
    } else {
        vec![join(prefix, &name)]
    }
}
