//! Attribute parsing for `#[env(...)]` annotations.
//!
//! This module extracts and validates binding metadata from struct fields
//! during macro expansion.

use syn::{Field, Lit};

/// Parsed `#[env(...)]` attributes from a struct field.
#[derive(Debug, Default)]
pub struct FieldAttrs {
    /// Alternate environment variable name.
    ///
    /// Read without the prefix, and used as the prefix segment of nested and
    /// repeated structs.
    pub alt: Option<String>,

    /// Default literal, converted like an environment value.
    pub default: Option<String>,

    /// Fail when neither a variable nor a default is available.
    pub required: bool,

    /// Exclude the field from binding.
    pub ignored: bool,

    /// Split a camel-case field name into underscore-separated words.
    pub split_words: bool,

    /// Bind a nested struct's fields as if declared on the parent.
    pub flatten: bool,
}

impl FieldAttrs {
    /// Extract and validate `#[env(...)]` attributes from a struct field.
    ///
    /// Attributes other than `env` are left for other macros.
    pub fn from_field(field: &Field) -> syn::Result<Self> {
        let mut attrs = Self::default();

        for attr in &field.attrs {
            if !attr.path().is_ident("env") {
                continue;
            }

            attr.parse_nested_meta(|meta| {
                // alt = "NAME"
                if meta.path.is_ident("alt") {
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    match lit {
                        Lit::Str(s) if !s.value().is_empty() => attrs.alt = Some(s.value()),
                        _ => return Err(meta.error("expected a non-empty string: alt = \"NAME\"")),
                    }
                    return Ok(());
                }

                // default = "value" (numbers and booleans are taken literally)
                if meta.path.is_ident("default") {
                    if !meta.input.peek(syn::Token![=]) {
                        return Err(meta.error("expected a literal: default = \"value\""));
                    }
                    let value = meta.value()?;
                    let lit: Lit = value.parse()?;
                    let literal = match lit {
                        Lit::Str(s) => s.value(),
                        Lit::Int(i) => i.base10_digits().to_string(),
                        Lit::Float(f) => f.base10_digits().to_string(),
                        Lit::Bool(b) => b.value.to_string(),
                        _ => return Err(meta.error("default must be a string, number or boolean literal")),
                    };
                    attrs.default = Some(literal);
                    return Ok(());
                }

                if meta.path.is_ident("required") {
                    attrs.required = true;
                    return Ok(());
                }

                if meta.path.is_ident("ignored") {
                    attrs.ignored = true;
                    return Ok(());
                }

                if meta.path.is_ident("split_words") {
                    attrs.split_words = true;
                    return Ok(());
                }

                if meta.path.is_ident("flatten") {
                    attrs.flatten = true;
                    return Ok(());
                }

                Err(meta.error("unsupported env attribute"))
            })?;
        }

        attrs.validate(field)?;
        Ok(attrs)
    }

    fn validate(&self, field: &Field) -> syn::Result<()> {
        if self.flatten && (self.default.is_some() || self.required) {
            return Err(syn::Error::new_spanned(
                field,
                "flatten cannot be combined with default or required",
            ));
        }

        if self.ignored && (self.default.is_some() || self.required) {
            return Err(syn::Error::new_spanned(
                field,
                "ignored fields cannot have default or required",
            ));
        }

        Ok(())
    }
}
