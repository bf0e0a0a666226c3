//! Structure walker and binder
//!
//! A [`Binder`] drives one binding pass over a struct: it asks the struct to
//! [`visit`](Bindable::visit) its fields, and every field routes back into the
//! [`Walker`] according to its shape. The walker owns the pass state: the
//! current prefix and scope, and the keys consumed so far.

use std::collections::{BTreeSet, HashSet};

use crate::convert;
use crate::env::Environment;
use crate::error::{BoxError, EnvError};
use crate::names::{self, Scope};
use crate::schema::{Bindable, FieldDescriptor, Kind};

/// Binds a snapshot of environment variables into configuration structs.
///
/// ```rust
/// use envbind::{Binder, EnvBind, Environment};
///
/// #[derive(Debug, Default, EnvBind)]
/// struct Config {
///     debug: bool,
///     port: u16,
///     #[env(required)]
///     required_var: String,
/// }
///
/// let env = Environment::new()
///     .with("PREFIX_DEBUG", "true")
///     .with("PREFIX_PORT", "8080")
///     .with("PREFIX_REQUIRED_VAR", "foo");
///
/// let mut config = Config::default();
/// let binding = Binder::new(&env).prefix("prefix").bind(&mut config).unwrap();
///
/// assert!(config.debug);
/// assert_eq!(config.port, 8080);
/// assert_eq!(config.required_var, "foo");
/// assert_eq!(binding.consumed().count(), 3);
/// ```
#[derive(Debug, Clone)]
pub struct Binder<'e> {
    env: &'e Environment,
    prefix: String,
    unprefixed_fallback: bool,
}

impl<'e> Binder<'e> {
    /// Create a binder over `env` with an empty prefix
    pub fn new(env: &'e Environment) -> Self {
        Self {
            env,
            prefix: String::new(),
            unprefixed_fallback: false,
        }
    }

    /// Set the root prefix; it is upper-cased
    pub fn prefix(mut self, prefix: impl AsRef<str>) -> Self {
        self.prefix = prefix.as_ref().to_uppercase();
        self
    }

    /// Also look top-level fields up under their bare name
    ///
    /// Only applies with a non-empty prefix, to fields without an alternate
    /// name. The prefixed name is still tried first.
    pub fn unprefixed_fallback(mut self, enabled: bool) -> Self {
        self.unprefixed_fallback = enabled;
        self
    }

    /// Bind the environment into `target`
    ///
    /// Fields without a matching variable or default keep their current value.
    /// Index groups of every repeated field are checked before any field is
    /// assigned, so a structural error leaves `target` untouched. On any other
    /// error, fields visited before the failing one may already have been
    /// assigned.
    ///
    /// # Errors
    ///
    /// - [`EnvError::InvalidSpecification`] if `T` is not a struct
    /// - a structural error for malformed repeated-struct indices
    /// - [`EnvError::Parse`] if a value cannot be converted
    /// - [`EnvError::Missing`] if a required variable is not set
    pub fn bind<T: Bindable>(&self, target: &mut T) -> Result<Binding, EnvError> {
        if T::KIND != Kind::Struct || T::OPTIONAL {
            return Err(EnvError::InvalidSpecification);
        }

        check_indices(self.env, T::fields(), &self.prefix, Scope::Root)?;

        let mut walker = Walker {
            env: self.env,
            prefix: self.prefix.clone(),
            scope: Scope::Root,
            unprefixed_fallback: self.unprefixed_fallback,
            consumed: BTreeSet::new(),
        };
        target.visit(&mut walker)?;

        tracing::debug!(
            prefix = %self.prefix,
            consumed = walker.consumed.len(),
            "bound configuration from environment"
        );

        Ok(Binding {
            consumed: walker.consumed,
        })
    }

    /// Variables under the prefix that a pass over `target` does not consume
    ///
    /// The pass runs on a clone, so `target` is left as it is. Errors are the
    /// same as for [`Binder::bind`]. With an empty prefix every unconsumed
    /// variable of the snapshot is reported. Names are returned as spelled in
    /// the environment, sorted.
    pub fn unused<T: Bindable + Clone>(&self, target: &T) -> Result<Vec<String>, EnvError> {
        let mut scratch = target.clone();
        let binding = self.bind(&mut scratch)?;

        let namespace = if self.prefix.is_empty() {
            String::new()
        } else {
            format!("{}_", self.prefix)
        };

        Ok(self
            .env
            .names()
            .filter(|(key, _)| key.starts_with(&namespace) && !binding.is_consumed(key))
            .map(|(_, name)| name.to_string())
            .collect())
    }
}

/// Outcome of a successful binding pass.
#[derive(Debug, Clone, Default)]
pub struct Binding {
    consumed: BTreeSet<String>,
}

impl Binding {
    /// Keys whose value was assigned to a field, sorted
    pub fn consumed(&self) -> impl Iterator<Item = &str> {
        self.consumed.iter().map(String::as_str)
    }

    /// Whether `key` was assigned to a field
    pub fn is_consumed(&self, key: &str) -> bool {
        self.consumed.contains(key)
    }
}

/// State of one binding pass, handed to every [`Bindable`] on the way down.
#[derive(Debug)]
pub struct Walker<'e> {
    env: &'e Environment,
    prefix: String,
    scope: Scope,
    unprefixed_fallback: bool,
    consumed: BTreeSet<String>,
}

impl<'e> Walker<'e> {
    /// Bind one declared field
    ///
    /// This is the entry point generated code calls for every field.
    pub fn field<T: Bindable>(
        &mut self,
        field: &FieldDescriptor,
        value: &mut T,
    ) -> Result<bool, EnvError> {
        if field.ignored {
            return Ok(false);
        }
        if field.flatten && field.alt.is_none() {
            return value.visit(self);
        }
        value.bind(field, self)
    }

    /// Bind a nested struct under an extended prefix
    pub fn nested<T: Bindable>(
        &mut self,
        field: &FieldDescriptor,
        value: &mut T,
    ) -> Result<bool, EnvError> {
        let prefix = names::join(&self.prefix, &names::segment(field));
        let scope = self.scope.descend();
        self.descend(prefix, scope, |walker| value.visit(walker))
    }

    /// Bind a value converted from a single variable
    pub fn leaf<T: Bindable>(
        &mut self,
        field: &FieldDescriptor,
        value: &mut T,
    ) -> Result<bool, EnvError> {
        self.assign_with::<T>(field, |raw| convert::convert(value, raw))
    }

    /// Bind a comma-separated list
    pub fn list<T: Bindable + Default>(
        &mut self,
        field: &FieldDescriptor,
        items: &mut Vec<T>,
    ) -> Result<bool, EnvError> {
        self.assign_with::<Vec<T>>(field, |raw| convert::convert_list(items, raw))
    }

    /// Bind the raw bytes of a variable
    pub fn bytes(&mut self, field: &FieldDescriptor, items: &mut Vec<u8>) -> Result<bool, EnvError> {
        self.assign_with::<Vec<u8>>(field, |raw| {
            *items = raw.as_bytes().to_vec();
            Ok(())
        })
    }

    /// Bind a list of structs addressed as `<PREFIX>_<INDEX>_<FIELD>`
    ///
    /// The list is replaced only when variables exist for it. Variables under
    /// the alternate name are used only when none exist under the prefixed
    /// name.
    pub fn repeated<T: Bindable + Default>(
        &mut self,
        field: &FieldDescriptor,
        items: &mut Vec<T>,
    ) -> Result<bool, EnvError> {
        let (root, count) = index_group(self.env, &self.prefix, field, self.scope)?;
        if count == 0 {
            return Ok(false);
        }

        tracing::debug!(field = field.name, prefix = %root, count, "binding repeated field");

        let mut fresh = Vec::with_capacity(count);
        for index in 0..count {
            let mut element = T::default();
            self.descend(format!("{root}_{index}"), Scope::Element, |walker| {
                element.visit_present(walker)
            })?;
            fresh.push(element);
        }
        *items = fresh;

        Ok(true)
    }

    /// Look the field up, fall back to its default, and hand the raw value to
    /// `assign`
    fn assign_with<T: ?Sized>(
        &mut self,
        field: &FieldDescriptor,
        assign: impl FnOnce(&str) -> Result<(), BoxError>,
    ) -> Result<bool, EnvError> {
        let env = self.env;
        let candidates =
            names::candidates(&self.prefix, field, self.scope, self.unprefixed_fallback);
        let matched = candidates
            .iter()
            .find_map(|key| env.get(key).map(|value| (key, value)));

        let raw = match matched {
            Some((key, value)) => {
                tracing::trace!(field = field.name, key = %key, "found in environment");
                self.consumed.insert(key.clone());
                value
            }
            None => match field.default {
                Some(default) => {
                    tracing::trace!(field = field.name, default, "using default");
                    default
                }
                None if field.required => return Err(EnvError::missing(&candidates[0])),
                None => return Ok(false),
            },
        };

        assign(raw)
            .map_err(|source| EnvError::parse_error::<T>(&candidates[0], field.name, raw, source))?;
        Ok(true)
    }

    /// Run `f` with a different prefix and scope, restoring both afterwards
    fn descend<R>(
        &mut self,
        prefix: String,
        scope: Scope,
        f: impl FnOnce(&mut Self) -> R,
    ) -> R {
        let saved_prefix = std::mem::replace(&mut self.prefix, prefix);
        let saved_scope = std::mem::replace(&mut self.scope, scope);
        let result = f(self);
        self.prefix = saved_prefix;
        self.scope = saved_scope;
        result
    }
}

/// Check the index group of every repeated field reachable from `fields`
fn check_indices(
    env: &Environment,
    fields: &[FieldDescriptor],
    prefix: &str,
    scope: Scope,
) -> Result<(), EnvError> {
    for field in fields.iter().filter(|field| !field.ignored) {
        match field.kind {
            Kind::Struct if field.flatten && field.alt.is_none() => {
                check_indices(env, (field.fields)(), prefix, scope)?;
            }
            Kind::Struct => {
                let nested = names::join(prefix, &names::segment(field));
                check_indices(env, (field.fields)(), &nested, scope.descend())?;
            }
            Kind::Repeated => {
                let (root, count) = index_group(env, prefix, field, scope)?;
                for index in 0..count {
                    let element = format!("{root}_{index}");
                    check_indices(env, (field.fields)(), &element, Scope::Element)?;
                }
            }
            _ => {}
        }
    }
    Ok(())
}

/// Root and element count of a repeated field
///
/// The bare alternate root is scanned only when nothing exists under the
/// prefixed one.
fn index_group(
    env: &Environment,
    prefix: &str,
    field: &FieldDescriptor,
    scope: Scope,
) -> Result<(String, usize), EnvError> {
    let root = names::join(prefix, &names::segment(field));
    let count = index_count(env, &root)?;

    if count == 0 {
        if let Some(alt) = field.alt.filter(|_| scope.allows_absolute()) {
            let alt = alt.to_uppercase();
            if alt != root {
                let count = index_count(env, &alt)?;
                return Ok((alt, count));
            }
        }
    }

    Ok((root, count))
}

/// Number of elements defined under `root`, checking that every key reads
/// `<root>_<digits>_<rest>` and that indices are contiguous from zero
fn index_count(env: &Environment, root: &str) -> Result<usize, EnvError> {
    let prefix = format!("{root}_");
    let mut indices = HashSet::new();

    for key in env.keys_with_prefix(&prefix) {
        let rest = &key[prefix.len()..];
        let digits = rest
            .find(|c: char| !c.is_ascii_digit())
            .map_or(rest, |end| &rest[..end]);

        if digits.is_empty() {
            return Err(match rest.chars().next() {
                Some(found) if found != '_' => EnvError::UnexpectedChar {
                    key: key.to_string(),
                    prefix: prefix.clone(),
                    found,
                },
                _ => EnvError::NoDigits {
                    key: key.to_string(),
                    prefix: prefix.clone(),
                },
            });
        }

        match rest[digits.len()..].chars().next() {
            Some('_') => {}
            Some(found) => {
                return Err(EnvError::UnexpectedChar {
                    key: key.to_string(),
                    prefix: prefix.clone(),
                    found,
                });
            }
            None => {
                return Err(EnvError::NoFieldAfterIndex {
                    key: key.to_string(),
                    prefix: prefix.clone(),
                });
            }
        }

        let index = digits
            .parse::<isize>()
            .map_err(|source| EnvError::InvalidIndex {
                key: key.to_string(),
                source,
            })?;
        indices.insert(index.unsigned_abs());
    }

    let count = indices.len();
    if let Some(index) = (0..count).find(|index| !indices.contains(index)) {
        return Err(EnvError::MissingIndex {
            prefix,
            count,
            index,
        });
    }

    Ok(count)
}
