//! Immutable snapshot of environment variables

use std::collections::BTreeMap;
use std::ops::Bound;

/// A read-only snapshot of environment variables.
///
/// Keys are normalized to upper case, both when the snapshot is built and on
/// lookup, so `app_port` and `APP_PORT` address the same variable. The name as
/// it was originally spelled is kept for reporting unused variables.
///
/// Iteration is ordered by normalized key, which keeps every binding pass
/// deterministic regardless of how the process environment is laid out.
#[derive(Debug, Clone, Default)]
pub struct Environment {
    vars: BTreeMap<String, Entry>,
}

#[derive(Debug, Clone)]
struct Entry {
    name: String,
    value: String,
}

impl Environment {
    /// Create an empty snapshot
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot the current process environment
    ///
    /// Variables whose name or value is not valid Unicode are skipped.
    pub fn from_process() -> Self {
        std::env::vars_os()
            .filter_map(|(name, value)| Some((name.into_string().ok()?, value.into_string().ok()?)))
            .collect()
    }

    /// Add a variable, replacing any previous value for the same normalized key
    pub fn set(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        self.vars.insert(
            name.to_uppercase(),
            Entry {
                name,
                value: value.into(),
            },
        );
    }

    /// Builder-style variant of [`Environment::set`]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set(name, value);
        self
    }

    /// Look up a variable by name
    pub fn get(&self, name: &str) -> Option<&str> {
        match self.vars.get(name) {
            Some(entry) => Some(entry.value.as_str()),
            None => self
                .vars
                .get(&name.to_uppercase())
                .map(|entry| entry.value.as_str()),
        }
    }

    /// Whether a variable is set (an empty value still counts as set)
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Normalized keys starting with `prefix`, in order
    pub fn keys_with_prefix<'a>(&'a self, prefix: &'a str) -> impl Iterator<Item = &'a str> + 'a {
        self.vars
            .range::<str, _>((Bound::Included(prefix), Bound::Unbounded))
            .map(|(key, _)| key.as_str())
            .take_while(move |key| key.starts_with(prefix))
    }

    /// Iterate `(normalized key, original name)` pairs in order
    pub fn names(&self) -> impl Iterator<Item = (&str, &str)> {
        self.vars
            .iter()
            .map(|(key, entry)| (key.as_str(), entry.name.as_str()))
    }

    /// Number of variables in the snapshot
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the snapshot holds no variables
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for Environment
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut env = Self::new();
        for (name, value) in iter {
            env.set(name, value);
        }
        env
    }
}
