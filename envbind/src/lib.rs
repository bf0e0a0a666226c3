//! Bind environment variables into strongly-typed, nested configuration structs
//!
//! `envbind` walks a configuration struct, derives the environment variable name
//! of every field from its path, converts the values it finds, applies defaults,
//! enforces required fields and reports variables that nothing consumed.
//!
//! # Features
//!
//! - **Declarative**: automatic implementation with `#[derive(EnvBind)]`
//! - **Nested structs**: fields of nested structs extend the prefix
//! - **Repeated structs**: `Vec`s of structs are addressed by index,
//!   `APP_SERVERS_0_HOST`, `APP_SERVERS_1_HOST`, ...
//! - **Typed values**: numbers, booleans, durations, timestamps, lists, maps
//! - **Custom conversions**: [`Decode`], [`UnmarshalText`], [`Set`] and
//!   [`UnmarshalBinary`] contracts, plus [`Json`] for JSON-encoded values
//! - **Unused variable detection**: spot misspelled or stale keys
//!
//! # Example
//!
//! ```rust
//! use envbind::EnvBind;
//! use std::time::Duration;
//!
//! #[derive(Debug, Default, EnvBind)]
//! struct Config {
//!     debug: bool,
//!
//!     #[env(default = "8080")]
//!     port: u16,
//!
//!     #[env(default = "30s")]
//!     timeout: Duration,
//!
//!     #[env(required)]
//!     database_url: String,
//!
//!     servers: Vec<Server>,
//! }
//!
//! #[derive(Debug, Default, EnvBind)]
//! struct Server {
//!     host: String,
//!     #[env(default = "443")]
//!     port: u16,
//! }
//!
//! # fn main() -> anyhow::Result<()> {
//! #     std::env::set_var("MYAPP_DATABASE_URL", "postgres://localhost/db");
//! #     std::env::set_var("MYAPP_SERVERS_0_HOST", "a.example.com");
//! #     std::env::set_var("MYAPP_SERVERS_1_HOST", "b.example.com");
//! let mut config = Config::default();
//! envbind::bind("myapp", &mut config)?;
//!
//! assert_eq!(config.port, 8080);
//! assert_eq!(config.timeout, Duration::from_secs(30));
//! assert_eq!(config.servers.len(), 2);
//! assert_eq!(config.servers[1].host, "b.example.com");
//! #     Ok(())
//! # }
//! ```
//!
//! # Variable names
//!
//! With prefix `myapp`, the field `database_url` is read from
//! `MYAPP_DATABASE_URL`. Nested structs add their own name (or alternate name)
//! to the prefix, and repeated structs add their name and the element index.
//!
//! # Repeated structs
//!
//! Every variable under `<FIELD>_` of a repeated field must read
//! `<FIELD>_<INDEX>_<NAME>`, and indices must run from 0 without gaps. Anything
//! else under that prefix is an error, checked before any field is assigned.
//! This includes sibling fields that share the prefix: next to
//! `servers: Vec<Server>`, a field `servers_count` is read from
//! `MYAPP_SERVERS_COUNT`, which fails as a malformed index of `servers`.
//! Move such a variable out of the prefix, for example with
//! `#[env(alt = "SERVER_COUNT")]`.
//!
//! # Attributes
//!
//! ## `#[env(alt = "NAME")]`
//!
//! Read the field from `NAME`, without the prefix. `<PREFIX>_NAME` is tried
//! next. On a nested or repeated struct the alternate replaces the field name in
//! the prefix; for a repeated struct, variables under the bare `NAME_<INDEX>_`
//! are used only when none exist under the prefixed name.
//!
//! ## `#[env(default = "value")]`
//!
//! Value used when no variable is set. It goes through the same conversion as
//! an environment value.
//!
//! ## `#[env(required)]`
//!
//! Fail when no variable is set and there is no default.
//!
//! ## `#[env(ignored)]`
//!
//! Never read or write the field.
//!
//! ## `#[env(split_words)]`
//!
//! Split a camel-case field name into words: `MultiWordVar` is read from
//! `MULTI_WORD_VAR` instead of `MULTIWORDVAR`.
//!
//! ## `#[env(flatten)]`
//!
//! Bind the fields of a nested struct as if they were declared on the parent,
//! without adding a prefix level.

mod bind;
mod convert;
mod env;
mod error;
mod names;
mod schema;

pub use bind::{Binder, Binding, Walker};
pub use convert::{convert, Decode, Json, Set, UnmarshalBinary, UnmarshalText};
pub use env::Environment;
pub use envbind_derive::EnvBind;
pub use error::{BoxError, EnvError};
pub use names::split_words;
pub use schema::{variables, Bindable, FieldDescriptor, Kind, Variable};

/// Bind the process environment into `target`
///
/// `prefix` is upper-cased; with an empty prefix fields are read from their
/// bare names. The environment is read once, before the pass starts.
///
/// # Errors
///
/// See [`Binder::bind`].
pub fn bind<T: Bindable>(prefix: &str, target: &mut T) -> Result<(), EnvError> {
    let env = Environment::from_process();
    Binder::new(&env).prefix(prefix).bind(target)?;
    Ok(())
}

/// Like [`bind`], but panics on error
///
/// # Panics
///
/// Panics with the error message if binding fails.
pub fn must_bind<T: Bindable>(prefix: &str, target: &mut T) {
    if let Err(err) = bind(prefix, target) {
        panic!("{err}");
    }
}

/// Process environment variables under `prefix` that `target` does not consume
///
/// Runs the same pass as [`bind`] on a clone of `target`, so it fails in the
/// same way, and leaves `target` untouched.
///
/// # Errors
///
/// See [`Binder::bind`].
pub fn find_unused<T: Bindable + Clone>(prefix: &str, target: &T) -> Result<Vec<String>, EnvError> {
    let env = Environment::from_process();
    Binder::new(&env).prefix(prefix).unused(target)
}
