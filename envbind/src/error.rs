//! Error types for environment variable binding

use std::num::ParseIntError;

/// Boxed error returned by value conversions and custom contracts.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Errors that can occur while binding environment variables into a struct.
///
/// A binding pass stops at the first error it meets, so at most one of these is
/// reported per call:
/// - Invalid usage (the target is not a struct)
/// - Malformed index segments on repeated-struct fields
/// - Values that cannot be converted into the field's type
/// - Missing required variables
#[derive(Debug, thiserror::Error)]
pub enum EnvError {
    /// The binding target is not a struct.
    ///
    /// Returned before any variable is looked up, e.g. when binding into a
    /// `HashMap` or a `Vec` directly, or when `#[env(flatten)]` is placed on a
    /// field whose type is not a struct.
    #[error("specification must be a struct")]
    InvalidSpecification,

    /// A key under a repeated-struct prefix is followed by something other than
    /// an index.
    #[error(
        "key {key} has prefix {prefix} but doesn't follow an integer value followed by an underscore (unexpected char '{found}')"
    )]
    UnexpectedChar {
        /// Offending environment variable
        key: String,
        /// Repeated-struct prefix, including the trailing underscore
        prefix: String,
        /// First character after the prefix
        found: char,
    },

    /// A key under a repeated-struct prefix has an empty index segment.
    #[error(
        "key {key} has prefix {prefix} but doesn't follow an integer value followed by an underscore (no digits found)"
    )]
    NoDigits {
        /// Offending environment variable
        key: String,
        /// Repeated-struct prefix, including the trailing underscore
        prefix: String,
    },

    /// A key under a repeated-struct prefix ends right after its index.
    #[error(
        "key {key} has prefix {prefix} but doesn't follow an integer value followed by an underscore (nothing after the index)"
    )]
    NoFieldAfterIndex {
        /// Offending environment variable
        key: String,
        /// Repeated-struct prefix, including the trailing underscore
        prefix: String,
    },

    /// The index segment of a key does not fit in an integer.
    #[error("can't parse index in {key}: {source}")]
    InvalidIndex {
        /// Offending environment variable
        key: String,
        /// Underlying integer parse failure
        source: ParseIntError,
    },

    /// Indices of a repeated-struct field do not form `0..count`.
    #[error(
        "prefix {prefix} defines {count} indexes, but index {index} is unset: indexes must start at 0 and be consecutive"
    )]
    MissingIndex {
        /// Repeated-struct prefix, including the trailing underscore
        prefix: String,
        /// Number of distinct indices found
        count: usize,
        /// First index in `0..count` without any variable
        index: usize,
    },

    /// Failed to convert an environment variable value into the field's type.
    ///
    /// Covers both built-in conversions (`FromStr`, durations, timestamps, lists,
    /// maps) and custom contracts such as [`Decode`](crate::Decode).
    #[error("assigning {key} to {field}: converting '{value}' to type {type_name}: {source}")]
    Parse {
        /// Environment variable the value came from (first candidate name)
        key: String,
        /// Structural name of the field being assigned
        field: String,
        /// Raw text that failed to convert
        value: String,
        /// Fully qualified type name that conversion was attempted for
        type_name: String,
        /// Error reported by the conversion
        source: BoxError,
    },

    /// Required environment variable is not set and the field has no default.
    #[error("required key {name} missing value")]
    Missing {
        /// Name of the missing environment variable
        name: String,
    },
}

impl EnvError {
    /// Create a parse error for a value of type `T`
    pub fn parse_error<T: ?Sized>(
        key: impl Into<String>,
        field: impl Into<String>,
        value: impl Into<String>,
        source: BoxError,
    ) -> Self {
        Self::Parse {
            key: key.into(),
            field: field.into(),
            value: value.into(),
            type_name: std::any::type_name::<T>().to_string(),
            source,
        }
    }

    /// Create a missing environment variable error
    pub fn missing(name: impl Into<String>) -> Self {
        Self::Missing { name: name.into() }
    }

    /// Structural name of the field that failed to convert, if any
    pub fn field_name(&self) -> Option<&str> {
        match self {
            Self::Parse { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether this error comes from malformed repeated-struct indexing
    pub fn is_structural(&self) -> bool {
        matches!(
            self,
            Self::UnexpectedChar { .. }
                | Self::NoDigits { .. }
                | Self::NoFieldAfterIndex { .. }
                | Self::InvalidIndex { .. }
                | Self::MissingIndex { .. }
        )
    }
}
