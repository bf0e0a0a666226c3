//! Conversion of raw environment values into typed fields
//!
//! # Custom contracts
//!
//! A field type can take over its own conversion by implementing one of these
//! traits and exposing it through the matching [`Bindable`] accessor:
//!
//! | Contract            | Receives          | Accessor                          |
//! |---------------------|-------------------|-----------------------------------|
//! | [`Decode`]          | the value         | [`Bindable::as_decode`]           |
//! | [`UnmarshalText`]   | the value's bytes | [`Bindable::as_unmarshal_text`]   |
//! | [`Set`]             | the value         | [`Bindable::as_set`]              |
//! | [`UnmarshalBinary`] | the value's bytes | [`Bindable::as_unmarshal_binary`] |
//!
//! They are tried in table order; the first one exposed wins. Types exposing
//! none fall back to [`Bindable::assign`].
//!
//! # Built-in conversions
//!
//! - `bool`: `true` or `false`
//! - integers: range-checked for the destination width
//! - `f32`, `f64`
//! - `String`, `char`, `PathBuf`
//! - `Duration`: human-readable durations such as `90s`, `2m` or `1h 30m`
//! - `DateTime<Utc>`, `DateTime<FixedOffset>`: RFC 3339 with an upper-case `T`
//!   and `Z`, e.g. `2016-08-16T18:57:05Z`
//! - `Vec<u8>`: the raw bytes of the value
//! - `Vec<T>`: comma-separated elements; an empty value is an empty list
//! - `HashMap<K, V>`, `BTreeMap<K, V>`: comma-separated `key:value` pairs

use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::time::Duration;

use chrono::{DateTime, FixedOffset, Utc};
use serde::de::DeserializeOwned;

use crate::bind::Walker;
use crate::error::{BoxError, EnvError};
use crate::schema::{Bindable, FieldDescriptor, Kind};

/// Decode a value from its environment variable text.
pub trait Decode {
    /// Replace `self` with the decoded value
    fn decode(&mut self, value: &str) -> Result<(), BoxError>;
}

/// Parse a value from its textual representation.
pub trait UnmarshalText {
    /// Replace `self` with the value parsed from `text`
    fn unmarshal_text(&mut self, text: &[u8]) -> Result<(), BoxError>;
}

/// Set a value from a string, like a command-line flag value.
pub trait Set {
    /// Replace `self` with the value parsed from `value`
    fn set(&mut self, value: &str) -> Result<(), BoxError>;
}

/// Parse a value from raw bytes.
pub trait UnmarshalBinary {
    /// Replace `self` with the value parsed from `data`
    fn unmarshal_binary(&mut self, data: &[u8]) -> Result<(), BoxError>;
}

/// Convert `raw` into `target`, honoring custom contracts first
pub fn convert<T: Bindable + ?Sized>(target: &mut T, raw: &str) -> Result<(), BoxError> {
    if let Some(decoder) = target.as_decode() {
        return decoder.decode(raw);
    }
    if let Some(unmarshaler) = target.as_unmarshal_text() {
        return unmarshaler.unmarshal_text(raw.as_bytes());
    }
    if let Some(setter) = target.as_set() {
        return setter.set(raw);
    }
    if let Some(unmarshaler) = target.as_unmarshal_binary() {
        return unmarshaler.unmarshal_binary(raw.as_bytes());
    }
    target.assign(raw)
}

/// Convert a comma-separated list, element by element
///
/// An empty (or blank) value gives an empty list. The first element that fails
/// fails the whole list.
pub fn convert_list<T: Bindable + Default>(items: &mut Vec<T>, raw: &str) -> Result<(), BoxError> {
    if raw.trim().is_empty() {
        items.clear();
        return Ok(());
    }

    *items = raw
        .split(',')
        .map(|part| -> Result<T, BoxError> {
            let mut item = T::default();
            convert(&mut item, part)?;
            Ok(item)
        })
        .collect::<Result<_, BoxError>>()?;
    Ok(())
}

/// Split a comma-separated list of `key:value` pairs and convert both sides
pub(crate) fn pairs<K, V>(raw: &str) -> impl Iterator<Item = Result<(K, V), BoxError>> + '_
where
    K: Bindable + Default,
    V: Bindable + Default,
{
    raw.split(',')
        .filter(|_| !raw.trim().is_empty())
        .map(|pair| -> Result<(K, V), BoxError> {
            let (k, v) = pair
                .split_once(':')
                .ok_or_else(|| format!("invalid map item: {pair:?}"))?;
            let mut key = K::default();
            convert(&mut key, k)?;
            let mut value = V::default();
            convert(&mut value, v)?;
            Ok((key, value))
        })
}

macro_rules! bindable_from_str {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Bindable for $ty {
                fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
                    *self = raw.parse::<$ty>()?;
                    Ok(())
                }
            }
        )*
    };
}

bindable_from_str!(
    bool, char, i8, i16, i32, i64, i128, isize, u16, u32, u64, u128, usize, f32, f64, PathBuf,
);

impl Bindable for u8 {
    const SEQ_KIND: Kind = Kind::Bytes;

    fn bind_seq(
        items: &mut Vec<Self>,
        field: &FieldDescriptor,
        walker: &mut Walker<'_>,
    ) -> Result<bool, EnvError> {
        walker.bytes(field, items)
    }

    fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
        *self = raw.parse()?;
        Ok(())
    }
}

impl Bindable for String {
    fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
        raw.clone_into(self);
        Ok(())
    }
}

impl Bindable for Duration {
    fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
        *self = humantime::parse_duration(raw)?;
        Ok(())
    }
}

impl Bindable for DateTime<Utc> {
    fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
        *self = parse_timestamp(raw)?.with_timezone(&Utc);
        Ok(())
    }
}

impl Bindable for DateTime<FixedOffset> {
    fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
        *self = parse_timestamp(raw)?;
        Ok(())
    }
}

/// RFC 3339 restricted to an upper-case `T` separator and `Z` zone
fn parse_timestamp(raw: &str) -> Result<DateTime<FixedOffset>, BoxError> {
    let parsed = DateTime::parse_from_rfc3339(raw)?;
    if raw.as_bytes().get(10) != Some(&b'T') || raw.ends_with('z') {
        return Err(format!("{raw:?} does not match layout 2006-01-02T15:04:05Z07:00").into());
    }
    Ok(parsed)
}

/// A value encoded as JSON in a single environment variable.
///
/// ```rust
/// use envbind::{EnvBind, Environment, Binder, Json};
///
/// #[derive(EnvBind)]
/// struct Config {
///     tags: Json<Vec<String>>,
/// }
///
/// let env = Environment::new().with("APP_TAGS", r#"["prod","api"]"#);
/// let mut config = Config { tags: Json::default() };
/// Binder::new(&env).prefix("app").bind(&mut config).unwrap();
/// assert_eq!(*config.tags, vec!["prod", "api"]);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Json<T>(pub T);

impl<T> Json<T> {
    /// Unwrap the decoded value
    pub fn into_inner(self) -> T {
        self.0
    }
}

impl<T> Deref for Json<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.0
    }
}

impl<T> DerefMut for Json<T> {
    fn deref_mut(&mut self) -> &mut T {
        &mut self.0
    }
}

impl<T: DeserializeOwned> Decode for Json<T> {
    fn decode(&mut self, value: &str) -> Result<(), BoxError> {
        self.0 = serde_json::from_str(value)?;
        Ok(())
    }
}

impl<T: DeserializeOwned> Bindable for Json<T> {
    fn as_decode(&mut self) -> Option<&mut dyn Decode> {
        Some(self)
    }
}
