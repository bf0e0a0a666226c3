//! Static field descriptors and the [`Bindable`] trait
//!
//! `#[derive(EnvBind)]` turns a struct into a tree of [`FieldDescriptor`]s built
//! once per type, plus a `visit` method that hands each field to the
//! [`Walker`]. Field types plug into the walk through [`Bindable`]: scalars are
//! converted from text, structs recurse, `Vec`s of structs expand by index and
//! `Option`s are filled only when something reaches them.

use std::collections::{BTreeMap, HashMap};
use std::hash::Hash;

use crate::bind::Walker;
use crate::convert::{self, Decode, Set, UnmarshalBinary, UnmarshalText};
use crate::error::{BoxError, EnvError};
use crate::names::{self, Scope};

/// Shape of a field as seen by the binder.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Kind {
    /// Value converted from a single string
    Scalar,
    /// `Vec<u8>`: raw bytes of the value
    Bytes,
    /// Comma-separated list of scalars
    Sequence,
    /// Comma-separated `key:value` pairs
    Map,
    /// Nested struct
    Struct,
    /// List of structs addressed by index
    Repeated,
    /// Not inspected (ignored fields)
    Opaque,
}

impl Kind {
    /// Kind of a `Vec` whose elements have kind `element`
    pub const fn sequence_of(element: Kind) -> Kind {
        match element {
            Kind::Struct => Kind::Repeated,
            _ => Kind::Sequence,
        }
    }
}

/// Declared metadata of one struct field.
///
/// Generated by `#[derive(EnvBind)]` as a `static`; the `fields` function points
/// at the element struct's descriptors for composite kinds.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriptor {
    /// Field identifier as declared
    pub name: &'static str,
    /// Shape of the field's type
    pub kind: Kind,
    /// Whether the type is wrapped in `Option`
    pub optional: bool,
    /// `#[env(alt = "...")]`
    pub alt: Option<&'static str>,
    /// `#[env(default = "...")]`
    pub default: Option<&'static str>,
    /// `#[env(required)]`
    pub required: bool,
    /// `#[env(ignored)]`
    pub ignored: bool,
    /// `#[env(split_words)]`
    pub split_words: bool,
    /// `#[env(flatten)]`: fields are bound as if declared on the parent
    pub flatten: bool,
    /// Descriptors of the nested or element struct, empty for leaves
    pub fields: fn() -> &'static [FieldDescriptor],
}

impl FieldDescriptor {
    /// Descriptor for a plain field with no attributes
    pub const fn new(name: &'static str, kind: Kind) -> Self {
        Self {
            name,
            kind,
            optional: false,
            alt: None,
            default: None,
            required: false,
            ignored: false,
            split_words: false,
            flatten: false,
            fields: no_fields,
        }
    }
}

fn no_fields() -> &'static [FieldDescriptor] {
    &[]
}

/// A type that can be bound from environment variables.
///
/// Leaf types only need the conversion hooks: either [`Bindable::assign`] for a
/// built-in conversion, or one of the `as_*` capability accessors for a custom
/// contract. The converter checks the contracts in a fixed order, so a type
/// exposing several of them always resolves the same way:
/// [`Decode`] > [`UnmarshalText`] > [`Set`] > [`UnmarshalBinary`] > `assign`.
///
/// ```rust
/// use envbind::{BoxError, Bindable, Set};
///
/// #[derive(Debug, Default)]
/// struct Bracketed(String);
///
/// impl Set for Bracketed {
///     fn set(&mut self, value: &str) -> Result<(), BoxError> {
///         self.0 = format!("[{value}]");
///         Ok(())
///     }
/// }
///
/// impl Bindable for Bracketed {
///     fn as_set(&mut self) -> Option<&mut dyn Set> {
///         Some(self)
///     }
/// }
/// ```
///
/// Structs get their implementation from `#[derive(EnvBind)]`.
pub trait Bindable {
    /// Shape of this type
    const KIND: Kind = Kind::Scalar;

    /// Shape of a `Vec` of this type
    const SEQ_KIND: Kind = Kind::sequence_of(Self::KIND);

    /// Whether this type is an `Option`
    const OPTIONAL: bool = false;

    /// Field descriptors of a struct type, empty for leaves
    fn fields() -> &'static [FieldDescriptor]
    where
        Self: Sized,
    {
        &[]
    }

    /// Visit every field of a struct type in declaration order
    ///
    /// Returns whether any field received a value. Only structs can be
    /// visited; everything else is an invalid binding target.
    fn visit(&mut self, walker: &mut Walker<'_>) -> Result<bool, EnvError> {
        let _ = walker;
        Err(EnvError::InvalidSpecification)
    }

    /// Visit a struct that must exist afterwards, such as a repeated element
    ///
    /// Same as [`Bindable::visit`] except that an `Option` is filled even when
    /// no field receives a value.
    fn visit_present(&mut self, walker: &mut Walker<'_>) -> Result<bool, EnvError> {
        self.visit(walker)
    }

    /// Bind this value as the field described by `field`
    fn bind(&mut self, field: &FieldDescriptor, walker: &mut Walker<'_>) -> Result<bool, EnvError>
    where
        Self: Sized,
    {
        match Self::KIND {
            Kind::Struct => walker.nested(field, self),
            _ => walker.leaf(field, self),
        }
    }

    /// Bind a `Vec` of this type as the field described by `field`
    fn bind_seq(
        items: &mut Vec<Self>,
        field: &FieldDescriptor,
        walker: &mut Walker<'_>,
    ) -> Result<bool, EnvError>
    where
        Self: Sized + Default,
    {
        match Self::KIND {
            Kind::Struct => walker.repeated(field, items),
            _ => walker.list(field, items),
        }
    }

    /// Built-in conversion from text, used when no contract applies
    fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
        let _ = raw;
        Err(format!("unsupported type {}", std::any::type_name::<Self>()).into())
    }

    /// Single-string decode contract
    fn as_decode(&mut self) -> Option<&mut dyn Decode> {
        None
    }

    /// Textual unmarshal contract
    fn as_unmarshal_text(&mut self) -> Option<&mut dyn UnmarshalText> {
        None
    }

    /// String setter contract
    fn as_set(&mut self) -> Option<&mut dyn Set> {
        None
    }

    /// Binary unmarshal contract
    fn as_unmarshal_binary(&mut self) -> Option<&mut dyn UnmarshalBinary> {
        None
    }
}

impl<T: Bindable + Default> Bindable for Option<T> {
    const KIND: Kind = T::KIND;
    const SEQ_KIND: Kind = T::SEQ_KIND;
    const OPTIONAL: bool = true;

    fn fields() -> &'static [FieldDescriptor] {
        T::fields()
    }

    fn visit(&mut self, walker: &mut Walker<'_>) -> Result<bool, EnvError> {
        match self {
            Some(inner) => inner.visit(walker),
            None => {
                let mut scratch = T::default();
                let bound = scratch.visit(walker)?;
                if bound {
                    *self = Some(scratch);
                }
                Ok(bound)
            }
        }
    }

    fn visit_present(&mut self, walker: &mut Walker<'_>) -> Result<bool, EnvError> {
        self.get_or_insert_with(T::default).visit_present(walker)
    }

    fn bind(&mut self, field: &FieldDescriptor, walker: &mut Walker<'_>) -> Result<bool, EnvError> {
        match self {
            Some(inner) => inner.bind(field, walker),
            None => {
                let mut scratch = T::default();
                let bound = scratch.bind(field, walker)?;
                if bound {
                    *self = Some(scratch);
                }
                Ok(bound)
            }
        }
    }

    fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
        let mut value = T::default();
        convert::convert(&mut value, raw)?;
        *self = Some(value);
        Ok(())
    }
}

impl<T: Bindable + Default> Bindable for Box<T> {
    const KIND: Kind = T::KIND;
    const SEQ_KIND: Kind = T::SEQ_KIND;
    const OPTIONAL: bool = T::OPTIONAL;

    fn fields() -> &'static [FieldDescriptor] {
        T::fields()
    }

    fn visit(&mut self, walker: &mut Walker<'_>) -> Result<bool, EnvError> {
        (**self).visit(walker)
    }

    fn visit_present(&mut self, walker: &mut Walker<'_>) -> Result<bool, EnvError> {
        (**self).visit_present(walker)
    }

    fn bind(&mut self, field: &FieldDescriptor, walker: &mut Walker<'_>) -> Result<bool, EnvError> {
        (**self).bind(field, walker)
    }

    fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
        convert::convert(&mut **self, raw)
    }
}

impl<T: Bindable + Default> Bindable for Vec<T> {
    const KIND: Kind = T::SEQ_KIND;

    fn fields() -> &'static [FieldDescriptor] {
        T::fields()
    }

    fn bind(&mut self, field: &FieldDescriptor, walker: &mut Walker<'_>) -> Result<bool, EnvError> {
        T::bind_seq(self, field, walker)
    }
}

impl<K, V> Bindable for HashMap<K, V>
where
    K: Bindable + Default + Eq + Hash,
    V: Bindable + Default,
{
    const KIND: Kind = Kind::Map;

    fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
        *self = convert::pairs(raw).collect::<Result<_, BoxError>>()?;
        Ok(())
    }
}

impl<K, V> Bindable for BTreeMap<K, V>
where
    K: Bindable + Default + Ord,
    V: Bindable + Default,
{
    const KIND: Kind = Kind::Map;

    fn assign(&mut self, raw: &str) -> Result<(), BoxError> {
        *self = convert::pairs(raw).collect::<Result<_, BoxError>>()?;
        Ok(())
    }
}

/// One environment variable a configuration type reads.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    /// Most specific name the variable is looked up under
    pub key: String,
    /// Remaining names, in lookup order
    pub fallbacks: Vec<String>,
    /// Structural name of the field
    pub field: &'static str,
    /// Shape of the field
    pub kind: Kind,
    /// Default literal
    pub default: Option<&'static str>,
    /// Whether the variable must be set
    pub required: bool,
}

/// List every variable `T` reads under `prefix`, in declaration order.
///
/// Repeated-struct fields contribute their element fields once, with `{N}` in
/// place of the index. Ignored fields are left out.
///
/// ```rust
/// use envbind::EnvBind;
///
/// #[derive(EnvBind)]
/// struct Config {
///     #[env(default = "8080")]
///     port: u16,
/// }
///
/// let vars = envbind::variables::<Config>("app");
/// assert_eq!(vars[0].key, "APP_PORT");
/// assert_eq!(vars[0].default, Some("8080"));
/// ```
pub fn variables<T: Bindable>(prefix: &str) -> Vec<Variable> {
    let mut out = Vec::new();
    collect(T::fields(), &prefix.to_uppercase(), Scope::Root, &mut out);
    out
}

fn collect(fields: &[FieldDescriptor], prefix: &str, scope: Scope, out: &mut Vec<Variable>) {
    for field in fields.iter().filter(|field| !field.ignored) {
        match field.kind {
            Kind::Struct if field.flatten && field.alt.is_none() => {
                collect((field.fields)(), prefix, scope, out);
            }
            Kind::Struct => {
                let nested = names::join(prefix, &names::segment(field));
                collect((field.fields)(), &nested, scope.descend(), out);
            }
            Kind::Repeated => {
                let root = names::join(prefix, &names::segment(field));
                let element = format!("{root}_{{N}}");
                collect((field.fields)(), &element, Scope::Element, out);
            }
            _ => {
                let mut candidates = names::candidates(prefix, field, scope, false);
                let key = candidates.remove(0);
                out.push(Variable {
                    key,
                    fallbacks: candidates,
                    field: field.name,
                    kind: field.kind,
                    default: field.default,
                    required: field.required,
                });
            }
        }
    }
}
