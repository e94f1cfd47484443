use crate::{symbol::Symbol, value::attribute::Value, value::wire::Wire};
use serde::{Deserialize, Serialize};
use std::{
    collections::{BTreeMap, HashMap},
    fmt::Display,
    hash::Hash,
};

/// Name under which a structural type is registered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TypeTag(String);

impl TypeTag {
    pub fn new(name: impl ToString) -> Self {
        Self(name.to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Display for TypeTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for TypeTag {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TypeTag {
    fn from(name: String) -> Self {
        Self(name)
    }
}

/// Declared type of a property, resolved once when the schema is declared.
///
/// In config documents it reads as `scalar`, `boolean`, `symbol`,
/// `{sequence: T}`, `{mapping: [K, V]}`, `{structural: Tag}` or
/// `{lazy_named_mapping: Tag}`.
#[derive(Debug, Default, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TypeDescriptor {
    /// Strings, numbers, blobs and timestamps, already coerced by the producer.
    #[default]
    Scalar,
    Boolean,
    Symbol,
    Sequence(Box<TypeDescriptor>),
    /// (key, value)
    Mapping(Box<TypeDescriptor>, Box<TypeDescriptor>),
    Structural(TypeTag),
    /// Named entries of the tagged structural type, decoded on first access.
    LazyNamedMapping(TypeTag),
}

impl TypeDescriptor {
    pub fn scalar() -> Self {
        Self::Scalar
    }

    pub fn boolean() -> Self {
        Self::Boolean
    }

    pub fn symbol() -> Self {
        Self::Symbol
    }

    pub fn sequence(item: impl Into<TypeDescriptor>) -> Self {
        Self::Sequence(Box::new(item.into()))
    }

    pub fn mapping(key: impl Into<TypeDescriptor>, value: impl Into<TypeDescriptor>) -> Self {
        Self::Mapping(Box::new(key.into()), Box::new(value.into()))
    }

    pub fn structural(tag: impl Into<TypeTag>) -> Self {
        Self::Structural(tag.into())
    }

    pub fn lazy_named_mapping(tag: impl Into<TypeTag>) -> Self {
        Self::LazyNamedMapping(tag.into())
    }

    /// Structural tags this descriptor refers to, outermost first.
    pub fn referenced_tags(&self) -> Vec<&TypeTag> {
        let mut result = vec![];
        self.collect_tags(&mut result);
        result
    }

    fn collect_tags<'a>(&'a self, result: &mut Vec<&'a TypeTag>) {
        match self {
            Self::Sequence(item) => item.collect_tags(result),
            Self::Mapping(key, value) => {
                key.collect_tags(result);
                value.collect_tags(result);
            }
            Self::Structural(tag) | Self::LazyNamedMapping(tag) => result.push(tag),
            _ => {}
        }
    }
}

impl Display for TypeDescriptor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Scalar => f.write_str("Scalar"),
            Self::Boolean => f.write_str("Boolean"),
            Self::Symbol => f.write_str("Symbol"),
            Self::Sequence(item) => write!(f, "[{}]", item),
            Self::Mapping(key, value) => write!(f, "{{{} => {}}}", key, value),
            Self::Structural(tag) => tag.fmt(f),
            Self::LazyNamedMapping(tag) => write!(f, "Lazy<{}>", tag),
        }
    }
}

impl From<TypeTag> for TypeDescriptor {
    fn from(tag: TypeTag) -> Self {
        Self::Structural(tag)
    }
}

/// Maps a Rust type onto the descriptor its properties are declared with.
/// Implemented by `#[derive(WireShape)]` for structural types.
pub trait DescribeType {
    fn describe() -> TypeDescriptor;
}

macro_rules! impl_describe {
    ( $( $type:ty ),+ => $descriptor:ident ) => {
        $(
            impl DescribeType for $type {
                fn describe() -> TypeDescriptor {
                    TypeDescriptor::$descriptor
                }
            }
        )+
    };
}

impl_describe!(bool => Boolean);
impl_describe!(Symbol => Symbol);
impl_describe!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, char, String, Wire, Value
    => Scalar
);

impl DescribeType for &str {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::Scalar
    }
}

impl<T: DescribeType> DescribeType for Option<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: DescribeType> DescribeType for Box<T> {
    fn describe() -> TypeDescriptor {
        T::describe()
    }
}

impl<T: DescribeType> DescribeType for Vec<T> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::sequence(T::describe())
    }
}

impl<K: DescribeType + Eq + Hash, V: DescribeType, S> DescribeType for HashMap<K, V, S> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::mapping(K::describe(), V::describe())
    }
}

impl<K: DescribeType + Ord, V: DescribeType> DescribeType for BTreeMap<K, V> {
    fn describe() -> TypeDescriptor {
        TypeDescriptor::mapping(K::describe(), V::describe())
    }
}
