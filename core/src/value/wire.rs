use crate::de::wire::{preallocation, WireVisitor};
use indexmap::IndexMap;
use serde::{
    de::{MapAccess, Visitor},
    ser::{SerializeMap, SerializeSeq},
    Deserialize, Deserializer, Serialize, Serializer,
};
use std::fmt::{Display, Write};

/// Wire number. Integers compare by value regardless of signedness.
#[derive(Debug, Clone)]
pub enum Number {
    SignedInteger(i64),
    UnsignedInteger(u64),
    Float(f64),
}

impl Number {
    fn as_integer(&self) -> Option<i128> {
        match self {
            Self::SignedInteger(v) => Some(*v as _),
            Self::UnsignedInteger(v) => Some(*v as _),
            Self::Float(_) => None,
        }
    }
}

impl PartialEq for Number {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Float(a), Self::Float(b)) => a == b,
            _ => match (self.as_integer(), other.as_integer()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl PartialOrd for Number {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        match (self.as_integer(), other.as_integer()) {
            (Some(a), Some(b)) => a.partial_cmp(&b),
            _ => self.as_float()?.partial_cmp(&other.as_float()?),
        }
    }
}

impl Number {
    pub fn as_signed_integer(&self) -> Option<i64> {
        match self {
            Self::SignedInteger(v) => Some(*v),
            Self::UnsignedInteger(v) => i64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_unsigned_integer(&self) -> Option<u64> {
        match self {
            Self::UnsignedInteger(v) => Some(*v),
            Self::SignedInteger(v) => u64::try_from(*v).ok(),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Self::Float(v) => Some(*v),
            Self::SignedInteger(v) => Some(*v as _),
            Self::UnsignedInteger(v) => Some(*v as _),
        }
    }
}

impl Display for Number {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::SignedInteger(v) => v.fmt(f),
            Self::UnsignedInteger(v) => v.fmt(f),
            Self::Float(v) => v.fmt(f),
        }
    }
}

impl Serialize for Number {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::SignedInteger(v) => serializer.serialize_i64(*v),
            Self::UnsignedInteger(v) => serializer.serialize_u64(*v),
            Self::Float(v) => serializer.serialize_f64(*v),
        }
    }
}

macro_rules! impl_number_from {
    ($type:ty => $variant:ident) => {
        impl From<$type> for Number {
            fn from(value: $type) -> Self {
                Self::$variant(value as _)
            }
        }

        impl From<$type> for Wire {
            fn from(value: $type) -> Self {
                Self::Number(Number::$variant(value as _))
            }
        }
    };
}

impl_number_from!(i8 => SignedInteger);
impl_number_from!(i16 => SignedInteger);
impl_number_from!(i32 => SignedInteger);
impl_number_from!(i64 => SignedInteger);
impl_number_from!(isize => SignedInteger);
impl_number_from!(u8 => UnsignedInteger);
impl_number_from!(u16 => UnsignedInteger);
impl_number_from!(u32 => UnsignedInteger);
impl_number_from!(u64 => UnsignedInteger);
impl_number_from!(usize => UnsignedInteger);
impl_number_from!(f32 => Float);
impl_number_from!(f64 => Float);

/// Insertion-ordered, string-keyed wire hash.
///
/// Inserting a key that already exists replaces its value in place, so the
/// position of a key is the position of its first insertion. Equality ignores
/// key order.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct WireMap(IndexMap<String, Wire>);

impl WireMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_capacity(capacity: usize) -> Self {
        Self(IndexMap::with_capacity(capacity))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    pub fn get(&self, key: &str) -> Option<&Wire> {
        self.0.get(key)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Wire> {
        self.0.get_mut(key)
    }

    /// Returns the previous value stored under `key`, if any.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Wire>) -> Option<Wire> {
        self.0.insert(key.into(), value.into())
    }

    /// Removes `key`, keeping the order of the remaining keys.
    pub fn remove(&mut self, key: &str) -> Option<Wire> {
        self.0.shift_remove(key)
    }

    /// Nested mapping stored under `key`, created when absent.
    ///
    /// A value under `key` that is not a mapping gets replaced by an empty one.
    pub fn nested_mut(&mut self, key: &str) -> &mut WireMap {
        let slot = match self.0.get_index_of(key) {
            Some(index) => &mut self.0[index],
            None => self.0.entry(key.to_owned()).or_default(),
        };
        if !matches!(slot, Wire::Map(_)) {
            if !slot.is_null() {
                tracing::warn!(key, "replacing non-mapping wire value with a mapping");
            }
            *slot = Wire::Map(WireMap::new());
        }
        match slot {
            Wire::Map(map) => map,
            _ => unreachable!(),
        }
    }

    /// Builder-style insert.
    pub fn property(mut self, key: impl Into<String>, value: impl Into<Wire>) -> Self {
        self.insert(key, value);
        self
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Wire)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K, V> FromIterator<(K, V)> for WireMap
where
    K: Into<String>,
    V: Into<Wire>,
{
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
    {
        Self(
            iter.into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }
}

impl IntoIterator for WireMap {
    type Item = (String, Wire);
    type IntoIter = indexmap::map::IntoIter<String, Wire>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl Display for WireMap {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_char('{')?;
        for (i, (key, value)) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{:?}=>{}", key, value)?;
        }
        f.write_char('}')
    }
}

impl Serialize for WireMap {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (k, v) in &self.0 {
            map.serialize_entry(k, v)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for WireMap {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_map(WireMapVisitor)
    }
}

pub(crate) struct WireMapVisitor;

impl<'de> Visitor<'de> for WireMapVisitor {
    type Value = WireMap;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("string-keyed wire hash")
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut result = WireMap::with_capacity(preallocation(access.size_hint()));
        while let Some((k, v)) = access.next_entry::<String, Wire>()? {
            result.insert(k, v);
        }
        Ok(result)
    }
}

/// Untyped wire value: the nested payload a protocol encoder consumes.
#[derive(Debug, Default, Clone, PartialEq)]
pub enum Wire {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Bytes(Vec<u8>),
    Array(Vec<Wire>),
    Map(WireMap),
}

impl Wire {
    pub fn null() -> Self {
        Self::Null
    }

    pub fn bool(value: bool) -> Self {
        Self::Bool(value)
    }

    pub fn number(value: impl Into<Number>) -> Self {
        Self::Number(value.into())
    }

    pub fn string(value: impl ToString) -> Self {
        Self::String(value.to_string())
    }

    pub fn bytes(value: impl Into<Vec<u8>>) -> Self {
        Self::Bytes(value.into())
    }

    pub fn array() -> Self {
        Self::Array(Default::default())
    }

    pub fn array_from<T: Into<Wire>>(value: impl IntoIterator<Item = T>) -> Self {
        Self::Array(value.into_iter().map(|item| item.into()).collect())
    }

    pub fn item(self, value: impl Into<Wire>) -> Self {
        match self {
            Self::Array(mut result) => {
                result.push(value.into());
                Self::Array(result)
            }
            _ => self,
        }
    }

    pub fn map() -> Self {
        Self::Map(Default::default())
    }

    pub fn map_from<K: Into<String>, V: Into<Wire>>(
        value: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self::Map(value.into_iter().collect())
    }

    pub fn property(self, key: impl Into<String>, value: impl Into<Wire>) -> Self {
        match self {
            Self::Map(result) => Self::Map(result.property(key, value)),
            _ => self,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<&Number> {
        match self {
            Self::Number(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(v) => Some(v.as_str()),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Wire]> {
        match self {
            Self::Array(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&WireMap> {
        match self {
            Self::Map(v) => Some(v),
            _ => None,
        }
    }

    /// String form used when this value becomes a hash key.
    pub fn to_key_string(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::String(v) => v.to_owned(),
            other => other.to_string(),
        }
    }
}

impl Display for Wire {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Null => f.write_str("nil"),
            Self::Bool(v) => v.fmt(f),
            Self::Number(v) => v.fmt(f),
            Self::String(v) => write!(f, "{:?}", v),
            Self::Bytes(v) => write!(f, "<{} bytes>", v.len()),
            Self::Array(v) => {
                f.write_char('[')?;
                for (i, item) in v.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    item.fmt(f)?;
                }
                f.write_char(']')
            }
            Self::Map(v) => v.fmt(f),
        }
    }
}

impl From<bool> for Wire {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Wire {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Wire {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Number> for Wire {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<WireMap> for Wire {
    fn from(value: WireMap) -> Self {
        Self::Map(value)
    }
}

impl From<Vec<Wire>> for Wire {
    fn from(value: Vec<Wire>) -> Self {
        Self::Array(value)
    }
}

impl<T> From<Option<T>> for Wire
where
    T: Into<Wire>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}

impl Serialize for Wire {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match self {
            Self::Null => serializer.serialize_none(),
            Self::Bool(v) => serializer.serialize_bool(*v),
            Self::Number(v) => v.serialize(serializer),
            Self::String(v) => serializer.serialize_str(v),
            Self::Bytes(v) => serializer.serialize_bytes(v),
            Self::Array(v) => {
                let mut seq = serializer.serialize_seq(Some(v.len()))?;
                for item in v {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Self::Map(v) => v.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Wire {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        deserializer.deserialize_any(WireVisitor)
    }
}
