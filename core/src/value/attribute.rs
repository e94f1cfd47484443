use crate::{
    lazy::LazyNamedMapping,
    symbol::Symbol,
    types::TypeTag,
    value::wire::{Number, Wire},
};

/// Named fields of one structural value, in declaration order.
///
/// Equality ignores field order.
#[derive(Debug, Clone)]
pub struct Structure {
    type_tag: TypeTag,
    fields: Vec<(String, Value)>,
}

impl Structure {
    pub fn new(type_tag: impl Into<TypeTag>) -> Self {
        Self {
            type_tag: type_tag.into(),
            fields: vec![],
        }
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.iter().find(|(n, _)| n == name).map(|(_, v)| v)
    }

    pub fn insert(&mut self, name: impl ToString, value: impl Into<Value>) {
        let name = name.to_string();
        let value = value.into();
        if let Some((_, item)) = self.fields.iter_mut().find(|(n, _)| n == &name) {
            *item = value;
        } else {
            self.fields.push((name, value));
        }
    }

    pub fn field(mut self, name: impl ToString, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (n.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl PartialEq for Structure {
    fn eq(&self, other: &Self) -> bool {
        self.type_tag == other.type_tag
            && self.fields.len() == other.fields.len()
            && self
                .fields
                .iter()
                .all(|(name, value)| other.get(name) == Some(value))
    }
}

/// In-memory attribute value a property decodes into and encodes from.
///
/// Mappings compare as sets of entries, regardless of order.
#[derive(Debug, Default, Clone)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Number(Number),
    String(String),
    Symbol(Symbol),
    Bytes(Vec<u8>),
    Sequence(Vec<Value>),
    /// (values: [(key, value)])
    Mapping(Vec<(Value, Value)>),
    Structure(Structure),
    Lazy(LazyNamedMapping),
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Null, Self::Null) => true,
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::Number(a), Self::Number(b)) => a == b,
            (Self::String(a), Self::String(b)) => a == b,
            (Self::Symbol(a), Self::Symbol(b)) => a == b,
            (Self::Bytes(a), Self::Bytes(b)) => a == b,
            (Self::Sequence(a), Self::Sequence(b)) => a == b,
            (Self::Mapping(a), Self::Mapping(b)) => same_entries(a, b),
            (Self::Structure(a), Self::Structure(b)) => a == b,
            (Self::Lazy(a), Self::Lazy(b)) => a == b,
            _ => false,
        }
    }
}

/// Pairs every entry of `a` with a distinct equal entry of `b`.
fn same_entries(a: &[(Value, Value)], b: &[(Value, Value)]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    let mut matched = vec![false; b.len()];
    a.iter().all(|entry| {
        let found = (0..b.len()).find(|&index| !matched[index] && *entry == b[index]);
        match found {
            Some(index) => {
                matched[index] = true;
                true
            }
            None => false,
        }
    })
}

impl Value {
    pub fn symbol(name: impl AsRef<str>) -> Self {
        Self::Symbol(Symbol::new(name))
    }

    pub fn string(value: impl ToString) -> Self {
        Self::String(value.to_string())
    }

    pub fn sequence_from<T: Into<Value>>(value: impl IntoIterator<Item = T>) -> Self {
        Self::Sequence(value.into_iter().map(|item| item.into()).collect())
    }

    pub fn mapping_from<K: Into<Value>, V: Into<Value>>(
        value: impl IntoIterator<Item = (K, V)>,
    ) -> Self {
        Self::Mapping(
            value
                .into_iter()
                .map(|(key, value)| (key.into(), value.into()))
                .collect(),
        )
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Only null and `false` are falsy.
    pub fn is_truthy(&self) -> bool {
        !matches!(self, Self::Null | Self::Bool(false))
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

    pub fn as_symbol(&self) -> Option<&Symbol> {
        match self {
            Self::Symbol(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_bytes(&self) -> Option<&[u8]> {
        match self {
            Self::Bytes(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_mapping(&self) -> Option<&[(Value, Value)]> {
        match self {
            Self::Mapping(v) => Some(v),
            _ => None,
        }
    }

    /// Looks up a mapping entry by key.
    pub fn get(&self, key: &Value) -> Option<&Value> {
        self.as_mapping()?
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn as_structure(&self) -> Option<&Structure> {
        match self {
            Self::Structure(v) => Some(v),
            _ => None,
        }
    }

    pub fn as_lazy(&self) -> Option<&LazyNamedMapping> {
        match self {
            Self::Lazy(v) => Some(v),
            _ => None,
        }
    }
}

/// Raw conversion: wire arrays become sequences and wire hashes become
/// string-keyed mappings, with no type-driven coercion.
impl From<Wire> for Value {
    fn from(value: Wire) -> Self {
        match value {
            Wire::Null => Self::Null,
            Wire::Bool(v) => Self::Bool(v),
            Wire::Number(v) => Self::Number(v),
            Wire::String(v) => Self::String(v),
            Wire::Bytes(v) => Self::Bytes(v),
            Wire::Array(v) => Self::Sequence(v.into_iter().map(Self::from).collect()),
            Wire::Map(v) => Self::Mapping(
                v.into_iter()
                    .map(|(k, v)| (Self::String(k), Self::from(v)))
                    .collect(),
            ),
        }
    }
}

impl From<&Wire> for Value {
    fn from(value: &Wire) -> Self {
        Self::from(value.to_owned())
    }
}

macro_rules! impl_value_from {
    ( $( $type:ty ),+ ) => {
        $(
            impl From<$type> for Value {
                fn from(value: $type) -> Self {
                    Self::Number(value.into())
                }
            }
        )+
    };
}

impl_value_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64);

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::String(value.to_owned())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::String(value)
    }
}

impl From<Symbol> for Value {
    fn from(value: Symbol) -> Self {
        Self::Symbol(value)
    }
}

impl From<Number> for Value {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

impl From<Structure> for Value {
    fn from(value: Structure) -> Self {
        Self::Structure(value)
    }
}

impl From<LazyNamedMapping> for Value {
    fn from(value: LazyNamedMapping) -> Self {
        Self::Lazy(value)
    }
}

impl From<Vec<Value>> for Value {
    fn from(value: Vec<Value>) -> Self {
        Self::Sequence(value)
    }
}

impl<T> From<Option<T>> for Value
where
    T: Into<Value>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or_default()
    }
}
