use crate::{
    error::{Error, PropertyError, Result},
    lazy::LazyNamedMapping,
    registry::{self, TypeRegistry},
    symbol::Symbol,
    types::{TypeDescriptor, TypeTag},
    value::{
        attribute::Value,
        wire::{Wire, WireMap},
    },
};
use serde::{Deserialize, Serialize};

/// Options a property is declared with.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct PropertyOptions {
    /// Wire sub-object the field nests under.
    pub location: Option<String>,
    /// Wire key, when it differs from the property name.
    pub name: Option<String>,
    pub always_serialize: bool,
}

impl PropertyOptions {
    pub fn located_in(mut self, location: impl ToString) -> Self {
        self.location = Some(location.to_string());
        self
    }

    pub fn renamed(mut self, name: impl ToString) -> Self {
        self.name = Some(name.to_string());
        self
    }

    pub fn always_serialize(mut self, value: bool) -> Self {
        self.always_serialize = value;
        self
    }
}

/// One declared attribute: where it lives on the wire and how its value is
/// coerced in both directions.
///
/// Properties are built once when a schema is declared and only read
/// afterwards.
///
/// # Example
/// ```rust
/// use wire_shape::{Property, PropertyOptions, TypeDescriptor, Value, WireMap, Wire};
///
/// let property = Property::new(
///     "state",
///     TypeDescriptor::Symbol,
///     PropertyOptions::default().located_in("instance").renamed("State"),
/// );
/// let mut hash = WireMap::new();
/// property.write_to(&mut hash, &Value::symbol("running"));
/// assert_eq!(
///     hash.get("instance").and_then(|nested| nested.as_map()?.get("State")),
///     Some(&Wire::from("running")),
/// );
/// assert_eq!(property.load_from(&hash).unwrap(), Value::symbol("running"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Property {
    name: String,
    #[serde(rename = "type", default)]
    serialized_class: TypeDescriptor,
    #[serde(default, rename = "in", skip_serializing_if = "Option::is_none")]
    serialized_location: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    serialized_name: Option<String>,
    #[serde(default)]
    always_serialize: bool,
}

impl Property {
    pub fn new(
        name: impl ToString,
        serialized_class: impl Into<TypeDescriptor>,
        options: PropertyOptions,
    ) -> Self {
        Self {
            name: name.to_string(),
            serialized_class: serialized_class.into(),
            serialized_location: options.location,
            serialized_name: options.name,
            always_serialize: options.always_serialize,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn serialized_class(&self) -> &TypeDescriptor {
        &self.serialized_class
    }

    pub fn serialized_location(&self) -> Option<&str> {
        self.serialized_location.as_deref()
    }

    /// Wire key, falling back to the property name.
    pub fn serialized_name(&self) -> &str {
        self.serialized_name.as_deref().unwrap_or(&self.name)
    }

    pub fn always_serialize(&self) -> bool {
        self.always_serialize
    }

    /// Reads this property out of a wire hash, resolving structural types
    /// against the process-wide registry.
    pub fn load_from(&self, hash: &WireMap) -> Result<Value> {
        registry::with_global(|types| self.load_from_with(hash, types))
    }

    pub fn load_from_with(&self, hash: &WireMap, types: &TypeRegistry) -> Result<Value> {
        let scope = match self.serialized_location() {
            Some(location) => match hash.get(location) {
                Some(Wire::Map(nested)) => nested,
                None | Some(Wire::Null) | Some(Wire::Bool(false)) => {
                    return Err(PropertyError::new(location, hash).into())
                }
                Some(other) => return Err(Error::NotMap(other.to_owned())),
            },
            None => hash,
        };
        let name = self.serialized_name();
        let raw = scope
            .get(name)
            .ok_or_else(|| PropertyError::new(name, scope))?;
        tracing::trace!(property = %self.name, key = name, "loading property");
        deserialize(raw, &self.serialized_class, types)
    }

    /// Writes this property into a wire hash, resolving structural types
    /// against the process-wide registry. Returns the outer hash.
    pub fn write_to<'a>(&self, hash: &'a mut WireMap, value: &Value) -> &'a mut WireMap {
        registry::with_global(|types| {
            self.write_into(hash, value, types);
        });
        hash
    }

    pub fn write_to_with<'a>(
        &self,
        hash: &'a mut WireMap,
        value: &Value,
        types: &TypeRegistry,
    ) -> &'a mut WireMap {
        self.write_into(hash, value, types);
        hash
    }

    fn write_into(&self, hash: &mut WireMap, value: &Value, types: &TypeRegistry) {
        let target = match self.serialized_location() {
            Some(location) => hash.nested_mut(location),
            None => hash,
        };
        let wire = serialize(value, &self.serialized_class, types);
        if !wire.is_null() || self.always_serialize {
            tracing::trace!(
                property = %self.name,
                key = self.serialized_name(),
                "writing property"
            );
            target.insert(self.serialized_name(), wire);
        }
    }
}

/// Coerces a raw wire value into the in-memory form of `serialized_class`.
pub fn deserialize(
    value: &Wire,
    serialized_class: &TypeDescriptor,
    types: &TypeRegistry,
) -> Result<Value> {
    match serialized_class {
        TypeDescriptor::Boolean => match value {
            Wire::Null | Wire::Bool(false) => Ok(Value::Bool(false)),
            other => Ok(Value::from(other)),
        },
        _ if value.is_null() => Ok(Value::Null),
        TypeDescriptor::Scalar => Ok(Value::from(value)),
        TypeDescriptor::Symbol => Ok(deserialize_symbol(value)),
        TypeDescriptor::LazyNamedMapping(tag) => match value {
            Wire::Map(hash) => Ok(Value::Lazy(LazyNamedMapping::new(
                tag.to_owned(),
                hash.to_owned(),
            ))),
            other => Err(Error::NotMap(other.to_owned())),
        },
        TypeDescriptor::Mapping(key_class, value_class) => match value {
            Wire::Map(hash) => hash
                .iter()
                .map(|(key, item)| {
                    let key = deserialize(&Wire::from(key), key_class, types)?;
                    let item = deserialize(item, value_class, types)?;
                    Ok((key, item))
                })
                .collect::<Result<Vec<_>>>()
                .map(Value::Mapping),
            other => Err(Error::NotMap(other.to_owned())),
        },
        TypeDescriptor::Sequence(item_class) => match value {
            Wire::Array(items) => items
                .iter()
                .map(|item| deserialize(item, item_class, types))
                .collect::<Result<Vec<_>>>()
                .map(Value::Sequence),
            other => Err(Error::NotSeq(other.to_owned())),
        },
        TypeDescriptor::Structural(tag) => match value {
            Wire::Map(hash) => types.decode(tag, hash),
            other => Err(Error::NotMap(other.to_owned())),
        },
    }
}

fn deserialize_symbol(value: &Wire) -> Value {
    match value {
        Wire::Null => Value::Null,
        Wire::String(name) => Value::Symbol(Symbol::new(name)),
        Wire::Bool(_) | Wire::Number(_) => Value::Symbol(Symbol::new(value.to_string())),
        Wire::Bytes(bytes) => Value::Symbol(Symbol::new(String::from_utf8_lossy(bytes))),
        other => Value::from(other),
    }
}

/// Coerces an in-memory value into its wire form under `serialized_class`.
///
/// Never fails: anything without a better wire form degrades to null,
/// `false` or a plain passthrough.
pub fn serialize(value: &Value, serialized_class: &TypeDescriptor, types: &TypeRegistry) -> Wire {
    if let TypeDescriptor::Boolean = serialized_class {
        return Wire::Bool(value.is_truthy());
    }
    match (serialized_class, value) {
        (_, Value::Null) => Wire::Null,
        (_, Value::Structure(structure)) => {
            encode_structural(structure.type_tag(), value, types)
        }
        (TypeDescriptor::Structural(tag), _) => encode_structural(tag, value, types),
        (TypeDescriptor::LazyNamedMapping(tag), Value::Lazy(lazy)) => {
            serialize_lazy(lazy, tag, types)
        }
        (TypeDescriptor::LazyNamedMapping(tag), Value::Mapping(entries)) => {
            let entry_class = TypeDescriptor::Structural(tag.to_owned());
            Wire::Map(
                entries
                    .iter()
                    .map(|(key, item)| {
                        (
                            serialize_key(key, &TypeDescriptor::Scalar, types),
                            serialize(item, &entry_class, types),
                        )
                    })
                    .collect(),
            )
        }
        (TypeDescriptor::Mapping(key_class, value_class), Value::Mapping(entries)) => Wire::Map(
            entries
                .iter()
                .map(|(key, item)| {
                    (
                        serialize_key(key, key_class, types),
                        serialize(item, value_class, types),
                    )
                })
                .collect(),
        ),
        (TypeDescriptor::Sequence(item_class), Value::Sequence(items)) => Wire::Array(
            items
                .iter()
                .map(|item| serialize(item, item_class, types))
                .collect(),
        ),
        (_, Value::Symbol(symbol)) => Wire::String(symbol.as_str().to_owned()),
        (_, Value::Lazy(lazy)) => serialize_lazy(lazy, lazy.entry_type(), types),
        (_, Value::Sequence(items)) => Wire::Array(
            items
                .iter()
                .map(|item| serialize(item, &TypeDescriptor::Scalar, types))
                .collect(),
        ),
        (_, Value::Mapping(entries)) => Wire::Map(
            entries
                .iter()
                .map(|(key, item)| {
                    (
                        serialize_key(key, &TypeDescriptor::Scalar, types),
                        serialize(item, &TypeDescriptor::Scalar, types),
                    )
                })
                .collect(),
        ),
        (_, Value::Bool(v)) => Wire::Bool(*v),
        (_, Value::Number(v)) => Wire::Number(v.to_owned()),
        (_, Value::String(v)) => Wire::String(v.to_owned()),
        (_, Value::Bytes(v)) => Wire::Bytes(v.to_owned()),
    }
}

fn encode_structural(tag: &TypeTag, value: &Value, types: &TypeRegistry) -> Wire {
    match types.encode(tag, value) {
        Some(hash) if !hash.is_empty() => Wire::Map(hash),
        _ => Wire::Null,
    }
}

fn serialize_key(key: &Value, key_class: &TypeDescriptor, types: &TypeRegistry) -> String {
    serialize(key, key_class, types).to_key_string()
}

/// Materialized entries go back through the entry type's encoder; entries
/// nobody touched are emitted as they arrived.
fn serialize_lazy(lazy: &LazyNamedMapping, tag: &TypeTag, types: &TypeRegistry) -> Wire {
    let entry_class = TypeDescriptor::Structural(tag.to_owned());
    Wire::Map(
        lazy.iter()
            .map(|(name, raw, decoded)| {
                let wire = match decoded {
                    Some(value) => serialize(value, &entry_class, types),
                    None => raw.to_owned(),
                };
                (name, wire)
            })
            .collect(),
    )
}
