use crate::{
    error::Result,
    property::Property,
    registry::{self, TypeRegistry},
    types::TypeTag,
    value::{
        attribute::{Structure, Value},
        wire::WireMap,
    },
};
use serde::{Deserialize, Serialize};

/// Builds a value of a structural type out of its wire hash.
pub trait Decodable: Send + Sync {
    fn decode_from_mapping(&self, hash: &WireMap, types: &TypeRegistry) -> Result<Value>;
}

/// Turns a value of a structural type into its wire hash.
///
/// `None` (and an empty hash) is emitted on the wire as null.
pub trait Encodable: Send + Sync {
    fn encode_to_mapping(&self, value: &Value, types: &TypeRegistry) -> Option<WireMap>;
}

/// A type that can take part in both directions of the codec.
pub trait Structural: Decodable + Encodable {}

impl<T> Structural for T where T: Decodable + Encodable + ?Sized {}

/// Structural type described by its properties.
///
/// Decoding loads every property into a [`Structure`] field named after the
/// property; encoding writes every field back through its property, with
/// absent fields written as null.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Shape {
    #[serde(rename = "tag")]
    type_tag: TypeTag,
    #[serde(default)]
    properties: Vec<Property>,
}

impl Shape {
    pub fn new(type_tag: impl Into<TypeTag>) -> Self {
        Self {
            type_tag: type_tag.into(),
            properties: vec![],
        }
    }

    pub fn type_tag(&self) -> &TypeTag {
        &self.type_tag
    }

    pub fn property(mut self, property: Property) -> Self {
        self.with(property);
        self
    }

    /// Adds a property, replacing one declared under the same name.
    pub fn with(&mut self, property: Property) -> &mut Self {
        if let Some(item) = self
            .properties
            .iter_mut()
            .find(|item| item.name() == property.name())
        {
            *item = property;
        } else {
            self.properties.push(property);
        }
        self
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn find(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|property| property.name() == name)
    }

    pub fn load_with(&self, hash: &WireMap, types: &TypeRegistry) -> Result<Structure> {
        let mut result = Structure::new(self.type_tag.to_owned());
        for property in &self.properties {
            result.insert(property.name(), property.load_from_with(hash, types)?);
        }
        Ok(result)
    }

    pub fn load(&self, hash: &WireMap) -> Result<Structure> {
        registry::with_global(|types| self.load_with(hash, types))
    }

    pub fn write_with(&self, structure: &Structure, types: &TypeRegistry) -> WireMap {
        let mut result = WireMap::with_capacity(self.properties.len());
        for property in &self.properties {
            match structure.get(property.name()) {
                Some(value) => property.write_to_with(&mut result, value, types),
                None => property.write_to_with(&mut result, &Value::Null, types),
            };
        }
        result
    }

    pub fn write(&self, structure: &Structure) -> WireMap {
        registry::with_global(|types| self.write_with(structure, types))
    }
}

impl Decodable for Shape {
    fn decode_from_mapping(&self, hash: &WireMap, types: &TypeRegistry) -> Result<Value> {
        self.load_with(hash, types).map(Value::Structure)
    }
}

impl Encodable for Shape {
    fn encode_to_mapping(&self, value: &Value, types: &TypeRegistry) -> Option<WireMap> {
        match value {
            Value::Structure(structure) if structure.type_tag() == &self.type_tag => {
                Some(self.write_with(structure, types))
            }
            _ => None,
        }
    }
}

/// Rust type with a declared wire shape. Prefer the `WireShape` derive macro.
pub trait WireShape {
    fn shape() -> Shape;

    /// Adds this type's shape to the process-wide registry.
    fn register() {
        registry::register_global_shape(Self::shape());
    }

    fn decode(hash: &WireMap) -> Result<Structure> {
        Self::shape().load(hash)
    }
}
