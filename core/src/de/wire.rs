use crate::{error::*, value::wire::*};
use serde::{
    de::{
        value::StrDeserializer, DeserializeSeed, EnumAccess, MapAccess, SeqAccess,
        VariantAccess, Visitor,
    },
    forward_to_deserialize_any, Deserialize,
};

/// Upper bound on what a length hint from the input may preallocate.
const PREALLOCATION_LIMIT: usize = 4096;

/// Capacity to reserve for a collection the input claims is `hint` long.
pub(crate) fn preallocation(hint: Option<usize>) -> usize {
    hint.unwrap_or_default().min(PREALLOCATION_LIMIT)
}

/// Reads typed data out of a wire value.
pub fn from_wire<'a, T>(value: &'a Wire) -> Result<T>
where
    T: Deserialize<'a>,
{
    T::deserialize(Deserializer::from_wire(value))
}

#[derive(Debug)]
pub struct Deserializer<'de> {
    input: &'de Wire,
}

impl<'de> Deserializer<'de> {
    pub fn from_wire(input: &'de Wire) -> Self {
        Self { input }
    }
}

impl<'de> serde::de::Deserializer<'de> for Deserializer<'de> {
    type Error = Error;

    fn deserialize_any<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Wire::Null => visitor.visit_unit(),
            Wire::Bool(v) => visitor.visit_bool(*v),
            Wire::Number(v) => match v {
                Number::SignedInteger(v) => visitor.visit_i64(*v),
                Number::UnsignedInteger(v) => visitor.visit_u64(*v),
                Number::Float(v) => visitor.visit_f64(*v),
            },
            Wire::String(v) => visitor.visit_borrowed_str(v),
            Wire::Bytes(v) => visitor.visit_borrowed_bytes(v),
            Wire::Array(v) => visitor.visit_seq(SeqDeserializer {
                values: v.as_slice(),
                index: 0,
            }),
            Wire::Map(v) => visitor.visit_map(MapDeserializer {
                values: v.iter().collect(),
                index: 0,
            }),
        }
    }

    fn deserialize_option<V>(self, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Wire::Null => visitor.visit_none(),
            _ => visitor.visit_some(self),
        }
    }

    fn deserialize_newtype_struct<V>(self, _: &'static str, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_enum<V>(
        self,
        _: &'static str,
        _: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.input {
            Wire::String(name) => visitor.visit_enum(EnumDeserializer {
                name,
                content: None,
            }),
            Wire::Map(map) if map.len() == 1 => {
                let (name, content) = map.iter().next().ok_or(Error::ExpectedVariant)?;
                visitor.visit_enum(EnumDeserializer {
                    name,
                    content: Some(content),
                })
            }
            _ => Err(Error::ExpectedVariant),
        }
    }

    forward_to_deserialize_any! {
        bool i8 i16 i32 i64 i128 u8 u16 u32 u64 u128 f32 f64 char str string
        bytes byte_buf unit unit_struct seq tuple
        tuple_struct map struct identifier ignored_any
    }
}

#[derive(Debug)]
pub struct SeqDeserializer<'de> {
    values: &'de [Wire],
    index: usize,
}

impl<'de> SeqAccess<'de> for SeqDeserializer<'de> {
    type Error = Error;

    fn next_element_seed<T>(&mut self, seed: T) -> Result<Option<T::Value>>
    where
        T: DeserializeSeed<'de>,
    {
        if let Some(value) = self.values.get(self.index) {
            self.index += 1;
            return seed.deserialize(Deserializer::from_wire(value)).map(Some);
        }
        Ok(None)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len() - self.index)
    }
}

#[derive(Debug)]
pub struct MapDeserializer<'de> {
    values: Vec<(&'de str, &'de Wire)>,
    index: usize,
}

impl<'de> MapAccess<'de> for MapDeserializer<'de> {
    type Error = Error;

    fn next_key_seed<K>(&mut self, seed: K) -> Result<Option<K::Value>>
    where
        K: DeserializeSeed<'de>,
    {
        if let Some((key, _)) = self.values.get(self.index) {
            return seed.deserialize(StrDeserializer::<Error>::new(*key)).map(Some);
        }
        Ok(None)
    }

    fn next_value_seed<V>(&mut self, seed: V) -> Result<V::Value>
    where
        V: DeserializeSeed<'de>,
    {
        if let Some((_, value)) = self.values.get(self.index) {
            self.index += 1;
            return seed.deserialize(Deserializer::from_wire(*value));
        }
        Err(Error::ExpectedMapEntry)
    }

    fn size_hint(&self) -> Option<usize> {
        Some(self.values.len() - self.index)
    }
}

#[derive(Debug)]
struct EnumDeserializer<'de> {
    name: &'de str,
    content: Option<&'de Wire>,
}

impl<'de> EnumAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;
    type Variant = Self;

    fn variant_seed<V>(self, seed: V) -> Result<(V::Value, Self::Variant)>
    where
        V: DeserializeSeed<'de>,
    {
        let name = seed.deserialize(StrDeserializer::<Error>::new(self.name))?;
        Ok((name, self))
    }
}

impl<'de> VariantAccess<'de> for EnumDeserializer<'de> {
    type Error = Error;

    fn unit_variant(self) -> Result<()> {
        match self.content {
            None | Some(Wire::Null) => Ok(()),
            Some(_) => Err(Error::ExpectedVariant),
        }
    }

    fn newtype_variant_seed<T>(self, seed: T) -> Result<T::Value>
    where
        T: DeserializeSeed<'de>,
    {
        match self.content {
            Some(content) => seed.deserialize(Deserializer::from_wire(content)),
            None => Err(Error::ExpectedVariant),
        }
    }

    fn tuple_variant<V>(self, _: usize, visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.content {
            Some(Wire::Array(content)) => visitor.visit_seq(SeqDeserializer {
                values: content,
                index: 0,
            }),
            _ => Err(Error::ExpectedVariant),
        }
    }

    fn struct_variant<V>(self, _: &'static [&'static str], visitor: V) -> Result<V::Value>
    where
        V: Visitor<'de>,
    {
        match self.content {
            Some(Wire::Map(content)) => visitor.visit_map(MapDeserializer {
                values: content.iter().collect(),
                index: 0,
            }),
            _ => Err(Error::ExpectedVariant),
        }
    }
}

#[derive(Copy, Clone)]
pub struct WireVisitor;

impl<'de> Visitor<'de> for WireVisitor {
    type Value = Wire;

    fn expecting(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        formatter.write_str("wire data representation")
    }

    fn visit_bool<E>(self, value: bool) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::Bool(value))
    }

    fn visit_i64<E>(self, value: i64) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::Number(Number::SignedInteger(value)))
    }

    fn visit_u64<E>(self, value: u64) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::Number(Number::UnsignedInteger(value)))
    }

    fn visit_f64<E>(self, value: f64) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::Number(Number::Float(value)))
    }

    fn visit_char<E>(self, value: char) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::String(value.to_string()))
    }

    fn visit_str<E>(self, value: &str) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::String(value.to_owned()))
    }

    fn visit_string<E>(self, value: String) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::String(value))
    }

    fn visit_bytes<E>(self, value: &[u8]) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::Bytes(value.to_vec()))
    }

    fn visit_byte_buf<E>(self, value: Vec<u8>) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::Bytes(value))
    }

    fn visit_none<E>(self) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::Null)
    }

    fn visit_some<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        deserializer.deserialize_any(WireVisitor)
    }

    fn visit_unit<E>(self) -> std::result::Result<Self::Value, E>
    where
        E: serde::de::Error,
    {
        Ok(Wire::Null)
    }

    fn visit_newtype_struct<D>(self, deserializer: D) -> std::result::Result<Self::Value, D::Error>
    where
        D: serde::de::Deserializer<'de>,
    {
        deserializer.deserialize_any(WireVisitor)
    }

    fn visit_seq<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: SeqAccess<'de>,
    {
        let mut result = Vec::with_capacity(preallocation(access.size_hint()));
        while let Some(v) = access.next_element()? {
            result.push(v);
        }
        Ok(Wire::Array(result))
    }

    fn visit_map<A>(self, mut access: A) -> std::result::Result<Self::Value, A::Error>
    where
        A: MapAccess<'de>,
    {
        let mut result = WireMap::with_capacity(preallocation(access.size_hint()));
        while let Some((k, v)) = access.next_entry::<Wire, Wire>()? {
            result.insert(k.to_key_string(), v);
        }
        Ok(Wire::Map(result))
    }
}
