use crate::{error::*, value::wire::*};
use serde::Serialize;

/// Turns any serializable data into its wire form.
///
/// Structs and maps become [`Wire::Map`] (map keys take their string form),
/// unit variants become their name and data-carrying variants become a
/// single-entry map keyed by the variant name.
pub fn to_wire<T>(value: &T) -> Result<Wire>
where
    T: Serialize + ?Sized,
{
    value.serialize(Serializer)
}

pub struct Serializer;

impl serde::ser::Serializer for Serializer {
    type Ok = Wire;
    type Error = Error;
    type SerializeSeq = SeqSerializer;
    type SerializeTuple = SeqSerializer;
    type SerializeTupleStruct = SeqSerializer;
    type SerializeTupleVariant = TupleVariantSerializer;
    type SerializeMap = MapSerializer;
    type SerializeStruct = StructSerializer;
    type SerializeStructVariant = StructVariantSerializer;

    fn serialize_bool(self, v: bool) -> Result<Self::Ok> {
        Ok(Wire::Bool(v))
    }

    fn serialize_i8(self, v: i8) -> Result<Self::Ok> {
        Ok(Wire::Number(Number::SignedInteger(v as _)))
    }

    fn serialize_i16(self, v: i16) -> Result<Self::Ok> {
        Ok(Wire::Number(Number::SignedInteger(v as _)))
    }

    fn serialize_i32(self, v: i32) -> Result<Self::Ok> {
        Ok(Wire::Number(Number::SignedInteger(v as _)))
    }

    fn serialize_i64(self, v: i64) -> Result<Self::Ok> {
        Ok(Wire::Number(Number::SignedInteger(v)))
    }

    fn serialize_u8(self, v: u8) -> Result<Self::Ok> {
        Ok(Wire::Number(Number::UnsignedInteger(v as _)))
    }

    fn serialize_u16(self, v: u16) -> Result<Self::Ok> {
        Ok(Wire::Number(Number::UnsignedInteger(v as _)))
    }

    fn serialize_u32(self, v: u32) -> Result<Self::Ok> {
        Ok(Wire::Number(Number::UnsignedInteger(v as _)))
    }

    fn serialize_u64(self, v: u64) -> Result<Self::Ok> {
        Ok(Wire::Number(Number::UnsignedInteger(v)))
    }

    fn serialize_f32(self, v: f32) -> Result<Self::Ok> {
        Ok(Wire::Number(Number::Float(v as _)))
    }

    fn serialize_f64(self, v: f64) -> Result<Self::Ok> {
        Ok(Wire::Number(Number::Float(v)))
    }

    fn serialize_char(self, v: char) -> Result<Self::Ok> {
        Ok(Wire::String(v.to_string()))
    }

    fn serialize_str(self, v: &str) -> Result<Self::Ok> {
        Ok(Wire::String(v.to_owned()))
    }

    fn serialize_bytes(self, v: &[u8]) -> Result<Self::Ok> {
        Ok(Wire::Bytes(v.to_vec()))
    }

    fn serialize_none(self) -> Result<Self::Ok> {
        Ok(Wire::Null)
    }

    fn serialize_some<T>(self, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_unit(self) -> Result<Self::Ok> {
        Ok(Wire::Null)
    }

    fn serialize_unit_struct(self, _: &'static str) -> Result<Self::Ok> {
        Ok(Wire::Null)
    }

    fn serialize_unit_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
    ) -> Result<Self::Ok> {
        Ok(Wire::String(variant.to_owned()))
    }

    fn serialize_newtype_struct<T>(self, _: &'static str, value: &T) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        value.serialize(self)
    }

    fn serialize_newtype_variant<T>(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        value: &T,
    ) -> Result<Self::Ok>
    where
        T: ?Sized + Serialize,
    {
        Ok(Wire::Map(
            WireMap::new().property(variant, value.serialize(self)?),
        ))
    }

    fn serialize_seq(self, len: Option<usize>) -> Result<Self::SerializeSeq> {
        Ok(SeqSerializer {
            values: match len {
                Some(len) => Vec::with_capacity(len),
                None => vec![],
            },
        })
    }

    fn serialize_tuple(self, len: usize) -> Result<Self::SerializeTuple> {
        Ok(SeqSerializer {
            values: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_struct(
        self,
        _: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleStruct> {
        Ok(SeqSerializer {
            values: Vec::with_capacity(len),
        })
    }

    fn serialize_tuple_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeTupleVariant> {
        Ok(TupleVariantSerializer {
            variant: variant.to_owned(),
            values: Vec::with_capacity(len),
        })
    }

    fn serialize_map(self, len: Option<usize>) -> Result<Self::SerializeMap> {
        Ok(MapSerializer {
            values: WireMap::with_capacity(len.unwrap_or_default()),
            key: None,
        })
    }

    fn serialize_struct(self, _: &'static str, len: usize) -> Result<Self::SerializeStruct> {
        Ok(StructSerializer {
            values: WireMap::with_capacity(len),
        })
    }

    fn serialize_struct_variant(
        self,
        _: &'static str,
        _: u32,
        variant: &'static str,
        len: usize,
    ) -> Result<Self::SerializeStructVariant> {
        Ok(StructVariantSerializer {
            variant: variant.to_owned(),
            values: WireMap::with_capacity(len),
        })
    }
}

pub struct SeqSerializer {
    values: Vec<Wire>,
}

impl serde::ser::SerializeSeq for SeqSerializer {
    type Ok = Wire;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.values.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Wire::Array(self.values))
    }
}

impl serde::ser::SerializeTuple for SeqSerializer {
    type Ok = Wire;
    type Error = Error;

    fn serialize_element<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        serde::ser::SerializeSeq::end(self)
    }
}

impl serde::ser::SerializeTupleStruct for SeqSerializer {
    type Ok = Wire;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        serde::ser::SerializeSeq::serialize_element(self, value)
    }

    fn end(self) -> Result<Self::Ok> {
        serde::ser::SerializeSeq::end(self)
    }
}

pub struct TupleVariantSerializer {
    variant: String,
    values: Vec<Wire>,
}

impl serde::ser::SerializeTupleVariant for TupleVariantSerializer {
    type Ok = Wire;
    type Error = Error;

    fn serialize_field<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.values.push(value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Wire::Map(
            WireMap::new().property(self.variant, Wire::Array(self.values)),
        ))
    }
}

pub struct MapSerializer {
    values: WireMap,
    key: Option<String>,
}

impl serde::ser::SerializeMap for MapSerializer {
    type Ok = Wire;
    type Error = Error;

    fn serialize_key<T>(&mut self, key: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.key = Some(key.serialize(Serializer)?.to_key_string());
        Ok(())
    }

    fn serialize_value<T>(&mut self, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        let key = self.key.take().ok_or(Error::ExpectedMapEntry)?;
        self.values.insert(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Self::Ok> {
        Ok(Wire::Map(self.values))
    }
}

pub struct StructSerializer {
    values: WireMap,
}

impl serde::ser::SerializeStruct for StructSerializer {
    type Ok = Wire;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.values.insert(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Wire> {
        Ok(Wire::Map(self.values))
    }
}

pub struct StructVariantSerializer {
    variant: String,
    values: WireMap,
}

impl serde::ser::SerializeStructVariant for StructVariantSerializer {
    type Ok = Wire;
    type Error = Error;

    fn serialize_field<T>(&mut self, key: &'static str, value: &T) -> Result<()>
    where
        T: ?Sized + Serialize,
    {
        self.values.insert(key, value.serialize(Serializer)?);
        Ok(())
    }

    fn end(self) -> Result<Wire> {
        Ok(Wire::Map(
            WireMap::new().property(self.variant, Wire::Map(self.values)),
        ))
    }
}
