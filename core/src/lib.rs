//! Schema-driven codec between in-memory attributes and untyped wire hashes.
//!
//! A [`Property`] binds one attribute to its place in a wire hash and knows how
//! to coerce its value in both directions. A [`Shape`] groups the properties of
//! one structural type; shapes live in a [`TypeRegistry`] so nested
//! `Structural(tag)` descriptors can be resolved while decoding and encoding.

pub mod de;
pub mod error;
pub mod lazy;
pub mod property;
pub mod registry;
pub mod ser;
pub mod shape;
pub mod symbol;
pub mod types;
pub mod value;


pub use crate::{
    de::wire::from_wire,
    error::{Error, PropertyError, Result},
    lazy::LazyNamedMapping,
    property::{Property, PropertyOptions},
    registry::TypeRegistry,
    ser::wire::to_wire,
    shape::{Decodable, Encodable, Shape, Structural, WireShape},
    symbol::Symbol,
    types::{DescribeType, TypeDescriptor, TypeTag},
    value::{
        attribute::{Structure, Value},
        wire::{Number, Wire, WireMap},
    },
};
#[cfg(feature = "derive")]
pub use wire_shape_derive::WireShape;
