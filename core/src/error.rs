use crate::{types::TypeTag, value::wire::{Wire, WireMap}};
use std::fmt::Display;

pub type Result<T> = std::result::Result<T, Error>;

/// A required wire key or nested location is absent from the hash it was
/// looked up in.
#[derive(Debug, Clone, PartialEq)]
pub struct PropertyError {
    key: String,
    hash: WireMap,
}

impl PropertyError {
    pub fn new(key: impl ToString, hash: &WireMap) -> Self {
        Self {
            key: key.to_string(),
            hash: hash.to_owned(),
        }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// The hash the key was checked against.
    pub fn hash(&self) -> &WireMap {
        &self.hash
    }
}

impl Display for PropertyError {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(formatter, "No such key {} in {}", self.key, self.hash)
    }
}

impl std::error::Error for PropertyError {}

#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    Message(String),
    Property(PropertyError),
    ExpectedMapEntry,
    ExpectedVariant,
    NotSeq(Wire),
    NotMap(Wire),
    UnregisteredType(TypeTag),
}

impl Error {
    pub fn as_property_error(&self) -> Option<&PropertyError> {
        match self {
            Self::Property(error) => Some(error),
            _ => None,
        }
    }

    /// Wire key a required-field-missing failure was raised for.
    pub fn missing_key(&self) -> Option<&str> {
        self.as_property_error().map(PropertyError::key)
    }
}

impl From<PropertyError> for Error {
    fn from(error: PropertyError) -> Self {
        Error::Property(error)
    }
}

impl serde::ser::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl serde::de::Error for Error {
    fn custom<T: Display>(msg: T) -> Self {
        Error::Message(msg.to_string())
    }
}

impl Display for Error {
    fn fmt(&self, formatter: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Error::Message(msg) => formatter.write_str(msg),
            Error::Property(error) => error.fmt(formatter),
            Error::ExpectedMapEntry => formatter.write_str("expected map entry"),
            Error::ExpectedVariant => formatter.write_str("expected enum variant"),
            Error::NotSeq(value) => write!(formatter, "value is not a sequence: {}", value),
            Error::NotMap(value) => write!(formatter, "value is not a map: {}", value),
            Error::UnregisteredType(tag) => {
                write!(formatter, "structural type is not registered: {}", tag)
            }
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Property(error) => Some(error),
            _ => None,
        }
    }
}
