use crate::{
    error::{Error, Result},
    registry::{self, TypeRegistry},
    types::TypeTag,
    value::{
        attribute::Value,
        wire::{Wire, WireMap},
    },
};
use std::sync::OnceLock;

#[derive(Debug, Clone)]
struct LazyEntry {
    name: String,
    raw: Wire,
    decoded: OnceLock<Value>,
}

/// Named entries of one structural type that stay in wire form until each
/// is first accessed.
///
/// Decoded entries are cached, so every entry is decoded at most once.
/// A failed decode is not cached and surfaces again on the next access.
#[derive(Debug, Clone)]
pub struct LazyNamedMapping {
    entry_type: TypeTag,
    entries: Vec<LazyEntry>,
}

impl LazyNamedMapping {
    pub fn new(entry_type: impl Into<TypeTag>, raw: WireMap) -> Self {
        Self {
            entry_type: entry_type.into(),
            entries: raw
                .into_iter()
                .map(|(name, raw)| LazyEntry {
                    name,
                    raw,
                    decoded: OnceLock::new(),
                })
                .collect(),
        }
    }

    pub fn entry_type(&self) -> &TypeTag {
        &self.entry_type
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.entry(name).is_some()
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|entry| entry.name.as_str())
    }

    fn entry(&self, name: &str) -> Option<&LazyEntry> {
        self.entries.iter().find(|entry| entry.name == name)
    }

    /// Wire form of an entry, regardless of whether it was decoded.
    pub fn raw(&self, name: &str) -> Option<&Wire> {
        self.entry(name).map(|entry| &entry.raw)
    }

    pub fn is_materialized(&self, name: &str) -> bool {
        self.entry(name)
            .map(|entry| entry.decoded.get().is_some())
            .unwrap_or_default()
    }

    /// Decoded entry, if it was already materialized.
    pub fn peek(&self, name: &str) -> Option<&Value> {
        self.entry(name).and_then(|entry| entry.decoded.get())
    }

    /// Decodes the entry against the given registry on first access.
    pub fn get_with(&self, name: &str, types: &TypeRegistry) -> Option<Result<&Value>> {
        self.entry(name).map(|entry| self.materialize(entry, types))
    }

    /// Decodes the entry against the process-wide registry on first access.
    pub fn get(&self, name: &str) -> Option<Result<&Value>> {
        registry::with_global(|types| self.get_with(name, types))
    }

    /// Decodes every entry, in wire order.
    pub fn materialize_with(&self, types: &TypeRegistry) -> Result<Vec<(&str, &Value)>> {
        self.entries
            .iter()
            .map(|entry| Ok((entry.name.as_str(), self.materialize(entry, types)?)))
            .collect()
    }

    fn materialize<'a>(&'a self, entry: &'a LazyEntry, types: &TypeRegistry) -> Result<&'a Value> {
        if let Some(value) = entry.decoded.get() {
            return Ok(value);
        }
        tracing::trace!(
            name = %entry.name,
            entry_type = %self.entry_type,
            "materializing lazy entry"
        );
        let value = match &entry.raw {
            Wire::Null => Value::Null,
            Wire::Map(hash) => types.decode(&self.entry_type, hash)?,
            other => return Err(Error::NotMap(other.to_owned())),
        };
        Ok(entry.decoded.get_or_init(|| value))
    }

    /// Entries as `(name, raw wire, decoded value if materialized)`.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Wire, Option<&Value>)> {
        self.entries
            .iter()
            .map(|entry| (entry.name.as_str(), &entry.raw, entry.decoded.get()))
    }
}

impl PartialEq for LazyNamedMapping {
    fn eq(&self, other: &Self) -> bool {
        self.entry_type == other.entry_type
            && self.entries.len() == other.entries.len()
            && self
                .entries
                .iter()
                .zip(other.entries.iter())
                .all(|(a, b)| a.name == b.name && a.raw == b.raw)
    }
}
