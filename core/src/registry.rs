use crate::{
    error::{Error, Result},
    shape::{Shape, Structural},
    types::TypeTag,
    value::{attribute::Value, wire::WireMap},
};
use std::{
    collections::HashMap,
    sync::{Arc, PoisonError, RwLock},
};

lazy_static::lazy_static! {
    static ref GLOBAL: RwLock<TypeRegistry> = Default::default();
}

/// Structural types by tag: the table `Structural(tag)` descriptors are
/// resolved against.
#[derive(Default, Clone)]
pub struct TypeRegistry {
    structures: HashMap<TypeTag, Arc<dyn Structural>>,
}

impl TypeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_shapes(shapes: impl IntoIterator<Item = Shape>) -> Self {
        let mut result = Self::new();
        for shape in shapes {
            result.register_shape(shape);
        }
        result
    }

    pub fn register(
        &mut self,
        tag: impl Into<TypeTag>,
        structural: impl Structural + 'static,
    ) -> &mut Self {
        let tag = tag.into();
        tracing::debug!(%tag, "registering structural type");
        if self.structures.insert(tag.clone(), Arc::new(structural)).is_some() {
            tracing::debug!(%tag, "replaced previously registered structural type");
        }
        self
    }

    pub fn register_shape(&mut self, shape: Shape) -> &mut Self {
        let tag = shape.type_tag().to_owned();
        self.register(tag, shape)
    }

    pub fn with(mut self, tag: impl Into<TypeTag>, structural: impl Structural + 'static) -> Self {
        self.register(tag, structural);
        self
    }

    pub fn with_shape(mut self, shape: Shape) -> Self {
        self.register_shape(shape);
        self
    }

    pub fn unregister(&mut self, tag: &TypeTag) -> bool {
        self.structures.remove(tag).is_some()
    }

    pub fn get(&self, tag: &TypeTag) -> Option<&dyn Structural> {
        self.structures.get(tag).map(|structural| structural.as_ref())
    }

    pub fn contains(&self, tag: &TypeTag) -> bool {
        self.structures.contains_key(tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &TypeTag> {
        self.structures.keys()
    }

    pub fn len(&self) -> usize {
        self.structures.len()
    }

    pub fn is_empty(&self) -> bool {
        self.structures.is_empty()
    }

    pub fn decode(&self, tag: &TypeTag, hash: &WireMap) -> Result<Value> {
        match self.get(tag) {
            Some(structural) => structural.decode_from_mapping(hash, self),
            None => Err(Error::UnregisteredType(tag.to_owned())),
        }
    }

    /// Unregistered tags encode as nothing, since encoding cannot fail.
    pub fn encode(&self, tag: &TypeTag, value: &Value) -> Option<WireMap> {
        match self.get(tag) {
            Some(structural) => structural.encode_to_mapping(value, self),
            None => {
                tracing::warn!(%tag, "cannot encode value of unregistered structural type");
                None
            }
        }
    }
}

impl std::fmt::Debug for TypeRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut tags = self.structures.keys().collect::<Vec<_>>();
        tags.sort();
        f.debug_struct("TypeRegistry")
            .field("structures", &tags)
            .finish()
    }
}

/// Runs `f` against the process-wide registry.
///
/// The read guard is held for the whole call; `f` must not register types.
pub fn with_global<R>(f: impl FnOnce(&TypeRegistry) -> R) -> R {
    let types = GLOBAL.read().unwrap_or_else(PoisonError::into_inner);
    f(&types)
}

pub fn register_global(tag: impl Into<TypeTag>, structural: impl Structural + 'static) {
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register(tag, structural);
}

pub fn register_global_shape(shape: Shape) {
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .register_shape(shape);
}

pub fn unregister_global(tag: &TypeTag) -> bool {
    GLOBAL
        .write()
        .unwrap_or_else(PoisonError::into_inner)
        .unregister(tag)
}

pub fn is_registered_global(tag: &TypeTag) -> bool {
    with_global(|types| types.contains(tag))
}
