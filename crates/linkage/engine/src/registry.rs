//! Registry of the instances taking part in one aggregation.

use std::collections::BTreeMap;

use linkage_types::{
    AliasPrecedence, AttributeValue, Instance, LinkError, LinkResult, MetadataType,
};

/// Lookup and mutation surface over all instances of one aggregation.
///
/// Implemented by the surrounding metadata system; how instances are
/// discovered and which one wins when a type is reachable twice is its
/// concern, not the engine's.
pub trait MetadataRegistry {
    /// Look up the aggregated instance of a metadata type.
    fn instance(&self, metadata_type: &MetadataType) -> Option<&Instance>;

    /// Mutable access used to replace attribute slots.
    fn instance_mut(&mut self, metadata_type: &MetadataType) -> Option<&mut Instance>;

    /// Snapshot of every metadata type currently registered, in iteration order.
    fn metadata_types(&self) -> Vec<MetadataType>;
}

/// In-memory registry keyed by metadata type, iterated in type-name order.
#[derive(Clone, Debug, Default)]
pub struct InMemoryRegistry {
    instances: BTreeMap<MetadataType, Instance>,
}

impl InMemoryRegistry {
    pub fn new() -> Self {
        Self {
            instances: BTreeMap::new(),
        }
    }

    /// Register an instance, returning the one it replaced, if any.
    pub fn insert(&mut self, instance: Instance) -> Option<Instance> {
        self.instances
            .insert(instance.metadata_type().clone(), instance)
    }

    pub fn remove(&mut self, metadata_type: &MetadataType) -> Option<Instance> {
        self.instances.remove(metadata_type)
    }

    pub fn get(&self, metadata_type: &MetadataType) -> LinkResult<&Instance> {
        self.instances
            .get(metadata_type)
            .ok_or_else(|| LinkError::InstanceNotFound(metadata_type.clone()))
    }

    /// Effective value of `metadata_type.attribute`.
    pub fn value(
        &self,
        metadata_type: &MetadataType,
        attribute: &str,
        precedence: AliasPrecedence,
    ) -> LinkResult<&AttributeValue> {
        self.get(metadata_type)?.value(attribute, precedence)
    }

    pub fn instances(&self) -> impl Iterator<Item = &Instance> {
        self.instances.values()
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }
}

impl MetadataRegistry for InMemoryRegistry {
    fn instance(&self, metadata_type: &MetadataType) -> Option<&Instance> {
        self.instances.get(metadata_type)
    }

    fn instance_mut(&mut self, metadata_type: &MetadataType) -> Option<&mut Instance> {
        self.instances.get_mut(metadata_type)
    }

    fn metadata_types(&self) -> Vec<MetadataType> {
        self.instances.keys().cloned().collect()
    }
}

impl FromIterator<Instance> for InMemoryRegistry {
    fn from_iter<I: IntoIterator<Item = Instance>>(iter: I) -> Self {
        let mut registry = Self::new();
        for instance in iter {
            registry.insert(instance);
        }
        registry
    }
}
