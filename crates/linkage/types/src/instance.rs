//! Metadata instances: one materialized metadata object and its attribute table.

use std::collections::BTreeMap;
use std::sync::Arc;

use serde::Deserialize;

use crate::attribute::{AliasPrecedence, Attribute, LeafAttribute};
use crate::error::{LinkError, LinkResult};
use crate::ids::{AttributeId, MetadataType};
use crate::value::AttributeValue;

/// Serialized form of an instance as handed over by the metadata-loading layer.
#[derive(Debug, Deserialize)]
struct InstanceDescriptor {
    metadata_type: MetadataType,
    #[serde(default)]
    attributes: Vec<LeafAttribute>,
}

/// A metadata instance participating in an aggregation.
///
/// Attribute names are unique within one instance. Slots start as leaves and
/// are replaced, never mutated in place, as resolution runs.
#[derive(Clone, Debug, PartialEq, Deserialize)]
#[serde(try_from = "InstanceDescriptor")]
pub struct Instance {
    metadata_type: MetadataType,
    attributes: BTreeMap<String, Arc<Attribute>>,
}

impl TryFrom<InstanceDescriptor> for Instance {
    type Error = LinkError;

    fn try_from(descriptor: InstanceDescriptor) -> LinkResult<Self> {
        Instance::from_leaves(descriptor.metadata_type, descriptor.attributes)
    }
}

impl Instance {
    pub fn new(metadata_type: impl Into<MetadataType>) -> Self {
        Self {
            metadata_type: metadata_type.into(),
            attributes: BTreeMap::new(),
        }
    }

    pub fn from_leaves(
        metadata_type: impl Into<MetadataType>,
        leaves: impl IntoIterator<Item = LeafAttribute>,
    ) -> LinkResult<Self> {
        let mut instance = Self::new(metadata_type);
        for leaf in leaves {
            instance.add_leaf(leaf)?;
        }
        Ok(instance)
    }

    /// Add a declared member. Fails if the name is taken or the leaf belongs
    /// to another metadata type.
    pub fn add_leaf(&mut self, leaf: LeafAttribute) -> LinkResult<()> {
        if leaf.owning_type != self.metadata_type {
            return Err(LinkError::Validation(format!(
                "attribute {} cannot be added to an instance of {}",
                leaf.id(),
                self.metadata_type
            )));
        }
        if self.attributes.contains_key(&leaf.name) {
            return Err(LinkError::Validation(format!(
                "duplicate attribute name: {}",
                leaf.id()
            )));
        }
        if let Some(relation) = &leaf.relation {
            if relation.attribute != leaf.name {
                return Err(LinkError::Validation(format!(
                    "relation declared for '{}' is attached to {}",
                    relation.attribute,
                    leaf.id()
                )));
            }
        }
        if !leaf.value.conforms_to(&leaf.value_type) {
            return Err(LinkError::Validation(format!(
                "value {} of {} does not conform to {}",
                leaf.value,
                leaf.id(),
                leaf.value_type
            )));
        }
        self.attributes
            .insert(leaf.name.clone(), Arc::new(Attribute::Leaf(leaf)));
        Ok(())
    }

    pub fn with_leaf(mut self, leaf: LeafAttribute) -> LinkResult<Self> {
        self.add_leaf(leaf)?;
        Ok(self)
    }

    pub fn metadata_type(&self) -> &MetadataType {
        &self.metadata_type
    }

    /// Snapshot of the attribute table.
    pub fn attributes(&self) -> BTreeMap<String, Arc<Attribute>> {
        self.attributes.clone()
    }

    pub fn attribute(&self, name: &str) -> Option<&Arc<Attribute>> {
        self.attributes.get(name)
    }

    pub fn attribute_names(&self) -> impl Iterator<Item = &str> {
        self.attributes.keys().map(String::as_str)
    }

    /// Replace one slot with the result of `operator` applied to its current
    /// content. Returns `false` if no such slot exists.
    pub fn replace_attribute<F>(&mut self, name: &str, operator: F) -> bool
    where
        F: FnOnce(Arc<Attribute>) -> Arc<Attribute>,
    {
        match self.attributes.get_mut(name) {
            Some(slot) => {
                let current = Arc::clone(slot);
                *slot = operator(current);
                true
            }
            None => false,
        }
    }

    /// Overwrite an existing slot. Returns the previous content.
    pub fn set_attribute(
        &mut self,
        name: &str,
        attribute: Arc<Attribute>,
    ) -> Option<Arc<Attribute>> {
        let slot = self.attributes.get_mut(name)?;
        Some(std::mem::replace(slot, attribute))
    }

    /// Effective value of the named attribute.
    pub fn value(&self, name: &str, precedence: AliasPrecedence) -> LinkResult<&AttributeValue> {
        self.attributes
            .get(name)
            .ok_or_else(|| {
                LinkError::AttributeNotFound(AttributeId::new(self.metadata_type.clone(), name))
            })?
            .read(precedence)
    }

    pub fn wrapped_count(&self) -> usize {
        self.attributes.values().filter(|a| a.is_wrapped()).count()
    }

    pub fn len(&self) -> usize {
        self.attributes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.attributes.is_empty()
    }
}
