use std::collections::{BTreeMap, BTreeSet};

use linkage_types::{AttributeId, LinkError, LinkResult, MetadataType, WrapPolicy};

use crate::context::ResolutionContext;
use crate::traits::{PostProcessor, ALIAS_NORMALIZATION_ORDER};
use crate::validate::check_attribute_type;
use crate::wrap::wrap_linked_attribute;

/// Stage 1: intra-instance alias normalization
///
/// Attributes naming another attribute of the same instance through
/// `alias_of` are force-aliased onto the root of their alias chain.
#[derive(Debug, Default)]
pub struct AliasAttributeProcessor;

impl AliasAttributeProcessor {
    pub fn new() -> Self {
        Self
    }
}

/// Follow `name` through the alias edges to the attribute that aliases
/// nothing.
fn resolve_root<'a>(
    metadata_type: &MetadataType,
    name: &'a str,
    edges: &'a BTreeMap<String, String>,
) -> LinkResult<&'a str> {
    let mut visited = BTreeSet::from([name]);
    let mut current = name;
    while let Some(next) = edges.get(current) {
        if !visited.insert(next.as_str()) {
            return Err(LinkError::CircularReference {
                original: AttributeId::new(metadata_type.clone(), name),
                alias: AttributeId::new(metadata_type.clone(), next.as_str()),
            });
        }
        current = next.as_str();
    }
    Ok(current)
}

impl PostProcessor for AliasAttributeProcessor {
    fn name(&self) -> &str {
        "alias_normalization"
    }

    fn order(&self) -> i32 {
        ALIAS_NORMALIZATION_ORDER
    }

    fn process(
        &self,
        metadata_type: &MetadataType,
        context: &mut ResolutionContext<'_>,
    ) -> LinkResult<()> {
        let Some(instance) = context.registry().instance(metadata_type) else {
            return Ok(());
        };
        let attributes = instance.attributes();

        let mut edges = BTreeMap::new();
        for (name, attribute) in &attributes {
            let Some(alias) = &attribute.origin().alias_of else {
                continue;
            };
            if !attributes.contains_key(alias) {
                return Err(LinkError::Validation(format!(
                    "no attribute named '{}' for the alias declared on {}",
                    alias,
                    attribute.id()
                )));
            }
            edges.insert(name.clone(), alias.clone());
        }

        for name in edges.keys() {
            let root_name = resolve_root(metadata_type, name, &edges)?;
            let attribute = &attributes[name];
            let root = &attributes[root_name];
            check_attribute_type(attribute, root)?;
            wrap_linked_attribute(context, &attribute.id(), root, WrapPolicy::ForceAlias);
        }
        Ok(())
    }
}
