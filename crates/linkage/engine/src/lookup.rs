//! Relation lookup: find an attribute's declaration and resolve its target.

use std::sync::Arc;

use linkage_types::{
    Attribute, AttributeId, Instance, LinkError, LinkResult, RelationDeclaration, RelationKind,
};
use tracing::trace;

use crate::registry::MetadataRegistry;

/// The attribute's relation declaration, if it is one of `kinds`.
pub fn find_relation<'a>(
    attribute: &'a Attribute,
    kinds: &[RelationKind],
) -> Option<&'a RelationDeclaration> {
    attribute.relation_of(kinds)
}

/// The instance a declaration points into. `None` when that type takes no
/// part in the current aggregation.
pub fn resolve_target_instance<'r>(
    registry: &'r dyn MetadataRegistry,
    declaring: &Attribute,
    declaration: &RelationDeclaration,
) -> Option<&'r Instance> {
    let target_type = declaration.resolve_target_type(declaring.owning_type());
    registry.instance(&target_type)
}

/// Resolve the attribute a declaration links to.
///
/// Returns `Ok(None)` when the target instance is absent, which means the
/// relation does not apply. A target instance that exists but lacks the
/// named attribute is a [`LinkError::MissingTargetAttribute`].
pub fn resolve_linked_attribute(
    registry: &dyn MetadataRegistry,
    declaring: &Attribute,
    declaration: &RelationDeclaration,
) -> LinkResult<Option<Arc<Attribute>>> {
    let Some(target) = resolve_target_instance(registry, declaring, declaration) else {
        trace!(
            attribute = %declaring.id(),
            target_type = ?declaration.target_type,
            "Relation target not aggregated, skipping"
        );
        return Ok(None);
    };

    target
        .attribute(&declaration.target_attribute)
        .cloned()
        .map(Some)
        .ok_or_else(|| LinkError::MissingTargetAttribute {
            attribute: declaring.id(),
            target_type: target.metadata_type().clone(),
            target_attribute: declaration.target_attribute.clone(),
        })
}

/// Current content of the slot `id`, which may be newer than a snapshot
/// taken earlier in the stage.
pub fn live_attribute(registry: &dyn MetadataRegistry, id: &AttributeId) -> Option<Arc<Attribute>> {
    registry
        .instance(&id.owning_type)
        .and_then(|instance| instance.attribute(&id.name))
        .map(Arc::clone)
}
