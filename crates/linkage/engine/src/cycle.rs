//! Circular reference detection for alias links.
//!
//! The direct self-link and the immediate two-hop case (A aliases B, B
//! aliases A back) are checked per link here. Longer loops are caught by the
//! alias-for stage while it walks a chain.

use linkage_types::{Attribute, LinkError, LinkResult, RelationKind};

/// Reject an attribute linked to itself.
pub fn check_linked_self(original: &Attribute, alias: &Attribute) -> LinkResult<()> {
    let original_id = original.id();
    if original_id == alias.id() {
        return Err(LinkError::CircularReference {
            original: original_id.clone(),
            alias: original_id,
        });
    }
    Ok(())
}

/// Reject `original -> alias` when `alias` aliases `original` back.
pub fn check_circular_dependency(original: &Attribute, alias: &Attribute) -> LinkResult<()> {
    check_linked_self(original, alias)?;

    let Some(back) = alias.relation_of(&RelationKind::ALIASES) else {
        return Ok(());
    };
    let back_type = back.resolve_target_type(alias.owning_type());
    if &back_type == original.owning_type() && back.target_attribute == original.name() {
        return Err(LinkError::CircularReference {
            original: original.id(),
            alias: alias.id(),
        });
    }
    Ok(())
}
