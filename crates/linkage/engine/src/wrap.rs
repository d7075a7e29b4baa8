//! Installation of wrapping attributes.
//!
//! A wrapping's `linked` operand is always a leaf. When the link target is
//! itself wrapped, the original is linked to every leaf of the target's tree
//! instead, so reads never unwind more than one level of indirection on the
//! linked side.

use std::sync::Arc;

use linkage_types::{Attribute, AttributeId, WrapPolicy};
use tracing::debug;

use crate::context::ResolutionContext;

/// Link the slot `original` to `target` under `policy`. Returns how many
/// wrappings were installed.
pub fn wrap_linked_attribute(
    context: &mut ResolutionContext<'_>,
    original: &AttributeId,
    target: &Arc<Attribute>,
    policy: WrapPolicy,
) -> usize {
    if !target.is_wrapped() {
        return usize::from(install(context, original, Arc::clone(target), policy));
    }
    Attribute::leaves(target)
        .into_iter()
        .filter(|leaf| install(context, original, Arc::clone(leaf), policy))
        .count()
}

/// Replace the slot `original` with `wrap(current, leaf)`. Linking a slot to
/// its own leaf, or repeating an existing link, leaves the slot untouched.
fn install(
    context: &mut ResolutionContext<'_>,
    original: &AttributeId,
    leaf: Arc<Attribute>,
    policy: WrapPolicy,
) -> bool {
    let linked = leaf.id();
    if &linked == original {
        return false;
    }
    let Some(instance) = context.registry_mut().instance_mut(&original.owning_type) else {
        return false;
    };

    let mut installed = false;
    instance.replace_attribute(&original.name, |current| {
        if current.links_to(&linked, policy) {
            return current;
        }
        installed = true;
        Arc::new(Attribute::wrap(current, leaf, policy))
    });

    if installed {
        debug!(
            stage = context.stage(),
            attribute = %original,
            linked = %linked,
            policy = %policy,
            "Wrapped attribute"
        );
        context.record(original.clone(), linked, policy);
    }
    installed
}
