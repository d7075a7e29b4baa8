use std::collections::BTreeSet;
use std::sync::Arc;

use linkage_types::{
    Attribute, LinkError, LinkResult, MetadataType, RelationKind, WrapPolicy,
};
use tracing::debug;

use crate::context::ResolutionContext;
use crate::cycle::check_circular_dependency;
use crate::lookup::{find_relation, live_attribute, resolve_linked_attribute};
use crate::registry::MetadataRegistry;
use crate::traits::{PostProcessor, ALIAS_FOR_LINK_ORDER};
use crate::validate::check_attribute_type;
use crate::wrap::wrap_linked_attribute;

/// Stage 3: alias-for / force-alias-for resolution
///
/// Each attribute declaring `AliasFor` or `ForceAliasFor` is wrapped so its
/// reads are governed by the target attribute. When the target is already
/// wrapped (e.g. one side of a mirror pair) the original is linked to every
/// leaf of the target's tree. The two kinds differ only in the policy stored
/// on the wrapping.
///
/// Targets that alias further are linked first, so the outcome does not
/// depend on the order instances are visited in.
#[derive(Debug, Default)]
pub struct AliasForLinkProcessor;

impl AliasForLinkProcessor {
    pub fn new() -> Self {
        Self
    }
}

/// One validated link of an alias chain.
struct Hop {
    original: Arc<Attribute>,
    alias: Arc<Attribute>,
    policy: WrapPolicy,
}

/// Follow alias declarations from `start` until an attribute declares none
/// or points into an absent instance. Every hop is checked before anything
/// is rewritten; revisiting an attribute is a circular reference.
fn collect_chain(registry: &dyn MetadataRegistry, start: &Arc<Attribute>) -> LinkResult<Vec<Hop>> {
    let mut hops = Vec::new();
    let mut visited = BTreeSet::from([start.id()]);
    let mut current = Arc::clone(start);

    loop {
        let Some(declaration) = find_relation(&current, &RelationKind::ALIASES).cloned() else {
            break;
        };
        let Some(alias) = resolve_linked_attribute(registry, &current, &declaration)? else {
            break;
        };
        check_attribute_type(&current, &alias)?;
        check_circular_dependency(&current, &alias)?;
        if !visited.insert(alias.id()) {
            return Err(LinkError::CircularReference {
                original: alias.id(),
                alias: current.id(),
            });
        }

        let policy = WrapPolicy::from(declaration.kind);
        hops.push(Hop {
            original: Arc::clone(&current),
            alias: Arc::clone(&alias),
            policy,
        });
        current = alias;
    }
    Ok(hops)
}

impl PostProcessor for AliasForLinkProcessor {
    fn name(&self) -> &str {
        "alias_for_link"
    }

    fn order(&self) -> i32 {
        ALIAS_FOR_LINK_ORDER
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

        for original in attributes.values() {
            if find_relation(original, &RelationKind::ALIASES).is_none() {
                continue;
            }
            let hops = collect_chain(context.registry(), original)?;

            // Far end first: each nearer hop then sees its target settled.
            for hop in hops.iter().rev() {
                let alias_id = hop.alias.id();
                let target = live_attribute(context.registry(), &alias_id)
                    .unwrap_or_else(|| Arc::clone(&hop.alias));
                let installed =
                    wrap_linked_attribute(context, &hop.original.id(), &target, hop.policy);
                if installed == 0 {
                    debug!(
                        attribute = %hop.original.id(),
                        alias = %alias_id,
                        "Alias link already in place"
                    );
                }
            }
        }
        Ok(())
    }
}
