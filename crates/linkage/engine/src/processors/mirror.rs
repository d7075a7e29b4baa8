use std::sync::Arc;

use linkage_types::{
    Attribute, AttributeId, LinkError, LinkResult, MetadataType, RelationKind, WrapPolicy,
};
use tracing::trace;

use crate::context::ResolutionContext;
use crate::cycle::check_linked_self;
use crate::lookup::{find_relation, live_attribute, resolve_linked_attribute};
use crate::traits::{PostProcessor, MIRROR_LINK_ORDER};
use crate::validate::check_attribute_type;
use crate::wrap::wrap_linked_attribute;

/// Stage 2: mirror-relation resolution
///
/// Two attributes declaring `MirrorFor` each other are wrapped symmetrically:
/// each slot gets a mirror wrapping linked to the other's leaf. A pair that
/// is already mirrored onto each other is left alone, so re-running is a
/// no-op.
#[derive(Debug, Default)]
pub struct MirrorLinkProcessor;

impl MirrorLinkProcessor {
    pub fn new() -> Self {
        Self
    }
}

/// The attribute this slot is currently mirrored onto, if any.
fn mirror_partner(attribute: &Attribute) -> Option<AttributeId> {
    attribute
        .wrappers()
        .into_iter()
        .find(|w| w.policy == WrapPolicy::Mirror)
        .map(|w| w.linked.id())
}

/// Both sides must declare the mirror relation towards each other.
fn check_mirrored_back(original: &Attribute, mirror: &Attribute) -> LinkResult<()> {
    let declared_back = find_relation(mirror, &[RelationKind::MirrorFor]).is_some_and(|back| {
        back.target_attribute == original.name()
            && &back.resolve_target_type(mirror.owning_type()) == original.owning_type()
    });
    if declared_back {
        return Ok(());
    }
    Err(LinkError::Validation(format!(
        "{} mirrors {}, but {} does not mirror it back",
        original.id(),
        mirror.id(),
        mirror.id()
    )))
}

impl PostProcessor for MirrorLinkProcessor {
    fn name(&self) -> &str {
        "mirror_link"
    }

    fn order(&self) -> i32 {
        MIRROR_LINK_ORDER
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

        for snapshot in attributes.values() {
            let Some(declaration) = find_relation(snapshot, &[RelationKind::MirrorFor]) else {
                continue;
            };
            // The partner of an earlier attribute may already have settled
            // this slot, so its wrapping state comes from the live table.
            let original = live_attribute(context.registry(), &snapshot.id())
                .unwrap_or_else(|| Arc::clone(snapshot));
            let Some(mirror) = resolve_linked_attribute(context.registry(), &original, declaration)?
            else {
                continue;
            };
            check_linked_self(&original, &mirror)?;

            match (mirror_partner(&original), mirror_partner(&mirror)) {
                (Some(partner), Some(back)) => {
                    if partner != mirror.id() || back != original.id() {
                        return Err(LinkError::Validation(format!(
                            "{} and {} are mirrored to other attributes",
                            original.id(),
                            mirror.id()
                        )));
                    }
                    trace!(attribute = %original.id(), "Mirror pair already resolved");
                }
                (None, None) => {
                    check_mirrored_back(&original, &mirror)?;
                    check_attribute_type(&original, &mirror)?;
                    wrap_linked_attribute(context, &original.id(), &mirror, WrapPolicy::Mirror);
                    wrap_linked_attribute(context, &mirror.id(), &original, WrapPolicy::Mirror);
                }
                (Some(_), None) | (None, Some(_)) => {
                    let (taken, free) = if mirror_partner(&original).is_some() {
                        (&original, &mirror)
                    } else {
                        (&mirror, &original)
                    };
                    return Err(LinkError::Validation(format!(
                        "{} is already mirrored to another attribute and cannot mirror {}",
                        taken.id(),
                        free.id()
                    )));
                }
            }
        }
        Ok(())
    }
}
