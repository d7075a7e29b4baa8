//! Shared fixtures for the linkage end-to-end and property suites.

use std::sync::Arc;

use linkage_engine::{InMemoryRegistry, MetadataRegistry, ResolutionPipeline, ResolverConfig};
use linkage_types::{Attribute, Instance, LeafAttribute, LinkResult, MetadataType};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Install a test subscriber honouring `RUST_LOG`. Safe to call repeatedly.
pub fn init_tracing() {
    let _ = tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linkage_engine=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer().without_time().with_test_writer())
        .try_init();
}

/// Build a registry from `(type, leaves)` pairs.
pub fn registry_of(instances: Vec<(&str, Vec<LeafAttribute>)>) -> InMemoryRegistry {
    instances
        .into_iter()
        .map(|(ty, leaves)| {
            Instance::from_leaves(ty, leaves).expect("fixture instance must be well formed")
        })
        .collect()
}

/// Run one pass of the default pipeline.
pub fn resolve(registry: &mut InMemoryRegistry) -> LinkResult<linkage_engine::ResolutionReport> {
    init_tracing();
    ResolutionPipeline::with_default_processors(ResolverConfig::default()).run(registry)
}

/// Current slot content of `ty.name`.
pub fn slot(registry: &InMemoryRegistry, ty: &str, name: &str) -> Arc<Attribute> {
    let instance = registry
        .instance(&MetadataType::new(ty))
        .expect("instance must exist");
    Arc::clone(instance.attribute(name).expect("attribute must exist"))
}

/// Every wrapping in the tree links a leaf.
pub fn linked_operands_are_leaves(attribute: &Attribute) -> bool {
    attribute
        .wrappers()
        .iter()
        .all(|wrapper| !wrapper.linked.is_wrapped())
}
