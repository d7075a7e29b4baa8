use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use linkage_engine::{
    AliasAttributeProcessor, AliasForLinkProcessor, InMemoryRegistry, MetadataRegistry,
    MirrorLinkProcessor, PostProcessor, ResolutionContext, ResolutionPipeline, ResolverConfig,
    ALIAS_FOR_LINK_ORDER, DEFAULT_ORDER,
};
use linkage_tests::{init_tracing, registry_of};
use linkage_types::{LinkResult, MetadataType};

/// Records whether every slot it sees is already resolved.
struct InspectingProcessor {
    order: i32,
    saw_unresolved: Arc<AtomicBool>,
    calls: Arc<AtomicUsize>,
}

impl InspectingProcessor {
    fn new(order: i32) -> Self {
        Self {
            order,
            saw_unresolved: Arc::new(AtomicBool::new(false)),
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }
}

impl PostProcessor for InspectingProcessor {
    fn name(&self) -> &str {
        "inspect"
    }

    fn order(&self) -> i32 {
        self.order
    }

    fn process(
        &self,
        metadata_type: &MetadataType,
        context: &mut ResolutionContext<'_>,
    ) -> LinkResult<()> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(instance) = context.registry().instance(metadata_type) {
            let unresolved = instance
                .attributes()
                .values()
                .any(|a| a.relation().is_some() && !a.is_wrapped());
            if unresolved {
                self.saw_unresolved.store(true, Ordering::SeqCst);
            }
        }
        Ok(())
    }
}

fn mixed_registry() -> InMemoryRegistry {
    use linkage_types::LeafAttribute;

    registry_of(vec![
        (
            "A",
            vec![
                LeafAttribute::string("A", "foo").alias_for("B", "value"),
                LeafAttribute::string("A", "title").alias_of("foo"),
            ],
        ),
        (
            "B",
            vec![
                LeafAttribute::string("B", "value").mirror_for("name"),
                LeafAttribute::string("B", "name").with_value("n").mirror_for("value"),
            ],
        ),
    ])
}

#[test]
fn insertion_order_does_not_matter() {
    let mut pipeline = ResolutionPipeline::new(ResolverConfig::default());
    pipeline.add_processor(Box::new(InspectingProcessor::new(DEFAULT_ORDER)));
    pipeline.add_processor(Box::new(AliasForLinkProcessor::new()));
    pipeline.add_processor(Box::new(MirrorLinkProcessor::new()));
    pipeline.add_processor(Box::new(AliasAttributeProcessor::new()));

    assert_eq!(
        pipeline.processor_names(),
        vec!["alias_normalization", "mirror_link", "alias_for_link", "inspect"]
    );

    let mut reversed = mixed_registry();
    let mut expected = mixed_registry();
    init_tracing();
    pipeline.run(&mut reversed).unwrap();
    ResolutionPipeline::default().run(&mut expected).unwrap();

    let reversed: Vec<_> = reversed.instances().cloned().collect();
    let expected: Vec<_> = expected.instances().cloned().collect();
    assert_eq!(reversed, expected);
}

#[test]
fn custom_processor_sees_resolved_instances() {
    let inspector = InspectingProcessor::new(DEFAULT_ORDER);
    let saw_unresolved = Arc::clone(&inspector.saw_unresolved);
    let calls = Arc::clone(&inspector.calls);

    let mut pipeline = ResolutionPipeline::with_default_processors(ResolverConfig::default());
    pipeline.add_processor(Box::new(inspector));

    let mut registry = mixed_registry();
    init_tracing();
    let report = pipeline.run(&mut registry).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 2);
    assert!(!saw_unresolved.load(Ordering::SeqCst));
    let orders: Vec<i32> = report.stages.iter().map(|s| s.order).collect();
    let mut sorted = orders.clone();
    sorted.sort();
    assert_eq!(orders, sorted);
}

#[test]
fn processor_before_built_ins_sees_leaves() {
    let inspector = InspectingProcessor::new(i32::MIN);
    let saw_unresolved = Arc::clone(&inspector.saw_unresolved);

    let mut pipeline = ResolutionPipeline::with_default_processors(ResolverConfig::default());
    pipeline.add_processor(Box::new(inspector));
    assert_eq!(pipeline.processor_names()[0], "alias_normalization");
    assert_eq!(pipeline.processor_names()[1], "inspect");

    let mut registry = mixed_registry();
    init_tracing();
    pipeline.run(&mut registry).unwrap();
    assert!(saw_unresolved.load(Ordering::SeqCst));
}

#[test]
fn mirrors_settle_before_alias_for() {
    let mut registry = mixed_registry();
    init_tracing();
    let report = ResolutionPipeline::default().run(&mut registry).unwrap();

    let stages: Vec<&str> = report.stages.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(stages, vec!["alias_normalization", "mirror_link", "alias_for_link"]);

    let last_mirror = report
        .records
        .iter()
        .rposition(|r| r.stage == "mirror_link")
        .unwrap();
    let first_alias_for = report
        .records
        .iter()
        .position(|r| r.stage == "alias_for_link")
        .unwrap();
    assert!(last_mirror < first_alias_for);

    // A.foo reaches both leaves of the mirror pair.
    let foo = registry
        .instance(&"A".into())
        .unwrap()
        .attribute("foo")
        .unwrap()
        .clone();
    assert_eq!(foo.wrappers().len(), 2);
}

#[test]
fn custom_processors_can_be_disabled() {
    let inspector = InspectingProcessor::new(ALIAS_FOR_LINK_ORDER + 1);
    let calls = Arc::clone(&inspector.calls);

    let config = ResolverConfig::from_toml_str("include_custom_processors = false").unwrap();
    let mut pipeline = ResolutionPipeline::with_default_processors(config);
    pipeline.add_processor(Box::new(inspector));

    let mut registry = mixed_registry();
    init_tracing();
    let report = pipeline.run(&mut registry).unwrap();

    assert_eq!(calls.load(Ordering::SeqCst), 0);
    assert!(report.stage("inspect").is_none());
    assert_eq!(report.stages.len(), 3);
}
