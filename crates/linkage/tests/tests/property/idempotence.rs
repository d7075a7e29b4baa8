//! Property tests: resolving an already resolved aggregation changes nothing.
//!
//! A second pass must install no wrapping, leave every slot identical and keep
//! every `linked` operand a leaf.

use linkage_engine::{wrap_linked_attribute, ResolutionContext, ResolverConfig};
use linkage_tests::{linked_operands_are_leaves, registry_of, resolve, slot};
use linkage_types::{AliasPrecedence, AttributeValue, LeafAttribute, RelationKind, WrapPolicy};
use proptest::prelude::*;

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_alias_kind() -> impl Strategy<Value = RelationKind> {
    prop_oneof![Just(RelationKind::AliasFor), Just(RelationKind::ForceAliasFor)]
}

fn arb_name() -> impl Strategy<Value = String> {
    "[a-z]{1,8}"
}

/// Empty strings stay at the default.
fn arb_value() -> impl Strategy<Value = String> {
    prop_oneof![Just(String::new()), "[a-z]{1,6}"]
}

fn read_all(registry: &linkage_engine::InMemoryRegistry) -> Vec<Option<AttributeValue>> {
    registry
        .instances()
        .flat_map(|instance| {
            instance
                .attribute_names()
                .map(|name| instance.value(name, AliasPrecedence::Linked).ok().cloned())
                .collect::<Vec<_>>()
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    /// A second pass over a resolved aggregation installs nothing.
    #[test]
    fn second_pass_is_a_no_op(
        source in arb_name(),
        target in arb_name(),
        kind in arb_alias_kind(),
        source_value in arb_value(),
        target_value in arb_value(),
        mirrored in any::<bool>(),
    ) {
        let partner = format!("{}_mirror", target);
        let mut target_leaf = LeafAttribute::string("Inner", target.as_str()).with_value(target_value);
        let mut inner = Vec::new();
        if mirrored {
            target_leaf = target_leaf.mirror_for(partner.as_str());
            inner.push(LeafAttribute::string("Inner", partner.as_str()).mirror_for(target.as_str()));
        }
        inner.push(target_leaf);

        let mut registry = registry_of(vec![
            (
                "Outer",
                vec![LeafAttribute::string("Outer", source.as_str())
                    .with_value(source_value)
                    .with_relation(kind, Some("Inner".into()), target.as_str())],
            ),
            ("Inner", inner),
        ]);

        resolve(&mut registry).unwrap();
        let instances: Vec<_> = registry.instances().cloned().collect();
        let values = read_all(&registry);

        let report = resolve(&mut registry).unwrap();
        prop_assert_eq!(report.total_wrapped(), 0);
        prop_assert_eq!(registry.instances().cloned().collect::<Vec<_>>(), instances);
        prop_assert_eq!(read_all(&registry), values);

        let resolved = slot(&registry, "Outer", &source);
        prop_assert!(resolved.is_wrapped());
        prop_assert!(linked_operands_are_leaves(&resolved));
    }

    /// Linking the same leaf twice installs exactly one wrapping.
    #[test]
    fn repeated_wrap_installs_once(
        policy in prop_oneof![
            Just(WrapPolicy::Alias),
            Just(WrapPolicy::ForceAlias),
            Just(WrapPolicy::Mirror),
        ],
        value in arb_value(),
    ) {
        let mut registry = registry_of(vec![
            ("A", vec![LeafAttribute::string("A", "foo")]),
            ("B", vec![LeafAttribute::string("B", "bar").with_value(value)]),
        ]);
        let target = slot(&registry, "B", "bar");
        let original = slot(&registry, "A", "foo").id();
        let config = ResolverConfig::default();
        let mut context = ResolutionContext::new(&mut registry, &config);

        prop_assert_eq!(wrap_linked_attribute(&mut context, &original, &target, policy), 1);
        let once = context.registry().instance(&"A".into()).unwrap().clone();
        prop_assert_eq!(wrap_linked_attribute(&mut context, &original, &target, policy), 0);
        prop_assert_eq!(context.registry().instance(&"A".into()).unwrap(), &once);
        prop_assert_eq!(context.records().len(), 1);
    }
}
