//! Attributes and wrapping trees.
//!
//! A metadata instance starts with one [`LeafAttribute`] per declared member.
//! Resolution never mutates a leaf: it replaces the slot with a
//! [`WrappedAttribute`] whose `original` operand is the previous slot content
//! and whose `linked` operand supplies or shares the value. Wrappers nest on
//! the `original` side; the `linked` side is always a leaf once installed by
//! the engine.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::{LinkError, LinkResult};
use crate::ids::{AttributeId, MetadataType};
use crate::relation::{RelationDeclaration, RelationKind};
use crate::value::{AttributeValue, ValueType};

/// Value-read policy stored on a wrapping.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WrapPolicy {
    Alias,
    ForceAlias,
    Mirror,
}

impl From<RelationKind> for WrapPolicy {
    fn from(kind: RelationKind) -> Self {
        match kind {
            RelationKind::AliasFor => WrapPolicy::Alias,
            RelationKind::ForceAliasFor => WrapPolicy::ForceAlias,
            RelationKind::MirrorFor => WrapPolicy::Mirror,
        }
    }
}

impl std::fmt::Display for WrapPolicy {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WrapPolicy::Alias => write!(f, "alias"),
            WrapPolicy::ForceAlias => write!(f, "force_alias"),
            WrapPolicy::Mirror => write!(f, "mirror"),
        }
    }
}

/// Precedence between an explicitly set original value and the value of
/// its `AliasFor` target. `ForceAliasFor` ignores this setting.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AliasPrecedence {
    /// The linked value wins unless it is still at its default while the
    /// original was explicitly set.
    #[default]
    Linked,
    /// An explicitly set original value wins over the linked value.
    Original,
}

/// A concrete, non-wrapping attribute slot.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct LeafAttribute {
    pub owning_type: MetadataType,
    pub name: String,
    pub value_type: ValueType,
    pub default_value: AttributeValue,
    /// Current value; equal to `default_value` unless explicitly set
    pub value: AttributeValue,
    /// Cross-attribute relation attached by the metadata-loading layer
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub relation: Option<RelationDeclaration>,
    /// Another attribute of the same instance this one is an alias of
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub alias_of: Option<String>,
}

impl LeafAttribute {
    pub fn new(
        owning_type: impl Into<MetadataType>,
        name: impl Into<String>,
        value_type: ValueType,
        default_value: impl Into<AttributeValue>,
    ) -> Self {
        let default_value = default_value.into();
        Self {
            owning_type: owning_type.into(),
            name: name.into(),
            value_type,
            value: default_value.clone(),
            default_value,
            relation: None,
            alias_of: None,
        }
    }

    /// Shorthand for a string attribute with an empty default.
    pub fn string(owning_type: impl Into<MetadataType>, name: impl Into<String>) -> Self {
        Self::new(owning_type, name, ValueType::Str, "")
    }

    pub fn with_value(mut self, value: impl Into<AttributeValue>) -> Self {
        self.value = value.into();
        self
    }

    /// Attach a relation towards `target_attribute`; `target_type` of `None`
    /// points into this attribute's own metadata type.
    pub fn with_relation(
        mut self,
        kind: RelationKind,
        target_type: Option<MetadataType>,
        target_attribute: impl Into<String>,
    ) -> Self {
        self.relation = Some(RelationDeclaration {
            attribute: self.name.clone(),
            kind,
            target_type,
            target_attribute: target_attribute.into(),
        });
        self
    }

    pub fn alias_for(
        self,
        target_type: impl Into<MetadataType>,
        target_attribute: impl Into<String>,
    ) -> Self {
        self.with_relation(
            RelationKind::AliasFor,
            Some(target_type.into()),
            target_attribute,
        )
    }

    pub fn force_alias_for(
        self,
        target_type: impl Into<MetadataType>,
        target_attribute: impl Into<String>,
    ) -> Self {
        self.with_relation(
            RelationKind::ForceAliasFor,
            Some(target_type.into()),
            target_attribute,
        )
    }

    pub fn mirror_for(self, target_attribute: impl Into<String>) -> Self {
        self.with_relation(RelationKind::MirrorFor, None, target_attribute)
    }

    pub fn alias_of(mut self, name: impl Into<String>) -> Self {
        self.alias_of = Some(name.into());
        self
    }

    pub fn id(&self) -> AttributeId {
        AttributeId::new(self.owning_type.clone(), self.name.clone())
    }

    pub fn is_default(&self) -> bool {
        self.value == self.default_value
    }
}

/// A composite attribute redirecting reads of `original` through `linked`.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedAttribute {
    pub original: Arc<Attribute>,
    pub linked: Arc<Attribute>,
    pub policy: WrapPolicy,
}

/// An attribute slot: either a leaf or a wrapping over two operands.
#[derive(Clone, Debug, PartialEq)]
pub enum Attribute {
    Leaf(LeafAttribute),
    Wrapped(WrappedAttribute),
}

impl From<LeafAttribute> for Attribute {
    fn from(leaf: LeafAttribute) -> Self {
        Attribute::Leaf(leaf)
    }
}

impl Attribute {
    pub fn wrap(original: Arc<Attribute>, linked: Arc<Attribute>, policy: WrapPolicy) -> Self {
        Attribute::Wrapped(WrappedAttribute {
            original,
            linked,
            policy,
        })
    }

    pub fn is_wrapped(&self) -> bool {
        matches!(self, Attribute::Wrapped(_))
    }

    pub fn as_leaf(&self) -> Option<&LeafAttribute> {
        match self {
            Attribute::Leaf(leaf) => Some(leaf),
            Attribute::Wrapped(_) => None,
        }
    }

    pub fn as_wrapped(&self) -> Option<&WrappedAttribute> {
        match self {
            Attribute::Wrapped(wrapped) => Some(wrapped),
            Attribute::Leaf(_) => None,
        }
    }

    pub fn original(&self) -> Option<&Arc<Attribute>> {
        self.as_wrapped().map(|w| &w.original)
    }

    pub fn linked(&self) -> Option<&Arc<Attribute>> {
        self.as_wrapped().map(|w| &w.linked)
    }

    pub fn policy(&self) -> Option<WrapPolicy> {
        self.as_wrapped().map(|w| w.policy)
    }

    /// The leaf reached by following `original` operands. A wrapper takes its
    /// identity and declarations from this leaf.
    pub fn origin(&self) -> &LeafAttribute {
        let mut current = self;
        loop {
            match current {
                Attribute::Leaf(leaf) => return leaf,
                Attribute::Wrapped(wrapped) => current = &wrapped.original,
            }
        }
    }

    pub fn name(&self) -> &str {
        &self.origin().name
    }

    pub fn owning_type(&self) -> &MetadataType {
        &self.origin().owning_type
    }

    pub fn id(&self) -> AttributeId {
        self.origin().id()
    }

    pub fn relation(&self) -> Option<&RelationDeclaration> {
        self.origin().relation.as_ref()
    }

    /// Relation declaration restricted to the given kinds.
    pub fn relation_of(&self, kinds: &[RelationKind]) -> Option<&RelationDeclaration> {
        self.relation().filter(|decl| decl.is_one_of(kinds))
    }

    pub fn value_type(&self) -> &ValueType {
        match self {
            Attribute::Leaf(leaf) => &leaf.value_type,
            Attribute::Wrapped(w) if w.policy == WrapPolicy::ForceAlias => w.linked.value_type(),
            Attribute::Wrapped(w) => w.original.value_type(),
        }
    }

    /// Whether the effective value still equals the declared default.
    pub fn is_default(&self) -> bool {
        match self {
            Attribute::Leaf(leaf) => leaf.is_default(),
            Attribute::Wrapped(w) => match w.policy {
                WrapPolicy::ForceAlias => w.linked.is_default(),
                WrapPolicy::Alias | WrapPolicy::Mirror => {
                    w.original.is_default() && w.linked.is_default()
                }
            },
        }
    }

    /// Effective value of this attribute.
    pub fn read(&self, precedence: AliasPrecedence) -> LinkResult<&AttributeValue> {
        let wrapped = match self {
            Attribute::Leaf(leaf) => return Ok(&leaf.value),
            Attribute::Wrapped(wrapped) => wrapped,
        };
        let (original, linked) = (&wrapped.original, &wrapped.linked);

        match wrapped.policy {
            WrapPolicy::ForceAlias => linked.read(precedence),
            WrapPolicy::Alias => {
                let original_wins = match precedence {
                    AliasPrecedence::Linked => linked.is_default() && !original.is_default(),
                    AliasPrecedence::Original => !original.is_default(),
                };
                if original_wins {
                    original.read(precedence)
                } else {
                    linked.read(precedence)
                }
            }
            WrapPolicy::Mirror => {
                let original_default = original.is_default();
                let linked_default = linked.is_default();
                let original_value = original.read(precedence)?;
                let linked_value = linked.read(precedence)?;
                if original_default == linked_default {
                    if original_value != linked_value {
                        return Err(LinkError::MirrorConflict {
                            original: original.id(),
                            mirror: linked.id(),
                        });
                    }
                    return Ok(original_value);
                }
                Ok(if original_default {
                    linked_value
                } else {
                    original_value
                })
            }
        }
    }

    /// Every wrapping node of this tree, outermost first.
    pub fn wrappers(&self) -> Vec<&WrappedAttribute> {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if let Attribute::Wrapped(wrapped) = node {
                found.push(wrapped);
                stack.push(&wrapped.linked);
                stack.push(&wrapped.original);
            }
        }
        found
    }

    /// Whether some wrapping in this tree already links to `linked` under
    /// `policy`.
    pub fn links_to(&self, linked: &AttributeId, policy: WrapPolicy) -> bool {
        self.wrappers()
            .iter()
            .any(|w| w.policy == policy && !w.linked.is_wrapped() && &w.linked.id() == linked)
    }

    /// All non-wrapped leaves reachable from `root`, original operands before
    /// linked ones. A leaf root yields itself.
    pub fn leaves(root: &Arc<Attribute>) -> Vec<Arc<Attribute>> {
        let mut leaves = Vec::new();
        let mut stack = vec![Arc::clone(root)];
        while let Some(node) = stack.pop() {
            match node.as_ref() {
                Attribute::Leaf(_) => leaves.push(node),
                Attribute::Wrapped(wrapped) => {
                    stack.push(Arc::clone(&wrapped.linked));
                    stack.push(Arc::clone(&wrapped.original));
                }
            }
        }
        leaves
    }
}
