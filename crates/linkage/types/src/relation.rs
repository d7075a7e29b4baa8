//! Relation declarations attached to attributes by the metadata-loading layer.

use serde::{Deserialize, Serialize};

use crate::ids::MetadataType;

/// Kind of relation an attribute declares towards another attribute.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RelationKind {
    /// The declaring attribute's value is supplied by the target, unless
    /// precedence says otherwise.
    AliasFor,
    /// Like `AliasFor`, but the target's value always wins.
    ForceAliasFor,
    /// The two attributes reciprocally share one value.
    MirrorFor,
}

impl RelationKind {
    /// Kinds handled by alias-for resolution.
    pub const ALIASES: [RelationKind; 2] = [RelationKind::AliasFor, RelationKind::ForceAliasFor];

    pub fn is_alias(self) -> bool {
        matches!(self, RelationKind::AliasFor | RelationKind::ForceAliasFor)
    }
}

impl std::fmt::Display for RelationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RelationKind::AliasFor => write!(f, "alias_for"),
            RelationKind::ForceAliasFor => write!(f, "force_alias_for"),
            RelationKind::MirrorFor => write!(f, "mirror_for"),
        }
    }
}

/// Immutable statement that an attribute is linked to another attribute.
///
/// When `target_type` is absent the relation points into the declaring
/// attribute's own metadata type.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RelationDeclaration {
    /// Name of the attribute carrying this declaration
    pub attribute: String,
    pub kind: RelationKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_type: Option<MetadataType>,
    pub target_attribute: String,
}

impl RelationDeclaration {
    pub fn new(
        attribute: impl Into<String>,
        kind: RelationKind,
        target_attribute: impl Into<String>,
    ) -> Self {
        Self {
            attribute: attribute.into(),
            kind,
            target_type: None,
            target_attribute: target_attribute.into(),
        }
    }

    pub fn with_target_type(mut self, target_type: impl Into<MetadataType>) -> Self {
        self.target_type = Some(target_type.into());
        self
    }

    /// The metadata type the relation points into, falling back to the
    /// declaring attribute's owning type.
    pub fn resolve_target_type(&self, owning_type: &MetadataType) -> MetadataType {
        self.target_type
            .clone()
            .unwrap_or_else(|| owning_type.clone())
    }

    pub fn is_one_of(&self, kinds: &[RelationKind]) -> bool {
        kinds.contains(&self.kind)
    }
}
