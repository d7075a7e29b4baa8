//! Error types for attribute linkage

use crate::{AttributeId, MetadataType, ValueType};

/// Errors that can occur while resolving or reading linked attributes.
///
/// Every variant is fatal to the resolution pass that raised it. Relations
/// whose target instance is simply absent are skipped and never surface here.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LinkError {
    #[error("attribute {attribute} links to {target_type}.{target_attribute}, which does not exist")]
    MissingTargetAttribute {
        attribute: AttributeId,
        target_type: MetadataType,
        target_attribute: String,
    },

    #[error("validation error: {0}")]
    Validation(String),

    #[error("type mismatch between {original} ({expected}) and {target} ({found})")]
    TypeMismatch {
        original: AttributeId,
        target: AttributeId,
        expected: ValueType,
        found: ValueType,
    },

    #[error("circular reference between the alias attribute {alias} and the original attribute {original}")]
    CircularReference {
        original: AttributeId,
        alias: AttributeId,
    },

    #[error("mirrored attributes {original} and {mirror} hold different values")]
    MirrorConflict {
        original: AttributeId,
        mirror: AttributeId,
    },

    #[error("attribute not found: {0}")]
    AttributeNotFound(AttributeId),

    #[error("instance not found: {0}")]
    InstanceNotFound(MetadataType),
}

impl LinkError {
    pub fn is_circular_reference(&self) -> bool {
        matches!(self, LinkError::CircularReference { .. })
    }
}

/// Result type alias for linkage operations
pub type LinkResult<T> = Result<T, LinkError>;
