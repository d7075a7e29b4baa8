//! Core type definitions for attribute linkage.
//!
//! This crate provides the shared data model: identifiers, attribute values,
//! relation declarations, wrapping trees and metadata instances. No resolution
//! logic lives here. The pipeline that rewrites instances is in `linkage-engine`.

pub mod attribute;
pub mod error;
pub mod ids;
pub mod instance;
pub mod relation;
pub mod value;

// Re-export primary types at crate root for ergonomic use.
pub use attribute::{AliasPrecedence, Attribute, LeafAttribute, WrapPolicy, WrappedAttribute};
pub use error::{LinkError, LinkResult};
pub use ids::{AttributeId, MetadataType};
pub use instance::Instance;
pub use relation::{RelationDeclaration, RelationKind};
pub use value::{AttributeValue, ValueType};
