//! Relation resolution engine for linked metadata attributes.
//!
//! Attributes of metadata instances may declare that their value is supplied
//! by, or synchronized with, another attribute elsewhere in the aggregation.
//! The engine discovers those declarations, validates them, rejects circular
//! links and rewrites the affected slots into wrapping chains.
//!
//! # Architecture
//!
//! A [`ResolutionPipeline`] holds [`PostProcessor`]s sorted by order key and
//! runs each of them over every instance of a [`MetadataRegistry`]:
//!
//! 1. [`AliasAttributeProcessor`]: intra-instance alias normalization
//! 2. [`MirrorLinkProcessor`]: symmetric `MirrorFor` pairs
//! 3. [`AliasForLinkProcessor`]: `AliasFor` / `ForceAliasFor` links
//! 4. caller-supplied processors
//!
//! # Example
//!
//! ```rust
//! use linkage_engine::{InMemoryRegistry, ResolutionPipeline, ResolverConfig};
//! use linkage_types::{AliasPrecedence, Instance, LeafAttribute};
//!
//! let mut registry = InMemoryRegistry::new();
//! registry.insert(
//!     Instance::from_leaves(
//!         "Outer",
//!         vec![LeafAttribute::string("Outer", "foo").alias_for("Inner", "bar")],
//!     )
//!     .unwrap(),
//! );
//! registry.insert(
//!     Instance::from_leaves("Inner", vec![LeafAttribute::string("Inner", "bar").with_value("x")])
//!         .unwrap(),
//! );
//!
//! let pipeline = ResolutionPipeline::with_default_processors(ResolverConfig::default());
//! pipeline.run(&mut registry).unwrap();
//!
//! let foo = registry.value(&"Outer".into(), "foo", AliasPrecedence::Linked).unwrap();
//! assert_eq!(foo.as_str(), Some("x"));
//! ```

#![deny(unsafe_code)]

pub mod config;
pub mod context;
pub mod cycle;
pub mod lookup;
pub mod pipeline;
pub mod processors;
pub mod registry;
pub mod traits;
pub mod validate;
pub mod wrap;

pub use config::ResolverConfig;
pub use context::{ResolutionContext, ResolutionReport, StageReport, WrapRecord};
pub use pipeline::ResolutionPipeline;
pub use processors::{AliasAttributeProcessor, AliasForLinkProcessor, MirrorLinkProcessor};
pub use registry::{InMemoryRegistry, MetadataRegistry};
pub use traits::{
    PostProcessor, ALIAS_FOR_LINK_ORDER, ALIAS_NORMALIZATION_ORDER, DEFAULT_ORDER,
    MIRROR_LINK_ORDER,
};
pub use wrap::wrap_linked_attribute;
