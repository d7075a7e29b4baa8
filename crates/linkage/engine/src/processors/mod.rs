pub mod alias;
pub mod alias_for;
pub mod mirror;

pub use alias::AliasAttributeProcessor;
pub use alias_for::AliasForLinkProcessor;
pub use mirror::MirrorLinkProcessor;
