use serde::{Deserialize, Serialize};

/// Name of a metadata type (the "annotation type" an instance materializes).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct MetadataType(pub String);

impl MetadataType {
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for MetadataType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for MetadataType {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

/// Identity of an attribute: its owning metadata type plus its name.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct AttributeId {
    pub owning_type: MetadataType,
    pub name: String,
}

impl AttributeId {
    pub fn new(owning_type: impl Into<MetadataType>, name: impl Into<String>) -> Self {
        Self {
            owning_type: owning_type.into(),
            name: name.into(),
        }
    }
}

impl std::fmt::Display for AttributeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.owning_type, self.name)
    }
}
