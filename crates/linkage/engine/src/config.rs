//! Resolver configuration

use std::path::Path;

use linkage_types::{AliasPrecedence, Attribute, AttributeValue, LinkError, LinkResult};
use serde::{Deserialize, Serialize};

/// Configuration for a resolution pipeline.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// Read precedence for plain `AliasFor` links (default: linked value wins)
    pub alias_precedence: AliasPrecedence,
    /// Whether processors ordered after the built-in stages run (default: true)
    pub include_custom_processors: bool,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            alias_precedence: AliasPrecedence::Linked,
            include_custom_processors: true,
        }
    }
}

impl ResolverConfig {
    /// Load configuration from a TOML file. A missing file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> LinkResult<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let contents = std::fs::read_to_string(path).map_err(|e| {
            LinkError::Validation(format!("cannot read config {}: {}", path.display(), e))
        })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> LinkResult<Self> {
        toml::from_str(contents).map_err(|e| LinkError::Validation(format!("invalid config: {}", e)))
    }

    pub fn with_alias_precedence(mut self, precedence: AliasPrecedence) -> Self {
        self.alias_precedence = precedence;
        self
    }

    /// Effective value of `attribute` under the configured precedence.
    pub fn read<'a>(&self, attribute: &'a Attribute) -> LinkResult<&'a AttributeValue> {
        attribute.read(self.alias_precedence)
    }
}
