use chrono::{DateTime, Utc};
use linkage_types::{AttributeId, WrapPolicy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::ResolverConfig;
use crate::registry::MetadataRegistry;

/// One wrapping installed during a pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct WrapRecord {
    /// Name of the processor that installed it
    pub stage: String,
    /// Slot that was replaced
    pub attribute: AttributeId,
    /// Leaf now linked into that slot
    pub linked: AttributeId,
    pub policy: WrapPolicy,
}

/// Context passed to every processor invocation of one resolution pass.
///
/// Owns the only handle to the registry for the duration of the pass, so
/// independent aggregations never share mutable state.
pub struct ResolutionContext<'a> {
    registry: &'a mut dyn MetadataRegistry,
    config: &'a ResolverConfig,
    stage: String,
    records: Vec<WrapRecord>,
}

impl<'a> ResolutionContext<'a> {
    pub fn new(registry: &'a mut dyn MetadataRegistry, config: &'a ResolverConfig) -> Self {
        Self {
            registry,
            config,
            stage: String::new(),
            records: Vec::new(),
        }
    }

    pub fn registry(&self) -> &dyn MetadataRegistry {
        &*self.registry
    }

    pub fn registry_mut(&mut self) -> &mut dyn MetadataRegistry {
        &mut *self.registry
    }

    pub fn config(&self) -> &ResolverConfig {
        self.config
    }

    /// Name subsequent wrap records after `stage`.
    pub fn begin_stage(&mut self, stage: impl Into<String>) {
        self.stage = stage.into();
    }

    pub fn stage(&self) -> &str {
        &self.stage
    }

    pub fn record(&mut self, attribute: AttributeId, linked: AttributeId, policy: WrapPolicy) {
        self.records.push(WrapRecord {
            stage: self.stage.clone(),
            attribute,
            linked,
            policy,
        });
    }

    pub fn records(&self) -> &[WrapRecord] {
        &self.records
    }

    pub fn into_records(self) -> Vec<WrapRecord> {
        self.records
    }
}

/// Per-processor summary of a pass.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct StageReport {
    pub name: String,
    pub order: i32,
    /// Wrappings installed by this processor across all instances
    pub wrapped: usize,
}

/// Outcome of a completed resolution pass.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ResolutionReport {
    pub pass_id: Uuid,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub stages: Vec<StageReport>,
    pub records: Vec<WrapRecord>,
}

impl ResolutionReport {
    pub fn total_wrapped(&self) -> usize {
        self.records.len()
    }

    /// Records installed into the slot `attribute`, in installation order.
    pub fn records_for(&self, attribute: &AttributeId) -> impl Iterator<Item = &WrapRecord> + '_ {
        let attribute = attribute.clone();
        self.records.iter().filter(move |r| r.attribute == attribute)
    }

    pub fn stage(&self, name: &str) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.name == name)
    }
}
