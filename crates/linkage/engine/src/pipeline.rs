use chrono::Utc;
use linkage_types::LinkResult;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::config::ResolverConfig;
use crate::context::{ResolutionContext, ResolutionReport, StageReport};
use crate::processors::{AliasAttributeProcessor, AliasForLinkProcessor, MirrorLinkProcessor};
use crate::registry::MetadataRegistry;
use crate::traits::{PostProcessor, ALIAS_FOR_LINK_ORDER};

/// Ordered collection of post-processors executed once per aggregation pass.
///
/// Processors are kept sorted by [`PostProcessor::order`] as they are added;
/// processors sharing a key keep their insertion order. Registration order
/// therefore never changes the outcome of a pass.
pub struct ResolutionPipeline {
    processors: Vec<Box<dyn PostProcessor>>,
    config: ResolverConfig,
}

impl ResolutionPipeline {
    /// Create an empty pipeline.
    pub fn new(config: ResolverConfig) -> Self {
        Self {
            processors: Vec::new(),
            config,
        }
    }

    /// Create a pipeline with the three built-in stages.
    pub fn with_default_processors(config: ResolverConfig) -> Self {
        let mut pipeline = Self::new(config);
        pipeline.add_processor(Box::new(AliasAttributeProcessor::new()));
        pipeline.add_processor(Box::new(MirrorLinkProcessor::new()));
        pipeline.add_processor(Box::new(AliasForLinkProcessor::new()));
        pipeline
    }

    /// Add a processor at the position given by its order key.
    pub fn add_processor(&mut self, processor: Box<dyn PostProcessor>) {
        let order = processor.order();
        let index = self.processors.partition_point(|p| p.order() <= order);
        self.processors.insert(index, processor);
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Processor names in execution order.
    pub fn processor_names(&self) -> Vec<&str> {
        self.processors.iter().map(|p| p.name()).collect()
    }

    fn is_enabled(&self, processor: &dyn PostProcessor) -> bool {
        self.config.include_custom_processors || processor.order() <= ALIAS_FOR_LINK_ORDER
    }

    /// Run one resolution pass over every instance of `registry`.
    ///
    /// Each processor runs across all instances before the next one starts.
    /// The first error aborts the pass; the registry may then hold partially
    /// rewritten instances and must be discarded by the caller.
    pub fn run(&self, registry: &mut dyn MetadataRegistry) -> LinkResult<ResolutionReport> {
        let pass_id = Uuid::new_v4();
        let started_at = Utc::now();
        let metadata_types = registry.metadata_types();

        info!(
            pass_id = %pass_id,
            instances = metadata_types.len(),
            processors = self.processors.len(),
            "Resolution pass started"
        );

        let mut context = ResolutionContext::new(registry, &self.config);
        let mut stages = Vec::with_capacity(self.processors.len());

        for processor in &self.processors {
            if !self.is_enabled(processor.as_ref()) {
                debug!(stage = processor.name(), "Custom processor disabled, skipping");
                continue;
            }
            debug!(
                stage = processor.name(),
                order = processor.order(),
                "Running processor"
            );

            context.begin_stage(processor.name());
            let before = context.records().len();
            for metadata_type in &metadata_types {
                if let Err(err) = processor.process(metadata_type, &mut context) {
                    warn!(
                        pass_id = %pass_id,
                        stage = processor.name(),
                        instance = %metadata_type,
                        error = %err,
                        "Resolution pass aborted"
                    );
                    return Err(err);
                }
            }

            stages.push(StageReport {
                name: processor.name().to_string(),
                order: processor.order(),
                wrapped: context.records().len() - before,
            });
        }

        let records = context.into_records();
        info!(
            pass_id = %pass_id,
            wrapped = records.len(),
            "Resolution pass completed"
        );

        Ok(ResolutionReport {
            pass_id,
            started_at,
            finished_at: Utc::now(),
            stages,
            records,
        })
    }
}

impl Default for ResolutionPipeline {
    fn default() -> Self {
        Self::with_default_processors(ResolverConfig::default())
    }
}
