use linkage_types::{LinkResult, MetadataType};

use crate::context::ResolutionContext;

/// Order key of intra-instance alias normalization.
pub const ALIAS_NORMALIZATION_ORDER: i32 = i32::MIN;
/// Order key of mirror-relation resolution.
pub const MIRROR_LINK_ORDER: i32 = i32::MIN + 1;
/// Order key of alias-for / force-alias-for resolution.
pub const ALIAS_FOR_LINK_ORDER: i32 = i32::MIN + 2;
/// Order key of processors that do not choose one.
pub const DEFAULT_ORDER: i32 = i32::MAX;

/// A unit of the resolution pipeline.
///
/// Processors run in ascending [`order`](PostProcessor::order). Each is
/// invoked once per instance of the aggregation, and must iterate a
/// snapshot of the instance's attribute table while replacing slots in the
/// live one.
pub trait PostProcessor: Send + Sync {
    /// Human-readable name of this processor.
    fn name(&self) -> &str;

    /// Position in the pipeline; lower runs first.
    fn order(&self) -> i32 {
        DEFAULT_ORDER
    }

    /// Inspect and rewrite the instance of `metadata_type`.
    ///
    /// Any error aborts the whole pass.
    fn process(
        &self,
        metadata_type: &MetadataType,
        context: &mut ResolutionContext<'_>,
    ) -> LinkResult<()>;
}
