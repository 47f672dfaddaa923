use super::{CollectError, Collector, SegmentData};
use crate::config::RenderContext;

pub struct CostSegment;

impl Collector for CostSegment {
    fn collect(&self, context: &RenderContext) -> Result<Option<SegmentData>, CollectError> {
        match &context.cost {
            Some(cost) => SegmentData::from_serialize(cost).map(Some),
            None => Ok(None),
        }
    }
}
