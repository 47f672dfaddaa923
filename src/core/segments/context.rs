use super::{CollectError, Collector, SegmentData};
use crate::config::RenderContext;

pub struct ContextSegment;

impl Collector for ContextSegment {
    fn collect(&self, context: &RenderContext) -> Result<Option<SegmentData>, CollectError> {
        let Some(window) = &context.context_window else {
            return Ok(None);
        };
        let total = window.total_input_tokens + window.total_output_tokens;
        Ok(Some(
            SegmentData::from_serialize(window)?.with("total_tokens", total),
        ))
    }
}
