use super::{CollectError, Collector, SegmentData};
use crate::config::RenderContext;

pub struct ModelSegment;

impl Collector for ModelSegment {
    fn collect(&self, context: &RenderContext) -> Result<Option<SegmentData>, CollectError> {
        let model = &context.model;
        if model.id.is_empty() && model.display_name.is_empty() {
            return Ok(None);
        }

        let display_name = if model.display_name.is_empty() {
            &model.id
        } else {
            &model.display_name
        };

        Ok(Some(
            SegmentData::new()
                .with("id", model.id.as_str())
                .with("display_name", display_name.as_str()),
        ))
    }
}
