use super::{CollectError, Collector, SegmentData};
use crate::config::RenderContext;

const SUMMARY_LEN: usize = 5;

/// Recent hook activity supplied by the caller
pub struct EventsSegment;

impl Collector for EventsSegment {
    fn collect(&self, context: &RenderContext) -> Result<Option<SegmentData>, CollectError> {
        let Some(last) = context.events.last() else {
            return Ok(None);
        };

        let skip = context.events.len().saturating_sub(SUMMARY_LEN);
        let summary = context.events[skip..]
            .iter()
            .map(|event| event.tool.as_deref().unwrap_or(&event.event))
            .collect::<Vec<_>>()
            .join(" ");
        let last_time = last
            .timestamp
            .map(|at| at.format("%H:%M:%S").to_string())
            .unwrap_or_default();

        Ok(Some(
            SegmentData::new()
                .with("count", context.events.len())
                .with("last_event", last.event.as_str())
                .with("last_tool", last.tool.clone().unwrap_or_default())
                .with("last_time", last_time)
                .with("summary", summary),
        ))
    }
}
