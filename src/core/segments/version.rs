use super::{CollectError, Collector, SegmentData};
use crate::config::RenderContext;

pub struct VersionSegment;

impl Collector for VersionSegment {
    fn collect(&self, context: &RenderContext) -> Result<Option<SegmentData>, CollectError> {
        if context.version.is_empty() {
            return Ok(None);
        }
        Ok(Some(
            SegmentData::new().with("version", context.version.as_str()),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_version_is_not_applicable() {
        assert!(VersionSegment
            .collect(&RenderContext::default())
            .unwrap()
            .is_none());
        let ctx = RenderContext {
            version: "1.2.3".into(),
            ..RenderContext::default()
        };
        assert!(VersionSegment.collect(&ctx).unwrap().is_some());
    }
}
