use super::{CollectError, Collector, SegmentData};
use crate::config::RenderContext;
use std::path::Path;

pub struct WorkspaceSegment;

impl WorkspaceSegment {
    fn directory_name(path: &str) -> String {
        Path::new(path)
            .file_name()
            .and_then(|name| name.to_str())
            .map(str::to_string)
            .unwrap_or_else(|| {
                if path.is_empty() {
                    "~".to_string()
                } else {
                    path.to_string()
                }
            })
    }
}

impl Collector for WorkspaceSegment {
    fn collect(&self, context: &RenderContext) -> Result<Option<SegmentData>, CollectError> {
        let current_dir = if context.workspace.current_dir.is_empty() {
            context.cwd.as_str()
        } else {
            context.workspace.current_dir.as_str()
        };
        let project_dir = if context.workspace.project_dir.is_empty() {
            current_dir
        } else {
            context.workspace.project_dir.as_str()
        };

        Ok(Some(
            SegmentData::new()
                .with("current_dir", current_dir)
                .with("project_dir", project_dir)
                .with("name", Self::directory_name(current_dir)),
        ))
    }
}
