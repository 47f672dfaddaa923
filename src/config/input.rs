use chrono::{DateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::borrow::Cow;
use std::io::Read;

/// Snapshot of facts for one render, as Claude Code pipes it on stdin
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderContext {
    pub hook_event_name: String,
    pub session_id: String,
    pub transcript_path: String,
    pub cwd: String,
    pub version: String,
    pub model: ModelInfo,
    pub workspace: WorkspaceInfo,
    pub cost: Option<CostInfo>,
    pub context_window: Option<ContextWindowInfo>,
    pub git: Option<GitInfo>,
    pub events: Vec<ActivityEvent>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ModelInfo {
    pub id: String,
    pub display_name: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkspaceInfo {
    pub current_dir: String,
    pub project_dir: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CostInfo {
    pub total_cost_usd: f64,
    pub total_duration_ms: u64,
    pub total_api_duration_ms: u64,
    pub total_lines_added: u64,
    pub total_lines_removed: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ContextWindowInfo {
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub context_window_size: u64,
    pub used_percentage: f64,
    pub remaining_percentage: f64,
}

impl Default for ContextWindowInfo {
    fn default() -> Self {
        Self {
            total_input_tokens: 0,
            total_output_tokens: 0,
            context_window_size: 200_000,
            used_percentage: 0.0,
            remaining_percentage: 100.0,
        }
    }
}

/// Repository state, when the caller already knows it
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitInfo {
    pub branch: String,
    pub oid: String,
    pub upstream: String,
    pub ahead: u32,
    pub behind: u32,
    pub dirty: bool,
}

/// One recent hook event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ActivityEvent {
    pub event: String,
    pub tool: Option<String>,
    pub timestamp: Option<DateTime<Utc>>,
}

impl RenderContext {
    /// Parse stdin JSON; malformed or empty input yields an empty context
    pub fn from_json(input: &str) -> Self {
        if input.trim().is_empty() {
            tracing::debug!("no render context on stdin");
            return Self::default();
        }
        match serde_json::from_str(input) {
            Ok(context) => context,
            Err(err) => {
                tracing::warn!(error = %err, "ignoring malformed render context");
                Self::default()
            }
        }
    }

    /// Read the whole stream; bytes that are not UTF-8 are replaced
    /// rather than failing the render
    pub fn from_reader<R: Read>(mut reader: R) -> std::io::Result<Self> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let input = String::from_utf8_lossy(&bytes);
        if let Cow::Owned(_) = input {
            tracing::warn!("render context is not valid UTF-8, replacing invalid bytes");
        }
        Ok(Self::from_json(&input))
    }

    /// Synthetic data for `preview`
    pub fn sample() -> Self {
        let at = |h, m, s| Utc.with_ymd_and_hms(2025, 1, 1, h, m, s).single();
        Self {
            hook_event_name: "Status".to_string(),
            session_id: "preview".to_string(),
            cwd: "/home/user/my-project".to_string(),
            version: "2.0.76".to_string(),
            model: ModelInfo {
                id: "claude-opus-4-5".to_string(),
                display_name: "Opus 4.5".to_string(),
            },
            workspace: WorkspaceInfo {
                current_dir: "/home/user/my-project".to_string(),
                project_dir: "/home/user/my-project".to_string(),
            },
            cost: Some(CostInfo {
                total_cost_usd: 0.0123,
                total_duration_ms: 95_000,
                total_api_duration_ms: 12_400,
                total_lines_added: 156,
                total_lines_removed: 23,
            }),
            context_window: Some(ContextWindowInfo {
                total_input_tokens: 80_000,
                total_output_tokens: 5_000,
                context_window_size: 200_000,
                used_percentage: 42.5,
                remaining_percentage: 57.5,
            }),
            git: Some(GitInfo {
                branch: "main".to_string(),
                oid: "a1b2c3d".to_string(),
                upstream: "origin/main".to_string(),
                ahead: 1,
                behind: 0,
                dirty: true,
            }),
            events: vec![
                ActivityEvent {
                    event: "PreToolUse".to_string(),
                    tool: Some("Read".to_string()),
                    timestamp: at(12, 0, 1),
                },
                ActivityEvent {
                    event: "PreToolUse".to_string(),
                    tool: Some("Edit".to_string()),
                    timestamp: at(12, 0, 7),
                },
                ActivityEvent {
                    event: "Stop".to_string(),
                    tool: None,
                    timestamp: at(12, 0, 9),
                },
            ],
            ..Self::default()
        }
    }

    /// The context as a template object; module data and theme variables are added on top
    pub fn template_context(&self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(map)) => map,
            _ => Map::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_claude_code_input() {
        let input = r#"{
            "hook_event_name": "Status",
            "session_id": "abc",
            "cwd": "/tmp/x",
            "model": { "id": "claude-opus-4-5", "display_name": "Opus 4.5" },
            "workspace": { "current_dir": "/tmp/x", "project_dir": "/tmp" },
            "version": "2.0.76",
            "cost": { "total_cost_usd": 0.5, "total_lines_added": 3 },
            "output_style": { "name": "default" }
        }"#;
        let ctx = RenderContext::from_json(input);
        assert_eq!(ctx.model.display_name, "Opus 4.5");
        assert_eq!(ctx.workspace.project_dir, "/tmp");
        assert_eq!(ctx.cost.as_ref().map(|c| c.total_lines_added), Some(3));
        assert!(ctx.context_window.is_none());
    }

    #[test]
    fn test_malformed_input_degrades_to_empty() {
        assert_eq!(RenderContext::from_json("{not json"), RenderContext::default());
        assert_eq!(RenderContext::from_json("  \n"), RenderContext::default());
    }

    #[test]
    fn test_reader_tolerates_invalid_utf8() {
        let input: &[u8] = b"{\"model\":{\"display_name\":\"Op\xffus\"},\"version\":\"2.0.76\"}";
        let ctx = RenderContext::from_reader(input).unwrap();
        assert_eq!(ctx.model.display_name, "Op\u{fffd}us");
        assert_eq!(ctx.version, "2.0.76");

        let garbage: &[u8] = b"\xff\xfe\x00";
        assert_eq!(RenderContext::from_reader(garbage).unwrap(), RenderContext::default());
    }

    #[test]
    fn test_context_window_defaults() {
        let ctx = RenderContext::from_json(r#"{ "context_window": { "used_percentage": 10 } }"#);
        let window = ctx.context_window.unwrap();
        assert_eq!(window.context_window_size, 200_000);
        assert_eq!(window.used_percentage, 10.0);
    }

    #[test]
    fn test_template_context_exposes_fields() {
        let map = RenderContext::sample().template_context();
        assert_eq!(map["model"]["display_name"], "Opus 4.5");
        assert!(map["cost"].is_object());
    }
}
