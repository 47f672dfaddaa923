use super::{CollectError, Collector, SegmentData};
use crate::config::{GitInfo, RenderContext};
use std::path::Path;
use std::process::Command;

/// Branch and working tree state; asks git when the caller did not supply it
pub struct GitSegment;

impl GitSegment {
    fn query(dir: &Path) -> Result<Option<GitInfo>, CollectError> {
        let output = Command::new("git")
            .args(["status", "--porcelain=v2", "--branch"])
            .current_dir(dir)
            .output()
            .map_err(|source| CollectError::Spawn {
                command: "git status",
                source,
            })?;

        if !output.status.success() {
            // Not a repository
            return Ok(None);
        }

        let stdout = String::from_utf8(output.stdout).map_err(|err| CollectError::Output {
            command: "git status",
            message: err.to_string(),
        })?;
        Ok(Some(parse_porcelain(&stdout)))
    }
}

/// Parse `git status --porcelain=v2 --branch`
pub fn parse_porcelain(output: &str) -> GitInfo {
    let mut info = GitInfo::default();

    for line in output.lines() {
        if let Some(head) = line.strip_prefix("# branch.head ") {
            info.branch = head.to_string();
        } else if let Some(oid) = line.strip_prefix("# branch.oid ") {
            if oid != "(initial)" {
                info.oid = oid.chars().take(7).collect();
            }
        } else if let Some(upstream) = line.strip_prefix("# branch.upstream ") {
            info.upstream = upstream.to_string();
        } else if let Some(ab) = line.strip_prefix("# branch.ab ") {
            let mut parts = ab.split_whitespace();
            if let (Some(ahead), Some(behind)) = (parts.next(), parts.next()) {
                info.ahead = ahead.trim_start_matches('+').parse().unwrap_or(0);
                info.behind = behind.trim_start_matches('-').parse().unwrap_or(0);
            }
        } else if !line.is_empty() && !line.starts_with('#') {
            info.dirty = true;
        }
    }

    if info.branch == "(detached)" {
        info.branch = if info.oid.is_empty() {
            "detached".to_string()
        } else {
            info.oid.clone()
        };
    }

    info
}

fn segment_data(info: &GitInfo) -> Result<SegmentData, CollectError> {
    let dirty_indicator = if info.dirty { "*" } else { "" };
    let mut ahead_behind = String::new();
    if info.ahead > 0 {
        ahead_behind.push_str(&format!("↑{}", info.ahead));
    }
    if info.behind > 0 {
        ahead_behind.push_str(&format!("↓{}", info.behind));
    }

    Ok(SegmentData::from_serialize(info)?
        .with("dirty_indicator", dirty_indicator)
        .with("ahead_behind", ahead_behind))
}

impl Collector for GitSegment {
    fn collect(&self, context: &RenderContext) -> Result<Option<SegmentData>, CollectError> {
        let info = match &context.git {
            Some(info) => Some(info.clone()),
            None => {
                let dir = if context.workspace.current_dir.is_empty() {
                    &context.cwd
                } else {
                    &context.workspace.current_dir
                };
                if dir.is_empty() {
                    return Ok(None);
                }
                Self::query(Path::new(dir))?
            }
        };

        match info {
            Some(info) if !info.branch.is_empty() => segment_data(&info).map(Some),
            _ => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    const STATUS: &str = "\
# branch.oid 1234567890abcdef1234567890abcdef12345678
# branch.head feature/login
# branch.upstream origin/feature/login
# branch.ab +2 -1
1 .M N... 100644 100644 100644 aaaa bbbb src/main.rs
";

    #[test]
    fn test_parse_branch_state() {
        let info = parse_porcelain(STATUS);
        assert_eq!(info.branch, "feature/login");
        assert_eq!(info.oid, "1234567");
        assert_eq!(info.upstream, "origin/feature/login");
        assert_eq!((info.ahead, info.behind), (2, 1));
        assert!(info.dirty);
    }

    #[test]
    fn test_detached_head_shows_oid() {
        let info = parse_porcelain("# branch.oid abcdef0123\n# branch.head (detached)\n");
        assert_eq!(info.branch, "abcdef0");
        assert!(!info.dirty);

        let info = parse_porcelain("# branch.oid (initial)\n# branch.head (detached)\n");
        assert_eq!(info.branch, "detached");
    }

    #[test]
    fn test_computed_fields_from_supplied_state() {
        let ctx = RenderContext {
            git: Some(GitInfo {
                branch: "main".into(),
                ahead: 3,
                dirty: true,
                ..GitInfo::default()
            }),
            ..RenderContext::default()
        };
        let data = GitSegment.collect(&ctx).unwrap().unwrap();
        assert_eq!(data.get("dirty_indicator"), Some(&json!("*")));
        assert_eq!(data.get("ahead_behind"), Some(&json!("↑3")));
    }

    #[test]
    fn test_outside_repository_is_not_applicable() {
        let dir = tempfile::tempdir().unwrap();
        let mut ctx = RenderContext::default();
        ctx.workspace.current_dir = dir.path().to_string_lossy().into_owned();
        // Either git is missing (error) or the directory is not a repository
        assert!(!matches!(GitSegment.collect(&ctx), Ok(Some(_))));
    }
}
