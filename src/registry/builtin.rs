use super::{ModuleType, Theme};
use crate::core::segments::{
    ContextSegment, CostSegment, EventsSegment, GitSegment, ModelSegment, VersionSegment,
    WorkspaceSegment,
};
use std::sync::Arc;

pub fn module_types() -> Vec<ModuleType> {
    vec![model(), workspace(), git(), cost(), context(), version(), events()]
}

fn model() -> ModuleType {
    ModuleType::new(
        "model",
        "Active Claude model",
        "{{ theme.label }}{{ model.display_name }}",
        Arc::new(ModelSegment),
    )
    .with_field("id", "Model identifier, e.g. claude-opus-4-5")
    .with_field("display_name", "Human readable model name")
    .with_theme("nerd", Theme::new("\u{ee0d} ").with_color("cyan"))
    .with_theme("ascii", Theme::new("Model: "))
    .with_theme("emoji", Theme::new("🤖 "))
    .with_theme("minimal", Theme::new(""))
}

fn workspace() -> ModuleType {
    ModuleType::new(
        "workspace",
        "Current working directory",
        "{{ theme.label }}{{ workspace.name }}",
        Arc::new(WorkspaceSegment),
    )
    .with_field("current_dir", "Absolute working directory")
    .with_field("project_dir", "Project root directory")
    .with_field("name", "Last path component of current_dir")
    .with_theme("nerd", Theme::new("\u{f07b} ").with_color("blue"))
    .with_theme("ascii", Theme::new("Dir: "))
    .with_theme("emoji", Theme::new("📁 "))
    .with_theme("minimal", Theme::new(""))
}

fn git() -> ModuleType {
    ModuleType::new(
        "git",
        "Git branch and working tree state",
        "{{ theme.label }}{{ git.branch }}{{ git.dirty_indicator }}{{ git.ahead_behind }}",
        Arc::new(GitSegment),
    )
    .with_field("branch", "Branch name, or short commit id when detached")
    .with_field("oid", "Short commit id")
    .with_field("upstream", "Upstream branch, if any")
    .with_field("ahead", "Commits ahead of upstream")
    .with_field("behind", "Commits behind upstream")
    .with_field("dirty", "Whether the working tree has changes")
    .with_field("dirty_indicator", "'*' when dirty, else empty")
    .with_field("ahead_behind", "e.g. ↑2↓1, empty when in sync")
    .with_theme("nerd", Theme::new("\u{e0a0} ").with_color("green"))
    .with_theme("ascii", Theme::new("Git: "))
    .with_theme("emoji", Theme::new("🌿 "))
    .with_theme(
        "minimal",
        Theme::new("").with_format("{{ git.branch }}{{ git.dirty_indicator }}"),
    )
}

fn cost() -> ModuleType {
    ModuleType::new(
        "cost",
        "Session cost",
        "{{ theme.label }}{{ cost.total_cost_usd | format_cost }}",
        Arc::new(CostSegment),
    )
    .with_field("total_cost_usd", "Session cost in USD")
    .with_field("total_duration_ms", "Wall clock session duration")
    .with_field("total_api_duration_ms", "Time spent waiting on the API")
    .with_field("total_lines_added", "Lines added this session")
    .with_field("total_lines_removed", "Lines removed this session")
    .with_theme("nerd", Theme::new("\u{f155} ").with_color("yellow"))
    .with_theme("ascii", Theme::new("Cost: "))
    .with_theme("emoji", Theme::new("💰 "))
    .with_theme("minimal", Theme::new(""))
}

fn context() -> ModuleType {
    ModuleType::new(
        "context",
        "Context window usage",
        "{{ theme.label }}{{ context.used_percentage | format_percent }}",
        Arc::new(ContextSegment),
    )
    .with_field("total_input_tokens", "Input tokens in the context window")
    .with_field("total_output_tokens", "Output tokens in the context window")
    .with_field("total_tokens", "Input plus output tokens")
    .with_field("context_window_size", "Context window size in tokens")
    .with_field("used_percentage", "Share of the window in use")
    .with_field("remaining_percentage", "Share of the window left")
    .with_theme("nerd", Theme::new("\u{f0e4} ").with_color("magenta"))
    .with_theme(
        "ascii",
        Theme::new("Ctx: ").with_format(
            "{{ theme.label }}{{ context.used_percentage | format_percent }} of {{ context.context_window_size | format_tokens }}",
        ),
    )
    .with_theme("emoji", Theme::new("🧠 "))
    .with_theme("minimal", Theme::new(""))
}

fn version() -> ModuleType {
    ModuleType::new(
        "version",
        "Claude Code version",
        "{{ theme.label }}v{{ version.version }}",
        Arc::new(VersionSegment),
    )
    .with_field("version", "Version string reported by Claude Code")
    .with_theme("nerd", Theme::new("\u{f02b} ").with_color("bright_black"))
    .with_theme("ascii", Theme::new("CC "))
    .with_theme("emoji", Theme::new("📦 "))
    .with_theme("minimal", Theme::new(""))
}

fn events() -> ModuleType {
    ModuleType::new(
        "events",
        "Recent hook activity",
        "{{ theme.label }}{{ events.summary | truncate_left(40) }}",
        Arc::new(EventsSegment),
    )
    .with_field("count", "Number of recent events")
    .with_field("last_event", "Name of the latest hook event")
    .with_field("last_tool", "Tool of the latest event, empty if none")
    .with_field("last_time", "Time of the latest event (UTC, HH:MM:SS)")
    .with_field("summary", "Tools or event names of the last five events")
    .with_theme("nerd", Theme::new("\u{f0ae} ").with_color("bright_black"))
    .with_theme("ascii", Theme::new("Recent: "))
    .with_theme("emoji", Theme::new("⚡ "))
    .with_theme(
        "minimal",
        Theme::new("").with_format("{{ events.last_tool | default('idle') }}"),
    )
}
