use super::types::{Config, InstanceOverride};
use crate::registry::DEFAULT_THEME;
use std::collections::BTreeMap;

pub const DEFAULT_SEPARATOR: &str = " | ";
pub const DEFAULT_TIMEOUT_MS: u64 = 500;
pub const DEFAULT_RENDER_TIMEOUT_MS: u64 = 1500;

/// Written by `config --init`
pub const DEFAULT_CONFIG_TOML: &str = r#"# Statusline configuration
# Location: ~/.claude/statusline.toml

theme = "nerd"            # nerd | ascii | emoji | minimal
color = true
separator = " | "
enabled = ["model", "workspace", "git", "context", "cost"]

# timeout_ms = 500         # bound on each module's data collection
# render_timeout_ms = 1500 # bound on the whole line

# Per-instance overrides. The table name is the instance key; without a
# `type` it is also the module type.
#
# [modules.model]
# color = "bold cyan"
# theme = "ascii"          # theme for this instance only
#
# [modules.model.themes.nerd]
# label = " "
#
# [modules.cost]
# format = "{{ theme.label }}{{ cost.total_cost_usd | format_cost }} ({{ cost.total_duration_ms | format_duration }})"
#
# A second instance of the git module type:
# [modules.branch]
# type = "git"
# format = "[dim]{{ git.branch | truncate(12) }}[/dim]"
"#;

impl Default for Config {
    fn default() -> Self {
        Config {
            theme: DEFAULT_THEME.to_string(),
            color: true,
            separator: DEFAULT_SEPARATOR.to_string(),
            enabled: Vec::new(),
            timeout_ms: DEFAULT_TIMEOUT_MS,
            render_timeout_ms: DEFAULT_RENDER_TIMEOUT_MS,
            modules: builtin_aliases(),
        }
    }
}

/// Instances every configuration knows about without declaring them
fn builtin_aliases() -> BTreeMap<String, InstanceOverride> {
    let mut modules = BTreeMap::new();
    modules.insert(
        "context_bar".to_string(),
        InstanceOverride {
            module_type: Some("context".to_string()),
            format: Some("{{ theme.label }}{{ context.used_percentage | progress_bar }}".to_string()),
            ..InstanceOverride::default()
        },
    );
    modules
}
