use crate::config::RenderOverrides;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "statusline")]
#[command(version, about = "Configurable status line for Claude Code")]
pub struct Cli {
    /// Config file (default: ~/.claude/statusline.toml)
    #[arg(short = 'c', long = "config", global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// On error, print an empty line and exit 0
    #[arg(long, global = true)]
    pub no_fail: bool,

    /// Log diagnostics to stderr
    #[arg(long, global = true)]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Render the status line from Claude Code's JSON on stdin
    Render(RenderArgs),
    /// Render the status line from built-in sample data
    Preview(RenderArgs),
    /// Show, check or create the config file
    Config(ConfigArgs),
    /// List module types and configured aliases
    Modules,
}

#[derive(Args, Debug, Clone, Default)]
pub struct RenderArgs {
    /// Comma-separated instance keys to show, in order
    #[arg(short = 'm', long, value_delimiter = ',', value_name = "KEYS")]
    pub modules: Option<Vec<String>>,

    /// Text between segments
    #[arg(short = 's', long, allow_hyphen_values = true)]
    pub separator: Option<String>,

    /// Theme for every instance (nerd, ascii, emoji, minimal)
    #[arg(short = 't', long)]
    pub theme: Option<String>,

    /// Disable colors
    #[arg(long)]
    pub no_color: bool,
}

#[derive(Args, Debug, Clone, Default)]
pub struct ConfigArgs {
    /// Write the default config file
    #[arg(long)]
    pub init: bool,

    /// Overwrite an existing file with --init
    #[arg(long, requires = "init")]
    pub force: bool,

    /// Print the effective configuration
    #[arg(long, conflicts_with = "init")]
    pub show: bool,

    /// Validate the configuration
    #[arg(long, conflicts_with = "init")]
    pub check: bool,
}

impl Cli {
    pub fn parse_args() -> Self {
        Self::parse()
    }
}

impl RenderArgs {
    pub fn overrides(&self) -> RenderOverrides {
        RenderOverrides {
            theme: self.theme.clone(),
            color: self.no_color.then_some(false),
            modules: self.modules.as_ref().map(|keys| {
                keys.iter()
                    .map(|key| key.trim())
                    .filter(|key| !key.is_empty())
                    .map(str::to_string)
                    .collect()
            }),
            separator: self.separator.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_flags() {
        let cli = Cli::parse_from([
            "statusline",
            "render",
            "--modules=model, workspace,",
            "--separator= · ",
            "--no-color",
        ]);
        let Command::Render(args) = cli.command else {
            panic!("expected render");
        };
        let overrides = args.overrides();
        assert_eq!(
            overrides.modules,
            Some(vec!["model".to_string(), "workspace".to_string()])
        );
        assert_eq!(overrides.separator.as_deref(), Some(" · "));
        assert_eq!(overrides.color, Some(false));
        assert_eq!(overrides.theme, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::parse_from(["statusline", "preview", "--theme", "emoji", "--no-fail"]);
        assert!(cli.no_fail);
        assert!(matches!(cli.command, Command::Preview(ref args) if args.theme.as_deref() == Some("emoji")));
    }

    #[test]
    fn test_force_requires_init() {
        assert!(Cli::try_parse_from(["statusline", "config", "--force"]).is_err());
        let cli = Cli::try_parse_from(["statusline", "config", "--init", "--force"]).unwrap();
        assert!(matches!(cli.command, Command::Config(ConfigArgs { init: true, force: true, .. })));
    }

    #[test]
    fn test_cli_definition() {
        use clap::CommandFactory;
        Cli::command().debug_assert();
    }
}
