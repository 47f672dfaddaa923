use statusline::cli::{Cli, Command, ConfigArgs, RenderArgs};
use statusline::config::{ConfigLoader, RenderContext};
use statusline::core::StatusLineGenerator;
use statusline::registry::ModuleRegistry;
use statusline::utils::init_logging;
use statusline::{Error, Result};
use std::io::{self, IsTerminal};
use std::path::PathBuf;
use std::process::ExitCode;

fn main() -> ExitCode {
    let cli = Cli::parse_args();
    init_logging(cli.debug);

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("statusline: {}", err.pretty());
            if cli.no_fail {
                println!();
                ExitCode::SUCCESS
            } else {
                ExitCode::FAILURE
            }
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    match &cli.command {
        Command::Render(args) => {
            let stdin = io::stdin();
            let context = if stdin.is_terminal() {
                tracing::warn!("render expects Claude Code JSON on stdin");
                RenderContext::default()
            } else {
                RenderContext::from_reader(stdin.lock())?
            };
            render(cli, args, context)
        }
        Command::Preview(args) => render(cli, args, RenderContext::sample()),
        Command::Config(args) => config(cli, args),
        Command::Modules => modules(cli),
    }
}

fn config_path(cli: &Cli) -> PathBuf {
    cli.config.clone().unwrap_or_else(ConfigLoader::default_path)
}

fn render(cli: &Cli, args: &RenderArgs, context: RenderContext) -> Result<()> {
    let registry = ModuleRegistry::builtin();
    let mut config = ConfigLoader::load(cli.config.as_deref())?;
    config.apply_overrides(&args.overrides());

    let generator = StatusLineGenerator::new(&registry, config)?;
    println!("{}", generator.generate(context));
    Ok(())
}

fn config(cli: &Cli, args: &ConfigArgs) -> Result<()> {
    let path = config_path(cli);

    if args.init {
        let created = ConfigLoader::init(&path, args.force).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        if created {
            println!("Created config at {}", path.display());
        } else {
            println!(
                "Config already exists at {} (use --force to overwrite)",
                path.display()
            );
        }
        return Ok(());
    }

    let config = ConfigLoader::load(Some(path.as_path()))?;

    if args.check {
        config.validate(&ModuleRegistry::builtin())?;
        println!("✓ Configuration valid");
        return Ok(());
    }

    if args.show {
        print!("{}", config.to_toml()?);
        return Ok(());
    }

    if path.exists() {
        println!("Config file: {}", path.display());
    } else {
        println!("No config file at {}", path.display());
        println!("Run 'statusline config --init' to create one.");
    }
    Ok(())
}

fn modules(cli: &Cli) -> Result<()> {
    let registry = ModuleRegistry::builtin();
    let config = ConfigLoader::load(cli.config.as_deref())?;

    println!("Module types:");
    for module_type in registry.types() {
        println!("  {:<12} {}", module_type.name, module_type.description);
        for field in &module_type.fields {
            println!("      {:<22} {}", field.name, field.description);
        }
    }

    let aliases: Vec<_> = config
        .modules
        .iter()
        .filter_map(|(key, over)| over.module_type.as_deref().map(|ty| (key, ty)))
        .collect();
    if !aliases.is_empty() {
        println!();
        println!("Aliases:");
        for (key, module_type) in aliases {
            println!("  {:<12} type = {}", key, module_type);
        }
    }
    Ok(())
}
