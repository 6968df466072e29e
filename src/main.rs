//! recipe-pin - Recipe selector preprocessor and dependency pin resolver
//!
//! Subcommands:
//! - `select`: filter a recipe template through its `# [selector]` tags
//! - `resolve`: pin dependency specifications like `numpy x.x`
//! - `render`: both, over a requirements list

use anyhow::{anyhow, bail, Context};
use clap::Parser;
use colored::Colorize;
use recipe_pin::cli::{CliArgs, Command};
use recipe_pin::config::PinConfig;
use recipe_pin::domain::{DependencyRole, OverrideVersion, Resolution, VersionSpec};
use recipe_pin::output::{create_formatter, OutputConfig};
use recipe_pin::render::{render_build_requirements, render_requirements};
use recipe_pin::resolver::{PinOverrides, VersionSpecResolver};
use recipe_pin::selector;
use std::io::{self, Read, Write};
use std::path::Path;
use std::process::ExitCode;
use tracing_subscriber::EnvFilter;

fn main() -> ExitCode {
    let args = CliArgs::parse();
    init_logging(args.verbose, args.quiet);

    match run(args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", "error:".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

/// Install the stderr log subscriber; `RUST_LOG` takes precedence over flags
fn init_logging(verbose: bool, quiet: bool) {
    let level = if quiet {
        "error"
    } else if verbose {
        "debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .with_target(false)
        .try_init();
}

/// Main application logic
fn run(args: CliArgs) -> anyhow::Result<()> {
    let config = PinConfig::load_or_default(args.config.as_deref())?;
    let output_config = OutputConfig::from_cli(args.json, args.verbose, args.quiet);

    let mut stdout = io::stdout().lock();

    match args.command {
        Command::Select { file, target } => {
            let text = read_input(&file)?;
            let ctx = target.selector_context().map_err(|e| anyhow!(e))?;
            let filtered = selector::filter(&text, &ctx)
                .with_context(|| format!("failed to filter {}", file.display()))?;
            stdout.write_all(filtered.as_bytes())?;
        }
        Command::Resolve {
            specs,
            role,
            override_version,
        } => {
            let resolver = VersionSpecResolver::new(config);
            let overrides = PinOverrides::from_env(resolver.config());
            let forced = override_version.map(OverrideVersion::from);

            let mut resolutions = Vec::with_capacity(specs.len());
            for text in &specs {
                let declared: VersionSpec = text.parse()?;
                let value = forced.as_ref().or_else(|| overrides.get(&declared.name));
                let resolved = resolver.resolve(&declared, value, role)?;
                resolutions.push(Resolution::new(declared, resolved));
            }

            create_formatter(output_config).format(&resolutions, &mut stdout)?;
        }
        Command::Render {
            file,
            role,
            run,
            target,
        } => {
            if run.is_some() && role != DependencyRole::Build {
                bail!("--run only applies with --role build");
            }

            let text = read_input(&file)?;
            let ctx = target.selector_context().map_err(|e| anyhow!(e))?;
            let resolver = VersionSpecResolver::new(config);
            let mut overrides = PinOverrides::from_env(resolver.config());
            target.apply_overrides(&mut overrides);

            let resolutions = match run {
                Some(run_file) => {
                    let run_text = read_input(&run_file)?;
                    render_build_requirements(&text, &run_text, &ctx, &resolver, &overrides)
                }
                None => render_requirements(&text, &ctx, &resolver, &overrides, role),
            }
            .with_context(|| format!("failed to render {}", file.display()))?;
            create_formatter(output_config).format(&resolutions, &mut stdout)?;
        }
    }

    stdout.flush()?;
    Ok(())
}

/// Read a file, or stdin when the path is `-`
fn read_input(path: &Path) -> anyhow::Result<String> {
    if path == Path::new("-") {
        let mut text = String::new();
        io::stdin()
            .read_to_string(&mut text)
            .context("failed to read stdin")?;
        return Ok(text);
    }

    std::fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}
