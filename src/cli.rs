//! CLI argument parsing module for recipe-pin

use crate::domain::{DependencyRole, OverrideVersion};
use crate::resolver::PinOverrides;
use crate::selector::{parse_definition, Platform, SelectorContext, SelectorValue};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Parse a `2.7` / `27` version into the compact integer form (`27`)
fn parse_compact_version(s: &str) -> Result<i64, String> {
    let compact: String = s.trim().chars().filter(|c| *c != '.').collect();
    compact
        .parse()
        .map_err(|_| format!("invalid version '{}': expected digits like 27 or 2.7", s))
}

/// Recipe selector preprocessor and dependency pin resolver
#[derive(Parser, Debug, Clone)]
#[command(name = "recipe-pin", version, about = "Recipe selector preprocessor and dependency pin resolver")]
pub struct CliArgs {
    #[command(subcommand)]
    pub command: Command,

    /// Pin configuration file (default: built-in table)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Enable quiet mode - only errors are logged
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Filter a recipe template through its selectors
    Select {
        /// Template file, or `-` for stdin
        file: PathBuf,

        #[command(flatten)]
        target: TargetArgs,
    },

    /// Resolve dependency specifications such as `numpy x.x`
    Resolve {
        /// Dependency specifications (`name[ version][ build]`)
        #[arg(required = true)]
        specs: Vec<String>,

        /// Dependency role
        #[arg(long, default_value = "run")]
        role: DependencyRole,

        /// Override version applied to every spec (default: per-package environment)
        #[arg(long = "override", value_name = "VERSION")]
        override_version: Option<String>,
    },

    /// Filter a requirements list and resolve every entry
    Render {
        /// Requirements file, or `-` for stdin
        file: PathBuf,

        /// Dependency role
        #[arg(long, default_value = "run")]
        role: DependencyRole,

        /// Run requirements file; its `x.x` entries also pin the build list
        #[arg(long, value_name = "FILE")]
        run: Option<PathBuf>,

        #[command(flatten)]
        target: TargetArgs,
    },
}

/// Options describing the build target
#[derive(Args, Debug, Clone, Default)]
pub struct TargetArgs {
    /// Target platform (default: the running platform)
    #[arg(long)]
    pub platform: Option<Platform>,

    /// Python version (e.g. 27 or 2.7)
    #[arg(long, env = "CONDA_PY", value_parser = parse_compact_version)]
    pub py: Option<i64>,

    /// NumPy version (e.g. 18 or 1.10)
    #[arg(long, env = "CONDA_NPY")]
    pub npy: Option<String>,

    /// Define a selector variable (NAME=VALUE, can be specified multiple times)
    #[arg(short = 'D', long = "define", value_parser = parse_definition)]
    pub defines: Vec<(String, SelectorValue)>,
}

impl TargetArgs {
    /// Builds the selector namespace for this target
    pub fn selector_context(&self) -> Result<SelectorContext, String> {
        let npy = self
            .npy
            .as_deref()
            .map(parse_compact_version)
            .transpose()?;
        let platform = self.platform.unwrap_or_else(Platform::current);

        let mut ctx = SelectorContext::for_target(platform, self.py, npy);
        for (name, value) in &self.defines {
            if ctx.contains(name) {
                tracing::debug!(%name, "definition replaces standard selector variable");
            }
            ctx.set(name.clone(), value.clone());
        }
        Ok(ctx)
    }

    /// Applies explicit `--py`/`--npy` values on top of `overrides`
    pub fn apply_overrides(&self, overrides: &mut PinOverrides) {
        if let Some(py) = self.py {
            overrides.set("python", py.to_string());
        }
        if let Some(ref npy) = self.npy {
            overrides.set("numpy", OverrideVersion::from(npy.trim()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_select_args() {
        let args = CliArgs::parse_from([
            "recipe-pin",
            "select",
            "meta.yaml",
            "--platform",
            "win-64",
            "-D",
            "abc=true",
        ]);
        match args.command {
            Command::Select { file, target } => {
                assert_eq!(file, PathBuf::from("meta.yaml"));
                assert_eq!(target.platform, Some(Platform::Win64));
                assert_eq!(
                    target.defines,
                    vec![("abc".to_string(), SelectorValue::Bool(true))]
                );
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_resolve_args() {
        let args = CliArgs::parse_from([
            "recipe-pin",
            "resolve",
            "numpy x.x",
            "python",
            "--role",
            "build",
            "--override",
            "18",
        ]);
        match args.command {
            Command::Resolve {
                specs,
                role,
                override_version,
            } => {
                assert_eq!(specs, vec!["numpy x.x", "python"]);
                assert_eq!(role, DependencyRole::Build);
                assert_eq!(override_version.as_deref(), Some("18"));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_resolve_default_role_is_run() {
        let args = CliArgs::parse_from(["recipe-pin", "resolve", "python"]);
        match args.command {
            Command::Resolve { role, .. } => assert_eq!(role, DependencyRole::Run),
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_resolve_requires_specs() {
        assert!(CliArgs::try_parse_from(["recipe-pin", "resolve"]).is_err());
    }

    #[test]
    fn test_invalid_role_rejected() {
        assert!(
            CliArgs::try_parse_from(["recipe-pin", "resolve", "python", "--role", "host"]).is_err()
        );
    }

    #[test]
    fn test_render_run_file() {
        let args = CliArgs::parse_from([
            "recipe-pin",
            "render",
            "build.txt",
            "--role",
            "build",
            "--run",
            "run.txt",
        ]);
        match args.command {
            Command::Render { file, role, run, .. } => {
                assert_eq!(file, PathBuf::from("build.txt"));
                assert_eq!(role, DependencyRole::Build);
                assert_eq!(run, Some(PathBuf::from("run.txt")));
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let args = CliArgs::parse_from(["recipe-pin", "resolve", "python", "--json", "--verbose"]);
        assert!(args.json);
        assert!(args.verbose);
        assert!(!args.quiet);
        assert!(args.config.is_none());
    }

    #[test]
    fn test_parse_compact_version() {
        assert_eq!(parse_compact_version("27"), Ok(27));
        assert_eq!(parse_compact_version("2.7"), Ok(27));
        assert_eq!(parse_compact_version("1.10"), Ok(110));
        assert!(parse_compact_version("abc").is_err());
    }

    #[test]
    fn test_target_selector_context() {
        let target = TargetArgs {
            platform: Some(Platform::Osx64),
            py: Some(34),
            npy: Some("1.10".to_string()),
            defines: vec![("osx".to_string(), SelectorValue::Bool(false))],
        };
        let ctx = target.selector_context().unwrap();
        assert_eq!(ctx.get("py3k"), Some(&SelectorValue::Bool(true)));
        assert_eq!(ctx.get("np"), Some(&SelectorValue::Int(110)));
        // explicit definitions win over the platform namespace
        assert_eq!(ctx.get("osx"), Some(&SelectorValue::Bool(false)));
    }

    #[test]
    fn test_target_apply_overrides() {
        let target = TargetArgs {
            py: Some(27),
            npy: Some("1.8".to_string()),
            ..TargetArgs::default()
        };
        let mut overrides = PinOverrides::new();
        target.apply_overrides(&mut overrides);
        assert_eq!(
            overrides.get("python").and_then(OverrideVersion::normalize),
            Some("2.7".to_string())
        );
        assert_eq!(
            overrides.get("numpy").and_then(OverrideVersion::normalize),
            Some("1.8".to_string())
        );
    }
}
