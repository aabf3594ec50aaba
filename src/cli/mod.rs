//! Command-line interface for twig-loader.
//!
//! # Commands
//!
//! - `transform` - compile one template to a JavaScript module
//! - `deps` - show the templates a template depends on
//! - `build` - compile every template under a directory
//!
//! # Global options
//!
//! `--verbose` / `--quiet` control logging (`RUST_LOG` is honoured when
//! neither is given), `--config` points at a `twig-loader.toml`, and
//! `--root` / `--namespace name=dir` override values from that file.
//!
//! ```bash
//! twig-loader transform src/pages/home.twig -o dist/home.twig.js
//! twig-loader --namespace ui=src/components deps src/pages/home.twig --format json
//! twig-loader -v build src --out-dir dist/templates
//! ```

pub mod build;
pub mod deps;
pub mod transform;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

use crate::config::{ConfigOverrides, ProjectConfig, load_project_config, parse_namespace_arg};

/// Settings derived from the global flags.
#[derive(Debug, Clone, Default)]
pub struct CliConfig {
    /// Log filter; `None` disables logging unless `RUST_LOG` is set.
    pub log_level: Option<String>,
    /// Explicit configuration file.
    pub config_path: Option<PathBuf>,
    pub overrides: ConfigOverrides,
}

impl CliConfig {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads the project configuration relative to `cwd`.
    pub async fn load_project(&self, cwd: &Path) -> Result<ProjectConfig> {
        load_project_config(self.config_path.as_deref(), cwd, &self.overrides).await
    }
}

/// Installs the global tracing subscriber, writing to stderr.
///
/// `RUST_LOG` wins over `level` when set. Calling this twice is harmless.
pub fn init_logging(level: Option<&str>) {
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if let Some(level) = level {
        EnvFilter::new(level)
    } else {
        return;
    };

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}

/// Compile Twig templates into JavaScript modules with their template
/// dependencies as imports.
#[derive(Parser, Debug)]
#[command(name = "twig-loader", version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Show debug output, including every reference the resolver follows
    #[arg(short, long, global = true, conflicts_with = "quiet")]
    verbose: bool,

    /// Suppress all log output, including warnings
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Path to twig-loader.toml (default: search upwards from the working directory)
    #[arg(short, long, global = true, env = "TWIG_LOADER_CONFIG")]
    config: Option<PathBuf>,

    /// Project root (overrides `root` in the configuration file)
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Namespace mapping `name=dir`, relative to the root; may be repeated
    #[arg(short = 'n', long = "namespace", global = true, value_name = "NAME=DIR")]
    namespaces: Vec<String>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Compile one template to a JavaScript module
    Transform(transform::TransformCommand),
    /// Show the templates a template depends on
    Deps(deps::DepsCommand),
    /// Compile every template under a directory
    Build(build::BuildCommand),
}

impl Cli {
    /// Run the parsed command.
    pub async fn execute(self) -> Result<()> {
        let config = self.build_config()?;
        init_logging(config.log_level.as_deref());
        self.execute_with_config(config).await
    }

    /// Translate the global flags into a [`CliConfig`].
    pub fn build_config(&self) -> Result<CliConfig> {
        let log_level = if self.verbose {
            Some("debug".to_string())
        } else if self.quiet {
            None
        } else {
            Some("warn".to_string())
        };

        let namespaces = self
            .namespaces
            .iter()
            .map(|value| parse_namespace_arg(value))
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CliConfig {
            log_level,
            config_path: self.config.clone(),
            overrides: ConfigOverrides {
                root: self.root.clone(),
                namespaces,
            },
        })
    }

    /// Run the command with an explicit configuration.
    pub async fn execute_with_config(self, config: CliConfig) -> Result<()> {
        let cwd = std::env::current_dir().context("Failed to determine the working directory")?;
        let project = config.load_project(&cwd).await?;

        match self.command {
            Commands::Transform(cmd) => cmd.execute(project, &cwd).await,
            Commands::Deps(cmd) => cmd.execute(project, &cwd).await,
            Commands::Build(cmd) => cmd.execute(project, &cwd).await,
        }
    }
}
