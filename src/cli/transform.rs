//! Compile one template.

use anyhow::{Context, Result};
use clap::Args;
use std::path::{Path, PathBuf};
use tracing::info;

use crate::config::ProjectConfig;
use crate::core::LoaderError;
use crate::core::file_error::read_with_context;
use crate::transform::Transformer;
use crate::utils::{normalize_path, safe_write};

/// Compile a template and print the module (or write it with `--output`).
#[derive(Args, Debug)]
pub struct TransformCommand {
    /// Template file to compile
    file: PathBuf,

    /// Write the module here instead of stdout
    #[arg(short, long)]
    output: Option<PathBuf>,
}

impl TransformCommand {
    pub async fn execute(self, project: ProjectConfig, cwd: &Path) -> Result<()> {
        let path = normalize_path(&cwd.join(&self.file));
        let transformer = Transformer::new(project);

        if !transformer.handles(&path) {
            return Err(LoaderError::UnsupportedTemplate {
                path,
                expected: transformer.config().extensions.join(", "),
            }
            .into());
        }

        let source = read_with_context(&path, "loading template").await?;
        let output = transformer
            .transform(&source, &path)
            .await
            .with_context(|| format!("Failed to transform {}", path.display()))?
            .with_context(|| format!("Template was not transformed: {}", path.display()))?;

        match self.output {
            Some(target) => {
                let target = normalize_path(&cwd.join(target));
                safe_write(&target, &output.code)?;
                info!("Wrote {}", target.display());
            }
            None => print!("{}", output.code),
        }

        Ok(())
    }
}
