//! Compile every template under a directory.

use anyhow::{Context, Result};
use clap::Args;
use colored::Colorize;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use crate::config::ProjectConfig;
use crate::core::file_error::read_with_context;
use crate::transform::{OutputLayout, Transformer};
use crate::utils::{find_templates, normalize_path, safe_write};

/// Compile all templates below a directory into an output directory,
/// keeping the directory layout (`pages/home.twig` → `pages/home.twig.js`).
///
/// Modules import each other's compiled output, so the result can be loaded
/// without the bundler plugin.
#[derive(Args, Debug)]
pub struct BuildCommand {
    /// Directory to search for templates
    dir: PathBuf,

    /// Directory to write modules to
    #[arg(short, long)]
    out_dir: PathBuf,
}

impl BuildCommand {
    pub async fn execute(self, project: ProjectConfig, cwd: &Path) -> Result<()> {
        let src_dir = normalize_path(&cwd.join(&self.dir));
        let out_dir = normalize_path(&cwd.join(&self.out_dir));

        let templates = find_templates(&src_dir, &project.extensions)?;
        info!("Found {} templates in {}", templates.len(), src_dir.display());

        let layout = OutputLayout::new(&src_dir, &out_dir);
        let transformer = Transformer::new(project).with_output_layout(layout.clone());
        let mut warnings = 0;

        for template in &templates {
            let source = read_with_context(template, "loading template").await?;
            let Some(output) = transformer
                .transform(&source, template)
                .await
                .with_context(|| format!("Failed to transform {}", template.display()))?
            else {
                continue;
            };

            let Some(target) = layout.output_path(template) else {
                continue;
            };
            safe_write(&target, &output.code)?;
            debug!("Wrote {}", target.display());
            warnings += output.warnings.len();
        }

        let summary = format!(
            "Compiled {} template{} into {}",
            templates.len(),
            if templates.len() == 1 { "" } else { "s" },
            out_dir.display()
        );
        if warnings > 0 {
            println!("{} {summary} ({warnings} warnings)", "✓".yellow());
        } else {
            println!("{} {summary}", "✓".green());
        }

        Ok(())
    }
}
