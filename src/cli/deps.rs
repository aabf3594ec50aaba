//! Show a template's dependencies.

use anyhow::{Context, Result};
use clap::{Args, ValueEnum};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::ProjectConfig;
use crate::emitter::template_id;
use crate::resolver::{DependencyOrder, ResolutionWarning};
use crate::transform::Transformer;
use crate::utils::{normalize_path, to_forward_slashes};

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Reference tree with box-drawing characters
    Tree,
    /// One resolved path per line, in import order
    List,
    /// JSON for scripting
    Json,
}

/// Resolve the dependencies of a template without generating code.
#[derive(Args, Debug)]
pub struct DepsCommand {
    /// Template file to inspect
    file: PathBuf,

    /// Output format
    #[arg(short, long, value_enum, default_value = "tree")]
    format: OutputFormat,
}

#[derive(Serialize)]
struct JsonDependency {
    id: String,
    specifier: String,
    path: String,
    referenced_from: String,
    depth: usize,
}

#[derive(Serialize)]
struct JsonReport<'a> {
    entry: String,
    dependencies: Vec<JsonDependency>,
    warnings: &'a [ResolutionWarning],
    cycles: Vec<Vec<String>>,
}

impl DepsCommand {
    pub async fn execute(self, project: ProjectConfig, cwd: &Path) -> Result<()> {
        let path = normalize_path(&cwd.join(&self.file));
        let transformer = Transformer::new(project);
        let order = transformer
            .resolve_dependencies(&path)
            .await
            .with_context(|| format!("Failed to resolve dependencies of {}", path.display()))?;

        let output = render(&order, transformer.config(), self.format)?;
        print!("{output}");
        Ok(())
    }
}

/// Formats a dependency pass for display.
pub fn render(order: &DependencyOrder, project: &ProjectConfig, format: OutputFormat) -> Result<String> {
    let id = |path: &Path| template_id(path, &project.namespaces, &project.root);

    match format {
        OutputFormat::List => {
            Ok(order.records.iter().map(|r| format!("{}\n", to_forward_slashes(&r.path))).collect())
        }
        OutputFormat::Tree => {
            let mut out = order.graph.to_tree_string(&order.entry, id);
            for cycle in order.graph.cycles() {
                let names: Vec<String> = cycle.iter().map(|p| id(p)).collect();
                out.push_str(&format!("{} {}\n", "cycle:".yellow(), names.join(" → ")));
            }
            Ok(out)
        }
        OutputFormat::Json => {
            let report = JsonReport {
                entry: to_forward_slashes(&order.entry),
                dependencies: order
                    .records
                    .iter()
                    .map(|record| JsonDependency {
                        id: id(&record.path),
                        specifier: record.specifier.clone(),
                        path: to_forward_slashes(&record.path),
                        referenced_from: to_forward_slashes(&record.referenced_from),
                        depth: record.depth,
                    })
                    .collect(),
                warnings: &order.warnings,
                cycles: order
                    .graph
                    .cycles()
                    .iter()
                    .map(|cycle| cycle.iter().map(|p| to_forward_slashes(p)).collect())
                    .collect(),
            };
            let mut json = serde_json::to_string_pretty(&report)?;
            json.push('\n');
            Ok(json)
        }
    }
}
