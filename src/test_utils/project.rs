//! Temporary template projects.

use anyhow::{Context, Result};
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

use crate::config::{ConfigOverrides, ProjectConfig, load_project_config};
use crate::constants::CONFIG_FILE_NAME;

/// A project directory in a temporary location, removed on drop.
pub struct TestProject {
    pub temp_dir: TempDir,
    /// Canonical project root.
    pub root: PathBuf,
}

impl TestProject {
    pub fn new() -> Result<Self> {
        super::init_test_logging(None);

        let temp_dir = TempDir::new()?;
        // Canonical so paths compare equal on macOS, where /tmp is a symlink
        let root = temp_dir.path().canonicalize().context("Failed to canonicalize temp dir")?;

        Ok(Self {
            temp_dir,
            root,
        })
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.root
    }

    /// Absolute path of `relative` inside the project.
    #[must_use]
    pub fn join(&self, relative: impl AsRef<Path>) -> PathBuf {
        self.root.join(relative)
    }

    /// Writes a template, creating parent directories.
    pub fn create_template(&self, relative: impl AsRef<Path>, content: &str) -> Result<PathBuf> {
        let full_path = self.join(relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&full_path, content)
            .with_context(|| format!("Failed to write {}", full_path.display()))?;
        Ok(full_path)
    }

    /// Writes `twig-loader.toml` at the project root.
    pub fn write_config(&self, content: &str) -> Result<PathBuf> {
        self.create_template(CONFIG_FILE_NAME, content)
    }

    pub fn read_file(&self, relative: impl AsRef<Path>) -> Result<String> {
        let full_path = self.join(relative);
        fs::read_to_string(&full_path).with_context(|| format!("Failed to read {}", full_path.display()))
    }

    pub fn file_exists(&self, relative: impl AsRef<Path>) -> bool {
        self.join(relative).exists()
    }

    /// Loads the project configuration the way the CLI does from the root.
    pub async fn config(&self) -> Result<ProjectConfig> {
        load_project_config(None, &self.root, &ConfigOverrides::default()).await
    }
}
