//! `twig-loader.toml` loading and resolution.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::constants::{
    CONFIG_FILE_NAME, DEFAULT_EXTENSION, DEFAULT_MAX_CONCURRENT_LOADS, DEFAULT_RUNTIME_MODULE,
};
use crate::core::LoaderError;
use crate::core::file_error::read_with_context;
use crate::resolver::NamespaceTable;
use crate::utils::{find_upwards, normalize_path};

fn default_extensions() -> Vec<String> {
    vec![DEFAULT_EXTENSION.to_string()]
}

const fn default_max_concurrent_loads() -> usize {
    DEFAULT_MAX_CONCURRENT_LOADS
}

/// The configuration file as written.
///
/// Relative paths are kept as written; [`LoaderConfig::resolve`] anchors
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case", deny_unknown_fields)]
pub struct LoaderConfig {
    /// Project root, relative to the directory holding the file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub root: Option<PathBuf>,

    /// Namespace name to directory (relative to the root), in file order.
    #[serde(default)]
    pub namespaces: toml::Table,

    /// Template file extensions, without the dot.
    #[serde(default = "default_extensions")]
    pub extensions: Vec<String>,

    /// Module the generated code imports the Twig runtime from.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub runtime_module: Option<String>,

    #[serde(default = "default_max_concurrent_loads")]
    pub max_concurrent_loads: usize,

    /// Options passed through to `Twig.twig()`.
    #[serde(default)]
    pub twig: Map<String, Value>,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: None,
            namespaces: toml::Table::new(),
            extensions: default_extensions(),
            runtime_module: None,
            max_concurrent_loads: DEFAULT_MAX_CONCURRENT_LOADS,
            twig: Map::new(),
        }
    }
}

/// Resolved settings for one project.
#[derive(Debug, Clone)]
pub struct ProjectConfig {
    /// Absolute project root.
    pub root: PathBuf,
    /// Namespaces with absolute directories.
    pub namespaces: NamespaceTable,
    pub extensions: Vec<String>,
    pub runtime_module: String,
    pub max_concurrent_loads: usize,
    pub twig_options: Map<String, Value>,
    /// File the settings came from, if any.
    pub source: Option<PathBuf>,
}

impl ProjectConfig {
    /// Defaults for a project rooted at `root`.
    pub fn new(root: impl AsRef<Path>) -> Self {
        Self {
            root: normalize_path(root.as_ref()),
            namespaces: NamespaceTable::new(),
            extensions: default_extensions(),
            runtime_module: DEFAULT_RUNTIME_MODULE.to_string(),
            max_concurrent_loads: DEFAULT_MAX_CONCURRENT_LOADS,
            twig_options: Map::new(),
            source: None,
        }
    }

    /// Adds a namespace; a relative `dir` is taken relative to the root.
    #[must_use]
    pub fn with_namespace(mut self, name: &str, dir: impl AsRef<Path>) -> Self {
        let dir = normalize_path(&self.root.join(dir));
        self.namespaces.insert(name, dir);
        self
    }

    /// Whether `path` has one of the configured template extensions.
    pub fn is_template(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| self.extensions.iter().any(|wanted| wanted == ext))
    }
}

/// Settings given on the command line that take precedence over the file.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    /// Project root, relative to the working directory.
    pub root: Option<PathBuf>,
    /// Extra or replacement namespaces, relative to the root.
    pub namespaces: Vec<(String, PathBuf)>,
}

impl LoaderConfig {
    /// Searches `start` and its ancestors for `twig-loader.toml`.
    pub fn find(start: &Path) -> Option<PathBuf> {
        find_upwards(start, CONFIG_FILE_NAME)
    }

    /// Reads and parses a configuration file.
    pub async fn load_from(path: &Path) -> anyhow::Result<Self> {
        let content = read_with_context(path, "loading configuration").await?;
        Self::parse(&content, path).map_err(Into::into)
    }

    /// Parses configuration text; `path` is only used in errors.
    pub fn parse(content: &str, path: &Path) -> Result<Self, LoaderError> {
        toml::from_str(content).map_err(|e| LoaderError::ConfigParse {
            path: path.to_path_buf(),
            reason: e.message().to_string(),
        })
    }

    /// Anchors relative paths at `base_dir` (the directory of the config
    /// file) and validates values.
    pub fn resolve(self, base_dir: &Path, source: Option<PathBuf>) -> Result<ProjectConfig, LoaderError> {
        let config_path = source.clone().unwrap_or_else(|| base_dir.join(CONFIG_FILE_NAME));
        let invalid = |reason: String| LoaderError::ConfigParse {
            path: config_path.clone(),
            reason,
        };

        let extensions: Vec<String> =
            self.extensions.iter().map(|ext| ext.trim_start_matches('.').to_string()).collect();
        if extensions.is_empty() || extensions.iter().any(String::is_empty) {
            return Err(invalid("`extensions` must list at least one non-empty extension".to_string()));
        }
        if self.max_concurrent_loads == 0 {
            return Err(invalid("`max-concurrent-loads` must be at least 1".to_string()));
        }

        let root = normalize_path(&base_dir.join(self.root.unwrap_or_else(|| PathBuf::from("."))));

        let mut namespaces = NamespaceTable::new();
        for (name, value) in &self.namespaces {
            let Some(dir) = value.as_str() else {
                return Err(invalid(format!("namespace `{name}` must map to a directory string")));
            };
            namespaces.insert(name, normalize_path(&root.join(dir)));
        }

        Ok(ProjectConfig {
            root,
            namespaces,
            extensions,
            runtime_module: self.runtime_module.unwrap_or_else(|| DEFAULT_RUNTIME_MODULE.to_string()),
            max_concurrent_loads: self.max_concurrent_loads,
            twig_options: self.twig,
            source,
        })
    }
}

/// Parses a `name=dir` namespace argument.
pub fn parse_namespace_arg(value: &str) -> Result<(String, PathBuf), LoaderError> {
    let invalid = |reason: &str| LoaderError::InvalidNamespace {
        value: value.to_string(),
        reason: reason.to_string(),
    };

    let (name, dir) = value.split_once('=').ok_or_else(|| invalid("expected name=path"))?;
    let name = name.trim().trim_start_matches('@');
    let dir = dir.trim();
    if name.is_empty() {
        return Err(invalid("namespace name is empty"));
    }
    if dir.is_empty() {
        return Err(invalid("namespace path is empty"));
    }
    Ok((name.to_string(), PathBuf::from(dir)))
}

/// Loads the project configuration.
///
/// With `explicit` set, that file must exist. Otherwise `twig-loader.toml`
/// is searched for upwards from `cwd`; when there is none, defaults rooted
/// at `cwd` are used. `overrides` are applied last.
pub async fn load_project_config(
    explicit: Option<&Path>,
    cwd: &Path,
    overrides: &ConfigOverrides,
) -> anyhow::Result<ProjectConfig> {
    let found = match explicit {
        Some(path) => {
            let path = normalize_path(&cwd.join(path));
            if !path.is_file() {
                return Err(LoaderError::ConfigNotFound {
                    path,
                }
                .into());
            }
            Some(path)
        }
        None => LoaderConfig::find(cwd),
    };

    let mut project = match found {
        Some(path) => {
            debug!("Loading configuration from {}", path.display());
            let base_dir = path.parent().map(Path::to_path_buf).unwrap_or_else(|| cwd.to_path_buf());
            LoaderConfig::load_from(&path).await?.resolve(&base_dir, Some(path))?
        }
        None => {
            debug!("No {} found, using defaults rooted at {}", CONFIG_FILE_NAME, cwd.display());
            LoaderConfig::default().resolve(cwd, None)?
        }
    };

    if let Some(root) = &overrides.root {
        project.root = normalize_path(&cwd.join(root));
    }
    for (name, dir) in &overrides.namespaces {
        project.namespaces.insert(name, normalize_path(&project.root.join(dir)));
    }

    Ok(project)
}
