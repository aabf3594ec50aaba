//! Template source loading.
//!
//! The dependency pass reads templates through [`DependencyLoader`] so it can
//! run against the filesystem ([`FsLoader`]) or an in-memory set of templates
//! ([`MemoryLoader`]) for tests and for embedders that keep sources
//! elsewhere.

use std::collections::HashMap;
use std::future::Future;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::utils::normalize_path;

/// Loads template source for a resolved path.
pub trait DependencyLoader: Send + Sync {
    /// Read the full UTF-8 source of `path`.
    fn load(&self, path: &Path) -> impl Future<Output = io::Result<String>> + Send;
}

/// Reads templates from disk with `tokio::fs`.
#[derive(Debug, Clone, Copy, Default)]
pub struct FsLoader;

impl DependencyLoader for FsLoader {
    async fn load(&self, path: &Path) -> io::Result<String> {
        tokio::fs::read_to_string(path).await
    }
}

/// Serves templates from memory. Unknown paths fail with
/// [`io::ErrorKind::NotFound`].
#[derive(Debug, Default)]
pub struct MemoryLoader {
    templates: HashMap<PathBuf, String>,
    requests: Mutex<Vec<PathBuf>>,
}

impl MemoryLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a template; the path is normalised.
    pub fn insert(&mut self, path: impl AsRef<Path>, source: impl Into<String>) {
        self.templates.insert(normalize_path(path.as_ref()), source.into());
    }

    /// Builder form of [`insert`](Self::insert).
    #[must_use]
    pub fn with_template(mut self, path: impl AsRef<Path>, source: impl Into<String>) -> Self {
        self.insert(path, source);
        self
    }

    /// Every path passed to `load` so far, in call order.
    pub fn requests(&self) -> Vec<PathBuf> {
        self.requests.lock().map(|requests| requests.clone()).unwrap_or_default()
    }
}

impl DependencyLoader for MemoryLoader {
    async fn load(&self, path: &Path) -> io::Result<String> {
        let path = normalize_path(path);
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(path.clone());
        }

        self.templates.get(&path).cloned().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no template at {}", path.display()))
        })
    }
}
