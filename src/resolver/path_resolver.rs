//! Template reference to file path resolution.
//!
//! Resolution is lexical: nothing here touches the filesystem, and two
//! spellings of the same file (`@ui/a.twig`, `./components/a.twig`,
//! `../src/components/./a.twig`) resolve to the same normalised path.

use std::path::{Path, PathBuf};

use tracing::debug;

use super::namespaces::NamespaceTable;
use crate::utils::normalize_path;

/// Resolves `specifier` against a namespace table and the directory of the
/// referencing template.
///
/// 1. A namespace prefix (`@name/` or `name::`) is replaced by its directory;
///    the first configured namespace that matches wins.
/// 2. A path that then starts with `./` or `../` is joined onto `base_dir`.
/// 3. Anything else is taken as already resolved.
///
/// The result is normalised so `.` and `..` segments are folded.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use twig_loader::resolver::{NamespaceTable, resolve};
///
/// let namespaces: NamespaceTable = [("@ns", "/proj/src")].into_iter().collect();
/// assert_eq!(
///     resolve("@ns/a/b.twig", Path::new("/proj"), &namespaces),
///     PathBuf::from("/proj/src/a/b.twig")
/// );
/// ```
pub fn resolve(specifier: &str, base_dir: &Path, namespaces: &NamespaceTable) -> PathBuf {
    let candidate = namespaces.expand(specifier).unwrap_or_else(|| PathBuf::from(specifier));

    if is_relative_reference(&candidate) {
        normalize_path(&base_dir.join(candidate))
    } else {
        normalize_path(&candidate)
    }
}

fn is_relative_reference(path: &Path) -> bool {
    let text = path.to_string_lossy();
    text.starts_with("./")
        || text.starts_with("../")
        || (cfg!(windows) && (text.starts_with(".\\") || text.starts_with("..\\")))
}

/// [`resolve`] bound to a project: bare references that are neither
/// namespaced nor relative are anchored at the project root.
#[derive(Debug, Clone)]
pub struct PathResolver {
    namespaces: NamespaceTable,
    root: PathBuf,
}

impl PathResolver {
    pub fn new(namespaces: NamespaceTable, root: impl Into<PathBuf>) -> Self {
        Self {
            namespaces,
            root: root.into(),
        }
    }

    pub fn namespaces(&self) -> &NamespaceTable {
        &self.namespaces
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Resolves `specifier` written in a template that lives in `base_dir`.
    pub fn resolve(&self, specifier: &str, base_dir: &Path) -> PathBuf {
        let resolved = resolve(specifier, base_dir, &self.namespaces);
        let resolved = if resolved.is_absolute() {
            resolved
        } else {
            normalize_path(&self.root.join(resolved))
        };

        debug!("Resolved '{}' from {} to {}", specifier, base_dir.display(), resolved.display());
        resolved
    }
}
