//! Runtime ids for templates.
//!
//! The id is the name a template is registered under in the Twig runtime.
//! Modules pass `id` and `data` but no `path`, so with inline includes the
//! runtime looks a reference up by its literal text. Only references spelled
//! exactly like the id (`@ui/button.twig`, `src/pages/home.twig`) hit the
//! registered template; `./button.twig` and `ui::button.twig` do not, and the
//! runtime falls back to its own loader for them.

use std::path::Path;

use crate::resolver::NamespaceTable;
use crate::utils::{normalize_path, relative_to, to_forward_slashes};

/// The runtime id of the template at `path`.
///
/// The first namespace whose directory contains `path` gives `@name/rest`;
/// otherwise the path relative to `root`; otherwise the absolute path.
/// Separators are always `/`.
///
/// ```
/// use std::path::Path;
/// use twig_loader::emitter::template_id;
/// use twig_loader::resolver::NamespaceTable;
///
/// let namespaces: NamespaceTable = [("ui", "/proj/src/components")].into_iter().collect();
/// let root = Path::new("/proj");
///
/// assert_eq!(
///     template_id(Path::new("/proj/src/components/button.twig"), &namespaces, root),
///     "@ui/button.twig"
/// );
/// assert_eq!(template_id(Path::new("/proj/src/pages/home.twig"), &namespaces, root), "src/pages/home.twig");
/// ```
pub fn template_id(path: &Path, namespaces: &NamespaceTable, root: &Path) -> String {
    if let Some(specifier) = namespaces.to_specifier(path) {
        return specifier;
    }

    let path = normalize_path(path);
    match relative_to(&path, &normalize_path(root)) {
        Some(relative) => to_forward_slashes(&relative),
        None => to_forward_slashes(&path),
    }
}
