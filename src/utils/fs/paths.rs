//! Lexical path helpers.

use std::path::{Component, Path, PathBuf};

/// Normalizes a path by resolving `.` and `..` components lexically.
///
/// The filesystem is never consulted, so symlinks are not followed and the
/// path does not need to exist. A `..` that would climb above the root is
/// dropped.
///
/// # Examples
///
/// ```
/// use std::path::{Path, PathBuf};
/// use twig_loader::utils::normalize_path;
///
/// assert_eq!(
///     normalize_path(Path::new("/proj/src/pages/../partial.twig")),
///     PathBuf::from("/proj/src/partial.twig")
/// );
/// ```
pub fn normalize_path(path: &Path) -> PathBuf {
    let mut components = Vec::new();

    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                let last = components.last().copied();
                match last {
                    Some(Component::Normal(_)) => {
                        components.pop();
                    }
                    Some(Component::RootDir | Component::Prefix(_)) => {}
                    _ => components.push(component),
                }
            }
            c => components.push(c),
        }
    }

    if components.is_empty() {
        return PathBuf::from(".");
    }
    components.iter().collect()
}

/// Renders a path with `/` separators, as used in module ids and imports.
pub fn to_forward_slashes(path: &Path) -> String {
    path.to_string_lossy().replace('\\', "/")
}

/// `path` relative to `base` when `path` lies inside `base`.
pub fn relative_to(path: &Path, base: &Path) -> Option<PathBuf> {
    path.strip_prefix(base).ok().map(Path::to_path_buf)
}

/// The relative path that leads from directory `base` to `path`.
///
/// Both paths are normalised first. Returns `None` when either is relative
/// or when they share no root (different Windows drives).
///
/// ```
/// use std::path::{Path, PathBuf};
/// use twig_loader::utils::diff_paths;
///
/// assert_eq!(
///     diff_paths(Path::new("/out/partials/nav.js"), Path::new("/out/pages")),
///     Some(PathBuf::from("../partials/nav.js"))
/// );
/// ```
pub fn diff_paths(path: &Path, base: &Path) -> Option<PathBuf> {
    if !path.is_absolute() || !base.is_absolute() {
        return None;
    }
    let path = normalize_path(path);
    let base = normalize_path(base);

    let path_components: Vec<Component<'_>> = path.components().collect();
    let base_components: Vec<Component<'_>> = base.components().collect();
    if path_components.first() != base_components.first() {
        return None;
    }

    let common = path_components
        .iter()
        .zip(&base_components)
        .take_while(|(a, b)| a == b)
        .count();

    let mut result = PathBuf::new();
    for _ in common..base_components.len() {
        result.push("..");
    }
    for component in &path_components[common..] {
        result.push(component.as_os_str());
    }
    Some(result)
}

/// Searches `start` and its ancestors for a file called `file_name`.
///
/// Returns the path of the first match, nearest directory first.
pub fn find_upwards(start: &Path, file_name: &str) -> Option<PathBuf> {
    let mut current = start.canonicalize().unwrap_or_else(|_| start.to_path_buf());

    loop {
        let candidate = current.join(file_name);
        if candidate.is_file() {
            return Some(candidate);
        }
        if !current.pop() {
            return None;
        }
    }
}
