//! Namespace table for `@name/...` and `name::...` template references.

use std::path::{Path, PathBuf};

use crate::utils::{normalize_path, relative_to, to_forward_slashes};

/// A single namespace mapping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Namespace {
    /// Name without the leading `@`.
    pub name: String,
    /// Directory the namespace maps to.
    pub dir: PathBuf,
}

/// Ordered mapping from namespace names to directories.
///
/// Lookups scan in insertion order and the first matching name wins. A name
/// configured as either `ui` or `@ui` matches references written `@ui/...`
/// and `ui::...`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamespaceTable {
    entries: Vec<Namespace>,
}

impl NamespaceTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a namespace, replacing the directory of an existing one with the
    /// same name without changing its position.
    pub fn insert(&mut self, name: &str, dir: impl Into<PathBuf>) {
        let name = name.trim_start_matches('@').to_string();
        let dir = dir.into();
        if let Some(existing) = self.entries.iter_mut().find(|ns| ns.name == name) {
            existing.dir = dir;
        } else {
            self.entries.push(Namespace {
                name,
                dir,
            });
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Namespace> {
        self.entries.iter()
    }

    pub fn get(&self, name: &str) -> Option<&Path> {
        let name = name.trim_start_matches('@');
        self.entries.iter().find(|ns| ns.name == name).map(|ns| ns.dir.as_path())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Finds the namespace `specifier` starts with and the remainder after
    /// the namespace separator.
    pub fn match_prefix<'a>(&self, specifier: &'a str) -> Option<(&Namespace, &'a str)> {
        self.entries.iter().find_map(|ns| {
            if let Some(rest) = specifier.strip_prefix('@') {
                if let Some(rest) = rest.strip_prefix(ns.name.as_str()) {
                    if let Some(rest) = rest.strip_prefix('/') {
                        return Some((ns, rest));
                    }
                }
            }
            specifier
                .strip_prefix(ns.name.as_str())
                .and_then(|rest| rest.strip_prefix("::"))
                .map(|rest| (ns, rest))
        })
    }

    /// Replaces a namespace prefix with its directory.
    ///
    /// Returns `None` when no configured namespace matches.
    pub fn expand(&self, specifier: &str) -> Option<PathBuf> {
        self.match_prefix(specifier).map(|(ns, rest)| ns.dir.join(rest))
    }

    /// The `@name/relative` form of `path`, using the first namespace whose
    /// directory contains it.
    pub fn to_specifier(&self, path: &Path) -> Option<String> {
        let path = normalize_path(path);
        self.entries.iter().find_map(|ns| {
            relative_to(&path, &normalize_path(&ns.dir))
                .map(|rel| format!("@{}/{}", ns.name, to_forward_slashes(&rel)))
        })
    }

    /// For a `@name/...` reference whose name is not configured, the closest
    /// configured name, if any is reasonably similar.
    pub fn suggest(&self, specifier: &str) -> Option<&str> {
        let requested = specifier.strip_prefix('@')?.split('/').next()?;
        if requested.is_empty() || self.get(requested).is_some() {
            return None;
        }

        self.entries
            .iter()
            .map(|ns| (ns.name.as_str(), strsim::jaro_winkler(requested, &ns.name)))
            .filter(|(_, score)| *score >= 0.8)
            .max_by(|a, b| a.1.total_cmp(&b.1))
            .map(|(name, _)| name)
    }
}

impl<N: AsRef<str>, D: Into<PathBuf>> FromIterator<(N, D)> for NamespaceTable {
    fn from_iter<T: IntoIterator<Item = (N, D)>>(iter: T) -> Self {
        let mut table = Self::new();
        for (name, dir) in iter {
            table.insert(name.as_ref(), dir);
        }
        table
    }
}
