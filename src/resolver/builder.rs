//! The dependency pass.
//!
//! [`DependencyGraphBuilder::build`] discovers every template reachable from
//! an entry template through static references and returns them in
//! depth-first pre-order: a dependency appears before the dependencies it
//! introduces, and those appear before its later siblings.
//!
//! Deduplication is by resolved path. The entry itself is marked visited
//! before the walk starts, so a dependency that refers back to the entry does
//! not produce a record for it.
//!
//! Loads for the children of each newly recorded template are started
//! together (bounded by `max_concurrent_loads`) and buffered; the visited
//! check and record creation stay on the calling task, so the order never
//! depends on which load finishes first.

use futures::stream::{self, StreamExt};
use std::collections::{HashMap, HashSet};
use std::io;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::dependency_graph::DependencyGraph;
use super::loader::DependencyLoader;
use super::path_resolver::PathResolver;
use super::walker::{TemplateReference, collect_references};
use super::warning::ResolutionWarning;
use crate::constants::DEFAULT_MAX_CONCURRENT_LOADS;
use crate::core::LoaderError;
use crate::twig::{TemplateEngine, Token};
use crate::utils::normalize_path;

/// A template discovered during the pass.
#[derive(Debug, Clone)]
pub struct DependencyRecord {
    /// The reference as first written.
    pub specifier: String,
    /// Resolved absolute path; the identity of the record.
    pub path: PathBuf,
    /// Loaded source.
    pub source: String,
    /// Parsed token tree of `source`.
    pub tokens: Vec<Token>,
    /// Template containing the first reference.
    pub referenced_from: PathBuf,
    /// 1 for references in the entry template.
    pub depth: usize,
}

/// Result of a dependency pass.
#[derive(Debug, Clone)]
pub struct DependencyOrder {
    /// The entry template's path.
    pub entry: PathBuf,
    /// Discovered templates in first-discovered order.
    pub records: Vec<DependencyRecord>,
    pub warnings: Vec<ResolutionWarning>,
    /// References between the entry and all recorded templates.
    pub graph: DependencyGraph,
}

impl DependencyOrder {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Resolved paths of the records, in order.
    pub fn paths(&self) -> Vec<PathBuf> {
        self.records.iter().map(|record| record.path.clone()).collect()
    }
}

/// A reference waiting on the worklist.
#[derive(Debug)]
struct PendingReference {
    reference: TemplateReference,
    path: PathBuf,
    referenced_from: PathBuf,
    depth: usize,
}

/// State owned by a single `build` call.
#[derive(Default)]
struct PassState {
    visited: HashSet<PathBuf>,
    /// Paths already reported as empty or unparsable.
    skipped: HashSet<PathBuf>,
    prefetched: HashMap<PathBuf, io::Result<String>>,
    warned_namespaces: HashSet<String>,
    records: Vec<DependencyRecord>,
    warnings: Vec<ResolutionWarning>,
    graph: DependencyGraph,
}

/// Runs dependency passes for entry templates.
pub struct DependencyGraphBuilder<'a, E, L> {
    resolver: &'a PathResolver,
    engine: &'a E,
    loader: &'a L,
    max_concurrent_loads: usize,
}

impl<'a, E, L> DependencyGraphBuilder<'a, E, L>
where
    E: TemplateEngine,
    L: DependencyLoader,
{
    pub fn new(resolver: &'a PathResolver, engine: &'a E, loader: &'a L) -> Self {
        Self {
            resolver,
            engine,
            loader,
            max_concurrent_loads: DEFAULT_MAX_CONCURRENT_LOADS,
        }
    }

    /// Caps how many dependency loads run at once. Zero is treated as one.
    #[must_use]
    pub fn with_max_concurrent_loads(mut self, max: usize) -> Self {
        self.max_concurrent_loads = max.max(1);
        self
    }

    /// Discovers the dependencies of the template at `entry_path`, whose
    /// already parsed tokens are `entry_tokens`.
    ///
    /// # Errors
    ///
    /// Returns [`LoaderError::DependencyLoadFailure`] when a referenced
    /// template cannot be read. A missing template referenced with
    /// `ignore missing` is a warning instead.
    pub async fn build(
        &self,
        entry_path: &Path,
        entry_tokens: &[Token],
    ) -> Result<DependencyOrder, LoaderError> {
        let entry = normalize_path(entry_path);
        let mut state = PassState::default();
        state.visited.insert(entry.clone());
        state.graph.ensure_node(&entry);

        debug!("Resolving dependencies of {}", entry.display());

        let mut worklist = Vec::new();
        self.schedule_children(&entry, entry_tokens, 1, &mut state, &mut worklist).await;

        while let Some(pending) = worklist.pop() {
            if state.visited.contains(&pending.path) {
                debug!("Already visited {}", pending.path.display());
                state.graph.add_dependency(&pending.referenced_from, &pending.path);
                continue;
            }
            if state.skipped.contains(&pending.path) {
                continue;
            }

            let loaded = match state.prefetched.remove(&pending.path) {
                Some(result) => result,
                None => self.loader.load(&pending.path).await,
            };

            let source = match loaded {
                Ok(source) => source,
                Err(err)
                    if err.kind() == io::ErrorKind::NotFound && pending.reference.ignore_missing =>
                {
                    let warning = ResolutionWarning::MissingOptionalDependency {
                        specifier: pending.reference.specifier,
                        path: pending.path,
                        referenced_from: pending.referenced_from,
                    };
                    warn!("{warning}");
                    state.warnings.push(warning);
                    continue;
                }
                Err(source) => {
                    return Err(LoaderError::DependencyLoadFailure {
                        specifier: pending.reference.specifier,
                        resolved_path: pending.path,
                        referenced_from: pending.referenced_from,
                        source,
                    });
                }
            };

            if source.is_empty() {
                let warning = ResolutionWarning::EmptyDependency {
                    specifier: pending.reference.specifier,
                    path: pending.path.clone(),
                    referenced_from: pending.referenced_from,
                };
                warn!("{warning}");
                state.warnings.push(warning);
                state.skipped.insert(pending.path);
                continue;
            }

            let tokens = match self.engine.parse(&source) {
                Ok(tokens) => tokens,
                Err(err) => {
                    let warning = ResolutionWarning::DependencyProcessingFailure {
                        specifier: pending.reference.specifier,
                        path: pending.path.clone(),
                        referenced_from: pending.referenced_from,
                        line: err.line,
                        message: err.message,
                    };
                    warn!("{warning}");
                    state.warnings.push(warning);
                    state.skipped.insert(pending.path);
                    continue;
                }
            };

            debug!(
                "Recorded {} ('{}' from {}, depth {})",
                pending.path.display(),
                pending.reference.specifier,
                pending.referenced_from.display(),
                pending.depth
            );
            state.visited.insert(pending.path.clone());
            state.graph.add_dependency(&pending.referenced_from, &pending.path);

            self.schedule_children(&pending.path, &tokens, pending.depth + 1, &mut state, &mut worklist)
                .await;

            state.records.push(DependencyRecord {
                specifier: pending.reference.specifier,
                path: pending.path,
                source,
                tokens,
                referenced_from: pending.referenced_from,
                depth: pending.depth,
            });
        }

        debug!("Found {} dependencies of {}", state.records.len(), entry.display());

        Ok(DependencyOrder {
            entry,
            records: state.records,
            warnings: state.warnings,
            graph: state.graph,
        })
    }

    /// Resolves the references in `tokens`, starts loading the new ones, and
    /// pushes them so the first reference is popped first.
    async fn schedule_children(
        &self,
        template: &Path,
        tokens: &[Token],
        depth: usize,
        state: &mut PassState,
        worklist: &mut Vec<PendingReference>,
    ) {
        let base_dir = template.parent().unwrap_or_else(|| Path::new("/"));

        let children: Vec<PendingReference> = collect_references(tokens)
            .into_iter()
            .map(|reference| {
                self.check_namespace(&reference, template, state);
                PendingReference {
                    path: self.resolver.resolve(&reference.specifier, base_dir),
                    reference,
                    referenced_from: template.to_path_buf(),
                    depth,
                }
            })
            .collect();

        let mut to_load = Vec::new();
        for child in &children {
            let known = state.visited.contains(&child.path)
                || state.skipped.contains(&child.path)
                || state.prefetched.contains_key(&child.path);
            if !known && !to_load.contains(&child.path) {
                to_load.push(child.path.clone());
            }
        }
        self.prefetch(to_load, state).await;

        worklist.extend(children.into_iter().rev());
    }

    async fn prefetch(&self, paths: Vec<PathBuf>, state: &mut PassState) {
        if paths.is_empty() {
            return;
        }

        let loader = self.loader;
        let loaded: Vec<(PathBuf, io::Result<String>)> = stream::iter(paths)
            .map(|path| async move {
                let result = loader.load(&path).await;
                (path, result)
            })
            .buffer_unordered(self.max_concurrent_loads)
            .collect()
            .await;

        state.prefetched.extend(loaded);
    }

    fn check_namespace(&self, reference: &TemplateReference, template: &Path, state: &mut PassState) {
        let namespaces = self.resolver.namespaces();
        if !reference.specifier.starts_with('@')
            || namespaces.match_prefix(&reference.specifier).is_some()
            || !state.warned_namespaces.insert(reference.specifier.clone())
        {
            return;
        }

        let warning = ResolutionWarning::UnknownNamespace {
            specifier: reference.specifier.clone(),
            referenced_from: template.to_path_buf(),
            suggestion: namespaces.suggest(&reference.specifier).map(str::to_string),
        };
        warn!("{warning}");
        state.warnings.push(warning);
    }
}
