//! Dependency resolution for Twig templates.
//!
//! Given a parsed entry template, the resolver finds every other template it
//! statically depends on, directly or transitively, so the generated module
//! can import each one.
//!
//! # Pipeline
//!
//! 1. [`walker`] extracts template references from a token tree in source
//!    order (`extends`, `include`, `embed`, `import`, `from`, `use`),
//!    descending into every tag body.
//! 2. [`path_resolver`] turns each reference into an absolute path using the
//!    [`NamespaceTable`] and the referencing template's directory.
//! 3. [`loader`] reads the referenced template.
//! 4. [`builder`] drives the above depth-first, deduplicating by resolved
//!    path, and produces a [`DependencyOrder`].
//!
//! # Failure handling
//!
//! | Condition | Outcome |
//! |-----------|---------|
//! | Target is not a string literal | skipped, logged at debug level |
//! | Dependency cannot be read | [`LoaderError::DependencyLoadFailure`](crate::core::LoaderError), pass aborted |
//! | `ignore missing` target does not exist | [`ResolutionWarning::MissingOptionalDependency`] |
//! | Dependency is empty | [`ResolutionWarning::EmptyDependency`] |
//! | Dependency does not parse | [`ResolutionWarning::DependencyProcessingFailure`], its subtree skipped |
//!
//! # Example
//!
//! ```
//! use std::path::Path;
//! use twig_loader::resolver::{DependencyGraphBuilder, MemoryLoader, NamespaceTable, PathResolver};
//! use twig_loader::twig::{TemplateEngine, TwigEngine};
//!
//! # tokio_test_block(async {
//! let namespaces: NamespaceTable = [("ui", "/proj/components")].into_iter().collect();
//! let resolver = PathResolver::new(namespaces, "/proj");
//! let loader = MemoryLoader::new()
//!     .with_template("/proj/components/card.twig", "{% include './icon.twig' %}")
//!     .with_template("/proj/components/icon.twig", "<svg/>");
//!
//! let tokens = TwigEngine.parse("{% include '@ui/card.twig' %}").unwrap();
//! let order = DependencyGraphBuilder::new(&resolver, &TwigEngine, &loader)
//!     .build(Path::new("/proj/pages/home.twig"), &tokens)
//!     .await
//!     .unwrap();
//!
//! assert_eq!(order.len(), 2);
//! # });
//! # fn tokio_test_block<F: std::future::Future>(f: F) {
//! #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
//! # }
//! ```

pub mod builder;
pub mod dependency_graph;
pub mod loader;
pub mod namespaces;
pub mod path_resolver;
pub mod walker;
pub mod warning;

pub use builder::{DependencyGraphBuilder, DependencyOrder, DependencyRecord};
pub use dependency_graph::DependencyGraph;
pub use loader::{DependencyLoader, FsLoader, MemoryLoader};
pub use namespaces::{Namespace, NamespaceTable};
pub use path_resolver::{PathResolver, resolve};
pub use walker::{ReferenceKind, TemplateReference, collect_references, walk};
pub use warning::ResolutionWarning;
