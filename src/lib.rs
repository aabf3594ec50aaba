//! twig-loader - build-time Twig template compiler
//!
//! Compiles Twig templates into JavaScript modules for bundlers such as Vite.
//! Each generated module inlines its template source and imports the module of
//! every template it depends on, so the bundler sees the whole template graph
//! and rebuilds a page when one of its partials changes.
//!
//! # Architecture Overview
//!
//! A template goes through four stages:
//!
//! 1. [`twig`] parses the source into a token tree (structure only, no
//!    expression evaluation).
//! 2. [`resolver`] walks the tree for `extends`, `include`, `embed`,
//!    `import`, `from` and `use` references with literal targets, resolves
//!    them against the namespace table, loads each dependency and repeats
//!    until the graph is closed. The result is a [`resolver::DependencyOrder`].
//! 3. [`emitter`] turns the entry source and the ordered dependencies into
//!    an ES module.
//! 4. [`transform`] ties the stages together behind the hook a bundler
//!    plugin calls for every module it loads.
//!
//! # Core Modules
//!
//! - [`cli`] - the `twig-loader` command (`transform`, `deps`, `build`)
//! - [`config`] - `twig-loader.toml` loading and command-line overrides
//! - [`core`] - error types and user-facing error formatting
//! - [`emitter`] - JavaScript module generation
//! - [`resolver`] - path resolution, dependency loading and graph building
//! - [`transform`] - the transform hook
//! - [`twig`] - the structural Twig parser
//! - [`utils`] - path helpers, atomic writes and template discovery
//!
//! # Example
//!
//! ```rust,no_run
//! use std::path::Path;
//! use twig_loader::config::ProjectConfig;
//! use twig_loader::transform::Transformer;
//!
//! # async fn example() -> anyhow::Result<()> {
//! let config = ProjectConfig::new("/srv/site").with_namespace("ui", "src/components");
//! let transformer = Transformer::new(config);
//!
//! let source = "{% extends '@ui/base.twig' %}";
//! if let Some(output) = transformer.transform(source, Path::new("src/pages/home.twig")).await? {
//!     println!("{}", output.code);
//!     for dependency in &output.dependencies {
//!         println!("watch {}", dependency.display());
//!     }
//! }
//! # Ok(())
//! # }
//! ```

pub mod cli;
pub mod config;
pub mod constants;
pub mod core;
pub mod emitter;
pub mod resolver;
pub mod transform;
pub mod twig;
pub mod utils;

// test_utils module is available for both unit tests and integration tests
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;

pub use transform::{TransformOutput, Transformer};
