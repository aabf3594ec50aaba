//! Unit test suite for twig-loader
//!
//! Exercises the public API of each stage in isolation, without touching the
//! binary. Most tests work on in-memory templates.
//!
//! # Running Unit Tests
//!
//! ```bash
//! cargo test --test unit
//! ```
//!
//! # Test Organization
//!
//! - **parser**: Twig token tree shape and syntax errors
//! - **walker**: which references the dependency pass follows
//! - **resolver**: path resolution and namespace handling
//! - **graph_builder**: dependency ordering, warnings and failures
//! - **emitter**: generated module structure and template ids
//! - **config**: configuration parsing and overrides

mod config;
mod graph_builder;
mod parser;
