//! Integration test suite for twig-loader
//!
//! End-to-end tests on real template trees in temporary directories: the
//! transform hook with templates read from disk, and the `twig-loader`
//! binary.
//!
//! # Running Integration Tests
//!
//! ```bash
//! cargo test --test integration
//! ```
//!
//! # Test Organization
//!
//! - **transform**: library transform hook against files on disk
//! - **cli_transform**: `twig-loader transform`
//! - **cli_deps**: `twig-loader deps`
//! - **cli_build**: `twig-loader build`
//! - **error_scenarios**: failures and their user-facing messages

// Shared test utilities (from parent tests/ directory)
#[path = "../common/mod.rs"]
mod common;

mod cli_build;
mod cli_deps;
mod error_scenarios;
mod transform;
