//! Test utilities for twig-loader.
//!
//! Available to unit tests and, through the `test-utils` feature, to the
//! integration suites.
//!
//! # Example
//!
//! ```rust,no_run
//! use twig_loader::test_utils::{TestProject, init_test_logging};
//!
//! init_test_logging(None);
//! let project = TestProject::new().unwrap();
//! project.create_template("src/pages/home.twig", "{% include '@ui/card.twig' %}").unwrap();
//! project.create_template("src/components/card.twig", "<div class=\"card\"></div>").unwrap();
//! project.write_config("[namespaces]\nui = \"src/components\"\n").unwrap();
//! ```

mod project;

pub use project::TestProject;

use std::sync::Once;
use tracing::Level;
use tracing_subscriber::EnvFilter;

/// Global flag to ensure logging is only initialized once in tests
static INIT_LOGGING: Once = Once::new();

/// Initialize logging for tests.
///
/// Only the first call has any effect. `level` wins over `RUST_LOG`; with
/// neither, logging stays off.
///
/// ```bash
/// RUST_LOG=twig_loader=debug cargo test
/// ```
pub fn init_test_logging(level: Option<Level>) {
    INIT_LOGGING.call_once(|| {
        let filter = if let Some(level) = level {
            EnvFilter::new(level.to_string())
        } else if std::env::var("RUST_LOG").is_ok() {
            EnvFilter::from_default_env()
        } else {
            return;
        };

        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_test_writer()
            .with_target(true)
            .with_thread_ids(false)
            .try_init();
    });
}
