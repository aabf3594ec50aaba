//! Global constants used throughout the twig-loader codebase.
//!
//! Names that appear in generated modules, configuration defaults, and
//! template syntax markers live here so they are defined once.

/// Project configuration file looked up from the working directory upwards.
pub const CONFIG_FILE_NAME: &str = "twig-loader.toml";

/// File extension handled when the configuration does not list any.
pub const DEFAULT_EXTENSION: &str = "twig";

/// Module the generated code imports the Twig runtime from.
pub const DEFAULT_RUNTIME_MODULE: &str = "twig";

/// Upper bound on dependency files read concurrently during one pass.
pub const DEFAULT_MAX_CONCURRENT_LOADS: usize = 8;

/// Twig's marker for "the current template" in `import`/`from`.
pub const SELF_REFERENCE: &str = "_self";

/// Prefix of the local binding generated for each dependency import.
pub const DEPENDENCY_IMPORT_PREFIX: &str = "__twig_dep_";

/// Extension appended to outputs written by `twig-loader build`.
pub const OUTPUT_EXTENSION: &str = "js";
