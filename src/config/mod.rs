//! Project configuration.
//!
//! Settings live in `twig-loader.toml`, found by searching upwards from the
//! working directory (or given with `--config`). Every key is optional.
//!
//! ```toml
//! root = "."                      # project root, relative to this file
//! extensions = ["twig"]
//! runtime-module = "twig"
//! max-concurrent-loads = 8
//!
//! [namespaces]                    # first match wins, in file order
//! project = "src"                 # relative to root
//! components = "src/components"
//!
//! [twig]                          # passed through to Twig.twig({...})
//! strict_variables = true
//! ```
//!
//! `--root` and `--namespace name=dir` on the command line override the file.

pub mod project;

pub use project::{
    ConfigOverrides, LoaderConfig, ProjectConfig, load_project_config, parse_namespace_arg,
};
