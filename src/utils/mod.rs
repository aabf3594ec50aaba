//! Cross-platform utilities shared by the resolver, the emitter, and the CLI.
//!
//! - [`fs`] - path normalisation, atomic writes, template discovery

pub mod fs;

pub use fs::{
    atomic_write, diff_paths, find_templates, find_upwards, normalize_path, relative_to, safe_write,
    to_forward_slashes,
};
