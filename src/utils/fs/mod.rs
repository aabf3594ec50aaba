//! File system utilities.
//!
//! Path helpers here are purely lexical: template references are resolved
//! without touching the disk, so equivalent spellings of one file must
//! normalise to the same [`PathBuf`](std::path::PathBuf).

pub mod atomic;
pub mod discovery;
pub mod paths;

pub use atomic::{atomic_write, safe_write};
pub use discovery::find_templates;
pub use paths::{diff_paths, find_upwards, normalize_path, relative_to, to_forward_slashes};
