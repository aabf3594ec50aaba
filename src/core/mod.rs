//! Core error types shared across the crate.
//!
//! - [`error`]: [`LoaderError`] and the user-facing [`ErrorContext`]
//! - [`file_error`]: structured file system errors

pub mod error;
pub mod file_error;

pub use error::{ErrorContext, LoaderError, user_friendly_error};
pub use file_error::{FileOperation, FileOperationError, FileResultExt};
