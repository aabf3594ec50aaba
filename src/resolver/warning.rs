//! Non-fatal conditions found during a dependency pass.

use serde::Serialize;
use std::fmt;
use std::path::PathBuf;

/// A problem with one dependency that does not abort the pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ResolutionWarning {
    /// The dependency file exists but has no content; it was left out.
    EmptyDependency {
        specifier: String,
        path: PathBuf,
        referenced_from: PathBuf,
    },
    /// The dependency could not be parsed; its own dependencies were not
    /// followed.
    DependencyProcessingFailure {
        specifier: String,
        path: PathBuf,
        referenced_from: PathBuf,
        line: usize,
        message: String,
    },
    /// An `ignore missing` include or embed points at a file that does not
    /// exist.
    MissingOptionalDependency {
        specifier: String,
        path: PathBuf,
        referenced_from: PathBuf,
    },
    /// A `@name/...` reference names no configured namespace.
    UnknownNamespace {
        specifier: String,
        referenced_from: PathBuf,
        suggestion: Option<String>,
    },
}

impl ResolutionWarning {
    /// The template the offending reference was written in.
    pub fn referenced_from(&self) -> &PathBuf {
        match self {
            ResolutionWarning::EmptyDependency {
                referenced_from,
                ..
            }
            | ResolutionWarning::DependencyProcessingFailure {
                referenced_from,
                ..
            }
            | ResolutionWarning::MissingOptionalDependency {
                referenced_from,
                ..
            }
            | ResolutionWarning::UnknownNamespace {
                referenced_from,
                ..
            } => referenced_from,
        }
    }
}

impl fmt::Display for ResolutionWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResolutionWarning::EmptyDependency {
                specifier,
                path,
                referenced_from,
            } => write!(
                f,
                "Template '{specifier}' ({}) referenced from {} is empty and was skipped",
                path.display(),
                referenced_from.display()
            ),
            ResolutionWarning::DependencyProcessingFailure {
                specifier,
                path,
                referenced_from,
                line,
                message,
            } => write!(
                f,
                "Failed to process template '{specifier}' ({}) referenced from {}: line {line}: {message}",
                path.display(),
                referenced_from.display()
            ),
            ResolutionWarning::MissingOptionalDependency {
                specifier,
                path,
                referenced_from,
            } => write!(
                f,
                "Optional template '{specifier}' ({}) referenced from {} does not exist",
                path.display(),
                referenced_from.display()
            ),
            ResolutionWarning::UnknownNamespace {
                specifier,
                referenced_from,
                suggestion,
            } => {
                write!(
                    f,
                    "Reference '{specifier}' in {} uses an unknown namespace",
                    referenced_from.display()
                )?;
                if let Some(name) = suggestion {
                    write!(f, " (did you mean '@{name}'?)")?;
                }
                Ok(())
            }
        }
    }
}
