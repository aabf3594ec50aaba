//! Error handling for twig-loader.
//!
//! [`LoaderError`] enumerates the failures that abort a compilation. Non-fatal
//! conditions found during a dependency pass (empty files, unparsable
//! dependencies, optional includes that do not exist) are reported as
//! [`ResolutionWarning`](crate::resolver::ResolutionWarning)s instead.
//!
//! For terminal output, [`user_friendly_error`] turns any `anyhow::Error` into
//! an [`ErrorContext`] carrying a suggestion and details.

use colored::Colorize;
use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::core::file_error::FileOperationError;

/// Failures that abort the compilation of an entry template.
#[derive(Error, Debug)]
pub enum LoaderError {
    /// A statically referenced template could not be read.
    #[error(
        "Failed to load template '{specifier}' (resolved to {}) referenced from {}",
        resolved_path.display(),
        referenced_from.display()
    )]
    DependencyLoadFailure {
        /// The reference as written in the template
        specifier: String,
        /// Absolute path the reference resolved to
        resolved_path: PathBuf,
        /// Template containing the reference
        referenced_from: PathBuf,
        /// Underlying IO failure
        #[source]
        source: std::io::Error,
    },

    /// The entry template is not valid Twig.
    #[error("Syntax error in {} at line {line}: {message}", path.display())]
    TemplateSyntax {
        /// Template that failed to parse
        path: PathBuf,
        /// 1-based line of the error
        line: usize,
        /// Parser message
        message: String,
    },

    /// An explicitly requested configuration file does not exist.
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound {
        /// The requested path
        path: PathBuf,
    },

    /// The configuration file is not valid TOML or has invalid values.
    #[error("Invalid configuration in {}: {reason}", path.display())]
    ConfigParse {
        /// Path of the configuration file
        path: PathBuf,
        /// What was wrong
        reason: String,
    },

    /// A `--namespace` value could not be understood.
    #[error("Invalid namespace mapping '{value}': {reason}")]
    InvalidNamespace {
        /// The value as given
        value: String,
        /// What was wrong
        reason: String,
    },

    /// The file's extension is not one of the configured template extensions.
    #[error("Not a template file: {} (expected extension: {expected})", path.display())]
    UnsupportedTemplate {
        /// Offending path
        path: PathBuf,
        /// Configured extensions, comma separated
        expected: String,
    },

    /// The module compiler failed to produce output.
    #[error("Failed to generate module for {}: {reason}", path.display())]
    ModuleCompilation {
        /// Entry template
        path: PathBuf,
        /// Compiler message
        reason: String,
    },
}

/// Error with user-facing suggestion and details.
#[derive(Debug)]
pub struct ErrorContext {
    /// The error message
    pub error: String,
    /// Optional suggestion for resolving the error
    pub suggestion: Option<String>,
    /// Optional additional details about the error
    pub details: Option<String>,
}

impl ErrorContext {
    /// Create a context with no suggestion or details.
    #[must_use]
    pub fn new(error: impl fmt::Display) -> Self {
        Self {
            error: error.to_string(),
            suggestion: None,
            details: None,
        }
    }

    /// Add a suggestion for resolving the error
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: impl Into<String>) -> Self {
        self.suggestion = Some(suggestion.into());
        self
    }

    /// Add details explaining the error
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// Print the error to stderr with colors.
    pub fn display(&self) {
        eprintln!("{}: {}", "error".red().bold(), self.error);

        if let Some(details) = &self.details {
            eprintln!("{}: {}", "details".yellow(), details);
        }

        if let Some(suggestion) = &self.suggestion {
            eprintln!("{}: {}", "suggestion".green(), suggestion);
        }
    }
}

impl fmt::Display for ErrorContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.error)?;

        if let Some(details) = &self.details {
            write!(f, "\nDetails: {details}")?;
        }

        if let Some(suggestion) = &self.suggestion {
            write!(f, "\nSuggestion: {suggestion}")?;
        }

        Ok(())
    }
}

impl std::error::Error for ErrorContext {}

/// Convert any error to a user-friendly [`ErrorContext`].
///
/// Known error types anywhere in the chain get a tailored suggestion; the
/// full chain is kept in the message so context added with `.with_context`
/// is not lost.
pub fn user_friendly_error(error: anyhow::Error) -> ErrorContext {
    let message = format!("{error:#}");

    for cause in error.chain() {
        if let Some(loader_error) = cause.downcast_ref::<LoaderError>() {
            return create_error_context(loader_error, message);
        }
        if let Some(file_error) = cause.downcast_ref::<FileOperationError>() {
            return ErrorContext::new(message).with_details(file_error.user_message());
        }
    }

    if let Some(io_error) = error.downcast_ref::<std::io::Error>() {
        if io_error.kind() == std::io::ErrorKind::PermissionDenied {
            return ErrorContext::new(message)
                .with_suggestion("Check file ownership and permissions");
        }
    }

    ErrorContext::new(message)
}

fn create_error_context(error: &LoaderError, message: String) -> ErrorContext {
    match error {
        LoaderError::DependencyLoadFailure {
            specifier,
            source,
            ..
        } => {
            let context = ErrorContext::new(message).with_details(format!("IO error: {source}"));
            if specifier.starts_with('@') || specifier.contains("::") {
                context.with_suggestion(
                    "Check the namespace mapping in twig-loader.toml and that the file exists under it",
                )
            } else if source.kind() == std::io::ErrorKind::NotFound {
                context.with_suggestion(
                    "Check the template name; use `ignore missing` on include/embed for optional templates",
                )
            } else {
                context
            }
        }
        LoaderError::TemplateSyntax {
            ..
        } => ErrorContext::new(message)
            .with_suggestion("Fix the template syntax at the reported line"),
        LoaderError::ConfigNotFound {
            ..
        } => ErrorContext::new(message).with_suggestion(
            "Check the --config path, or omit it to search for twig-loader.toml upwards",
        ),
        LoaderError::ConfigParse {
            ..
        } => ErrorContext::new(message)
            .with_suggestion("Check the TOML syntax and the value types of each key"),
        LoaderError::InvalidNamespace {
            ..
        } => ErrorContext::new(message)
            .with_suggestion("Use the form --namespace name=path, for example --namespace ui=src/components"),
        LoaderError::UnsupportedTemplate {
            ..
        } => ErrorContext::new(message)
            .with_suggestion("Add the extension to `extensions` in twig-loader.toml"),
        LoaderError::ModuleCompilation {
            ..
        } => ErrorContext::new(message),
    }
}
