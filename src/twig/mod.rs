//! Structural Twig parser.
//!
//! This is the template-library side of the loader: it turns template source
//! into a [`Token`] tree. Only structure is recovered (tags, bodies, and the
//! expression tokens passed to tags); expressions are never evaluated.
//!
//! The dependency pass talks to the parser through the [`TemplateEngine`]
//! trait so that embedders can plug in a different front end.
//!
//! # Example
//!
//! ```
//! use twig_loader::twig::{LogicKind, TemplateEngine, Token, TwigEngine};
//!
//! let tokens = TwigEngine.parse("{% include '@ui/button.twig' %}").unwrap();
//! match &tokens[0] {
//!     Token::Logic(tag) => assert_eq!(tag.kind, LogicKind::Include),
//!     _ => unreachable!(),
//! }
//! ```

pub mod expression;
mod lexer;
pub mod parser;
pub mod token;

pub use parser::SyntaxError;
pub use token::{ExpressionToken, LogicKind, LogicToken, Token};

/// Parses template source into a token tree.
pub trait TemplateEngine: Send + Sync {
    /// Parse `source` into its top-level tokens.
    fn parse(&self, source: &str) -> Result<Vec<Token>, SyntaxError>;
}

/// The built-in Twig parser.
#[derive(Debug, Clone, Copy, Default)]
pub struct TwigEngine;

impl TemplateEngine for TwigEngine {
    fn parse(&self, source: &str) -> Result<Vec<Token>, SyntaxError> {
        parser::parse(source)
    }
}
