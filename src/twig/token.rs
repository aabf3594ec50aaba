//! Token tree produced by the Twig parser.
//!
//! The tree only records the *shape* of a template: which tags nest inside
//! which, and the expression tokens passed to each tag. Nothing here is
//! evaluated; rendering happens in the JavaScript runtime of the generated
//! module.

use serde::Serialize;
use std::fmt;

/// A node of a parsed template.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Token {
    /// Literal template text between tags.
    Raw {
        /// The text as written in the source.
        value: String,
    },
    /// A `{{ ... }}` print statement.
    Output {
        /// Tokens of the printed expression.
        stack: Vec<ExpressionToken>,
        /// Line of the opening delimiter (1-based).
        line: usize,
    },
    /// A `{% ... %}` tag, with its body when the tag has one.
    Logic(LogicToken),
}

/// A `{% ... %}` tag.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LogicToken {
    /// Which tag this is.
    pub kind: LogicKind,
    /// Argument expression tokens. For tags that reference another template
    /// this is the template-name expression only, with modifiers such as
    /// `with`, `only` or `as name` stripped.
    pub stack: Vec<ExpressionToken>,
    /// Body tokens between the tag and its closing tag.
    pub output: Vec<Token>,
    /// `{% include ... ignore missing %}` / `{% embed ... ignore missing %}`.
    pub ignore_missing: bool,
    /// Line of the tag (1-based).
    pub line: usize,
}

impl LogicToken {
    /// Create a tag without a body.
    pub fn new(kind: LogicKind, stack: Vec<ExpressionToken>, line: usize) -> Self {
        Self {
            kind,
            stack,
            output: Vec::new(),
            ignore_missing: false,
            line,
        }
    }

    /// Attach a body.
    pub fn with_output(mut self, output: Vec<Token>) -> Self {
        self.output = output;
        self
    }

    /// Mark the reference as optional.
    pub fn with_ignore_missing(mut self, ignore_missing: bool) -> Self {
        self.ignore_missing = ignore_missing;
        self
    }
}

/// Tag kinds the parser distinguishes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LogicKind {
    Block,
    If,
    ElseIf,
    Else,
    For,
    Spaceless,
    /// `{% set name %}...{% endset %}`
    Capture,
    Macro,
    Apply,
    With,
    Filter,
    Autoescape,
    Sandbox,
    Extends,
    Include,
    Embed,
    Import,
    From,
    Use,
    /// Assignments, `do`, `flush` and tags from Twig extensions. Extension
    /// tags with a matching `end` tag carry their body in `output`.
    Other(String),
}

impl LogicKind {
    /// The tag name as written in a template.
    pub fn tag_name(&self) -> &str {
        match self {
            LogicKind::Block => "block",
            LogicKind::If => "if",
            LogicKind::ElseIf => "elseif",
            LogicKind::Else => "else",
            LogicKind::For => "for",
            LogicKind::Spaceless => "spaceless",
            LogicKind::Capture => "set",
            LogicKind::Macro => "macro",
            LogicKind::Apply => "apply",
            LogicKind::With => "with",
            LogicKind::Filter => "filter",
            LogicKind::Autoescape => "autoescape",
            LogicKind::Sandbox => "sandbox",
            LogicKind::Extends => "extends",
            LogicKind::Include => "include",
            LogicKind::Embed => "embed",
            LogicKind::Import => "import",
            LogicKind::From => "from",
            LogicKind::Use => "use",
            LogicKind::Other(name) => name,
        }
    }
}

impl fmt::Display for LogicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag_name())
    }
}

/// A leaf of an expression.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum ExpressionToken {
    /// A string literal with escapes already applied.
    String(String),
    /// A double-quoted string containing `#{...}` interpolation (raw body).
    Interpolated(String),
    /// The `_self` marker.
    SelfReference,
    Name(String),
    Number(String),
    Operator(String),
    Punctuation(char),
}

impl ExpressionToken {
    /// The literal value if this is a plain string literal.
    pub fn as_literal(&self) -> Option<&str> {
        match self {
            ExpressionToken::String(value) => Some(value),
            _ => None,
        }
    }

    /// Whether this token is the bare word `word`.
    pub fn is_name(&self, word: &str) -> bool {
        matches!(self, ExpressionToken::Name(name) if name == word)
    }
}
