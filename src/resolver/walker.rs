//! Token tree traversal that finds references to other templates.
//!
//! Each logic tag kind maps to one [`TraversalRule`]. The walk visits
//! references in source order and descends into tag bodies at any depth, so
//! an include inside a macro inside a for loop is still found.

use serde::Serialize;
use std::fmt;
use tracing::debug;

use crate::twig::{ExpressionToken, LogicKind, LogicToken, Token};

/// The tag a reference was found in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    Extends,
    Include,
    Embed,
    Import,
    From,
    Use,
}

impl fmt::Display for ReferenceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ReferenceKind::Extends => "extends",
            ReferenceKind::Include => "include",
            ReferenceKind::Embed => "embed",
            ReferenceKind::Import => "import",
            ReferenceKind::From => "from",
            ReferenceKind::Use => "use",
        };
        f.write_str(name)
    }
}

/// A statically known reference to another template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TemplateReference {
    /// The template name as written.
    pub specifier: String,
    pub kind: ReferenceKind,
    /// Line of the referencing tag.
    pub line: usize,
    /// The tag was written with `ignore missing`.
    pub ignore_missing: bool,
}

/// How the walker treats a tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TraversalRule {
    /// Recurse into the body.
    Descend,
    /// Visit the target only when every stack element is a string literal.
    LiteralTarget(ReferenceKind),
    /// Visit every string literal in the stack, then recurse into the body.
    LiteralsThenDescend(ReferenceKind),
    /// Visit every string literal in the stack unless it refers to `_self`.
    LiteralsUnlessSelf(ReferenceKind),
    Ignore,
}

fn rule_for(kind: &LogicKind) -> TraversalRule {
    match kind {
        LogicKind::Block
        | LogicKind::If
        | LogicKind::ElseIf
        | LogicKind::Else
        | LogicKind::For
        | LogicKind::Spaceless
        | LogicKind::Capture
        | LogicKind::Macro
        | LogicKind::Apply
        | LogicKind::With
        | LogicKind::Filter
        | LogicKind::Autoescape
        | LogicKind::Sandbox
        | LogicKind::Other(_) => TraversalRule::Descend,
        LogicKind::Extends => TraversalRule::LiteralTarget(ReferenceKind::Extends),
        LogicKind::Include => TraversalRule::LiteralTarget(ReferenceKind::Include),
        LogicKind::Embed => TraversalRule::LiteralsThenDescend(ReferenceKind::Embed),
        LogicKind::Import => TraversalRule::LiteralsUnlessSelf(ReferenceKind::Import),
        LogicKind::From => TraversalRule::LiteralsUnlessSelf(ReferenceKind::From),
        LogicKind::Use => TraversalRule::LiteralsUnlessSelf(ReferenceKind::Use),
    }
}

/// Calls `visit` for every static template reference in `tokens`, in source
/// order.
pub fn walk<F>(tokens: &[Token], visit: &mut F)
where
    F: FnMut(TemplateReference),
{
    for token in tokens {
        if let Token::Logic(tag) = token {
            walk_tag(tag, visit);
        }
    }
}

/// All static template references in `tokens`, in source order.
pub fn collect_references(tokens: &[Token]) -> Vec<TemplateReference> {
    let mut references = Vec::new();
    walk(tokens, &mut |reference| references.push(reference));
    references
}

fn walk_tag<F>(tag: &LogicToken, visit: &mut F)
where
    F: FnMut(TemplateReference),
{
    match rule_for(&tag.kind) {
        TraversalRule::Descend => walk(&tag.output, visit),
        TraversalRule::LiteralTarget(kind) => {
            if tag.stack.iter().all(|token| token.as_literal().is_some()) {
                visit_literals(tag, kind, visit);
            } else {
                debug!("Skipping dynamic {} target at line {}", kind, tag.line);
            }
        }
        TraversalRule::LiteralsThenDescend(kind) => {
            visit_literals(tag, kind, visit);
            walk(&tag.output, visit);
        }
        TraversalRule::LiteralsUnlessSelf(kind) => {
            if tag.stack.iter().any(|token| matches!(token, ExpressionToken::SelfReference)) {
                debug!("Skipping {} from _self at line {}", kind, tag.line);
            } else {
                visit_literals(tag, kind, visit);
            }
        }
        TraversalRule::Ignore => {}
    }
}

fn visit_literals<F>(tag: &LogicToken, kind: ReferenceKind, visit: &mut F)
where
    F: FnMut(TemplateReference),
{
    for literal in tag.stack.iter().filter_map(ExpressionToken::as_literal) {
        visit(TemplateReference {
            specifier: literal.to_string(),
            kind,
            line: tag.line,
            ignore_missing: tag.ignore_missing,
        });
    }
}
