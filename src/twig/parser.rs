//! Builds the token tree from lexer segments.
//!
//! Tags with a body are paired with their closing tag. `elseif` and `else`
//! close the preceding body and open a sibling token, so an `if` chain is a
//! run of sibling tokens rather than one node with branches.

use thiserror::Error;

use super::expression::{split_at_keyword, tokenize_expression};
use super::lexer::{Segment, tokenize};
use super::token::{ExpressionToken, LogicKind, LogicToken, Token};

/// A template syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("line {line}: {message}")]
pub struct SyntaxError {
    /// What went wrong.
    pub message: String,
    /// Line of the offending tag (1-based).
    pub line: usize,
}

impl SyntaxError {
    /// Create a syntax error at `line`.
    pub fn new(message: impl Into<String>, line: usize) -> Self {
        Self {
            message: message.into(),
            line,
        }
    }
}

/// Parse a whole template.
pub fn parse(source: &str) -> Result<Vec<Token>, SyntaxError> {
    let segments = tokenize(source)?;
    let mut parser = Parser {
        segments,
        position: 0,
    };
    let (tokens, _) = parser.parse_body(None, &[])?;
    Ok(tokens)
}

/// A closing (or branching) tag that ended a body.
struct Terminator<'a> {
    name: &'a str,
    args: &'a str,
    line: usize,
}

struct Parser<'a> {
    segments: Vec<Segment<'a>>,
    position: usize,
}

impl<'a> Parser<'a> {
    /// Parse tokens until one of `ends` is found.
    ///
    /// `opener` names the tag whose body is being parsed; reaching the end of
    /// input inside a body is an error.
    fn parse_body(
        &mut self,
        opener: Option<(&str, usize)>,
        ends: &[&str],
    ) -> Result<(Vec<Token>, Option<Terminator<'a>>), SyntaxError> {
        let mut output = Vec::new();

        while let Some(segment) = self.segments.get(self.position).copied() {
            self.position += 1;
            match segment {
                Segment::Text(text) => output.push(Token::Raw {
                    value: text.to_string(),
                }),
                Segment::Output { body, line } => output.push(Token::Output {
                    stack: tokenize_expression(body, line)?,
                    line,
                }),
                Segment::Tag { body, line } => {
                    let (name, args) = split_tag(body);
                    if ends.contains(&name) {
                        return Ok((output, Some(Terminator { name, args, line })));
                    }
                    if let Some((tag, opened_at)) = opener {
                        if is_closing(name) {
                            return Err(SyntaxError::new(
                                format!(
                                    "Unclosed `{tag}` tag, found `{name}` (expected one of: {})",
                                    ends.join(", ")
                                ),
                                opened_at,
                            ));
                        }
                    }
                    self.parse_tag(name, args, line, &mut output)?;
                }
            }
        }

        match opener {
            Some((tag, line)) => Err(SyntaxError::new(
                format!("Unclosed `{tag}` tag, expected one of: {}", ends.join(", ")),
                line,
            )),
            None => Ok((output, None)),
        }
    }

    /// Parse a body that must end with `end`.
    fn parse_closed_body(
        &mut self,
        tag: &str,
        line: usize,
        end: &str,
    ) -> Result<Vec<Token>, SyntaxError> {
        let (body, _) = self.parse_body(Some((tag, line)), &[end])?;
        Ok(body)
    }

    fn parse_tag(
        &mut self,
        name: &'a str,
        args: &'a str,
        line: usize,
        output: &mut Vec<Token>,
    ) -> Result<(), SyntaxError> {
        match name {
            "if" => self.parse_if(args, line, output)?,
            "for" => self.parse_for(args, line, output)?,
            "block" => output.push(self.parse_block(args, line)?),
            "set" => output.push(self.parse_set(args, line)?),
            "spaceless" | "apply" | "macro" | "with" | "filter" | "autoescape" | "sandbox" => {
                let kind = match name {
                    "spaceless" => LogicKind::Spaceless,
                    "apply" => LogicKind::Apply,
                    "macro" => LogicKind::Macro,
                    "with" => LogicKind::With,
                    "filter" => LogicKind::Filter,
                    "autoescape" => LogicKind::Autoescape,
                    _ => LogicKind::Sandbox,
                };
                let stack = tokenize_expression(args, line)?;
                let body = self.parse_closed_body(name, line, &format!("end{name}"))?;
                output.push(Token::Logic(LogicToken::new(kind, stack, line).with_output(body)));
            }
            "extends" => {
                let stack = template_name(name, tokenize_expression(args, line)?, line)?;
                output.push(Token::Logic(LogicToken::new(LogicKind::Extends, stack, line)));
            }
            "include" => {
                let (stack, ignore_missing) = include_target(name, args, line)?;
                output.push(Token::Logic(
                    LogicToken::new(LogicKind::Include, stack, line)
                        .with_ignore_missing(ignore_missing),
                ));
            }
            "embed" => {
                let (stack, ignore_missing) = include_target(name, args, line)?;
                let body = self.parse_closed_body(name, line, "endembed")?;
                output.push(Token::Logic(
                    LogicToken::new(LogicKind::Embed, stack, line)
                        .with_output(body)
                        .with_ignore_missing(ignore_missing),
                ));
            }
            "import" | "from" | "use" => {
                let (kind, keyword) = match name {
                    "import" => (LogicKind::Import, "as"),
                    "from" => (LogicKind::From, "import"),
                    _ => (LogicKind::Use, "with"),
                };
                let (head, _) = split_at_keyword(tokenize_expression(args, line)?, &[keyword]);
                let stack = template_name(name, head, line)?;
                output.push(Token::Logic(LogicToken::new(kind, stack, line)));
            }
            "do" | "flush" | "deprecated" | "line" => {
                let stack = tokenize_expression(args, line)?;
                output.push(Token::Logic(LogicToken::new(
                    LogicKind::Other(name.to_string()),
                    stack,
                    line,
                )));
            }
            "elseif" | "else" => {
                return Err(SyntaxError::new(
                    format!("Unexpected `{name}` outside of an `if` or `for` tag"),
                    line,
                ));
            }
            _ if name.starts_with("end") => {
                return Err(SyntaxError::new(format!("Unexpected `{name}` tag"), line));
            }
            _ => {
                // Extension tags (`cache`, `types`, ...). Arguments are not
                // ours to understand; the body is still searched for references.
                let stack = tokenize_expression(args, line).unwrap_or_default();
                let end = format!("end{name}");
                let mut tag = LogicToken::new(LogicKind::Other(name.to_string()), stack, line);
                if self.has_closing_tag(&end) {
                    tag = tag.with_output(self.parse_closed_body(name, line, &end)?);
                }
                output.push(Token::Logic(tag));
            }
        }
        Ok(())
    }

    /// Whether a tag named `end` appears anywhere after the current position.
    fn has_closing_tag(&self, end: &str) -> bool {
        self.segments[self.position..].iter().any(|segment| match segment {
            Segment::Tag { body, .. } => split_tag(body).0 == end,
            _ => false,
        })
    }

    fn parse_if(
        &mut self,
        args: &str,
        line: usize,
        output: &mut Vec<Token>,
    ) -> Result<(), SyntaxError> {
        let mut kind = LogicKind::If;
        let mut stack = tokenize_expression(args, line)?;
        let mut branch_line = line;

        loop {
            let ends: &[&str] = if kind == LogicKind::Else {
                &["endif"]
            } else {
                &["elseif", "else", "endif"]
            };
            let (body, terminator) = self.parse_body(Some(("if", line)), ends)?;
            output.push(Token::Logic(
                LogicToken::new(kind, std::mem::take(&mut stack), branch_line).with_output(body),
            ));

            let Some(terminator) = terminator else {
                return Ok(());
            };
            branch_line = terminator.line;
            match terminator.name {
                "elseif" => {
                    kind = LogicKind::ElseIf;
                    stack = tokenize_expression(terminator.args, terminator.line)?;
                }
                "else" => kind = LogicKind::Else,
                _ => return Ok(()),
            }
        }
    }

    fn parse_for(
        &mut self,
        args: &str,
        line: usize,
        output: &mut Vec<Token>,
    ) -> Result<(), SyntaxError> {
        let stack = tokenize_expression(args, line)?;
        let (body, terminator) = self.parse_body(Some(("for", line)), &["else", "endfor"])?;
        output.push(Token::Logic(LogicToken::new(LogicKind::For, stack, line).with_output(body)));

        if let Some(terminator) = terminator {
            if terminator.name == "else" {
                let body = self.parse_closed_body("for", line, "endfor")?;
                output.push(Token::Logic(
                    LogicToken::new(LogicKind::Else, Vec::new(), terminator.line)
                        .with_output(body),
                ));
            }
        }
        Ok(())
    }

    fn parse_block(&mut self, args: &str, line: usize) -> Result<Token, SyntaxError> {
        let (block_name, value) = split_tag(args);
        if block_name.is_empty() {
            return Err(SyntaxError::new("`block` requires a name", line));
        }

        let name_token = ExpressionToken::Name(block_name.to_string());
        if !value.is_empty() {
            // `{% block title page_title %}` has no body
            let mut stack = vec![name_token];
            stack.extend(tokenize_expression(value, line)?);
            return Ok(Token::Logic(LogicToken::new(LogicKind::Block, stack, line)));
        }

        let body = self.parse_closed_body("block", line, "endblock")?;
        Ok(Token::Logic(LogicToken::new(LogicKind::Block, vec![name_token], line).with_output(body)))
    }

    fn parse_set(&mut self, args: &str, line: usize) -> Result<Token, SyntaxError> {
        let stack = tokenize_expression(args, line)?;
        let assigns = stack
            .iter()
            .any(|token| matches!(token, ExpressionToken::Operator(op) if op == "="));

        if assigns {
            return Ok(Token::Logic(LogicToken::new(
                LogicKind::Other("set".to_string()),
                stack,
                line,
            )));
        }

        let body = self.parse_closed_body("set", line, "endset")?;
        Ok(Token::Logic(LogicToken::new(LogicKind::Capture, stack, line).with_output(body)))
    }
}

fn is_closing(name: &str) -> bool {
    name.starts_with("end") || name == "else" || name == "elseif"
}

/// Split a tag body into its leading word and the remaining arguments.
fn split_tag(body: &str) -> (&str, &str) {
    let end = body
        .find(|c: char| !(c.is_alphanumeric() || c == '_'))
        .unwrap_or(body.len());
    (&body[..end], body[end..].trim())
}

/// Template-name expression of an include-like tag plus its `ignore missing` flag.
fn include_target(
    tag: &str,
    args: &str,
    line: usize,
) -> Result<(Vec<ExpressionToken>, bool), SyntaxError> {
    let tokens = tokenize_expression(args, line)?;
    let (head, tail) = split_at_keyword(tokens, &["ignore", "with", "only"]);
    let ignore_missing = matches!(
        tail.as_slice(),
        [first, second, ..] if first.is_name("ignore") && second.is_name("missing")
    );
    Ok((template_name(tag, head, line)?, ignore_missing))
}

fn template_name(
    tag: &str,
    stack: Vec<ExpressionToken>,
    line: usize,
) -> Result<Vec<ExpressionToken>, SyntaxError> {
    if stack.is_empty() {
        return Err(SyntaxError::new(format!("`{tag}` requires a template name"), line));
    }
    Ok(stack)
}
