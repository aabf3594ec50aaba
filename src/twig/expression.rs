//! Expression tokenizer.
//!
//! Twig expressions are split into a flat list of [`ExpressionToken`]s. The
//! parser never builds an expression tree: dependency discovery only needs to
//! know whether a template-name expression is a plain string literal.

use std::iter::Peekable;
use std::str::CharIndices;

use super::parser::SyntaxError;
use super::token::ExpressionToken;
use crate::constants::SELF_REFERENCE;

const OPERATOR_CHARS: &str = "+-*/%~=<>!?";

/// Multi-character operators, longest first. Anything else is a single
/// character, so `x=-1` is `x`, `=`, `-`, `1`.
const COMPOUND_OPERATORS: &[&str] =
    &["<=>", "===", "!==", "==", "!=", "<=", ">=", "??", "?:", "**", "//"];
const PUNCTUATION_CHARS: &str = "()[]{},:|";

/// Tokenize an expression found on `line`.
pub fn tokenize_expression(input: &str, line: usize) -> Result<Vec<ExpressionToken>, SyntaxError> {
    let mut tokens = Vec::new();
    let mut chars = input.char_indices().peekable();

    while let Some(&(start, ch)) = chars.peek() {
        if ch.is_whitespace() {
            chars.next();
        } else if ch == '\'' || ch == '"' {
            chars.next();
            tokens.push(read_string(&mut chars, ch, line)?);
        } else if ch.is_ascii_digit() {
            tokens.push(ExpressionToken::Number(read_number(input, &mut chars, start)));
        } else if ch.is_alphabetic() || ch == '_' {
            let word = read_while(input, &mut chars, start, |c| c.is_alphanumeric() || c == '_');
            if word == SELF_REFERENCE {
                tokens.push(ExpressionToken::SelfReference);
            } else {
                tokens.push(ExpressionToken::Name(word.to_string()));
            }
        } else if ch == '.' {
            chars.next();
            if matches!(chars.peek(), Some((_, '.'))) {
                chars.next();
                tokens.push(ExpressionToken::Operator("..".to_string()));
            } else {
                tokens.push(ExpressionToken::Punctuation('.'));
            }
        } else if OPERATOR_CHARS.contains(ch) {
            let op = read_operator(&input[start..]);
            for _ in op.chars() {
                chars.next();
            }
            tokens.push(ExpressionToken::Operator(op.to_string()));
        } else if PUNCTUATION_CHARS.contains(ch) {
            chars.next();
            tokens.push(ExpressionToken::Punctuation(ch));
        } else {
            return Err(SyntaxError::new(
                format!("Unexpected character '{ch}' in expression `{input}`"),
                line,
            ));
        }
    }

    Ok(tokens)
}

fn read_string(
    chars: &mut Peekable<CharIndices<'_>>,
    quote: char,
    line: usize,
) -> Result<ExpressionToken, SyntaxError> {
    let mut value = String::new();
    let mut raw = String::new();

    while let Some((_, ch)) = chars.next() {
        if ch == '\\' {
            let Some((_, escaped)) = chars.next() else {
                break;
            };
            raw.push(ch);
            raw.push(escaped);
            value.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                other => other,
            });
        } else if ch == quote {
            if quote == '"' && raw.contains("#{") {
                return Ok(ExpressionToken::Interpolated(raw));
            }
            return Ok(ExpressionToken::String(value));
        } else {
            raw.push(ch);
            value.push(ch);
        }
    }

    Err(SyntaxError::new(format!("Unterminated string literal, expected {quote}"), line))
}

fn read_number(input: &str, chars: &mut Peekable<CharIndices<'_>>, start: usize) -> String {
    let mut end = start;
    while let Some(&(i, ch)) = chars.peek() {
        if ch.is_ascii_digit() || ch == '_' {
            end = i + ch.len_utf8();
            chars.next();
        } else if ch == '.' {
            // `1..5` is a range, `1.5` a float
            let mut lookahead = chars.clone();
            lookahead.next();
            match lookahead.peek() {
                Some((_, next)) if next.is_ascii_digit() => {
                    end = i + 1;
                    chars.next();
                }
                _ => break,
            }
        } else {
            break;
        }
    }
    input[start..end].to_string()
}

/// Longest operator at the start of `input`, which begins with one of
/// `OPERATOR_CHARS`.
fn read_operator(input: &str) -> &str {
    COMPOUND_OPERATORS
        .iter()
        .find(|op| input.starts_with(**op))
        .map(|op| &input[..op.len()])
        .unwrap_or_else(|| {
            let width = input.chars().next().map_or(0, char::len_utf8);
            &input[..width]
        })
}

fn read_while<'a>(
    input: &'a str,
    chars: &mut Peekable<CharIndices<'_>>,
    start: usize,
    keep: impl Fn(char) -> bool,
) -> &'a str {
    let mut end = start;
    while let Some(&(i, ch)) = chars.peek() {
        if !keep(ch) {
            break;
        }
        end = i + ch.len_utf8();
        chars.next();
    }
    &input[start..end]
}

/// Split `tokens` at the first top-level bare word in `keywords`.
///
/// Words nested inside brackets, parentheses or hashes never split. Returns
/// the tokens before the keyword and the keyword plus everything after it.
pub fn split_at_keyword(
    tokens: Vec<ExpressionToken>,
    keywords: &[&str],
) -> (Vec<ExpressionToken>, Vec<ExpressionToken>) {
    let mut depth = 0usize;
    let position = tokens.iter().position(|token| {
        match token {
            ExpressionToken::Punctuation('(' | '[' | '{') => depth += 1,
            ExpressionToken::Punctuation(')' | ']' | '}') => depth = depth.saturating_sub(1),
            ExpressionToken::Name(name) if depth == 0 => {
                return keywords.contains(&name.as_str());
            }
            _ => {}
        }
        false
    });

    match position {
        Some(index) => {
            let mut head = tokens;
            let tail = head.split_off(index);
            (head, tail)
        }
        None => (tokens, Vec::new()),
    }
}
