//! Splits Twig source into text, print, and tag segments.

use regex::Regex;
use std::sync::LazyLock;

use super::parser::SyntaxError;

/// Matches the closing tag of a `verbatim`/`raw` section.
static VERBATIM_END: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(r"\{%[-~]?\s*end(?:verbatim|raw)\s*[-~]?%\}").ok());

/// One lexical segment of a template.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Segment<'a> {
    Text(&'a str),
    /// Body of `{{ ... }}` without delimiters or whitespace-control markers.
    Output { body: &'a str, line: usize },
    /// Body of `{% ... %}` without delimiters or whitespace-control markers.
    Tag { body: &'a str, line: usize },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Opener {
    Output,
    Tag,
    Comment,
}

/// Tokenize `source` into segments. Comments are dropped.
pub(crate) fn tokenize(source: &str) -> Result<Vec<Segment<'_>>, SyntaxError> {
    let mut segments = Vec::new();
    let mut rest = source;
    let mut line = 1;

    while let Some((offset, opener)) = find_opener(rest) {
        if offset > 0 {
            let text = &rest[..offset];
            segments.push(Segment::Text(text));
            line += count_lines(text);
        }

        let inner = &rest[offset + 2..];
        match opener {
            Opener::Comment => {
                let end = inner
                    .find("#}")
                    .ok_or_else(|| SyntaxError::new("Unclosed comment, expected `#}`", line))?;
                line += count_lines(&inner[..end + 2]);
                rest = &inner[end + 2..];
            }
            Opener::Output | Opener::Tag => {
                let closer = if opener == Opener::Output { "}}" } else { "%}" };
                let end = find_closer(inner, closer).ok_or_else(|| {
                    SyntaxError::new(format!("Unclosed tag, expected `{closer}`"), line)
                })?;
                let body = strip_whitespace_control(&inner[..end]);
                let start_line = line;
                line += count_lines(&inner[..end + 2]);
                rest = &inner[end + 2..];

                if opener == Opener::Output {
                    segments.push(Segment::Output {
                        body,
                        line: start_line,
                    });
                } else if body == "verbatim" || body == "raw" {
                    let found = VERBATIM_END.as_ref().and_then(|re| re.find(rest)).ok_or_else(|| {
                        SyntaxError::new(format!("Unclosed `{body}` section"), start_line)
                    })?;
                    let text = &rest[..found.start()];
                    if !text.is_empty() {
                        segments.push(Segment::Text(text));
                    }
                    line += count_lines(&rest[..found.end()]);
                    rest = &rest[found.end()..];
                } else {
                    segments.push(Segment::Tag {
                        body,
                        line: start_line,
                    });
                }
            }
        }
    }

    if !rest.is_empty() {
        segments.push(Segment::Text(rest));
    }

    Ok(segments)
}

fn find_opener(text: &str) -> Option<(usize, Opener)> {
    let bytes = text.as_bytes();
    bytes.windows(2).enumerate().find_map(|(i, pair)| match pair {
        [b'{', b'{'] => Some((i, Opener::Output)),
        [b'{', b'%'] => Some((i, Opener::Tag)),
        [b'{', b'#'] => Some((i, Opener::Comment)),
        _ => None,
    })
}

/// Position of `closer` in `text`, ignoring occurrences inside string literals.
fn find_closer(text: &str, closer: &str) -> Option<usize> {
    let bytes = text.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;

    while i < bytes.len() {
        let byte = bytes[i];
        match quote {
            Some(q) => {
                if byte == b'\\' {
                    i += 1;
                } else if byte == q {
                    quote = None;
                }
            }
            None => {
                if byte == b'\'' || byte == b'"' {
                    quote = Some(byte);
                } else if bytes[i..].starts_with(closer.as_bytes()) {
                    return Some(i);
                }
            }
        }
        i += 1;
    }

    None
}

fn strip_whitespace_control(body: &str) -> &str {
    let body = body.strip_prefix(['-', '~']).unwrap_or(body);
    let body = body.strip_suffix(['-', '~']).unwrap_or(body);
    body.trim()
}

fn count_lines(text: &str) -> usize {
    text.bytes().filter(|b| *b == b'\n').count()
}
