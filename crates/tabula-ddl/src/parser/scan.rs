//! Quote-aware character scanning.
//!
//! Every structural decision the parser makes (where a comment starts, which
//! comma separates two clauses, which parenthesis closes a body) has to ignore
//! text inside string literals and quoted identifiers. [`Scanner`] walks SQL
//! text once and labels each character with the lexical region it belongs to;
//! the helpers in this module are built on top of it.

use std::iter::Peekable;
use std::str::CharIndices;

/// Lexical region of a single character.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Region {
    /// Ordinary SQL text.
    Code,
    /// An opening or closing quote character.
    Delimiter,
    /// Content of a string literal or quoted identifier.
    Literal,
    /// Part of a `--` or `/* */` comment.
    Comment,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    Quoted(char),
    Escaped(char),
    LineComment,
    BlockOpening,
    BlockComment { after_star: bool },
}

/// Iterator over `(byte offset, char, region)` triples.
pub struct Scanner<'a> {
    chars: Peekable<CharIndices<'a>>,
    state: State,
}

impl<'a> Scanner<'a> {
    /// Creates a scanner positioned at the start of `text`.
    #[must_use]
    pub fn new(text: &'a str) -> Self {
        Self {
            chars: text.char_indices().peekable(),
            state: State::Normal,
        }
    }

    fn peek_char(&mut self) -> Option<char> {
        self.chars.peek().map(|&(_, c)| c)
    }
}

impl Iterator for Scanner<'_> {
    type Item = (usize, char, Region);

    fn next(&mut self) -> Option<Self::Item> {
        let (pos, c) = self.chars.next()?;
        let region = match self.state {
            State::Normal => match c {
                '\'' | '"' | '`' => {
                    self.state = State::Quoted(c);
                    Region::Delimiter
                }
                '-' if self.peek_char() == Some('-') => {
                    self.state = State::LineComment;
                    Region::Comment
                }
                '#' => {
                    self.state = State::LineComment;
                    Region::Comment
                }
                '/' if self.peek_char() == Some('*') => {
                    self.state = State::BlockOpening;
                    Region::Comment
                }
                _ => Region::Code,
            },
            State::Quoted(quote) => {
                if c == quote {
                    // A doubled quote closes and immediately reopens.
                    self.state = State::Normal;
                    Region::Delimiter
                } else {
                    if c == '\\' && quote != '`' {
                        self.state = State::Escaped(quote);
                    }
                    Region::Literal
                }
            }
            State::Escaped(quote) => {
                self.state = State::Quoted(quote);
                Region::Literal
            }
            State::LineComment => {
                if c == '\n' {
                    self.state = State::Normal;
                    Region::Code
                } else {
                    Region::Comment
                }
            }
            State::BlockOpening => {
                self.state = State::BlockComment { after_star: false };
                Region::Comment
            }
            State::BlockComment { after_star } => {
                if after_star && c == '/' {
                    self.state = State::Normal;
                } else {
                    self.state = State::BlockComment {
                        after_star: c == '*',
                    };
                }
                Region::Comment
            }
        };
        Some((pos, c, region))
    }
}

fn replace_region(text: &str, target: Region) -> String {
    let mut out = String::with_capacity(text.len());
    for (_, c, region) in Scanner::new(text) {
        if region == target && c != '\n' {
            out.extend(std::iter::repeat(' ').take(c.len_utf8()));
        } else {
            out.push(c);
        }
    }
    out
}

/// Replaces `--`, `#` and `/* */` comments with spaces.
///
/// Byte offsets are preserved, so positions found in the result index the
/// original text too.
#[must_use]
pub fn blank_comments(text: &str) -> String {
    replace_region(text, Region::Comment)
}

/// Replaces the content of every quoted literal or identifier with spaces,
/// keeping the quote characters and byte offsets.
#[must_use]
pub fn mask_literals(text: &str) -> String {
    replace_region(text, Region::Literal)
}

/// Returns the byte offset of the first `needle` outside quotes and comments.
#[must_use]
pub fn find_code(text: &str, needle: char) -> Option<usize> {
    Scanner::new(text)
        .find(|&(_, c, region)| region == Region::Code && c == needle)
        .map(|(pos, _, _)| pos)
}

/// Given the offset of an opening parenthesis, returns the offset of the
/// parenthesis that closes it.
#[must_use]
pub fn matching_paren(text: &str, open: usize) -> Option<usize> {
    let tail = text.get(open..)?;
    if !tail.starts_with('(') {
        return None;
    }
    let mut depth = 0usize;
    for (pos, c, region) in Scanner::new(tail) {
        if region != Region::Code {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open + pos);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits `text` on commas at parenthesis depth zero.
///
/// Pieces are trimmed and empty pieces are dropped. A stray closing
/// parenthesis never drives the depth below zero.
#[must_use]
pub fn split_top_level(text: &str) -> Vec<&str> {
    let mut pieces = Vec::new();
    let mut depth = 0usize;
    let mut start = 0;
    for (pos, c, region) in Scanner::new(text) {
        if region != Region::Code {
            continue;
        }
        match c {
            '(' => depth += 1,
            ')' => depth = depth.saturating_sub(1),
            ',' if depth == 0 => {
                pieces.push(&text[start..pos]);
                start = pos + 1;
            }
            _ => {}
        }
    }
    pieces.push(&text[start..]);
    pieces
        .into_iter()
        .map(str::trim)
        .filter(|piece| !piece.is_empty())
        .collect()
}

/// Reads a quoted literal at the start of `text`.
///
/// Returns the unescaped content and the number of bytes consumed, including
/// both quotes. Doubled quotes and backslash escapes are honoured.
#[must_use]
pub fn read_quoted(text: &str) -> Option<(String, usize)> {
    let mut chars = text.char_indices().peekable();
    let (_, quote) = chars.next()?;
    if !matches!(quote, '\'' | '"' | '`') {
        return None;
    }
    let mut content = String::new();
    while let Some((pos, c)) = chars.next() {
        if c == quote {
            if chars.peek().is_some_and(|&(_, next)| next == quote) {
                chars.next();
                content.push(quote);
                continue;
            }
            return Some((content, pos + c.len_utf8()));
        }
        if c == '\\' && quote != '`' {
            let (_, escaped) = chars.next()?;
            content.push(match escaped {
                'n' => '\n',
                't' => '\t',
                'r' => '\r',
                '0' => '\0',
                other => other,
            });
            continue;
        }
        content.push(c);
    }
    None
}

/// Reads one identifier at the start of `text`, quoted or bare.
///
/// Returns the de-quoted identifier and the rest of the text. Bare
/// identifiers end at whitespace, a comma or a parenthesis.
#[must_use]
pub fn read_identifier(text: &str) -> Option<(String, &str)> {
    let text = text.trim_start();
    let first = text.chars().next()?;
    match first {
        '`' | '"' => {
            let (name, consumed) = read_quoted(text)?;
            Some((name, &text[consumed..]))
        }
        '[' => {
            let close = text.find(']')?;
            Some((text[1..close].to_string(), &text[close + 1..]))
        }
        _ => {
            let end = text
                .find(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')' | '.'))
                .unwrap_or(text.len());
            if end == 0 {
                return None;
            }
            Some((text[..end].to_string(), &text[end..]))
        }
    }
}

/// Strips one layer of identifier quoting (backticks, double quotes or
/// brackets).
#[must_use]
pub fn unquote_identifier(raw: &str) -> String {
    let raw = raw.trim();
    let stripped = if raw.len() >= 2 {
        let (first, last) = (raw.as_bytes()[0], raw.as_bytes()[raw.len() - 1]);
        match (first, last) {
            (b'`', b'`') | (b'"', b'"') | (b'[', b']') => Some(&raw[1..raw.len() - 1]),
            _ => None,
        }
    } else {
        None
    };
    stripped.unwrap_or(raw).to_string()
}
