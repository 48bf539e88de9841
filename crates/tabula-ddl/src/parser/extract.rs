//! Locating `CREATE TABLE` statements in a SQL document.

use once_cell::sync::Lazy;
use regex::{CaptureMatches, Captures, Regex};

use super::scan::{blank_comments, find_code, mask_literals, matching_paren, unquote_identifier};
use crate::error::ParseError;

static CREATE_TABLE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r#"(?i)\bCREATE\s+(?:TEMPORARY\s+)?TABLE\s+(?:IF\s+NOT\s+EXISTS\s+)?(`[^`]+`|"[^"]+"|\[[^\]]+\]|\w+)(?:\s*\.\s*(`[^`]+`|"[^"]+"|\[[^\]]+\]|\w+))?"#,
    )
    .expect("valid CREATE TABLE regex")
});

/// A SQL document prepared for statement extraction.
///
/// Comments are blanked out up front so commented-out DDL is never matched.
#[derive(Debug, Clone)]
pub struct SqlDocument {
    text: String,
    masked: String,
}

impl SqlDocument {
    /// Prepares `sql` for extraction.
    #[must_use]
    pub fn new(sql: &str) -> Self {
        let text = blank_comments(sql);
        let masked = mask_literals(&text);
        Self { text, masked }
    }

    /// Lazily yields one [`RawStatement`] per `CREATE TABLE` occurrence.
    #[must_use]
    pub fn statements(&self) -> CreateTableStatements<'_> {
        CreateTableStatements {
            text: &self.text,
            masked: &self.masked,
            matches: CREATE_TABLE.captures_iter(&self.text),
            pending: None,
        }
    }
}

/// The text of a single `CREATE TABLE` statement and its name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatement<'a> {
    /// Schema qualifier, unquoted.
    pub schema_name: Option<String>,
    /// Table name, unquoted.
    pub table_name: String,
    /// Statement text, from `CREATE` up to the next statement.
    pub text: &'a str,
    /// Byte offset of the statement in the document.
    pub offset: usize,
    name_end: usize,
}

impl<'a> RawStatement<'a> {
    /// Returns the text between the body's outermost parentheses.
    ///
    /// # Errors
    ///
    /// Fails when no `(` follows the name or it is never closed.
    pub fn body(&self) -> Result<&'a str, ParseError> {
        let after_name = &self.text[self.name_end..];
        let open = find_code(after_name, '(').ok_or_else(|| ParseError::MissingBody {
            table: self.table_name.clone(),
        })?;
        let close =
            matching_paren(after_name, open).ok_or_else(|| ParseError::UnbalancedParentheses {
                table: self.table_name.clone(),
            })?;
        Ok(&after_name[open + 1..close])
    }
}

/// Iterator over the `CREATE TABLE` statements of a [`SqlDocument`].
pub struct CreateTableStatements<'a> {
    text: &'a str,
    masked: &'a str,
    matches: CaptureMatches<'static, 'a>,
    pending: Option<Captures<'a>>,
}

impl<'a> CreateTableStatements<'a> {
    /// Next match that starts in code rather than inside a string literal.
    fn next_in_code(&mut self) -> Option<Captures<'a>> {
        let masked = self.masked;
        self.matches.find(|caps| {
            let start = caps.get(0).map_or(0, |m| m.start());
            masked
                .get(start..start + "CREATE".len())
                .is_some_and(|word| word.eq_ignore_ascii_case("CREATE"))
        })
    }
}

impl<'a> Iterator for CreateTableStatements<'a> {
    type Item = RawStatement<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let current = match self.pending.take() {
            Some(caps) => caps,
            None => self.next_in_code()?,
        };
        self.pending = self.next_in_code();

        let whole = current.get(0)?;
        let end = self
            .pending
            .as_ref()
            .and_then(|caps| caps.get(0))
            .map_or(self.text.len(), |m| m.start());

        let first = current.get(1).map(|m| unquote_identifier(m.as_str()));
        let second = current.get(2).map(|m| unquote_identifier(m.as_str()));
        let (schema_name, table_name) = match (first, second) {
            (Some(schema), Some(table)) => (Some(schema), table),
            (Some(table), None) => (None, table),
            _ => return None,
        };

        Some(RawStatement {
            schema_name,
            table_name,
            text: &self.text[whole.start()..end],
            offset: whole.start(),
            name_end: whole.end() - whole.start(),
        })
    }
}
