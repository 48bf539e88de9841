//! Column clause parsing.
//!
//! Each attribute is pulled out by its own small extractor. Keyword searches
//! run over a copy of the clause whose literal contents are blanked, so a
//! comment such as `'must be NOT NULL'` never sets a flag.

use once_cell::sync::Lazy;
use regex::Regex;

use super::constraint::parse_references;
use super::scan::{mask_literals, matching_paren, read_identifier, read_quoted};
use crate::error::ParseError;
use crate::model::{ColumnDefinition, DefaultValue, ForeignKeyDefinition};

static BASE_TYPE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^\s*((?:NATIONAL\s+)?(?:CHARACTER|CHAR)\s+VARYING\b|NATIONAL\s+(?:CHARACTER|CHAR|VARCHAR)\b|DOUBLE\s+PRECISION\b|LONG\s+(?:VARCHAR|VARBINARY)\b|[A-Za-z_][A-Za-z0-9_]*)",
    )
    .expect("valid type regex")
});
static NOT_NULL: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bNOT\s+NULL\b").expect("valid NOT NULL regex"));
static PRIMARY_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bPRIMARY\s+KEY\b").expect("valid PRIMARY KEY regex"));
static AUTO_INCREMENT: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(?:AUTO_INCREMENT|AUTOINCREMENT|IDENTITY)\b")
        .expect("valid AUTO_INCREMENT regex")
});
static UNIQUE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bUNIQUE\b").expect("valid UNIQUE regex"));
static DEFAULT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bDEFAULT\b\s*").expect("valid DEFAULT regex"));
static COMMENT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bCOMMENT\b\s*(?:=\s*)?").expect("valid COMMENT regex"));
static REFERENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\bREFERENCES\b").expect("valid REFERENCES regex"));

/// A parsed column clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedColumn {
    /// The column itself.
    pub column: ColumnDefinition,
    /// Inline `REFERENCES` turned into a foreign key.
    pub foreign_key: Option<ForeignKeyDefinition>,
}

/// Parses a column clause such as
/// `` `price` DECIMAL(10,2) NOT NULL DEFAULT 0 COMMENT 'unit price' ``.
///
/// # Errors
///
/// Fails when the clause has no name or no type word, or when an inline
/// `REFERENCES` cannot be read.
pub fn parse_column(clause: &str) -> Result<ParsedColumn, ParseError> {
    let invalid = || ParseError::InvalidColumn {
        clause: clause.trim().to_string(),
    };

    let (name, after_name) = read_identifier(clause).ok_or_else(invalid)?;
    let type_caps = BASE_TYPE.captures(after_name).ok_or_else(invalid)?;
    let type_match = type_caps.get(1).ok_or_else(invalid)?;
    // Multi-word types keep single spaces: `DOUBLE PRECISION`.
    let data_type = type_match
        .as_str()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_ascii_uppercase();

    let (length, modifiers) = extract_length(&after_name[type_match.end()..]);

    let masked = mask_literals(modifiers);
    let mut column = ColumnDefinition::new(name.clone(), data_type);
    column.length = length;
    column.nullable = !NOT_NULL.is_match(&masked);
    column.primary_key = PRIMARY_KEY.is_match(&masked);
    column.auto_increment = AUTO_INCREMENT.is_match(&masked);
    column.unique = UNIQUE.is_match(&masked);
    column.default_value = extract_default(modifiers, &masked);
    column.comment = extract_comment(modifiers, &masked);
    if column.data_type == "SERIAL" {
        // BIGINT UNSIGNED NOT NULL AUTO_INCREMENT UNIQUE
        column.nullable = false;
        column.auto_increment = true;
        column.unique = true;
    }

    let foreign_key = match REFERENCES.find(&masked) {
        Some(m) => Some(parse_references(
            None,
            vec![name],
            &modifiers[m.start()..],
            clause,
        )?),
        None => None,
    };

    Ok(ParsedColumn {
        column,
        foreign_key,
    })
}

/// Splits `(len)` off the text following the type word.
fn extract_length(text: &str) -> (Option<String>, &str) {
    let trimmed = text.trim_start();
    let offset = text.len() - trimmed.len();
    if !trimmed.starts_with('(') {
        return (None, text);
    }
    match matching_paren(trimmed, 0) {
        Some(close) => {
            let inner = trimmed[1..close].trim();
            let length = (!inner.is_empty()).then(|| inner.to_string());
            (length, &text[offset + close + 1..])
        }
        None => (None, text),
    }
}

/// Reads the value after `DEFAULT`: a quoted literal, a parenthesized
/// expression, or a single token (with a directly attached argument list,
/// as in `CURRENT_TIMESTAMP(3)`).
#[must_use]
pub fn extract_default(modifiers: &str, masked: &str) -> Option<DefaultValue> {
    let m = DEFAULT.find(masked)?;
    let value = &modifiers[m.end()..];

    if value.starts_with('\'') || value.starts_with('"') {
        let (_, consumed) = read_quoted(value)?;
        return Some(DefaultValue::parse(&value[..consumed]));
    }
    if value.starts_with('(') {
        let close = matching_paren(value, 0)?;
        return Some(DefaultValue::Expression(value[..=close].to_string()));
    }

    let end = value
        .find(|c: char| c.is_whitespace() || matches!(c, ',' | '(' | ')'))
        .unwrap_or(value.len());
    if end == 0 {
        return None;
    }
    let mut token_end = end;
    if value[end..].starts_with('(') {
        if let Some(close) = matching_paren(value, end) {
            token_end = close + 1;
        }
    }
    Some(DefaultValue::parse(&value[..token_end]))
}

/// Reads the single-quoted text after `COMMENT`.
#[must_use]
pub fn extract_comment(modifiers: &str, masked: &str) -> Option<String> {
    let m = COMMENT.find(masked)?;
    read_quoted(&modifiers[m.end()..]).map(|(text, _)| text)
}
