//! Column definitions and default values.

use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::field_kind::FieldKind;
use crate::parser::scan::read_quoted;

static NUMBER: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?$").expect("valid number regex")
});

/// Default value of a column.
///
/// Serialized as the raw SQL text of the value (`'x'`, `0`,
/// `CURRENT_TIMESTAMP`, ...), which is also the form it is parsed from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "String", from = "String")]
pub enum DefaultValue {
    /// `CURRENT_TIMESTAMP`, rendered unquoted.
    CurrentTimestamp,
    /// `NULL`.
    Null,
    /// `TRUE` or `FALSE`.
    Boolean(bool),
    /// A numeric literal, kept verbatim.
    Number(String),
    /// A string literal, stored without quotes.
    Text(String),
    /// Any other expression (`(uuid())`, `CURRENT_TIMESTAMP(3)`, `b'0'`).
    Expression(String),
}

impl DefaultValue {
    /// Classifies raw default text as written after `DEFAULT`.
    #[must_use]
    pub fn parse(raw: &str) -> Self {
        let raw = raw.trim();
        if raw.starts_with('\'') || raw.starts_with('"') {
            if let Some((content, consumed)) = read_quoted(raw) {
                if consumed == raw.len() {
                    return Self::Text(content);
                }
            }
        }
        let upper = raw.to_ascii_uppercase();
        match upper.as_str() {
            "NULL" => Self::Null,
            "TRUE" => Self::Boolean(true),
            "FALSE" => Self::Boolean(false),
            "CURRENT_TIMESTAMP" | "CURRENT_TIMESTAMP()" => Self::CurrentTimestamp,
            _ if NUMBER.is_match(raw) => Self::Number(raw.to_string()),
            _ => Self::Expression(raw.to_string()),
        }
    }

    /// Returns the SQL text of the value, quoted so that [`Self::parse`]
    /// reads it back unchanged.
    #[must_use]
    pub fn to_sql(&self) -> String {
        match self {
            Self::CurrentTimestamp => String::from("CURRENT_TIMESTAMP"),
            Self::Null => String::from("NULL"),
            Self::Boolean(true) => String::from("TRUE"),
            Self::Boolean(false) => String::from("FALSE"),
            Self::Number(raw) | Self::Expression(raw) => raw.clone(),
            Self::Text(text) => {
                format!("'{}'", text.replace('\\', "\\\\").replace('\'', "''"))
            }
        }
    }
}

impl fmt::Display for DefaultValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_sql())
    }
}

impl From<DefaultValue> for String {
    fn from(value: DefaultValue) -> Self {
        value.to_sql()
    }
}

impl From<String> for DefaultValue {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

/// A column as declared in a `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnDefinition {
    /// Column name, unquoted.
    pub name: String,
    /// Uppercase base type, e.g. `VARCHAR`.
    #[serde(rename = "type")]
    pub data_type: String,
    /// Raw length or precision, e.g. `100` or `10,2`.
    pub length: Option<String>,
    /// False when the clause says `NOT NULL`.
    pub nullable: bool,
    /// Declared inline as `PRIMARY KEY`.
    pub primary_key: bool,
    /// Declared `AUTO_INCREMENT`, `AUTOINCREMENT` or `IDENTITY`.
    pub auto_increment: bool,
    /// Declared inline as `UNIQUE`.
    pub unique: bool,
    /// Default value, if any.
    pub default_value: Option<DefaultValue>,
    /// Column comment, if any.
    pub comment: Option<String>,
}

impl ColumnDefinition {
    /// Creates a nullable column with the given base type.
    #[must_use]
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into().to_ascii_uppercase(),
            length: None,
            nullable: true,
            primary_key: false,
            auto_increment: false,
            unique: false,
            default_value: None,
            comment: None,
        }
    }

    /// Sets the length or precision.
    #[must_use]
    pub fn length(mut self, length: impl Into<String>) -> Self {
        self.length = Some(length.into());
        self
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Marks the column as part of an inline primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Marks the column as auto-increment.
    #[must_use]
    pub const fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    /// Marks the column as UNIQUE.
    #[must_use]
    pub const fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Sets the default value.
    #[must_use]
    pub fn default_value(mut self, value: DefaultValue) -> Self {
        self.default_value = Some(value);
        self
    }

    /// Sets the column comment.
    #[must_use]
    pub fn comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    /// Type with its length, e.g. `VARCHAR(100)`.
    #[must_use]
    pub fn full_type(&self) -> String {
        match &self.length {
            Some(length) => format!("{}({length})", self.data_type),
            None => self.data_type.clone(),
        }
    }

    /// UI category of the column's type.
    #[must_use]
    pub fn field_kind(&self) -> FieldKind {
        FieldKind::from_sql_type(&self.data_type)
    }
}
