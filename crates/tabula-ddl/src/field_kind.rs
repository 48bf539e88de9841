//! Mapping from SQL base types to UI field categories.

use std::fmt;

use serde::{Deserialize, Serialize};

/// UI category a column is edited with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Integral numbers.
    Number,
    /// Fixed or floating point numbers.
    Decimal,
    /// Single-line text.
    Text,
    /// Multi-line text.
    Textarea,
    /// Calendar date.
    Date,
    /// Date and time.
    Datetime,
    /// Time of day.
    Time,
    /// Checkbox.
    Boolean,
    /// Binary upload.
    File,
    /// JSON document.
    Json,
}

impl FieldKind {
    /// Maps a base type (any case, length allowed) to its category.
    ///
    /// Rules are checked in order; the first match wins and anything
    /// unrecognized is plain text.
    #[must_use]
    pub fn from_sql_type(sql_type: &str) -> Self {
        let upper = sql_type.trim().to_ascii_uppercase();
        let base = upper.split('(').next().unwrap_or_default().trim();

        if base == "JSON" {
            Self::Json
        } else if matches!(base, "BOOL" | "BOOLEAN" | "BIT") {
            Self::Boolean
        } else if base.contains("INT") || base.contains("YEAR") {
            Self::Number
        } else if ["DECIMAL", "NUMERIC", "FLOAT", "DOUBLE", "REAL"]
            .iter()
            .any(|t| base.contains(t))
        {
            Self::Decimal
        } else if base.contains("DATETIME") || base.contains("TIMESTAMP") {
            Self::Datetime
        } else if base.contains("DATE") {
            Self::Date
        } else if base.contains("TIME") {
            Self::Time
        } else if base.contains("BLOB") || base.contains("BINARY") {
            Self::File
        } else if base.contains("TEXT") || base.contains("CLOB") {
            Self::Textarea
        } else {
            Self::Text
        }
    }

    /// Lowercase category name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Number => "number",
            Self::Decimal => "decimal",
            Self::Text => "text",
            Self::Textarea => "textarea",
            Self::Date => "date",
            Self::Datetime => "datetime",
            Self::Time => "time",
            Self::Boolean => "boolean",
            Self::File => "file",
            Self::Json => "json",
        }
    }
}

impl fmt::Display for FieldKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
