//! Live schema state as reported by a database catalog.
//!
//! Reading the catalog needs a database connection and lives in driver code;
//! this module only defines the shape the differ consumes.

use serde::{Deserialize, Serialize};

/// One column of an existing table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LiveColumn {
    /// Column name.
    pub name: String,
    /// Full type as stored, e.g. `varchar(50)` or `decimal(10,2) unsigned`.
    pub column_type: String,
    /// Whether the column accepts NULL.
    pub nullable: bool,
    /// Raw default expression, if any.
    pub default: Option<String>,
    /// Extra markers, e.g. `auto_increment`.
    pub extra: Option<String>,
}

impl LiveColumn {
    /// Creates a nullable column without default or extras.
    #[must_use]
    pub fn new(name: impl Into<String>, column_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            column_type: column_type.into(),
            nullable: true,
            default: None,
            extra: None,
        }
    }

    /// Marks the column as NOT NULL.
    #[must_use]
    pub const fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Sets the raw default.
    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }

    /// Sets the extra markers.
    #[must_use]
    pub fn extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Type name before any `(`, uppercased and trimmed.
    #[must_use]
    pub fn base_type(&self) -> String {
        let head = self.column_type.split('(').next().unwrap_or_default();
        head.split_whitespace()
            .next()
            .unwrap_or_default()
            .to_ascii_uppercase()
    }

    /// Text inside the first pair of parentheses, if any.
    #[must_use]
    pub fn length(&self) -> Option<&str> {
        let open = self.column_type.find('(')?;
        let close = self.column_type[open..].find(')')? + open;
        Some(self.column_type[open + 1..close].trim())
    }

    /// Whether the extra markers include auto-increment.
    #[must_use]
    pub fn is_auto_increment(&self) -> bool {
        self.extra
            .as_deref()
            .is_some_and(|extra| extra.to_ascii_lowercase().contains("auto_increment"))
    }
}
