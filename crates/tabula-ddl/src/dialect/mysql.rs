//! MySQL/MariaDB dialect.

use super::DdlDialect;

/// Table options appended to `CREATE TABLE` by default.
pub const DEFAULT_TABLE_OPTIONS: &str =
    "ENGINE=InnoDB DEFAULT CHARSET=utf8mb4 COLLATE=utf8mb4_unicode_ci";

/// MySQL dialect for DDL generation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MySqlDialect {
    table_options: Option<String>,
}

impl Default for MySqlDialect {
    fn default() -> Self {
        Self::new()
    }
}

impl MySqlDialect {
    /// Creates a MySQL dialect using [`DEFAULT_TABLE_OPTIONS`].
    #[must_use]
    pub fn new() -> Self {
        Self {
            table_options: Some(DEFAULT_TABLE_OPTIONS.to_string()),
        }
    }

    /// Replaces the `CREATE TABLE` options; an empty string disables them.
    #[must_use]
    pub fn with_table_options(mut self, options: impl Into<String>) -> Self {
        let options = options.into();
        self.table_options = if options.trim().is_empty() {
            None
        } else {
            Some(options)
        };
        self
    }
}

impl DdlDialect for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn identifier_quote(&self) -> char {
        '`'
    }

    fn auto_increment_keyword(&self) -> Option<&'static str> {
        Some("AUTO_INCREMENT")
    }

    fn supports_modify_column(&self) -> bool {
        true
    }

    fn supports_column_comments(&self) -> bool {
        true
    }

    fn table_options(&self) -> Option<&str> {
        self.table_options.as_deref()
    }

    fn quote_literal(&self, text: &str) -> String {
        // Backslash is an escape character in MySQL string literals.
        format!("'{}'", text.replace('\\', "\\\\").replace('\'', "''"))
    }
}
