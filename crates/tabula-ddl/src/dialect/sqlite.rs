//! SQLite dialect, used for local runs and tests.

use super::DdlDialect;

/// SQLite dialect for DDL generation.
///
/// SQLite cannot change a column in place, so `MODIFY COLUMN` renders as a
/// comment. Column comments and `AUTO_INCREMENT` are dropped.
#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

impl SqliteDialect {
    /// Creates a new SQLite dialect.
    #[must_use]
    pub const fn new() -> Self {
        Self
    }
}

impl DdlDialect for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn identifier_quote(&self) -> char {
        '"'
    }
}
