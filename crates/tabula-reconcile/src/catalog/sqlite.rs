//! SQLite catalog backed by `sqlite_master` and `pragma_table_info`.

use sqlx::sqlite::SqlitePool;
use tabula_ddl::introspect::LiveColumn;

use super::SchemaCatalog;

/// Catalog for SQLite databases.
///
/// SQLite has no schemas in the MySQL sense, so the schema argument is
/// ignored.
#[derive(Debug, Clone)]
pub struct SqliteCatalog {
    pool: SqlitePool,
}

impl SqliteCatalog {
    /// Creates a catalog over `pool`.
    #[must_use]
    pub const fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

impl SchemaCatalog for SqliteCatalog {
    fn engine(&self) -> &'static str {
        "sqlite"
    }

    async fn table_exists(&self, _schema: Option<&str>, table: &str) -> sqlx::Result<bool> {
        let (count,): (i64,) = sqlx::query_as(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ? COLLATE NOCASE",
        )
        .bind(table)
        .fetch_one(&self.pool)
        .await?;
        Ok(count > 0)
    }

    async fn columns(&self, _schema: Option<&str>, table: &str) -> sqlx::Result<Vec<LiveColumn>> {
        let rows: Vec<(String, String, i64, Option<String>)> = sqlx::query_as(
            "SELECT name, type, \"notnull\", dflt_value FROM pragma_table_info(?) ORDER BY cid",
        )
        .bind(table)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|(name, column_type, not_null, default)| LiveColumn {
                name,
                column_type,
                nullable: not_null == 0,
                default,
                extra: None,
            })
            .collect())
    }

    async fn execute(&self, sql: &str) -> sqlx::Result<()> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}
