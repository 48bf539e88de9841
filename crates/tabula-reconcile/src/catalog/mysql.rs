//! MySQL catalog backed by `information_schema`.

use sqlx::mysql::MySqlPool;
use tabula_ddl::introspect::LiveColumn;

use super::SchemaCatalog;

/// Counts matching tables; `COALESCE` falls back to the connection's schema.
pub const TABLE_EXISTS_SQL: &str = "SELECT COUNT(*) FROM information_schema.TABLES \
     WHERE TABLE_SCHEMA = COALESCE(?, DATABASE()) AND TABLE_NAME = ?";

/// Reads column metadata. Values are cast to `CHAR` because MySQL 8 reports
/// several of these columns as binary strings.
pub const COLUMNS_SQL: &str = "SELECT CAST(COLUMN_NAME AS CHAR), CAST(COLUMN_TYPE AS CHAR), \
     CAST(IS_NULLABLE AS CHAR), CAST(COLUMN_DEFAULT AS CHAR), CAST(EXTRA AS CHAR) \
     FROM information_schema.COLUMNS \
     WHERE TABLE_SCHEMA = COALESCE(?, DATABASE()) AND TABLE_NAME = ? \
     ORDER BY ORDINAL_POSITION";

/// Catalog for MySQL and MariaDB.
#[derive(Debug, Clone)]
pub struct MySqlCatalog {
    pool: MySqlPool,
}

impl MySqlCatalog {
    /// Creates a catalog over `pool`.
    #[must_use]
    pub const fn new(pool: MySqlPool) -> Self {
        Self { pool }
    }

    /// Returns the underlying pool.
    #[must_use]
    pub const fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl SchemaCatalog for MySqlCatalog {
    fn engine(&self) -> &'static str {
        "mysql"
    }

    async fn table_exists(&self, schema: Option<&str>, table: &str) -> sqlx::Result<bool> {
        let (count,): (i64,) = sqlx::query_as(TABLE_EXISTS_SQL)
            .bind(schema)
            .bind(table)
            .fetch_one(&self.pool)
            .await?;
        Ok(count > 0)
    }

    async fn columns(&self, schema: Option<&str>, table: &str) -> sqlx::Result<Vec<LiveColumn>> {
        let rows: Vec<(String, String, String, Option<String>, Option<String>)> =
            sqlx::query_as(COLUMNS_SQL)
                .bind(schema)
                .bind(table)
                .fetch_all(&self.pool)
                .await?;

        Ok(rows
            .into_iter()
            .map(|(name, column_type, is_nullable, default, extra)| LiveColumn {
                name,
                column_type,
                nullable: is_nullable.eq_ignore_ascii_case("YES"),
                default,
                extra: extra.filter(|e| !e.is_empty()),
            })
            .collect())
    }

    async fn execute(&self, sql: &str) -> sqlx::Result<()> {
        sqlx::query(sql).execute(&self.pool).await?;
        Ok(())
    }
}
