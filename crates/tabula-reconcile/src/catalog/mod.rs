//! Access to the live schema.
//!
//! A [`SchemaCatalog`] is the only way the reconciler touches a database: it
//! answers existence and column questions and executes DDL text. Driver
//! implementations live in the submodules.

mod mysql;
mod sqlite;

pub use mysql::MySqlCatalog;
pub use sqlite::SqliteCatalog;

use tabula_ddl::introspect::LiveColumn;

/// Live schema reader and DDL executor.
#[allow(async_fn_in_trait)]
pub trait SchemaCatalog {
    /// Returns the engine name, e.g. `"mysql"`.
    fn engine(&self) -> &'static str;

    /// Whether `table` exists in `schema` (or the connection's default).
    async fn table_exists(&self, schema: Option<&str>, table: &str) -> sqlx::Result<bool>;

    /// Columns of `table` in ordinal order; empty when it does not exist.
    async fn columns(&self, schema: Option<&str>, table: &str) -> sqlx::Result<Vec<LiveColumn>>;

    /// Executes one DDL statement.
    async fn execute(&self, sql: &str) -> sqlx::Result<()>;
}
