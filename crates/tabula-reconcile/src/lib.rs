//! # tabula-reconcile
//!
//! Converges a live database schema to `CREATE TABLE` definitions parsed by
//! [`tabula_ddl`].
//!
//! Missing tables are created; existing tables receive additive
//! `ALTER TABLE` statements. Columns are never dropped: live columns the
//! definition no longer mentions are reported as drop candidates.
//!
//! ## Example
//!
//! ```rust,no_run
//! use sqlx::sqlite::SqlitePoolOptions;
//! use tabula_ddl::prelude::*;
//! use tabula_reconcile::prelude::*;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let pool = SqlitePoolOptions::new().connect("sqlite:app.sqlite3").await?;
//! let mut reconciler = Reconciler::new(SqliteCatalog::new(pool), SqliteDialect::new());
//!
//! let tables = parse_all_tables("CREATE TABLE users (id INT PRIMARY KEY, name TEXT)");
//! let batch = reconciler.reconcile_all(&tables).await;
//! assert!(batch.all_succeeded());
//! # Ok(())
//! # }
//! ```

pub mod catalog;
pub mod error;
pub mod input;
pub mod reconciler;
pub mod registry;
pub mod report;

pub use error::{ReconcileError, Result};
pub use reconciler::{ReconcileOptions, ReconcilePlan, Reconciler};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::catalog::{MySqlCatalog, SchemaCatalog, SqliteCatalog};
    pub use crate::error::ReconcileError;
    pub use crate::input::read_sql_file;
    pub use crate::reconciler::{ReconcileOptions, ReconcilePlan, Reconciler};
    pub use crate::registry::{ProvisionedTable, ProvisionedTables};
    pub use crate::report::{BatchReport, ReconcileAction, ReconcileReport};
}
