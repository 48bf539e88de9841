//! # tabula-ddl
//!
//! DDL parsing and schema diffing for the MySQL engine family.
//!
//! This crate provides:
//! - A pattern-based `CREATE TABLE` parser that tolerates arbitrary SQL
//!   around the statements it understands
//! - A structured table model that serializes to the JSON documents the
//!   admin UI consumes
//! - A differ that computes additive `ADD COLUMN`/`MODIFY COLUMN` steps
//!   against a live schema and never drops anything
//! - Dialects rendering the resulting DDL for MySQL and SQLite
//!
//! It has no database dependency; reading the live schema and running the
//! DDL is left to the caller.
//!
//! ## Example
//!
//! ```rust
//! use tabula_ddl::prelude::*;
//!
//! let table = parse_create_table(
//!     "CREATE TABLE users (
//!         id BIGINT AUTO_INCREMENT,
//!         name VARCHAR(50) NOT NULL,
//!         PRIMARY KEY (id)
//!     )",
//! )
//! .unwrap();
//!
//! let live = vec![LiveColumn::new("id", "bigint").not_null()];
//! let diff = diff_table(&table, &live, &DiffOptions::new());
//! let sql = diff.to_sql(&MySqlDialect::new(), &table);
//! assert_eq!(sql, vec!["ALTER TABLE `users` ADD COLUMN `name` VARCHAR(50) NOT NULL"]);
//! ```

pub mod dialect;
pub mod diff;
pub mod error;
pub mod field_kind;
pub mod introspect;
pub mod model;
pub mod parser;

pub use error::{DefinitionError, ParseError};
pub use field_kind::FieldKind;
pub use model::{ColumnDefinition, TableDefinition};

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::dialect::{is_comment, ColumnContext, DdlDialect, MySqlDialect, SqliteDialect};
    pub use crate::diff::{
        diff_column, diff_table, DiffOptions, LengthPolicy, SchemaDiff, SchemaDiffOperation,
    };
    pub use crate::error::{DefinitionError, ParseError};
    pub use crate::field_kind::FieldKind;
    pub use crate::introspect::LiveColumn;
    pub use crate::model::{
        check_foreign_key_targets, ColumnDefinition, ConfigurationInconsistency, DefaultValue,
        ForeignKeyDefinition, IndexDefinition, IndexType, ReferentialAction, TableDefinition,
    };
    pub use crate::parser::{
        parse_all_tables, parse_create_table, parse_document, ParseDiagnostic, ParsedDocument,
    };
}
