//! Structured table definitions produced by the parser.

mod column;
mod constraint;
mod table;

pub use column::{ColumnDefinition, DefaultValue};
pub use constraint::{
    ForeignKeyDefinition, IndexDefinition, IndexType, ReferentialAction, PRIMARY_INDEX_NAME,
};
pub use table::{check_foreign_key_targets, ConfigurationInconsistency, TableDefinition};
