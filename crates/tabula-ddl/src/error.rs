//! Error types for DDL parsing and definition validation.

/// Errors raised while turning DDL text into table definitions.
///
/// A `ParseError` never aborts a whole document: the failing clause or table
/// is skipped and the error is recorded as a diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The document contains no `CREATE TABLE` statement.
    #[error("No CREATE TABLE statement found")]
    NoCreateTable,

    /// No parenthesized body follows the table name.
    #[error("CREATE TABLE {table} has no column list")]
    MissingBody {
        /// Table being parsed.
        table: String,
    },

    /// The body's opening parenthesis is never closed.
    #[error("CREATE TABLE {table} has unbalanced parentheses")]
    UnbalancedParentheses {
        /// Table being parsed.
        table: String,
    },

    /// A column clause has no recognizable name or type.
    #[error("Invalid column definition: {clause}")]
    InvalidColumn {
        /// The offending clause.
        clause: String,
    },

    /// A table-level constraint could not be read.
    #[error("Invalid {kind} constraint: {clause}")]
    InvalidConstraint {
        /// Constraint kind (e.g. "FOREIGN KEY").
        kind: &'static str,
        /// The offending clause.
        clause: String,
    },

    /// Local and referenced column lists of a foreign key differ in length.
    #[error(
        "Foreign key declares {local} local column(s) but {referenced} referenced column(s): {clause}"
    )]
    ForeignKeyArity {
        /// Number of local columns.
        local: usize,
        /// Number of referenced columns.
        referenced: usize,
        /// The offending clause.
        clause: String,
    },

    /// A constraint kind the parser does not model (e.g. `CHECK`).
    #[error("Unsupported constraint skipped: {clause}")]
    UnsupportedConstraint {
        /// The skipped clause.
        clause: String,
    },

    /// A second `CREATE TABLE` for a name already seen in the document.
    #[error("Duplicate CREATE TABLE for '{table}'")]
    DuplicateTable {
        /// Table name.
        table: String,
    },
}

/// Structural problems of an otherwise parseable table definition.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DefinitionError {
    /// The definition has no columns.
    #[error("Table '{table}' has no column definitions")]
    MissingColumnDefinitions {
        /// Table name.
        table: String,
    },

    /// Two columns share a name (compared case-insensitively).
    #[error("Table '{table}' declares column '{column}' more than once")]
    DuplicateColumn {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },

    /// More than one column is auto-increment.
    #[error("Table '{table}' has more than one auto-increment column: {columns:?}")]
    MultipleAutoIncrement {
        /// Table name.
        table: String,
        /// All auto-increment columns.
        columns: Vec<String>,
    },

    /// The auto-increment column is not part of the primary key.
    #[error("Auto-increment column '{column}' of table '{table}' is not part of the primary key")]
    AutoIncrementOutsidePrimaryKey {
        /// Table name.
        table: String,
        /// Column name.
        column: String,
    },
}

/// Result type for parsing operations.
pub type Result<T> = std::result::Result<T, ParseError>;
