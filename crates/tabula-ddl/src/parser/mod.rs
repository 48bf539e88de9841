//! Pattern-based `CREATE TABLE` parser.
//!
//! The parser does not implement a SQL grammar. It locates statements with a
//! regular expression, cuts each body into top-level clauses, classifies the
//! clauses by their leading keywords and reads every attribute with a
//! dedicated extractor:
//!
//! - [`extract`] finds statement boundaries in a document
//! - [`split_clauses`] segments a body on top-level commas
//! - [`classify`] labels clauses as columns or constraints
//! - [`column`] and [`constraint`] read the clauses
//!
//! Failures are contained: a bad clause is skipped, a bad table is skipped,
//! and both are reported as [`ParseDiagnostic`]s.
//!
//! # Example
//!
//! ```rust
//! use tabula_ddl::parser::parse_all_tables;
//!
//! let tables = parse_all_tables(
//!     "CREATE TABLE users (id BIGINT AUTO_INCREMENT, name VARCHAR(50) NOT NULL, PRIMARY KEY (id))",
//! );
//! assert_eq!(tables.len(), 1);
//! assert_eq!(tables[0].columns.len(), 2);
//! assert_eq!(tables[0].primary_key_columns(), vec!["id"]);
//! ```

pub mod classify;
pub mod column;
pub mod constraint;
pub mod extract;
pub mod scan;

use std::collections::BTreeSet;
use std::fmt;

use tracing::{debug, warn};

pub use classify::{classify, Clause, ClauseKind};
pub use column::{extract_comment, extract_default, parse_column, ParsedColumn};
pub use constraint::{
    parse_column_list, parse_foreign_key, parse_index, parse_primary_key, parse_references,
};
pub use extract::{CreateTableStatements, RawStatement, SqlDocument};

use crate::error::ParseError;
use crate::model::{check_foreign_key_targets, ConfigurationInconsistency, IndexType, TableDefinition};

/// Something the parser skipped or flagged while reading a document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseDiagnostic {
    /// One clause of a table could not be read; the table was kept.
    SkippedClause {
        /// Table the clause belongs to.
        table: String,
        /// Why the clause was skipped.
        error: ParseError,
    },
    /// A whole statement was dropped.
    SkippedTable {
        /// Table name as matched.
        table: String,
        /// Why the statement was dropped.
        error: ParseError,
    },
    /// A foreign key points at a table that is not in the document.
    DanglingForeignKey(ConfigurationInconsistency),
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SkippedClause { table, error } => {
                write!(f, "{table}: skipped clause: {error}")
            }
            Self::SkippedTable { table, error } => write!(f, "{table}: skipped table: {error}"),
            Self::DanglingForeignKey(issue) => write!(f, "{issue}"),
        }
    }
}

/// Result of parsing a full document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDocument {
    /// Successfully parsed tables, in document order.
    pub tables: Vec<TableDefinition>,
    /// Everything that was skipped or flagged.
    pub diagnostics: Vec<ParseDiagnostic>,
}

impl ParsedDocument {
    /// Looks a parsed table up by name, case-insensitively.
    #[must_use]
    pub fn table(&self, name: &str) -> Option<&TableDefinition> {
        self.tables
            .iter()
            .find(|t| t.table_name.eq_ignore_ascii_case(name))
    }
}

/// Splits a table body into its top-level clauses.
///
/// Commas nested in parentheses or quotes do not split, so
/// `price DECIMAL(10,2), qty INT` yields two clauses.
#[must_use]
pub fn split_clauses(body: &str) -> Vec<&str> {
    scan::split_top_level(body)
}

fn build_table(
    statement: &RawStatement<'_>,
    diagnostics: &mut Vec<ParseDiagnostic>,
) -> Result<TableDefinition, ParseError> {
    let body = statement.body()?;
    let mut table = TableDefinition::new(statement.table_name.clone());
    table.schema_name.clone_from(&statement.schema_name);

    for text in split_clauses(body) {
        let clause = classify(text);
        let outcome = match clause.kind {
            ClauseKind::Column => parse_column(text).map(|parsed| {
                table.columns.push(parsed.column);
                table.foreign_keys.extend(parsed.foreign_key);
            }),
            ClauseKind::PrimaryKey => {
                parse_primary_key(clause.rest, text).map(|index| table.indexes.push(index))
            }
            ClauseKind::ForeignKey => parse_foreign_key(clause.constraint_name, clause.rest, text)
                .map(|fk| table.foreign_keys.push(fk)),
            ClauseKind::Unique => {
                parse_index(IndexType::Unique, clause.constraint_name, clause.rest, text)
                    .map(|index| table.indexes.push(index))
            }
            ClauseKind::Index => {
                parse_index(IndexType::Index, clause.constraint_name, clause.rest, text)
                    .map(|index| table.indexes.push(index))
            }
            ClauseKind::OtherConstraint => Err(ParseError::UnsupportedConstraint {
                clause: text.to_string(),
            }),
        };

        if let Err(error) = outcome {
            warn!(table = %statement.table_name, error = %error, "Skipping clause");
            diagnostics.push(ParseDiagnostic::SkippedClause {
                table: statement.table_name.clone(),
                error,
            });
        }
    }

    Ok(table)
}

/// Parses every `CREATE TABLE` statement in `sql`.
///
/// Statements that fail are skipped, a repeated table name keeps the first
/// definition, and foreign keys to tables outside the document are flagged.
#[must_use]
pub fn parse_document(sql: &str) -> ParsedDocument {
    let document = SqlDocument::new(sql);
    let mut parsed = ParsedDocument::default();
    let mut seen = BTreeSet::new();

    for statement in document.statements() {
        let key = statement.table_name.to_ascii_lowercase();
        if seen.contains(&key) {
            let error = ParseError::DuplicateTable {
                table: statement.table_name.clone(),
            };
            warn!(table = %statement.table_name, "Skipping duplicate CREATE TABLE");
            parsed.diagnostics.push(ParseDiagnostic::SkippedTable {
                table: statement.table_name.clone(),
                error,
            });
            continue;
        }

        match build_table(&statement, &mut parsed.diagnostics) {
            Ok(table) => {
                debug!(
                    table = %table.qualified_name(),
                    columns = table.columns.len(),
                    foreign_keys = table.foreign_keys.len(),
                    indexes = table.indexes.len(),
                    "Parsed table"
                );
                seen.insert(key);
                parsed.tables.push(table);
            }
            Err(error) => {
                warn!(table = %statement.table_name, error = %error, "Skipping table");
                parsed.diagnostics.push(ParseDiagnostic::SkippedTable {
                    table: statement.table_name.clone(),
                    error,
                });
            }
        }
    }

    for issue in check_foreign_key_targets(&parsed.tables) {
        warn!(
            table = %issue.table,
            referenced_table = %issue.referenced_table,
            "Foreign key references a table outside this document"
        );
        parsed
            .diagnostics
            .push(ParseDiagnostic::DanglingForeignKey(issue));
    }

    parsed
}

/// Parses every `CREATE TABLE` statement in `sql`, dropping diagnostics.
#[must_use]
pub fn parse_all_tables(sql: &str) -> Vec<TableDefinition> {
    parse_document(sql).tables
}

/// Parses the first `CREATE TABLE` statement in `sql`.
///
/// Unreadable clauses are skipped with a warning.
///
/// # Errors
///
/// Returns [`ParseError::NoCreateTable`] when there is no statement, or the
/// statement's own error when its body cannot be located.
pub fn parse_create_table(sql: &str) -> Result<TableDefinition, ParseError> {
    let document = SqlDocument::new(sql);
    let statement = document
        .statements()
        .next()
        .ok_or(ParseError::NoCreateTable)?;
    let mut diagnostics = Vec::new();
    build_table(&statement, &mut diagnostics)
}
