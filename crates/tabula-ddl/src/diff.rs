//! Schema differ.
//!
//! Compares a parsed [`TableDefinition`] with the columns a table currently
//! has and produces the additive operations needed to converge. Columns are
//! never dropped: live columns missing from the definition are only reported
//! as drop candidates.

use serde::Serialize;

use crate::dialect::DdlDialect;
use crate::introspect::LiveColumn;
use crate::model::{ColumnDefinition, TableDefinition};

/// Whether declared lengths take part in change detection.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LengthPolicy {
    /// Only the base type and nullability are compared.
    #[default]
    Ignore,
    /// A declared length that differs from the live one also counts.
    Compare,
}

/// Options for the differ.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiffOptions {
    /// How lengths are treated.
    pub length_policy: LengthPolicy,
}

impl DiffOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Treats length changes as modifications.
    #[must_use]
    pub const fn compare_lengths(mut self) -> Self {
        self.length_policy = LengthPolicy::Compare;
        self
    }
}

/// One step towards the desired schema.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "column", rename_all = "snake_case")]
pub enum SchemaDiffOperation {
    /// The column does not exist yet.
    AddColumn(ColumnDefinition),
    /// The column exists with a different type or nullability.
    ModifyColumn(ColumnDefinition),
    /// Nothing to do.
    NoOp,
}

impl SchemaDiffOperation {
    /// Whether this operation changes anything.
    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::NoOp)
    }
}

/// Result of diffing one table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaDiff {
    /// Operations, all additions first, then all modifications.
    pub operations: Vec<SchemaDiffOperation>,
    /// Live columns absent from the definition. Never dropped.
    pub drop_candidates: Vec<String>,
}

impl SchemaDiff {
    /// Returns `true` if no operation is needed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.operations.is_empty()
    }

    /// Renders every operation with `dialect`.
    #[must_use]
    pub fn to_sql(&self, dialect: &impl DdlDialect, table: &TableDefinition) -> Vec<String> {
        dialect.render_diff(table, self)
    }
}

/// MySQL type synonyms and the type the server stores them as. Longer
/// spellings come first.
const TYPE_SYNONYMS: &[(&str, &str)] = &[
    ("NATIONAL CHARACTER VARYING", "VARCHAR"),
    ("NATIONAL CHAR VARYING", "VARCHAR"),
    ("CHARACTER VARYING", "VARCHAR"),
    ("CHAR VARYING", "VARCHAR"),
    ("NATIONAL VARCHAR", "VARCHAR"),
    ("NATIONAL CHARACTER", "CHAR"),
    ("NATIONAL CHAR", "CHAR"),
    ("DOUBLE PRECISION", "DOUBLE"),
    ("LONG VARCHAR", "MEDIUMTEXT"),
    ("LONG VARBINARY", "MEDIUMBLOB"),
    ("NVARCHAR", "VARCHAR"),
    ("NCHAR", "CHAR"),
    ("CHARACTER", "CHAR"),
    ("LONG", "MEDIUMTEXT"),
    ("BOOL", "TINYINT"),
    ("BOOLEAN", "TINYINT"),
    ("INT1", "TINYINT"),
    ("INT2", "SMALLINT"),
    ("INT3", "MEDIUMINT"),
    ("MIDDLEINT", "MEDIUMINT"),
    ("INT4", "INT"),
    ("INTEGER", "INT"),
    ("INT8", "BIGINT"),
    ("SERIAL", "BIGINT"),
    ("NUMERIC", "DECIMAL"),
    ("DEC", "DECIMAL"),
    ("FIXED", "DECIMAL"),
    ("FLOAT4", "FLOAT"),
    ("FLOAT8", "DOUBLE"),
    ("REAL", "DOUBLE"),
];

/// Canonical base type used for comparisons.
///
/// Takes the type words before any `(`, uppercased, and folds the MySQL
/// synonyms that the server rewrites on storage. Trailing attributes such as
/// `unsigned` are ignored.
#[must_use]
pub fn normalized_type_name(sql_type: &str) -> String {
    let head = sql_type.split('(').next().unwrap_or_default();
    let words = head
        .split_whitespace()
        .map(str::to_ascii_uppercase)
        .collect::<Vec<_>>();
    let joined = words.join(" ");

    TYPE_SYNONYMS
        .iter()
        .find(|(synonym, _)| {
            joined
                .strip_prefix(synonym)
                .is_some_and(|rest| rest.is_empty() || rest.starts_with(' '))
        })
        .map_or_else(
            || words.first().cloned().unwrap_or_default(),
            |(_, canonical)| (*canonical).to_string(),
        )
}

fn normalized_length(length: &str) -> String {
    length
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect::<String>()
        .to_ascii_lowercase()
}

/// Compares one defined column with its live counterpart.
#[must_use]
pub fn diff_column(
    table: &TableDefinition,
    column: &ColumnDefinition,
    live: Option<&LiveColumn>,
    options: &DiffOptions,
) -> SchemaDiffOperation {
    let Some(live) = live else {
        return SchemaDiffOperation::AddColumn(column.clone());
    };

    let type_changed =
        normalized_type_name(&column.data_type) != normalized_type_name(&live.column_type);
    let nullability_changed = table.effective_nullable(column) != live.nullable;
    let length_changed = options.length_policy == LengthPolicy::Compare
        && column.length.as_deref().is_some_and(|declared| {
            live.length().map(normalized_length) != Some(normalized_length(declared))
        });

    if type_changed || nullability_changed || length_changed {
        SchemaDiffOperation::ModifyColumn(column.clone())
    } else {
        SchemaDiffOperation::NoOp
    }
}

/// Diffs a whole table against its live columns.
///
/// Columns are matched by name, case-insensitively. `NoOp`s are dropped.
#[must_use]
pub fn diff_table(table: &TableDefinition, live: &[LiveColumn], options: &DiffOptions) -> SchemaDiff {
    let mut additions = Vec::new();
    let mut modifications = Vec::new();

    for column in &table.columns {
        let existing = live
            .iter()
            .find(|l| l.name.eq_ignore_ascii_case(&column.name));
        match diff_column(table, column, existing, options) {
            op @ SchemaDiffOperation::AddColumn(_) => additions.push(op),
            op @ SchemaDiffOperation::ModifyColumn(_) => modifications.push(op),
            SchemaDiffOperation::NoOp => {}
        }
    }

    let drop_candidates = live
        .iter()
        .filter(|l| table.find_column(&l.name).is_none())
        .map(|l| l.name.clone())
        .collect();

    additions.extend(modifications);
    SchemaDiff {
        operations: additions,
        drop_candidates,
    }
}
