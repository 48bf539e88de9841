//! Parsed table definitions.

use std::collections::BTreeSet;
use std::fmt;

use serde::{Deserialize, Serialize};

use super::column::ColumnDefinition;
use super::constraint::{ForeignKeyDefinition, IndexDefinition, IndexType};
use crate::error::DefinitionError;

#[derive(Serialize)]
struct Structure<'a> {
    columns: &'a [ColumnDefinition],
}

/// Structured form of one `CREATE TABLE` statement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableDefinition {
    /// Schema qualifier, if the statement had one.
    pub schema_name: Option<String>,
    /// Table name, unquoted.
    pub table_name: String,
    /// Columns in declaration order.
    pub columns: Vec<ColumnDefinition>,
    /// Foreign keys, table-level and inline.
    pub foreign_keys: Vec<ForeignKeyDefinition>,
    /// Indexes, including the primary key.
    pub indexes: Vec<IndexDefinition>,
}

impl TableDefinition {
    /// Creates an empty definition.
    #[must_use]
    pub fn new(table_name: impl Into<String>) -> Self {
        Self {
            schema_name: None,
            table_name: table_name.into(),
            columns: Vec::new(),
            foreign_keys: Vec::new(),
            indexes: Vec::new(),
        }
    }

    /// Sets the schema qualifier.
    #[must_use]
    pub fn schema(mut self, schema_name: impl Into<String>) -> Self {
        self.schema_name = Some(schema_name.into());
        self
    }

    /// Appends a column.
    #[must_use]
    pub fn column(mut self, column: ColumnDefinition) -> Self {
        self.columns.push(column);
        self
    }

    /// Appends a foreign key.
    #[must_use]
    pub fn foreign_key(mut self, foreign_key: ForeignKeyDefinition) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    /// Appends an index.
    #[must_use]
    pub fn index(mut self, index: IndexDefinition) -> Self {
        self.indexes.push(index);
        self
    }

    /// `schema.table` or just `table`.
    #[must_use]
    pub fn qualified_name(&self) -> String {
        match &self.schema_name {
            Some(schema) => format!("{schema}.{}", self.table_name),
            None => self.table_name.clone(),
        }
    }

    /// Looks a column up by name, case-insensitively.
    #[must_use]
    pub fn find_column(&self, name: &str) -> Option<&ColumnDefinition> {
        self.columns
            .iter()
            .find(|c| c.name.eq_ignore_ascii_case(name))
    }

    /// Primary-key columns: those of the `PRIMARY_KEY` index when there is
    /// one, else the columns flagged inline.
    #[must_use]
    pub fn primary_key_columns(&self) -> Vec<&str> {
        self.indexes
            .iter()
            .find(|index| index.index_type == IndexType::PrimaryKey)
            .map_or_else(
                || {
                    self.columns
                        .iter()
                        .filter(|c| c.primary_key)
                        .map(|c| c.name.as_str())
                        .collect()
                },
                |index| index.columns.iter().map(String::as_str).collect(),
            )
    }

    /// Whether `name` belongs to the primary key.
    #[must_use]
    pub fn is_primary_key_column(&self, name: &str) -> bool {
        self.primary_key_columns()
            .iter()
            .any(|pk| pk.eq_ignore_ascii_case(name))
    }

    /// Nullability as the engine will store it: key columns are NOT NULL.
    #[must_use]
    pub fn effective_nullable(&self, column: &ColumnDefinition) -> bool {
        column.nullable && !column.primary_key && !self.is_primary_key_column(&column.name)
    }

    /// Checks the structural invariants a definition must satisfy before it
    /// is provisioned.
    ///
    /// # Errors
    ///
    /// Returns the first violated invariant.
    pub fn validate(&self) -> Result<(), DefinitionError> {
        if self.columns.is_empty() {
            return Err(DefinitionError::MissingColumnDefinitions {
                table: self.table_name.clone(),
            });
        }

        let mut seen = BTreeSet::new();
        for column in &self.columns {
            if !seen.insert(column.name.to_ascii_lowercase()) {
                return Err(DefinitionError::DuplicateColumn {
                    table: self.table_name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        let auto: Vec<&ColumnDefinition> =
            self.columns.iter().filter(|c| c.auto_increment).collect();
        if auto.len() > 1 {
            return Err(DefinitionError::MultipleAutoIncrement {
                table: self.table_name.clone(),
                columns: auto.iter().map(|c| c.name.clone()).collect(),
            });
        }
        if let Some(column) = auto.first() {
            if !self.is_primary_key_column(&column.name) {
                return Err(DefinitionError::AutoIncrementOutsidePrimaryKey {
                    table: self.table_name.clone(),
                    column: column.name.clone(),
                });
            }
        }

        Ok(())
    }

    /// Table structure document: `{"columns": [...]}`.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn structure_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&Structure {
            columns: &self.columns,
        })
    }

    /// JSON array of the foreign keys.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn foreign_keys_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.foreign_keys)
    }

    /// JSON array of the indexes.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn indexes_json(&self) -> serde_json::Result<String> {
        serde_json::to_string(&self.indexes)
    }
}

/// A foreign key whose target table is not part of the same batch.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConfigurationInconsistency {
    /// Table declaring the foreign key.
    pub table: String,
    /// Constraint name, if any.
    pub constraint_name: Option<String>,
    /// The missing target.
    pub referenced_table: String,
}

impl fmt::Display for ConfigurationInconsistency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Foreign key on '{}' references unknown table '{}'",
            self.table, self.referenced_table
        )
    }
}

/// Reports every foreign key in `tables` whose referenced table is not
/// itself in `tables`.
#[must_use]
pub fn check_foreign_key_targets(tables: &[TableDefinition]) -> Vec<ConfigurationInconsistency> {
    let known: BTreeSet<String> = tables
        .iter()
        .map(|t| t.table_name.to_ascii_lowercase())
        .collect();

    let known = &known;
    tables
        .iter()
        .flat_map(|table| {
            table.foreign_keys.iter().filter_map(move |fk| {
                if known.contains(&fk.referenced_table.to_ascii_lowercase()) {
                    None
                } else {
                    Some(ConfigurationInconsistency {
                        table: table.table_name.clone(),
                        constraint_name: fk.constraint_name.clone(),
                        referenced_table: fk.referenced_table.clone(),
                    })
                }
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn users() -> TableDefinition {
        TableDefinition::new("users")
            .column(ColumnDefinition::new("id", "BIGINT").auto_increment())
            .column(ColumnDefinition::new("name", "VARCHAR").length("50").not_null())
            .index(IndexDefinition::primary_key(vec!["id".into()]))
    }

    fn fk(target: &str) -> ForeignKeyDefinition {
        ForeignKeyDefinition {
            constraint_name: Some("fk_target".into()),
            columns: vec!["user_id".into()],
            referenced_table: target.into(),
            referenced_columns: vec!["id".into()],
            on_delete: None,
            on_update: None,
        }
    }

    #[test]
    fn test_primary_key_from_index() {
        let table = users();
        assert_eq!(table.primary_key_columns(), vec!["id"]);
        assert!(table.is_primary_key_column("ID"));
        assert!(!table.effective_nullable(&table.columns[0]));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_primary_key_from_inline_flag() {
        let table = TableDefinition::new("t")
            .column(ColumnDefinition::new("code", "CHAR").primary_key());
        assert_eq!(table.primary_key_columns(), vec!["code"]);
    }

    #[test]
    fn test_validate_missing_columns() {
        let err = TableDefinition::new("empty").validate().unwrap_err();
        assert!(matches!(err, DefinitionError::MissingColumnDefinitions { .. }));
    }

    #[test]
    fn test_validate_duplicate_column() {
        let table = users().column(ColumnDefinition::new("NAME", "TEXT"));
        let err = table.validate().unwrap_err();
        assert_eq!(
            err,
            DefinitionError::DuplicateColumn {
                table: "users".into(),
                column: "NAME".into()
            }
        );
    }

    #[test]
    fn test_validate_auto_increment_rules() {
        let table = users().column(ColumnDefinition::new("seq", "INT").auto_increment());
        assert!(matches!(
            table.validate(),
            Err(DefinitionError::MultipleAutoIncrement { .. })
        ));

        let table = TableDefinition::new("t")
            .column(ColumnDefinition::new("seq", "INT").auto_increment());
        assert!(matches!(
            table.validate(),
            Err(DefinitionError::AutoIncrementOutsidePrimaryKey { .. })
        ));
    }

    #[test]
    fn test_check_foreign_key_targets() {
        let posts = TableDefinition::new("posts")
            .column(ColumnDefinition::new("user_id", "BIGINT"))
            .foreign_key(fk("Users"))
            .foreign_key(fk("accounts"));
        let issues = check_foreign_key_targets(&[users(), posts]);
        assert_eq!(issues.len(), 1);
        assert_eq!(issues[0].table, "posts");
        assert_eq!(issues[0].referenced_table, "accounts");
    }

    #[test]
    fn test_sibling_json_documents() {
        let table = users();
        let structure: serde_json::Value =
            serde_json::from_str(&table.structure_json().unwrap()).unwrap();
        assert_eq!(structure["columns"][1]["name"], "name");
        assert_eq!(structure["columns"][1]["length"], "50");
        assert_eq!(structure.as_object().map(|o| o.len()), Some(1));
        assert_eq!(table.foreign_keys_json().unwrap(), "[]");
        assert!(table.indexes_json().unwrap().contains("PRIMARY_KEY"));
    }
}
