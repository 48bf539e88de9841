//! Dialect-specific DDL rendering.
//!
//! Rendering is pure: a dialect turns definitions and diff operations into
//! SQL text and never touches a database. Engines that cannot express an
//! operation render it as a `--` comment, which executors skip.

mod mysql;
mod sqlite;

pub use mysql::{MySqlDialect, DEFAULT_TABLE_OPTIONS};
pub use sqlite::SqliteDialect;

use crate::diff::{SchemaDiff, SchemaDiffOperation};
use crate::model::{ColumnDefinition, DefaultValue, TableDefinition};

/// Where a column definition is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnContext {
    /// Inside `CREATE TABLE`.
    Create,
    /// Inside `ALTER TABLE ... ADD/MODIFY COLUMN`.
    Alter,
}

/// Returns `true` for rendered statements that are comments, not DDL.
#[must_use]
pub fn is_comment(sql: &str) -> bool {
    sql.trim_start().starts_with("--")
}

/// Trait for dialect-specific DDL generation.
pub trait DdlDialect {
    /// Returns the dialect name.
    fn name(&self) -> &'static str;

    /// Returns the identifier quote character.
    fn identifier_quote(&self) -> char;

    /// Quotes an identifier, doubling embedded quote characters.
    fn quote_identifier(&self, name: &str) -> String {
        let quote = self.identifier_quote();
        let escaped = name.replace(quote, &format!("{quote}{quote}"));
        format!("{quote}{escaped}{quote}")
    }

    /// Quotes the table name, with its schema when it has one.
    fn qualified_table(&self, table: &TableDefinition) -> String {
        match &table.schema_name {
            Some(schema) => format!(
                "{}.{}",
                self.quote_identifier(schema),
                self.quote_identifier(&table.table_name)
            ),
            None => self.quote_identifier(&table.table_name),
        }
    }

    /// Keyword marking an auto-increment column, if the engine has one that
    /// works outside the column's own `PRIMARY KEY`.
    fn auto_increment_keyword(&self) -> Option<&'static str> {
        None
    }

    /// Whether `ALTER TABLE ... MODIFY COLUMN` is available.
    fn supports_modify_column(&self) -> bool {
        false
    }

    /// Whether columns can carry a `COMMENT`.
    fn supports_column_comments(&self) -> bool {
        false
    }

    /// Suffix appended after the closing parenthesis of `CREATE TABLE`.
    fn table_options(&self) -> Option<&str> {
        None
    }

    /// Quotes a string literal.
    fn quote_literal(&self, text: &str) -> String {
        format!("'{}'", text.replace('\'', "''"))
    }

    /// Renders a default value.
    fn default_sql(&self, value: &DefaultValue) -> String {
        match value {
            DefaultValue::Text(text) => self.quote_literal(text),
            other => other.to_sql(),
        }
    }

    /// Renders one column: name, type, `NOT NULL`, auto-increment or
    /// `DEFAULT`, `UNIQUE` (create only, non-key columns) and `COMMENT`.
    fn column_definition(
        &self,
        table: &TableDefinition,
        column: &ColumnDefinition,
        context: ColumnContext,
    ) -> String {
        let mut sql = format!(
            "{} {}",
            self.quote_identifier(&column.name),
            column.full_type()
        );

        if !table.effective_nullable(column) {
            sql.push_str(" NOT NULL");
        }

        if column.auto_increment {
            if let Some(keyword) = self.auto_increment_keyword() {
                sql.push(' ');
                sql.push_str(keyword);
            }
        } else if let Some(default) = &column.default_value {
            sql.push_str(" DEFAULT ");
            sql.push_str(&self.default_sql(default));
        }

        if context == ColumnContext::Create
            && column.unique
            && !table.is_primary_key_column(&column.name)
        {
            sql.push_str(" UNIQUE");
        }

        if self.supports_column_comments() {
            if let Some(comment) = &column.comment {
                sql.push_str(" COMMENT ");
                sql.push_str(&self.quote_literal(comment));
            }
        }

        sql
    }

    /// Generates `CREATE TABLE` with one line per column and the primary key.
    ///
    /// Foreign keys and secondary indexes are not emitted.
    fn create_table(&self, table: &TableDefinition) -> String {
        let mut lines: Vec<String> = table
            .columns
            .iter()
            .map(|c| format!("    {}", self.column_definition(table, c, ColumnContext::Create)))
            .collect();

        let primary_key = table.primary_key_columns();
        if !primary_key.is_empty() {
            let columns: Vec<String> = primary_key
                .iter()
                .map(|c| self.quote_identifier(c))
                .collect();
            lines.push(format!("    PRIMARY KEY ({})", columns.join(", ")));
        }

        let mut sql = format!(
            "CREATE TABLE {} (\n{}\n)",
            self.qualified_table(table),
            lines.join(",\n")
        );
        if let Some(options) = self.table_options() {
            sql.push(' ');
            sql.push_str(options);
        }
        sql
    }

    /// Generates `ALTER TABLE ... ADD COLUMN`.
    fn add_column(&self, table: &TableDefinition, column: &ColumnDefinition) -> String {
        format!(
            "ALTER TABLE {} ADD COLUMN {}",
            self.qualified_table(table),
            self.column_definition(table, column, ColumnContext::Alter)
        )
    }

    /// Generates `ALTER TABLE ... MODIFY COLUMN`, or a comment when the
    /// engine cannot change a column in place.
    fn modify_column(&self, table: &TableDefinition, column: &ColumnDefinition) -> String {
        if self.supports_modify_column() {
            format!(
                "ALTER TABLE {} MODIFY COLUMN {}",
                self.qualified_table(table),
                self.column_definition(table, column, ColumnContext::Alter)
            )
        } else {
            format!(
                "-- MODIFY COLUMN not supported by {}: {}.{} -> {}",
                self.name(),
                table.table_name,
                column.name,
                column.full_type()
            )
        }
    }

    /// Renders one diff operation; `NoOp` renders nothing.
    fn render(&self, table: &TableDefinition, operation: &SchemaDiffOperation) -> Option<String> {
        match operation {
            SchemaDiffOperation::AddColumn(column) => Some(self.add_column(table, column)),
            SchemaDiffOperation::ModifyColumn(column) => Some(self.modify_column(table, column)),
            SchemaDiffOperation::NoOp => None,
        }
    }

    /// Renders a whole diff, in operation order.
    fn render_diff(&self, table: &TableDefinition, diff: &SchemaDiff) -> Vec<String> {
        diff.operations
            .iter()
            .filter_map(|op| self.render(table, op))
            .collect()
    }
}
