//! Reconciliation orchestrator.
//!
//! For each table the [`Reconciler`] validates the definition, asks the
//! catalog whether the table exists, and then either creates it or diffs it
//! against the live columns and applies the additive `ALTER TABLE` steps.
//! Statements run one at a time in diff order; a failure stops the table's
//! remaining statements but leaves the executed ones in place.

use tabula_ddl::dialect::{is_comment, DdlDialect};
use tabula_ddl::diff::{diff_table, DiffOptions};
use tabula_ddl::introspect::LiveColumn;
use tabula_ddl::model::{check_foreign_key_targets, TableDefinition};
use tracing::{debug, error, info, warn};

use crate::catalog::SchemaCatalog;
use crate::error::{ReconcileError, Result};
use crate::registry::ProvisionedTables;
use crate::report::{BatchReport, ReconcileAction, ReconcileReport};

/// Options for reconciliation.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileOptions {
    /// Options passed to the differ.
    pub diff: DiffOptions,
    /// Compute statements without executing them.
    pub dry_run: bool,
    /// Log live columns that the definition no longer has.
    pub warn_on_drop_candidates: bool,
}

impl Default for ReconcileOptions {
    fn default() -> Self {
        Self {
            diff: DiffOptions::default(),
            dry_run: false,
            warn_on_drop_candidates: true,
        }
    }
}

impl ReconcileOptions {
    /// Creates default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the differ options.
    #[must_use]
    pub const fn diff(mut self, diff: DiffOptions) -> Self {
        self.diff = diff;
        self
    }

    /// Enables dry-run mode.
    #[must_use]
    pub const fn dry_run(mut self, enabled: bool) -> Self {
        self.dry_run = enabled;
        self
    }

    /// Toggles the drop-candidate warning.
    #[must_use]
    pub const fn warn_on_drop_candidates(mut self, enabled: bool) -> Self {
        self.warn_on_drop_candidates = enabled;
        self
    }
}

/// Statements that would bring one table to its definition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconcilePlan {
    /// Table name.
    pub table_name: String,
    /// `Created`, `Altered` or `NoChange`.
    pub action: ReconcileAction,
    /// DDL in execution order. May contain `--` comments for operations the
    /// dialect cannot express.
    pub statements: Vec<String>,
    /// Live columns missing from the definition.
    pub drop_candidates: Vec<String>,
}

/// Converges live tables to their definitions.
pub struct Reconciler<C: SchemaCatalog, D: DdlDialect> {
    catalog: C,
    dialect: D,
    options: ReconcileOptions,
    registry: ProvisionedTables,
}

impl<C: SchemaCatalog, D: DdlDialect> Reconciler<C, D> {
    /// Creates a reconciler with default options.
    pub fn new(catalog: C, dialect: D) -> Self {
        Self {
            catalog,
            dialect,
            options: ReconcileOptions::default(),
            registry: ProvisionedTables::new(),
        }
    }

    /// Replaces the options.
    #[must_use]
    pub fn with_options(mut self, options: ReconcileOptions) -> Self {
        self.options = options;
        self
    }

    /// Returns the catalog.
    #[must_use]
    pub const fn catalog(&self) -> &C {
        &self.catalog
    }

    /// Returns the dialect.
    #[must_use]
    pub const fn dialect(&self) -> &D {
        &self.dialect
    }

    /// Returns the options.
    #[must_use]
    pub const fn options(&self) -> &ReconcileOptions {
        &self.options
    }

    /// Returns the tables provisioned so far.
    #[must_use]
    pub const fn registry(&self) -> &ProvisionedTables {
        &self.registry
    }

    /// Computes the statements for `table` without executing anything.
    ///
    /// # Errors
    ///
    /// Fails when the definition is invalid or the catalog cannot be read.
    pub async fn plan(&self, table: &TableDefinition) -> Result<ReconcilePlan> {
        table.validate()?;
        let schema = table.schema_name.as_deref();

        if !self.catalog.table_exists(schema, &table.table_name).await? {
            return Ok(ReconcilePlan {
                table_name: table.table_name.clone(),
                action: ReconcileAction::Created,
                statements: vec![self.dialect.create_table(table)],
                drop_candidates: Vec::new(),
            });
        }

        let live = self.catalog.columns(schema, &table.table_name).await?;
        let diff = diff_table(table, &live, &self.options.diff);
        let statements = diff.to_sql(&self.dialect, table);
        let action = if statements.is_empty() {
            ReconcileAction::NoChange
        } else {
            ReconcileAction::Altered
        };

        Ok(ReconcilePlan {
            table_name: table.table_name.clone(),
            action,
            statements,
            drop_candidates: diff.drop_candidates,
        })
    }

    /// Reconciles one table.
    ///
    /// Never fails: problems are reported with `action = error`.
    pub async fn reconcile(&mut self, table: &TableDefinition) -> ReconcileReport {
        let plan = match self.plan(table).await {
            Ok(plan) => plan,
            Err(err) => {
                error!(table = %table.table_name, error = %err, "Reconciliation failed");
                return ReconcileReport::failed(&table.table_name, err.to_string());
            }
        };

        if self.options.warn_on_drop_candidates && !plan.drop_candidates.is_empty() {
            warn!(
                table = %plan.table_name,
                columns = ?plan.drop_candidates,
                "Live columns are missing from the definition and were kept"
            );
        }

        let mut report = ReconcileReport::new(&plan.table_name, plan.action);
        report.dry_run = self.options.dry_run;
        report.drop_candidates = plan.drop_candidates;

        for sql in plan.statements {
            if is_comment(&sql) {
                warn!(comment = %sql, "Skipping comment (unsupported operation)");
                continue;
            }

            if !self.options.dry_run {
                debug!(sql = %sql, "Executing SQL");
                if let Err(source) = self.catalog.execute(&sql).await {
                    let err = ReconcileError::Execution {
                        statement: sql,
                        source,
                    };
                    error!(table = %report.table_name, error = %err, "Statement failed");
                    report.action = ReconcileAction::Error;
                    report.error_message = Some(err.to_string());
                    return report;
                }
            }

            if plan.action == ReconcileAction::Altered {
                report.alter_count += 1;
            }
            report.statements.push(sql);
        }

        // Only skipped comments: the table is left as it was.
        if report.action == ReconcileAction::Altered && report.alter_count == 0 {
            report.action = ReconcileAction::NoChange;
        }

        if !self.options.dry_run
            && matches!(
                report.action,
                ReconcileAction::Created | ReconcileAction::Altered
            )
        {
            self.registry.record(table, report.action);
        }

        info!(
            table = %report.table_name,
            action = %report.action,
            alter_count = report.alter_count,
            dry_run = report.dry_run,
            "Table reconciled"
        );
        report
    }

    /// Reconciles each table independently, in order.
    ///
    /// Foreign keys pointing outside the batch are logged, not enforced.
    pub async fn reconcile_all(&mut self, tables: &[TableDefinition]) -> BatchReport {
        for inconsistency in check_foreign_key_targets(tables) {
            warn!(
                table = %inconsistency.table,
                referenced_table = %inconsistency.referenced_table,
                "Foreign key references a table outside this batch"
            );
        }

        let mut batch = BatchReport::default();
        for table in tables {
            let report = self.reconcile(table).await;
            batch.push(report);
        }

        info!(
            total = batch.total_count,
            succeeded = batch.success_count,
            failed = batch.failure_count,
            "Batch reconciliation finished"
        );
        batch
    }

    /// Reads the live columns of an existing table.
    ///
    /// # Errors
    ///
    /// Returns [`ReconcileError::TableNotFound`] when the table is absent.
    pub async fn inspect(&self, schema: Option<&str>, table: &str) -> Result<Vec<LiveColumn>> {
        if !self.catalog.table_exists(schema, table).await? {
            return Err(ReconcileError::TableNotFound(table.to_string()));
        }
        Ok(self.catalog.columns(schema, table).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::SqliteCatalog;
    use sqlx::sqlite::SqlitePoolOptions;
    use tabula_ddl::dialect::SqliteDialect;
    use tabula_ddl::parser::parse_create_table;
    use tabula_ddl::ColumnDefinition;

    async fn create_test_reconciler() -> Reconciler<SqliteCatalog, SqliteDialect> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await
            .expect("Failed to create in-memory SQLite pool");
        Reconciler::new(SqliteCatalog::new(pool), SqliteDialect::new())
    }

    fn users() -> TableDefinition {
        parse_create_table(
            "CREATE TABLE users (id BIGINT AUTO_INCREMENT, name VARCHAR(50) NOT NULL, PRIMARY KEY (id))",
        )
        .unwrap()
    }

    #[tokio::test]
    async fn test_creates_missing_table() {
        let mut reconciler = create_test_reconciler().await;
        let report = reconciler.reconcile(&users()).await;

        assert_eq!(report.action, ReconcileAction::Created);
        assert_eq!(report.alter_count, 0);
        assert_eq!(report.statements.len(), 1);
        assert!(report.statements[0].starts_with("CREATE TABLE \"users\""));
        assert!(reconciler.registry().contains("users"));

        let columns = reconciler.inspect(None, "users").await.unwrap();
        let names: Vec<&str> = columns.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, vec!["id", "name"]);
    }

    #[tokio::test]
    async fn test_second_run_is_no_change() {
        let mut reconciler = create_test_reconciler().await;
        reconciler.reconcile(&users()).await;

        let report = reconciler.reconcile(&users()).await;
        assert_eq!(report.action, ReconcileAction::NoChange);
        assert!(report.statements.is_empty());
        assert!(report.is_success());
    }

    #[tokio::test]
    async fn test_adds_new_column() {
        let mut reconciler = create_test_reconciler().await;
        reconciler.reconcile(&users()).await;

        let extended = users().column(ColumnDefinition::new("email", "VARCHAR").length("255"));
        let report = reconciler.reconcile(&extended).await;

        assert_eq!(report.action, ReconcileAction::Altered);
        assert_eq!(report.alter_count, 1);
        assert_eq!(
            report.statements,
            vec!["ALTER TABLE \"users\" ADD COLUMN \"email\" VARCHAR(255)"]
        );
        let columns = reconciler.inspect(None, "users").await.unwrap();
        assert_eq!(columns.len(), 3);
    }

    #[tokio::test]
    async fn test_failure_keeps_executed_statements() {
        let mut reconciler = create_test_reconciler().await;
        reconciler.reconcile(&users()).await;

        let extended = parse_create_table(
            "CREATE TABLE users (id BIGINT AUTO_INCREMENT, name VARCHAR(50) NOT NULL, \
             note TEXT, code VARCHAR(10) NOT NULL, PRIMARY KEY (id))",
        )
        .unwrap();
        let report = reconciler.reconcile(&extended).await;

        assert_eq!(report.action, ReconcileAction::Error);
        assert_eq!(report.statements, vec!["ALTER TABLE \"users\" ADD COLUMN \"note\" TEXT"]);
        let message = report.error_message.unwrap();
        assert!(message.contains("\"code\""));

        let columns = reconciler.inspect(None, "users").await.unwrap();
        assert!(columns.iter().any(|c| c.name == "note"));
        assert!(!columns.iter().any(|c| c.name == "code"));
    }

    #[tokio::test]
    async fn test_dry_run_executes_nothing() {
        let mut reconciler = create_test_reconciler()
            .await
            .with_options(ReconcileOptions::new().dry_run(true));
        let report = reconciler.reconcile(&users()).await;

        assert_eq!(report.action, ReconcileAction::Created);
        assert!(report.dry_run);
        assert_eq!(report.statements.len(), 1);
        assert!(reconciler.registry().is_empty());
        assert!(matches!(
            reconciler.inspect(None, "users").await,
            Err(ReconcileError::TableNotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_modify_is_skipped_on_sqlite() {
        let mut reconciler = create_test_reconciler().await;
        reconciler.reconcile(&users()).await;

        let relaxed = parse_create_table(
            "CREATE TABLE users (id BIGINT AUTO_INCREMENT, name VARCHAR(50), PRIMARY KEY (id))",
        )
        .unwrap();
        let plan = reconciler.plan(&relaxed).await.unwrap();
        assert_eq!(plan.action, ReconcileAction::Altered);
        assert!(is_comment(&plan.statements[0]));

        let report = reconciler.reconcile(&relaxed).await;
        assert!(report.is_success());
        assert_eq!(report.action, ReconcileAction::NoChange);
        assert_eq!(report.alter_count, 0);
        assert!(report.statements.is_empty());

        let provisioned = reconciler.registry().get("users").unwrap();
        assert_eq!(provisioned.action, ReconcileAction::Created);
        assert_eq!(provisioned.columns, vec!["id", "name"]);
    }

    #[tokio::test]
    async fn test_invalid_definition_is_reported() {
        let mut reconciler = create_test_reconciler().await;
        let report = reconciler.reconcile(&TableDefinition::new("empty")).await;
        assert_eq!(report.action, ReconcileAction::Error);
        assert!(report.error_message.is_some());
    }

    #[tokio::test]
    async fn test_drop_candidates_are_reported() {
        let mut reconciler = create_test_reconciler().await;
        reconciler
            .catalog()
            .execute("CREATE TABLE users (id BIGINT NOT NULL PRIMARY KEY, name VARCHAR(50) NOT NULL, legacy TEXT)")
            .await
            .unwrap();

        let report = reconciler.reconcile(&users()).await;
        assert_eq!(report.action, ReconcileAction::NoChange);
        assert_eq!(report.drop_candidates, vec!["legacy"]);
    }

    #[tokio::test]
    async fn test_reconcile_all_counts() {
        let mut reconciler = create_test_reconciler().await;
        let tables = vec![users(), TableDefinition::new("broken")];
        let batch = reconciler.reconcile_all(&tables).await;

        assert_eq!(batch.total_count, 2);
        assert_eq!(batch.success_count, 1);
        assert_eq!(batch.failure_count, 1);
        assert_eq!(batch.results[0].action, ReconcileAction::Created);
        assert_eq!(batch.results[1].action, ReconcileAction::Error);
    }
}
