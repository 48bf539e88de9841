//! Reconciliation reports.

use std::fmt;

use serde::Serialize;

/// What reconciliation did to a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ReconcileAction {
    /// The table did not exist and was created.
    Created,
    /// Columns were added or modified.
    Altered,
    /// The live table already matched.
    NoChange,
    /// Reconciliation failed.
    Error,
}

impl ReconcileAction {
    /// Snake-case name as used in reports.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Created => "created",
            Self::Altered => "altered",
            Self::NoChange => "no_change",
            Self::Error => "error",
        }
    }
}

impl fmt::Display for ReconcileAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome for a single table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    /// Table name.
    pub table_name: String,
    /// What happened.
    pub action: ReconcileAction,
    /// Number of `ALTER TABLE` statements executed (planned, in a dry run).
    pub alter_count: usize,
    /// Failure description when `action` is `error`.
    pub error_message: Option<String>,
    /// DDL executed, in order; in a dry run, the DDL that would run.
    pub statements: Vec<String>,
    /// Live columns the definition no longer mentions. Never dropped.
    pub drop_candidates: Vec<String>,
    /// Whether nothing was executed.
    pub dry_run: bool,
}

impl ReconcileReport {
    /// Creates a report with no statements.
    #[must_use]
    pub fn new(table_name: impl Into<String>, action: ReconcileAction) -> Self {
        Self {
            table_name: table_name.into(),
            action,
            alter_count: 0,
            error_message: None,
            statements: Vec::new(),
            drop_candidates: Vec::new(),
            dry_run: false,
        }
    }

    /// Creates an error report.
    #[must_use]
    pub fn failed(table_name: impl Into<String>, message: impl Into<String>) -> Self {
        let mut report = Self::new(table_name, ReconcileAction::Error);
        report.error_message = Some(message.into());
        report
    }

    /// Whether the table reached its desired shape.
    #[must_use]
    pub fn is_success(&self) -> bool {
        self.action != ReconcileAction::Error
    }
}

/// Outcome of reconciling several tables.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchReport {
    /// Number of tables processed.
    pub total_count: usize,
    /// Tables that did not fail.
    pub success_count: usize,
    /// Tables that failed.
    pub failure_count: usize,
    /// Per-table reports, in input order.
    pub results: Vec<ReconcileReport>,
}

impl BatchReport {
    /// Appends a table report and updates the counters.
    pub fn push(&mut self, report: ReconcileReport) {
        self.total_count += 1;
        if report.is_success() {
            self.success_count += 1;
        } else {
            self.failure_count += 1;
        }
        self.results.push(report);
    }

    /// Whether every table succeeded.
    #[must_use]
    pub const fn all_succeeded(&self) -> bool {
        self.failure_count == 0
    }
}

impl FromIterator<ReconcileReport> for BatchReport {
    fn from_iter<I: IntoIterator<Item = ReconcileReport>>(iter: I) -> Self {
        let mut batch = Self::default();
        for report in iter {
            batch.push(report);
        }
        batch
    }
}
