//! Record of the tables provisioned by a reconciler.

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::Serialize;
use tabula_ddl::TableDefinition;

use crate::report::ReconcileAction;

/// A table created or altered during this process.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProvisionedTable {
    /// Table name as defined.
    pub table_name: String,
    /// Last action applied.
    pub action: ReconcileAction,
    /// Column names of the definition that was applied.
    pub columns: Vec<String>,
    /// When it was applied.
    pub provisioned_at: DateTime<Utc>,
}

/// Tables provisioned so far, keyed case-insensitively by name.
#[derive(Debug, Clone, Default)]
pub struct ProvisionedTables {
    tables: BTreeMap<String, ProvisionedTable>,
}

impl ProvisionedTables {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Records `table` as provisioned with `action`, replacing any earlier
    /// entry.
    pub fn record(&mut self, table: &TableDefinition, action: ReconcileAction) {
        self.tables.insert(
            table.table_name.to_ascii_lowercase(),
            ProvisionedTable {
                table_name: table.table_name.clone(),
                action,
                columns: table.columns.iter().map(|c| c.name.clone()).collect(),
                provisioned_at: Utc::now(),
            },
        );
    }

    /// Whether `name` has been provisioned.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.tables.contains_key(&name.to_ascii_lowercase())
    }

    /// Looks an entry up by name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&ProvisionedTable> {
        self.tables.get(&name.to_ascii_lowercase())
    }

    /// Iterates over entries, ordered by lowercase name.
    pub fn iter(&self) -> impl Iterator<Item = &ProvisionedTable> {
        self.tables.values()
    }

    /// Number of provisioned tables.
    #[must_use]
    pub fn len(&self) -> usize {
        self.tables.len()
    }

    /// Whether nothing has been provisioned.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tables.is_empty()
    }
}
