//! Foreign keys and indexes.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Name given to the primary-key index.
pub const PRIMARY_INDEX_NAME: &str = "PRIMARY";

/// Referential action of a foreign key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ReferentialAction {
    /// `CASCADE`.
    #[serde(rename = "CASCADE")]
    Cascade,
    /// `SET NULL`.
    #[serde(rename = "SET NULL")]
    SetNull,
    /// `NO ACTION`.
    #[serde(rename = "NO ACTION")]
    NoAction,
    /// `RESTRICT`.
    #[serde(rename = "RESTRICT")]
    Restrict,
}

impl ReferentialAction {
    /// Returns the SQL keywords of the action.
    #[must_use]
    pub const fn as_sql(self) -> &'static str {
        match self {
            Self::Cascade => "CASCADE",
            Self::SetNull => "SET NULL",
            Self::NoAction => "NO ACTION",
            Self::Restrict => "RESTRICT",
        }
    }

    /// Parses action keywords; inner whitespace and case are ignored.
    #[must_use]
    pub fn from_sql(text: &str) -> Option<Self> {
        let words: Vec<String> = text
            .split_whitespace()
            .map(str::to_ascii_uppercase)
            .collect();
        match words.join(" ").as_str() {
            "CASCADE" => Some(Self::Cascade),
            "SET NULL" => Some(Self::SetNull),
            "NO ACTION" => Some(Self::NoAction),
            "RESTRICT" => Some(Self::Restrict),
            _ => None,
        }
    }
}

impl fmt::Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_sql())
    }
}

/// A foreign-key relationship.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ForeignKeyDefinition {
    /// `CONSTRAINT` name, if any.
    pub constraint_name: Option<String>,
    /// Local columns, in declaration order.
    pub columns: Vec<String>,
    /// Referenced table, without schema prefix.
    pub referenced_table: String,
    /// Referenced columns; same length as `columns`.
    pub referenced_columns: Vec<String>,
    /// `ON DELETE` action.
    pub on_delete: Option<ReferentialAction>,
    /// `ON UPDATE` action.
    pub on_update: Option<ReferentialAction>,
}

/// Kind of an index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IndexType {
    /// The table's primary key.
    PrimaryKey,
    /// A unique index.
    Unique,
    /// A plain (or full-text/spatial) index.
    Index,
}

/// An index declared at table level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndexDefinition {
    /// Index name; `PRIMARY` for the primary key.
    pub name: Option<String>,
    /// Index kind.
    #[serde(rename = "type")]
    pub index_type: IndexType,
    /// Indexed columns, in declaration order.
    pub columns: Vec<String>,
}

impl IndexDefinition {
    /// Creates the primary-key index over `columns`.
    #[must_use]
    pub fn primary_key(columns: Vec<String>) -> Self {
        Self {
            name: Some(PRIMARY_INDEX_NAME.to_string()),
            index_type: IndexType::PrimaryKey,
            columns,
        }
    }
}
