#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use tabula_ddl::introspect::LiveColumn;
use tabula_reconcile::catalog::SchemaCatalog;

/// In-memory catalog that records executed statements.
///
/// Table state is seeded by the test and never changed by executed DDL.
#[derive(Debug, Default)]
pub struct RecordingCatalog {
    tables: BTreeMap<String, Vec<LiveColumn>>,
    executed: Mutex<Vec<String>>,
    fail_on: Option<String>,
}

impl RecordingCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seeds a live table.
    pub fn with_table(mut self, name: &str, columns: Vec<LiveColumn>) -> Self {
        self.tables.insert(name.to_ascii_lowercase(), columns);
        self
    }

    /// Makes `execute` fail for statements containing `needle`.
    pub fn fail_on(mut self, needle: &str) -> Self {
        self.fail_on = Some(needle.to_string());
        self
    }

    /// Statements executed successfully, in order.
    pub fn executed(&self) -> Vec<String> {
        self.executed.lock().unwrap().clone()
    }
}

impl SchemaCatalog for RecordingCatalog {
    fn engine(&self) -> &'static str {
        "recording"
    }

    async fn table_exists(&self, _schema: Option<&str>, table: &str) -> sqlx::Result<bool> {
        Ok(self.tables.contains_key(&table.to_ascii_lowercase()))
    }

    async fn columns(&self, _schema: Option<&str>, table: &str) -> sqlx::Result<Vec<LiveColumn>> {
        Ok(self
            .tables
            .get(&table.to_ascii_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    async fn execute(&self, sql: &str) -> sqlx::Result<()> {
        if let Some(needle) = &self.fail_on {
            if sql.contains(needle.as_str()) {
                return Err(sqlx::Error::Protocol(format!("injected failure for {needle}")));
            }
        }
        self.executed.lock().unwrap().push(sql.to_string());
        Ok(())
    }
}

pub const USERS: &str =
    "CREATE TABLE users (id BIGINT AUTO_INCREMENT, name VARCHAR(50) NOT NULL, PRIMARY KEY (id))";

/// What MySQL reports for [`USERS`] once created.
pub fn live_users() -> Vec<LiveColumn> {
    vec![
        LiveColumn::new("id", "bigint").not_null().extra("auto_increment"),
        LiveColumn::new("name", "varchar(50)").not_null(),
    ]
}

/// A small dump with two related tables and unrelated statements.
pub const BLOG_DUMP: &str = r"
-- blog schema
SET FOREIGN_KEY_CHECKS = 0;

CREATE TABLE `authors` (
  `id` INT NOT NULL AUTO_INCREMENT,
  `name` VARCHAR(80) NOT NULL,
  PRIMARY KEY (`id`)
);

CREATE TABLE `posts` (
  `id` INT NOT NULL AUTO_INCREMENT,
  `author_id` INT NOT NULL,
  `title` VARCHAR(200) NOT NULL DEFAULT 'untitled',
  `published_at` DATETIME DEFAULT CURRENT_TIMESTAMP,
  PRIMARY KEY (`id`),
  CONSTRAINT `fk_posts_author` FOREIGN KEY (`author_id`) REFERENCES `authors` (`id`) ON DELETE CASCADE
);

INSERT INTO `authors` VALUES (1, 'Ada');
";
