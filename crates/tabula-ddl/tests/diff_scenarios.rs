//! Integration tests for the schema differ and DDL rendering.
//!
//! Definitions are parsed from SQL, diffed against hand-built live columns
//! and rendered with both dialects.

mod common;

use common::{live_columns_for, parse_one, SHOP_DUMP};
use tabula_ddl::prelude::*;

const USERS: &str =
    "CREATE TABLE users (id BIGINT AUTO_INCREMENT, name VARCHAR(50) NOT NULL, PRIMARY KEY (id))";

#[test]
fn reconciling_against_identical_schema_is_idempotent() {
    for table in parse_all_tables(SHOP_DUMP) {
        let live = live_columns_for(&table);
        let diff = diff_table(&table, &live, &DiffOptions::new().compare_lengths());
        assert!(diff.is_empty(), "{}: {:?}", table.table_name, diff.operations);
        assert!(diff.drop_candidates.is_empty());
    }
}

#[test]
fn new_table_renders_single_create_statement() {
    let table = parse_one(USERS);
    let sql = MySqlDialect::new().with_table_options("").create_table(&table);
    assert_eq!(
        sql,
        "CREATE TABLE `users` (\n    `id` BIGINT NOT NULL AUTO_INCREMENT,\n    `name` VARCHAR(50) NOT NULL,\n    PRIMARY KEY (`id`)\n)"
    );
}

#[test]
fn added_column_and_relaxed_nullability() {
    let table = parse_one(
        "CREATE TABLE users (id BIGINT AUTO_INCREMENT, name VARCHAR(50), email VARCHAR(255), PRIMARY KEY (id))",
    );
    let live = vec![
        LiveColumn::new("id", "bigint").not_null().extra("auto_increment"),
        LiveColumn::new("name", "varchar(50)").not_null(),
    ];

    let diff = diff_table(&table, &live, &DiffOptions::new());
    assert_eq!(diff.operations.len(), 2);
    assert!(matches!(&diff.operations[0], SchemaDiffOperation::AddColumn(c) if c.name == "email"));
    assert!(matches!(&diff.operations[1], SchemaDiffOperation::ModifyColumn(c) if c.name == "name"));

    assert_eq!(
        diff.to_sql(&MySqlDialect::new(), &table),
        vec![
            "ALTER TABLE `users` ADD COLUMN `email` VARCHAR(255)",
            "ALTER TABLE `users` MODIFY COLUMN `name` VARCHAR(50)",
        ]
    );
}

#[test]
fn additions_always_precede_modifications() {
    let table = parse_one(
        "CREATE TABLE t (a TEXT NOT NULL, b INT, c INT, d DATE, e DATE NOT NULL)",
    );
    let live = vec![
        LiveColumn::new("a", "text"),
        LiveColumn::new("c", "varchar(10)"),
        LiveColumn::new("e", "date"),
    ];
    let diff = diff_table(&table, &live, &DiffOptions::new());
    let kinds: Vec<(&str, &str)> = diff
        .operations
        .iter()
        .map(|op| match op {
            SchemaDiffOperation::AddColumn(c) => ("add", c.name.as_str()),
            SchemaDiffOperation::ModifyColumn(c) => ("modify", c.name.as_str()),
            SchemaDiffOperation::NoOp => ("noop", ""),
        })
        .collect();
    assert_eq!(
        kinds,
        vec![
            ("add", "b"),
            ("add", "d"),
            ("modify", "a"),
            ("modify", "c"),
            ("modify", "e"),
        ]
    );
}

#[test]
fn drops_are_never_generated() {
    let table = parse_one("CREATE TABLE t (a INT)");
    let live = vec![
        LiveColumn::new("a", "int"),
        LiveColumn::new("b", "int"),
        LiveColumn::new("c", "text"),
    ];
    let diff = diff_table(&table, &live, &DiffOptions::new());
    assert!(diff.is_empty());
    assert_eq!(diff.drop_candidates, vec!["b", "c"]);

    let sql = diff.to_sql(&MySqlDialect::new(), &table);
    assert!(sql.iter().all(|s| !s.to_ascii_uppercase().contains("DROP")));
}

#[test]
fn sqlite_renders_modify_as_skippable_comment() {
    let table = parse_one("CREATE TABLE t (a VARCHAR(20) NOT NULL, b INT)");
    let live = vec![LiveColumn::new("a", "VARCHAR(20)")];
    let diff = diff_table(&table, &live, &DiffOptions::new());
    let sql = diff.to_sql(&SqliteDialect::new(), &table);

    assert_eq!(sql.len(), 2);
    assert_eq!(sql[0], "ALTER TABLE \"t\" ADD COLUMN \"b\" INT");
    assert!(is_comment(&sql[1]));
}

#[test]
fn defaults_render_typed() {
    let table = parse_one(
        "CREATE TABLE t (
            id INT AUTO_INCREMENT PRIMARY KEY DEFAULT 5,
            label VARCHAR(10) DEFAULT 'it''s',
            created DATETIME DEFAULT CURRENT_TIMESTAMP,
            ratio DOUBLE DEFAULT 0.5,
            uid CHAR(36) DEFAULT (uuid())
        )",
    );
    let sql = MySqlDialect::new().with_table_options("").create_table(&table);
    assert!(sql.contains("`id` INT NOT NULL AUTO_INCREMENT,"));
    assert!(sql.contains("`label` VARCHAR(10) DEFAULT 'it''s',"));
    assert!(sql.contains("`created` DATETIME DEFAULT CURRENT_TIMESTAMP,"));
    assert!(sql.contains("`ratio` DOUBLE DEFAULT 0.5,"));
    assert!(sql.contains("`uid` CHAR(36) DEFAULT (uuid())"));
}
