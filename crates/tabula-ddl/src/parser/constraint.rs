//! Table-level constraint parsing: primary keys, foreign keys and indexes.

use once_cell::sync::Lazy;
use regex::Regex;

use super::scan::{find_code, mask_literals, matching_paren, read_identifier, split_top_level};
use crate::error::ParseError;
use crate::model::{ForeignKeyDefinition, IndexDefinition, IndexType, ReferentialAction};

static REFERENCES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^\s*REFERENCES\b").expect("valid REFERENCES regex"));
static ACTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\bON\s+(DELETE|UPDATE)\s+(CASCADE|SET\s+NULL|NO\s+ACTION|RESTRICT)\b")
        .expect("valid referential action regex")
});

const FOREIGN_KEY: &str = "FOREIGN KEY";

/// Splits a parenthesized column list into unquoted names.
///
/// Prefix lengths (`name(10)`) and sort orders (`ASC`/`DESC`) are dropped.
#[must_use]
pub fn parse_column_list(inner: &str) -> Vec<String> {
    split_top_level(inner)
        .into_iter()
        .filter_map(|piece| read_identifier(piece).map(|(name, _)| name))
        .collect()
}

/// An optional name followed by a parenthesized column list, as in
/// `` `uk_email` USING BTREE (email) ``.
struct NamedList<'a> {
    name: Option<String>,
    columns: Vec<String>,
    after: &'a str,
}

fn named_list<'a>(
    kind: &'static str,
    text: &'a str,
    clause: &str,
) -> Result<NamedList<'a>, ParseError> {
    let invalid = || ParseError::InvalidConstraint {
        kind,
        clause: clause.trim().to_string(),
    };

    let open = find_code(text, '(').ok_or_else(invalid)?;
    let close = matching_paren(text, open).ok_or_else(invalid)?;

    let name = read_identifier(&text[..open])
        .map(|(name, _)| name)
        .filter(|name| !name.eq_ignore_ascii_case("USING"));
    let columns = parse_column_list(&text[open + 1..close]);
    if columns.is_empty() {
        return Err(invalid());
    }

    Ok(NamedList {
        name,
        columns,
        after: &text[close + 1..],
    })
}

/// Parses the text after `PRIMARY KEY` into the `PRIMARY` index.
///
/// # Errors
///
/// Fails when there is no non-empty column list.
pub fn parse_primary_key(rest: &str, clause: &str) -> Result<IndexDefinition, ParseError> {
    let list = named_list("PRIMARY KEY", rest, clause)?;
    Ok(IndexDefinition::primary_key(list.columns))
}

/// Parses the text after `UNIQUE [KEY]` or `KEY`/`INDEX`.
///
/// A `CONSTRAINT` name takes precedence over the index's own name.
///
/// # Errors
///
/// Fails when there is no non-empty column list.
pub fn parse_index(
    index_type: IndexType,
    constraint_name: Option<String>,
    rest: &str,
    clause: &str,
) -> Result<IndexDefinition, ParseError> {
    let kind = match index_type {
        IndexType::PrimaryKey => "PRIMARY KEY",
        IndexType::Unique => "UNIQUE",
        IndexType::Index => "INDEX",
    };
    let list = named_list(kind, rest, clause)?;
    Ok(IndexDefinition {
        name: constraint_name.or(list.name),
        index_type,
        columns: list.columns,
    })
}

/// Parses the text after `FOREIGN KEY`:
/// `[name] (cols) REFERENCES [schema.]table (cols) [ON DELETE ..] [ON UPDATE ..]`.
///
/// # Errors
///
/// Fails on a missing column list, a missing `REFERENCES` part, or when the
/// two column lists differ in length.
pub fn parse_foreign_key(
    constraint_name: Option<String>,
    rest: &str,
    clause: &str,
) -> Result<ForeignKeyDefinition, ParseError> {
    let list = named_list(FOREIGN_KEY, rest, clause)?;
    parse_references(
        constraint_name.or(list.name),
        list.columns,
        list.after,
        clause,
    )
}

/// Parses a `REFERENCES` tail for the given local columns.
///
/// Shared by table-level foreign keys and inline column references. The
/// referenced table's schema prefix is dropped and `ON DELETE`/`ON UPDATE`
/// may appear in either order.
///
/// # Errors
///
/// Fails when `REFERENCES`, the table or the column list is missing, or on
/// a column count mismatch.
pub fn parse_references(
    constraint_name: Option<String>,
    columns: Vec<String>,
    text: &str,
    clause: &str,
) -> Result<ForeignKeyDefinition, ParseError> {
    let invalid = || ParseError::InvalidConstraint {
        kind: FOREIGN_KEY,
        clause: clause.trim().to_string(),
    };

    let keyword = REFERENCES.find(text).ok_or_else(invalid)?;
    let (mut referenced_table, mut after) =
        read_identifier(&text[keyword.end()..]).ok_or_else(invalid)?;
    if let Some(qualified) = after.trim_start().strip_prefix('.') {
        let (table, rest) = read_identifier(qualified).ok_or_else(invalid)?;
        referenced_table = table;
        after = rest;
    }

    let after = after.trim_start();
    if !after.starts_with('(') {
        return Err(invalid());
    }
    let close = matching_paren(after, 0).ok_or_else(invalid)?;
    let referenced_columns = parse_column_list(&after[1..close]);
    if referenced_columns.is_empty() {
        return Err(invalid());
    }
    if referenced_columns.len() != columns.len() {
        return Err(ParseError::ForeignKeyArity {
            local: columns.len(),
            referenced: referenced_columns.len(),
            clause: clause.trim().to_string(),
        });
    }

    let mut on_delete = None;
    let mut on_update = None;
    let actions = mask_literals(&after[close + 1..]);
    for caps in ACTION.captures_iter(&actions) {
        let action = caps
            .get(2)
            .and_then(|m| ReferentialAction::from_sql(m.as_str()));
        match caps.get(1).map(|m| m.as_str().to_ascii_uppercase()).as_deref() {
            Some("DELETE") => on_delete = action,
            Some("UPDATE") => on_update = action,
            _ => {}
        }
    }

    Ok(ForeignKeyDefinition {
        constraint_name,
        columns,
        referenced_table,
        referenced_columns,
        on_delete,
        on_update,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_list_drops_prefix_and_order() {
        assert_eq!(
            parse_column_list("`a`, b(10) DESC, \"c\" ASC"),
            vec!["a", "b", "c"]
        );
    }

    #[test]
    fn test_primary_key() {
        let index = parse_primary_key("(`id`, `tenant_id`)", "PRIMARY KEY (`id`, `tenant_id`)")
            .unwrap();
        assert_eq!(index.name.as_deref(), Some("PRIMARY"));
        assert_eq!(index.index_type, IndexType::PrimaryKey);
        assert_eq!(index.columns, vec!["id", "tenant_id"]);

        assert!(matches!(
            parse_primary_key("()", "PRIMARY KEY ()"),
            Err(ParseError::InvalidConstraint { .. })
        ));
    }

    #[test]
    fn test_index_names() {
        let index = parse_index(IndexType::Unique, None, "uk_email (email)", "").unwrap();
        assert_eq!(index.name.as_deref(), Some("uk_email"));
        assert_eq!(index.index_type, IndexType::Unique);

        let index = parse_index(IndexType::Index, None, "(name)", "").unwrap();
        assert_eq!(index.name, None);

        let index =
            parse_index(IndexType::Index, None, "idx USING BTREE (name)", "").unwrap();
        assert_eq!(index.name.as_deref(), Some("idx"));

        let index = parse_index(IndexType::Index, None, "USING HASH (name)", "").unwrap();
        assert_eq!(index.name, None);

        let index = parse_index(IndexType::Unique, Some("c".into()), "u (a)", "").unwrap();
        assert_eq!(index.name.as_deref(), Some("c"));
    }

    #[test]
    fn test_foreign_key_full() {
        let fk = parse_foreign_key(
            Some("fk_order_user".into()),
            "(`user_id`) REFERENCES `shop`.`users` (`id`) ON UPDATE NO ACTION ON DELETE SET NULL",
            "",
        )
        .unwrap();
        assert_eq!(fk.constraint_name.as_deref(), Some("fk_order_user"));
        assert_eq!(fk.columns, vec!["user_id"]);
        assert_eq!(fk.referenced_table, "users");
        assert_eq!(fk.referenced_columns, vec!["id"]);
        assert_eq!(fk.on_delete, Some(ReferentialAction::SetNull));
        assert_eq!(fk.on_update, Some(ReferentialAction::NoAction));
    }

    #[test]
    fn test_foreign_key_without_actions() {
        let fk = parse_foreign_key(None, "idx_fk (a, b) REFERENCES t(x, y)", "").unwrap();
        assert_eq!(fk.constraint_name.as_deref(), Some("idx_fk"));
        assert_eq!(fk.columns, vec!["a", "b"]);
        assert_eq!(fk.referenced_columns, vec!["x", "y"]);
        assert_eq!(fk.on_delete, None);
        assert_eq!(fk.on_update, None);
    }

    #[test]
    fn test_foreign_key_arity_mismatch() {
        let err = parse_foreign_key(None, "(a, b) REFERENCES t(x)", "FK").unwrap_err();
        assert_eq!(
            err,
            ParseError::ForeignKeyArity {
                local: 2,
                referenced: 1,
                clause: "FK".into()
            }
        );
    }

    #[test]
    fn test_foreign_key_missing_references() {
        assert!(matches!(
            parse_foreign_key(None, "(a)", ""),
            Err(ParseError::InvalidConstraint { .. })
        ));
        assert!(matches!(
            parse_foreign_key(None, "(a) REFERENCES t", ""),
            Err(ParseError::InvalidConstraint { .. })
        ));
    }
}
