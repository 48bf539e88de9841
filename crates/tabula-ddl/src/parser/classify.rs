//! Labelling top-level clauses of a table body.

use once_cell::sync::Lazy;
use regex::Regex;

use super::scan::read_identifier;

static CONSTRAINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^CONSTRAINT\b\s*(.*)$").expect("valid CONSTRAINT regex"));
static PRIMARY_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^PRIMARY\s+KEY\b\s*(.*)$").expect("valid PRIMARY KEY regex"));
static FOREIGN_KEY: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^FOREIGN\s+KEY\b\s*(.*)$").expect("valid FOREIGN KEY regex"));
static UNIQUE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^UNIQUE\b(?:\s+(?:KEY|INDEX)\b)?\s*(.*)$").expect("valid UNIQUE regex")
});
static INDEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?is)^(?:(?:FULLTEXT|SPATIAL)\b(?:\s+(?:KEY|INDEX)\b)?|KEY\b|INDEX\b)\s*(.*)$")
        .expect("valid INDEX regex")
});
static CHECK: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?is)^CHECK\b").expect("valid CHECK regex"));

/// Kind of a top-level clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClauseKind {
    /// A column definition.
    Column,
    /// `PRIMARY KEY (...)`.
    PrimaryKey,
    /// `FOREIGN KEY (...) REFERENCES ...`.
    ForeignKey,
    /// `UNIQUE [KEY|INDEX] [name] (...)`.
    Unique,
    /// `KEY`/`INDEX`/`FULLTEXT`/`SPATIAL [name] (...)`.
    Index,
    /// Any other constraint, e.g. `CHECK (...)`.
    OtherConstraint,
}

impl ClauseKind {
    /// Keyword text used in diagnostics.
    #[must_use]
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Column => "COLUMN",
            Self::PrimaryKey => "PRIMARY KEY",
            Self::ForeignKey => "FOREIGN KEY",
            Self::Unique => "UNIQUE",
            Self::Index => "INDEX",
            Self::OtherConstraint => "CONSTRAINT",
        }
    }
}

/// A classified clause.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Clause<'a> {
    /// What the clause declares.
    pub kind: ClauseKind,
    /// Name given with `CONSTRAINT <name>`.
    pub constraint_name: Option<String>,
    /// The text after the leading keywords; the whole clause for columns.
    pub rest: &'a str,
}

fn tail<'a>(re: &Regex, text: &'a str) -> Option<&'a str> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str())
}

fn classify_keywords(text: &str) -> Option<(ClauseKind, &str)> {
    if let Some(rest) = tail(&PRIMARY_KEY, text) {
        return Some((ClauseKind::PrimaryKey, rest));
    }
    if let Some(rest) = tail(&FOREIGN_KEY, text) {
        return Some((ClauseKind::ForeignKey, rest));
    }
    if let Some(rest) = tail(&UNIQUE, text) {
        return Some((ClauseKind::Unique, rest));
    }
    if let Some(rest) = tail(&INDEX, text) {
        return Some((ClauseKind::Index, rest));
    }
    if CHECK.is_match(text) {
        return Some((ClauseKind::OtherConstraint, text));
    }
    None
}

/// Classifies one top-level clause.
///
/// Classification is lexical: a clause is a column unless it starts with a
/// constraint keyword as a whole word, so `unique_code INT` stays a column.
#[must_use]
pub fn classify(clause: &str) -> Clause<'_> {
    let clause = clause.trim();

    if let Some(after) = tail(&CONSTRAINT, clause) {
        // The symbol is optional: `CONSTRAINT PRIMARY KEY (id)` is valid.
        if let Some((kind, rest)) = classify_keywords(after) {
            return Clause {
                kind,
                constraint_name: None,
                rest,
            };
        }
        let Some((name, remainder)) = read_identifier(after) else {
            return Clause {
                kind: ClauseKind::OtherConstraint,
                constraint_name: None,
                rest: clause,
            };
        };
        let remainder = remainder.trim_start();
        return match classify_keywords(remainder) {
            Some((kind, rest)) => Clause {
                kind,
                constraint_name: Some(name),
                rest,
            },
            None => Clause {
                kind: ClauseKind::OtherConstraint,
                constraint_name: Some(name),
                rest: remainder,
            },
        };
    }

    match classify_keywords(clause) {
        Some((kind, rest)) => Clause {
            kind,
            constraint_name: None,
            rest,
        },
        None => Clause {
            kind: ClauseKind::Column,
            constraint_name: None,
            rest: clause,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kind(clause: &str) -> ClauseKind {
        classify(clause).kind
    }

    #[test]
    fn test_columns() {
        assert_eq!(kind("id INT"), ClauseKind::Column);
        assert_eq!(kind("unique_code VARCHAR(10)"), ClauseKind::Column);
        assert_eq!(kind("key_id INT"), ClauseKind::Column);
        assert_eq!(kind("`primary` INT"), ClauseKind::Column);
        assert_eq!(kind("indexed TINYINT"), ClauseKind::Column);
        assert_eq!(kind("constraints TEXT"), ClauseKind::Column);
    }

    #[test]
    fn test_table_constraints() {
        assert_eq!(kind("PRIMARY KEY (id)"), ClauseKind::PrimaryKey);
        assert_eq!(kind("primary  key(`id`)"), ClauseKind::PrimaryKey);
        assert_eq!(
            kind("FOREIGN KEY (a) REFERENCES b(id)"),
            ClauseKind::ForeignKey
        );
        assert_eq!(kind("UNIQUE KEY uk (email)"), ClauseKind::Unique);
        assert_eq!(kind("UNIQUE (email)"), ClauseKind::Unique);
        assert_eq!(kind("KEY idx_name (name)"), ClauseKind::Index);
        assert_eq!(kind("INDEX (name)"), ClauseKind::Index);
        assert_eq!(kind("FULLTEXT KEY ft (body)"), ClauseKind::Index);
        assert_eq!(kind("CHECK (a > 0)"), ClauseKind::OtherConstraint);
    }

    #[test]
    fn test_rest_after_keywords() {
        assert_eq!(classify("UNIQUE KEY uk (email)").rest, "uk (email)");
        assert_eq!(classify("PRIMARY KEY (id)").rest, "(id)");
    }

    #[test]
    fn test_named_constraints() {
        let clause = classify("CONSTRAINT `fk_user` FOREIGN KEY (user_id) REFERENCES users (id)");
        assert_eq!(clause.kind, ClauseKind::ForeignKey);
        assert_eq!(clause.constraint_name.as_deref(), Some("fk_user"));
        assert_eq!(clause.rest, "(user_id) REFERENCES users (id)");

        let clause = classify("CONSTRAINT uk_email UNIQUE (email)");
        assert_eq!(clause.kind, ClauseKind::Unique);
        assert_eq!(clause.constraint_name.as_deref(), Some("uk_email"));

        let clause = classify("CONSTRAINT pk PRIMARY KEY (id)");
        assert_eq!(clause.kind, ClauseKind::PrimaryKey);

        let clause = classify("CONSTRAINT chk_price CHECK (price >= 0)");
        assert_eq!(clause.kind, ClauseKind::OtherConstraint);
        assert_eq!(clause.constraint_name.as_deref(), Some("chk_price"));
    }

    #[test]
    fn test_unnamed_constraint_keyword() {
        let clause = classify("CONSTRAINT PRIMARY KEY (id)");
        assert_eq!(clause.kind, ClauseKind::PrimaryKey);
        assert_eq!(clause.constraint_name, None);
    }
}
