//! Built-in lint checks.

use crate::catalog::{Table, TableKind};
use crate::lint::Severity;

/// One schema rule, evaluated per table.
pub trait LintCheck: Send + Sync {
    /// Kebab-case identifier shown in reports.
    fn id(&self) -> &'static str;

    /// How serious a violation is.
    fn severity(&self) -> Severity;

    /// One message per violation found in `table`.
    fn check(&self, table: &Table) -> Vec<String>;
}

/// Base table without a primary key.
pub struct NoPrimaryKey;

impl LintCheck for NoPrimaryKey {
    fn id(&self) -> &'static str {
        "no-primary-key"
    }

    fn severity(&self) -> Severity {
        Severity::High
    }

    fn check(&self, table: &Table) -> Vec<String> {
        if table.kind == TableKind::Table && table.primary_key.is_none() {
            vec!["Table has no primary key".to_string()]
        } else {
            Vec::new()
        }
    }
}

/// Foreign key whose columns do not lead any index or the primary key.
pub struct ForeignKeyWithNoIndex;

impl LintCheck for ForeignKeyWithNoIndex {
    fn id(&self) -> &'static str {
        "foreign-key-with-no-index"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn check(&self, table: &Table) -> Vec<String> {
        let mut leading: Vec<&[String]> = table.indexes.iter().map(|i| i.columns.as_slice()).collect();
        if let Some(pk) = &table.primary_key {
            leading.push(&pk.columns);
        }

        table
            .foreign_keys
            .iter()
            .filter(|fk| !leading.iter().any(|columns| starts_with(columns, &fk.columns)))
            .map(|fk| {
                format!(
                    "Foreign key {} ({}) references {} but has no index",
                    fk.name,
                    fk.columns.join(", "),
                    fk.referenced_table
                )
            })
            .collect()
    }
}

/// Base table with neither indexes nor a primary key.
pub struct NoIndexes;

impl LintCheck for NoIndexes {
    fn id(&self) -> &'static str {
        "no-indexes"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn check(&self, table: &Table) -> Vec<String> {
        if table.kind == TableKind::Table && table.indexes.is_empty() && table.primary_key.is_none() {
            vec!["Table has no indexes".to_string()]
        } else {
            Vec::new()
        }
    }
}

/// Non-unique index whose columns are a strict prefix of another index.
pub struct RedundantIndex;

impl LintCheck for RedundantIndex {
    fn id(&self) -> &'static str {
        "redundant-index"
    }

    fn severity(&self) -> Severity {
        Severity::Low
    }

    fn check(&self, table: &Table) -> Vec<String> {
        let mut messages = Vec::new();
        for index in table.indexes.iter().filter(|i| !i.unique) {
            let covering = table.indexes.iter().find(|other| {
                other.columns.len() > index.columns.len() && starts_with(&other.columns, &index.columns)
            });
            if let Some(covering) = covering {
                messages.push(format!(
                    "Index {} ({}) is redundant with {} ({})",
                    index.name,
                    index.columns.join(", "),
                    covering.name,
                    covering.columns.join(", ")
                ));
            }
        }
        messages
    }
}

/// Unique index over a nullable column.
pub struct NullableColumnInUniqueIndex;

impl LintCheck for NullableColumnInUniqueIndex {
    fn id(&self) -> &'static str {
        "nullable-column-in-unique-index"
    }

    fn severity(&self) -> Severity {
        Severity::Medium
    }

    fn check(&self, table: &Table) -> Vec<String> {
        let mut messages = Vec::new();
        for index in table.indexes.iter().filter(|i| i.unique) {
            for name in &index.columns {
                if table.column(name).is_some_and(|c| c.nullable) {
                    messages.push(format!(
                        "Unique index {} contains nullable column {}",
                        index.name, name
                    ));
                }
            }
        }
        messages
    }
}

fn starts_with(columns: &[String], prefix: &[String]) -> bool {
    !prefix.is_empty()
        && columns.len() >= prefix.len()
        && columns
            .iter()
            .zip(prefix)
            .all(|(a, b)| a.eq_ignore_ascii_case(b))
}
