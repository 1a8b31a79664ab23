//! Schema linter used by the `lint` tool.
//!
//! A [`Linter`] runs a fixed list of [`LintCheck`]s over tables and
//! collects the findings in a [`LintReport`].
//!
//! # Example
//!
//! ```
//! use schemachat::catalog::{Catalog, Schema, Table};
//! use schemachat::lint::{Linter, Severity};
//!
//! let catalog = Catalog::new().with_schema(Schema::new("PUBLIC").with_table(Table::new("PUBLIC", "LOG")));
//! let report = Linter::new().lint_catalog(&catalog);
//!
//! assert_eq!(report.max_severity(), Some(Severity::High));
//! assert!(report.to_string().contains("no-primary-key"));
//! ```

mod checks;
mod report;

pub use checks::{
    ForeignKeyWithNoIndex, LintCheck, NoIndexes, NoPrimaryKey, NullableColumnInUniqueIndex,
    RedundantIndex,
};
pub use report::{LintFinding, LintReport, Severity, NO_LINTS};

use crate::catalog::{Catalog, Table};

/// Runs lint checks over catalog tables.
pub struct Linter {
    checks: Vec<Box<dyn LintCheck>>,
}

impl Linter {
    /// Create a linter with every built-in check.
    pub fn new() -> Self {
        Self {
            checks: vec![
                Box::new(NoPrimaryKey),
                Box::new(ForeignKeyWithNoIndex),
                Box::new(NoIndexes),
                Box::new(RedundantIndex),
                Box::new(NullableColumnInUniqueIndex),
            ],
        }
    }

    /// Create a linter with a chosen list of checks.
    pub fn with_checks(checks: Vec<Box<dyn LintCheck>>) -> Self {
        Self { checks }
    }

    /// Identifiers of the configured checks, in run order.
    pub fn check_ids(&self) -> Vec<&'static str> {
        self.checks.iter().map(|c| c.id()).collect()
    }

    /// Lint every table in the catalog.
    pub fn lint_catalog(&self, catalog: &Catalog) -> LintReport {
        self.lint_tables(catalog.tables())
    }

    /// Lint a single table.
    pub fn lint_table(&self, table: &Table) -> LintReport {
        self.lint_tables(std::iter::once(table))
    }

    /// Lint tables in the order given, findings in check order per table.
    pub fn lint_tables<'a>(&self, tables: impl IntoIterator<Item = &'a Table>) -> LintReport {
        let mut report = LintReport::default();
        for table in tables {
            report.tables_checked += 1;
            for check in &self.checks {
                for message in check.check(table) {
                    report.findings.push(LintFinding {
                        table: table.full_name(),
                        lint_id: check.id().to_string(),
                        severity: check.severity(),
                        message,
                    });
                }
            }
        }
        tracing::debug!(
            tables = report.tables_checked,
            findings = report.findings.len(),
            "Lint run finished"
        );
        report
    }
}

impl Default for Linter {
    fn default() -> Self {
        Self::new()
    }
}
