//! Lint findings and their rendering.

use serde::Serialize;
use std::fmt;

/// Text of a report without findings.
pub const NO_LINTS: &str = "No lints found";

/// How serious a lint is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Worth a look.
    Low,
    /// Likely to hurt performance or data quality.
    Medium,
    /// A design defect.
    High,
    /// Breaks correctness.
    Critical,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Low => "low",
            Self::Medium => "medium",
            Self::High => "high",
            Self::Critical => "critical",
        };
        f.write_str(name)
    }
}

/// One lint violation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LintFinding {
    /// Full name of the table.
    pub table: String,
    /// Identifier of the check that fired.
    pub lint_id: String,
    /// Severity of the check.
    pub severity: Severity,
    /// What was found, naming the objects involved.
    pub message: String,
}

/// Findings of one lint run.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct LintReport {
    /// Number of tables examined.
    pub tables_checked: usize,
    pub(crate) findings: Vec<LintFinding>,
}

impl LintReport {
    /// All findings, by table then check.
    pub fn findings(&self) -> &[LintFinding] {
        &self.findings
    }

    /// Findings for one table.
    pub fn for_table<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a LintFinding> {
        self.findings.iter().filter(move |f| f.table == table)
    }

    /// Number of findings.
    pub fn len(&self) -> usize {
        self.findings.len()
    }

    /// Whether nothing was found.
    pub fn is_empty(&self) -> bool {
        self.findings.is_empty()
    }

    /// The most serious severity found.
    pub fn max_severity(&self) -> Option<Severity> {
        self.findings.iter().map(|f| f.severity).max()
    }
}

impl fmt::Display for LintReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.findings.is_empty() {
            return f.write_str(NO_LINTS);
        }

        let mut current: Option<&str> = None;
        for finding in &self.findings {
            if current != Some(finding.table.as_str()) {
                if current.is_some() {
                    writeln!(f)?;
                }
                writeln!(f, "Lints for {}:", finding.table)?;
                current = Some(&finding.table);
            }
            writeln!(
                f,
                "- [{}] {}: {}",
                finding.severity, finding.lint_id, finding.message
            )?;
        }
        write!(
            f,
            "\n{} lint(s) in {} table(s) checked",
            self.findings.len(),
            self.tables_checked
        )
    }
}
