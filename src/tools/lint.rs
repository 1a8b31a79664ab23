//! The `lint` tool.

use crate::function::{ExecutionContext, FunctionReturn, ReturnKind, ToolFunction};
use crate::lint::Linter;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Arguments of `lint`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct LintParameters {
    /// Table to lint, by bare or full name. Lints every table when empty.
    pub table_name: String,
}

/// Reports schema design problems.
#[derive(Default)]
pub struct Lint {
    linter: Linter,
}

impl Lint {
    /// Run a chosen linter instead of the built-in checks.
    pub fn with_linter(linter: Linter) -> Self {
        Self { linter }
    }
}

impl ToolFunction for Lint {
    type Parameters = LintParameters;
    const NAME: &'static str = "lint";
    const DESCRIPTION: &'static str = "Lint the database schema for design problems such as missing \
        primary keys, unindexed foreign keys and redundant indexes. Lints one table, or all tables \
        when no table name is given.";
    const RETURN_KIND: ReturnKind = ReturnKind::Text;

    fn call(
        &self,
        parameters: &LintParameters,
        context: &ExecutionContext<'_>,
    ) -> anyhow::Result<FunctionReturn> {
        let catalog = context.catalog();
        let table_name = parameters.table_name.trim();

        let report = if table_name.is_empty() {
            self.linter.lint_catalog(catalog)
        } else {
            match catalog.find_table(table_name) {
                Some(table) => self.linter.lint_table(table),
                None => {
                    return Ok(FunctionReturn::text(format!(
                        "Table \"{}\" was not found",
                        table_name
                    )))
                }
            }
        };
        Ok(FunctionReturn::text(report.to_string()))
    }
}
