//! The `table-references` tool.

use crate::catalog::{Catalog, ForeignKey, Table};
use crate::function::{ExecutionContext, FunctionReturn, ReturnKind, ToolFunction};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Arguments of `table-references`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct TableReferencesParameters {
    /// Table whose foreign key relationships to show, by bare or full name.
    /// Shows every relationship when empty.
    pub table_name: String,
}

/// One foreign key edge between two tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct TableReference {
    /// Foreign key name.
    pub name: String,
    /// Full name of the referencing table.
    pub from: String,
    /// Referencing columns.
    pub from_columns: Vec<String>,
    /// Name of the referenced table, as declared.
    pub to: String,
    /// Referenced columns.
    pub to_columns: Vec<String>,
}

impl TableReference {
    fn new(table: &Table, foreign_key: &ForeignKey) -> Self {
        Self {
            name: foreign_key.name.clone(),
            from: table.full_name(),
            from_columns: foreign_key.columns.clone(),
            to: foreign_key.referenced_table.clone(),
            to_columns: foreign_key.referenced_columns.clone(),
        }
    }
}

/// Shows the foreign key relationships a table takes part in.
#[derive(Debug, Default)]
pub struct TableReferences;

impl ToolFunction for TableReferences {
    type Parameters = TableReferencesParameters;
    const NAME: &'static str = "table-references";
    const DESCRIPTION: &'static str = "List the foreign key relationships in which a table is \
        either the referencing or the referenced table.";
    const RETURN_KIND: ReturnKind = ReturnKind::Json;

    fn call(
        &self,
        parameters: &TableReferencesParameters,
        context: &ExecutionContext<'_>,
    ) -> anyhow::Result<FunctionReturn> {
        let references = references(context.catalog(), parameters.table_name.trim());
        Ok(FunctionReturn::json(&references)?)
    }
}

/// Foreign key edges touching `table_name`, or all edges when it is blank.
pub fn references(catalog: &Catalog, table_name: &str) -> Vec<TableReference> {
    let mut edges = Vec::new();
    for table in catalog.tables() {
        for foreign_key in &table.foreign_keys {
            let touches = table_name.is_empty()
                || table.is_named(table_name)
                || refers_to(&foreign_key.referenced_table, table_name);
            if touches {
                edges.push(TableReference::new(table, foreign_key));
            }
        }
    }
    edges
}

fn refers_to(referenced_table: &str, name: &str) -> bool {
    referenced_table.eq_ignore_ascii_case(name)
        || referenced_table
            .rsplit('.')
            .next()
            .is_some_and(|bare| bare.eq_ignore_ascii_case(name))
}
