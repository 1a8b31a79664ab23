//! The `describe-tables` tool.

use crate::catalog::{name_pattern, Column, ForeignKey, Index, PrimaryKey, Table, TableKind};
use crate::function::{ExecutionContext, FunctionReturn, ReturnKind, ToolFunction};
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Parts of a table to include in a description.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DescriptionScope {
    /// Column names, types and nullability.
    Columns,
    /// The primary key.
    PrimaryKey,
    /// Indexes other than the primary key.
    Indexes,
    /// Outgoing foreign keys.
    ForeignKeys,
}

impl DescriptionScope {
    /// Every scope.
    pub const ALL: [DescriptionScope; 4] = [
        Self::Columns,
        Self::PrimaryKey,
        Self::Indexes,
        Self::ForeignKeys,
    ];
}

/// Arguments of `describe-tables`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct DescribeTablesParameters {
    /// Regular expression matched against the whole table name, ignoring case.
    pub table_name: String,

    /// Parts of each table to describe. An empty list describes every part.
    pub description_scope: Vec<DescriptionScope>,
}

impl Default for DescribeTablesParameters {
    fn default() -> Self {
        Self {
            table_name: ".*".to_string(),
            description_scope: DescriptionScope::ALL.to_vec(),
        }
    }
}

impl DescribeTablesParameters {
    fn includes(&self, scope: DescriptionScope) -> bool {
        self.description_scope.is_empty() || self.description_scope.contains(&scope)
    }
}

#[derive(Serialize)]
#[serde(rename_all = "kebab-case")]
struct TableDescription<'a> {
    schema: &'a str,
    name: &'a str,
    kind: TableKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    remarks: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    columns: Option<&'a [Column]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    primary_key: Option<&'a PrimaryKey>,
    #[serde(skip_serializing_if = "Option::is_none")]
    indexes: Option<&'a [Index]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    foreign_keys: Option<&'a [ForeignKey]>,
}

impl<'a> TableDescription<'a> {
    fn new(table: &'a Table, parameters: &DescribeTablesParameters) -> Self {
        let scoped = |scope: DescriptionScope| parameters.includes(scope);
        Self {
            schema: &table.schema,
            name: &table.name,
            kind: table.kind,
            remarks: table.remarks.as_deref(),
            columns: scoped(DescriptionScope::Columns).then_some(table.columns.as_slice()),
            primary_key: table
                .primary_key
                .as_ref()
                .filter(|_| scoped(DescriptionScope::PrimaryKey)),
            indexes: scoped(DescriptionScope::Indexes).then_some(table.indexes.as_slice()),
            foreign_keys: scoped(DescriptionScope::ForeignKeys)
                .then_some(table.foreign_keys.as_slice()),
        }
    }
}

/// Describes the structure of matching tables as JSON.
#[derive(Debug, Default)]
pub struct DescribeTables;

impl ToolFunction for DescribeTables {
    type Parameters = DescribeTablesParameters;
    const NAME: &'static str = "describe-tables";
    const DESCRIPTION: &'static str = "Describe the columns, primary key, indexes and foreign keys \
        of tables whose names match a regular expression.";
    const RETURN_KIND: ReturnKind = ReturnKind::Json;

    fn call(
        &self,
        parameters: &DescribeTablesParameters,
        context: &ExecutionContext<'_>,
    ) -> anyhow::Result<FunctionReturn> {
        let pattern = name_pattern(&parameters.table_name)
            .with_context(|| format!("Invalid table name pattern \"{}\"", parameters.table_name))?;
        let descriptions: Vec<_> = context
            .catalog()
            .tables_matching(&pattern)
            .map(|table| TableDescription::new(table, parameters))
            .collect();
        Ok(FunctionReturn::json(&descriptions)?)
    }
}
