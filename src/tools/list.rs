//! The `list` tool.

use crate::catalog::name_pattern;
use crate::function::{ExecutionContext, FunctionReturn, ReturnKind, ToolFunction};
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Which kinds of objects to list.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "UPPERCASE")]
pub enum DatabaseObjectType {
    /// Tables, views and routines.
    #[default]
    All,
    /// Tables and views.
    Tables,
    /// Procedures and functions.
    Routines,
}

/// Arguments of `list`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct ListParameters {
    /// Kind of database objects to list: ALL, TABLES or ROUTINES.
    pub database_object_type: DatabaseObjectType,

    /// Regular expression matched against the whole object name, ignoring case.
    pub name_pattern: String,
}

impl Default for ListParameters {
    fn default() -> Self {
        Self {
            database_object_type: DatabaseObjectType::All,
            name_pattern: ".*".to_string(),
        }
    }
}

/// Lists tables, views and routines by name.
#[derive(Debug, Default)]
pub struct List;

impl ToolFunction for List {
    type Parameters = ListParameters;
    const NAME: &'static str = "list";
    const DESCRIPTION: &'static str = "List the tables, views, procedures and functions in the database, \
        optionally filtered by object type and a regular expression on the name.";
    const RETURN_KIND: ReturnKind = ReturnKind::Text;

    fn call(
        &self,
        parameters: &ListParameters,
        context: &ExecutionContext<'_>,
    ) -> anyhow::Result<FunctionReturn> {
        let pattern = name_pattern(&parameters.name_pattern)
            .with_context(|| format!("Invalid name pattern \"{}\"", parameters.name_pattern))?;
        let catalog = context.catalog();

        let mut out = String::new();
        if parameters.database_object_type != DatabaseObjectType::Routines {
            for table in catalog.tables_matching(&pattern) {
                writeln!(out, "{:<10}{}", table.kind.to_string(), table.full_name())?;
            }
        }
        if parameters.database_object_type != DatabaseObjectType::Tables {
            for routine in catalog.routines_matching(&pattern) {
                writeln!(out, "{:<10}{}", routine.kind.to_string(), routine.full_name())?;
            }
        }
        Ok(FunctionReturn::text(out.trim_end()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::function::NO_RESULTS;
    use crate::tools::tests::{library, run};
    use serde_json::json;

    #[test]
    fn test_list_all() {
        let text = run::<List>(json!({}), &library()).unwrap().into_text();
        assert_eq!(
            text,
            "TABLE     PUBLIC.AUTHORS\n\
             TABLE     PUBLIC.BOOKS\n\
             VIEW      PUBLIC.RECENT_BOOKS\n\
             FUNCTION  PUBLIC.BOOK_COUNT\n\
             PROCEDURE PUBLIC.ADD_BOOK"
        );
    }

    #[test]
    fn test_list_routines_only() {
        let text = run::<List>(json!({"database-object-type": "ROUTINES"}), &library())
            .unwrap()
            .into_text();
        assert_eq!(text, "FUNCTION  PUBLIC.BOOK_COUNT\nPROCEDURE PUBLIC.ADD_BOOK");
    }

    #[test]
    fn test_list_pattern_is_anchored_and_case_insensitive() {
        let text = run::<List>(
            json!({"database-object-type": "TABLES", "name-pattern": "books"}),
            &library(),
        )
        .unwrap()
        .into_text();
        assert_eq!(text, "TABLE     PUBLIC.BOOKS");
    }

    #[test]
    fn test_list_no_match() {
        let result = run::<List>(json!({"name-pattern": "ORDERS"}), &library()).unwrap();
        assert_eq!(result.into_text(), NO_RESULTS);
    }

    #[test]
    fn test_list_invalid_pattern() {
        let error = run::<List>(json!({"name-pattern": "BOOKS("}), &library()).unwrap_err();
        assert!(format!("{:#}", error).starts_with("Invalid name pattern \"BOOKS(\""));
    }
}
