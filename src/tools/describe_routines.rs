//! The `describe-routines` tool.

use crate::catalog::name_pattern;
use crate::function::{ExecutionContext, FunctionReturn, ReturnKind, ToolFunction};
use anyhow::Context;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Arguments of `describe-routines`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "kebab-case", deny_unknown_fields, default)]
pub struct DescribeRoutinesParameters {
    /// Regular expression matched against the whole routine name, ignoring case.
    pub routine_name: String,
}

impl Default for DescribeRoutinesParameters {
    fn default() -> Self {
        Self {
            routine_name: ".*".to_string(),
        }
    }
}

/// Describes stored procedures and functions as JSON.
#[derive(Debug, Default)]
pub struct DescribeRoutines;

impl ToolFunction for DescribeRoutines {
    type Parameters = DescribeRoutinesParameters;
    const NAME: &'static str = "describe-routines";
    const DESCRIPTION: &'static str = "Describe the parameters and return types of stored \
        procedures and functions whose names match a regular expression.";
    const RETURN_KIND: ReturnKind = ReturnKind::Json;

    fn call(
        &self,
        parameters: &DescribeRoutinesParameters,
        context: &ExecutionContext<'_>,
    ) -> anyhow::Result<FunctionReturn> {
        let pattern = name_pattern(&parameters.routine_name).with_context(|| {
            format!("Invalid routine name pattern \"{}\"", parameters.routine_name)
        })?;
        let routines: Vec<_> = context.catalog().routines_matching(&pattern).collect();
        Ok(FunctionReturn::json(&routines)?)
    }
}
