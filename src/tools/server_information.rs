//! The `server-information` tool.

use crate::function::{ExecutionContext, FunctionReturn, NoParameters, ReturnKind, ToolFunction};
use std::fmt::Write;

/// Reports the database server and driver behind the live connection.
#[derive(Debug, Default)]
pub struct ServerInformation;

impl ToolFunction for ServerInformation {
    type Parameters = NoParameters;
    const NAME: &'static str = "server-information";
    const DESCRIPTION: &'static str = "Get the database server product, version and driver details, \
        along with server properties.";
    const RETURN_KIND: ReturnKind = ReturnKind::Text;
    const REQUIRES_CONNECTION: bool = true;

    fn call(
        &self,
        _parameters: &NoParameters,
        context: &ExecutionContext<'_>,
    ) -> anyhow::Result<FunctionReturn> {
        let info = context.connection()?.server_information()?;

        let mut out = String::new();
        writeln!(out, "Database product: {} {}", info.product_name, info.product_version)?;
        write!(out, "Driver: {} {}", info.driver_name, info.driver_version)?;
        if !info.properties.is_empty() {
            write!(out, "\nProperties:")?;
            for (key, value) in &info.properties {
                write!(out, "\n  {} = {}", key, value)?;
            }
        }
        Ok(FunctionReturn::text(out))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{self, Catalog, Connection};

    struct Fixed;

    impl Connection for Fixed {
        fn server_information(&self) -> anyhow::Result<catalog::ServerInformation> {
            let mut info = catalog::ServerInformation {
                product_name: "HSQL Database Engine".to_string(),
                product_version: "2.7.2".to_string(),
                driver_name: "HSQL Database Engine Driver".to_string(),
                driver_version: "2.7.2".to_string(),
                ..Default::default()
            };
            info.properties.insert("sql.syntax_ora".to_string(), "false".to_string());
            Ok(info)
        }
    }

    struct Closed;

    impl Connection for Closed {
        fn server_information(&self) -> anyhow::Result<catalog::ServerInformation> {
            anyhow::bail!("Connection is closed")
        }
    }

    #[test]
    fn test_server_information() {
        let catalog = Catalog::new();
        let connection = Fixed;
        let context = ExecutionContext::new(&catalog, Some(&connection));
        let text = ServerInformation
            .call(&NoParameters::default(), &context)
            .unwrap()
            .into_text();
        assert_eq!(
            text,
            "Database product: HSQL Database Engine 2.7.2\n\
             Driver: HSQL Database Engine Driver 2.7.2\n\
             Properties:\n  sql.syntax_ora = false"
        );
    }

    #[test]
    fn test_without_connection() {
        let catalog = Catalog::new();
        let context = ExecutionContext::new(&catalog, None);
        let error = ServerInformation
            .call(&NoParameters::default(), &context)
            .unwrap_err();
        assert_eq!(error.to_string(), "No database connection is available");
    }

    #[test]
    fn test_connection_failure_propagates() {
        let catalog = Catalog::new();
        let connection = Closed;
        let context = ExecutionContext::new(&catalog, Some(&connection));
        let error = ServerInformation
            .call(&NoParameters::default(), &context)
            .unwrap_err();
        assert_eq!(error.to_string(), "Connection is closed");
    }
}
