//! Built-in tools for inspecting a schema catalog.
//!
//! | name                 | returns | needs a connection |
//! |----------------------|---------|--------------------|
//! | `list`               | text    | no                 |
//! | `describe-tables`    | JSON    | no                 |
//! | `describe-routines`  | JSON    | no                 |
//! | `table-references`   | JSON    | no                 |
//! | `lint`               | text    | no                 |
//! | `server-information` | text    | yes                |

mod describe_routines;
mod describe_tables;
mod lint;
mod list;
mod server_information;
mod table_references;

pub use describe_routines::{DescribeRoutines, DescribeRoutinesParameters};
pub use describe_tables::{DescribeTables, DescribeTablesParameters, DescriptionScope};
pub use lint::{Lint, LintParameters};
pub use list::{DatabaseObjectType, List, ListParameters};
pub use server_information::ServerInformation;
pub use table_references::{references, TableReference, TableReferences, TableReferencesParameters};

use crate::function::{DefinitionProvider, FunctionDefinition, RegistryResult};

/// Definitions of every built-in tool.
pub fn builtin_definitions() -> Vec<FunctionDefinition> {
    vec![
        FunctionDefinition::of::<List>(),
        FunctionDefinition::of::<DescribeTables>(),
        FunctionDefinition::of::<DescribeRoutines>(),
        FunctionDefinition::of::<TableReferences>(),
        FunctionDefinition::of::<Lint>(),
        FunctionDefinition::of::<ServerInformation>(),
    ]
}

/// Provides the built-in tools to a registry builder.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuiltinProvider;

impl DefinitionProvider for BuiltinProvider {
    fn name(&self) -> &str {
        "builtin"
    }

    fn discover(&self) -> RegistryResult<Vec<FunctionDefinition>> {
        Ok(builtin_definitions())
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::catalog::{Catalog, Column, ForeignKey, Routine, Schema, Table};
    use crate::function::{
        decode_parameters, ExecutionContext, FunctionDefinitionRegistry, FunctionReturn,
        ReturnKind, ToolFunction,
    };
    use serde_json::Value;

    /// AUTHORS and BOOKS, with an unindexed foreign key from BOOKS, plus a
    /// view and two routines.
    pub(crate) fn library() -> Catalog {
        Catalog::new().with_schema(
            Schema::new("PUBLIC")
                .with_table(
                    Table::new("PUBLIC", "AUTHORS")
                        .with_column(Column::new("ID", "INTEGER").not_null())
                        .with_column(Column::new("NAME", "VARCHAR(100)"))
                        .with_primary_key(&["ID"]),
                )
                .with_table(
                    Table::new("PUBLIC", "BOOKS")
                        .with_remarks("Books in the library")
                        .with_column(Column::new("ID", "INTEGER").not_null())
                        .with_column(Column::new("AUTHOR_ID", "INTEGER"))
                        .with_column(Column::new("TITLE", "VARCHAR(200)").not_null())
                        .with_primary_key(&["ID"])
                        .with_foreign_key(ForeignKey::new(
                            "FK_BOOKS_AUTHOR",
                            &["AUTHOR_ID"],
                            "PUBLIC.AUTHORS",
                            &["ID"],
                        )),
                )
                .with_table(
                    Table::view("PUBLIC", "RECENT_BOOKS")
                        .with_column(Column::new("TITLE", "VARCHAR(200)")),
                )
                .with_routine(
                    Routine::function("PUBLIC", "BOOK_COUNT", "INTEGER")
                        .with_parameter("AUTHOR_ID", "INTEGER", "IN"),
                )
                .with_routine(
                    Routine::procedure("PUBLIC", "ADD_BOOK")
                        .with_parameter("TITLE", "VARCHAR(200)", "IN"),
                ),
        )
    }

    /// Decode `arguments` and call a tool once, without a connection.
    pub(crate) fn run<T: ToolFunction>(arguments: Value, catalog: &Catalog) -> anyhow::Result<FunctionReturn> {
        let parameters = decode_parameters::<T::Parameters>(arguments)?;
        T::default().call(&parameters, &ExecutionContext::new(catalog, None))
    }

    #[test]
    fn test_builtin_registry() {
        let registry = FunctionDefinitionRegistry::build(builtin_definitions()).unwrap();
        assert_eq!(
            registry.names(),
            vec![
                "describe-routines",
                "describe-tables",
                "lint",
                "list",
                "server-information",
                "table-references",
            ]
        );

        let json: Vec<_> = registry
            .list_by_return_kind(ReturnKind::Json)
            .iter()
            .map(|def| def.name())
            .collect();
        assert_eq!(json, vec!["describe-routines", "describe-tables", "table-references"]);

        let connected: Vec<_> = registry
            .list()
            .into_iter()
            .filter(|def| def.requires_connection())
            .map(|def| def.name())
            .collect();
        assert_eq!(connected, vec!["server-information"]);
    }

    #[test]
    fn test_builtin_specifications() {
        let registry = FunctionDefinitionRegistry::build(builtin_definitions()).unwrap();

        let list = registry.specification("list").unwrap();
        assert_eq!(list.parameter_names(), vec!["database-object-type", "name-pattern"]);
        assert!(list.required_parameters().is_empty());
        assert_eq!(
            list.parameters["properties"]["database-object-type"]["enum"],
            serde_json::json!(["ALL", "TABLES", "ROUTINES"])
        );

        let describe = registry.specification("describe-tables").unwrap();
        assert_eq!(describe.parameter_names(), vec!["description-scope", "table-name"]);
        assert_eq!(describe.parameters["properties"]["description-scope"]["type"], "array");
        assert_eq!(
            describe.parameters["properties"]["description-scope"]["items"]["enum"],
            serde_json::json!(["COLUMNS", "PRIMARY_KEY", "INDEXES", "FOREIGN_KEYS"])
        );

        let server = registry.specification("server-information").unwrap();
        assert!(!server.has_parameters());
    }

    #[test]
    fn test_builtin_provider() {
        let definitions = BuiltinProvider.discover().unwrap();
        assert_eq!(definitions.len(), 6);
        assert_eq!(BuiltinProvider.name(), "builtin");
    }

    #[test]
    fn test_all_parameters_default() {
        let catalog = std::sync::Arc::new(library());
        let registry = FunctionDefinitionRegistry::build(builtin_definitions()).unwrap();
        for name in ["list", "describe-tables", "describe-routines", "table-references", "lint"] {
            let mut executor = registry.lookup(name).unwrap().create_executor();
            executor.configure(serde_json::json!({})).unwrap();
            executor.attach_catalog(catalog.clone()).unwrap();
            assert!(executor.execute().is_ok(), "{name} failed with defaults");
        }
    }
}
