//! Tables, routines and their parts.

use regex::Regex;
use serde::Serialize;
use std::fmt;

/// The crawled schema model of one database.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Catalog {
    /// Product name reported by the crawler, if known.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_product: Option<String>,
    /// Schemas in crawl order.
    pub schemas: Vec<Schema>,
}

impl Catalog {
    /// Create an empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the database product name.
    pub fn with_database_product(mut self, product: impl Into<String>) -> Self {
        self.database_product = Some(product.into());
        self
    }

    /// Add a schema.
    pub fn with_schema(mut self, schema: Schema) -> Self {
        self.schemas.push(schema);
        self
    }

    /// All tables and views, in schema then crawl order.
    pub fn tables(&self) -> impl Iterator<Item = &Table> {
        self.schemas.iter().flat_map(|s| s.tables.iter())
    }

    /// All routines, in schema then crawl order.
    pub fn routines(&self) -> impl Iterator<Item = &Routine> {
        self.schemas.iter().flat_map(|s| s.routines.iter())
    }

    /// Find a table by bare name or `schema.table`, ignoring case.
    pub fn find_table(&self, name: &str) -> Option<&Table> {
        self.tables().find(|t| t.is_named(name))
    }

    /// Tables whose bare or full name matches `pattern`.
    ///
    /// Build the pattern with [`name_pattern`] to get whole-name matching.
    pub fn tables_matching<'a>(&'a self, pattern: &'a Regex) -> impl Iterator<Item = &'a Table> {
        self.tables()
            .filter(move |t| pattern.is_match(&t.name) || pattern.is_match(&t.full_name()))
    }

    /// Routines whose bare or full name matches `pattern`.
    pub fn routines_matching<'a>(
        &'a self,
        pattern: &'a Regex,
    ) -> impl Iterator<Item = &'a Routine> {
        self.routines()
            .filter(move |r| pattern.is_match(&r.name) || pattern.is_match(&r.full_name()))
    }

    /// Whether the catalog holds no tables and no routines.
    pub fn is_empty(&self) -> bool {
        self.tables().next().is_none() && self.routines().next().is_none()
    }
}

/// Compile a case-insensitive pattern that must match a whole object name.
///
/// The pattern must compile on its own, so input that closes the anchoring
/// group early (`X)|(.*`) is rejected instead of matching everything.
pub fn name_pattern(pattern: &str) -> Result<Regex, regex::Error> {
    Regex::new(pattern)?;
    Regex::new(&format!("(?i)^(?:{})$", pattern))
}

/// A database schema.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Schema {
    /// Schema name, blank for databases without schemas.
    pub name: String,
    /// Tables and views in crawl order.
    pub tables: Vec<Table>,
    /// Procedures and functions in crawl order.
    pub routines: Vec<Routine>,
}

impl Schema {
    /// Create an empty schema.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Add a table.
    pub fn with_table(mut self, table: Table) -> Self {
        self.tables.push(table);
        self
    }

    /// Add a routine.
    pub fn with_routine(mut self, routine: Routine) -> Self {
        self.routines.push(routine);
        self
    }
}

/// Whether a table is a base table or a view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TableKind {
    /// A base table.
    #[default]
    Table,
    /// A view.
    View,
}

impl fmt::Display for TableKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Table => write!(f, "TABLE"),
            Self::View => write!(f, "VIEW"),
        }
    }
}

/// A table or view.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Table {
    /// Owning schema.
    pub schema: String,
    /// Bare table name.
    pub name: String,
    /// Base table or view.
    pub kind: TableKind,
    /// Comment recorded in the database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
    /// Columns in ordinal order.
    pub columns: Vec<Column>,
    /// Primary key, if the table has one.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub primary_key: Option<PrimaryKey>,
    /// Foreign keys declared on this table.
    pub foreign_keys: Vec<ForeignKey>,
    /// Indexes other than the primary key.
    pub indexes: Vec<Index>,
}

impl Table {
    /// Create a base table with no columns.
    pub fn new(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a view with no columns.
    pub fn view(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            kind: TableKind::View,
            ..Self::new(schema, name)
        }
    }

    /// Set the table comment.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }

    /// Append a column.
    pub fn with_column(mut self, column: Column) -> Self {
        self.columns.push(column);
        self
    }

    /// Set the primary key, named `PK_<TABLE>`.
    pub fn with_primary_key(mut self, columns: &[&str]) -> Self {
        self.primary_key = Some(PrimaryKey {
            name: format!("PK_{}", self.name),
            columns: to_strings(columns),
        });
        self
    }

    /// Add a foreign key.
    pub fn with_foreign_key(mut self, foreign_key: ForeignKey) -> Self {
        self.foreign_keys.push(foreign_key);
        self
    }

    /// Add an index.
    pub fn with_index(mut self, index: Index) -> Self {
        self.indexes.push(index);
        self
    }

    /// `schema.table`, or the bare name when the schema is blank.
    pub fn full_name(&self) -> String {
        qualify(&self.schema, &self.name)
    }

    /// Whether `name` is this table's bare or full name, ignoring case.
    pub fn is_named(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name) || self.full_name().eq_ignore_ascii_case(name)
    }

    /// Look up a column by name, ignoring case.
    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name.eq_ignore_ascii_case(name))
    }
}

/// A table column.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Column {
    /// Column name.
    pub name: String,
    /// Database type, with size where it has one (`VARCHAR(100)`).
    pub data_type: String,
    /// Whether NULL is allowed.
    pub nullable: bool,
    /// Whether values are generated by the database.
    pub auto_incremented: bool,
    /// Comment recorded in the database.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub remarks: Option<String>,
}

impl Column {
    /// Create a nullable column.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            nullable: true,
            auto_incremented: false,
            remarks: None,
        }
    }

    /// Disallow NULL.
    pub fn not_null(mut self) -> Self {
        self.nullable = false;
        self
    }

    /// Mark the column as generated.
    pub fn auto_incremented(mut self) -> Self {
        self.auto_incremented = true;
        self
    }

    /// Set the column comment.
    pub fn with_remarks(mut self, remarks: impl Into<String>) -> Self {
        self.remarks = Some(remarks.into());
        self
    }
}

/// The primary key of a table.
#[derive(Debug, Clone, Serialize)]
pub struct PrimaryKey {
    /// Constraint name.
    pub name: String,
    /// Key columns, in key order.
    pub columns: Vec<String>,
}

/// A table index.
#[derive(Debug, Clone, Serialize)]
pub struct Index {
    /// Index name.
    pub name: String,
    /// Whether the index enforces uniqueness.
    pub unique: bool,
    /// Indexed columns, in index order.
    pub columns: Vec<String>,
}

impl Index {
    /// Create a non-unique index.
    pub fn new(name: impl Into<String>, columns: &[&str]) -> Self {
        Self {
            name: name.into(),
            unique: false,
            columns: to_strings(columns),
        }
    }

    /// Make the index unique.
    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }
}

/// A foreign key from the owning table to `referenced_table`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct ForeignKey {
    /// Constraint name.
    pub name: String,
    /// Referencing columns on the owning table.
    pub columns: Vec<String>,
    /// Full name (`schema.table`) or bare name of the referenced table.
    pub referenced_table: String,
    /// Referenced columns, paired with `columns` by position.
    pub referenced_columns: Vec<String>,
}

impl ForeignKey {
    /// Create a foreign key.
    pub fn new(
        name: impl Into<String>,
        columns: &[&str],
        referenced_table: impl Into<String>,
        referenced_columns: &[&str],
    ) -> Self {
        Self {
            name: name.into(),
            columns: to_strings(columns),
            referenced_table: referenced_table.into(),
            referenced_columns: to_strings(referenced_columns),
        }
    }
}

/// Whether a routine returns a value.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RoutineKind {
    /// A stored procedure.
    #[default]
    Procedure,
    /// A function with a return type.
    Function,
}

impl fmt::Display for RoutineKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Procedure => write!(f, "PROCEDURE"),
            Self::Function => write!(f, "FUNCTION"),
        }
    }
}

/// A stored procedure or function.
#[derive(Debug, Clone, Default, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct Routine {
    /// Owning schema.
    pub schema: String,
    /// Bare routine name.
    pub name: String,
    /// Procedure or function.
    pub kind: RoutineKind,
    /// Return type of a function.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub return_type: Option<String>,
    /// Parameters in declaration order.
    pub parameters: Vec<RoutineParameter>,
}

impl Routine {
    /// Create a procedure with no parameters.
    pub fn procedure(schema: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            schema: schema.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    /// Create a function with no parameters.
    pub fn function(
        schema: impl Into<String>,
        name: impl Into<String>,
        return_type: impl Into<String>,
    ) -> Self {
        Self {
            kind: RoutineKind::Function,
            return_type: Some(return_type.into()),
            ..Self::procedure(schema, name)
        }
    }

    /// Append a parameter.
    pub fn with_parameter(
        mut self,
        name: impl Into<String>,
        data_type: impl Into<String>,
        mode: impl Into<String>,
    ) -> Self {
        self.parameters.push(RoutineParameter {
            name: name.into(),
            data_type: data_type.into(),
            mode: mode.into(),
        });
        self
    }

    /// `schema.routine`, or the bare name when the schema is blank.
    pub fn full_name(&self) -> String {
        qualify(&self.schema, &self.name)
    }
}

/// One routine parameter.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "kebab-case")]
pub struct RoutineParameter {
    /// Parameter name.
    pub name: String,
    /// Database type.
    pub data_type: String,
    /// IN, OUT or INOUT.
    pub mode: String,
}

fn qualify(schema: &str, name: &str) -> String {
    if schema.is_empty() {
        name.to_string()
    } else {
        format!("{}.{}", schema, name)
    }
}

fn to_strings(values: &[&str]) -> Vec<String> {
    values.iter().map(|v| v.to_string()).collect()
}
