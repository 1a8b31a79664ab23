//! Read-only database schema model handed to functions by the host.
//!
//! The schema crawler that produces a [`Catalog`] lives outside this crate.
//! Functions only ever read from it; a live [`Connection`] is injected
//! separately for the few functions that need one.
//!
//! # Example
//!
//! ```
//! use schemachat::catalog::{Catalog, Column, ForeignKey, Schema, Table};
//!
//! let catalog = Catalog::new().with_schema(
//!     Schema::new("PUBLIC")
//!         .with_table(
//!             Table::new("PUBLIC", "AUTHORS")
//!                 .with_column(Column::new("ID", "INTEGER").not_null())
//!                 .with_primary_key(&["ID"]),
//!         )
//!         .with_table(
//!             Table::new("PUBLIC", "BOOKS")
//!                 .with_column(Column::new("ID", "INTEGER").not_null())
//!                 .with_column(Column::new("AUTHOR_ID", "INTEGER"))
//!                 .with_foreign_key(ForeignKey::new(
//!                     "FK_BOOKS_AUTHORS",
//!                     &["AUTHOR_ID"],
//!                     "PUBLIC.AUTHORS",
//!                     &["ID"],
//!                 )),
//!         ),
//! );
//!
//! assert_eq!(catalog.tables().count(), 2);
//! assert!(catalog.find_table("books").is_some());
//! ```

mod connection;
mod model;

pub use connection::{Connection, ServerInformation};
pub use model::{
    name_pattern, Catalog, Column, ForeignKey, Index, PrimaryKey, Routine, RoutineKind,
    RoutineParameter, Schema, Table, TableKind,
};
