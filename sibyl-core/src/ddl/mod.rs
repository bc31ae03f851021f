//! Schema definition statements

pub mod columns;
pub mod index;
pub mod schema;
pub mod table;

pub use columns::{
    attributes_to_sql, auto_increment_fields, column_definition, ColumnClause, ColumnDefinition,
};
pub use index::{IndexTarget, RemoveIndexBuilder};
pub use schema::{CreateSchemaBuilder, DropSchemaBuilder, SCHEMA_PRIVILEGES};
pub use table::{
    AddColumnBuilder, CreateTableBuilder, DropTableBuilder, RemoveColumnBuilder,
    RenameColumnBuilder,
};
