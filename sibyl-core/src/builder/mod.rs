//! Statement builders

pub mod common;
pub mod delete;
pub mod insert;
pub mod update;
pub mod upsert;

// Re-export types from submodules
pub use common::{row_limit_clause, QueryBuilder, WhereClause};
pub use delete::DeleteBuilder;
pub use insert::{column_union, BulkInsertBuilder, InsertBuilder};
pub use update::UpdateBuilder;
pub use upsert::{MergeBuilder, UpsertBuilder};
