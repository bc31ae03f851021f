//! Sibyl Core - SQL statement generation for an Oracle-family dialect
//!
//! This crate turns structural descriptions (tables, attribute definitions,
//! row values, pre-compiled predicates, transaction descriptors) into SQL
//! text. It performs no I/O: the generated text is handed to whatever driver
//! the caller uses.
//!
//! ```
//! use sibyl_core::{AttributeDefinition, Attributes, TableReference};
//!
//! let mut attributes = Attributes::new();
//! attributes.insert("id".into(), AttributeDefinition::new("NUMBER(10)").primary_key());
//! attributes.insert("done".into(), AttributeDefinition::new("NUMBER(1)").default_value(false));
//!
//! let sql = sibyl_core::generator()
//!     .create_table_query(&TableReference::new("tasks"), &attributes)
//!     .unwrap();
//! assert_eq!(
//!     sql,
//!     "CREATE TABLE \"tasks\" (\"id\" NUMBER(10) PRIMARY KEY, \"done\" NUMBER(1) DEFAULT 0)"
//! );
//! ```

pub mod action;
pub mod builder;
pub mod ddl;
pub mod error;
pub mod escape;
pub mod generator;
pub mod introspection;
pub mod model;
pub mod options;
pub mod procedural;
pub mod quote;
pub mod template;
pub mod transaction;
pub mod value;

// Re-export main types
pub use action::ReferentialAction;
pub use builder::{QueryBuilder, WhereClause};
pub use error::{Error, Result};
pub use generator::QueryGenerator;
pub use model::{
    AttributeDefinition, Attributes, DefaultValue, References, RowValues, SemanticType,
    TableReference, Transaction,
};
pub use options::{GeneratorConfig, QueryOptions};
pub use transaction::IsolationLevel;
pub use value::Value;

/// Create a generator with the default configuration
pub fn generator() -> QueryGenerator {
    QueryGenerator::default()
}
