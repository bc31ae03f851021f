//! The statement generator facade
//!
//! [`QueryGenerator`] owns the read-only [`GeneratorConfig`] and exposes one
//! method per statement kind. Every generated statement is logged at `debug`
//! level under the `sibyl::query` target.

use indexmap::IndexMap;

use crate::builder::{
    row_limit_clause, BulkInsertBuilder, DeleteBuilder, InsertBuilder, MergeBuilder,
    QueryBuilder, UpdateBuilder, UpsertBuilder, WhereClause,
};
use crate::ddl::{
    attributes_to_sql, auto_increment_fields, AddColumnBuilder, CreateSchemaBuilder,
    CreateTableBuilder, DropSchemaBuilder, DropTableBuilder, IndexTarget, RemoveColumnBuilder,
    RemoveIndexBuilder, RenameColumnBuilder,
};
use crate::transaction::{self, IsolationLevel};
use crate::{
    escape, introspection, quote, AttributeDefinition, Attributes, GeneratorConfig,
    QueryOptions, Result, RowValues, TableReference, Transaction, Value,
};

const LOG_TARGET: &str = "sibyl::query";

fn logged(kind: &'static str, sql: Result<String>) -> Result<String> {
    match &sql {
        Ok(text) => tracing::debug!(target: LOG_TARGET, kind, sql = %text, "generated statement"),
        Err(err) => tracing::debug!(target: LOG_TARGET, kind, error = %err, "statement rejected"),
    }
    sql
}

fn logged_text(kind: &'static str, sql: String) -> String {
    tracing::debug!(target: LOG_TARGET, kind, sql = %sql, "generated statement");
    sql
}

fn fixed(kind: &'static str, sql: &'static str) -> String {
    tracing::debug!(target: LOG_TARGET, kind, sql, "generated statement");
    sql.to_string()
}

/// Stateless SQL statement generator
///
/// Cheap to clone and safe to share between threads; every method is a pure
/// function of its arguments and the configuration.
///
/// # Examples
/// ```
/// use sibyl_core::{QueryGenerator, QueryOptions, RowValues, TableReference, Value};
///
/// let generator = QueryGenerator::default();
/// let mut values = RowValues::new();
/// values.insert("name".into(), Value::from("Ann"));
///
/// let sql = generator
///     .insert_query(&TableReference::new("users"), &values, &QueryOptions::new(), None)
///     .unwrap();
/// assert_eq!(sql, "INSERT INTO \"users\" (\"name\") VALUES ('Ann');");
/// ```
#[derive(Debug, Clone, Default)]
pub struct QueryGenerator {
    config: GeneratorConfig,
}

impl QueryGenerator {
    pub fn new(config: GeneratorConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Quote an identifier
    pub fn quote_identifier(&self, identifier: &str) -> String {
        quote::quote_identifier(identifier)
    }

    /// Render a value as a literal
    pub fn escape(&self, value: &Value) -> String {
        escape::escape(value, None)
    }

    // Schemas

    pub fn create_schema(&self, name: &str) -> Result<String> {
        logged(
            "create_schema",
            CreateSchemaBuilder::new(&self.config, name).to_sql(),
        )
    }

    pub fn drop_schema(&self, name: &str) -> Result<String> {
        logged("drop_schema", DropSchemaBuilder::new(name).to_sql())
    }

    pub fn show_schemas_query(&self) -> String {
        fixed("show_schemas", introspection::SHOW_SCHEMAS)
    }

    pub fn version_query(&self) -> String {
        fixed("version", introspection::VERSION)
    }

    // Tables and columns

    pub fn create_table_query(
        &self,
        table: &TableReference,
        attributes: &Attributes,
    ) -> Result<String> {
        logged(
            "create_table",
            CreateTableBuilder::new(&self.config, table, attributes).to_sql(),
        )
    }

    pub fn drop_table_query(&self, table: &TableReference) -> Result<String> {
        logged("drop_table", DropTableBuilder::new(table).to_sql())
    }

    pub fn show_tables_query(&self) -> String {
        fixed("show_tables", introspection::SHOW_TABLES)
    }

    pub fn describe_table_query(&self, table: &TableReference) -> Result<String> {
        logged("describe_table", introspection::describe_table(table))
    }

    pub fn get_foreign_keys_query(&self, table: &TableReference) -> Result<String> {
        logged("foreign_keys", introspection::foreign_keys(table))
    }

    pub fn add_column_query(
        &self,
        table: &TableReference,
        attribute: &str,
        definition: &AttributeDefinition,
    ) -> Result<String> {
        logged(
            "add_column",
            AddColumnBuilder::new(&self.config, table, attribute, definition).to_sql(),
        )
    }

    pub fn remove_column_query(&self, table: &TableReference, column: &str) -> Result<String> {
        logged(
            "remove_column",
            RemoveColumnBuilder::new(table, column).to_sql(),
        )
    }

    pub fn rename_column_query(
        &self,
        table: &TableReference,
        before: &str,
        after: &str,
    ) -> Result<String> {
        logged(
            "rename_column",
            RenameColumnBuilder::new(table, before, after).to_sql(),
        )
    }

    /// Column definition fragments keyed by column name, without the names
    pub fn to_column_fragments(&self, attributes: &Attributes) -> Result<IndexMap<String, String>> {
        let definitions = match attributes_to_sql(attributes, &self.config) {
            Ok(definitions) => definitions,
            Err(err) => {
                tracing::debug!(
                    target: LOG_TARGET,
                    kind = "column_definition",
                    error = %err,
                    "statement rejected"
                );
                return Err(err);
            }
        };
        Ok(definitions
            .into_iter()
            .map(|(column, definition)| {
                let fragment = definition.normalize_boolean_defaults().to_string();
                tracing::debug!(
                    target: LOG_TARGET,
                    kind = "column_definition",
                    column = %column,
                    sql = %fragment,
                    "generated statement"
                );
                (column, fragment)
            })
            .collect())
    }

    pub fn auto_increment_fields<'a>(&self, attributes: &'a Attributes) -> Vec<&'a str> {
        auto_increment_fields(attributes)
    }

    // Indexes

    pub fn show_indexes_query(&self, table: &TableReference) -> Result<String> {
        logged("show_indexes", introspection::show_indexes(table))
    }

    pub fn remove_index_query(
        &self,
        table: &TableReference,
        index: impl Into<IndexTarget>,
    ) -> Result<String> {
        let target = index.into();
        logged(
            "remove_index",
            RemoveIndexBuilder::new(table, &target).to_sql(),
        )
    }

    // Data manipulation

    pub fn insert_query(
        &self,
        table: &TableReference,
        values: &RowValues,
        options: &QueryOptions,
        attributes: Option<&Attributes>,
    ) -> Result<String> {
        let mut builder =
            InsertBuilder::new(table, values).ignore_duplicates(options.ignore_duplicates);
        if let Some(attributes) = attributes {
            builder = builder.attributes(attributes);
        }
        logged("insert", builder.to_sql())
    }

    pub fn bulk_insert_query(
        &self,
        table: &TableReference,
        rows: &[RowValues],
        options: &QueryOptions,
        attributes: Option<&Attributes>,
    ) -> Result<String> {
        let mut builder =
            BulkInsertBuilder::new(table, rows).ignore_duplicates(options.ignore_duplicates);
        if let Some(attributes) = attributes {
            builder = builder.attributes(attributes);
        }
        logged("bulk_insert", builder.to_sql())
    }

    pub fn update_query(
        &self,
        table: &TableReference,
        values: &RowValues,
        where_clause: &WhereClause,
        options: &QueryOptions,
        attributes: Option<&Attributes>,
    ) -> Result<String> {
        let mut builder = UpdateBuilder::new(&self.config, table, values, where_clause, options);
        if let Some(attributes) = attributes {
            builder = builder.attributes(attributes);
        }
        logged("update", builder.to_sql())
    }

    pub fn delete_query(&self, table: &TableReference, where_clause: &WhereClause) -> Result<String> {
        logged("delete", DeleteBuilder::new(table, where_clause).to_sql())
    }

    /// Insert-or-ignore followed by an update, as two statements in one
    /// string. Not atomic; see [`QueryGenerator::merge_upsert_query`].
    pub fn upsert_query(
        &self,
        table: &TableReference,
        insert_values: &RowValues,
        update_values: &RowValues,
        where_clause: &WhereClause,
        options: &QueryOptions,
        attributes: Option<&Attributes>,
    ) -> Result<String> {
        let mut builder = UpsertBuilder::new(
            &self.config,
            table,
            insert_values,
            update_values,
            where_clause,
            options,
        );
        if let Some(attributes) = attributes {
            builder = builder.attributes(attributes);
        }
        logged("upsert", builder.to_sql())
    }

    /// Single-statement `MERGE` upsert
    pub fn merge_upsert_query(
        &self,
        table: &TableReference,
        insert_values: &RowValues,
        update_values: &RowValues,
        where_clause: &WhereClause,
        options: &QueryOptions,
        attributes: Option<&Attributes>,
    ) -> Result<String> {
        let mut builder = MergeBuilder::new(
            &self.config,
            table,
            insert_values,
            update_values,
            where_clause,
            options,
        );
        if let Some(attributes) = attributes {
            builder = builder.attributes(attributes);
        }
        logged("merge_upsert", builder.to_sql())
    }

    /// Row-limiting suffix for a query
    pub fn add_limit_and_offset(&self, limit: Option<u64>, offset: Option<u64>) -> String {
        row_limit_clause(limit, offset)
    }

    // Transactions

    pub fn start_transaction_query(
        &self,
        transaction: &Transaction,
        options: &QueryOptions,
    ) -> Result<String> {
        logged(
            "start_transaction",
            transaction::start_transaction(transaction, options),
        )
    }

    /// Isolation statement for a level given by name, such as
    /// `READ_COMMITTED`
    pub fn set_isolation_level_query(&self, level: &str) -> Result<String> {
        logged(
            "set_isolation_level",
            transaction::isolation_level_statement(level).map(str::to_string),
        )
    }

    pub fn isolation_level_query(&self, level: IsolationLevel) -> String {
        fixed("set_isolation_level", level.statement())
    }

    pub fn set_autocommit_query(&self) -> String {
        fixed("set_autocommit", transaction::SET_AUTOCOMMIT)
    }

    pub fn commit_transaction_query(&self, options: &QueryOptions) -> String {
        logged_text("commit_transaction", transaction::commit_transaction(options))
    }

    pub fn rollback_transaction_query(
        &self,
        transaction: &Transaction,
        options: &QueryOptions,
    ) -> Result<String> {
        logged(
            "rollback_transaction",
            transaction::rollback_transaction(transaction, options),
        )
    }
}
