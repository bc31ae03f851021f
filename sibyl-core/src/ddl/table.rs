//! Table DDL: create, drop and column alterations

use super::columns::{attributes_to_sql, column_definition};
use crate::builder::QueryBuilder;
use crate::procedural::{DynamicStatement, ExistenceCheck, ProceduralBlock, Step};
use crate::quote::{quote_name, quote_table};
use crate::template::{render, Bindings};
use crate::{AttributeDefinition, Attributes, Error, GeneratorConfig, Result, TableReference};

const CREATE_TABLE: &str = "CREATE TABLE {table} ({attributes})";
const DROP_TABLE: &str = "DROP TABLE {table}";
const ADD_COLUMN: &str = "ALTER TABLE {table} ADD {column} {definition};";
const REMOVE_COLUMN: &str = "ALTER TABLE {table} DROP COLUMN {column};";
const RENAME_COLUMN: &str = "ALTER TABLE {table} RENAME COLUMN {before} TO {after};";

/// `CREATE TABLE` with one definition per attribute
#[derive(Debug, Clone)]
pub struct CreateTableBuilder<'a> {
    config: &'a GeneratorConfig,
    table: &'a TableReference,
    attributes: &'a Attributes,
}

impl<'a> CreateTableBuilder<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        table: &'a TableReference,
        attributes: &'a Attributes,
    ) -> Self {
        Self {
            config,
            table,
            attributes,
        }
    }
}

impl QueryBuilder for CreateTableBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        if self.attributes.is_empty() {
            return Err(Error::invalid_query("CREATE TABLE requires at least one column"));
        }

        let columns = attributes_to_sql(self.attributes, self.config)?
            .into_iter()
            .map(|(column, definition)| {
                Ok(format!(
                    "{} {}",
                    quote_name("column", &column)?,
                    definition.normalize_boolean_defaults()
                ))
            })
            .collect::<Result<Vec<_>>>()?
            .join(", ");

        render(
            CREATE_TABLE,
            &Bindings::new()
                .bind("table", quote_table(self.table)?)
                .bind("attributes", columns),
        )
    }
}

/// Drop a table only if the catalog lists it
#[derive(Debug, Clone)]
pub struct DropTableBuilder<'a> {
    table: &'a TableReference,
}

impl<'a> DropTableBuilder<'a> {
    pub fn new(table: &'a TableReference) -> Self {
        Self { table }
    }

    /// The guarded block before rendering
    pub fn block(&self) -> Result<ProceduralBlock> {
        let check = match &self.table.schema {
            Some(schema) => ExistenceCheck::new("ALL_TABLES")
                .filter("OWNER", schema.as_str())
                .filter("TABLE_NAME", self.table.name.as_str()),
            None => ExistenceCheck::new("USER_TABLES").filter("TABLE_NAME", self.table.name.as_str()),
        };
        let drop = render(
            DROP_TABLE,
            &Bindings::new().bind("table", quote_table(self.table)?),
        )?;

        Ok(ProceduralBlock::new()
            .step(Step::CountInto(check))
            .step(Step::IfCount {
                count: 1,
                then: vec![DynamicStatement::DbmsSql(drop)],
            }))
    }
}

impl QueryBuilder for DropTableBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        self.block()?.to_sql()
    }
}

/// `ALTER TABLE ... ADD`
#[derive(Debug, Clone)]
pub struct AddColumnBuilder<'a> {
    config: &'a GeneratorConfig,
    table: &'a TableReference,
    attribute: &'a str,
    definition: &'a AttributeDefinition,
}

impl<'a> AddColumnBuilder<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        table: &'a TableReference,
        attribute: &'a str,
        definition: &'a AttributeDefinition,
    ) -> Self {
        Self {
            config,
            table,
            attribute,
            definition,
        }
    }
}

impl QueryBuilder for AddColumnBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        let (column, definition) = column_definition(self.attribute, self.definition, self.config)?;

        render(
            ADD_COLUMN,
            &Bindings::new()
                .bind("table", quote_table(self.table)?)
                .bind("column", quote_name("column", &column)?)
                .bind(
                    "definition",
                    definition.normalize_boolean_defaults().to_string(),
                ),
        )
    }
}

/// `ALTER TABLE ... DROP COLUMN`
#[derive(Debug, Clone)]
pub struct RemoveColumnBuilder<'a> {
    table: &'a TableReference,
    column: &'a str,
}

impl<'a> RemoveColumnBuilder<'a> {
    pub fn new(table: &'a TableReference, column: &'a str) -> Self {
        Self { table, column }
    }
}

impl QueryBuilder for RemoveColumnBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        render(
            REMOVE_COLUMN,
            &Bindings::new()
                .bind("table", quote_table(self.table)?)
                .bind("column", quote_name("column", self.column)?),
        )
    }
}

/// `ALTER TABLE ... RENAME COLUMN`
#[derive(Debug, Clone)]
pub struct RenameColumnBuilder<'a> {
    table: &'a TableReference,
    before: &'a str,
    after: &'a str,
}

impl<'a> RenameColumnBuilder<'a> {
    pub fn new(table: &'a TableReference, before: &'a str, after: &'a str) -> Self {
        Self {
            table,
            before,
            after,
        }
    }
}

impl QueryBuilder for RenameColumnBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        render(
            RENAME_COLUMN,
            &Bindings::new()
                .bind("table", quote_table(self.table)?)
                .bind("before", quote_name("column", self.before)?)
                .bind("after", quote_name("column", self.after)?),
        )
    }
}
