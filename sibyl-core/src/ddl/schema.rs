//! Schema DDL
//!
//! A schema in this dialect is a database user, so creating one means creating
//! the principal and granting it what it needs to own objects.

use crate::builder::QueryBuilder;
use crate::procedural::{DynamicStatement, ExistenceCheck, ProceduralBlock, Step};
use crate::quote::quote_name;
use crate::{GeneratorConfig, Result};

/// Privileges granted to every new schema principal, in grant order
pub const SCHEMA_PRIVILEGES: [&str; 8] = [
    "CREATE SESSION",
    "CREATE TABLE",
    "CREATE VIEW",
    "CREATE ANY TRIGGER",
    "CREATE ANY PROCEDURE",
    "CREATE SEQUENCE",
    "CREATE SYNONYM",
    "UNLIMITED TABLESPACE",
];

fn user_exists(name: &str) -> ExistenceCheck {
    ExistenceCheck::new("ALL_USERS").filter("USERNAME", name)
}

/// Create a schema principal unless one with that name exists
#[derive(Debug, Clone)]
pub struct CreateSchemaBuilder<'a> {
    config: &'a GeneratorConfig,
    name: &'a str,
}

impl<'a> CreateSchemaBuilder<'a> {
    pub fn new(config: &'a GeneratorConfig, name: &'a str) -> Self {
        Self { config, name }
    }

    pub fn block(&self) -> Result<ProceduralBlock> {
        let user = quote_name("schema", self.name)?;
        let password = quote_name("password", &self.config.schema_password)?;

        let mut statements = vec![DynamicStatement::ExecuteImmediate(format!(
            "CREATE USER {} IDENTIFIED BY {}",
            user, password
        ))];
        statements.extend(
            SCHEMA_PRIVILEGES
                .iter()
                .map(|privilege| {
                    DynamicStatement::ExecuteImmediate(format!("GRANT {} TO {}", privilege, user))
                }),
        );

        Ok(ProceduralBlock::new()
            .step(Step::CountInto(user_exists(self.name)))
            .step(Step::IfCount {
                count: 0,
                then: statements,
            }))
    }
}

impl QueryBuilder for CreateSchemaBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        self.block()?.to_sql()
    }
}

/// Drop a schema principal and everything it owns, if it exists
#[derive(Debug, Clone)]
pub struct DropSchemaBuilder<'a> {
    name: &'a str,
}

impl<'a> DropSchemaBuilder<'a> {
    pub fn new(name: &'a str) -> Self {
        Self { name }
    }

    pub fn block(&self) -> Result<ProceduralBlock> {
        let user = quote_name("schema", self.name)?;
        Ok(ProceduralBlock::new()
            .step(Step::CountInto(user_exists(self.name)))
            .step(Step::IfCount {
                count: 1,
                then: vec![DynamicStatement::ExecuteImmediate(format!(
                    "DROP USER {} CASCADE",
                    user
                ))],
            }))
    }
}

impl QueryBuilder for DropSchemaBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        self.block()?.to_sql()
    }
}
