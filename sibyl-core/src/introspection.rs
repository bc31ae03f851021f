//! Catalog queries
//!
//! Catalog views store names as column values, so table and schema names are
//! compared as escaped string literals.

use crate::escape::escape_string;
use crate::template::{render, Bindings};
use crate::{Error, Result, TableReference};

pub const SHOW_SCHEMAS: &str = "SELECT USERNAME FROM ALL_USERS";
pub const SHOW_TABLES: &str = "SELECT TABLE_NAME FROM USER_TABLES";
pub const VERSION: &str = "SELECT VERSION FROM PRODUCT_COMPONENT_VERSION GROUP BY VERSION";

const SHOW_INDEXES: &str = "SELECT INDEX_NAME FROM USER_INDEXES WHERE TABLE_NAME = {table}";
const SHOW_SCHEMA_INDEXES: &str =
    "SELECT INDEX_NAME FROM ALL_INDEXES WHERE TABLE_OWNER = {owner} AND TABLE_NAME = {table}";

const DESCRIBE_COLUMNS: &str = "COLUMN_NAME, DATA_TYPE, DATA_LENGTH, DATA_PRECISION, DATA_SCALE, \
NULLABLE, DATA_DEFAULT";
const DESCRIBE_TABLE: &str =
    "SELECT {columns} FROM USER_TAB_COLUMNS WHERE TABLE_NAME = {table} ORDER BY COLUMN_ID";
const DESCRIBE_SCHEMA_TABLE: &str = "SELECT {columns} FROM ALL_TAB_COLUMNS \
WHERE OWNER = {owner} AND TABLE_NAME = {table} ORDER BY COLUMN_ID";

const FOREIGN_KEYS: &str = "SELECT c.CONSTRAINT_NAME, cc.COLUMN_NAME, \
r.TABLE_NAME AS REFERENCED_TABLE_NAME, rc.COLUMN_NAME AS REFERENCED_COLUMN_NAME, c.DELETE_RULE \
FROM ALL_CONSTRAINTS c \
JOIN ALL_CONS_COLUMNS cc ON cc.OWNER = c.OWNER AND cc.CONSTRAINT_NAME = c.CONSTRAINT_NAME \
JOIN ALL_CONSTRAINTS r ON r.OWNER = c.R_OWNER AND r.CONSTRAINT_NAME = c.R_CONSTRAINT_NAME \
JOIN ALL_CONS_COLUMNS rc ON rc.OWNER = r.OWNER AND rc.CONSTRAINT_NAME = r.CONSTRAINT_NAME \
AND rc.POSITION = cc.POSITION \
WHERE c.CONSTRAINT_TYPE = 'R' AND c.OWNER = {owner} AND c.TABLE_NAME = {table} \
ORDER BY c.CONSTRAINT_NAME, cc.POSITION";

/// Current user when no schema is given
const CURRENT_OWNER: &str = "USER";

fn table_literal(table: &TableReference) -> Result<String> {
    if table.name.is_empty() {
        return Err(Error::empty_identifier("table"));
    }
    Ok(escape_string(&table.name))
}

fn owner_literal(table: &TableReference) -> Result<Option<String>> {
    match &table.schema {
        Some(schema) if schema.is_empty() => Err(Error::empty_identifier("schema")),
        Some(schema) => Ok(Some(escape_string(schema))),
        None => Ok(None),
    }
}

/// Names of indexes defined on `table`
pub fn show_indexes(table: &TableReference) -> Result<String> {
    let bindings = Bindings::new().bind("table", table_literal(table)?);
    match owner_literal(table)? {
        Some(owner) => render(SHOW_SCHEMA_INDEXES, &bindings.bind("owner", owner)),
        None => render(SHOW_INDEXES, &bindings),
    }
}

/// Column listing of `table` in declaration order
pub fn describe_table(table: &TableReference) -> Result<String> {
    let bindings = Bindings::new()
        .bind("columns", DESCRIBE_COLUMNS)
        .bind("table", table_literal(table)?);
    match owner_literal(table)? {
        Some(owner) => render(DESCRIBE_SCHEMA_TABLE, &bindings.bind("owner", owner)),
        None => render(DESCRIBE_TABLE, &bindings),
    }
}

/// Foreign key constraints declared on `table`
pub fn foreign_keys(table: &TableReference) -> Result<String> {
    let owner = owner_literal(table)?.unwrap_or_else(|| CURRENT_OWNER.to_string());
    render(
        FOREIGN_KEYS,
        &Bindings::new()
            .bind("owner", owner)
            .bind("table", table_literal(table)?),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_show_indexes() {
        assert_eq!(
            show_indexes(&TableReference::new("users")).unwrap(),
            "SELECT INDEX_NAME FROM USER_INDEXES WHERE TABLE_NAME = 'users'"
        );
        assert_eq!(
            show_indexes(&TableReference::new("users").with_schema("app")).unwrap(),
            "SELECT INDEX_NAME FROM ALL_INDEXES WHERE TABLE_OWNER = 'app' AND TABLE_NAME = 'users'"
        );
    }

    #[test]
    fn test_describe_table() {
        assert_eq!(
            describe_table(&TableReference::new("users")).unwrap(),
            "SELECT COLUMN_NAME, DATA_TYPE, DATA_LENGTH, DATA_PRECISION, DATA_SCALE, NULLABLE, \
DATA_DEFAULT FROM USER_TAB_COLUMNS WHERE TABLE_NAME = 'users' ORDER BY COLUMN_ID"
        );

        let sql = describe_table(&TableReference::new("users").with_schema("app")).unwrap();
        assert!(sql.contains("FROM ALL_TAB_COLUMNS WHERE OWNER = 'app' AND TABLE_NAME = 'users'"));
    }

    #[test]
    fn test_foreign_keys() {
        let sql = foreign_keys(&TableReference::new("posts")).unwrap();
        assert!(sql.contains("FROM ALL_CONSTRAINTS c JOIN ALL_CONS_COLUMNS cc"));
        assert!(sql.contains("WHERE c.CONSTRAINT_TYPE = 'R' AND c.OWNER = USER AND c.TABLE_NAME = 'posts'"));

        let sql = foreign_keys(&TableReference::new("posts").with_schema("blog")).unwrap();
        assert!(sql.contains("c.OWNER = 'blog' AND c.TABLE_NAME = 'posts'"));
    }

    #[test]
    fn test_names_are_compared_as_literals() {
        let sql = show_indexes(&TableReference::new("x' OR '1'='1")).unwrap();
        assert_eq!(
            sql,
            "SELECT INDEX_NAME FROM USER_INDEXES WHERE TABLE_NAME = 'x'' OR ''1''=''1'"
        );
    }

    #[test]
    fn test_empty_names_are_rejected() {
        assert!(matches!(
            describe_table(&TableReference::new("")),
            Err(Error::EmptyIdentifier { kind: "table" })
        ));
        assert!(matches!(
            foreign_keys(&TableReference::new("t").with_schema("")),
            Err(Error::EmptyIdentifier { kind: "schema" })
        ));
    }
}
