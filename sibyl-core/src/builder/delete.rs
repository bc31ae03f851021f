//! DELETE statement builder

use super::common::{QueryBuilder, WhereClause};
use crate::quote::quote_table;
use crate::template::{render, Bindings};
use crate::{Result, TableReference};

const DELETE: &str = "DELETE FROM {table}{where}";

/// DELETE statement builder
#[derive(Debug, Clone)]
pub struct DeleteBuilder<'a> {
    table: &'a TableReference,
    where_clause: &'a WhereClause,
}

impl<'a> DeleteBuilder<'a> {
    pub fn new(table: &'a TableReference, where_clause: &'a WhereClause) -> Self {
        Self {
            table,
            where_clause,
        }
    }
}

impl QueryBuilder for DeleteBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        let where_sql = match self.where_clause.as_sql() {
            Some(predicate) => format!(" WHERE {}", predicate),
            None => String::new(),
        };

        render(
            DELETE,
            &Bindings::new()
                .bind("table", quote_table(self.table)?)
                .bind("where", where_sql),
        )
    }
}
