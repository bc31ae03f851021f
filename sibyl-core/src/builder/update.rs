//! UPDATE statement builder

use super::common::{QueryBuilder, WhereClause};
use crate::escape::escape;
use crate::quote::{quote_name, quote_table};
use crate::template::{render, Bindings};
use crate::{Attributes, GeneratorConfig, QueryOptions, Result, RowValues, TableReference};

const UPDATE: &str = "UPDATE {table} SET {values} {where}";

/// Columns named `...Id` keep explicit nulls even when nulls are omitted,
/// so foreign keys can still be cleared.
fn keeps_null(column: &str) -> bool {
    column.ends_with("Id")
}

/// `"col"=<literal>` pairs, dropping nulls when `omit_null` is set
pub(crate) fn assignments(
    values: &RowValues,
    omit_null: bool,
    attributes: Option<&Attributes>,
) -> Result<Vec<String>> {
    values
        .iter()
        .filter(|(column, value)| !omit_null || !value.is_null() || keeps_null(column))
        .map(|(column, value)| {
            let hint = attributes.and_then(|a| a.get(column));
            Ok(format!(
                "{}={}",
                quote_name("column", column)?,
                escape(value, hint)
            ))
        })
        .collect()
}

/// UPDATE statement builder
///
/// An empty SET list is rendered as-is; callers decide whether that is an
/// error.
#[derive(Debug, Clone)]
pub struct UpdateBuilder<'a> {
    config: &'a GeneratorConfig,
    table: &'a TableReference,
    values: &'a RowValues,
    where_clause: &'a WhereClause,
    options: &'a QueryOptions,
    attributes: Option<&'a Attributes>,
}

impl<'a> UpdateBuilder<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        table: &'a TableReference,
        values: &'a RowValues,
        where_clause: &'a WhereClause,
        options: &'a QueryOptions,
    ) -> Self {
        Self {
            config,
            table,
            values,
            where_clause,
            options,
            attributes: None,
        }
    }

    /// Column definitions used as escaping hints
    pub fn attributes(mut self, attributes: &'a Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

impl QueryBuilder for UpdateBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        let values = assignments(
            self.values,
            self.options.omits_null(self.config),
            self.attributes,
        )?;

        let sql = render(
            UPDATE,
            &Bindings::new()
                .bind("table", quote_table(self.table)?)
                .bind("values", values.join(","))
                .bind("where", self.where_clause.keyword_clause()),
        )?;

        Ok(sql.trim_end().to_string())
    }
}
