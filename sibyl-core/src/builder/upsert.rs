//! Upsert builders
//!
//! [`UpsertBuilder`] is the default: an `INSERT OR IGNORE` followed by an
//! independent `UPDATE` on the same predicate. The two statements are not
//! atomic, and concurrent writers can interleave between them.
//! [`MergeBuilder`] is the opt-in single-statement alternative.

use super::common::{QueryBuilder, WhereClause};
use super::insert::{column_list, value_list, InsertBuilder};
use super::update::{assignments, UpdateBuilder};
use crate::quote::quote_table;
use crate::template::{render, Bindings};
use crate::{
    Attributes, Error, GeneratorConfig, QueryOptions, Result, RowValues, TableReference,
};

const MERGE: &str = "MERGE INTO {table} USING DUAL ON ({condition}){matched} \
WHEN NOT MATCHED THEN INSERT ({columns}) VALUES ({values})";
const WHEN_MATCHED: &str = " WHEN MATCHED THEN UPDATE SET {assignments}";

/// Insert-then-update upsert (two statements)
#[derive(Debug, Clone)]
pub struct UpsertBuilder<'a> {
    config: &'a GeneratorConfig,
    table: &'a TableReference,
    insert_values: &'a RowValues,
    update_values: &'a RowValues,
    where_clause: &'a WhereClause,
    options: &'a QueryOptions,
    attributes: Option<&'a Attributes>,
}

impl<'a> UpsertBuilder<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        table: &'a TableReference,
        insert_values: &'a RowValues,
        update_values: &'a RowValues,
        where_clause: &'a WhereClause,
        options: &'a QueryOptions,
    ) -> Self {
        Self {
            config,
            table,
            insert_values,
            update_values,
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

impl QueryBuilder for UpsertBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        let mut insert =
            InsertBuilder::new(self.table, self.insert_values).ignore_duplicates(true);
        let mut update = UpdateBuilder::new(
            self.config,
            self.table,
            self.update_values,
            self.where_clause,
            self.options,
        );
        if let Some(attributes) = self.attributes {
            insert = insert.attributes(attributes);
            update = update.attributes(attributes);
        }

        Ok(format!("{} {}", insert.to_sql()?, update.to_sql()?))
    }
}

/// Single `MERGE` statement upsert.
///
/// The match condition is the caller's predicate. Columns referenced by the
/// condition must not appear in the update values; the database rejects
/// updating them inside a MERGE.
#[derive(Debug, Clone)]
pub struct MergeBuilder<'a> {
    config: &'a GeneratorConfig,
    table: &'a TableReference,
    insert_values: &'a RowValues,
    update_values: &'a RowValues,
    where_clause: &'a WhereClause,
    options: &'a QueryOptions,
    attributes: Option<&'a Attributes>,
}

impl<'a> MergeBuilder<'a> {
    pub fn new(
        config: &'a GeneratorConfig,
        table: &'a TableReference,
        insert_values: &'a RowValues,
        update_values: &'a RowValues,
        where_clause: &'a WhereClause,
        options: &'a QueryOptions,
    ) -> Self {
        Self {
            config,
            table,
            insert_values,
            update_values,
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

impl QueryBuilder for MergeBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        let condition = self
            .where_clause
            .as_sql()
            .ok_or_else(|| Error::invalid_query("MERGE requires a match condition"))?;

        if self.insert_values.is_empty() {
            return Err(Error::invalid_query("MERGE requires insert values"));
        }

        let updates = assignments(
            self.update_values,
            self.options.omits_null(self.config),
            self.attributes,
        )?;
        let matched = if updates.is_empty() {
            String::new()
        } else {
            render(
                WHEN_MATCHED,
                &Bindings::new().bind("assignments", updates.join(",")),
            )?
        };

        render(
            MERGE,
            &Bindings::new()
                .bind("table", quote_table(self.table)?)
                .bind("condition", condition)
                .bind("matched", matched)
                .bind(
                    "columns",
                    column_list(self.insert_values.keys().map(String::as_str))?,
                )
                .bind("values", value_list(self.insert_values, self.attributes)),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Value;

    fn values(pairs: &[(&str, Value)]) -> RowValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_upsert_is_insert_ignore_then_update() {
        let config = GeneratorConfig::default();
        let table = TableReference::new("users");
        let insert = values(&[("id", 1.into()), ("name", "Ann".into())]);
        let update = values(&[("name", "Ann".into())]);
        let where_clause = WhereClause::compiled("\"id\" = 1");
        let options = QueryOptions::new();

        let sql = UpsertBuilder::new(&config, &table, &insert, &update, &where_clause, &options)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "INSERT OR IGNORE INTO \"users\" (\"id\",\"name\") VALUES (1,'Ann'); \
UPDATE \"users\" SET \"name\"='Ann' WHERE \"id\" = 1"
        );
    }

    #[test]
    fn test_merge_upsert() {
        let config = GeneratorConfig::default();
        let table = TableReference::new("users");
        let insert = values(&[("id", 1.into()), ("name", "Ann".into())]);
        let update = values(&[("name", "Ann".into())]);
        let where_clause = WhereClause::compiled("\"id\" = 1");
        let options = QueryOptions::new();

        let sql = MergeBuilder::new(&config, &table, &insert, &update, &where_clause, &options)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "MERGE INTO \"users\" USING DUAL ON (\"id\" = 1) \
WHEN MATCHED THEN UPDATE SET \"name\"='Ann' \
WHEN NOT MATCHED THEN INSERT (\"id\",\"name\") VALUES (1,'Ann')"
        );
    }

    #[test]
    fn test_merge_without_updates_only_inserts() {
        let config = GeneratorConfig::default();
        let table = TableReference::new("users");
        let insert = values(&[("id", 1.into())]);
        let update = RowValues::new();
        let where_clause = WhereClause::compiled("\"id\" = 1");
        let options = QueryOptions::new();

        let sql = MergeBuilder::new(&config, &table, &insert, &update, &where_clause, &options)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "MERGE INTO \"users\" USING DUAL ON (\"id\" = 1) \
WHEN NOT MATCHED THEN INSERT (\"id\") VALUES (1)"
        );
    }

    #[test]
    fn test_merge_requires_condition() {
        let config = GeneratorConfig::default();
        let table = TableReference::new("users");
        let insert = values(&[("id", 1.into())]);
        let where_clause = WhereClause::none();
        let options = QueryOptions::new();

        let result =
            MergeBuilder::new(&config, &table, &insert, &insert, &where_clause, &options).to_sql();
        assert!(matches!(result, Err(Error::InvalidQuery { .. })));
    }
}
