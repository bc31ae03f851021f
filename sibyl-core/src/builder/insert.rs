//! INSERT statement builders

use indexmap::IndexSet;

use super::common::QueryBuilder;
use crate::escape::{escape, escape_slot};
use crate::quote::{quote_name, quote_table};
use crate::template::{render, Bindings};
use crate::{Attributes, Error, Result, RowValues, TableReference};

const INSERT: &str = "INSERT{ignore} INTO {table} ({columns}) VALUES ({values});";
const INSERT_DEFAULTS: &str = "INSERT{ignore} INTO {table} DEFAULT VALUES;";
const BULK_INSERT: &str = "INSERT{ignore} INTO {table} ({columns}) VALUES {tuples};";

/// Modifier placed right after `INSERT` when duplicates are ignored
const IGNORE_MODIFIER: &str = " OR IGNORE";

fn ignore_modifier(ignore: bool) -> &'static str {
    if ignore {
        IGNORE_MODIFIER
    } else {
        ""
    }
}

pub(crate) fn column_list<'a, I>(columns: I) -> Result<String>
where
    I: IntoIterator<Item = &'a str>,
{
    Ok(columns
        .into_iter()
        .map(|column| quote_name("column", column))
        .collect::<Result<Vec<_>>>()?
        .join(","))
}

pub(crate) fn value_list(values: &RowValues, attributes: Option<&Attributes>) -> String {
    values
        .iter()
        .map(|(column, value)| escape(value, attributes.and_then(|a| a.get(column))))
        .collect::<Vec<_>>()
        .join(",")
}

/// Union of the keys of all rows, in the order they are first seen
///
/// # Examples
/// ```
/// use sibyl_core::{builder::column_union, RowValues, Value};
///
/// let mut first = RowValues::new();
/// first.insert("b".into(), Value::I32(1));
/// let mut second = RowValues::new();
/// second.insert("a".into(), Value::I32(2));
/// second.insert("b".into(), Value::I32(3));
///
/// assert_eq!(column_union(&[first, second]), vec!["b", "a"]);
/// ```
pub fn column_union(rows: &[RowValues]) -> Vec<&str> {
    let mut columns: IndexSet<&str> = IndexSet::new();
    for row in rows {
        columns.extend(row.keys().map(String::as_str));
    }
    columns.into_iter().collect()
}

/// Single-row INSERT
#[derive(Debug, Clone)]
pub struct InsertBuilder<'a> {
    table: &'a TableReference,
    values: &'a RowValues,
    attributes: Option<&'a Attributes>,
    ignore_duplicates: bool,
}

impl<'a> InsertBuilder<'a> {
    pub fn new(table: &'a TableReference, values: &'a RowValues) -> Self {
        Self {
            table,
            values,
            attributes: None,
            ignore_duplicates: false,
        }
    }

    /// Emit the `OR IGNORE` modifier
    pub fn ignore_duplicates(mut self, ignore: bool) -> Self {
        self.ignore_duplicates = ignore;
        self
    }

    /// Column definitions used as escaping hints
    pub fn attributes(mut self, attributes: &'a Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

impl QueryBuilder for InsertBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        let bindings = Bindings::new()
            .bind("ignore", ignore_modifier(self.ignore_duplicates))
            .bind("table", quote_table(self.table)?);

        if self.values.is_empty() {
            return render(INSERT_DEFAULTS, &bindings);
        }

        render(
            INSERT,
            &bindings
                .bind("columns", column_list(self.values.keys().map(String::as_str))?)
                .bind("values", value_list(self.values, self.attributes)),
        )
    }
}

/// Multi-row INSERT
///
/// The column list is the union of all row keys in first-seen order; a row
/// without one of those keys gets `NULL` in that slot.
#[derive(Debug, Clone)]
pub struct BulkInsertBuilder<'a> {
    table: &'a TableReference,
    rows: &'a [RowValues],
    attributes: Option<&'a Attributes>,
    ignore_duplicates: bool,
}

impl<'a> BulkInsertBuilder<'a> {
    pub fn new(table: &'a TableReference, rows: &'a [RowValues]) -> Self {
        Self {
            table,
            rows,
            attributes: None,
            ignore_duplicates: false,
        }
    }

    /// Emit the `OR IGNORE` modifier
    pub fn ignore_duplicates(mut self, ignore: bool) -> Self {
        self.ignore_duplicates = ignore;
        self
    }

    /// Column definitions used as escaping hints
    pub fn attributes(mut self, attributes: &'a Attributes) -> Self {
        self.attributes = Some(attributes);
        self
    }
}

impl QueryBuilder for BulkInsertBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        if self.rows.is_empty() {
            return Err(Error::invalid_query("bulk INSERT requires at least one row"));
        }

        let columns = column_union(self.rows);
        if columns.is_empty() {
            return Err(Error::invalid_query(
                "bulk INSERT requires at least one column",
            ));
        }

        let tuples = self
            .rows
            .iter()
            .map(|row| {
                let slots = columns
                    .iter()
                    .map(|column| {
                        let hint = self.attributes.and_then(|a| a.get(*column));
                        escape_slot(row.get(*column), hint)
                    })
                    .collect::<Vec<_>>()
                    .join(",");
                format!("({})", slots)
            })
            .collect::<Vec<_>>()
            .join(",");

        render(
            BULK_INSERT,
            &Bindings::new()
                .bind("ignore", ignore_modifier(self.ignore_duplicates))
                .bind("table", quote_table(self.table)?)
                .bind("columns", column_list(columns.iter().copied())?)
                .bind("tuples", tuples),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{AttributeDefinition, Value};

    fn row(pairs: &[(&str, Value)]) -> RowValues {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.clone()))
            .collect()
    }

    #[test]
    fn test_insert_builder() {
        let table = TableReference::new("users");
        let values = row(&[("name", "John".into()), ("age", 30.into())]);

        let sql = InsertBuilder::new(&table, &values).to_sql().unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"users\" (\"name\",\"age\") VALUES ('John',30);"
        );
    }

    #[test]
    fn test_insert_ignore_duplicates() {
        let table = TableReference::new("users");
        let values = row(&[("id", 1.into())]);

        let sql = InsertBuilder::new(&table, &values)
            .ignore_duplicates(true)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT OR IGNORE INTO \"users\" (\"id\") VALUES (1);");
    }

    #[test]
    fn test_insert_without_values_uses_defaults() {
        let table = TableReference::new("users");
        let values = RowValues::new();

        let sql = InsertBuilder::new(&table, &values).to_sql().unwrap();
        assert_eq!(sql, "INSERT INTO \"users\" DEFAULT VALUES;");
    }

    #[test]
    fn test_insert_uses_attribute_hints() {
        let table = TableReference::new("users");
        let values = row(&[("active", "true".into())]);
        let mut attributes = Attributes::new();
        attributes.insert("active".into(), AttributeDefinition::new("BOOLEAN"));

        let sql = InsertBuilder::new(&table, &values)
            .attributes(&attributes)
            .to_sql()
            .unwrap();
        assert_eq!(sql, "INSERT INTO \"users\" (\"active\") VALUES (1);");
    }

    #[test]
    fn test_bulk_insert_column_union_and_missing_slots() {
        let table = TableReference::new("t");
        let rows = vec![
            row(&[("a", 1.into()), ("b", 2.into())]),
            row(&[("b", 3.into())]),
        ];

        assert_eq!(column_union(&rows), vec!["a", "b"]);
        let sql = BulkInsertBuilder::new(&table, &rows).to_sql().unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"t\" (\"a\",\"b\") VALUES (1,2),(NULL,3);"
        );
    }

    #[test]
    fn test_bulk_insert_first_seen_order_is_not_sorted() {
        let table = TableReference::new("t");
        let rows = vec![
            row(&[("z", 1.into())]),
            row(&[("a", 2.into()), ("z", 3.into())]),
        ];

        let sql = BulkInsertBuilder::new(&table, &rows)
            .ignore_duplicates(true)
            .to_sql()
            .unwrap();
        assert_eq!(
            sql,
            "INSERT OR IGNORE INTO \"t\" (\"z\",\"a\") VALUES (1,NULL),(3,2);"
        );
    }

    #[test]
    fn test_bulk_insert_without_rows_fails() {
        let table = TableReference::new("t");
        let result = BulkInsertBuilder::new(&table, &[]).to_sql();
        assert!(result.is_err());
        assert!(result
            .unwrap_err()
            .to_string()
            .contains("bulk INSERT requires at least one row"));
    }

    #[test]
    fn test_insert_escapes_hostile_values() {
        let table = TableReference::new("t");
        let values = row(&[("note", "'); DROP TABLE t; --".into())]);

        let sql = InsertBuilder::new(&table, &values).to_sql().unwrap();
        assert_eq!(
            sql,
            "INSERT INTO \"t\" (\"note\") VALUES ('''); DROP TABLE t; --');"
        );
    }
}
