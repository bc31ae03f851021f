//! Index removal

use heck::ToSnakeCase;

use crate::builder::QueryBuilder;
use crate::procedural::{DynamicStatement, ExistenceCheck, ProceduralBlock, Step};
use crate::quote::quote_name;
use crate::{Error, Result, TableReference};

/// Which index to drop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IndexTarget {
    /// An index by its exact name
    Named(String),
    /// The index created over these attributes, named after the table and
    /// the attributes
    Attributes(Vec<String>),
}

impl IndexTarget {
    /// Resolve the index name for `table`
    ///
    /// # Examples
    /// ```
    /// use sibyl_core::{ddl::IndexTarget, TableReference};
    ///
    /// let target = IndexTarget::Attributes(vec!["firstName".into(), "lastName".into()]);
    /// let name = target.index_name(&TableReference::new("users")).unwrap();
    /// assert_eq!(name, "users_first_name_last_name");
    /// ```
    pub fn index_name(&self, table: &TableReference) -> Result<String> {
        let name = match self {
            IndexTarget::Named(name) => name.clone(),
            IndexTarget::Attributes(attributes) => {
                if attributes.is_empty() {
                    return Err(Error::empty_identifier("index"));
                }
                format!("{}_{}", table.name, attributes.join("_")).to_snake_case()
            }
        };

        if name.is_empty() {
            return Err(Error::empty_identifier("index"));
        }
        Ok(name)
    }
}

impl From<&str> for IndexTarget {
    fn from(name: &str) -> Self {
        IndexTarget::Named(name.to_string())
    }
}

impl From<String> for IndexTarget {
    fn from(name: String) -> Self {
        IndexTarget::Named(name)
    }
}

impl From<Vec<String>> for IndexTarget {
    fn from(attributes: Vec<String>) -> Self {
        IndexTarget::Attributes(attributes)
    }
}

/// Drop an index only if the catalog lists it
#[derive(Debug, Clone)]
pub struct RemoveIndexBuilder<'a> {
    table: &'a TableReference,
    target: &'a IndexTarget,
}

impl<'a> RemoveIndexBuilder<'a> {
    pub fn new(table: &'a TableReference, target: &'a IndexTarget) -> Self {
        Self { table, target }
    }

    pub fn block(&self) -> Result<ProceduralBlock> {
        let name = self.target.index_name(self.table)?;
        let index = quote_name("index", &name)?;

        let (check, qualified) = match &self.table.schema {
            Some(schema) => (
                ExistenceCheck::new("ALL_INDEXES")
                    .filter("OWNER", schema.as_str())
                    .filter("INDEX_NAME", name.as_str()),
                format!("{}.{}", quote_name("schema", schema)?, index),
            ),
            None => (
                ExistenceCheck::new("USER_INDEXES").filter("INDEX_NAME", name.as_str()),
                index,
            ),
        };

        Ok(ProceduralBlock::new()
            .step(Step::CountInto(check))
            .step(Step::IfCount {
                count: 1,
                then: vec![DynamicStatement::ExecuteImmediate(format!(
                    "DROP INDEX {}",
                    qualified
                ))],
            }))
    }
}

impl QueryBuilder for RemoveIndexBuilder<'_> {
    fn to_sql(&self) -> Result<String> {
        self.block()?.to_sql()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_remove_named_index() {
        let table = TableReference::new("users");
        let target = IndexTarget::from("users_email_idx");

        let sql = RemoveIndexBuilder::new(&table, &target).to_sql().unwrap();
        assert_eq!(
            sql,
            "DECLARE V_COUNT INTEGER; V_CURSOR_NAME INTEGER; V_RET INTEGER; BEGIN \
SELECT COUNT(1) INTO V_COUNT FROM USER_INDEXES WHERE INDEX_NAME = 'users_email_idx'; \
IF V_COUNT = 1 THEN EXECUTE IMMEDIATE 'DROP INDEX \"users_email_idx\"'; END IF; END;"
        );
    }

    #[test]
    fn test_index_name_from_attributes() {
        let table = TableReference::new("UserProfiles");
        let target = IndexTarget::from(vec!["firstName".to_string(), "last_name".to_string()]);
        assert_eq!(
            target.index_name(&table).unwrap(),
            "user_profiles_first_name_last_name"
        );
    }

    #[test]
    fn test_remove_index_with_schema() {
        let table = TableReference::new("users").with_schema("app");
        let target = IndexTarget::Attributes(vec!["email".into()]);

        let sql = RemoveIndexBuilder::new(&table, &target).to_sql().unwrap();
        assert!(sql.contains(
            "FROM ALL_INDEXES WHERE OWNER = 'app' AND INDEX_NAME = 'users_email';"
        ));
        assert!(sql.contains("EXECUTE IMMEDIATE 'DROP INDEX \"app\".\"users_email\"';"));
    }

    #[test]
    fn test_empty_targets_are_rejected() {
        let table = TableReference::new("users");
        for target in [IndexTarget::Named(String::new()), IndexTarget::Attributes(vec![])] {
            let result = RemoveIndexBuilder::new(&table, &target).to_sql();
            assert!(matches!(result, Err(Error::EmptyIdentifier { kind: "index" })));
        }
    }
}
