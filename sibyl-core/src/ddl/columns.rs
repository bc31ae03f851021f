//! Attribute definitions to column definition fragments
//!
//! Each attribute becomes an ordered list of typed clauses. Rendering happens
//! last, so passes such as boolean default normalization work on the clause
//! values instead of on generated text.

use std::fmt::{self, Display};

use indexmap::IndexMap;

use crate::escape::{boolean_text, escape};
use crate::quote::{quote_name, quote_table};
use crate::{
    AttributeDefinition, Attributes, DefaultValue, Error, GeneratorConfig, ReferentialAction,
    Result, SemanticType, Value,
};

/// Key referenced when a foreign key names no column
pub const DEFAULT_REFERENCE_KEY: &str = "id";

/// One clause of a column definition, in rendering order
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnClause {
    /// Base type text
    DataType(String),
    /// Enumeration membership check; `column` is already quoted
    Check { column: String, members: Vec<Value> },
    NotNull,
    Default {
        value: Value,
        semantic: SemanticType,
    },
    Unique,
    PrimaryKey,
    /// Foreign key target; both parts already quoted
    References { table: String, key: String },
    OnDelete(ReferentialAction),
}

impl Display for ColumnClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnClause::DataType(sql_type) => write!(f, "{}", sql_type),
            ColumnClause::Check { column, members } => {
                let members = members
                    .iter()
                    .map(|member| escape(member, None))
                    .collect::<Vec<_>>()
                    .join(",");
                write!(f, "CHECK ({} IN ({}))", column, members)
            }
            ColumnClause::NotNull => write!(f, "NOT NULL"),
            ColumnClause::Default { value, .. } => write!(f, "DEFAULT {}", escape(value, None)),
            ColumnClause::Unique => write!(f, "UNIQUE"),
            ColumnClause::PrimaryKey => write!(f, "PRIMARY KEY"),
            ColumnClause::References { table, key } => write!(f, "REFERENCES {} ({})", table, key),
            ColumnClause::OnDelete(action) => write!(f, "ON DELETE {}", action),
        }
    }
}

/// Ordered clauses describing one column, without the column name
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ColumnDefinition {
    clauses: Vec<ColumnClause>,
}

impl ColumnDefinition {
    pub fn clauses(&self) -> &[ColumnClause] {
        &self.clauses
    }

    /// Rewrite boolean `DEFAULT` values to the dialect's `1`/`0`.
    ///
    /// Applies to boolean defaults, and to `'true'`/`'false'` strings when the
    /// column itself is boolean. No other clause is touched.
    pub fn normalize_boolean_defaults(mut self) -> Self {
        for clause in &mut self.clauses {
            if let ColumnClause::Default { value, semantic } = clause {
                let textual = matches!(value, Value::String(_));
                if textual && *semantic != SemanticType::Boolean {
                    continue;
                }
                if let Some(flag) = boolean_text(value) {
                    *value = Value::Bool(flag);
                }
            }
        }
        self
    }
}

impl Display for ColumnDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, clause) in self.clauses.iter().enumerate() {
            if i > 0 {
                write!(f, " ")?;
            }
            write!(f, "{}", clause)?;
        }
        Ok(())
    }
}

/// Reject type text that could carry anything besides a type name
fn validate_type(column: &str, sql_type: &str) -> Result<()> {
    let allowed = |c: char| c.is_ascii_alphanumeric() || matches!(c, '_' | ' ' | '(' | ')' | ',');
    if sql_type.trim().is_empty() || !sql_type.chars().all(allowed) {
        return Err(Error::invalid_data_type(column, sql_type));
    }
    Ok(())
}

/// Members of an `ENUM('a','b')` type, `None` if the text is malformed
fn parse_enum_members(sql_type: &str) -> Option<Vec<Value>> {
    let open = sql_type.find('(')?;
    let close = sql_type.rfind(')')?;
    if close < open {
        return None;
    }

    let mut members = Vec::new();
    let mut chars = sql_type[open + 1..close].chars().peekable();
    loop {
        while matches!(chars.peek(), Some(c) if c.is_whitespace() || *c == ',') {
            chars.next();
        }
        match chars.next() {
            None => break,
            Some('\'') => {}
            Some(_) => return None,
        }

        let mut member = String::new();
        loop {
            match chars.next()? {
                '\'' if chars.peek() == Some(&'\'') => {
                    chars.next();
                    member.push('\'');
                }
                '\'' => break,
                c => member.push(c),
            }
        }
        members.push(Value::String(member));
    }
    Some(members)
}

fn enum_members(column: &str, attribute: &AttributeDefinition) -> Result<Vec<Value>> {
    let members = match &attribute.enum_values {
        Some(values) => values.clone(),
        None => parse_enum_members(&attribute.sql_type).unwrap_or_default(),
    };

    if members.is_empty() {
        return Err(Error::empty_enumeration(column));
    }
    Ok(members)
}

/// Build the definition of one attribute, returning its column name with it
pub fn column_definition(
    attribute_name: &str,
    attribute: &AttributeDefinition,
    config: &GeneratorConfig,
) -> Result<(String, ColumnDefinition)> {
    let column = attribute.column_name(attribute_name);
    let semantic = attribute.semantic_type();
    let mut clauses = Vec::new();

    if semantic == SemanticType::Enumeration {
        let members = enum_members(column, attribute)?;
        validate_type(column, &config.enum_storage_type)?;
        clauses.push(ColumnClause::DataType(config.enum_storage_type.clone()));
        clauses.push(ColumnClause::Check {
            column: quote_name("column", column)?,
            members,
        });
    } else {
        validate_type(column, &attribute.sql_type)?;
        clauses.push(ColumnClause::DataType(attribute.sql_type.trim().to_string()));
    }

    if !attribute.allow_null {
        clauses.push(ColumnClause::NotNull);
    }

    // Function defaults are filled in by the caller at insert time
    if let Some(DefaultValue::Literal(value)) = &attribute.default_value {
        clauses.push(ColumnClause::Default {
            value: value.clone(),
            semantic,
        });
    }

    if attribute.unique {
        clauses.push(ColumnClause::Unique);
    }

    if attribute.primary_key {
        clauses.push(ColumnClause::PrimaryKey);
    }

    if let Some(references) = &attribute.references {
        let key = references.key.as_deref().unwrap_or(DEFAULT_REFERENCE_KEY);
        clauses.push(ColumnClause::References {
            table: quote_table(&references.table)?,
            key: quote_name("column", key)?,
        });

        if let Some(action) = references.on_delete {
            clauses.push(ColumnClause::OnDelete(action));
        }
        // ON UPDATE has no equivalent in this dialect and is dropped
    }

    Ok((column.to_string(), ColumnDefinition { clauses }))
}

/// Build definitions for every attribute, keyed by column name, in
/// declaration order
pub fn attributes_to_sql(
    attributes: &Attributes,
    config: &GeneratorConfig,
) -> Result<IndexMap<String, ColumnDefinition>> {
    attributes
        .iter()
        .map(|(name, attribute)| column_definition(name, attribute, config))
        .collect()
}

/// Names of attributes flagged as auto-incrementing, in declaration order
pub fn auto_increment_fields(attributes: &Attributes) -> Vec<&str> {
    attributes
        .iter()
        .filter(|(_, attribute)| attribute.auto_increment)
        .map(|(name, _)| name.as_str())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::References;

    fn render(attribute: AttributeDefinition) -> String {
        let (_, definition) =
            column_definition("col", &attribute, &GeneratorConfig::default()).unwrap();
        definition.normalize_boolean_defaults().to_string()
    }

    #[test]
    fn test_plain_column() {
        assert_eq!(render(AttributeDefinition::new("NUMBER(10)")), "NUMBER(10)");
        assert_eq!(
            render(AttributeDefinition::new("VARCHAR2(255)").not_null().unique()),
            "VARCHAR2(255) NOT NULL UNIQUE"
        );
    }

    #[test]
    fn test_enum_column() {
        let attribute = AttributeDefinition::enumeration(["a", "b"]).not_null();
        assert_eq!(
            render(attribute),
            "VARCHAR2(255) CHECK (\"col\" IN ('a','b')) NOT NULL"
        );
    }

    #[test]
    fn test_enum_members_are_escaped() {
        let attribute = AttributeDefinition::enumeration(["it's"]);
        assert_eq!(render(attribute), "VARCHAR2(255) CHECK (\"col\" IN ('it''s'))");
    }

    #[test]
    fn test_enum_shorthand_type() {
        let attribute = AttributeDefinition::new("ENUM('on', 'o''clock')");
        assert_eq!(
            render(attribute),
            "VARCHAR2(255) CHECK (\"col\" IN ('on','o''clock'))"
        );
    }

    #[test]
    fn test_enum_without_values_fails() {
        let config = GeneratorConfig::default();
        for attribute in [
            AttributeDefinition::new("ENUM"),
            AttributeDefinition::new("ENUM").enum_values(Vec::<Value>::new()),
            AttributeDefinition::new("ENUM()"),
        ] {
            let err = column_definition("status", &attribute, &config).unwrap_err();
            assert!(matches!(err, Error::EmptyEnumeration { ref column } if column == "status"));
        }
    }

    #[test]
    fn test_enum_check_uses_field_name() {
        let attribute = AttributeDefinition::enumeration(["x"]).field("state_code");
        let (column, definition) =
            column_definition("state", &attribute, &GeneratorConfig::default()).unwrap();
        assert_eq!(column, "state_code");
        assert_eq!(
            definition.to_string(),
            "VARCHAR2(255) CHECK (\"state_code\" IN ('x'))"
        );
    }

    #[test]
    fn test_boolean_defaults() {
        assert_eq!(
            render(AttributeDefinition::new("NUMBER(1)").default_value(false)),
            "NUMBER(1) DEFAULT 0"
        );
        assert_eq!(
            render(AttributeDefinition::new("NUMBER(1)").default_value(true)),
            "NUMBER(1) DEFAULT 1"
        );
    }

    #[test]
    fn test_textual_boolean_default_on_boolean_column() {
        let attribute = AttributeDefinition::new("BOOLEAN").default_value("false");
        let (_, definition) =
            column_definition("col", &attribute, &GeneratorConfig::default()).unwrap();
        assert_eq!(definition.to_string(), "BOOLEAN DEFAULT 'false'");
        assert_eq!(
            definition.normalize_boolean_defaults().to_string(),
            "BOOLEAN DEFAULT 0"
        );
    }

    #[test]
    fn test_textual_boolean_default_on_text_column_is_kept() {
        assert_eq!(
            render(AttributeDefinition::new("VARCHAR2(5)").default_value("true")),
            "VARCHAR2(5) DEFAULT 'true'"
        );
    }

    #[test]
    fn test_function_defaults_are_omitted() {
        assert_eq!(
            render(AttributeDefinition::new("TIMESTAMP").default_function(DefaultValue::Now)),
            "TIMESTAMP"
        );
        assert_eq!(
            render(
                AttributeDefinition::new("RAW(16)")
                    .default_function(DefaultValue::Expression("SYS_GUID()".into()))
            ),
            "RAW(16)"
        );
    }

    #[test]
    fn test_clause_order() {
        let attribute = AttributeDefinition::new("NUMBER(10)")
            .not_null()
            .default_value(0)
            .unique()
            .primary_key()
            .references(
                References::to("teams")
                    .key("team_id")
                    .on_delete(ReferentialAction::CASCADE),
            );
        assert_eq!(
            render(attribute),
            "NUMBER(10) NOT NULL DEFAULT 0 UNIQUE PRIMARY KEY \
REFERENCES \"teams\" (\"team_id\") ON DELETE CASCADE"
        );
    }

    #[test]
    fn test_references_default_key_and_dropped_on_update() {
        let attribute = AttributeDefinition::new("NUMBER(10)").references(
            References::to(crate::TableReference::new("users").with_schema("app"))
                .on_update(ReferentialAction::CASCADE),
        );
        assert_eq!(
            render(attribute),
            "NUMBER(10) REFERENCES \"app\".\"users\" (\"id\")"
        );
    }

    #[test]
    fn test_invalid_type_text_is_rejected() {
        let config = GeneratorConfig::default();
        for sql_type in ["", "NUMBER; DROP TABLE x", "VARCHAR2(10) DEFAULT 'x'", "INT--"] {
            let attribute = AttributeDefinition::new(sql_type);
            let err = column_definition("c", &attribute, &config).unwrap_err();
            assert!(matches!(err, Error::InvalidDataType { .. }), "{}", sql_type);
        }
    }

    #[test]
    fn test_invalid_enum_storage_type_is_rejected() {
        let config = GeneratorConfig::default().enum_storage_type("CLOB'");
        let attribute = AttributeDefinition::enumeration(["a"]);
        let err = column_definition("c", &attribute, &config).unwrap_err();
        assert!(matches!(err, Error::InvalidDataType { .. }));
    }

    #[test]
    fn test_attributes_to_sql_keeps_order() {
        let mut attributes = Attributes::new();
        attributes.insert("zeta".into(), AttributeDefinition::new("NUMBER(10)"));
        attributes.insert("alpha".into(), AttributeDefinition::new("NUMBER(10)").field("a"));

        let definitions = attributes_to_sql(&attributes, &GeneratorConfig::default()).unwrap();
        let columns: Vec<&str> = definitions.keys().map(String::as_str).collect();
        assert_eq!(columns, vec!["zeta", "a"]);
    }

    #[test]
    fn test_auto_increment_fields() {
        let mut attributes = Attributes::new();
        attributes.insert(
            "id".into(),
            AttributeDefinition::new("NUMBER(10)").primary_key().auto_increment(),
        );
        attributes.insert("name".into(), AttributeDefinition::new("VARCHAR2(50)"));
        attributes.insert(
            "seq".into(),
            AttributeDefinition::new("NUMBER(10)").auto_increment(),
        );

        assert_eq!(auto_increment_fields(&attributes), vec!["id", "seq"]);
    }
}
