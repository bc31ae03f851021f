//! Structural descriptions consumed by the statement generators

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::{ReferentialAction, Value};

/// Attribute definitions keyed by attribute name, in declaration order
pub type Attributes = IndexMap<String, AttributeDefinition>;

/// Column values for one row, in insertion order
pub type RowValues = IndexMap<String, Value>;

/// A possibly schema-qualified table name
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TableReference {
    #[serde(default)]
    pub schema: Option<String>,
    pub name: String,
}

impl TableReference {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            schema: None,
            name: name.into(),
        }
    }

    /// Qualify the table with a schema
    pub fn with_schema(mut self, schema: impl Into<String>) -> Self {
        self.schema = Some(schema.into());
        self
    }
}

impl From<&str> for TableReference {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for TableReference {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Default value of a column
///
/// In JSON a plain scalar is a literal (`"defaultValue": false`), a
/// generator is `{"fn": "NOW" | "UUIDV1" | "UUIDV4"}` and any other
/// runtime expression is `{"expression": "SYS_GUID()"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(from = "DefaultValueRepr", into = "DefaultValueRepr")]
pub enum DefaultValue {
    /// A literal that can be written into the DDL
    Literal(Value),
    /// Current timestamp, filled in at insert time
    Now,
    /// Generated time-based UUID
    UuidV1,
    /// Generated random UUID
    UuidV4,
    /// Any other runtime expression or function call
    Expression(String),
}

impl DefaultValue {
    /// Whether the default can be expressed as a `DEFAULT` clause.
    ///
    /// Only literals qualify; function defaults are produced by the mapping
    /// layer at insert time.
    pub fn is_schemable(&self) -> bool {
        matches!(self, DefaultValue::Literal(_))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
enum DefaultFunction {
    Now,
    UuidV1,
    UuidV4,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
enum DefaultValueRepr {
    Function {
        #[serde(rename = "fn")]
        function: DefaultFunction,
    },
    Expression {
        expression: String,
    },
    Literal(Value),
}

impl From<DefaultValueRepr> for DefaultValue {
    fn from(repr: DefaultValueRepr) -> Self {
        match repr {
            DefaultValueRepr::Function { function } => match function {
                DefaultFunction::Now => DefaultValue::Now,
                DefaultFunction::UuidV1 => DefaultValue::UuidV1,
                DefaultFunction::UuidV4 => DefaultValue::UuidV4,
            },
            DefaultValueRepr::Expression { expression } => DefaultValue::Expression(expression),
            DefaultValueRepr::Literal(value) => DefaultValue::Literal(value),
        }
    }
}

impl From<DefaultValue> for DefaultValueRepr {
    fn from(default: DefaultValue) -> Self {
        let function = match default {
            DefaultValue::Literal(value) => return DefaultValueRepr::Literal(value),
            DefaultValue::Expression(expression) => {
                return DefaultValueRepr::Expression { expression }
            }
            DefaultValue::Now => DefaultFunction::Now,
            DefaultValue::UuidV1 => DefaultFunction::UuidV1,
            DefaultValue::UuidV4 => DefaultFunction::UuidV4,
        };
        DefaultValueRepr::Function { function }
    }
}

/// Foreign key target of a column
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct References {
    pub table: TableReference,
    #[serde(default)]
    pub key: Option<String>,
    #[serde(default)]
    pub on_delete: Option<ReferentialAction>,
    /// Accepted for parity with other dialects; never rendered
    #[serde(default)]
    pub on_update: Option<ReferentialAction>,
}

impl References {
    pub fn to(table: impl Into<TableReference>) -> Self {
        Self {
            table: table.into(),
            key: None,
            on_delete: None,
            on_update: None,
        }
    }

    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = Some(key.into());
        self
    }

    pub fn on_delete(mut self, action: ReferentialAction) -> Self {
        self.on_delete = Some(action);
        self
    }

    pub fn on_update(mut self, action: ReferentialAction) -> Self {
        self.on_update = Some(action);
        self
    }
}

/// How a column's values are interpreted when rendering literals
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SemanticType {
    Boolean,
    Enumeration,
    Other,
}

impl SemanticType {
    /// Classify declared type text
    pub fn of(sql_type: &str) -> Self {
        let compact: String = sql_type
            .chars()
            .filter(|c| !c.is_whitespace())
            .collect::<String>()
            .to_uppercase();

        if compact == "ENUM" || compact.starts_with("ENUM(") {
            SemanticType::Enumeration
        } else if matches!(
            compact.as_str(),
            "BOOLEAN" | "BOOL" | "NUMBER(1)" | "TINYINT(1)"
        ) {
            SemanticType::Boolean
        } else {
            SemanticType::Other
        }
    }
}

/// Column description handed over by the mapping layer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AttributeDefinition {
    #[serde(rename = "type")]
    pub sql_type: String,
    /// Physical column name, when it differs from the attribute name
    pub field: Option<String>,
    pub allow_null: bool,
    pub default_value: Option<DefaultValue>,
    pub unique: bool,
    pub primary_key: bool,
    pub auto_increment: bool,
    #[serde(rename = "values")]
    pub enum_values: Option<Vec<Value>>,
    pub references: Option<References>,
}

impl Default for AttributeDefinition {
    fn default() -> Self {
        Self {
            sql_type: String::new(),
            field: None,
            allow_null: true,
            default_value: None,
            unique: false,
            primary_key: false,
            auto_increment: false,
            enum_values: None,
            references: None,
        }
    }
}

impl AttributeDefinition {
    /// Create a nullable attribute of the given type
    ///
    /// # Examples
    /// ```
    /// use sibyl_core::{AttributeDefinition, References, ReferentialAction};
    ///
    /// let owner = AttributeDefinition::new("NUMBER(10)")
    ///     .not_null()
    ///     .references(References::to("users").on_delete(ReferentialAction::CASCADE));
    /// ```
    pub fn new(sql_type: impl Into<String>) -> Self {
        Self {
            sql_type: sql_type.into(),
            ..Self::default()
        }
    }

    /// Create an enumeration attribute with the given members
    pub fn enumeration<I, T>(members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        Self {
            sql_type: "ENUM".to_string(),
            enum_values: Some(crate::value::values(members)),
            ..Self::default()
        }
    }

    pub fn field(mut self, field: impl Into<String>) -> Self {
        self.field = Some(field.into());
        self
    }

    pub fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }

    /// Literal default value
    pub fn default_value(mut self, value: impl Into<Value>) -> Self {
        self.default_value = Some(DefaultValue::Literal(value.into()));
        self
    }

    /// Runtime default such as [`DefaultValue::Now`]
    pub fn default_function(mut self, default: DefaultValue) -> Self {
        self.default_value = Some(default);
        self
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    pub fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    pub fn auto_increment(mut self) -> Self {
        self.auto_increment = true;
        self
    }

    pub fn enum_values<I, T>(mut self, members: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: Into<Value>,
    {
        self.enum_values = Some(crate::value::values(members));
        self
    }

    pub fn references(mut self, references: References) -> Self {
        self.references = Some(references);
        self
    }

    /// Semantic interpretation of the declared type
    pub fn semantic_type(&self) -> SemanticType {
        SemanticType::of(&self.sql_type)
    }

    /// Column name the attribute is stored under
    pub fn column_name<'a>(&'a self, attribute: &'a str) -> &'a str {
        self.field.as_deref().unwrap_or(attribute)
    }
}

/// A transaction or savepoint, identified by name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transaction {
    pub name: String,
}

impl Transaction {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_semantic_type_classification() {
        assert_eq!(SemanticType::of("ENUM"), SemanticType::Enumeration);
        assert_eq!(SemanticType::of("enum('a', 'b')"), SemanticType::Enumeration);
        assert_eq!(SemanticType::of("BOOLEAN"), SemanticType::Boolean);
        assert_eq!(SemanticType::of("number (1)"), SemanticType::Boolean);
        assert_eq!(SemanticType::of("NUMBER(10)"), SemanticType::Other);
        assert_eq!(SemanticType::of("ENUMERATED_THING"), SemanticType::Other);
    }

    #[test]
    fn test_function_defaults_are_not_schemable() {
        assert!(DefaultValue::Literal(Value::Bool(false)).is_schemable());
        assert!(DefaultValue::Literal(Value::Null).is_schemable());
        assert!(!DefaultValue::Now.is_schemable());
        assert!(!DefaultValue::UuidV4.is_schemable());
        assert!(!DefaultValue::Expression("SYS_GUID()".into()).is_schemable());
    }

    #[test]
    fn test_default_value_from_json() {
        let literal: DefaultValue = serde_json::from_str("false").unwrap();
        assert_eq!(literal, DefaultValue::Literal(Value::Bool(false)));
        let text: DefaultValue = serde_json::from_str(r#""pending""#).unwrap();
        assert_eq!(text, DefaultValue::Literal(Value::String("pending".into())));
        let now: DefaultValue = serde_json::from_str(r#"{"fn":"NOW"}"#).unwrap();
        assert_eq!(now, DefaultValue::Now);
        let uuid: DefaultValue = serde_json::from_str(r#"{"fn":"UUIDV4"}"#).unwrap();
        assert_eq!(uuid, DefaultValue::UuidV4);
        let expression: DefaultValue =
            serde_json::from_str(r#"{"expression":"SYS_GUID()"}"#).unwrap();
        assert_eq!(expression, DefaultValue::Expression("SYS_GUID()".into()));
    }

    #[test]
    fn test_default_value_to_json() {
        assert_eq!(
            serde_json::to_string(&DefaultValue::Literal(Value::I32(3))).unwrap(),
            "3"
        );
        assert_eq!(
            serde_json::to_string(&DefaultValue::UuidV1).unwrap(),
            r#"{"fn":"UUIDV1"}"#
        );
    }

    #[test]
    fn test_field_overrides_column_name() {
        let attr = AttributeDefinition::new("NUMBER(10)").field("user_id");
        assert_eq!(attr.column_name("userId"), "user_id");
        assert_eq!(AttributeDefinition::new("NUMBER(10)").column_name("userId"), "userId");
    }

    #[test]
    fn test_attribute_from_json() {
        let attr: AttributeDefinition = serde_json::from_str(
            r#"{
                "type": "NUMBER(10)",
                "allowNull": false,
                "references": { "table": { "name": "users" }, "onDelete": "cascade" }
            }"#,
        )
        .unwrap();
        assert!(!attr.allow_null);
        let references = attr.references.unwrap();
        assert_eq!(references.table, TableReference::new("users"));
        assert_eq!(references.on_delete, Some(ReferentialAction::CASCADE));
    }

    #[test]
    fn test_table_reference_with_schema() {
        let table = TableReference::new("users").with_schema("app");
        assert_eq!(table.schema.as_deref(), Some("app"));
        assert_eq!(table.name, "users");
    }
}
