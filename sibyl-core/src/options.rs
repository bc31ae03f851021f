//! Generator configuration and per-call options

use serde::{Deserialize, Serialize};

use crate::Result;

/// Read-only settings shared by every statement a generator produces
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GeneratorConfig {
    /// Drop null values from UPDATE statements unless a call overrides it
    pub omit_null: bool,
    /// Password given to principals created by `create_schema`
    pub schema_password: String,
    /// Column type used to store enumerations
    pub enum_storage_type: String,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            omit_null: false,
            schema_password: "12345".to_string(),
            enum_storage_type: "VARCHAR2(255)".to_string(),
        }
    }
}

impl GeneratorConfig {
    /// Decode a configuration from JSON; missing keys take their defaults
    ///
    /// # Examples
    /// ```
    /// use sibyl_core::GeneratorConfig;
    ///
    /// let config = GeneratorConfig::from_json(r#"{ "omitNull": true }"#).unwrap();
    /// assert!(config.omit_null);
    /// assert_eq!(config.enum_storage_type, "VARCHAR2(255)");
    /// ```
    pub fn from_json(json: &str) -> Result<Self> {
        let config: Self = serde_json::from_str(json)?;
        tracing::trace!(
            target: "sibyl::config",
            omit_null = config.omit_null,
            enum_storage_type = %config.enum_storage_type,
            "loaded generator configuration"
        );
        Ok(config)
    }

    pub fn omit_null(mut self, omit_null: bool) -> Self {
        self.omit_null = omit_null;
        self
    }

    pub fn schema_password(mut self, password: impl Into<String>) -> Self {
        self.schema_password = password.into();
        self
    }

    pub fn enum_storage_type(mut self, sql_type: impl Into<String>) -> Self {
        self.enum_storage_type = sql_type.into();
        self
    }
}

/// Options recognised by individual generator calls
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct QueryOptions {
    /// Overrides [`GeneratorConfig::omit_null`] when set
    pub omit_null: Option<bool>,
    /// Insert with the `OR IGNORE` modifier
    pub ignore_duplicates: bool,
    /// Name of the enclosing transaction; makes a transaction a savepoint
    pub parent: Option<String>,
}

impl QueryOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn omit_null(mut self, omit_null: bool) -> Self {
        self.omit_null = Some(omit_null);
        self
    }

    pub fn ignore_duplicates(mut self) -> Self {
        self.ignore_duplicates = true;
        self
    }

    pub fn parent(mut self, parent: impl Into<String>) -> Self {
        self.parent = Some(parent.into());
        self
    }

    /// Effective null policy for this call
    pub fn omits_null(&self, config: &GeneratorConfig) -> bool {
        self.omit_null.unwrap_or(config.omit_null)
    }
}
