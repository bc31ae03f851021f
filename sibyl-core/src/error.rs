//! Error types for Sibyl

use thiserror::Error;

/// The main error type for statement generation
///
/// Every variant is raised while the SQL text is being built, before anything
/// reaches a database. None of them are retryable.
#[derive(Error, Debug)]
pub enum Error {
    /// An enumeration column was declared without any values
    #[error("Values for ENUM column '{column}' haven't been defined")]
    EmptyEnumeration { column: String },

    /// Isolation level outside the supported set
    #[error("Unknown isolation level: {level}")]
    UnknownIsolationLevel { level: String },

    /// A template placeholder had no bound fragment
    #[error("Unresolved placeholder '{name}' in statement template")]
    UnresolvedPlaceholder { name: String },

    /// Column type text that cannot be interpolated safely
    #[error("Invalid data type '{sql_type}' for column '{column}'")]
    InvalidDataType { column: String, sql_type: String },

    /// Referential action text that maps to no known action
    #[error("Unsupported referential action '{action}'")]
    UnsupportedReferentialAction { action: String },

    /// A table, schema, column or index name was empty
    #[error("Empty {kind} name")]
    EmptyIdentifier { kind: &'static str },

    /// Invalid statement shape
    #[error("Invalid query: {message}")]
    InvalidQuery { message: String },

    /// Configuration could not be decoded
    #[error("Configuration error: {0}")]
    Config(#[from] serde_json::Error),
}

/// Convenience Result type for Sibyl operations
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new empty enumeration error
    pub fn empty_enumeration(column: impl Into<String>) -> Self {
        Self::EmptyEnumeration {
            column: column.into(),
        }
    }

    /// Create a new unknown isolation level error
    pub fn unknown_isolation_level(level: impl Into<String>) -> Self {
        Self::UnknownIsolationLevel {
            level: level.into(),
        }
    }

    /// Create a new unresolved placeholder error
    pub fn unresolved_placeholder(name: impl Into<String>) -> Self {
        Self::UnresolvedPlaceholder { name: name.into() }
    }

    /// Create a new invalid data type error
    pub fn invalid_data_type(column: impl Into<String>, sql_type: impl Into<String>) -> Self {
        Self::InvalidDataType {
            column: column.into(),
            sql_type: sql_type.into(),
        }
    }

    /// Create a new unsupported referential action error
    pub fn unsupported_referential_action(action: impl Into<String>) -> Self {
        Self::UnsupportedReferentialAction {
            action: action.into(),
        }
    }

    /// Create a new empty identifier error
    pub fn empty_identifier(kind: &'static str) -> Self {
        Self::EmptyIdentifier { kind }
    }

    /// Create a new invalid query error
    pub fn invalid_query(message: impl Into<String>) -> Self {
        Self::InvalidQuery {
            message: message.into(),
        }
    }
}
