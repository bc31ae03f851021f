//! Common types and traits shared across all statement builders

use crate::Result;

/// Core trait for everything that renders to statement text
pub trait QueryBuilder {
    /// Generate the SQL statement
    fn to_sql(&self) -> Result<String>;
}

/// Predicate text produced by the caller's condition compiler.
///
/// The text is trusted as-is: it must already be quoted and escaped. This
/// crate only decides whether a `WHERE` keyword is emitted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct WhereClause(Option<String>);

impl WhereClause {
    /// Wrap compiled predicate text; blank text means "no condition"
    pub fn compiled(sql: impl Into<String>) -> Self {
        let sql = sql.into();
        if sql.trim().is_empty() {
            Self(None)
        } else {
            Self(Some(sql))
        }
    }

    /// No condition
    pub fn none() -> Self {
        Self(None)
    }

    pub fn as_sql(&self) -> Option<&str> {
        self.0.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_none()
    }

    /// `WHERE <predicate>`, or an empty string
    pub(crate) fn keyword_clause(&self) -> String {
        match &self.0 {
            Some(sql) => format!("WHERE {}", sql),
            None => String::new(),
        }
    }
}

/// Row-limiting clause with a leading space, or an empty string
///
/// # Examples
/// ```
/// use sibyl_core::builder::row_limit_clause;
///
/// assert_eq!(row_limit_clause(Some(10), Some(20)), " OFFSET 20 ROWS FETCH NEXT 10 ROWS ONLY");
/// assert_eq!(row_limit_clause(None, None), "");
/// ```
pub fn row_limit_clause(limit: Option<u64>, offset: Option<u64>) -> String {
    let mut sql = String::new();

    if let Some(offset) = offset {
        sql.push_str(&format!(" OFFSET {} ROWS", offset));
    }

    if let Some(limit) = limit {
        sql.push_str(&format!(" FETCH NEXT {} ROWS ONLY", limit));
    }

    sql
}
