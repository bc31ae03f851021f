//! Anonymous procedural blocks for conditional DDL
//!
//! The dialect has no `IF [NOT] EXISTS` for users, tables or indexes, so
//! idempotent DDL is emitted as a block that counts matching catalog rows and
//! runs dynamic statements only when the count says so. The block is kept as
//! typed steps until it is rendered.

use crate::builder::QueryBuilder;
use crate::escape::escape_string;
use crate::template::{render, Bindings};
use crate::Result;

/// Variables every block declares
pub const DECLARATIONS: &str = "DECLARE V_COUNT INTEGER; V_CURSOR_NAME INTEGER; V_RET INTEGER;";

const COUNT_INTO: &str = "SELECT COUNT(1) INTO V_COUNT FROM {view} WHERE {filters};";
const IF_COUNT: &str = "IF V_COUNT = {count} THEN {statements} END IF;";
const EXECUTE_IMMEDIATE: &str = "EXECUTE IMMEDIATE {statement};";
const DBMS_SQL: &str = "V_CURSOR_NAME := DBMS_SQL.OPEN_CURSOR; \
DBMS_SQL.PARSE(V_CURSOR_NAME, {statement}, DBMS_SQL.NATIVE); \
V_RET := DBMS_SQL.EXECUTE(V_CURSOR_NAME);";

/// Equality filter on a catalog column
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CatalogFilter {
    pub column: &'static str,
    /// Unescaped value; escaped when rendered
    pub value: String,
}

/// Count of catalog rows matching every filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExistenceCheck {
    pub view: &'static str,
    pub filters: Vec<CatalogFilter>,
}

impl ExistenceCheck {
    pub fn new(view: &'static str) -> Self {
        Self {
            view,
            filters: Vec::new(),
        }
    }

    pub fn filter(mut self, column: &'static str, value: impl Into<String>) -> Self {
        self.filters.push(CatalogFilter {
            column,
            value: value.into(),
        });
        self
    }
}

impl QueryBuilder for ExistenceCheck {
    fn to_sql(&self) -> Result<String> {
        let filters = self
            .filters
            .iter()
            .map(|f| format!("{} = {}", f.column, escape_string(&f.value)))
            .collect::<Vec<_>>()
            .join(" AND ");

        render(
            COUNT_INTO,
            &Bindings::new().bind("view", self.view).bind("filters", filters),
        )
    }
}

/// A statement executed dynamically from inside the block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DynamicStatement {
    /// `EXECUTE IMMEDIATE '<statement>'`
    ExecuteImmediate(String),
    /// Open a `DBMS_SQL` cursor, parse and execute; the cursor is released
    /// when the block ends
    DbmsSql(String),
}

impl DynamicStatement {
    /// Statement text before it is embedded as a literal
    pub fn statement(&self) -> &str {
        match self {
            DynamicStatement::ExecuteImmediate(sql) | DynamicStatement::DbmsSql(sql) => sql,
        }
    }
}

impl QueryBuilder for DynamicStatement {
    fn to_sql(&self) -> Result<String> {
        let template = match self {
            DynamicStatement::ExecuteImmediate(_) => EXECUTE_IMMEDIATE,
            DynamicStatement::DbmsSql(_) => DBMS_SQL,
        };
        render(
            template,
            &Bindings::new().bind("statement", escape_string(self.statement())),
        )
    }
}

/// One step of a procedural block
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Step {
    /// Store the number of matching catalog rows in `V_COUNT`
    CountInto(ExistenceCheck),
    /// Run statements only when `V_COUNT` equals `count`
    IfCount {
        count: u32,
        then: Vec<DynamicStatement>,
    },
}

impl QueryBuilder for Step {
    fn to_sql(&self) -> Result<String> {
        match self {
            Step::CountInto(check) => check.to_sql(),
            Step::IfCount { count, then } => {
                let statements = then
                    .iter()
                    .map(|statement| statement.to_sql())
                    .collect::<Result<Vec<_>>>()?
                    .join(" ");
                render(
                    IF_COUNT,
                    &Bindings::new()
                        .bind("count", count.to_string())
                        .bind("statements", statements),
                )
            }
        }
    }
}

/// `DECLARE ... BEGIN <steps> END;`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ProceduralBlock {
    steps: Vec<Step>,
}

impl ProceduralBlock {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn step(mut self, step: Step) -> Self {
        self.steps.push(step);
        self
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }
}

impl QueryBuilder for ProceduralBlock {
    fn to_sql(&self) -> Result<String> {
        let mut parts = vec![DECLARATIONS.to_string(), "BEGIN".to_string()];
        for step in &self.steps {
            parts.push(step.to_sql()?);
        }
        parts.push("END;".to_string());
        Ok(parts.join(" "))
    }
}
