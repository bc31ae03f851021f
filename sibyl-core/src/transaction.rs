//! Transaction control statements

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::escape::escape_string;
use crate::quote::quote_name;
use crate::template::{render, Bindings};
use crate::{Error, QueryOptions, Result, Transaction};

const SAVEPOINT: &str = "SAVEPOINT {name};";
const SET_TRANSACTION_NAME: &str = "SET TRANSACTION NAME {name};";
const ROLLBACK_TO_SAVEPOINT: &str = "ROLLBACK TO SAVEPOINT {name};";

pub const SET_AUTOCOMMIT: &str = "SET AUTOCOMMIT ON;";
pub const COMMIT: &str = "COMMIT;";
pub const ROLLBACK: &str = "ROLLBACK;";

/// Transaction isolation levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum IsolationLevel {
    ReadUncommitted,
    ReadCommitted,
    RepeatableRead,
    Serializable,
}

impl IsolationLevel {
    /// SQL name of the level
    pub fn name(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "READ UNCOMMITTED",
            IsolationLevel::ReadCommitted => "READ COMMITTED",
            IsolationLevel::RepeatableRead => "REPEATABLE READ",
            IsolationLevel::Serializable => "SERIALIZABLE",
        }
    }

    /// Text that selects this level. Levels the dialect cannot choose
    /// produce an SQL comment saying so.
    pub fn statement(&self) -> &'static str {
        match self {
            IsolationLevel::ReadUncommitted => "PRAGMA read_uncommitted = ON;",
            IsolationLevel::ReadCommitted => "PRAGMA read_uncommitted = OFF;",
            IsolationLevel::RepeatableRead => {
                "-- The dialect is not able to choose the isolation level REPEATABLE READ."
            }
            IsolationLevel::Serializable => {
                "-- The dialect's default isolation level is SERIALIZABLE. Nothing to do."
            }
        }
    }
}

impl fmt::Display for IsolationLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for IsolationLevel {
    type Err = Error;

    /// Accepts `READ_COMMITTED` as well as `read committed`
    fn from_str(s: &str) -> Result<Self> {
        let normalized = s.trim().replace('_', " ").to_uppercase();
        match normalized.as_str() {
            "READ UNCOMMITTED" => Ok(IsolationLevel::ReadUncommitted),
            "READ COMMITTED" => Ok(IsolationLevel::ReadCommitted),
            "REPEATABLE READ" => Ok(IsolationLevel::RepeatableRead),
            "SERIALIZABLE" => Ok(IsolationLevel::Serializable),
            _ => Err(Error::unknown_isolation_level(s)),
        }
    }
}

/// Start a transaction, or a savepoint when the options name a parent
pub fn start_transaction(transaction: &Transaction, options: &QueryOptions) -> Result<String> {
    if options.parent.is_some() {
        return render(
            SAVEPOINT,
            &Bindings::new().bind("name", quote_name("savepoint", &transaction.name)?),
        );
    }

    if transaction.name.is_empty() {
        return Err(Error::empty_identifier("transaction"));
    }
    render(
        SET_TRANSACTION_NAME,
        &Bindings::new().bind("name", escape_string(&transaction.name)),
    )
}

/// Isolation statement for a level given by name
pub fn isolation_level_statement(level: &str) -> Result<&'static str> {
    Ok(level.parse::<IsolationLevel>()?.statement())
}

/// Commit the current transaction. A savepoint has nothing to commit on its
/// own, so the statement is empty.
pub fn commit_transaction(options: &QueryOptions) -> String {
    if options.parent.is_some() {
        String::new()
    } else {
        COMMIT.to_string()
    }
}

/// Roll back the whole transaction, or only to the savepoint when the
/// options name a parent
pub fn rollback_transaction(transaction: &Transaction, options: &QueryOptions) -> Result<String> {
    if options.parent.is_some() {
        return render(
            ROLLBACK_TO_SAVEPOINT,
            &Bindings::new().bind("name", quote_name("savepoint", &transaction.name)?),
        );
    }
    Ok(ROLLBACK.to_string())
}
