//! Referential actions for foreign key clauses

use std::fmt::{self, Display};
use std::str::FromStr;

use serde::de::{self, Deserializer};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// Type-safe referential action (`ON DELETE <action>`)
///
/// Actions are a closed set of keywords; caller text is mapped onto one of
/// the constants and never interpolated directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(into = "String")]
pub struct ReferentialAction(&'static str);

impl ReferentialAction {
    pub const CASCADE: Self = ReferentialAction("CASCADE");
    pub const SET_NULL: Self = ReferentialAction("SET NULL");
    pub const SET_DEFAULT: Self = ReferentialAction("SET DEFAULT");
    pub const RESTRICT: Self = ReferentialAction("RESTRICT");
    pub const NO_ACTION: Self = ReferentialAction("NO ACTION");

    /// Get the keyword text of the action
    pub fn as_str(&self) -> &str {
        self.0
    }
}

impl Display for ReferentialAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Accepts the keyword in any case, with a space or underscore separator
impl FromStr for ReferentialAction {
    type Err = Error;

    fn from_str(action: &str) -> Result<Self> {
        let normalized = action.trim().to_uppercase().replace('_', " ");
        match normalized.as_str() {
            "CASCADE" => Ok(Self::CASCADE),
            "SET NULL" => Ok(Self::SET_NULL),
            "SET DEFAULT" => Ok(Self::SET_DEFAULT),
            "RESTRICT" => Ok(Self::RESTRICT),
            "NO ACTION" => Ok(Self::NO_ACTION),
            _ => Err(Error::unsupported_referential_action(action)),
        }
    }
}

impl TryFrom<String> for ReferentialAction {
    type Error = Error;

    fn try_from(action: String) -> Result<Self> {
        action.parse()
    }
}

impl<'de> Deserialize<'de> for ReferentialAction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        String::deserialize(deserializer)?
            .parse()
            .map_err(de::Error::custom)
    }
}

impl From<ReferentialAction> for String {
    fn from(action: ReferentialAction) -> Self {
        action.0.to_string()
    }
}
