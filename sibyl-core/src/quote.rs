//! Identifier quoting

use crate::{Error, Result, TableReference};

/// Delimiter wrapped around every identifier
pub const IDENTIFIER_QUOTE: char = '"';

/// Token meaning "all columns"; never quoted
pub const WILDCARD: &str = "*";

/// Wrap an identifier in double quotes, doubling any embedded quote.
///
/// # Examples
/// ```
/// use sibyl_core::quote::quote_identifier;
///
/// assert_eq!(quote_identifier("users"), "\"users\"");
/// assert_eq!(quote_identifier("odd\"name"), "\"odd\"\"name\"");
/// assert_eq!(quote_identifier("*"), "*");
/// ```
pub fn quote_identifier(identifier: &str) -> String {
    if identifier == WILDCARD {
        return identifier.to_string();
    }

    let mut quoted = String::with_capacity(identifier.len() + 2);
    quoted.push(IDENTIFIER_QUOTE);
    for ch in identifier.chars() {
        if ch == IDENTIFIER_QUOTE {
            quoted.push(IDENTIFIER_QUOTE);
        }
        quoted.push(ch);
    }
    quoted.push(IDENTIFIER_QUOTE);
    quoted
}

/// Reverse of [`quote_identifier`]; `None` if the text is not a well-formed
/// quoted identifier
pub fn unquote_identifier(quoted: &str) -> Option<String> {
    let inner = quoted
        .strip_prefix(IDENTIFIER_QUOTE)?
        .strip_suffix(IDENTIFIER_QUOTE)?;

    let mut name = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(ch) = chars.next() {
        if ch == IDENTIFIER_QUOTE && chars.next() != Some(IDENTIFIER_QUOTE) {
            return None;
        }
        name.push(ch);
    }
    Some(name)
}

/// Quote a name that must not be empty; `kind` names it in the error
pub fn quote_name(kind: &'static str, name: &str) -> Result<String> {
    if name.is_empty() {
        return Err(Error::empty_identifier(kind));
    }
    Ok(quote_identifier(name))
}

/// Quote a table reference as `"schema"."name"` or `"name"`
pub fn quote_table(table: &TableReference) -> Result<String> {
    let name = quote_name("table", &table.name)?;
    match &table.schema {
        Some(schema) => Ok(format!("{}.{}", quote_name("schema", schema)?, name)),
        None => Ok(name),
    }
}
