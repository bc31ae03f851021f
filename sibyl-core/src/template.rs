//! Single-pass placeholder substitution
//!
//! Statement shapes are written as templates with `{name}` placeholders.
//! Every bound fragment must already be quoted or escaped. Substitution walks
//! the template once and copies fragments into the output without scanning
//! them again, so a value that happens to contain `{table}` is emitted as-is.

use crate::{Error, Result};

/// Fragments bound to placeholder names
#[derive(Debug, Clone, Default)]
pub struct Bindings<'a> {
    entries: Vec<(&'a str, String)>,
}

impl<'a> Bindings<'a> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bind a fragment to a placeholder; a later binding of the same name wins
    pub fn bind(mut self, name: &'a str, fragment: impl Into<String>) -> Self {
        let fragment = fragment.into();
        match self.entries.iter_mut().find(|(bound, _)| *bound == name) {
            Some(entry) => entry.1 = fragment,
            None => self.entries.push((name, fragment)),
        }
        self
    }

    fn get(&self, name: &str) -> Option<&str> {
        self.entries
            .iter()
            .find(|(bound, _)| *bound == name)
            .map(|(_, fragment)| fragment.as_str())
    }

    fn fragment_len(&self) -> usize {
        self.entries.iter().map(|(_, fragment)| fragment.len()).sum()
    }
}

/// Fill every placeholder in `template`.
///
/// A `{` that does not open a well-formed placeholder is copied literally.
///
/// # Examples
/// ```
/// use sibyl_core::template::{render, Bindings};
///
/// let sql = render(
///     "DROP TABLE {table}",
///     &Bindings::new().bind("table", "\"users\""),
/// )
/// .unwrap();
/// assert_eq!(sql, "DROP TABLE \"users\"");
/// ```
pub fn render(template: &str, bindings: &Bindings<'_>) -> Result<String> {
    let mut out = String::with_capacity(template.len() + bindings.fragment_len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];

        match after.find('}') {
            Some(close) if is_placeholder_name(&after[..close]) => {
                let name = &after[..close];
                let fragment = bindings
                    .get(name)
                    .ok_or_else(|| Error::unresolved_placeholder(name))?;
                out.push_str(fragment);
                rest = &after[close + 1..];
            }
            _ => {
                out.push('{');
                rest = after;
            }
        }
    }

    out.push_str(rest);
    Ok(out)
}

fn is_placeholder_name(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
