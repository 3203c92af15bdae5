//! Destination table identifiers.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CrawlError;

/// Maximum length of a single identifier part.
const MAX_PART_LEN: usize = 128;

/// A `NAME` or `LIBRARY.NAME` table identifier.
///
/// Parts are folded to upper case the way unquoted identifiers are, so
/// `tmp.dircrawl` and `TMP.DIRCRAWL` name the same table.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TableName {
    library: Option<String>,
    name: String,
}

impl TableName {
    /// Parse and validate a table identifier.
    pub fn parse(input: &str) -> Result<Self, CrawlError> {
        let trimmed = input.trim();
        let mut parts = trimmed.split('.');
        let first = parts.next().unwrap_or_default();
        let second = parts.next();
        if parts.next().is_some() {
            return Err(CrawlError::invalid_argument(format!(
                "Table identifier '{input}' has too many qualifiers (expected LIBRARY.NAME)"
            )));
        }

        let (library, name) = match second {
            Some(name) => (Some(validate_part(input, first)?), validate_part(input, name)?),
            None => (None, validate_part(input, first)?),
        };

        Ok(Self { library, name })
    }

    /// Library (schema) qualifier, if one was given.
    pub fn library(&self) -> Option<&str> {
        self.library.as_deref()
    }

    /// Unqualified table name.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The identifier as it appears in SQL text.
    ///
    /// The qualified name is emitted as a single quoted identifier. Parts are
    /// validated so they never contain a double quote.
    pub fn to_sql(&self) -> String {
        format!("\"{self}\"")
    }
}

fn validate_part(input: &str, part: &str) -> Result<String, CrawlError> {
    let invalid = |reason: &str| {
        CrawlError::invalid_argument(format!("Table identifier '{input}' is malformed: {reason}"))
    };

    if part.is_empty() {
        return Err(invalid("empty name part"));
    }
    if part.chars().count() > MAX_PART_LEN {
        return Err(invalid("name part longer than 128 characters"));
    }

    let mut chars = part.chars();
    let first = chars.next().unwrap_or_default();
    if !(first.is_ascii_alphabetic() || is_special(first)) {
        return Err(invalid("name must start with a letter or _ $ # @"));
    }
    if let Some(bad) = chars.find(|c| !(c.is_ascii_alphanumeric() || is_special(*c))) {
        return Err(invalid(&format!("unexpected character '{bad}'")));
    }

    Ok(part.to_ascii_uppercase())
}

fn is_special(c: char) -> bool {
    matches!(c, '_' | '$' | '#' | '@')
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.library {
            Some(library) => write!(f, "{library}.{}", self.name),
            None => f.write_str(&self.name),
        }
    }
}

impl FromStr for TableName {
    type Err = CrawlError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for TableName {
    type Error = CrawlError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<TableName> for String {
    fn from(table: TableName) -> Self {
        table.to_string()
    }
}
