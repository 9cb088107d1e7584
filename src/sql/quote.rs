//! Identifier validation and quoting
//!
//! SQL identifiers cannot be parameterized in prepared statements, so any
//! dynamic table or column name has to be quoted into the statement text.
//! Every identifier that reaches generated SQL goes through here.

use crate::error::{BlueGreenError, Result};

/// Conservative maximum identifier length across common backends
/// (PostgreSQL 63, MySQL 64, SQL Server 128).
const MAX_IDENTIFIER_LENGTH: usize = 128;

/// Validate an identifier before quoting.
///
/// Rejects empty identifiers, identifiers containing null bytes, and
/// identifiers exceeding the maximum length.
pub fn validate_identifier(name: &str) -> Result<()> {
    if name.is_empty() {
        return Err(BlueGreenError::InvalidIdentifier(
            "identifier cannot be empty".to_string(),
        ));
    }

    if name.contains('\0') {
        return Err(BlueGreenError::InvalidIdentifier(format!(
            "identifier contains a null byte: {name:?}"
        )));
    }

    if name.len() > MAX_IDENTIFIER_LENGTH {
        return Err(BlueGreenError::InvalidIdentifier(format!(
            "identifier exceeds {MAX_IDENTIFIER_LENGTH} bytes ({} bytes): {name:?}",
            name.len()
        )));
    }

    Ok(())
}

/// Quote an SQL identifier.
///
/// Wraps the name in double quotes and doubles any embedded double quote,
/// so the name can never escape its delimiters.
///
/// # Examples
///
/// ```
/// use bluegreen::sql::quote_identifier;
///
/// assert_eq!(quote_identifier("users").unwrap(), "\"users\"");
/// assert_eq!(quote_identifier("odd\"name").unwrap(), "\"odd\"\"name\"");
/// ```
pub fn quote_identifier(name: &str) -> Result<String> {
    validate_identifier(name)?;
    Ok(format!("\"{}\"", name.replace('"', "\"\"")))
}

/// Quote several identifiers at once, preserving order.
pub fn quote_identifiers<S: AsRef<str>>(names: &[S]) -> Result<Vec<String>> {
    names.iter().map(|n| quote_identifier(n.as_ref())).collect()
}
