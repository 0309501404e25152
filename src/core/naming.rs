//! Name grammar shared by property names and kinds.

use crate::core::{BeanError, Result};
use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VALID_NAME_RE: Regex =
        Regex::new(r"^[a-z0-9_]+$").expect("static name pattern compiles");
}

/// Checks that `name` is a non-empty snake_case identifier (`[a-z0-9_]+`).
///
/// Pure and safe to call from any thread.
///
/// # Examples
///
/// ```
/// use rustbean::core::validate_name;
///
/// assert!(validate_name("created_at").is_ok());
/// assert!(validate_name("CreatedAt").is_err());
/// ```
pub fn validate_name(name: &str) -> Result<()> {
    if name.trim().is_empty() {
        return Err(BeanError::EmptyName);
    }

    if !VALID_NAME_RE.is_match(name) {
        return Err(BeanError::InvalidName(name.to_string()));
    }

    Ok(())
}
