//! Entity name validation.
//!
//! Entity names are opaque, case-sensitive identifiers ("Acme",
//! "One-ManShop", "Account-10"). They are never normalized; the only
//! requirement is that a name handed to a public operation is not blank.

use crate::error::{Error, Result};

/// Validate a name passed to a public operation.
///
/// Returns the name unchanged on success. A blank name is a programmer
/// error and yields [`Error::InvalidArgument`].
///
/// # Examples
///
/// ```
/// use hierac_core::util::names::validate_name;
///
/// assert_eq!(validate_name("Administrator", "Ben").unwrap(), "Ben");
/// assert!(validate_name("Administrator", "   ").is_err());
/// ```
pub fn validate_name<'a>(kind: &str, name: &'a str) -> Result<&'a str> {
    if name.trim().is_empty() {
        return Err(Error::invalid_argument(format!(
            "{kind} name must not be empty"
        )));
    }
    if name.chars().any(char::is_control) {
        return Err(Error::invalid_argument(format!(
            "{kind} name contains control characters: {name:?}"
        )));
    }
    Ok(name)
}
