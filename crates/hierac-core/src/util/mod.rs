//! Utility modules.
//!
//! # Modules
//!
//! - [`names`]: Validation of entity names passed to public operations

pub mod names;
