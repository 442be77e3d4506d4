//! Hierac Core: shared errors, configuration, and utilities.
//!
//! This crate provides the foundational types used across all Hierac crates.
//! It has no internal Hierac dependencies (dependency level 0).
//!
//! # Modules
//!
//! - [`error`]: Error types and Result alias
//! - [`config`]: Resolver configuration (hop cap, not-found folding)
//! - [`util`]: Name validation helpers

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod util;

// Re-export key types at crate root for convenience
pub use config::{AclConfig, DEFAULT_MAX_HOPS, MAX_HOP_CEILING};
pub use error::{Error, Result};
pub use util::names::validate_name;
