//! Hierarchical access-control resolution for Hierac.
//!
//! This crate provides:
//!
//! - [`model`]: grants, denials and resources read from a permission graph
//! - [`resolver`]: [`AccessResolver`] and [`AccessSession`], the forward and
//!   reverse access queries
//! - [`index`]: a precomputed resource-to-company map for faster checks
//! - `duality` (feature `test-utils`): forward/reverse consistency checks
//!
//! The graph itself comes from `hierac-graph`; this crate never mutates it.

#![doc = include_str!("../README.md")]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![forbid(unsafe_code)]

#[cfg(any(test, feature = "test-utils"))]
pub mod duality;
pub mod error;
pub mod index;
pub mod model;
pub mod resolver;

pub use error::{Error, OrEmpty, Result};
pub use hierac_core::{AclConfig, DEFAULT_MAX_HOPS};
pub use index::{IndexStats, ResourceIndex};
pub use model::{AccessCount, AdminPermissions, Denial, Grant, GroupPermissions, Resource};
pub use resolver::{AccessResolver, AccessSession, ResourcePair};
