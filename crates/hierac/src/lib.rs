//! Hierac hierarchical access control: umbrella crate.
//!
//! This crate re-exports all Hierac components for convenience.
//! Use feature flags to enable specific functionality.

#![doc = include_str!("../README.md")]

pub use hierac_core as core;
pub use hierac_graph as graph;

#[cfg(feature = "acl")]
pub use hierac_acl as acl;
