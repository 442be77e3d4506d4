//! Resolver configuration.
//!
//! [`AclConfig`] carries the parameters of the resolution algorithm. The
//! only algorithmic parameter is the hop cap, which bounds both how far an
//! inherit grant reaches down the company hierarchy and how far up a
//! denial is searched for.
//!
//! # Example
//!
//! ```rust
//! use hierac_core::config::{AclConfig, DEFAULT_MAX_HOPS};
//!
//! let config = AclConfig::from_toml_str("max_hops = 2").unwrap();
//! assert_eq!(config.max_hops, 2);
//!
//! let defaults = AclConfig::default();
//! assert_eq!(defaults.max_hops, DEFAULT_MAX_HOPS);
//! ```

use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Hop cap applied to every hierarchy traversal unless configured otherwise.
pub const DEFAULT_MAX_HOPS: usize = 3;

/// Largest hop cap a configuration may request.
pub const MAX_HOP_CEILING: usize = 10;

/// Configuration for the access resolver.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AclConfig {
    /// Maximum number of `CHILD_OF` hops followed from a grant or denial
    /// target.
    pub max_hops: usize,

    /// Fold `NotFound` into empty results at the operation boundary.
    pub fold_not_found: bool,
}

impl Default for AclConfig {
    fn default() -> Self {
        Self {
            max_hops: DEFAULT_MAX_HOPS,
            fold_not_found: false,
        }
    }
}

impl AclConfig {
    /// Sets the hop cap.
    pub fn with_max_hops(mut self, max_hops: usize) -> Self {
        self.max_hops = max_hops;
        self
    }

    /// Enables or disables folding of `NotFound` into empty results.
    pub fn with_fold_not_found(mut self, fold: bool) -> Self {
        self.fold_not_found = fold;
        self
    }

    /// Checks that the configuration describes a usable resolver.
    pub fn validate(&self) -> Result<()> {
        if self.max_hops == 0 {
            return Err(Error::config("max_hops must be at least 1"));
        }
        if self.max_hops > MAX_HOP_CEILING {
            return Err(Error::config(format!(
                "max_hops {} exceeds the ceiling of {MAX_HOP_CEILING}",
                self.max_hops
            )));
        }
        Ok(())
    }

    /// Parses and validates a configuration from a TOML document.
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let config: AclConfig = toml::from_str(content)
            .map_err(|e| Error::config(format!("Failed to parse configuration: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a configuration from a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content =
            std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;
        let config = Self::from_toml_str(&content)?;
        log::debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Serializes the configuration as pretty TOML.
    pub fn to_toml_string(&self) -> Result<String> {
        toml::to_string_pretty(self).map_err(|e| Error::config(e.to_string()))
    }
}
