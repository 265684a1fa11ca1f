// Configuration for tag ID resolution
//
// Controls where the global ID space starts, how tables are ordered within
// it, and how large it may grow.

use crate::error::ResolveError;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Order in which tables are laid out in the global ID space
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableOrder {
    /// Tables receive offsets in the order they were first registered
    #[default]
    FirstSeen,
    /// Tables are sorted by [`TableKey`](crate::TableKey) first, so offsets
    /// do not depend on registration order
    Key,
}

/// Configuration for a [`Resolver`](crate::Resolver)
///
/// # Example
/// ```
/// use eprofiler::{ResolverConfig, TableOrder};
///
/// let config = ResolverConfig::default();
/// assert_eq!(config.base_offset, 0);
/// assert_eq!(config.table_order, TableOrder::FirstSeen);
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ResolverConfig {
    /// First global ID handed out
    ///
    /// Default: 0
    pub base_offset: usize,

    /// Table layout order
    ///
    /// Default: [`TableOrder::FirstSeen`]
    pub table_order: TableOrder,

    /// Exclusive upper bound on global IDs
    ///
    /// Set this to the capacity of the narrowest ID type your tables use
    /// (e.g. `256` for `u8` IDs) to get a resolver error instead of a table
    /// construction error when the program declares too many tags.
    ///
    /// Default: `usize::MAX`
    pub id_limit: usize,
}

impl Default for ResolverConfig {
    fn default() -> Self {
        Self {
            base_offset: 0,
            table_order: TableOrder::FirstSeen,
            id_limit: usize::MAX,
        }
    }
}

impl ResolverConfig {
    /// Offsets independent of registration order
    pub fn deterministic() -> Self {
        Self {
            table_order: TableOrder::Key,
            ..Self::default()
        }
    }

    /// Keep every ID below `id_limit`
    pub fn compact(id_limit: usize) -> Self {
        Self {
            id_limit,
            ..Self::default()
        }
    }

    /// Parse a TOML document
    ///
    /// Missing keys take their default values.
    pub fn from_toml_str(input: &str) -> Result<Self, ResolveError> {
        let config: ResolverConfig = toml::from_str(input)?;
        config.validate()?;
        Ok(config)
    }

    /// Load and validate a TOML configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ResolveError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_toml_str(&contents)
    }

    /// Validate configuration
    pub fn validate(&self) -> Result<(), ResolveError> {
        if self.base_offset >= self.id_limit {
            return Err(ResolveError::InvalidConfig(format!(
                "base_offset must be below id_limit, got {} >= {}",
                self.base_offset, self.id_limit
            )));
        }

        Ok(())
    }
}
