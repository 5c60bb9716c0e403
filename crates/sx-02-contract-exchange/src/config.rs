//! Exchange configuration from environment variables.

use std::env;

/// Runtime settings for the exchange service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExchangeConfig {
    /// Version string written at initialization.
    pub version: String,

    /// State key the version is stored under.
    pub version_key: String,

    /// Leading key of the open-contract and selected-bid indexes.
    pub index_partition: String,

    /// Drop and recreate every table on initialization.
    pub reset_on_init: bool,
}

impl Default for ExchangeConfig {
    fn default() -> Self {
        Self {
            version: crate::VERSION.to_string(),
            version_key: "version".to_string(),
            index_partition: "2016".to_string(),
            reset_on_init: false,
        }
    }
}

impl ExchangeConfig {
    /// Create configuration from environment variables.
    ///
    /// # Environment Variables
    ///
    /// - `SX_VERSION`: Version marker (default: crate version)
    /// - `SX_VERSION_KEY`: State key for the marker (default: version)
    /// - `SX_INDEX_PARTITION`: Index partition token (default: 2016)
    /// - `SX_RESET_ON_INIT`: Drop tables on initialization (default: false)
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            version: env::var("SX_VERSION").unwrap_or(defaults.version),

            version_key: env::var("SX_VERSION_KEY").unwrap_or(defaults.version_key),

            index_partition: env::var("SX_INDEX_PARTITION")
                .ok()
                .filter(|v| !v.is_empty())
                .unwrap_or(defaults.index_partition),

            reset_on_init: env::var("SX_RESET_ON_INIT")
                .map(|v| v.eq_ignore_ascii_case("true") || v == "1")
                .unwrap_or(defaults.reset_on_init),
        }
    }
}
