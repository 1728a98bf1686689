//! Process-level defaults for date range construction.
//!
//! Defaults come from three environment variables, read once per process by
//! [`KronosConfig::global`]. Every builder accepts an explicit config, so
//! tests and embedding applications never need to touch the environment.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::error::{KronosError, Result};
use crate::preset::NamedRange;

/// Environment variable holding the default timezone name.
pub const ENV_TIMEZONE: &str = "KRONOS_TIMEZONE";
/// Environment variable holding the default strftime pattern.
pub const ENV_FORMAT: &str = "KRONOS_FORMAT";
/// Environment variable holding the default named range.
pub const ENV_DATERANGE: &str = "KRONOS_DATERANGE";

pub const DEFAULT_TIMEZONE: &str = "UTC";
pub const DEFAULT_FORMAT: &str = "%Y-%m-%d";
pub const DEFAULT_DATERANGE: &str = "LATEST";

/// Defaults applied when a builder leaves timezone, format or range unset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KronosConfig {
    /// IANA timezone name.
    pub timezone: String,
    /// strftime pattern used for parsing string bounds and default rendering.
    pub format: String,
    /// Named range resolved when neither bound is given.
    pub daterange: String,
}

impl Default for KronosConfig {
    fn default() -> Self {
        Self {
            timezone: DEFAULT_TIMEZONE.to_string(),
            format: DEFAULT_FORMAT.to_string(),
            daterange: DEFAULT_DATERANGE.to_string(),
        }
    }
}

static GLOBAL: OnceLock<KronosConfig> = OnceLock::new();

impl KronosConfig {
    /// Read `KRONOS_TIMEZONE`, `KRONOS_FORMAT` and `KRONOS_DATERANGE`,
    /// falling back to `UTC`, `%Y-%m-%d` and `LATEST`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build a config from an arbitrary key lookup. Empty values count as unset.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let read = |key: &str, default: &str| {
            lookup(key)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
                .unwrap_or_else(|| default.to_string())
        };

        let config = Self {
            timezone: read(ENV_TIMEZONE, DEFAULT_TIMEZONE),
            format: read(ENV_FORMAT, DEFAULT_FORMAT),
            daterange: read(ENV_DATERANGE, DEFAULT_DATERANGE),
        };
        tracing::debug!(
            timezone = %config.timezone,
            format = %config.format,
            daterange = %config.daterange,
            "loaded kronos configuration"
        );
        config
    }

    /// The process-wide config, read from the environment on first access.
    pub fn global() -> &'static KronosConfig {
        GLOBAL.get_or_init(Self::from_env)
    }

    /// Resolve the configured default range name.
    ///
    /// # Errors
    ///
    /// Returns [`KronosError::Config`] naming `KRONOS_DATERANGE` and listing
    /// the accepted values if the name is not a registered preset.
    pub fn named_range(&self) -> Result<NamedRange> {
        self.daterange.parse::<NamedRange>().map_err(|_| {
            KronosError::Config(format!(
                "`{}` value '{}' is invalid. Accepted values: {}",
                ENV_DATERANGE,
                self.daterange,
                NamedRange::valid_names().join(", ")
            ))
        })
    }
}
