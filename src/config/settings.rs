//! Runtime settings for the marketplace service.
//!
//! Values come from the `[marketplace]` table of the config file and can be
//! overridden through environment variables (a `.env` file is honoured).

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::PathBuf;
use std::time::Duration;

/// Environment variable naming the config file.
pub const CONFIG_PATH_VAR: &str = "ZEROSAVER_CONFIG";
/// Config file used when [`CONFIG_PATH_VAR`] is not set.
pub const DEFAULT_CONFIG_PATH: &str = "config.toml";
/// Environment variable overriding the sweep interval, in seconds.
pub const SWEEP_INTERVAL_VAR: &str = "ZEROSAVER_SWEEP_INTERVAL_SECS";
/// Sweep interval used when neither file nor environment sets one.
pub const DEFAULT_SWEEP_INTERVAL_SECS: u64 = 10;
/// Consumer id the demo walkthrough reserves as.
pub const DEFAULT_DEMO_CONSUMER: &str = "demo-consumer";

/// The `[marketplace]` table.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MarketplaceSettings {
    /// Seconds between expiry sweeps
    pub sweep_interval_secs: u64,
    /// Consumer id used by the start-up walkthrough
    pub demo_consumer: String,
}

impl Default for MarketplaceSettings {
    fn default() -> Self {
        Self {
            sweep_interval_secs: DEFAULT_SWEEP_INTERVAL_SECS,
            demo_consumer: DEFAULT_DEMO_CONSUMER.to_string(),
        }
    }
}

impl MarketplaceSettings {
    /// Interval between expiry sweeps.
    #[must_use]
    pub const fn sweep_interval(&self) -> Duration {
        Duration::from_secs(self.sweep_interval_secs)
    }

    /// Applies an optional sweep-interval override and checks the result.
    ///
    /// # Errors
    /// Returns [`Error::Config`] if the override is not a number or the interval is zero.
    pub fn with_overrides(mut self, sweep_interval_secs: Option<&str>) -> Result<Self> {
        if let Some(raw) = sweep_interval_secs {
            self.sweep_interval_secs = raw.trim().parse().map_err(|e| Error::Config {
                message: format!("{SWEEP_INTERVAL_VAR} must be a whole number of seconds: {e}"),
            })?;
        }
        if self.sweep_interval_secs == 0 {
            return Err(Error::Config {
                message: "Sweep interval must be at least one second".to_string(),
            });
        }
        Ok(self)
    }

    /// Applies the overrides found in the process environment.
    ///
    /// # Errors
    /// See [`MarketplaceSettings::with_overrides`].
    pub fn with_env_overrides(self) -> Result<Self> {
        let sweep = std::env::var(SWEEP_INTERVAL_VAR).ok();
        self.with_overrides(sweep.as_deref())
    }
}

/// Path of the config file: `ZEROSAVER_CONFIG` or `./config.toml`.
#[must_use]
pub fn get_config_path() -> PathBuf {
    std::env::var(CONFIG_PATH_VAR)
        .map_or_else(|_| PathBuf::from(DEFAULT_CONFIG_PATH), PathBuf::from)
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;

    #[test]
    fn test_defaults() {
        let settings = MarketplaceSettings::default();
        assert_eq!(settings.sweep_interval(), Duration::from_secs(10));
        assert_eq!(settings.demo_consumer, "demo-consumer");
    }

    #[test]
    fn test_sweep_override() {
        let settings = MarketplaceSettings::default()
            .with_overrides(Some(" 3 "))
            .unwrap();
        assert_eq!(settings.sweep_interval_secs, 3);

        let unchanged = MarketplaceSettings::default().with_overrides(None).unwrap();
        assert_eq!(unchanged, MarketplaceSettings::default());
    }

    #[test]
    fn test_invalid_sweep_override() {
        assert!(matches!(
            MarketplaceSettings::default().with_overrides(Some("soon")),
            Err(Error::Config { .. })
        ));
        assert!(matches!(
            MarketplaceSettings::default().with_overrides(Some("0")),
            Err(Error::Config { .. })
        ));
    }
}
