//! Configuration loading from `config.toml` and the environment.
//!
//! The file carries the `[marketplace]` settings, the `[impact]` coefficients
//! and the seed partners and deals. Every section is optional.

/// Seed partners and deals
pub mod seed;
/// Marketplace runtime settings and environment overrides
pub mod settings;

use crate::{
    core::impact::ImpactFactors,
    errors::{Error, Result},
};
use seed::{DealSeed, PartnerSeed};
use serde::Deserialize;
use settings::MarketplaceSettings;
use std::path::Path;

/// Configuration structure representing the entire config file
#[derive(Debug, Default, Deserialize)]
pub struct AppConfig {
    /// Runtime settings
    #[serde(default)]
    pub marketplace: MarketplaceSettings,
    /// Impact estimate coefficients
    #[serde(default)]
    pub impact: ImpactFactors,
    /// Partners to create on start-up
    #[serde(default)]
    pub partners: Vec<PartnerSeed>,
    /// Deals to publish on start-up
    #[serde(default)]
    pub deals: Vec<DealSeed>,
}

/// Loads the configuration from a TOML file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A field has the wrong type or an unknown category/dietary value
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<AppConfig> {
    let path = path.as_ref();
    tracing::debug!("Attempting to load configuration from: {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {}: {e}", path.display()),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse {}: {e}", path.display()),
    })
}

/// Loads the configuration named by the environment and applies environment overrides.
///
/// # Errors
/// Returns an error if the file cannot be loaded or an override is invalid.
pub fn load_app_configuration() -> Result<AppConfig> {
    let path = settings::get_config_path();
    let mut config = load_config(&path)?;
    config.marketplace = config.marketplace.with_env_overrides()?;
    tracing::info!(
        path = %path.display(),
        partners = config.partners.len(),
        deals = config.deals.len(),
        "Configuration loaded"
    );
    Ok(config)
}
