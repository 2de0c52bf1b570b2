//! Shop settings and catalog seed loading from config.toml
//!
//! This module provides functionality to load shop configuration (order
//! rules, pricing defaults, message lifecycle tuning) and initial catalog
//! items from a TOML configuration file. The catalog entries defined in
//! config.toml are used to seed the database on first run.

use crate::errors::{Error, Result};
use serde::Deserialize;
use std::path::Path;

/// Configuration structure representing the entire config.toml file
#[derive(Debug, Deserialize)]
pub struct Config {
    /// Shop-wide settings
    #[serde(default)]
    pub shop: ShopSettings,
    /// List of catalog items to seed
    #[serde(default)]
    pub catalog: Vec<CatalogItemConfig>,
}

/// Shop-wide tunable settings
#[derive(Debug, Deserialize, Clone)]
pub struct ShopSettings {
    /// Minimum friendship age in days before an account can receive gifts
    #[serde(default = "default_min_friendship_days")]
    pub min_friendship_days: i64,
    /// Default EUR price of one RP (overridable at runtime via `/price`)
    #[serde(default = "default_eur_per_rp")]
    pub eur_per_rp: f64,
    /// Maximum age in minutes before a tracked client message goes stale
    #[serde(default = "default_message_max_age_minutes")]
    pub message_max_age_minutes: i64,
    /// Interval in minutes between message cache expiry sweeps
    #[serde(default = "default_cache_sweep_minutes")]
    pub cache_sweep_minutes: u64,
}

/// Configuration for a single seeded catalog item
#[derive(Debug, Deserialize, Clone)]
pub struct CatalogItemConfig {
    /// Display name of the item
    pub name: String,
    /// Browsing category
    pub category: String,
    /// Price in RP
    pub price_rp: i64,
    /// Optional splash/preview image URL
    pub image_url: Option<String>,
}

const fn default_min_friendship_days() -> i64 {
    7
}

const fn default_eur_per_rp() -> f64 {
    0.01
}

const fn default_message_max_age_minutes() -> i64 {
    60
}

const fn default_cache_sweep_minutes() -> u64 {
    30
}

impl Default for ShopSettings {
    fn default() -> Self {
        Self {
            min_friendship_days: default_min_friendship_days(),
            eur_per_rp: default_eur_per_rp(),
            message_max_age_minutes: default_message_max_age_minutes(),
            cache_sweep_minutes: default_cache_sweep_minutes(),
        }
    }
}

/// Loads shop configuration from a TOML file
///
/// # Arguments
/// * `path` - Path to the config.toml file
///
/// # Errors
/// Returns an error if:
/// - The file cannot be read
/// - The TOML syntax is invalid
/// - A catalog entry is missing required fields
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let contents = std::fs::read_to_string(path.as_ref()).map_err(|e| Error::Config {
        message: format!("Failed to read config file: {e}"),
    })?;

    let config: Config = toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config.toml: {e}"),
    })?;

    if config.shop.eur_per_rp <= 0.0 {
        return Err(Error::Config {
            message: format!("eur_per_rp must be positive, got {}", config.shop.eur_per_rp),
        });
    }
    if config.shop.min_friendship_days < 0 {
        return Err(Error::Config {
            message: format!(
                "min_friendship_days cannot be negative, got {}",
                config.shop.min_friendship_days
            ),
        });
    }

    Ok(config)
}

/// Loads shop configuration from the default location (./config.toml),
/// falling back to built-in defaults when the file does not exist.
pub fn load_default_config() -> Result<Config> {
    if Path::new("config.toml").exists() {
        load_config("config.toml")
    } else {
        Ok(Config {
            shop: ShopSettings::default(),
            catalog: Vec::new(),
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_parse_shop_config() {
        let toml_str = r#"
            [shop]
            min_friendship_days = 10
            eur_per_rp = 0.008

            [[catalog]]
            name = "Dragon Slayer"
            category = "CHAMPION_SKIN"
            price_rp = 1350
            image_url = "https://example.com/dragon.png"

            [[catalog]]
            name = "Ruby Chroma"
            category = "CHROMA"
            price_rp = 290
        "#;

        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.shop.min_friendship_days, 10);
        assert_eq!(config.shop.eur_per_rp, 0.008);
        // Unspecified settings fall back to defaults
        assert_eq!(config.shop.message_max_age_minutes, 60);
        assert_eq!(config.shop.cache_sweep_minutes, 30);

        assert_eq!(config.catalog.len(), 2);
        assert_eq!(config.catalog[0].name, "Dragon Slayer");
        assert_eq!(config.catalog[0].price_rp, 1350);
        assert!(config.catalog[1].image_url.is_none());
    }

    #[test]
    fn test_defaults_when_sections_missing() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.shop.min_friendship_days, 7);
        assert_eq!(config.shop.eur_per_rp, 0.01);
        assert!(config.catalog.is_empty());
    }
}
