//! Configuration loading from TOML files

mod constants;
mod effects;
mod spells;

pub use constants::{CombatConstants, DamageConstants, DerivedScaling, HitConstants, TierMultipliers, XpConstants};
pub use effects::{default_effect_registry, load_effect_configs, parse_effect_configs};
pub use spells::{default_spell_table, load_spell_configs, parse_spell_configs};

use std::fs;
use std::path::Path;
use thiserror::Error;

/// Configuration loading error
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse TOML: {0}")]
    ParseError(#[from] toml::de::Error),
    #[error("Configuration validation error: {0}")]
    ValidationError(String),
}

/// Load a TOML file and deserialize it
pub fn load_toml<T: serde::de::DeserializeOwned>(path: &Path) -> Result<T, ConfigError> {
    let content = fs::read_to_string(path)?;
    let config: T = toml::from_str(&content)?;
    Ok(config)
}

/// Load a TOML string and deserialize it
pub fn parse_toml<T: serde::de::DeserializeOwned>(content: &str) -> Result<T, ConfigError> {
    let config: T = toml::from_str(content)?;
    Ok(config)
}

/// Load combat constants; missing fields keep their defaults
pub fn load_constants(path: &Path) -> Result<CombatConstants, ConfigError> {
    let constants: CombatConstants = load_toml(path)?;
    validate_constants(&constants)?;
    Ok(constants)
}

fn validate_constants(constants: &CombatConstants) -> Result<(), ConfigError> {
    let hit = &constants.hit;
    if hit.min_chance > hit.max_chance {
        return Err(ConfigError::ValidationError(format!(
            "hit.min_chance ({}) is above hit.max_chance ({})",
            hit.min_chance, hit.max_chance
        )));
    }
    let damage = &constants.damage;
    if damage.min_suppression_multiplier > damage.max_suppression_multiplier {
        return Err(ConfigError::ValidationError(format!(
            "damage.min_suppression_multiplier ({}) is above damage.max_suppression_multiplier ({})",
            damage.min_suppression_multiplier, damage.max_suppression_multiplier
        )));
    }
    if damage.variance_percent < 0.0 || damage.variance_percent >= 100.0 {
        return Err(ConfigError::ValidationError(format!(
            "damage.variance_percent ({}) must be in [0, 100)",
            damage.variance_percent
        )));
    }
    Ok(())
}
