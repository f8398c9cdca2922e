//! Effect configuration loading

use super::ConfigError;
use crate::effect::{EffectDefinition, EffectRegistry};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Container for effect definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EffectsConfig {
    #[serde(rename = "effects")]
    pub effects: Vec<EffectDefinition>,
}

/// Load effect definitions from a TOML file
pub fn load_effect_configs(path: &Path) -> Result<EffectRegistry, ConfigError> {
    let config: EffectsConfig = super::load_toml(path)?;
    Ok(build_registry(config))
}

/// Load effect definitions from a TOML string
pub fn parse_effect_configs(content: &str) -> Result<EffectRegistry, ConfigError> {
    let config: EffectsConfig = super::parse_toml(content)?;
    Ok(build_registry(config))
}

/// Malformed definitions are logged and left out
fn build_registry(config: EffectsConfig) -> EffectRegistry {
    let mut registry = EffectRegistry::new();
    for effect in config.effects {
        if let Err(err) = effect.validate() {
            warn!(effect = %effect.id, error = %err, "skipping malformed effect definition");
            continue;
        }
        registry.register(effect);
    }
    registry
}

/// Get the bundled effect definitions
pub fn default_effect_registry() -> EffectRegistry {
    let toml = include_str!("../../config/effects.toml");
    parse_effect_configs(toml).unwrap_or_else(|err| {
        warn!(error = %err, "bundled effects failed to parse");
        EffectRegistry::new()
    })
}
