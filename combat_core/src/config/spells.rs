//! Spell configuration loading

use super::ConfigError;
use crate::spell::{SpellDefinition, SpellTable};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::warn;

/// Container for spell definitions
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SpellsConfig {
    #[serde(rename = "spells")]
    pub spells: Vec<SpellDefinition>,
}

/// Load spell definitions from a TOML file
pub fn load_spell_configs(path: &Path) -> Result<SpellTable, ConfigError> {
    let config: SpellsConfig = super::load_toml(path)?;
    build_table(config)
}

/// Load spell definitions from a TOML string
pub fn parse_spell_configs(content: &str) -> Result<SpellTable, ConfigError> {
    let config: SpellsConfig = super::parse_toml(content)?;
    build_table(config)
}

fn build_table(config: SpellsConfig) -> Result<SpellTable, ConfigError> {
    let mut table = SpellTable::new();
    for spell in config.spells {
        if table.contains(&spell.id) {
            return Err(ConfigError::ValidationError(format!("duplicate spell id '{}'", spell.id)));
        }
        table.register(spell);
    }
    Ok(table)
}

/// Get the bundled spells; always contains `basic_attack`
pub fn default_spell_table() -> SpellTable {
    let toml = include_str!("../../config/spells.toml");
    let mut table = parse_spell_configs(toml).unwrap_or_else(|err| {
        warn!(error = %err, "bundled spells failed to parse");
        SpellTable::new()
    });
    if table.get("basic_attack").is_none() {
        table.register(SpellDefinition::basic_attack());
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::{EffectTarget, EffectTrigger, MagnitudeBasis};
    use crate::types::{DamageKind, DamageType, SpellIntent};

    #[test]
    fn test_parse_spells() {
        let toml = r#"
[[spells]]
id = "fireball"
name = "Fireball"
kind = "magical"
damage_type = "fire"
damage = { base = 18.0, per_level = 4.0 }
power_scaling = 0.8
mana_cost = { base = 12.0, per_level = 2.0 }
cooldown = 1
base_action_speed = 0.8

[[spells.effects]]
effect_id = "burn"
chance = { base = 30.0, per_level = 5.0 }
duration = 3
magnitude = { percent = 20.0, basis = "damage_dealt" }

[[spells.effects]]
effect_id = "empower"
trigger = "on_cast"
target = "caster"
"#;

        let table = parse_spell_configs(toml).unwrap();
        let fireball = table.get("fireball").unwrap();
        assert_eq!(fireball.kind, DamageKind::Magical);
        assert_eq!(fireball.damage_type, DamageType::Fire);
        assert_eq!(fireball.intent, SpellIntent::Damage);
        assert_eq!(fireball.effects.len(), 2);

        let burn = &fireball.effects[0];
        assert_eq!(burn.trigger, EffectTrigger::OnHit);
        assert_eq!(burn.magnitude.basis, MagnitudeBasis::DamageDealt);
        assert!((burn.chance.at(3) - 40.0).abs() < f64::EPSILON);
        assert_eq!(burn.duration_at(1), 3);

        let empower = &fireball.effects[1];
        assert_eq!(empower.trigger, EffectTrigger::OnCast);
        assert_eq!(empower.target, EffectTarget::Caster);

        let resolved = fireball.resolve(2);
        assert!((resolved.damage - 22.0).abs() < f64::EPSILON);
        assert_eq!(resolved.mana_cost, 14);
    }

    #[test]
    fn test_duplicate_spell_rejected() {
        let toml = r#"
[[spells]]
id = "zap"
name = "Zap"

[[spells]]
id = "zap"
name = "Zap Again"
"#;
        assert!(matches!(parse_spell_configs(toml), Err(ConfigError::ValidationError(_))));
    }

    #[test]
    fn test_default_spells_load() {
        let table = default_spell_table();
        for id in ["basic_attack", "fireball", "frostbolt", "heal", "rend", "shield_bash", "war_cry", "siphon"] {
            assert!(table.get(id).is_some(), "Missing spell: {}", id);
        }
    }
}
