//! Combat constants configuration
//!
//! These are content-tunable numbers read by the resolution rules. None of them
//! change the shape of the pipeline.

use crate::types::Tier;
use serde::{Deserialize, Serialize};

/// Tunable combat constants
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatConstants {
    #[serde(default)]
    pub hit: HitConstants,
    #[serde(default)]
    pub damage: DamageConstants,
    #[serde(default)]
    pub tiers: TierMultipliers,
    #[serde(default)]
    pub derived: DerivedScaling,
    #[serde(default)]
    pub xp: XpConstants,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HitConstants {
    /// Hit chance floor after all hit rules (percent)
    #[serde(default = "default_min_hit_chance")]
    pub min_chance: f64,
    /// Hit chance ceiling after all hit rules (percent)
    #[serde(default = "default_max_hit_chance")]
    pub max_chance: f64,
    /// Hit chance lost per power level the defender is above the attacker
    #[serde(default = "default_hit_suppression")]
    pub suppression_per_level: f64,
}

impl Default for HitConstants {
    fn default() -> Self {
        HitConstants {
            min_chance: default_min_hit_chance(),
            max_chance: default_max_hit_chance(),
            suppression_per_level: default_hit_suppression(),
        }
    }
}

fn default_min_hit_chance() -> f64 {
    5.0
}
fn default_max_hit_chance() -> f64 {
    100.0
}
fn default_hit_suppression() -> f64 {
    4.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageConstants {
    /// Damage removed per point of defense
    #[serde(default = "default_defense_factor")]
    pub defense_factor: f64,
    /// Damage multiplier change per power level difference
    #[serde(default = "default_damage_suppression")]
    pub suppression_per_level: f64,
    /// Lowest multiplier suppression can produce
    #[serde(default = "default_min_suppression")]
    pub min_suppression_multiplier: f64,
    /// Highest multiplier suppression can produce
    #[serde(default = "default_max_suppression")]
    pub max_suppression_multiplier: f64,
    /// Final ± spread in percent
    #[serde(default = "default_variance")]
    pub variance_percent: f64,
}

impl Default for DamageConstants {
    fn default() -> Self {
        DamageConstants {
            defense_factor: default_defense_factor(),
            suppression_per_level: default_damage_suppression(),
            min_suppression_multiplier: default_min_suppression(),
            max_suppression_multiplier: default_max_suppression(),
            variance_percent: default_variance(),
        }
    }
}

fn default_defense_factor() -> f64 {
    0.5
}
fn default_damage_suppression() -> f64 {
    0.05
}
fn default_min_suppression() -> f64 {
    0.25
}
fn default_max_suppression() -> f64 {
    1.5
}
fn default_variance() -> f64 {
    10.0
}

/// Multipliers applied to level for suppression and xp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TierMultipliers {
    pub normal: f64,
    pub elite: f64,
    pub boss: f64,
}

impl Default for TierMultipliers {
    fn default() -> Self {
        TierMultipliers {
            normal: 1.0,
            elite: 1.5,
            boss: 2.0,
        }
    }
}

impl TierMultipliers {
    pub fn get(&self, tier: Tier) -> f64 {
        match tier {
            Tier::Normal => self.normal,
            Tier::Elite => self.elite,
            Tier::Boss => self.boss,
        }
    }
}

/// How base attributes turn into derived stats
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DerivedScaling {
    pub base_hp: f64,
    pub hp_per_vitality: f64,
    pub hp_per_level: f64,
    pub base_mana: f64,
    pub mana_per_intellect: f64,
    pub mana_regen_per_spirit: f64,
    pub attack_power_per_strength: f64,
    pub magic_power_per_intellect: f64,
    pub physical_defense_per_vitality: f64,
    pub magical_defense_per_spirit: f64,
    pub base_attack_speed: f64,
    pub attack_speed_per_agility: f64,
    pub base_cast_speed: f64,
    pub cast_speed_per_intellect: f64,
    pub evasion_per_agility: f64,
}

impl Default for DerivedScaling {
    fn default() -> Self {
        DerivedScaling {
            base_hp: 50.0,
            hp_per_vitality: 10.0,
            hp_per_level: 5.0,
            base_mana: 30.0,
            mana_per_intellect: 5.0,
            mana_regen_per_spirit: 0.5,
            attack_power_per_strength: 2.0,
            magic_power_per_intellect: 2.0,
            physical_defense_per_vitality: 0.5,
            magical_defense_per_spirit: 0.5,
            base_attack_speed: 10.0,
            attack_speed_per_agility: 0.5,
            base_cast_speed: 10.0,
            cast_speed_per_intellect: 0.25,
            evasion_per_agility: 0.2,
        }
    }
}

/// Per-hit spell xp: `defender.level × tier_multiplier + base`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct XpConstants {
    pub base: f64,
}

impl Default for XpConstants {
    fn default() -> Self {
        XpConstants { base: 1.0 }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_constants() {
        let constants = CombatConstants::default();
        assert!((constants.hit.max_chance - 100.0).abs() < f64::EPSILON);
        assert!((constants.damage.min_suppression_multiplier - 0.25).abs() < f64::EPSILON);
        assert!((constants.tiers.get(Tier::Boss) - 2.0).abs() < f64::EPSILON);
        assert!((constants.xp.base - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_parse_partial_constants() {
        let toml = r#"
[hit]
min_chance = 10

[damage]
variance_percent = 0.0
defense_factor = 1.0

[tiers]
boss = 3.0
"#;

        let constants: CombatConstants = toml::from_str(toml).unwrap();
        assert!((constants.hit.min_chance - 10.0).abs() < f64::EPSILON);
        // unspecified fields keep their defaults
        assert!((constants.hit.max_chance - 100.0).abs() < f64::EPSILON);
        assert!((constants.damage.variance_percent - 0.0).abs() < f64::EPSILON);
        assert!((constants.tiers.boss - 3.0).abs() < f64::EPSILON);
        assert!((constants.tiers.elite - 1.5).abs() < f64::EPSILON);
        assert_eq!(constants.derived, DerivedScaling::default());
    }
}
