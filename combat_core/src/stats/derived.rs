//! Base attributes and the derived combat stats computed from them

use super::StatModifiers;
use crate::config::DerivedScaling;
use crate::types::DamageKind;
use serde::{Deserialize, Serialize};

/// Primary attributes an actor is built from
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BaseStats {
    pub strength: f64,
    pub agility: f64,
    pub intellect: f64,
    pub vitality: f64,
    pub spirit: f64,
}

impl Default for BaseStats {
    fn default() -> Self {
        BaseStats {
            strength: 10.0,
            agility: 10.0,
            intellect: 10.0,
            vitality: 10.0,
            spirit: 10.0,
        }
    }
}

/// Snapshot of combat stats derived from base stats and level
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedStats {
    pub max_hp: f64,
    pub max_mana: f64,
    pub mana_regen: f64,
    pub attack_power: f64,
    pub magic_power: f64,
    pub physical_defense: f64,
    pub magical_defense: f64,
    pub attack_speed: f64,
    pub cast_speed: f64,
    /// Percentage points subtracted from incoming hit chance
    pub evasion: f64,
}

impl DerivedStats {
    /// Compute derived stats from base attributes and level
    pub fn from_base(base: &BaseStats, level: u32, scaling: &DerivedScaling) -> Self {
        let level = level.max(1) as f64;
        DerivedStats {
            max_hp: scaling.base_hp + base.vitality * scaling.hp_per_vitality + level * scaling.hp_per_level,
            max_mana: scaling.base_mana + base.intellect * scaling.mana_per_intellect,
            mana_regen: base.spirit * scaling.mana_regen_per_spirit,
            attack_power: base.strength * scaling.attack_power_per_strength,
            magic_power: base.intellect * scaling.magic_power_per_intellect,
            physical_defense: base.vitality * scaling.physical_defense_per_vitality,
            magical_defense: base.spirit * scaling.magical_defense_per_spirit,
            attack_speed: scaling.base_attack_speed + base.agility * scaling.attack_speed_per_agility,
            cast_speed: scaling.base_cast_speed + base.intellect * scaling.cast_speed_per_intellect,
            evasion: base.agility * scaling.evasion_per_agility,
        }
    }

    /// Effective stats: each field becomes `(value + flat) × multiplier`
    pub fn with_modifiers(&self, mods: &StatModifiers) -> DerivedStats {
        DerivedStats {
            max_hp: mods.max_hp.apply(self.max_hp),
            max_mana: mods.max_mana.apply(self.max_mana),
            mana_regen: mods.mana_regen.apply(self.mana_regen),
            attack_power: mods.attack_power.apply(self.attack_power),
            magic_power: mods.magic_power.apply(self.magic_power),
            physical_defense: mods.physical_defense.apply(self.physical_defense),
            magical_defense: mods.magical_defense.apply(self.magical_defense),
            attack_speed: mods.attack_speed.apply(self.attack_speed),
            cast_speed: mods.cast_speed.apply(self.cast_speed),
            evasion: mods.evasion.apply(self.evasion),
        }
    }

    /// Power used for scaling an action of the given kind
    pub fn power(&self, kind: DamageKind) -> f64 {
        match kind {
            DamageKind::Physical => self.attack_power,
            DamageKind::Magical => self.magic_power,
        }
    }

    /// Defense against an action of the given kind
    pub fn defense(&self, kind: DamageKind) -> f64 {
        match kind {
            DamageKind::Physical => self.physical_defense,
            DamageKind::Magical => self.magical_defense,
        }
    }

    /// Speed stat driving the turn meter for an action of the given kind
    pub fn speed(&self, kind: DamageKind) -> f64 {
        match kind {
            DamageKind::Physical => self.attack_speed,
            DamageKind::Magical => self.cast_speed,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stats::{EffectOp, EffectStat};

    #[test]
    fn test_from_base_uses_scaling() {
        let scaling = DerivedScaling::default();
        let base = BaseStats {
            vitality: 20.0,
            ..BaseStats::default()
        };
        let derived = DerivedStats::from_base(&base, 3, &scaling);
        let expected_hp = scaling.base_hp + 20.0 * scaling.hp_per_vitality + 3.0 * scaling.hp_per_level;
        assert!((derived.max_hp - expected_hp).abs() < f64::EPSILON);
    }

    #[test]
    fn test_with_modifiers() {
        let derived = DerivedStats {
            attack_power: 100.0,
            cast_speed: 10.0,
            ..DerivedStats::default()
        };
        let mut mods = StatModifiers::new();
        mods.apply(EffectStat::AttackPower, EffectOp::Flat, 20.0);
        mods.apply(EffectStat::AttackPower, EffectOp::MorePercent, 50.0);
        mods.apply(EffectStat::CastSpeed, EffectOp::LessPercent, 50.0);

        let effective = derived.with_modifiers(&mods);
        assert!((effective.attack_power - 180.0).abs() < 1e-9);
        assert!((effective.cast_speed - 5.0).abs() < 1e-9);
        // untouched
        assert!((effective.magic_power - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_kind_dispatch() {
        let derived = DerivedStats {
            attack_power: 1.0,
            magic_power: 2.0,
            attack_speed: 3.0,
            cast_speed: 4.0,
            physical_defense: 5.0,
            magical_defense: 6.0,
            ..DerivedStats::default()
        };
        assert!((derived.power(DamageKind::Magical) - 2.0).abs() < f64::EPSILON);
        assert!((derived.speed(DamageKind::Physical) - 3.0).abs() < f64::EPSILON);
        assert!((derived.defense(DamageKind::Magical) - 6.0).abs() < f64::EPSILON);
    }
}
