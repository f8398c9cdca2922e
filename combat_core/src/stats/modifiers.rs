//! StatModifiers - Every bonus/penalty currently active on one actor

use super::stat_value::{less_factor, more_factor, StatValue};
use crate::types::DamageType;
use serde::{Deserialize, Serialize};

/// Stats an effect can modify
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectStat {
    MaxHp,
    MaxMana,
    AttackPower,
    MagicPower,
    PhysicalDefense,
    MagicalDefense,
    AttackSpeed,
    CastSpeed,
    Evasion,
    HitChance,
    ManaRegen,
    /// Applied to a spell's base damage before power scaling
    BaseDamage,
    /// Applied after mitigation and suppression
    DamageDealt,
    /// Attacker bonus for one damage type
    DamageBonus(DamageType),
    /// Defender vulnerability to one damage type
    Vulnerability(DamageType),
    /// Defender resistance to one damage type
    Resistance(DamageType),
    /// Attacker weaken for one damage type
    Weaken(DamageType),
}

/// How an effect magnitude is folded into a stat
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectOp {
    #[default]
    Flat,
    MorePercent,
    LessPercent,
}

/// A single term pushed into a StatValue
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum ModifierTerm {
    Flat(f64),
    Factor(f64),
}

/// Record of one term applied to the modifier set, kept so it can be undone exactly
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AppliedModifier {
    pub stat: EffectStat,
    pub term: ModifierTerm,
}

/// Per-damage-type modifiers (flat + multiplicative, indexed by DamageType)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DamageTypeModifiers {
    values: [StatValue; DamageType::COUNT],
}

impl DamageTypeModifiers {
    pub fn get(&self, damage_type: DamageType) -> &StatValue {
        &self.values[damage_type.index()]
    }

    pub fn get_mut(&mut self, damage_type: DamageType) -> &mut StatValue {
        &mut self.values[damage_type.index()]
    }

    pub fn is_empty(&self) -> bool {
        self.values.iter().all(StatValue::is_empty)
    }
}

/// Aggregate of all currently-active bonuses and penalties on an actor
///
/// The effect ledger is the only writer. Every term it adds is recorded as an
/// [`AppliedModifier`] and removed with [`StatModifiers::remove`] when the owning
/// contribution expires.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatModifiers {
    // === Resources ===
    pub max_hp: StatValue,
    pub max_mana: StatValue,
    pub mana_regen: StatValue,

    // === Offense ===
    pub attack_power: StatValue,
    pub magic_power: StatValue,
    pub hit_chance: StatValue,
    pub base_damage: StatValue,
    pub damage_dealt: StatValue,

    // === Defense ===
    pub physical_defense: StatValue,
    pub magical_defense: StatValue,
    pub evasion: StatValue,

    // === Speed ===
    pub attack_speed: StatValue,
    pub cast_speed: StatValue,

    // === Per damage type ===
    pub damage_bonus: DamageTypeModifiers,
    pub vulnerability: DamageTypeModifiers,
    pub resistance: DamageTypeModifiers,
    pub weaken: DamageTypeModifiers,
}

impl StatModifiers {
    /// Create an empty modifier set
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the StatValue backing a stat
    pub fn stat(&self, stat: EffectStat) -> &StatValue {
        match stat {
            EffectStat::MaxHp => &self.max_hp,
            EffectStat::MaxMana => &self.max_mana,
            EffectStat::AttackPower => &self.attack_power,
            EffectStat::MagicPower => &self.magic_power,
            EffectStat::PhysicalDefense => &self.physical_defense,
            EffectStat::MagicalDefense => &self.magical_defense,
            EffectStat::AttackSpeed => &self.attack_speed,
            EffectStat::CastSpeed => &self.cast_speed,
            EffectStat::Evasion => &self.evasion,
            EffectStat::HitChance => &self.hit_chance,
            EffectStat::ManaRegen => &self.mana_regen,
            EffectStat::BaseDamage => &self.base_damage,
            EffectStat::DamageDealt => &self.damage_dealt,
            EffectStat::DamageBonus(dt) => self.damage_bonus.get(dt),
            EffectStat::Vulnerability(dt) => self.vulnerability.get(dt),
            EffectStat::Resistance(dt) => self.resistance.get(dt),
            EffectStat::Weaken(dt) => self.weaken.get(dt),
        }
    }

    /// Get the mutable StatValue backing a stat
    pub fn stat_mut(&mut self, stat: EffectStat) -> &mut StatValue {
        match stat {
            EffectStat::MaxHp => &mut self.max_hp,
            EffectStat::MaxMana => &mut self.max_mana,
            EffectStat::AttackPower => &mut self.attack_power,
            EffectStat::MagicPower => &mut self.magic_power,
            EffectStat::PhysicalDefense => &mut self.physical_defense,
            EffectStat::MagicalDefense => &mut self.magical_defense,
            EffectStat::AttackSpeed => &mut self.attack_speed,
            EffectStat::CastSpeed => &mut self.cast_speed,
            EffectStat::Evasion => &mut self.evasion,
            EffectStat::HitChance => &mut self.hit_chance,
            EffectStat::ManaRegen => &mut self.mana_regen,
            EffectStat::BaseDamage => &mut self.base_damage,
            EffectStat::DamageDealt => &mut self.damage_dealt,
            EffectStat::DamageBonus(dt) => self.damage_bonus.get_mut(dt),
            EffectStat::Vulnerability(dt) => self.vulnerability.get_mut(dt),
            EffectStat::Resistance(dt) => self.resistance.get_mut(dt),
            EffectStat::Weaken(dt) => self.weaken.get_mut(dt),
        }
    }

    /// Apply a value to a stat using the given op and return the record needed to undo it
    pub fn apply(&mut self, stat: EffectStat, op: EffectOp, value: f64) -> AppliedModifier {
        let term = match op {
            EffectOp::Flat => ModifierTerm::Flat(value),
            EffectOp::MorePercent => ModifierTerm::Factor(more_factor(value)),
            EffectOp::LessPercent => ModifierTerm::Factor(less_factor(value)),
        };
        self.push(stat, term);
        AppliedModifier { stat, term }
    }

    /// Undo a previously applied term. Returns false if the term was not present.
    pub fn remove(&mut self, applied: &AppliedModifier) -> bool {
        let value = self.stat_mut(applied.stat);
        match applied.term {
            ModifierTerm::Flat(v) => value.remove_flat(v),
            ModifierTerm::Factor(f) => value.remove_factor(f),
        }
    }

    fn push(&mut self, stat: EffectStat, term: ModifierTerm) {
        let value = self.stat_mut(stat);
        match term {
            ModifierTerm::Flat(v) => value.add_flat(v),
            ModifierTerm::Factor(f) => value.add_factor(f),
        }
    }

    /// Whether no modifier is active at all
    pub fn is_empty(&self) -> bool {
        *self == StatModifiers::default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_flat_apply_and_remove() {
        let mut mods = StatModifiers::new();
        let applied = mods.apply(EffectStat::AttackPower, EffectOp::Flat, 15.0);
        assert!((mods.attack_power.apply(100.0) - 115.0).abs() < f64::EPSILON);

        assert!(mods.remove(&applied));
        assert!(mods.is_empty());
    }

    #[test]
    fn test_more_and_less_percent() {
        let mut mods = StatModifiers::new();
        mods.apply(EffectStat::CastSpeed, EffectOp::MorePercent, 20.0);
        mods.apply(EffectStat::CastSpeed, EffectOp::MorePercent, 20.0);
        assert!((mods.cast_speed.multiplier() - 1.44).abs() < 1e-9);

        mods.apply(EffectStat::Evasion, EffectOp::LessPercent, 25.0);
        assert!((mods.evasion.multiplier() - 0.75).abs() < 1e-9);
    }

    #[test]
    fn test_damage_type_arrays_are_independent() {
        let mut mods = StatModifiers::new();
        mods.apply(EffectStat::Resistance(DamageType::Fire), EffectOp::Flat, 10.0);

        assert!((mods.resistance.get(DamageType::Fire).flat_total() - 10.0).abs() < f64::EPSILON);
        assert!(mods.resistance.get(DamageType::Frost).is_empty());
        assert!(mods.vulnerability.is_empty());
    }

    #[test]
    fn test_round_trip_is_bit_identical() {
        let mut mods = StatModifiers::new();
        mods.apply(EffectStat::MagicPower, EffectOp::Flat, 0.1);
        mods.apply(EffectStat::MagicPower, EffectOp::MorePercent, 33.3);
        let before = mods.clone();

        let a = mods.apply(EffectStat::MagicPower, EffectOp::Flat, 0.2);
        let b = mods.apply(EffectStat::MagicPower, EffectOp::LessPercent, 17.0);
        // Undo out of order
        assert!(mods.remove(&a));
        assert!(mods.remove(&b));

        assert_eq!(mods, before);
    }

    #[test]
    fn test_effect_stat_serialization() {
        let json = serde_json::to_string(&EffectStat::Resistance(DamageType::Fire)).unwrap();
        assert_eq!(json, r#"{"resistance":"fire"}"#);
        let stat: EffectStat = serde_json::from_str("\"attack_power\"").unwrap();
        assert_eq!(stat, EffectStat::AttackPower);
    }
}
