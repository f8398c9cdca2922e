//! SpellTable - Spell definitions with per-level scaling

use super::resolved::{ResolvedSpell, SpellResolver};
use crate::effect::{EffectInstance, ScaledValue};
use crate::stats::DerivedStats;
use crate::types::{DamageKind, DamageType, SpellId, SpellIntent};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

fn default_hit_chance() -> f64 {
    95.0
}

fn default_action_speed() -> f64 {
    1.0
}

fn default_max_level() -> u32 {
    10
}

/// Static definition of a spell
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellDefinition {
    pub id: SpellId,
    pub name: String,
    #[serde(default)]
    pub intent: SpellIntent,
    #[serde(default)]
    pub kind: DamageKind,
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default)]
    pub damage: ScaledValue,
    #[serde(default)]
    pub power_scaling: ScaledValue,
    #[serde(default)]
    pub mana_cost: ScaledValue,
    #[serde(default)]
    pub cooldown: u32,
    #[serde(default = "default_hit_chance")]
    pub hit_chance: f64,
    #[serde(default = "default_action_speed")]
    pub base_action_speed: f64,
    #[serde(default = "default_max_level")]
    pub max_level: u32,
    #[serde(default)]
    pub effects: Vec<EffectInstance>,
}

impl SpellDefinition {
    /// The weapon swing every actor knows; used when nothing else is castable
    pub fn basic_attack() -> Self {
        SpellDefinition {
            id: SpellId::from("basic_attack"),
            name: "Attack".to_string(),
            intent: SpellIntent::Damage,
            kind: DamageKind::Physical,
            damage_type: DamageType::Physical,
            damage: ScaledValue::scaled(5.0, 1.0),
            power_scaling: ScaledValue::fixed(1.0),
            mana_cost: ScaledValue::default(),
            cooldown: 0,
            hit_chance: default_hit_chance(),
            base_action_speed: 1.0,
            max_level: 1,
            effects: Vec::new(),
        }
    }

    /// Snapshot at a level, clamped to `[1, max_level]`
    pub fn resolve(&self, level: u32) -> ResolvedSpell {
        let level = level.clamp(1, self.max_level.max(1));
        ResolvedSpell {
            spell_id: self.id.clone(),
            level,
            name: self.name.clone(),
            intent: self.intent,
            kind: self.kind,
            damage_type: self.damage_type,
            damage: self.damage.at(level).max(0.0),
            power_scaling: self.power_scaling.at(level).max(0.0),
            mana_cost: self.mana_cost.at(level).round().max(0.0) as i32,
            cooldown: self.cooldown,
            hit_chance: self.hit_chance,
            base_action_speed: self.base_action_speed,
            effects: self.effects.clone(),
        }
    }
}

/// In-memory spell database
#[derive(Debug, Clone, Default)]
pub struct SpellTable {
    spells: HashMap<SpellId, SpellDefinition>,
}

impl SpellTable {
    pub fn new() -> Self {
        SpellTable {
            spells: HashMap::new(),
        }
    }

    pub fn register(&mut self, spell: SpellDefinition) {
        self.spells.insert(spell.id.clone(), spell);
    }

    pub fn get(&self, id: &str) -> Option<&SpellDefinition> {
        self.spells.get(&SpellId::from(id))
    }

    pub fn contains(&self, id: &SpellId) -> bool {
        self.spells.contains_key(id)
    }

    pub fn len(&self) -> usize {
        self.spells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.spells.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SpellDefinition> {
        self.spells.values()
    }
}

impl SpellResolver for SpellTable {
    fn try_resolve(&self, spell_id: &SpellId, level: u32, _caster: &DerivedStats) -> Option<ResolvedSpell> {
        self.spells.get(spell_id).map(|def| def.resolve(level))
    }
}

impl FromIterator<SpellDefinition> for SpellTable {
    fn from_iter<I: IntoIterator<Item = SpellDefinition>>(iter: I) -> Self {
        let mut table = SpellTable::new();
        for spell in iter {
            table.register(spell);
        }
        table
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_scales_with_level() {
        let spell = SpellDefinition {
            damage: ScaledValue::scaled(20.0, 4.0),
            mana_cost: ScaledValue::scaled(10.0, 2.0),
            max_level: 5,
            ..SpellDefinition::basic_attack()
        };

        let at_three = spell.resolve(3);
        assert_eq!(at_three.level, 3);
        assert!((at_three.damage - 28.0).abs() < f64::EPSILON);
        assert_eq!(at_three.mana_cost, 14);

        // above max level clamps
        assert_eq!(spell.resolve(99).level, 5);
    }

    #[test]
    fn test_table_resolves_known_spells_only() {
        let table: SpellTable = [SpellDefinition::basic_attack()].into_iter().collect();
        let stats = DerivedStats::default();
        assert!(table.try_resolve(&SpellId::from("basic_attack"), 1, &stats).is_some());
        assert!(table.try_resolve(&SpellId::from("meteor"), 1, &stats).is_none());
    }
}
