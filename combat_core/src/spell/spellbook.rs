//! Spellbook - Known spells, their levels, cooldowns and xp

use crate::types::SpellId;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A spell an actor can choose from
#[derive(Debug, Clone, PartialEq)]
pub struct KnownSpell {
    pub spell_id: SpellId,
    pub level: u32,
    /// Relative weight for random selection
    pub weight: f64,
}

/// What the combat core needs from an actor's spell collection
pub trait Spellbook {
    /// Level of a known spell, `None` when unknown
    fn level_of(&self, spell: &SpellId) -> Option<u32>;

    /// Whether a known spell is off cooldown
    fn is_ready(&self, spell: &SpellId) -> bool;

    fn start_cooldown(&mut self, spell: &SpellId, turns: u32);

    /// Advance every cooldown by one of the owner's turns
    fn tick_cooldowns(&mut self);

    /// Add xp to a spell. Returns the new level when it levelled up.
    fn grant_xp(&mut self, spell: &SpellId, xp: f64) -> Option<u32>;

    fn known_spells(&self) -> Vec<KnownSpell>;
}

/// Per-spell record in a [`SpellBook`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellEntry {
    pub level: u32,
    #[serde(default)]
    pub cooldown_remaining: u32,
    #[serde(default)]
    pub xp: f64,
    #[serde(default = "default_weight")]
    pub weight: f64,
}

fn default_weight() -> f64 {
    1.0
}

fn default_xp_per_level() -> f64 {
    100.0
}

/// In-memory spellbook. A spell needs `level × xp_per_level` xp to reach the next level.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpellBook {
    spells: BTreeMap<SpellId, SpellEntry>,
    #[serde(default = "default_xp_per_level")]
    xp_per_level: f64,
}

impl Default for SpellBook {
    fn default() -> Self {
        SpellBook {
            spells: BTreeMap::new(),
            xp_per_level: default_xp_per_level(),
        }
    }
}

impl SpellBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_xp_per_level(mut self, xp_per_level: f64) -> Self {
        self.xp_per_level = xp_per_level.max(1.0);
        self
    }

    /// Learn a spell (or relearn it at a new level) with weight 1
    pub fn learn(&mut self, spell: impl Into<SpellId>, level: u32) {
        self.learn_weighted(spell, level, 1.0);
    }

    pub fn learn_weighted(&mut self, spell: impl Into<SpellId>, level: u32, weight: f64) {
        self.spells.insert(
            spell.into(),
            SpellEntry {
                level: level.max(1),
                cooldown_remaining: 0,
                xp: 0.0,
                weight: weight.max(0.0),
            },
        );
    }

    pub fn entry(&self, spell: &SpellId) -> Option<&SpellEntry> {
        self.spells.get(spell)
    }

    pub fn cooldown_of(&self, spell: &SpellId) -> u32 {
        self.spells.get(spell).map(|e| e.cooldown_remaining).unwrap_or(0)
    }
}

impl Spellbook for SpellBook {
    fn level_of(&self, spell: &SpellId) -> Option<u32> {
        self.spells.get(spell).map(|e| e.level)
    }

    fn is_ready(&self, spell: &SpellId) -> bool {
        self.spells.get(spell).is_some_and(|e| e.cooldown_remaining == 0)
    }

    fn start_cooldown(&mut self, spell: &SpellId, turns: u32) {
        if let Some(entry) = self.spells.get_mut(spell) {
            entry.cooldown_remaining = turns;
        }
    }

    fn tick_cooldowns(&mut self) {
        for entry in self.spells.values_mut() {
            entry.cooldown_remaining = entry.cooldown_remaining.saturating_sub(1);
        }
    }

    fn grant_xp(&mut self, spell: &SpellId, xp: f64) -> Option<u32> {
        let entry = self.spells.get_mut(spell)?;
        entry.xp += xp.max(0.0);
        let mut levelled = false;
        while entry.xp >= entry.level as f64 * self.xp_per_level {
            entry.xp -= entry.level as f64 * self.xp_per_level;
            entry.level += 1;
            levelled = true;
        }
        levelled.then_some(entry.level)
    }

    fn known_spells(&self) -> Vec<KnownSpell> {
        self.spells
            .iter()
            .map(|(id, entry)| KnownSpell {
                spell_id: id.clone(),
                level: entry.level,
                weight: entry.weight,
            })
            .collect()
    }
}
