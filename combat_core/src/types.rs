//! Core types shared across the combat core

use serde::{Deserialize, Serialize};
use std::fmt;

/// Which side of the encounter an actor fights for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Player,
    Enemy,
}

impl Side {
    /// Both sides, player first
    pub fn all() -> &'static [Side] {
        &[Side::Player, Side::Enemy]
    }

    /// The other side of the encounter
    pub fn opponent(self) -> Side {
        match self {
            Side::Player => Side::Enemy,
            Side::Enemy => Side::Player,
        }
    }

    /// Stable slot index for per-side arrays
    pub fn index(self) -> usize {
        match self {
            Side::Player => 0,
            Side::Enemy => 1,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Side::Player => write!(f, "player"),
            Side::Enemy => write!(f, "enemy"),
        }
    }
}

/// Damage types used for per-type bonuses and mitigation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageType {
    #[default]
    Physical,
    Fire,
    Frost,
    Lightning,
    Poison,
    Holy,
    Shadow,
}

impl DamageType {
    /// Number of damage types (size of per-type modifier arrays)
    pub const COUNT: usize = 7;

    /// Get all damage types
    pub fn all() -> &'static [DamageType] {
        &[
            DamageType::Physical,
            DamageType::Fire,
            DamageType::Frost,
            DamageType::Lightning,
            DamageType::Poison,
            DamageType::Holy,
            DamageType::Shadow,
        ]
    }

    /// Index into per-type arrays
    pub fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for DamageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            DamageType::Physical => "physical",
            DamageType::Fire => "fire",
            DamageType::Frost => "frost",
            DamageType::Lightning => "lightning",
            DamageType::Poison => "poison",
            DamageType::Holy => "holy",
            DamageType::Shadow => "shadow",
        };
        write!(f, "{name}")
    }
}

/// Whether an action is driven by attack speed and attack power, or by cast speed
/// and magic power
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DamageKind {
    #[default]
    Physical,
    Magical,
}

/// What a spell does when it lands. Damage and Heal are mutually exclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SpellIntent {
    #[default]
    Damage,
    Heal,
    Buff,
    Debuff,
    Utility,
}

impl SpellIntent {
    /// Only damage and heal spells roll to hit
    pub fn requires_hit_check(self) -> bool {
        matches!(self, SpellIntent::Damage | SpellIntent::Heal)
    }
}

/// Enemy/actor tier, used for level suppression and xp
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Tier {
    #[default]
    Normal,
    Elite,
    Boss,
}

/// Identifier for a spell
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpellId(pub String);

impl SpellId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for SpellId {
    fn from(s: &str) -> Self {
        SpellId(s.to_string())
    }
}

impl From<String> for SpellId {
    fn from(s: String) -> Self {
        SpellId(s)
    }
}

impl fmt::Display for SpellId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Identifier for an effect definition
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EffectId(pub String);

impl EffectId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for EffectId {
    fn from(s: &str) -> Self {
        EffectId(s.to_string())
    }
}

impl From<String> for EffectId {
    fn from(s: String) -> Self {
        EffectId(s)
    }
}

impl fmt::Display for EffectId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
