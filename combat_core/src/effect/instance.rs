//! Effect instances - A spell's reference to an effect plus per-level scaling

use super::definition::{EffectDefinition, EffectError, EffectKind};
use crate::stats::EffectOp;
use crate::types::EffectId;
use serde::{Deserialize, Serialize};

/// When in the resolution an instance is applied
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTrigger {
    /// Before the hit check
    OnCast,
    /// After damage/heal resolved, only when the action hit
    #[default]
    OnHit,
}

/// Who receives the effect
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectTarget {
    Caster,
    #[default]
    Target,
}

/// Quantity a percent magnitude is computed against at apply time
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MagnitudeBasis {
    #[default]
    None,
    /// The caster's power for the spell's damage kind
    Power,
    /// The amount the triggering action just dealt
    DamageDealt,
}

/// A value with linear per-level scaling: `base + per_level × (level - 1)`
///
/// Deserializes from either a bare number or `{ base = .., per_level = .. }`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "ScaledValueRepr")]
pub struct ScaledValue {
    pub base: f64,
    pub per_level: f64,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ScaledValueRepr {
    Fixed(f64),
    Scaled {
        base: f64,
        #[serde(default)]
        per_level: f64,
    },
}

impl From<ScaledValueRepr> for ScaledValue {
    fn from(repr: ScaledValueRepr) -> Self {
        match repr {
            ScaledValueRepr::Fixed(base) => ScaledValue { base, per_level: 0.0 },
            ScaledValueRepr::Scaled { base, per_level } => ScaledValue { base, per_level },
        }
    }
}

impl ScaledValue {
    pub fn fixed(base: f64) -> Self {
        ScaledValue { base, per_level: 0.0 }
    }

    pub fn scaled(base: f64, per_level: f64) -> Self {
        ScaledValue { base, per_level }
    }

    /// Value at a given level (level 1 is the base)
    pub fn at(&self, level: u32) -> f64 {
        self.base + self.per_level * (level.max(1) - 1) as f64
    }
}

/// Magnitude description of an instance
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct EffectMagnitude {
    #[serde(default)]
    pub flat: ScaledValue,
    #[serde(default)]
    pub percent: ScaledValue,
    #[serde(default)]
    pub basis: MagnitudeBasis,
}

/// Magnitude after level scaling and basis materialization
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RolledMagnitude {
    pub flat: f64,
    pub percent: f64,
}

impl RolledMagnitude {
    /// Sum used as the strength score when no explicit rating exists
    pub fn score(&self) -> f64 {
        self.flat + self.percent
    }
}

impl EffectMagnitude {
    /// Scale by level and, for basis-scaled magnitudes, fold the percent of the basis
    /// into the flat value. The result is locked in; it is never re-evaluated later.
    pub fn roll(&self, level: u32, power: f64, damage_dealt: f64) -> RolledMagnitude {
        let flat = self.flat.at(level);
        let percent = self.percent.at(level);
        match self.basis {
            MagnitudeBasis::None => RolledMagnitude { flat, percent },
            MagnitudeBasis::Power => RolledMagnitude {
                flat: flat + power * percent / 100.0,
                percent: 0.0,
            },
            MagnitudeBasis::DamageDealt => RolledMagnitude {
                flat: flat + damage_dealt * percent / 100.0,
                percent: 0.0,
            },
        }
    }
}

fn default_chance() -> ScaledValue {
    ScaledValue::fixed(100.0)
}

fn default_duration() -> ScaledValue {
    ScaledValue::fixed(1.0)
}

fn default_max_stacks() -> u32 {
    1
}

/// A spell's grant of an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectInstance {
    pub effect_id: EffectId,
    #[serde(default)]
    pub trigger: EffectTrigger,
    #[serde(default)]
    pub target: EffectTarget,
    /// Chance to apply, in percent
    #[serde(default = "default_chance")]
    pub chance: ScaledValue,
    /// Duration in the holder's turns
    #[serde(default = "default_duration")]
    pub duration: ScaledValue,
    #[serde(default)]
    pub magnitude: EffectMagnitude,
    #[serde(default)]
    pub stackable: bool,
    #[serde(default = "default_max_stacks")]
    pub max_stacks: u32,
    /// Overrides the definition's strength rating
    #[serde(default)]
    pub strength: Option<f64>,
}

impl EffectInstance {
    /// A certain, one-turn, non-stacking instance with no magnitude
    pub fn new(effect_id: impl Into<EffectId>) -> Self {
        EffectInstance {
            effect_id: effect_id.into(),
            trigger: EffectTrigger::OnHit,
            target: EffectTarget::Target,
            chance: default_chance(),
            duration: default_duration(),
            magnitude: EffectMagnitude::default(),
            stackable: false,
            max_stacks: 1,
            strength: None,
        }
    }

    pub fn on_cast(mut self) -> Self {
        self.trigger = EffectTrigger::OnCast;
        self
    }

    pub fn targeting(mut self, target: EffectTarget) -> Self {
        self.target = target;
        self
    }

    pub fn with_chance(mut self, chance: f64) -> Self {
        self.chance = ScaledValue::fixed(chance);
        self
    }

    pub fn with_duration(mut self, turns: f64) -> Self {
        self.duration = ScaledValue::fixed(turns);
        self
    }

    pub fn with_flat(mut self, flat: f64) -> Self {
        self.magnitude.flat = ScaledValue::fixed(flat);
        self
    }

    pub fn with_percent(mut self, percent: f64, basis: MagnitudeBasis) -> Self {
        self.magnitude.percent = ScaledValue::fixed(percent);
        self.magnitude.basis = basis;
        self
    }

    pub fn stacking(mut self, max_stacks: u32) -> Self {
        self.stackable = true;
        self.max_stacks = max_stacks.max(1);
        self
    }

    /// Duration in whole turns at a level, at least one
    pub fn duration_at(&self, level: u32) -> i32 {
        (self.duration.at(level).round() as i32).max(1)
    }

    /// Check this instance against the definition it references
    pub fn validate(&self, definition: &EffectDefinition) -> Result<(), EffectError> {
        definition.validate()?;
        let has_flat = self.magnitude.flat.base != 0.0 || self.magnitude.flat.per_level != 0.0;
        let has_percent = self.magnitude.percent.base != 0.0 || self.magnitude.percent.per_level != 0.0;
        let scaled = self.magnitude.basis != MagnitudeBasis::None;

        match definition.kind {
            EffectKind::StatModifier => match definition.op {
                EffectOp::Flat if has_percent && !scaled => {
                    Err(EffectError::PercentWithFlatOp(definition.id.clone()))
                }
                EffectOp::MorePercent | EffectOp::LessPercent if scaled => {
                    Err(EffectError::BasisWithPercentOp(definition.id.clone()))
                }
                EffectOp::MorePercent | EffectOp::LessPercent if has_flat => {
                    Err(EffectError::FlatWithPercentOp(definition.id.clone()))
                }
                _ => Ok(()),
            },
            EffectKind::DamageOverTime | EffectKind::HealOverTime => {
                if has_percent && !scaled {
                    Err(EffectError::PercentWithFlatOp(definition.id.clone()))
                } else if !has_flat && !has_percent {
                    Err(EffectError::PeriodicWithoutMagnitude(definition.id.clone()))
                } else {
                    Ok(())
                }
            }
            EffectKind::Stun => Ok(()),
        }
    }
}
