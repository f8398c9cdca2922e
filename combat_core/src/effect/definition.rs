//! Effect definitions - The static description an effect database hands out

use crate::stats::{EffectOp, EffectStat};
use crate::types::{DamageType, EffectId};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// What an effect does while it is active
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EffectKind {
    /// Pushes its magnitude into the holder's stat modifiers
    StatModifier,
    /// Deals damage to the holder at the start of each of its turns
    DamageOverTime,
    /// Heals the holder at the start of each of its turns
    HealOverTime,
    /// The holder's actions are skipped while active
    Stun,
}

impl EffectKind {
    /// Whether the effect keeps a per-stack periodic tick list
    pub fn is_periodic(self) -> bool {
        matches!(self, EffectKind::DamageOverTime | EffectKind::HealOverTime)
    }
}

/// What happens when an effect is granted again by a source that already contributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReapplyRule {
    #[default]
    DoNothingIfPresent,
    AddOnTop,
    OverwriteIfStronger,
}

/// How remaining duration changes on re-application
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DurationStackMode {
    /// Keep the existing duration
    #[default]
    None,
    /// Add the new duration to what remains
    Prolong,
    /// Take the longer of the two (or the new one when forced)
    Refresh,
}

/// Static description of an effect
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectDefinition {
    /// Unique effect identifier
    pub id: EffectId,
    /// Display name
    pub name: String,
    pub kind: EffectKind,
    /// Stat touched by a StatModifier effect
    #[serde(default)]
    pub stat: Option<EffectStat>,
    #[serde(default)]
    pub op: EffectOp,
    /// Mergeable effects share one bucket per actor regardless of source
    #[serde(default)]
    pub mergeable: bool,
    #[serde(default)]
    pub reapply: ReapplyRule,
    #[serde(default)]
    pub duration_stack: DurationStackMode,
    /// With `Refresh`, always take the new duration even when shorter
    #[serde(default)]
    pub force_refresh: bool,
    /// Explicit strength rating for `OverwriteIfStronger`
    #[serde(default)]
    pub strength: Option<f64>,
    /// Damage type of periodic damage
    #[serde(default)]
    pub damage_type: DamageType,
    #[serde(default)]
    pub is_debuff: bool,
}

impl EffectDefinition {
    /// Create a definition with default stacking behaviour
    pub fn new(id: impl Into<EffectId>, name: impl Into<String>, kind: EffectKind) -> Self {
        EffectDefinition {
            id: id.into(),
            name: name.into(),
            kind,
            stat: None,
            op: EffectOp::Flat,
            mergeable: false,
            reapply: ReapplyRule::DoNothingIfPresent,
            duration_stack: DurationStackMode::None,
            force_refresh: false,
            strength: None,
            damage_type: DamageType::Physical,
            is_debuff: false,
        }
    }

    /// A stat modifier definition
    pub fn stat_modifier(id: impl Into<EffectId>, name: impl Into<String>, stat: EffectStat, op: EffectOp) -> Self {
        EffectDefinition {
            stat: Some(stat),
            op,
            ..Self::new(id, name, EffectKind::StatModifier)
        }
    }

    pub fn with_reapply(mut self, reapply: ReapplyRule) -> Self {
        self.reapply = reapply;
        self
    }

    pub fn with_duration_stack(mut self, mode: DurationStackMode) -> Self {
        self.duration_stack = mode;
        self
    }

    pub fn mergeable(mut self) -> Self {
        self.mergeable = true;
        self
    }

    /// Check the definition on its own
    pub fn validate(&self) -> Result<(), EffectError> {
        match (self.kind, self.stat) {
            (EffectKind::StatModifier, None) => Err(EffectError::MissingStat(self.id.clone())),
            (kind, Some(_)) if kind != EffectKind::StatModifier => {
                Err(EffectError::UnexpectedStat(self.id.clone()))
            }
            _ => Ok(()),
        }
    }
}

/// Malformed effect configuration. Applications that hit one are skipped.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum EffectError {
    #[error("unknown effect '{0}'")]
    UnknownEffect(EffectId),
    #[error("stat modifier effect '{0}' has no stat")]
    MissingStat(EffectId),
    #[error("effect '{0}' is not a stat modifier but names a stat")]
    UnexpectedStat(EffectId),
    #[error("effect '{0}' scales from a basis but its op is not flat")]
    BasisWithPercentOp(EffectId),
    #[error("effect '{0}' has a percent magnitude with a flat op and no basis")]
    PercentWithFlatOp(EffectId),
    #[error("effect '{0}' has a flat magnitude with a percent op")]
    FlatWithPercentOp(EffectId),
    #[error("periodic effect '{0}' has no tick magnitude")]
    PeriodicWithoutMagnitude(EffectId),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_stat_modifier_requires_stat() {
        let def = EffectDefinition::new("rage", "Rage", EffectKind::StatModifier);
        assert_eq!(def.validate(), Err(EffectError::MissingStat(EffectId::from("rage"))));

        let ok = EffectDefinition::stat_modifier("rage", "Rage", EffectStat::AttackPower, EffectOp::Flat);
        assert!(ok.validate().is_ok());
    }

    #[test]
    fn test_validate_periodic_rejects_stat() {
        let mut def = EffectDefinition::new("burn", "Burn", EffectKind::DamageOverTime);
        def.stat = Some(EffectStat::Evasion);
        assert!(matches!(def.validate(), Err(EffectError::UnexpectedStat(_))));
    }

    #[test]
    fn test_reapply_rule_serialization() {
        let json = serde_json::to_string(&ReapplyRule::OverwriteIfStronger).unwrap();
        assert_eq!(json, "\"overwrite_if_stronger\"");
        assert!(EffectKind::HealOverTime.is_periodic());
        assert!(!EffectKind::Stun.is_periodic());
    }
}
