//! Resolved spells - The per-attempt snapshot the pipeline works from

use crate::effect::{EffectInstance, EffectTrigger};
use crate::stats::DerivedStats;
use crate::types::{DamageKind, DamageType, SpellId, SpellIntent};

/// Immutable snapshot of a spell at a level, resolved for one attempt
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedSpell {
    pub spell_id: SpellId,
    pub level: u32,
    pub name: String,
    pub intent: SpellIntent,
    pub kind: DamageKind,
    pub damage_type: DamageType,
    /// Base damage (or heal) before the damage phase
    pub damage: f64,
    /// Fraction of the caster's power added to the base damage
    pub power_scaling: f64,
    pub mana_cost: i32,
    /// Cooldown in the caster's turns
    pub cooldown: u32,
    /// Base hit chance in percent
    pub hit_chance: f64,
    /// Multiplier on the caster's speed while this spell is queued
    pub base_action_speed: f64,
    pub effects: Vec<EffectInstance>,
}

impl ResolvedSpell {
    pub fn is_heal(&self) -> bool {
        self.intent == SpellIntent::Heal
    }

    /// Effect instances for one trigger, in declaration order
    pub fn effects_for(&self, trigger: EffectTrigger) -> impl Iterator<Item = &EffectInstance> {
        self.effects.iter().filter(move |e| e.trigger == trigger)
    }
}

/// Turns a spell id and level into a resolved spell for a caster
pub trait SpellResolver {
    fn try_resolve(&self, spell_id: &SpellId, level: u32, caster: &DerivedStats) -> Option<ResolvedSpell>;
}
