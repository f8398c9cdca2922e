//! ActionContext - Per-action scratch record shared by the rule chains

use crate::actor::Actor;
use crate::config::CombatConstants;
use crate::rng::CombatRng;
use crate::spell::ResolvedSpell;
use crate::stats::DerivedStats;

/// Everything a rule may read, plus the values the rules build up
pub struct ActionContext<'a> {
    pub attacker: &'a Actor,
    /// The opponent for damage, the caster itself for heals
    pub defender: &'a Actor,
    pub spell: &'a ResolvedSpell,
    pub constants: &'a CombatConstants,
    pub rng: &'a mut dyn CombatRng,
    /// Effective attacker stats at the start of the action
    pub attacker_stats: DerivedStats,
    /// Effective defender stats at the start of the action
    pub defender_stats: DerivedStats,
    /// Percent chance to hit, built by the hit phase
    pub hit_chance: f64,
    pub hit: bool,
    /// Damage or heal amount, built by the damage phase
    pub damage: f64,
}

impl<'a> ActionContext<'a> {
    pub fn new(
        attacker: &'a Actor,
        defender: &'a Actor,
        spell: &'a ResolvedSpell,
        constants: &'a CombatConstants,
        rng: &'a mut dyn CombatRng,
    ) -> Self {
        ActionContext {
            attacker,
            defender,
            spell,
            constants,
            rng,
            attacker_stats: attacker.effective(),
            defender_stats: defender.effective(),
            hit_chance: spell.hit_chance,
            hit: false,
            damage: 0.0,
        }
    }

    /// Level scaled by tier, used for suppression
    pub fn attacker_power_level(&self) -> f64 {
        power_level(self.attacker, self.constants)
    }

    pub fn defender_power_level(&self) -> f64 {
        power_level(self.defender, self.constants)
    }

    /// Damage as a non-negative whole amount
    pub fn final_damage(&self) -> i32 {
        if self.damage.is_finite() {
            self.damage.max(0.0).floor() as i32
        } else {
            0
        }
    }
}

/// An actor's level multiplied by its tier multiplier
pub fn power_level(actor: &Actor, constants: &CombatConstants) -> f64 {
    actor.level() as f64 * constants.tiers.get(actor.identity.tier)
}
