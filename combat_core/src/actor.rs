//! Actor - Runtime state of one combatant

use crate::config::DerivedScaling;
use crate::effect::{ApplyOutcome, ApplyRequest, EffectDefinition, EffectKind, EffectLedger, TickReport};
use crate::engine::scheduler::{MIN_ACTION_SPEED, TURN_THRESHOLD};
use crate::rng::CombatRng;
use crate::stats::{BaseStats, DerivedStats, StatModifiers};
use crate::types::{DamageKind, Side, SpellId, Tier};
use serde::{Deserialize, Serialize};
use std::ops::ControlFlow;

/// Who an actor is
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActorIdentity {
    pub side: Side,
    pub name: String,
    pub level: u32,
    #[serde(default)]
    pub tier: Tier,
}

impl ActorIdentity {
    pub fn new(side: Side, name: impl Into<String>, level: u32) -> Self {
        ActorIdentity {
            side,
            name: name.into(),
            level: level.max(1),
            tier: Tier::Normal,
        }
    }

    pub fn with_tier(mut self, tier: Tier) -> Self {
        self.tier = tier;
        self
    }
}

/// The action an actor will take when its meter fills
#[derive(Debug, Clone, PartialEq)]
pub struct QueuedAction {
    pub spell_id: SpellId,
    pub level: u32,
    pub kind: DamageKind,
    pub base_action_speed: f64,
}

/// Mutable runtime record of one combatant
///
/// Invariants: `0 ≤ hp ≤ max_hp`, `0 ≤ mana ≤ max_mana` and
/// `0 ≤ turn_meter ≤ TURN_THRESHOLD`.
#[derive(Debug, Clone)]
pub struct Actor {
    pub identity: ActorIdentity,
    pub base_stats: BaseStats,
    /// Stats before modifiers
    pub derived: DerivedStats,
    /// Written only through the effect ledger
    pub(crate) modifiers: StatModifiers,
    pub(crate) effects: EffectLedger,
    hp: i32,
    mana: i32,
    turn_meter: f64,
    queued: Option<QueuedAction>,
}

impl Actor {
    /// Create an actor at full HP and mana
    pub fn new(identity: ActorIdentity, base_stats: BaseStats, scaling: &DerivedScaling) -> Self {
        let derived = DerivedStats::from_base(&base_stats, identity.level, scaling);
        Self::from_derived(identity, base_stats, derived)
    }

    /// Create an actor with an explicit derived stat snapshot
    pub fn from_derived(identity: ActorIdentity, base_stats: BaseStats, derived: DerivedStats) -> Self {
        let mut actor = Actor {
            identity,
            base_stats,
            derived,
            modifiers: StatModifiers::new(),
            effects: EffectLedger::new(),
            hp: 0,
            mana: 0,
            turn_meter: 0.0,
            queued: None,
        };
        actor.hp = actor.max_hp();
        actor.mana = actor.max_mana();
        actor
    }

    pub fn side(&self) -> Side {
        self.identity.side
    }

    pub fn name(&self) -> &str {
        &self.identity.name
    }

    pub fn level(&self) -> u32 {
        self.identity.level
    }

    pub fn hp(&self) -> i32 {
        self.hp
    }

    pub fn mana(&self) -> i32 {
        self.mana
    }

    pub fn turn_meter(&self) -> f64 {
        self.turn_meter
    }

    pub fn queued(&self) -> Option<&QueuedAction> {
        self.queued.as_ref()
    }

    pub fn modifiers(&self) -> &StatModifiers {
        &self.modifiers
    }

    pub fn effects(&self) -> &EffectLedger {
        &self.effects
    }

    pub fn is_alive(&self) -> bool {
        self.hp > 0
    }

    /// Stats with every active modifier folded in
    pub fn effective(&self) -> DerivedStats {
        self.derived.with_modifiers(&self.modifiers)
    }

    pub fn max_hp(&self) -> i32 {
        self.effective().max_hp.floor().max(1.0) as i32
    }

    pub fn max_mana(&self) -> i32 {
        self.effective().max_mana.floor().max(0.0) as i32
    }

    /// Speed filling the meter: the queued action's speed stat times its multiplier
    pub fn action_speed(&self) -> f64 {
        let stats = self.effective();
        let speed = match &self.queued {
            Some(action) => stats.speed(action.kind) * action.base_action_speed,
            None => stats.speed(DamageKind::Physical),
        };
        speed.max(MIN_ACTION_SPEED)
    }

    pub fn is_stunned(&self) -> bool {
        self.effects.has_kind(EffectKind::Stun)
    }

    /// Remove up to `amount` HP. Returns the HP actually lost.
    pub fn apply_damage(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_sub(amount.max(0)).max(0);
        before - self.hp
    }

    /// Restore up to `amount` HP. Returns the HP actually gained.
    pub fn heal(&mut self, amount: i32) -> i32 {
        let before = self.hp;
        self.hp = self.hp.saturating_add(amount.max(0)).min(self.max_hp());
        self.hp - before
    }

    pub fn can_afford(&self, cost: i32) -> bool {
        self.mana >= cost
    }

    /// Spend mana if there is enough of it
    pub fn spend_mana(&mut self, cost: i32) -> bool {
        if !self.can_afford(cost) {
            return false;
        }
        self.mana -= cost.max(0);
        true
    }

    /// Restore up to `amount` mana. Returns the mana actually gained.
    pub fn restore_mana(&mut self, amount: i32) -> i32 {
        let before = self.mana;
        self.mana = self.mana.saturating_add(amount.max(0)).min(self.max_mana());
        self.mana - before
    }

    /// Mana regained at the start of a turn
    pub fn regen_mana(&mut self) -> i32 {
        let regen = self.effective().mana_regen.floor().max(0.0) as i32;
        self.restore_mana(regen)
    }

    pub(crate) fn set_turn_meter(&mut self, value: f64) {
        self.turn_meter = value.clamp(0.0, TURN_THRESHOLD);
    }

    /// Spend one turn's worth of meter; overflow carries
    pub(crate) fn consume_turn(&mut self) {
        self.set_turn_meter(self.turn_meter - TURN_THRESHOLD);
    }

    pub(crate) fn queue(&mut self, action: QueuedAction) {
        self.queued = Some(action);
    }

    pub(crate) fn take_queued(&mut self) -> Option<QueuedAction> {
        self.queued.take()
    }

    pub(crate) fn clear_queued(&mut self) {
        self.queued = None;
    }

    /// Apply an effect to this actor and re-clamp resources
    pub fn apply_effect(
        &mut self,
        definition: &EffectDefinition,
        request: &ApplyRequest<'_>,
        rng: &mut dyn CombatRng,
    ) -> ApplyOutcome {
        let outcome = self.effects.apply(&mut self.modifiers, definition, request, rng);
        self.clamp_resources();
        outcome
    }

    /// Tick active effects at the start of this actor's turn. Periodic damage and
    /// healing change HP immediately; reaching 0 HP stops the batch.
    pub fn tick_effects(&mut self) -> TickReport {
        let max_hp = self.max_hp();
        let Actor {
            effects, modifiers, hp, ..
        } = self;
        let report = effects.on_action_chosen(modifiers, |tick| {
            let amount = tick.hp_amount();
            let before = *hp;
            match tick.kind {
                EffectKind::DamageOverTime => *hp = hp.saturating_sub(amount).max(0),
                EffectKind::HealOverTime => *hp = hp.saturating_add(amount).min(max_hp),
                EffectKind::StatModifier | EffectKind::Stun => {}
            }
            tick.applied = (*hp - before).abs();
            if *hp == 0 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            }
        });
        self.clamp_resources();
        report
    }

    /// Pull HP and mana back under their maximums after a max changed
    pub fn clamp_resources(&mut self) {
        self.hp = self.hp.clamp(0, self.max_hp());
        self.mana = self.mana.clamp(0, self.max_mana());
    }
}
