//! Combat engine - Owns both actors and drives the scheduler loop
//!
//! The loop advances turn meters until an actor is ready, fires its queued action
//! through the resolution pipeline and repeats. It returns when combat ends or
//! either side has nothing queued; callers queue actions and call [`CombatState::run`]
//! again.

mod error;
mod events;
mod policy;
mod result;
pub mod scheduler;

pub use error::CombatError;
pub use events::{ActionOutcome, CombatEvent, EventBus, SubscriberId};
pub use policy::WeightedRandomPolicy;
pub use result::{CombatOutcome, SideTotals};
pub use scheduler::{advance_meters, MeterAdvance, SchedulerStep, MIN_ACTION_SPEED, SNAP_EPSILON, TURN_THRESHOLD};

use crate::actor::{Actor, QueuedAction};
use crate::config::CombatConstants;
use crate::effect::{EffectDatabase, EffectKind, EffectTrigger, TickReport};
use crate::pipeline::{ActionContext, AppliedEffect, DamagePhase, EffectPhase, HitPhase};
use crate::rng::CombatRng;
use crate::spell::{KnownSpell, ResolvedSpell, SpellResolver, Spellbook};
use crate::types::{Side, SpellId, SpellIntent};
use tracing::{debug, info};

/// External collaborators an encounter reads from
#[derive(Clone, Copy)]
pub struct CombatEnv<'a> {
    pub spells: &'a dyn SpellResolver,
    pub effects: &'a dyn EffectDatabase,
    pub constants: &'a CombatConstants,
}

/// One encounter between a player and an enemy
pub struct CombatState<'a, R: CombatRng> {
    env: CombatEnv<'a>,
    actors: [Actor; 2],
    spellbooks: [Box<dyn Spellbook + 'a>; 2],
    hit_phase: HitPhase,
    damage_phase: DamagePhase,
    effect_phase: EffectPhase,
    rng: R,
    events: EventBus,
    outcome: CombatOutcome,
}

impl<'a, R: CombatRng> CombatState<'a, R> {
    pub fn new(
        env: CombatEnv<'a>,
        mut player: Actor,
        mut enemy: Actor,
        player_book: impl Spellbook + 'a,
        enemy_book: impl Spellbook + 'a,
        rng: R,
    ) -> Self {
        player.identity.side = Side::Player;
        enemy.identity.side = Side::Enemy;
        CombatState {
            env,
            actors: [player, enemy],
            spellbooks: [Box::new(player_book), Box::new(enemy_book)],
            hit_phase: HitPhase::standard(),
            damage_phase: DamagePhase::standard(),
            effect_phase: EffectPhase,
            rng,
            events: EventBus::new(),
            outcome: CombatOutcome::new(),
        }
    }

    /// Replace the hit phase rule chain
    pub fn with_hit_phase(mut self, phase: HitPhase) -> Self {
        self.hit_phase = phase;
        self
    }

    /// Replace the damage phase rule chain
    pub fn with_damage_phase(mut self, phase: DamagePhase) -> Self {
        self.damage_phase = phase;
        self
    }

    pub fn actor(&self, side: Side) -> &Actor {
        &self.actors[side.index()]
    }

    pub fn spellbook(&self, side: Side) -> &dyn Spellbook {
        self.spellbooks[side.index()].as_ref()
    }

    pub fn events_mut(&mut self) -> &mut EventBus {
        &mut self.events
    }

    pub fn subscribe(&mut self, subscriber: impl FnMut(&CombatEvent) + 'static) -> SubscriberId {
        self.events.subscribe(subscriber)
    }

    pub fn outcome(&self) -> &CombatOutcome {
        &self.outcome
    }

    pub fn winner(&self) -> Option<Side> {
        self.outcome.winner
    }

    pub fn is_finished(&self) -> bool {
        self.outcome.is_finished()
    }

    pub fn rng_mut(&mut self) -> &mut R {
        &mut self.rng
    }

    /// Queue a spell for the player. A rejected attempt changes nothing and emits
    /// exactly one log event.
    pub fn try_use_spell(&mut self, spell_id: &SpellId) -> bool {
        match self.queue_spell(Side::Player, spell_id) {
            Ok(()) => true,
            Err(err) => {
                debug!(spell = %spell_id, error = %err, "player spell rejected");
                self.events.emit(CombatEvent::Log(format!("Cannot use {spell_id}: {err}")));
                false
            }
        }
    }

    /// Queue a spell for the enemy
    pub fn set_enemy_action(&mut self, spell_id: &SpellId) -> Result<(), CombatError> {
        self.queue_spell(Side::Enemy, spell_id)
    }

    /// Let a policy pick the enemy's next spell. An empty candidate pool queues the
    /// policy's fallback, which the enemy does not need to know.
    pub fn choose_enemy_action(&mut self, policy: &WeightedRandomPolicy) -> Result<SpellId, CombatError> {
        self.choose_action(Side::Enemy, policy)
    }

    /// Like [`Self::choose_enemy_action`] for either side; used for automated players
    pub fn choose_action(&mut self, side: Side, policy: &WeightedRandomPolicy) -> Result<SpellId, CombatError> {
        if self.is_finished() {
            return Err(CombatError::CombatFinished);
        }
        let candidates = self.candidates(side);
        let choice = policy.choose(&candidates, &mut self.rng);
        if candidates.iter().any(|c| c.spell_id == choice) {
            self.queue_spell(side, &choice)?;
        } else {
            self.queue_fallback(side, &choice)?;
        }
        Ok(choice)
    }

    /// Spells a side could queue right now: known, off cooldown, resolvable and affordable
    pub fn candidates(&self, side: Side) -> Vec<KnownSpell> {
        let actor = &self.actors[side.index()];
        let book = &self.spellbooks[side.index()];
        let stats = actor.effective();
        book.known_spells()
            .into_iter()
            .filter(|known| book.is_ready(&known.spell_id))
            .filter(|known| {
                self.env
                    .spells
                    .try_resolve(&known.spell_id, known.level, &stats)
                    .is_some_and(|spell| actor.can_afford(spell.mana_cost))
            })
            .collect()
    }

    /// Run the scheduler until combat ends or a side needs a decision
    pub fn run(&mut self) -> Result<SchedulerStep, CombatError> {
        loop {
            if self.is_finished() {
                return Ok(SchedulerStep::Finished);
            }
            if self.actors[Side::Player.index()].queued().is_none() {
                return Ok(SchedulerStep::AwaitingPlayerInput);
            }
            if self.actors[Side::Enemy.index()].queued().is_none() {
                self.events.emit(CombatEvent::EnemyDecisionRequested);
                return Ok(SchedulerStep::AwaitingEnemyDecision);
            }

            let [player, enemy] = &mut self.actors;
            let step = advance_meters(player.turn_meter(), player.action_speed(), enemy.turn_meter(), enemy.action_speed());
            player.set_turn_meter(step.player);
            enemy.set_turn_meter(step.enemy);
            self.emit_meters();

            if let Some(side) = step.ready {
                self.fire(side)?;
            }
        }
    }

    fn queue_spell(&mut self, side: Side, spell_id: &SpellId) -> Result<(), CombatError> {
        if self.is_finished() {
            return Err(CombatError::CombatFinished);
        }
        let actor = &self.actors[side.index()];
        if actor.queued().is_some() {
            return Err(CombatError::AlreadyQueued(side));
        }
        let book = &self.spellbooks[side.index()];
        let level = book.level_of(spell_id).ok_or_else(|| CombatError::UnknownSpell {
            side,
            spell: spell_id.clone(),
        })?;
        if !book.is_ready(spell_id) {
            return Err(CombatError::SpellOnCooldown(spell_id.clone()));
        }
        let spell = self.resolve(side, spell_id, level)?;
        if !actor.can_afford(spell.mana_cost) {
            return Err(CombatError::InsufficientMana {
                spell: spell_id.clone(),
                cost: spell.mana_cost,
                mana: actor.mana(),
            });
        }
        self.enqueue(side, &spell);
        Ok(())
    }

    fn queue_fallback(&mut self, side: Side, spell_id: &SpellId) -> Result<(), CombatError> {
        if self.actors[side.index()].queued().is_some() {
            return Err(CombatError::AlreadyQueued(side));
        }
        let level = self.spellbooks[side.index()].level_of(spell_id).unwrap_or(1);
        let spell = self.resolve(side, spell_id, level)?;
        self.enqueue(side, &spell);
        Ok(())
    }

    fn enqueue(&mut self, side: Side, spell: &ResolvedSpell) {
        self.actors[side.index()].queue(QueuedAction {
            spell_id: spell.spell_id.clone(),
            level: spell.level,
            kind: spell.kind,
            base_action_speed: spell.base_action_speed,
        });
        debug!(%side, spell = %spell.spell_id, level = spell.level, "action queued");
        self.events.emit(CombatEvent::SpellQueued {
            side,
            spell_id: spell.spell_id.clone(),
        });
    }

    fn resolve(&self, side: Side, spell_id: &SpellId, level: u32) -> Result<ResolvedSpell, CombatError> {
        let stats = self.actors[side.index()].effective();
        self.env
            .spells
            .try_resolve(spell_id, level, &stats)
            .ok_or_else(|| CombatError::UnresolvableSpell {
                spell: spell_id.clone(),
                level,
            })
    }

    /// Resolve the queued action of a ready actor
    fn fire(&mut self, side: Side) -> Result<(), CombatError> {
        let i = side.index();
        let Some(action) = self.actors[i].take_queued() else {
            return Ok(());
        };
        let spell = self.resolve(side, &action.spell_id, action.level)?;

        let name = self.actors[i].name().to_string();
        if !self.actors[i].can_afford(spell.mana_cost) {
            // the meter stays full; the next queued action fires immediately
            self.log(format!("{name} does not have enough mana for {}", spell.name));
            return Ok(());
        }

        self.actors[i].consume_turn();
        self.outcome.totals_mut(side).turns += 1;
        self.emit_meters();
        self.spellbooks[i].tick_cooldowns();

        let regen = self.actors[i].regen_mana();
        if regen > 0 {
            self.emit_mana(side, regen);
        }

        // a stun applied for one turn still costs this turn even though it expires now
        let stunned = self.actors[i].is_stunned();
        let report = self.actors[i].tick_effects();
        self.report_ticks(side, &report);
        if !self.actors[i].is_alive() {
            self.finish(side.opponent());
            return Ok(());
        }

        if stunned {
            self.log(format!("{name} is stunned and cannot act"));
            return Ok(());
        }

        self.actors[i].spend_mana(spell.mana_cost);
        if spell.mana_cost > 0 {
            self.emit_mana(side, -spell.mana_cost);
        }
        if spell.cooldown > 0 {
            self.spellbooks[i].start_cooldown(&spell.spell_id, spell.cooldown);
        }
        self.outcome.totals_mut(side).spells_cast += 1;
        self.log(format!("{name} casts {}", spell.name));

        let mut effects = self.apply_effects(EffectTrigger::OnCast, side, &spell, 0.0);

        let (hit, amount) = {
            let (attacker, defender) = match side {
                Side::Player => (&self.actors[0], &self.actors[1]),
                Side::Enemy => (&self.actors[1], &self.actors[0]),
            };
            let defender = if spell.is_heal() { attacker } else { defender };
            let mut ctx = ActionContext::new(attacker, defender, &spell, self.env.constants, &mut self.rng);
            let hit = self.hit_phase.run(&mut ctx);
            let amount = if spell.intent.requires_hit_check() {
                self.damage_phase.run(&mut ctx)
            } else {
                0
            };
            (hit, amount)
        };

        let totals = self.outcome.totals_mut(side);
        if hit {
            totals.hits += 1;
        } else {
            totals.misses += 1;
            self.log(format!("{name}'s {} misses", spell.name));
        }

        let mut died = false;
        if hit {
            match spell.intent {
                SpellIntent::Damage => {
                    let target = side.opponent();
                    let dealt = self.actors[target.index()].apply_damage(amount);
                    self.outcome.totals_mut(side).damage_dealt += i64::from(dealt);
                    self.emit_hp(target, -dealt);
                    died = !self.actors[target.index()].is_alive();
                }
                SpellIntent::Heal => {
                    let healed = self.actors[i].heal(amount);
                    self.outcome.totals_mut(side).healing_done += i64::from(healed);
                    self.emit_hp(side, healed);
                }
                SpellIntent::Buff | SpellIntent::Debuff | SpellIntent::Utility => {}
            }
        }

        if hit && side == Side::Player && spell.intent == SpellIntent::Damage {
            self.grant_xp(&spell);
        }
        if hit && !died {
            effects.extend(self.apply_effects(EffectTrigger::OnHit, side, &spell, f64::from(amount)));
        }

        self.events.emit(CombatEvent::SpellFired {
            side,
            outcome: ActionOutcome {
                spell_id: spell.spell_id.clone(),
                intent: spell.intent,
                hit,
                amount,
                effects,
            },
        });

        if died {
            self.finish(side);
        }
        Ok(())
    }

    fn apply_effects(
        &mut self,
        trigger: EffectTrigger,
        side: Side,
        spell: &ResolvedSpell,
        damage_dealt: f64,
    ) -> Vec<AppliedEffect> {
        let max_hp_before = [self.actors[0].max_hp(), self.actors[1].max_hp()];
        let hp_before = [self.actors[0].hp(), self.actors[1].hp()];
        let applied = self.effect_phase.run(
            trigger,
            side,
            spell,
            &mut self.actors,
            self.env.effects,
            &mut self.rng,
            damage_dealt,
        );
        for effect in &applied {
            if effect.outcome.landed() {
                let target = self.actors[effect.target.index()].name().to_string();
                self.log(format!("{target} is affected by {}", effect.effect_id));
            }
        }
        for holder in Side::all() {
            let i = holder.index();
            if self.actors[i].max_hp() != max_hp_before[i] || self.actors[i].hp() != hp_before[i] {
                self.emit_hp(*holder, self.actors[i].hp() - hp_before[i]);
            }
        }
        applied
    }

    fn report_ticks(&mut self, side: Side, report: &TickReport) {
        let name = self.actors[side.index()].name().to_string();
        for tick in &report.ticks {
            match tick.kind {
                EffectKind::DamageOverTime => {
                    self.log(format!("{name} takes {} {} damage from {}", tick.applied, tick.damage_type, tick.effect_id));
                    let credited = tick.source.unwrap_or(side.opponent());
                    self.outcome.totals_mut(credited).damage_dealt += i64::from(tick.applied);
                    self.emit_hp(side, -tick.applied);
                }
                EffectKind::HealOverTime => {
                    self.log(format!("{name} recovers {} HP from {}", tick.applied, tick.effect_id));
                    self.outcome.totals_mut(side).healing_done += i64::from(tick.applied);
                    self.emit_hp(side, tick.applied);
                }
                EffectKind::StatModifier | EffectKind::Stun => {}
            }
        }
        for expired in &report.expired {
            self.log(format!("{expired} fades from {name}"));
        }
    }

    fn grant_xp(&mut self, spell: &ResolvedSpell) {
        let defender = &self.actors[Side::Enemy.index()];
        let constants = self.env.constants;
        let xp = defender.level() as f64 * constants.tiers.get(defender.identity.tier) + constants.xp.base;
        if let Some(level) = self.spellbooks[Side::Player.index()].grant_xp(&spell.spell_id, xp) {
            self.log(format!("{} reached level {level}", spell.name));
        }
    }

    fn finish(&mut self, winner: Side) {
        if self.is_finished() {
            return;
        }
        self.outcome.winner = Some(winner);
        for actor in &mut self.actors {
            actor.clear_queued();
        }
        info!(%winner, turns = self.outcome.total_turns(), "combat ended");
        let name = self.actors[winner.index()].name().to_string();
        self.log(format!("{name} is victorious"));
        self.events.emit(CombatEvent::CombatEnded { winner });
    }

    fn log(&mut self, line: String) {
        self.events.emit(CombatEvent::Log(line));
    }

    fn emit_hp(&mut self, side: Side, delta: i32) {
        let actor = &self.actors[side.index()];
        let event = CombatEvent::HpChanged {
            side,
            hp: actor.hp(),
            max_hp: actor.max_hp(),
            delta,
        };
        self.events.emit(event);
    }

    fn emit_mana(&mut self, side: Side, delta: i32) {
        let actor = &self.actors[side.index()];
        let event = CombatEvent::ManaChanged {
            side,
            mana: actor.mana(),
            max_mana: actor.max_mana(),
            delta,
        };
        self.events.emit(event);
    }

    fn emit_meters(&mut self) {
        let event = CombatEvent::TurnMeterChanged {
            player: self.actors[0].turn_meter(),
            enemy: self.actors[1].turn_meter(),
        };
        self.events.emit(event);
    }
}
