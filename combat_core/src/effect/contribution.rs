//! Contribution - One source's share of an active effect bucket

use super::definition::{EffectDefinition, EffectKind};
use super::instance::{MagnitudeBasis, RolledMagnitude};
use crate::stats::{AppliedModifier, EffectOp, StatModifiers};
use crate::types::{Side, SpellId};
use serde::{Deserialize, Serialize};

/// The share of one (source actor, source spell) pair in a bucket
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Contribution {
    pub source: Side,
    pub source_spell: SpellId,
    /// Turns of the holder left before expiry
    pub remaining_turns: i32,
    pub stacks: u32,
    pub stackable: bool,
    pub max_stacks: u32,
    /// Accumulated flat magnitude over all stacks
    pub magnitude_flat: f64,
    /// Accumulated percent magnitude over all stacks
    pub magnitude_percent: f64,
    pub basis: MagnitudeBasis,
    /// Score compared by `OverwriteIfStronger`
    pub strength: f64,
    /// One tick amount per stack, oldest first
    pub periodic_ticks: Vec<f64>,
    applied_flat: f64,
    applied_percent: f64,
    applied: Vec<AppliedModifier>,
}

impl Contribution {
    /// A fresh single-stack contribution
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        source: Side,
        source_spell: SpellId,
        kind: EffectKind,
        duration: i32,
        stackable: bool,
        max_stacks: u32,
        rolled: RolledMagnitude,
        basis: MagnitudeBasis,
        strength: f64,
    ) -> Self {
        let periodic_ticks = if kind.is_periodic() { vec![rolled.flat] } else { Vec::new() };
        Contribution {
            source,
            source_spell,
            remaining_turns: duration,
            stacks: 1,
            stackable,
            max_stacks: max_stacks.max(1),
            magnitude_flat: rolled.flat,
            magnitude_percent: rolled.percent,
            basis,
            strength,
            periodic_ticks,
            applied_flat: 0.0,
            applied_percent: 0.0,
            applied: Vec::new(),
        }
    }

    pub fn is_from(&self, source: Side, spell: &SpellId) -> bool {
        self.source == source && &self.source_spell == spell
    }

    /// Add one stack of the rolled magnitude
    pub fn add_stack(&mut self, kind: EffectKind, rolled: RolledMagnitude) {
        self.stacks += 1;
        self.magnitude_flat += rolled.flat;
        self.magnitude_percent += rolled.percent;
        if kind.is_periodic() {
            self.periodic_ticks.push(rolled.flat);
        }
    }

    /// Replace the magnitude with a single fresh stack
    pub fn overwrite(&mut self, kind: EffectKind, rolled: RolledMagnitude, strength: f64) {
        self.stacks = 1;
        self.magnitude_flat = rolled.flat;
        self.magnitude_percent = rolled.percent;
        self.strength = strength;
        self.periodic_ticks.clear();
        if kind.is_periodic() {
            self.periodic_ticks.push(rolled.flat);
        }
    }

    /// Sum of the per-stack tick amounts
    pub fn periodic_total(&self) -> f64 {
        self.periodic_ticks.iter().sum()
    }

    /// Push the difference between the accumulated magnitude and what is already
    /// applied into the modifier set. Only stat modifier effects touch modifiers.
    pub fn sync(&mut self, modifiers: &mut StatModifiers, definition: &EffectDefinition) {
        let (EffectKind::StatModifier, Some(stat)) = (definition.kind, definition.stat) else {
            return;
        };
        let (target, applied) = match definition.op {
            EffectOp::Flat => (self.magnitude_flat, &mut self.applied_flat),
            EffectOp::MorePercent | EffectOp::LessPercent => (self.magnitude_percent, &mut self.applied_percent),
        };
        let delta = target - *applied;
        if delta == 0.0 {
            return;
        }
        self.applied.push(modifiers.apply(stat, definition.op, delta));
        *applied = target;
    }

    /// Remove every term this contribution pushed, newest first
    pub fn undo(&mut self, modifiers: &mut StatModifiers) {
        while let Some(term) = self.applied.pop() {
            modifiers.remove(&term);
        }
        self.applied_flat = 0.0;
        self.applied_percent = 0.0;
    }

    /// Terms currently applied on behalf of this contribution
    pub fn applied(&self) -> &[AppliedModifier] {
        &self.applied
    }
}
