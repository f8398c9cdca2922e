//! Periodic tick processing at the start of the holder's turn

use super::definition::EffectKind;
use super::ledger::EffectLedger;
use crate::stats::StatModifiers;
use crate::types::{DamageType, EffectId, Side};
use std::ops::ControlFlow;
use tracing::trace;

/// The combined periodic amount of one bucket for one turn
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicTickResult {
    pub effect_id: EffectId,
    pub kind: EffectKind,
    pub damage_type: DamageType,
    /// Side credited with the tick
    pub source: Option<Side>,
    /// Sum of every stack's tick amount
    pub amount: f64,
    /// HP actually changed by the caller
    pub applied: i32,
}

impl PeriodicTickResult {
    /// Tick amount as a whole HP value
    pub fn hp_amount(&self) -> i32 {
        self.amount.max(0.0).floor() as i32
    }
}

/// Result of one `on_action_chosen` pass
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TickReport {
    pub ticks: Vec<PeriodicTickResult>,
    /// Effects whose last contribution expired this turn
    pub expired: Vec<EffectId>,
    /// The callback stopped the batch
    pub interrupted: bool,
}

impl EffectLedger {
    /// Tick every bucket once at the start of the holder's turn.
    ///
    /// Periodic buckets hand their summed tick to `on_tick`, which applies it and may
    /// break to stop the batch (the holder died). Then every contribution loses one
    /// turn and expired contributions undo their modifiers. Buckets left without
    /// contributions are removed.
    pub fn on_action_chosen<F>(&mut self, modifiers: &mut StatModifiers, mut on_tick: F) -> TickReport
    where
        F: FnMut(&mut PeriodicTickResult) -> ControlFlow<()>,
    {
        let mut report = TickReport::default();

        for bucket in &mut self.buckets {
            if bucket.kind.is_periodic() {
                let mut tick = PeriodicTickResult {
                    effect_id: bucket.key.effect_id.clone(),
                    kind: bucket.kind,
                    damage_type: bucket.damage_type,
                    source: bucket.dominant_source(),
                    amount: bucket.periodic_total(),
                    applied: 0,
                };
                let flow = on_tick(&mut tick);
                trace!(effect = %tick.effect_id, amount = tick.amount, applied = tick.applied, "periodic tick");
                report.ticks.push(tick);
                if flow.is_break() {
                    report.interrupted = true;
                    break;
                }
            }

            for contribution in &mut bucket.contributions {
                contribution.remaining_turns -= 1;
                if contribution.remaining_turns <= 0 {
                    contribution.undo(modifiers);
                }
            }
            bucket.contributions.retain(|c| c.remaining_turns > 0);
            if bucket.is_empty() {
                report.expired.push(bucket.key.effect_id.clone());
            }
        }

        self.buckets.retain(|b| !b.is_empty());
        report
    }
}
