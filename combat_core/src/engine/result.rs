//! CombatOutcome - Running totals of an encounter

use crate::types::Side;
use serde::{Deserialize, Serialize};

/// Per-side totals for one encounter
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SideTotals {
    /// Turns that consumed the meter (stunned turns included)
    pub turns: u32,
    pub spells_cast: u32,
    pub hits: u32,
    pub misses: u32,
    /// Direct and periodic damage dealt to the opponent
    pub damage_dealt: i64,
    pub healing_done: i64,
}

/// Summary readable at any point, final once a winner is set
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CombatOutcome {
    pub winner: Option<Side>,
    pub player: SideTotals,
    pub enemy: SideTotals,
}

impl CombatOutcome {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn totals(&self, side: Side) -> &SideTotals {
        match side {
            Side::Player => &self.player,
            Side::Enemy => &self.enemy,
        }
    }

    pub fn totals_mut(&mut self, side: Side) -> &mut SideTotals {
        match side {
            Side::Player => &mut self.player,
            Side::Enemy => &mut self.enemy,
        }
    }

    pub fn is_finished(&self) -> bool {
        self.winner.is_some()
    }

    pub fn total_turns(&self) -> u32 {
        self.player.turns + self.enemy.turns
    }
}
