//! Engine errors

use crate::types::{Side, SpellId};
use thiserror::Error;

/// Why an action could not be queued or fired
#[derive(Error, Debug, Clone, PartialEq)]
pub enum CombatError {
    #[error("{side} does not know spell '{spell}'")]
    UnknownSpell { side: Side, spell: SpellId },
    #[error("spell '{0}' is on cooldown")]
    SpellOnCooldown(SpellId),
    #[error("not enough mana for '{spell}': needs {cost}, has {mana}")]
    InsufficientMana { spell: SpellId, cost: i32, mana: i32 },
    #[error("spell '{spell}' cannot be resolved at level {level}")]
    UnresolvableSpell { spell: SpellId, level: u32 },
    #[error("{0} already has a queued action")]
    AlreadyQueued(Side),
    #[error("combat is already finished")]
    CombatFinished,
}
