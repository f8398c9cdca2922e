//! Prelude module for convenient imports
//!
//! ```rust
//! use combat_core::prelude::*;
//! ```

// Core types
pub use crate::types::{DamageKind, DamageType, EffectId, Side, SpellId, SpellIntent, Tier};
pub use crate::rng::CombatRng;

// Actors and stats
pub use crate::actor::{Actor, ActorIdentity};
pub use crate::stats::{BaseStats, DerivedStats, EffectOp, EffectStat, StatModifiers};

// Effects
pub use crate::effect::{
    EffectDatabase, EffectDefinition, EffectInstance, EffectKind, EffectRegistry, EffectTarget, EffectTrigger,
};

// Spells
pub use crate::spell::{SpellBook, SpellDefinition, SpellResolver, SpellTable, Spellbook};

// Engine
pub use crate::engine::{CombatEnv, CombatEvent, CombatState, SchedulerStep, WeightedRandomPolicy};

// Config
pub use crate::config::{default_effect_registry, default_spell_table, CombatConstants};
