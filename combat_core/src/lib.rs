//! combat_core - Turn-meter combat between a player and an enemy
//!
//! This library provides:
//! - Turn scheduler: continuous-time meters deciding who acts next
//! - Resolution pipeline: ordered hit, damage and effect rule chains
//! - Effect ledger: per-source stacking, merging, periodic ticks and exact undo
//! - Combat engine: actors, resources, spellbooks and the event stream

pub mod actor;
pub mod config;
pub mod effect;
pub mod engine;
pub mod pipeline;
pub mod prelude;
pub mod rng;
pub mod spell;
pub mod stats;
pub mod types;

// Re-export core types for convenience
pub use actor::{Actor, ActorIdentity, QueuedAction};
pub use config::{default_effect_registry, default_spell_table, CombatConstants, ConfigError};
pub use effect::{
    ApplyOutcome, EffectDatabase, EffectDefinition, EffectError, EffectInstance, EffectKind, EffectLedger,
    EffectRegistry,
};
pub use engine::{
    CombatEnv, CombatError, CombatEvent, CombatOutcome, CombatState, SchedulerStep, WeightedRandomPolicy,
};
pub use pipeline::{ActionContext, DamagePhase, HitPhase, Rule, RuleChain};
pub use rng::{CombatRng, FixedRng};
pub use spell::{ResolvedSpell, SpellBook, SpellResolver, SpellTable, Spellbook};
pub use stats::{BaseStats, DerivedStats, StatModifiers, StatValue};
pub use types::{DamageKind, DamageType, EffectId, Side, SpellId, SpellIntent, Tier};
