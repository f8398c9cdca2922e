//! Stats - Base attributes, derived stats and the aggregate modifier set

mod derived;
mod modifiers;
mod stat_value;

pub use derived::{BaseStats, DerivedStats};
pub use modifiers::{AppliedModifier, DamageTypeModifiers, EffectOp, EffectStat, ModifierTerm, StatModifiers};
pub use stat_value::{less_factor, more_factor, StatValue};
