//! Effect system - Definitions, per-source stacking and periodic ticks

mod bucket;
mod contribution;
mod definition;
mod instance;
mod ledger;
mod registry;
pub mod tick;

pub use bucket::{BucketKey, EffectBucket};
pub use contribution::Contribution;
pub use definition::{DurationStackMode, EffectDefinition, EffectError, EffectKind, ReapplyRule};
pub use instance::{
    EffectInstance, EffectMagnitude, EffectTarget, EffectTrigger, MagnitudeBasis, RolledMagnitude, ScaledValue,
};
pub use ledger::{ApplyOutcome, ApplyRequest, EffectLedger};
pub use registry::{EffectDatabase, EffectRegistry};
pub use tick::{PeriodicTickResult, TickReport};
