//! Resolution pipeline - Ordered rule chains for hit, damage and effects
//!
//! A rule is one named step operating on the shared [`ActionContext`]. Phases hold
//! their rules in an explicit order and run them front to back; the order is part
//! of the contract.

mod context;
mod damage;
mod effects;
mod hit;

pub use context::{power_level, ActionContext};
pub use damage::{
    BaseDamageBonusRule, DamageBonusRule, DamagePhase, DefenseRule, MitigationRule, PowerScalingRule,
    SuppressionRule, TypeBonusRule, VarianceRule,
};
pub use effects::{AppliedEffect, EffectPhase};
pub use hit::{AccuracyRule, EvasionRule, HitChanceClampRule, HitPhase, LevelSuppressionHitRule};

/// One step of a resolution phase
pub trait Rule: Send + Sync {
    /// Name used in diagnostics
    fn name(&self) -> &'static str;

    /// Read and update the action context
    fn apply(&self, ctx: &mut ActionContext<'_>);
}

/// An ordered list of rules
#[derive(Default)]
pub struct RuleChain {
    rules: Vec<Box<dyn Rule>>,
}

impl RuleChain {
    pub fn new() -> Self {
        RuleChain { rules: Vec::new() }
    }

    /// Append a rule to the end of the chain
    pub fn push(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Box::new(rule));
    }

    /// Insert a rule directly before the named one, or at the end if it is absent
    pub fn insert_before(&mut self, name: &str, rule: impl Rule + 'static) {
        let index = self.rules.iter().position(|r| r.name() == name).unwrap_or(self.rules.len());
        self.rules.insert(index, Box::new(rule));
    }

    /// Remove the named rule. Returns whether it was present.
    pub fn remove(&mut self, name: &str) -> bool {
        let before = self.rules.len();
        self.rules.retain(|r| r.name() != name);
        self.rules.len() != before
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.name()).collect()
    }

    pub fn run(&self, ctx: &mut ActionContext<'_>) {
        for rule in &self.rules {
            rule.apply(ctx);
            tracing::trace!(
                rule = rule.name(),
                hit_chance = ctx.hit_chance,
                damage = ctx.damage,
                "rule applied"
            );
        }
    }
}

impl std::fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
