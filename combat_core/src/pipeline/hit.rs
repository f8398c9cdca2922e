//! Hit phase - Builds a hit chance and rolls once

use super::{ActionContext, Rule, RuleChain};
use tracing::debug;

/// Attacker hit chance modifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct AccuracyRule;

impl Rule for AccuracyRule {
    fn name(&self) -> &'static str {
        "accuracy"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        ctx.hit_chance = ctx.attacker.modifiers().hit_chance.apply(ctx.hit_chance);
    }
}

/// Defender evasion subtracts percentage points. Heals cannot be evaded.
#[derive(Debug, Clone, Copy, Default)]
pub struct EvasionRule;

impl Rule for EvasionRule {
    fn name(&self) -> &'static str {
        "evasion"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        if ctx.spell.is_heal() {
            return;
        }
        ctx.hit_chance -= ctx.defender_stats.evasion.max(0.0);
    }
}

/// Power level difference moves the hit chance in either direction
#[derive(Debug, Clone, Copy, Default)]
pub struct LevelSuppressionHitRule;

impl Rule for LevelSuppressionHitRule {
    fn name(&self) -> &'static str {
        "level_suppression_hit"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        if ctx.spell.is_heal() {
            return;
        }
        let diff = ctx.attacker_power_level() - ctx.defender_power_level();
        ctx.hit_chance += diff * ctx.constants.hit.suppression_per_level;
    }
}

/// Clamp to the configured floor and ceiling
#[derive(Debug, Clone, Copy, Default)]
pub struct HitChanceClampRule;

impl Rule for HitChanceClampRule {
    fn name(&self) -> &'static str {
        "hit_chance_clamp"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        let hit = &ctx.constants.hit;
        ctx.hit_chance = ctx.hit_chance.clamp(hit.min_chance, hit.max_chance.max(hit.min_chance));
    }
}

/// Hit check for damage and heal actions
#[derive(Debug)]
pub struct HitPhase {
    pub rules: RuleChain,
}

impl Default for HitPhase {
    fn default() -> Self {
        Self::standard()
    }
}

impl HitPhase {
    /// Accuracy, then evasion, then level suppression, then clamp
    pub fn standard() -> Self {
        let mut rules = RuleChain::new();
        rules.push(AccuracyRule);
        rules.push(EvasionRule);
        rules.push(LevelSuppressionHitRule);
        rules.push(HitChanceClampRule);
        HitPhase { rules }
    }

    pub fn with_rules(rules: RuleChain) -> Self {
        HitPhase { rules }
    }

    /// Run the chain and roll. Buff, debuff and utility actions always succeed.
    pub fn run(&self, ctx: &mut ActionContext<'_>) -> bool {
        if !ctx.spell.intent.requires_hit_check() {
            ctx.hit_chance = 100.0;
            ctx.hit = true;
            return true;
        }
        ctx.hit_chance = ctx.spell.hit_chance;
        self.rules.run(ctx);
        let roll = ctx.rng.range(0.0, 100.0);
        ctx.hit = roll < ctx.hit_chance;
        debug!(spell = %ctx.spell.spell_id, chance = ctx.hit_chance, roll, hit = ctx.hit, "hit check");
        ctx.hit
    }
}
