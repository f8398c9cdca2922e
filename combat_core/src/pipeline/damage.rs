//! Damage phase - Turns a resolved spell into a damage (or heal) amount
//!
//! Order: base damage bonus → power scaling → type bonus/vulnerability →
//! weaken/resistance → flat defense → level suppression → damage bonus → variance.
//! Heals take base, power scaling and variance only.

use super::{ActionContext, Rule, RuleChain};
use tracing::debug;

/// Attacker modifiers on the spell's base damage
#[derive(Debug, Clone, Copy, Default)]
pub struct BaseDamageBonusRule;

impl Rule for BaseDamageBonusRule {
    fn name(&self) -> &'static str {
        "base_damage_bonus"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        ctx.damage = ctx.attacker.modifiers().base_damage.apply(ctx.damage);
    }
}

/// Adds `power × power_scaling`
#[derive(Debug, Clone, Copy, Default)]
pub struct PowerScalingRule;

impl Rule for PowerScalingRule {
    fn name(&self) -> &'static str {
        "power_scaling"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        let power = ctx.attacker_stats.power(ctx.spell.kind).max(0.0);
        ctx.damage += power * ctx.spell.power_scaling;
    }
}

/// Attacker bonus and defender vulnerability for the spell's damage type
#[derive(Debug, Clone, Copy, Default)]
pub struct TypeBonusRule;

impl Rule for TypeBonusRule {
    fn name(&self) -> &'static str {
        "type_bonus"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        if ctx.spell.is_heal() {
            return;
        }
        let dt = ctx.spell.damage_type;
        let bonus = ctx.attacker.modifiers().damage_bonus.get(dt);
        let vulnerability = ctx.defender.modifiers().vulnerability.get(dt);
        ctx.damage = vulnerability.apply(bonus.apply(ctx.damage));
    }
}

/// Attacker weaken and defender resistance: flats subtract, multipliers divide
#[derive(Debug, Clone, Copy, Default)]
pub struct MitigationRule;

impl Rule for MitigationRule {
    fn name(&self) -> &'static str {
        "mitigation"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        if ctx.spell.is_heal() {
            return;
        }
        let dt = ctx.spell.damage_type;
        let weaken = ctx.attacker.modifiers().weaken.get(dt);
        let resistance = ctx.defender.modifiers().resistance.get(dt);
        let reduced = (ctx.damage - weaken.flat_total() - resistance.flat_total()).max(0.0);
        let divisor = weaken.multiplier() * resistance.multiplier();
        ctx.damage = if divisor > 0.0 { reduced / divisor } else { reduced };
    }
}

/// Flat reduction by the defender's defense for the spell's kind
#[derive(Debug, Clone, Copy, Default)]
pub struct DefenseRule;

impl Rule for DefenseRule {
    fn name(&self) -> &'static str {
        "defense"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        if ctx.spell.is_heal() {
            return;
        }
        let defense = ctx.defender_stats.defense(ctx.spell.kind).max(0.0);
        ctx.damage = (ctx.damage - defense * ctx.constants.damage.defense_factor).max(0.0);
    }
}

/// Power level difference scales damage, bounded by the configured multipliers
#[derive(Debug, Clone, Copy, Default)]
pub struct SuppressionRule;

impl Rule for SuppressionRule {
    fn name(&self) -> &'static str {
        "suppression"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        if ctx.spell.is_heal() {
            return;
        }
        let c = &ctx.constants.damage;
        let diff = ctx.attacker_power_level() - ctx.defender_power_level();
        let multiplier = (1.0 + diff * c.suppression_per_level)
            .clamp(c.min_suppression_multiplier, c.max_suppression_multiplier.max(c.min_suppression_multiplier));
        ctx.damage *= multiplier;
    }
}

/// Attacker flat and percent damage dealt modifiers
#[derive(Debug, Clone, Copy, Default)]
pub struct DamageBonusRule;

impl Rule for DamageBonusRule {
    fn name(&self) -> &'static str {
        "damage_bonus"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        if ctx.spell.is_heal() {
            return;
        }
        ctx.damage = ctx.attacker.modifiers().damage_dealt.apply(ctx.damage);
    }
}

/// Uniform ± spread. No roll is made when the spread is zero.
#[derive(Debug, Clone, Copy, Default)]
pub struct VarianceRule;

impl Rule for VarianceRule {
    fn name(&self) -> &'static str {
        "variance"
    }

    fn apply(&self, ctx: &mut ActionContext<'_>) {
        let spread = ctx.constants.damage.variance_percent.abs();
        if spread == 0.0 {
            return;
        }
        let roll = ctx.rng.range(-spread, spread);
        ctx.damage *= 1.0 + roll / 100.0;
    }
}

/// Damage computation for actions that hit
#[derive(Debug)]
pub struct DamagePhase {
    pub rules: RuleChain,
}

impl Default for DamagePhase {
    fn default() -> Self {
        Self::standard()
    }
}

impl DamagePhase {
    pub fn standard() -> Self {
        let mut rules = RuleChain::new();
        rules.push(BaseDamageBonusRule);
        rules.push(PowerScalingRule);
        rules.push(TypeBonusRule);
        rules.push(MitigationRule);
        rules.push(DefenseRule);
        rules.push(SuppressionRule);
        rules.push(DamageBonusRule);
        rules.push(VarianceRule);
        DamagePhase { rules }
    }

    pub fn with_rules(rules: RuleChain) -> Self {
        DamagePhase { rules }
    }

    /// Compute the amount for a hit; misses deal nothing
    pub fn run(&self, ctx: &mut ActionContext<'_>) -> i32 {
        if !ctx.hit {
            ctx.damage = 0.0;
            return 0;
        }
        ctx.damage = ctx.spell.damage;
        self.rules.run(ctx);
        let amount = ctx.final_damage();
        debug!(spell = %ctx.spell.spell_id, amount, "damage resolved");
        amount
    }
}
