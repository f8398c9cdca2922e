//! Effect phase - Applies a spell's effect instances for one trigger

use crate::actor::Actor;
use crate::effect::{
    ApplyOutcome, ApplyRequest, EffectDatabase, EffectError, EffectTarget, EffectTrigger,
};
use crate::rng::CombatRng;
use crate::spell::ResolvedSpell;
use crate::types::{EffectId, Side};
use tracing::warn;

/// One instance's application result
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedEffect {
    pub effect_id: EffectId,
    pub target: Side,
    pub outcome: ApplyOutcome,
}

/// Applies on-cast or on-hit instances in declaration order
#[derive(Debug, Clone, Copy, Default)]
pub struct EffectPhase;

impl EffectPhase {
    /// Apply every instance of `spell` flagged with `trigger`. `damage_dealt` is the
    /// basis for `DamageDealt` magnitudes (zero on cast).
    #[allow(clippy::too_many_arguments)]
    pub fn run(
        &self,
        trigger: EffectTrigger,
        caster: Side,
        spell: &ResolvedSpell,
        actors: &mut [Actor; 2],
        effects: &dyn EffectDatabase,
        rng: &mut dyn CombatRng,
        damage_dealt: f64,
    ) -> Vec<AppliedEffect> {
        let mut applied = Vec::new();
        for instance in spell.effects_for(trigger) {
            let target = match instance.target {
                EffectTarget::Caster => caster,
                EffectTarget::Target => caster.opponent(),
            };
            let Some(definition) = effects.get_by_id(&instance.effect_id) else {
                warn!(effect = %instance.effect_id, spell = %spell.spell_id, "skipping unknown effect");
                applied.push(AppliedEffect {
                    effect_id: instance.effect_id.clone(),
                    target,
                    outcome: ApplyOutcome::Skipped(EffectError::UnknownEffect(instance.effect_id.clone())),
                });
                continue;
            };

            let power = actors[caster.index()].effective().power(spell.kind);
            let request = ApplyRequest {
                instance,
                source: caster,
                source_spell: &spell.spell_id,
                level: spell.level,
                power,
                damage_dealt,
            };
            let outcome = actors[target.index()].apply_effect(definition, &request, rng);
            applied.push(AppliedEffect {
                effect_id: instance.effect_id.clone(),
                target,
                outcome,
            });
        }
        applied
    }
}
