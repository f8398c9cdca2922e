//! EffectLedger - Applies, stacks and merges the effects active on one actor

use super::bucket::{BucketKey, EffectBucket};
use super::contribution::Contribution;
use super::definition::{DurationStackMode, EffectDefinition, EffectError, EffectKind, ReapplyRule};
use super::instance::{EffectInstance, RolledMagnitude};
use crate::rng::CombatRng;
use crate::stats::StatModifiers;
use crate::types::{EffectId, Side, SpellId};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace, warn};

/// Everything needed to apply one effect instance
#[derive(Debug, Clone, Copy)]
pub struct ApplyRequest<'a> {
    pub instance: &'a EffectInstance,
    pub source: Side,
    pub source_spell: &'a SpellId,
    /// Level of the granting spell
    pub level: u32,
    /// Caster power, for `Power` basis magnitudes
    pub power: f64,
    /// Amount just dealt, for `DamageDealt` basis magnitudes
    pub damage_dealt: f64,
}

/// What an application did to the ledger
#[derive(Debug, Clone, PartialEq)]
pub enum ApplyOutcome {
    /// The chance roll failed
    Resisted,
    /// A new contribution was created
    Created,
    /// A stack was added on top
    Stacked { stacks: u32 },
    /// Already at the stack cap; only duration stacking applied
    AtMaxStacks,
    /// A weaker contribution was replaced
    Overwritten,
    /// The reapply rule left everything as it was
    Unchanged,
    /// The configuration was malformed and the application was skipped
    Skipped(EffectError),
}

impl ApplyOutcome {
    /// Whether the application landed on the holder
    pub fn landed(&self) -> bool {
        matches!(
            self,
            ApplyOutcome::Created | ApplyOutcome::Stacked { .. } | ApplyOutcome::AtMaxStacks | ApplyOutcome::Overwritten
        )
    }
}

/// All active effects on one actor
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EffectLedger {
    pub(super) buckets: Vec<EffectBucket>,
}

impl EffectLedger {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn buckets(&self) -> &[EffectBucket] {
        &self.buckets
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Every bucket of an effect, whatever its source
    pub fn buckets_of<'a>(&'a self, effect_id: &'a EffectId) -> impl Iterator<Item = &'a EffectBucket> + 'a {
        self.buckets.iter().filter(move |b| &b.key.effect_id == effect_id)
    }

    pub fn has_effect(&self, effect_id: &EffectId) -> bool {
        self.buckets_of(effect_id).next().is_some()
    }

    pub fn has_kind(&self, kind: EffectKind) -> bool {
        self.buckets.iter().any(|b| b.kind == kind)
    }

    /// Combined stacks of an effect over all of its buckets
    pub fn stacks_of(&self, effect_id: &EffectId) -> u32 {
        self.buckets_of(effect_id).map(EffectBucket::total_stacks).sum()
    }

    /// Apply an instance, mutating `modifiers` for stat modifier effects
    pub fn apply(
        &mut self,
        modifiers: &mut StatModifiers,
        definition: &EffectDefinition,
        request: &ApplyRequest<'_>,
        rng: &mut dyn CombatRng,
    ) -> ApplyOutcome {
        let instance = request.instance;
        if let Err(err) = instance.validate(definition) {
            warn!(effect = %definition.id, error = %err, "skipping malformed effect");
            return ApplyOutcome::Skipped(err);
        }

        let chance = instance.chance.at(request.level);
        let roll = rng.range_int(1, 101);
        if f64::from(roll) > chance {
            trace!(effect = %definition.id, roll, chance, "effect resisted");
            return ApplyOutcome::Resisted;
        }

        let rolled = instance.magnitude.roll(request.level, request.power, request.damage_dealt);
        let strength = instance.strength.or(definition.strength).unwrap_or(rolled.score());
        let duration = instance.duration_at(request.level);

        let key = BucketKey::new(definition.id.clone(), definition.mergeable, request.source, request.source_spell);
        let index = match self.buckets.iter().position(|b| b.key == key) {
            Some(index) => index,
            None => {
                self.buckets
                    .push(EffectBucket::new(key, definition.kind, definition.damage_type));
                self.buckets.len() - 1
            }
        };
        let bucket = &mut self.buckets[index];

        let Some(existing) = bucket.contribution_mut(request.source, request.source_spell) else {
            let mut contribution = Contribution::new(
                request.source,
                request.source_spell.clone(),
                definition.kind,
                duration,
                instance.stackable,
                instance.max_stacks,
                rolled,
                instance.magnitude.basis,
                strength,
            );
            contribution.sync(modifiers, definition);
            bucket.contributions.push(contribution);
            debug!(effect = %definition.id, source = %request.source, duration, "effect applied");
            return ApplyOutcome::Created;
        };

        let outcome = reapply(existing, modifiers, definition, instance, rolled, strength, duration);
        existing.sync(modifiers, definition);
        debug!(effect = %definition.id, source = %request.source, ?outcome, "effect reapplied");
        outcome
    }

    /// Remove every bucket of an effect, undoing its modifiers
    pub fn dispel(&mut self, modifiers: &mut StatModifiers, effect_id: &EffectId) -> usize {
        let mut removed = 0;
        self.buckets.retain_mut(|bucket| {
            if &bucket.key.effect_id != effect_id {
                return true;
            }
            for contribution in &mut bucket.contributions {
                contribution.undo(modifiers);
            }
            removed += 1;
            false
        });
        removed
    }

    /// Remove everything, undoing all modifiers
    pub fn clear(&mut self, modifiers: &mut StatModifiers) {
        for bucket in &mut self.buckets {
            for contribution in &mut bucket.contributions {
                contribution.undo(modifiers);
            }
        }
        self.buckets.clear();
    }
}

fn reapply(
    existing: &mut Contribution,
    modifiers: &mut StatModifiers,
    definition: &EffectDefinition,
    instance: &EffectInstance,
    rolled: RolledMagnitude,
    strength: f64,
    duration: i32,
) -> ApplyOutcome {
    match definition.reapply {
        ReapplyRule::DoNothingIfPresent => ApplyOutcome::Unchanged,
        ReapplyRule::AddOnTop => {
            if !(existing.stackable && instance.stackable) {
                return ApplyOutcome::Unchanged;
            }
            let cap = existing.max_stacks.min(instance.max_stacks.max(1));
            existing.max_stacks = cap;
            stack_duration(existing, definition, duration);
            if existing.stacks >= cap {
                return ApplyOutcome::AtMaxStacks;
            }
            existing.add_stack(definition.kind, rolled);
            ApplyOutcome::Stacked {
                stacks: existing.stacks,
            }
        }
        ReapplyRule::OverwriteIfStronger => {
            if strength <= existing.strength {
                return ApplyOutcome::Unchanged;
            }
            // a weaker magnitude is not expressible as a delta factor; start clean
            existing.undo(modifiers);
            existing.overwrite(definition.kind, rolled, strength);
            stack_duration(existing, definition, duration);
            ApplyOutcome::Overwritten
        }
    }
}

fn stack_duration(existing: &mut Contribution, definition: &EffectDefinition, duration: i32) {
    existing.remaining_turns = match definition.duration_stack {
        DurationStackMode::None => existing.remaining_turns,
        DurationStackMode::Prolong => existing.remaining_turns + duration,
        DurationStackMode::Refresh if definition.force_refresh => duration,
        DurationStackMode::Refresh => existing.remaining_turns.max(duration),
    };
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::effect::instance::MagnitudeBasis;
    use crate::rng::FixedRng;
    use crate::stats::{EffectOp, EffectStat};
    use proptest::prelude::*;

    fn always() -> FixedRng {
        FixedRng::new(0.0)
    }

    fn request<'a>(instance: &'a EffectInstance, source: Side, spell: &'a SpellId) -> ApplyRequest<'a> {
        ApplyRequest {
            instance,
            source,
            source_spell: spell,
            level: 1,
            power: 0.0,
            damage_dealt: 0.0,
        }
    }

    fn might() -> EffectDefinition {
        EffectDefinition::stat_modifier("might", "Might", EffectStat::AttackPower, EffectOp::Flat)
    }

    #[test]
    fn test_failed_chance_is_noop() {
        let def = might();
        let instance = EffectInstance::new("might").with_flat(10.0).with_chance(50.0);
        let spell = SpellId::from("shout");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        let outcome = ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &spell), &mut FixedRng::new(1.0));
        assert_eq!(outcome, ApplyOutcome::Resisted);
        assert!(ledger.is_empty());
        assert!(mods.is_empty());
    }

    #[test]
    fn test_create_applies_full_magnitude() {
        let def = might();
        let instance = EffectInstance::new("might").with_flat(10.0).with_duration(3.0);
        let spell = SpellId::from("shout");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        let outcome = ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &spell), &mut always());
        assert_eq!(outcome, ApplyOutcome::Created);
        assert!((mods.attack_power.flat_total() - 10.0).abs() < f64::EPSILON);
        assert_eq!(ledger.buckets()[0].contributions[0].remaining_turns, 3);
    }

    #[test]
    fn test_do_nothing_if_present() {
        let def = might();
        let instance = EffectInstance::new("might").with_flat(10.0);
        let spell = SpellId::from("shout");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &spell), &mut always());
        let stronger = EffectInstance::new("might").with_flat(50.0);
        let outcome = ledger.apply(&mut mods, &def, &request(&stronger, Side::Player, &spell), &mut always());
        assert_eq!(outcome, ApplyOutcome::Unchanged);
        assert!((mods.attack_power.flat_total() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_on_top_non_stackable_is_noop() {
        let def = might().with_reapply(ReapplyRule::AddOnTop);
        let instance = EffectInstance::new("might").with_flat(10.0);
        let spell = SpellId::from("shout");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &spell), &mut always());
        let outcome = ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &spell), &mut always());
        assert_eq!(outcome, ApplyOutcome::Unchanged);
        assert_eq!(ledger.stacks_of(&EffectId::from("might")), 1);
    }

    #[test]
    fn test_add_on_top_caps_at_smaller_max() {
        let def = might().with_reapply(ReapplyRule::AddOnTop);
        let first = EffectInstance::new("might").with_flat(5.0).stacking(5);
        let second = EffectInstance::new("might").with_flat(5.0).stacking(2);
        let spell = SpellId::from("shout");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        ledger.apply(&mut mods, &def, &request(&first, Side::Player, &spell), &mut always());
        let outcome = ledger.apply(&mut mods, &def, &request(&second, Side::Player, &spell), &mut always());
        assert_eq!(outcome, ApplyOutcome::Stacked { stacks: 2 });
        let outcome = ledger.apply(&mut mods, &def, &request(&first, Side::Player, &spell), &mut always());
        assert_eq!(outcome, ApplyOutcome::AtMaxStacks);

        assert_eq!(ledger.stacks_of(&EffectId::from("might")), 2);
        assert!((mods.attack_power.flat_total() - 10.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_add_on_top_appends_tick() {
        let def = EffectDefinition::new("bleed", "Bleed", EffectKind::DamageOverTime).with_reapply(ReapplyRule::AddOnTop);
        let spell = SpellId::from("rend");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        let weak = EffectInstance::new("bleed").with_flat(3.0).stacking(4);
        let strong = EffectInstance::new("bleed").with_flat(7.0).stacking(4);
        ledger.apply(&mut mods, &def, &request(&weak, Side::Enemy, &spell), &mut always());
        ledger.apply(&mut mods, &def, &request(&strong, Side::Enemy, &spell), &mut always());

        let contribution = &ledger.buckets()[0].contributions[0];
        assert_eq!(contribution.periodic_ticks, vec![3.0, 7.0]);
        assert_eq!(contribution.stacks, 2);
        assert!(mods.is_empty());
    }

    #[test]
    fn test_overwrite_only_when_strictly_stronger() {
        let def = EffectDefinition::stat_modifier("hex", "Hex", EffectStat::Evasion, EffectOp::LessPercent)
            .with_reapply(ReapplyRule::OverwriteIfStronger);
        let spell = SpellId::from("hex");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        let base = EffectInstance::new("hex").with_percent(20.0, MagnitudeBasis::None);
        ledger.apply(&mut mods, &def, &request(&base, Side::Enemy, &spell), &mut always());

        let equal = EffectInstance::new("hex").with_percent(20.0, MagnitudeBasis::None);
        let outcome = ledger.apply(&mut mods, &def, &request(&equal, Side::Enemy, &spell), &mut always());
        assert_eq!(outcome, ApplyOutcome::Unchanged);

        let stronger = EffectInstance::new("hex").with_percent(30.0, MagnitudeBasis::None);
        let outcome = ledger.apply(&mut mods, &def, &request(&stronger, Side::Enemy, &spell), &mut always());
        assert_eq!(outcome, ApplyOutcome::Overwritten);
        assert!((mods.evasion.multiplier() - 0.7).abs() < 1e-9);
        assert_eq!(mods.evasion.factors.len(), 1);
    }

    #[test]
    fn test_explicit_strength_overrides_magnitude() {
        let def = might().with_reapply(ReapplyRule::OverwriteIfStronger);
        let spell = SpellId::from("shout");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        let mut rated = EffectInstance::new("might").with_flat(5.0);
        rated.strength = Some(100.0);
        ledger.apply(&mut mods, &def, &request(&rated, Side::Player, &spell), &mut always());

        let bigger = EffectInstance::new("might").with_flat(50.0);
        let outcome = ledger.apply(&mut mods, &def, &request(&bigger, Side::Player, &spell), &mut always());
        assert_eq!(outcome, ApplyOutcome::Unchanged);
    }

    #[test]
    fn test_duration_stacking_modes() {
        let spell = SpellId::from("shout");
        let instance = EffectInstance::new("might").with_flat(1.0).with_duration(2.0).stacking(9);
        let longer = EffectInstance::new("might").with_flat(1.0).with_duration(5.0).stacking(9);

        let cases = [
            (DurationStackMode::None, false, 2),
            (DurationStackMode::Prolong, false, 7),
            (DurationStackMode::Refresh, false, 5),
        ];
        for (mode, force, expected) in cases {
            let mut def = might().with_reapply(ReapplyRule::AddOnTop).with_duration_stack(mode);
            def.force_refresh = force;
            let mut ledger = EffectLedger::new();
            let mut mods = StatModifiers::new();
            ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &spell), &mut always());
            ledger.apply(&mut mods, &def, &request(&longer, Side::Player, &spell), &mut always());
            assert_eq!(ledger.buckets()[0].contributions[0].remaining_turns, expected, "{mode:?}");
        }

        // forced refresh takes the new duration even when shorter
        let mut def = might().with_reapply(ReapplyRule::AddOnTop).with_duration_stack(DurationStackMode::Refresh);
        def.force_refresh = true;
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();
        ledger.apply(&mut mods, &def, &request(&longer, Side::Player, &spell), &mut always());
        ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &spell), &mut always());
        assert_eq!(ledger.buckets()[0].contributions[0].remaining_turns, 2);
    }

    #[test]
    fn test_overwrite_follows_duration_stacking() {
        let spell = SpellId::from("shout");
        let weak = EffectInstance::new("might").with_flat(2.0).with_duration(4.0);
        let strong = EffectInstance::new("might").with_flat(8.0).with_duration(2.0);

        let cases = [
            (DurationStackMode::None, 4),
            (DurationStackMode::Prolong, 6),
            (DurationStackMode::Refresh, 4),
        ];
        for (mode, expected) in cases {
            let def = might().with_reapply(ReapplyRule::OverwriteIfStronger).with_duration_stack(mode);
            let mut ledger = EffectLedger::new();
            let mut mods = StatModifiers::new();
            ledger.apply(&mut mods, &def, &request(&weak, Side::Player, &spell), &mut always());
            let outcome = ledger.apply(&mut mods, &def, &request(&strong, Side::Player, &spell), &mut always());
            assert_eq!(outcome, ApplyOutcome::Overwritten);
            assert_eq!(ledger.buckets()[0].contributions[0].remaining_turns, expected, "{mode:?}");
            assert!((mods.attack_power.flat_total() - 8.0).abs() < f64::EPSILON);
        }
    }

    #[test]
    fn test_mergeable_shares_one_bucket() {
        let def = EffectDefinition::stat_modifier("slow", "Slow", EffectStat::AttackSpeed, EffectOp::LessPercent).mergeable();
        let instance = EffectInstance::new("slow").with_percent(10.0, MagnitudeBasis::None);
        let frost = SpellId::from("frostbolt");
        let claw = SpellId::from("ice_claw");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &frost), &mut always());
        ledger.apply(&mut mods, &def, &request(&instance, Side::Enemy, &claw), &mut always());

        assert_eq!(ledger.buckets().len(), 1);
        assert_eq!(ledger.buckets()[0].contributions.len(), 2);
    }

    #[test]
    fn test_unmergeable_bucket_per_source() {
        let def = might();
        let instance = EffectInstance::new("might").with_flat(4.0);
        let shout = SpellId::from("shout");
        let roar = SpellId::from("roar");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &shout), &mut always());
        ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &roar), &mut always());

        assert_eq!(ledger.buckets().len(), 2);
        assert!((mods.attack_power.flat_total() - 8.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_malformed_instance_is_skipped() {
        let def = EffectDefinition::stat_modifier("focus", "Focus", EffectStat::MagicPower, EffectOp::MorePercent);
        let instance = EffectInstance::new("focus").with_percent(10.0, MagnitudeBasis::Power);
        let spell = SpellId::from("focus");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        let outcome = ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &spell), &mut always());
        assert!(matches!(outcome, ApplyOutcome::Skipped(EffectError::BasisWithPercentOp(_))));
        assert!(ledger.is_empty());

        let mixed = EffectInstance::new("focus")
            .with_percent(10.0, MagnitudeBasis::None)
            .with_flat(25.0);
        let outcome = ledger.apply(&mut mods, &def, &request(&mixed, Side::Player, &spell), &mut always());
        assert!(matches!(outcome, ApplyOutcome::Skipped(EffectError::FlatWithPercentOp(_))));
        assert!(ledger.is_empty());
        assert!(mods.is_empty());
    }

    #[test]
    fn test_dispel_restores_modifiers() {
        let def = might();
        let instance = EffectInstance::new("might").with_flat(12.5);
        let spell = SpellId::from("shout");
        let mut ledger = EffectLedger::new();
        let mut mods = StatModifiers::new();

        ledger.apply(&mut mods, &def, &request(&instance, Side::Player, &spell), &mut always());
        assert_eq!(ledger.dispel(&mut mods, &EffectId::from("might")), 1);
        assert!(ledger.is_empty());
        assert!(mods.is_empty());
    }

    proptest! {
        #[test]
        fn prop_add_on_top_never_exceeds_cap(
            first_max in 1u32..8,
            other_max in 1u32..8,
            reapplies in 0usize..20,
        ) {
            let def = might().with_reapply(ReapplyRule::AddOnTop);
            let first = EffectInstance::new("might").with_flat(1.0).stacking(first_max);
            let other = EffectInstance::new("might").with_flat(1.0).stacking(other_max);
            let spell = SpellId::from("shout");
            let mut ledger = EffectLedger::new();
            let mut mods = StatModifiers::new();

            ledger.apply(&mut mods, &def, &request(&first, Side::Player, &spell), &mut always());
            for _ in 0..reapplies {
                ledger.apply(&mut mods, &def, &request(&other, Side::Player, &spell), &mut always());
            }
            prop_assert!(ledger.stacks_of(&EffectId::from("might")) <= first_max.min(other_max).max(1));
        }
    }
}
