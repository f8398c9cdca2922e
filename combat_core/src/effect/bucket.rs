//! EffectBucket - All contributions of one effect on one actor

use super::contribution::Contribution;
use super::definition::EffectKind;
use crate::types::{DamageType, EffectId, Side, SpellId};
use serde::{Deserialize, Serialize};

/// Identity of a bucket. Mergeable effects carry no source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BucketKey {
    pub effect_id: EffectId,
    pub source: Option<(Side, SpellId)>,
}

impl BucketKey {
    pub fn new(effect_id: EffectId, mergeable: bool, source: Side, spell: &SpellId) -> Self {
        BucketKey {
            effect_id,
            source: if mergeable { None } else { Some((source, spell.clone())) },
        }
    }

    pub fn is_mergeable(&self) -> bool {
        self.source.is_none()
    }
}

/// An active effect on an actor
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EffectBucket {
    pub key: BucketKey,
    pub kind: EffectKind,
    pub damage_type: DamageType,
    pub contributions: Vec<Contribution>,
}

impl EffectBucket {
    pub fn new(key: BucketKey, kind: EffectKind, damage_type: DamageType) -> Self {
        EffectBucket {
            key,
            kind,
            damage_type,
            contributions: Vec::new(),
        }
    }

    pub fn effect_id(&self) -> &EffectId {
        &self.key.effect_id
    }

    pub fn contribution(&self, source: Side, spell: &SpellId) -> Option<&Contribution> {
        self.contributions.iter().find(|c| c.is_from(source, spell))
    }

    pub fn contribution_mut(&mut self, source: Side, spell: &SpellId) -> Option<&mut Contribution> {
        self.contributions.iter_mut().find(|c| c.is_from(source, spell))
    }

    /// Combined stacks over all contributions
    pub fn total_stacks(&self) -> u32 {
        self.contributions.iter().map(|c| c.stacks).sum()
    }

    /// Sum of every contribution's per-stack ticks
    pub fn periodic_total(&self) -> f64 {
        self.contributions.iter().map(Contribution::periodic_total).sum()
    }

    /// Side behind the larger share of the periodic total; the earlier side wins a tie
    pub fn dominant_source(&self) -> Option<Side> {
        let share = |side: Side| -> f64 {
            self.contributions
                .iter()
                .filter(|c| c.source == side)
                .map(Contribution::periodic_total)
                .sum()
        };
        Side::all()
            .iter()
            .copied()
            .filter(|side| self.contributions.iter().any(|c| c.source == *side))
            .fold(None, |best: Option<(Side, f64)>, side| {
                let amount = share(side);
                match best {
                    Some((_, top)) if top >= amount => best,
                    _ => Some((side, amount)),
                }
            })
            .map(|(side, _)| side)
    }

    /// Longest remaining duration over all contributions
    pub fn remaining_turns(&self) -> i32 {
        self.contributions.iter().map(|c| c.remaining_turns).max().unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.contributions.is_empty()
    }
}
