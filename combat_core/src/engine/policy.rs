//! Weighted-random spell choice for the enemy

use crate::rng::CombatRng;
use crate::spell::KnownSpell;
use crate::types::SpellId;

/// Picks among candidates proportionally to their weight
#[derive(Debug, Clone, PartialEq)]
pub struct WeightedRandomPolicy {
    /// Chosen when there is no candidate with positive weight
    pub fallback: SpellId,
}

impl Default for WeightedRandomPolicy {
    fn default() -> Self {
        WeightedRandomPolicy {
            fallback: SpellId::from("basic_attack"),
        }
    }
}

impl WeightedRandomPolicy {
    pub fn new(fallback: impl Into<SpellId>) -> Self {
        WeightedRandomPolicy {
            fallback: fallback.into(),
        }
    }

    pub fn choose(&self, candidates: &[KnownSpell], rng: &mut dyn CombatRng) -> SpellId {
        let total: f64 = candidates.iter().map(|c| c.weight.max(0.0)).sum();
        if total <= 0.0 {
            return self.fallback.clone();
        }
        let mut roll = rng.range(0.0, total);
        for candidate in candidates {
            let weight = candidate.weight.max(0.0);
            if roll < weight {
                return candidate.spell_id.clone();
            }
            roll -= weight;
        }
        // float rounding can leave the roll just past the last bucket
        candidates
            .iter()
            .rev()
            .find(|c| c.weight > 0.0)
            .map(|c| c.spell_id.clone())
            .unwrap_or_else(|| self.fallback.clone())
    }
}
