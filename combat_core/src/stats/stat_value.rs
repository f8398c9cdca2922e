//! StatValue - The flat + multiplicative modifier container (Flat → More/Less)

use serde::{Deserialize, Serialize};

/// Represents all modifiers currently applied to one stat
///
/// Final value is calculated as:
/// `(base + Σ flat) × Π factors`
///
/// - `flat`: Every flat addition, in application order
/// - `factors`: Every more/less multiplier as a factor (1.20 = 20% more, 0.80 = 20% less)
///
/// Terms are kept as lists rather than running totals so a term can be removed
/// exactly, leaving the value bit-identical to what it was before the term was added.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct StatValue {
    /// Flat additions
    pub flat: Vec<f64>,
    /// More/less multipliers
    pub factors: Vec<f64>,
}

impl StatValue {
    /// Create an empty StatValue (no flat, multiplier 1.0)
    pub fn new() -> Self {
        Self::default()
    }

    /// Sum of all flat additions
    pub fn flat_total(&self) -> f64 {
        self.flat.iter().sum()
    }

    /// Product of all more/less factors. Starts at 1.0.
    pub fn multiplier(&self) -> f64 {
        self.factors.iter().product()
    }

    /// Calculate final value: (base + flat) × multiplier
    pub fn apply(&self, base: f64) -> f64 {
        (base + self.flat_total()) * self.multiplier()
    }

    /// Add a flat bonus
    pub fn add_flat(&mut self, value: f64) {
        self.flat.push(value);
    }

    /// Add a raw multiplicative factor
    pub fn add_factor(&mut self, factor: f64) {
        self.factors.push(factor);
    }

    /// Add a "more" multiplier given in percent (20.0 = ×1.20)
    pub fn add_more(&mut self, percent: f64) -> f64 {
        let factor = more_factor(percent);
        self.factors.push(factor);
        factor
    }

    /// Add a "less" multiplier given in percent (20.0 = ×0.80)
    pub fn add_less(&mut self, percent: f64) -> f64 {
        let factor = less_factor(percent);
        self.factors.push(factor);
        factor
    }

    /// Remove one flat entry equal to `value`. Returns false if none matched.
    pub fn remove_flat(&mut self, value: f64) -> bool {
        remove_entry(&mut self.flat, value)
    }

    /// Remove one factor equal to `factor`. Returns false if none matched.
    pub fn remove_factor(&mut self, factor: f64) -> bool {
        remove_entry(&mut self.factors, factor)
    }

    /// Whether no modifier is applied
    pub fn is_empty(&self) -> bool {
        self.flat.is_empty() && self.factors.is_empty()
    }

    /// Drop every modifier
    pub fn clear(&mut self) {
        self.flat.clear();
        self.factors.clear();
    }
}

/// Factor for a "more" percent
pub fn more_factor(percent: f64) -> f64 {
    1.0 + percent / 100.0
}

/// Factor for a "less" percent, never negative
pub fn less_factor(percent: f64) -> f64 {
    (1.0 - percent / 100.0).max(0.0)
}

fn remove_entry(entries: &mut Vec<f64>, value: f64) -> bool {
    match entries.iter().rposition(|v| v.to_bits() == value.to_bits()) {
        Some(pos) => {
            entries.remove(pos);
            true
        }
        None => false,
    }
}
