//! Bonus accumulation for a single stat.
//!
//! Every stat read follows the same stack:
//! `(base + Σ flat) × Π multiplier → clamp/floor`
//!
//! Flat contributions come from the `val` field of passive and triggered
//! effects, multipliers from their `multi` field. Multiplier-family stats
//! ignore flat contributions entirely.

use super::kinds::{StatFamily, StatKind};

/// A single contribution to a stat.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Bonus {
    /// Additive contribution, summed into the base.
    Flat(f64),

    /// Multiplicative contribution, multiplied into a single factor.
    Multiplier(f64),
}

/// A collection of bonuses applied in a fixed order.
///
/// # Example
/// ```
/// # use skirmish_core::stats::bonus::{Bonus, BonusStack, StatBounds};
/// let mut stack = BonusStack::new();
/// stack.add(Bonus::Flat(5.0));
/// stack.add(Bonus::Multiplier(1.5));
/// stack.add(Bonus::Multiplier(2.0));
///
/// // (10 + 5) × 1.5 × 2 = 45
/// assert_eq!(stack.apply(10.0, StatBounds::UNCLAMPED), 45.0);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct BonusStack {
    flat: f64,
    multiplier: f64,
    ignore_flat: bool,
    len: usize,
}

impl BonusStack {
    pub fn new() -> Self {
        Self {
            flat: 0.0,
            multiplier: 1.0,
            ignore_flat: false,
            len: 0,
        }
    }

    /// Stack for a given stat; multiplier-family stats drop flat bonuses.
    pub fn for_stat(stat: StatKind) -> Self {
        Self {
            ignore_flat: stat.is_multiplier(),
            ..Self::new()
        }
    }

    pub fn add(&mut self, bonus: Bonus) {
        match bonus {
            Bonus::Flat(value) if !self.ignore_flat => self.flat += value,
            Bonus::Flat(_) => {}
            Bonus::Multiplier(value) => self.multiplier *= value,
        }
        self.len += 1;
    }

    /// Adds an effect entry's `val`/`multi` pair.
    pub fn add_entry(&mut self, val: f64, multi: f64) {
        if val != 0.0 {
            self.add(Bonus::Flat(val));
        }
        if multi != 1.0 {
            self.add(Bonus::Multiplier(multi));
        }
    }

    pub fn extend(&mut self, bonuses: impl IntoIterator<Item = Bonus>) {
        for bonus in bonuses {
            self.add(bonus);
        }
    }

    /// Sum of flat bonuses that will be applied.
    pub fn flat(&self) -> f64 {
        self.flat
    }

    /// Product of multiplier bonuses.
    pub fn multiplier(&self) -> f64 {
        self.multiplier
    }

    /// Applies the stack to a base value with the given bounds.
    pub fn apply(&self, base: f64, bounds: StatBounds) -> f64 {
        let raw = (base + self.flat) * self.multiplier;
        bounds.clamp(raw)
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

/// Clamp configuration for a stat calculation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct StatBounds {
    pub min: f64,
    pub floor: bool,
}

impl StatBounds {
    /// Primary stats: integer, never below 1.
    pub const PRIMARY: Self = Self {
        min: 1.0,
        floor: true,
    };

    /// Crit multiplier multiplier: integer, never below 1.
    pub const CRIT_MULT_MULT: Self = Self::PRIMARY;

    /// Crit multiplier add: never below 0.
    pub const NON_NEGATIVE: Self = Self {
        min: 0.0,
        floor: false,
    };

    pub const UNCLAMPED: Self = Self {
        min: f64::NEG_INFINITY,
        floor: false,
    };

    pub fn for_stat(stat: StatKind) -> Self {
        match (stat.family(), stat) {
            (StatFamily::Primary, _) => Self::PRIMARY,
            (_, StatKind::CritMultMult) => Self::CRIT_MULT_MULT,
            (_, StatKind::CritMultAdd) => Self::NON_NEGATIVE,
            _ => Self::UNCLAMPED,
        }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        let value = if self.floor { value.floor() } else { value };
        value.max(self.min)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multiplier_stats_ignore_flat() {
        let mut stack = BonusStack::for_stat(StatKind::DodgeMult);
        stack.add_entry(5.0, 1.2);
        assert_eq!(stack.apply(1.0, StatBounds::UNCLAMPED), 1.2);
    }

    #[test]
    fn primary_bounds_floor_to_one() {
        let mut stack = BonusStack::for_stat(StatKind::Strength);
        stack.add(Bonus::Flat(-20.0));
        assert_eq!(stack.apply(10.0, StatBounds::PRIMARY), 1.0);

        let mut stack = BonusStack::for_stat(StatKind::Strength);
        stack.add(Bonus::Multiplier(1.25));
        assert_eq!(stack.apply(9.0, StatBounds::PRIMARY), 11.0);
    }

    #[test]
    fn crit_mult_add_never_negative() {
        let mut stack = BonusStack::for_stat(StatKind::CritMultAdd);
        stack.add(Bonus::Flat(-0.75));
        let bounds = StatBounds::for_stat(StatKind::CritMultAdd);
        assert_eq!(stack.apply(0.25, bounds), 0.0);
    }
}
