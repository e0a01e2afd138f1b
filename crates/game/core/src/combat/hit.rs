//! Hit chance, crit chance, and accuracy calculations.

/// Inputs to a hit chance calculation, all effective values.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HitInputs {
    /// Base accuracy of the act.
    pub base: f64,
    pub accuracy: f64,
    pub dodge: f64,
    pub accuracy_mult: f64,
    pub dodge_mult: f64,
    /// Attacker's accuracy-governing stat over the defender's dodge-governing
    /// stat, when the act designates both.
    pub stat_ratio: Option<f64>,
}

/// Calculate hit chance as a percentage to compare a d100 roll against.
///
/// # Formula
///
/// ```text
/// chance = base + accuracy - dodge
/// m      = accuracy_mult - dodge_mult + 1
/// chance *= m                             if m >= 1
/// chance *= accuracy_mult / dodge_mult    otherwise
/// chance *= compress_ratio(stat_ratio)
/// ```
pub fn hit_chance(inputs: &HitInputs) -> f64 {
    let mut chance = inputs.base + inputs.accuracy - inputs.dodge;

    let spread = inputs.accuracy_mult - inputs.dodge_mult + 1.0;
    if spread >= 1.0 {
        chance *= spread;
    } else if inputs.dodge_mult > 0.0 {
        chance *= inputs.accuracy_mult / inputs.dodge_mult;
    }

    if let Some(ratio) = inputs.stat_ratio {
        chance *= compress_ratio(ratio);
    }

    chance
}

/// Compress a stat ratio into diminishing bands.
///
/// | Ratio | Slope |
/// |---|---|
/// | `1.00–1.05` | 1 (unchanged) |
/// | `1.05–1.25` | 0.25 |
/// | `1.25–2.00` | 0.2 |
/// | above `2.00` | 0.08 |
///
/// The result is capped at 1.33. Ratios below 1 mirror the curve:
/// `1 / compress(1 / r)`.
pub fn compress_ratio(ratio: f64) -> f64 {
    const CAP: f64 = 1.33;

    if !ratio.is_finite() || ratio <= 0.0 {
        return if ratio > 0.0 { CAP } else { 1.0 / CAP };
    }
    if ratio < 1.0 {
        return 1.0 / compress_ratio(1.0 / ratio);
    }

    let compressed = if ratio <= 1.05 {
        ratio
    } else if ratio <= 1.25 {
        1.05 + (ratio - 1.05) * 0.25
    } else if ratio <= 2.0 {
        1.10 + (ratio - 1.25) * 0.2
    } else {
        1.25 + (ratio - 2.0) * 0.08
    };

    compressed.min(CAP)
}

/// Crit chance as a percentage.
///
/// ```text
/// chance = (base + crit_chance) × crit_chance_mult
/// ```
pub fn crit_chance(base: f64, crit: f64, crit_mult: f64) -> f64 {
    (base + crit) * crit_mult
}

/// Whether a d100 `roll` lands under `chance`.
pub fn check_roll(roll: u32, chance: f64) -> bool {
    f64::from(roll) <= chance
}
