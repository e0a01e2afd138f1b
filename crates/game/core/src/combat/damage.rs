//! Damage calculation.

use crate::stats::Affinity;

/// Round half up to an integer.
pub fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Base damage before multipliers.
///
/// # Formula
///
/// ```text
/// base = act_damage + damage_stat + floor(percent / 100 × scaling_stat)
/// ```
pub fn base_damage(act_damage: f64, damage_stat: f64, percent: f64, scaling_stat: Option<f64>) -> f64 {
    let scaled = scaling_stat.map_or(0.0, |stat| (percent / 100.0 * stat).floor());
    act_damage + damage_stat + scaled
}

/// Adjust the damage multiplier for the defender's affinity.
///
/// - weak: `+0.5`
/// - resist: `max(m / 2, m - 0.5)`
/// - immune: `0`
pub fn affinity_multiplier(multiplier: f64, affinity: Affinity) -> f64 {
    match affinity {
        Affinity::Weak => multiplier + 0.5,
        Affinity::Resist => (multiplier / 2.0).max(multiplier - 0.5),
        Affinity::Immune => 0.0,
        Affinity::Neutral => multiplier,
    }
}

/// Attacker/defender stat scaling; defence only ever reduces damage.
pub fn defence_scaling(attacker_stat: f64, defender_stat: f64) -> f64 {
    if defender_stat <= 0.0 {
        return 1.0;
    }
    (attacker_stat / defender_stat).min(1.0)
}

/// Apply the defender's defence multiplier.
///
/// Values above 1 divide the damage; values below 1 multiply it by the
/// complement `2 - d`.
pub fn apply_defence_mult(damage: f64, defence_mult: f64) -> f64 {
    if defence_mult > 1.0 {
        damage / defence_mult
    } else if defence_mult < 1.0 {
        damage * (2.0 - defence_mult.max(0.0))
    } else {
        damage
    }
}

/// Inputs of the final damage pipeline.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct DamageInputs {
    pub base: f64,
    /// `Some((attacker_stat, defender_stat))` when the act designates a defence stat.
    pub defence: Option<(f64, f64)>,
    pub multiplier: f64,
    pub defence_mult: f64,
    /// Uniform roll in the configured variance band.
    pub variance: f64,
}

/// Run the damage pipeline.
///
/// # Formula
///
/// ```text
/// dmg = base × defence_scaling
/// dmg = round_half_up(dmg × multiplier)
/// dmg = apply_defence_mult(dmg, defence_mult)
/// dmg = round_half_up(dmg × variance), min 0
/// ```
pub fn final_damage(inputs: &DamageInputs) -> i64 {
    let mut damage = inputs.base;
    if let Some((attacker, defender)) = inputs.defence {
        damage *= defence_scaling(attacker, defender);
    }
    damage = round_half_up(damage * inputs.multiplier);
    damage = apply_defence_mult(damage, inputs.defence_mult);
    damage = round_half_up(damage * inputs.variance);
    (damage.max(0.0)) as i64
}
