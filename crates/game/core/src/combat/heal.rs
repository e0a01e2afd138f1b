use super::damage::round_half_up;

#[derive(Clone, Copy, Debug, PartialEq)]
pub struct HealInputs {
    pub base: f64,
    pub percent: f64,
    /// Healer's designated stat, if the act names one.
    pub stat: Option<f64>,
    pub heal_target_mult: f64,
    pub heal_self_mult: f64,
    pub max_hp_percent: f64,
    pub max_health: i64,
    pub health: i64,
}

/// Health restored, clamped by the target's deficit.
///
/// ```text
/// heal = (base + percent% × stat) × heal_target_mult × heal_self_mult
///      + max_hp_percent% × max_health
/// ```
pub fn heal_amount(inputs: &HealInputs) -> i64 {
    let scaled = inputs.stat.map_or(0.0, |stat| inputs.percent / 100.0 * stat);
    let mut heal = (inputs.base + scaled) * inputs.heal_target_mult * inputs.heal_self_mult;
    heal += inputs.max_hp_percent / 100.0 * inputs.max_health as f64;

    let deficit = (inputs.max_health - inputs.health).max(0);
    (round_half_up(heal).max(0.0) as i64).min(deficit)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heal_is_clamped_by_deficit() {
        let inputs = HealInputs {
            base: 10.0,
            percent: 50.0,
            stat: Some(20.0),
            heal_target_mult: 1.0,
            heal_self_mult: 1.5,
            max_hp_percent: 0.0,
            max_health: 100,
            health: 50,
        };
        assert_eq!(heal_amount(&inputs), 30);
        assert_eq!(heal_amount(&HealInputs { health: 90, ..inputs }), 10);
    }

    #[test]
    fn max_hp_percent_added_after_multipliers() {
        let inputs = HealInputs {
            base: 0.0,
            percent: 0.0,
            stat: None,
            heal_target_mult: 2.0,
            heal_self_mult: 2.0,
            max_hp_percent: 25.0,
            max_health: 80,
            health: 0,
        };
        assert_eq!(heal_amount(&inputs), 20);
    }
}
