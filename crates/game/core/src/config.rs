/// Rule constants and tunable parameters for a combat session.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CombatConfig {
    /// Condition value per tier (phys/mind) or for the binary status.
    pub condition_threshold: f64,
    /// Turn-start decay while no tier is applied.
    pub condition_decay: f64,
    /// Turn-start decay while at least one tier is applied.
    pub condition_decay_applied: f64,
    /// Condition value added by a landed hit.
    pub condition_damage: f64,
    pub condition_crit_bonus: f64,
    pub condition_weak_bonus: f64,

    pub damage_variance_low: f64,
    pub damage_variance_high: f64,

    /// Sides of each of the two initiative dice.
    pub initiative_die: u32,

    /// Number of top-weighted options the AI samples from.
    pub ai_option_pool: usize,
    /// Number of target finalists for single-target AI picks.
    pub ai_target_finalists: usize,
    /// Fraction of the gap to the initial weight recovered each turn.
    pub ai_weight_recovery: f64,
    /// Upper bound of the random jitter added to a reset weight.
    pub ai_reset_jitter: f64,
}

impl CombatConfig {
    // ===== compile-time bounds used as type parameters =====
    pub const MAX_AI_OPTION_POOL: usize = 3;
    pub const MAX_AI_TARGET_FINALISTS: usize = 2;

    // ===== runtime-tunable defaults =====
    pub const DEFAULT_CONDITION_THRESHOLD: f64 = 5.0;
    pub const DEFAULT_CONDITION_DECAY: f64 = 1.0;
    pub const DEFAULT_CONDITION_DECAY_APPLIED: f64 = 2.0;
    pub const DEFAULT_CONDITION_DAMAGE: f64 = 2.0;
    pub const DEFAULT_CONDITION_BONUS: f64 = 2.0;
    pub const DEFAULT_INITIATIVE_DIE: u32 = 10;

    pub fn new() -> Self {
        Self {
            condition_threshold: Self::DEFAULT_CONDITION_THRESHOLD,
            condition_decay: Self::DEFAULT_CONDITION_DECAY,
            condition_decay_applied: Self::DEFAULT_CONDITION_DECAY_APPLIED,
            condition_damage: Self::DEFAULT_CONDITION_DAMAGE,
            condition_crit_bonus: Self::DEFAULT_CONDITION_BONUS,
            condition_weak_bonus: Self::DEFAULT_CONDITION_BONUS,
            damage_variance_low: 0.85,
            damage_variance_high: 1.15,
            initiative_die: Self::DEFAULT_INITIATIVE_DIE,
            ai_option_pool: Self::MAX_AI_OPTION_POOL,
            ai_target_finalists: Self::MAX_AI_TARGET_FINALISTS,
            ai_weight_recovery: 0.5,
            ai_reset_jitter: 1.0,
        }
    }

    /// Disables the damage roll; useful for reproducing exact damage figures.
    pub fn without_variance(mut self) -> Self {
        self.damage_variance_low = 1.0;
        self.damage_variance_high = 1.0;
        self
    }

    /// Option pool size clamped to the fixed-capacity candidate buffer.
    pub fn option_pool(&self) -> usize {
        self.ai_option_pool.clamp(1, Self::MAX_AI_OPTION_POOL)
    }

    pub fn target_finalists(&self) -> usize {
        self.ai_target_finalists
            .clamp(1, Self::MAX_AI_TARGET_FINALISTS)
    }
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self::new()
    }
}
