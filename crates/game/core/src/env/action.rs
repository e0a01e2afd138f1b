//! Action templates: weapon attacks, skills, and items as sequences of acts.

use crate::env::narrative::Narrative;
use crate::stats::{Element, StatKind};

/// Who the acting character may pick when the action is selected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetKind {
    #[default]
    SingleEnemy,
    SingleAlly,
    /// Any single combatant on either team.
    Single,
    SelfOnly,
    EnemyTeam,
    AllyTeam,
    Everyone,
}

impl TargetKind {
    pub const fn is_single(self) -> bool {
        matches!(
            self,
            TargetKind::SingleEnemy | TargetKind::SingleAlly | TargetKind::Single
        )
    }
}

/// Alive/dead inclusion filter applied when an act resolves its targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LifeFilter {
    #[default]
    Alive,
    Dead,
    Any,
}

impl LifeFilter {
    pub const fn admits(self, alive: bool) -> bool {
        match self {
            LifeFilter::Alive => alive,
            LifeFilter::Dead => !alive,
            LifeFilter::Any => true,
        }
    }
}

/// Which outcome of the previous act selects the next act's targets.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PreviousOutcome {
    #[default]
    Success,
    Fail,
    Crit,
    Any,
}

/// How an act derives its target list.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActTarget {
    /// Whatever the actor chose when selecting the action.
    Chosen,
    Previous(PreviousOutcome),
    RandomEnemies { count: u32, exclude_previous: bool },
    RandomAllies { count: u32, exclude_previous: bool },
    EnemyTeam,
    AllyTeam,
    SelfOnly,
    Everyone,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AttackParams {
    pub accuracy: f64,
    pub damage: f64,
    /// Percentage of `stat_damage` added to the damage.
    pub damage_percent: f64,
    pub stat_damage: Option<StatKind>,
    /// Defender stat that can only reduce damage.
    pub stat_defence: Option<StatKind>,
    pub stat_accuracy: Option<StatKind>,
    pub stat_dodge: Option<StatKind>,
    pub crit: f64,
    pub crit_mult: f64,
    /// Overrides the action's element for this act.
    pub element: Option<Element>,
    /// Overrides the configured condition damage of a landed hit.
    pub condition: Option<f64>,
}

impl Default for AttackParams {
    fn default() -> Self {
        Self {
            accuracy: 90.0,
            damage: 0.0,
            damage_percent: 0.0,
            stat_damage: None,
            stat_defence: None,
            stat_accuracy: None,
            stat_dodge: None,
            crit: 5.0,
            crit_mult: 1.5,
            element: None,
            condition: None,
        }
    }
}

/// Condition relief carried by a heal act.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Cure {
    /// `None` cures every element.
    pub element: Option<Element>,
    pub amount: f64,
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct HealParams {
    pub heal: f64,
    /// Percentage of the healer's `stat_heal` added to the heal.
    pub heal_percent: f64,
    pub stat_heal: Option<StatKind>,
    /// Percentage of the target's max health added after multipliers.
    pub max_hp_percent: f64,
    pub cure: Option<Cure>,
    /// Permits dead targets and revives them when healed.
    pub revive: bool,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ModifyParams {
    /// Modifier template id.
    pub modifier: String,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActKind {
    Attack(AttackParams),
    Heal(HealParams),
    Modify(ModifyParams),
}

impl ActKind {
    pub fn tag(&self) -> ActTag {
        match self {
            ActKind::Attack(_) => ActTag::Attack,
            ActKind::Heal(_) => ActTag::Heal,
            ActKind::Modify(_) => ActTag::Modify,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ActTag {
    Attack,
    Heal,
    Modify,
}

/// One step of an action.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Act {
    pub kind: ActKind,
    /// Defaults to the chosen target for the first act and to the previous
    /// act's successful targets afterwards.
    #[cfg_attr(feature = "serde", serde(default))]
    pub target: Option<ActTarget>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub life: LifeFilter,
    /// A miss halts the remaining acts of this cast.
    #[cfg_attr(feature = "serde", serde(default))]
    pub stop_on_miss: bool,
    #[cfg_attr(feature = "serde", serde(default))]
    pub text_success: Option<Narrative>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub text_fail: Option<Narrative>,
}

impl Act {
    pub fn new(kind: ActKind) -> Self {
        Self {
            kind,
            target: None,
            life: LifeFilter::Alive,
            stop_on_miss: false,
            text_success: None,
            text_fail: None,
        }
    }

    pub fn attack(params: AttackParams) -> Self {
        Self::new(ActKind::Attack(params))
    }

    pub fn heal(params: HealParams) -> Self {
        Self::new(ActKind::Heal(params))
    }

    pub fn modify(modifier: impl Into<String>) -> Self {
        Self::new(ActKind::Modify(ModifyParams {
            modifier: modifier.into(),
        }))
    }

    pub fn targeting(mut self, target: ActTarget) -> Self {
        self.target = Some(target);
        self
    }

    pub fn with_life(mut self, life: LifeFilter) -> Self {
        self.life = life;
        self
    }

    pub fn stop_on_miss(mut self) -> Self {
        self.stop_on_miss = true;
        self
    }

    /// Target policy in effect for the act at `index`.
    pub fn policy(&self, index: usize) -> ActTarget {
        match self.target {
            Some(target) => target,
            None if index == 0 => ActTarget::Chosen,
            None => ActTarget::Previous(PreviousOutcome::Success),
        }
    }
}

/// AI archetype of an option.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiKind {
    #[default]
    Attacker,
    Buffer,
    Healer,
}

/// Filter a target must pass for the AI to consider the option.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Prerequisite {
    /// Target health fraction strictly below the value.
    HealthBelow(f64),
    /// The acting character's health fraction strictly below the value.
    SelfHealthBelow(f64),
    /// Target does not carry any modifier this action would grant.
    Unaffected,
    /// Target has a condition value of at least this amount for any element.
    Conditioned(f64),
}

/// How a single-target AI pick is made.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum AiTargeting {
    /// Weighted pick among the top finalists.
    #[default]
    Weighted,
    /// Uniform pick among every valid target.
    Random,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct AiProfile {
    pub kind: AiKind,
    pub initial_weight: f64,
    pub reset_weight: f64,
    pub prerequisite: Option<Prerequisite>,
    pub targeting: AiTargeting,
}

impl Default for AiProfile {
    fn default() -> Self {
        Self {
            kind: AiKind::Attacker,
            initial_weight: 10.0,
            reset_weight: 5.0,
            prerequisite: None,
            targeting: AiTargeting::Weighted,
        }
    }
}

/// Template for anything a character can use on its turn.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ActionTemplate {
    pub name: String,
    pub categories: Vec<String>,
    pub element: Element,
    pub mana_cost: i64,
    /// Uses per session; the instance stays but becomes unusable.
    pub usage_limit: Option<u32>,
    /// Consumable count; the instance is destroyed at zero.
    pub stock: Option<u32>,
    pub target: TargetKind,
    pub acts: Vec<Act>,
    pub ai: AiProfile,
    pub text: Option<Narrative>,
}

impl Default for ActionTemplate {
    fn default() -> Self {
        Self {
            name: String::new(),
            categories: Vec::new(),
            element: Element::Phys,
            mana_cost: 0,
            usage_limit: None,
            stock: None,
            target: TargetKind::SingleEnemy,
            acts: Vec::new(),
            ai: AiProfile::default(),
            text: None,
        }
    }
}

impl ActionTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_act(mut self, act: Act) -> Self {
        self.acts.push(act);
        self
    }

    pub fn targeting(mut self, target: TargetKind) -> Self {
        self.target = target;
        self
    }

    pub fn with_element(mut self, element: Element) -> Self {
        self.element = element;
        self
    }

    pub fn with_categories(mut self, categories: &[&str]) -> Self {
        self.categories = categories.iter().map(|c| c.to_string()).collect();
        self
    }

    pub fn with_ai(mut self, ai: AiProfile) -> Self {
        self.ai = ai;
        self
    }

    /// Life filter of the first act, which gates the chosen target.
    pub fn chosen_life(&self) -> LifeFilter {
        self.acts.first().map(|act| act.life).unwrap_or_default()
    }

    /// Modifier template ids granted by this action's modify acts.
    pub fn granted_modifiers(&self) -> impl Iterator<Item = &str> {
        self.acts.iter().filter_map(|act| match &act.kind {
            ActKind::Modify(params) => Some(params.modifier.as_str()),
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn later_acts_default_to_previous_successes() {
        let act = Act::attack(AttackParams::default());
        assert_eq!(act.policy(0), ActTarget::Chosen);
        assert_eq!(act.policy(1), ActTarget::Previous(PreviousOutcome::Success));
        assert_eq!(act.clone().targeting(ActTarget::Everyone).policy(2), ActTarget::Everyone);
    }

    #[test]
    fn life_filter_admits() {
        assert!(LifeFilter::Alive.admits(true));
        assert!(!LifeFilter::Alive.admits(false));
        assert!(LifeFilter::Dead.admits(false));
        assert!(LifeFilter::Any.admits(false));
    }
}
