//! Modifier templates: buffs, debuffs, statuses, and their triggered effects.

use crate::env::narrative::Narrative;
use crate::stats::{Affinity, Element, StatKind};

/// A continuously applied modification carried by a modifier or a live
/// triggered effect.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum PassiveEffect {
    /// `val` is added to the stat base, `multi` multiplies the result.
    Stat {
        stat: StatKind,
        #[cfg_attr(feature = "serde", serde(default))]
        val: f64,
        #[cfg_attr(feature = "serde", serde(default = "super::defaults::one"))]
        multi: f64,
    },

    /// Adds the element to the holder's weak/resist/immune set.
    Affinity { element: Element, affinity: Affinity },

    /// Replaces the element of the holder's weapon attacks.
    WeaponElement { element: Element },
}

impl PassiveEffect {
    pub fn stat(stat: StatKind, val: f64, multi: f64) -> Self {
        PassiveEffect::Stat { stat, val, multi }
    }

    pub fn flat(stat: StatKind, val: f64) -> Self {
        Self::stat(stat, val, 1.0)
    }

    pub fn mult(stat: StatKind, multi: f64) -> Self {
        Self::stat(stat, 0.0, multi)
    }
}

/// Checkpoint at which an expiry counter or exhaust lapse is evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExpiryPoint {
    RoundStart,
    /// Start of the granting character's turn.
    TurnStart,
    /// End of the granting character's turn.
    TurnEnd,
    /// Start of a targeted character's turn.
    TargetTurnStart,
    /// End of a targeted character's turn.
    TargetTurnEnd,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Expiry {
    pub at: ExpiryPoint,
    pub count: i32,
}

/// Window inside which repeated trigger activations count once.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ExhaustScope {
    OncePerTurn,
    OncePerAct,
    #[default]
    EveryTime,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Exhaust {
    pub count: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub scope: ExhaustScope,
    /// Checkpoint at which an unused window costs one charge.
    #[cfg_attr(feature = "serde", serde(default))]
    pub lapse: Option<ExpiryPoint>,
}

/// Uniqueness scope for stacking checks.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StackScope {
    Target,
    Global,
    Team,
}

/// What happens when a stacking rule finds an existing instance.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Remodify {
    /// Keep the existing instance; new targets join it without raising its counts.
    #[default]
    Stack,
    /// Remove existing instances, then create.
    Replace,
    /// Abort creation silently.
    Fail,
}

/// Game events that may fire triggered effects.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerEvent {
    /// Holder begins an attack.
    Attack,
    /// Holder is targeted by an attack.
    AttackT,
    AttackSuccess,
    AttackSuccessT,
    AttackFail,
    AttackFailT,
    Crit,
    CritT,
    Heal,
    HealT,
    Modify,
    ModifyT,
    Kill,
    Death,
    TurnStart,
    TurnEnd,
    RoundStart,
}

/// How long a live triggered effect stays active.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum EffectDuration {
    EndOfAct,
    EndOfAction,
    #[default]
    EndOfTurn,
    EndOfRound,
}

/// Which character a trigger side effect lands on.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Subject {
    /// The character whose modifier fired.
    #[default]
    Holder,
    /// The other party of the event (attacker for `AttackT`, target for `Attack`).
    Other,
}

/// Side effect run when a triggered effect activates.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TriggerAction {
    Heal {
        amount: i64,
        #[cfg_attr(feature = "serde", serde(default))]
        subject: Subject,
    },
    Damage {
        amount: i64,
        #[cfg_attr(feature = "serde", serde(default))]
        subject: Subject,
    },
    RestoreMana {
        amount: i64,
    },
    Cure {
        element: Option<Element>,
        amount: f64,
    },
    /// Removes the modifier that owns this trigger.
    RemoveModifier,
    ApplyModifier {
        modifier: String,
        #[cfg_attr(feature = "serde", serde(default))]
        subject: Subject,
    },
}

/// A conditional sub-effect of a modifier.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct TriggerTemplate {
    pub on: Vec<TriggerEvent>,
    /// If present, the event categories must intersect this set.
    pub category: Option<Vec<String>>,
    /// If present, the event categories must also intersect this set.
    pub category2: Option<Vec<String>>,
    pub effects: Vec<PassiveEffect>,
    pub duration: EffectDuration,
    /// Allow a second live instance for the same holder/modifier/entry.
    pub stacks: bool,
    pub action: Option<TriggerAction>,
    pub text: Option<Narrative>,
}

impl TriggerTemplate {
    pub fn on(events: impl IntoIterator<Item = TriggerEvent>) -> Self {
        Self {
            on: events.into_iter().collect(),
            ..Self::default()
        }
    }

    pub fn with_effect(mut self, effect: PassiveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_action(mut self, action: TriggerAction) -> Self {
        self.action = Some(action);
        self
    }

    pub fn with_category(mut self, categories: &[&str]) -> Self {
        self.category = Some(categories.iter().map(|c| c.to_string()).collect());
        self
    }

    pub fn with_duration(mut self, duration: EffectDuration) -> Self {
        self.duration = duration;
        self
    }

    /// Whether `categories` satisfies both category gates.
    pub fn matches_categories(&self, categories: &[String]) -> bool {
        let gate = |set: &Option<Vec<String>>| match set {
            None => true,
            Some(required) => required.iter().any(|c| categories.contains(c)),
        };
        gate(&self.category) && gate(&self.category2)
    }
}

/// Template for a buff, debuff, or status.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ModifierTemplate {
    /// Explicit source id; when absent the granting action's id is used.
    pub id: Option<String>,
    pub description: String,
    pub effects: Vec<PassiveEffect>,
    pub triggers: Vec<TriggerTemplate>,
    pub expiry: Option<Expiry>,
    pub exhaust: Option<Exhaust>,
    pub one_per_c: Option<StackScope>,
    pub one_per_id: Option<StackScope>,
    pub remodify: Remodify,
    /// Targets every combatant instead of an explicit list.
    pub global: bool,
    /// One instance per cast; later targets of the same cast join its list.
    pub shared: bool,
    pub text: Option<Narrative>,
}

impl ModifierTemplate {
    pub fn new(description: impl Into<String>) -> Self {
        Self {
            description: description.into(),
            ..Self::default()
        }
    }

    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn with_effect(mut self, effect: PassiveEffect) -> Self {
        self.effects.push(effect);
        self
    }

    pub fn with_trigger(mut self, trigger: TriggerTemplate) -> Self {
        self.triggers.push(trigger);
        self
    }

    pub fn expires(mut self, at: ExpiryPoint, count: i32) -> Self {
        self.expiry = Some(Expiry { at, count });
        self
    }

    pub fn exhausts(mut self, count: i32, scope: ExhaustScope) -> Self {
        self.exhaust = Some(Exhaust {
            count,
            scope,
            lapse: None,
        });
        self
    }

    pub fn one_per_c(mut self, scope: StackScope) -> Self {
        self.one_per_c = Some(scope);
        self
    }

    pub fn one_per_id(mut self, scope: StackScope) -> Self {
        self.one_per_id = Some(scope);
        self
    }

    pub fn remodify(mut self, policy: Remodify) -> Self {
        self.remodify = policy;
        self
    }

    pub fn global(mut self) -> Self {
        self.global = true;
        self
    }

    pub fn shared(mut self) -> Self {
        self.shared = true;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_gates_require_both_sets() {
        let mut trigger = TriggerTemplate::on([TriggerEvent::AttackT]).with_category(&["melee"]);
        trigger.category2 = Some(vec!["fire".to_string()]);

        let melee_fire = vec!["melee".to_string(), "fire".to_string()];
        let melee_only = vec!["melee".to_string()];
        assert!(trigger.matches_categories(&melee_fire));
        assert!(!trigger.matches_categories(&melee_only));
        assert!(TriggerTemplate::default().matches_categories(&[]));
    }

    #[test]
    fn durations_are_ordered_by_lifetime() {
        assert!(EffectDuration::EndOfAct < EffectDuration::EndOfAction);
        assert!(EffectDuration::EndOfTurn < EffectDuration::EndOfRound);
    }
}
