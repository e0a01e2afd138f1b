use crate::env::{EffectDuration, ModifierTemplate, PassiveEffect};
use crate::registry::{CastId, CharacterId, EffectId, ModifierId, ThingId};

/// Characters a modifier applies to.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Targets {
    /// Every combatant.
    Global,
    List(Vec<CharacterId>),
}

impl Targets {
    pub fn includes(&self, id: CharacterId) -> bool {
        match self {
            Targets::Global => true,
            Targets::List(list) => list.contains(&id),
        }
    }

    pub fn add(&mut self, id: CharacterId) {
        if let Targets::List(list) = self
            && !list.contains(&id)
        {
            list.push(id);
        }
    }

    pub fn remove(&mut self, id: CharacterId) {
        if let Targets::List(list) = self {
            list.retain(|target| *target != id);
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Targets::List(list) if list.is_empty())
    }
}

/// A live buff, debuff, or status.
#[derive(Clone, Debug)]
pub struct Modifier {
    pub id: ModifierId,
    /// Stacking identity: the template's explicit id or the granting action's id.
    pub source: String,
    pub granter: CharacterId,
    pub targets: Targets,
    pub template: ModifierTemplate,
    pub cast: Option<CastId>,
    /// Equipment this modifier belongs to.
    pub bound_to: Option<ThingId>,
    pub exp_count: Option<i32>,
    pub exhaust_count: Option<i32>,
    /// Exhaust count reached zero by triggering; removed at the next expiry check.
    pub exhausted: bool,
    /// Triggered at least once since the last exhaust lapse checkpoint.
    pub triggered_since_lapse: bool,
}

impl Modifier {
    pub fn is_spent(&self) -> bool {
        self.exhausted
            || self.exp_count.is_some_and(|count| count <= 0)
            || self.exhaust_count.is_some_and(|count| count <= 0)
    }

    pub fn description(&self) -> &str {
        &self.template.description
    }
}

/// A triggered effect instance, alive until its duration lapses.
#[derive(Clone, Debug)]
pub struct LiveEffect {
    pub id: EffectId,
    pub modifier: ModifierId,
    /// Index of the trigger entry within the modifier template.
    pub entry: usize,
    pub holder: CharacterId,
    pub effects: Vec<PassiveEffect>,
    pub duration: EffectDuration,
    pub cast: Option<CastId>,
}
