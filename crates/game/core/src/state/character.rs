use std::collections::BTreeMap;

use crate::ai::AiOption;
use crate::env::{Gender, Slot};
use crate::registry::{CharacterId, ModifierId, ThingId};
use crate::state::Memory;
use crate::stats::{Affinities, Element, StatKind};

#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Team {
    Ally,
    Enemy,
}

impl Team {
    pub const fn opponent(self) -> Team {
        match self {
            Team::Ally => Team::Enemy,
            Team::Enemy => Team::Ally,
        }
    }
}

/// Accumulated condition for one element.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConditionState {
    pub value: f64,
    /// Status modifiers applied by this condition, oldest first.
    pub applied: Vec<ModifierId>,
    /// Value was added since the last turn start.
    pub gained: bool,
}

impl ConditionState {
    pub fn tier(&self) -> usize {
        self.applied.len()
    }
}

/// A combatant instance.
#[derive(Clone, Debug)]
pub struct Character {
    pub id: CharacterId,
    pub template: String,
    pub name: String,
    pub gender: Gender,
    pub team: Team,
    pub ai_controlled: bool,

    pub base: BTreeMap<StatKind, f64>,
    pub baseline: Affinities,

    pub health: i64,
    pub mana: i64,
    pub alive: bool,
    /// Still to act this round.
    pub ready: bool,
    pub acted: bool,
    /// Per-combat initiative draw added to the initiative stat.
    pub initiative_roll: f64,

    pub weapon: Option<ThingId>,
    pub armour: Option<ThingId>,
    pub accessory: Option<ThingId>,
    pub skills: Vec<ThingId>,
    pub items: Vec<ThingId>,

    pub memory: BTreeMap<CharacterId, Memory>,
    pub conditions: BTreeMap<Element, ConditionState>,
    pub ai_options: BTreeMap<ThingId, AiOption>,
    pub dialogue: Option<String>,

    /// Targets of the action currently resolving.
    pub last_targets: Vec<CharacterId>,
}

impl Character {
    /// Stored base value, or the family default when unset.
    pub fn base(&self, stat: StatKind) -> f64 {
        self.base
            .get(&stat)
            .copied()
            .unwrap_or_else(|| stat.default_base())
    }

    pub fn slot(&self, slot: Slot) -> Option<ThingId> {
        match slot {
            Slot::Weapon => self.weapon,
            Slot::Armour => self.armour,
            Slot::Accessory => self.accessory,
        }
    }

    pub(crate) fn slot_mut(&mut self, slot: Slot) -> &mut Option<ThingId> {
        match slot {
            Slot::Weapon => &mut self.weapon,
            Slot::Armour => &mut self.armour,
            Slot::Accessory => &mut self.accessory,
        }
    }

    /// Every thing this character holds, equipped slots first.
    pub fn holdings(&self) -> impl Iterator<Item = ThingId> + '_ {
        [self.weapon, self.armour, self.accessory]
            .into_iter()
            .flatten()
            .chain(self.skills.iter().copied())
            .chain(self.items.iter().copied())
    }

    /// Memory of `other`, created on first access.
    pub fn memory_of(&mut self, other: CharacterId) -> &mut Memory {
        self.memory.entry(other).or_default()
    }

    pub fn condition(&self, element: Element) -> Option<&ConditionState> {
        self.conditions.get(&element)
    }
}
