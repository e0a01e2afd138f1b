use crate::env::{ActionTemplate, ModifierTemplate, Slot};
use crate::registry::{CharacterId, ModifierId, ThingId};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ThingKind {
    Equipment(Slot),
    Skill,
    Item,
}

/// An equipment, skill, or item instance cloned from its template.
#[derive(Clone, Debug)]
pub struct Thing {
    pub id: ThingId,
    pub template: String,
    pub name: String,
    pub kind: ThingKind,
    pub owner: Option<CharacterId>,

    /// Usable action, if any (weapon attack, skill, item use).
    pub action: Option<ActionTemplate>,
    /// Equipment passive, instantiated while equipped.
    pub passive_template: Option<ModifierTemplate>,
    /// Skill template ids granted while equipped.
    pub skill_templates: Vec<String>,

    pub stock: Option<u32>,
    pub uses: u32,

    /// Live passive modifier while equipped.
    pub passive: Option<ModifierId>,
    /// Skill instances granted by this equipment while equipped.
    pub grants: Vec<ThingId>,
    pub granted_by: Option<ThingId>,
}

impl Thing {
    pub fn is_equipment(&self) -> bool {
        matches!(self.kind, ThingKind::Equipment(_))
    }

    pub fn slot(&self) -> Option<Slot> {
        match self.kind {
            ThingKind::Equipment(slot) => Some(slot),
            _ => None,
        }
    }

    /// Id used for stacking comparisons and AI memory of this action.
    pub fn action_id(&self) -> &str {
        &self.template
    }

    pub fn usage_exhausted(&self) -> bool {
        self.action
            .as_ref()
            .and_then(|action| action.usage_limit)
            .is_some_and(|limit| self.uses >= limit)
    }

    pub fn out_of_stock(&self) -> bool {
        self.stock == Some(0)
    }

    pub fn mana_cost(&self) -> i64 {
        self.action.as_ref().map_or(0, |action| action.mana_cost)
    }
}
