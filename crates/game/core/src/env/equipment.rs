use crate::env::action::ActionTemplate;
use crate::env::modifier::ModifierTemplate;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Slot {
    Weapon,
    Armour,
    Accessory,
}

/// Weapon, armour, or accessory definition.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct EquipmentTemplate {
    pub name: String,
    pub slot: Slot,
    /// Passive bonus held for as long as the equipment is worn.
    #[cfg_attr(feature = "serde", serde(default))]
    pub passive: Option<ModifierTemplate>,
    /// Skill template ids granted while equipped.
    #[cfg_attr(feature = "serde", serde(default))]
    pub skills: Vec<String>,
    /// Weapon attack.
    #[cfg_attr(feature = "serde", serde(default))]
    pub attack: Option<ActionTemplate>,
}

impl EquipmentTemplate {
    pub fn new(name: impl Into<String>, slot: Slot) -> Self {
        Self {
            name: name.into(),
            slot,
            passive: None,
            skills: Vec::new(),
            attack: None,
        }
    }

    pub fn with_passive(mut self, passive: ModifierTemplate) -> Self {
        self.passive = Some(passive);
        self
    }

    pub fn with_attack(mut self, attack: ActionTemplate) -> Self {
        self.attack = Some(attack);
        self
    }

    pub fn with_skill(mut self, id: impl Into<String>) -> Self {
        self.skills.push(id.into());
        self
    }
}
