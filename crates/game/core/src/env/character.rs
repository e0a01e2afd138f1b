use std::collections::BTreeMap;

use crate::stats::{Element, StatKind};

/// Grammatical gender used by the presentation layer for pronouns.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Gender {
    Male,
    Female,
    #[default]
    Neutral,
    Plural,
}

/// An item carried at spawn, with an optional stock override.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ItemGrant {
    pub id: String,
    #[cfg_attr(feature = "serde", serde(default))]
    pub stock: Option<u32>,
}

/// Static definition of a combatant.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CharacterTemplate {
    pub name: String,
    pub gender: Gender,
    /// Stored base values; unlisted stats use the family default.
    pub stats: BTreeMap<StatKind, f64>,
    pub weak: Vec<Element>,
    pub resist: Vec<Element>,
    pub immune: Vec<Element>,
    pub weapon: Option<String>,
    pub armour: Option<String>,
    pub accessory: Option<String>,
    pub skills: Vec<String>,
    pub items: Vec<ItemGrant>,
    /// Whether spawned instances are AI-controlled unless overridden.
    pub ai: bool,
    pub dialogue: Option<String>,
}

impl Default for CharacterTemplate {
    fn default() -> Self {
        Self {
            name: String::new(),
            gender: Gender::Neutral,
            stats: BTreeMap::new(),
            weak: Vec::new(),
            resist: Vec::new(),
            immune: Vec::new(),
            weapon: None,
            armour: None,
            accessory: None,
            skills: Vec::new(),
            items: Vec::new(),
            ai: true,
            dialogue: None,
        }
    }
}

impl CharacterTemplate {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_stat(mut self, stat: StatKind, value: f64) -> Self {
        self.stats.insert(stat, value);
        self
    }

    pub fn with_weapon(mut self, id: impl Into<String>) -> Self {
        self.weapon = Some(id.into());
        self
    }

    pub fn with_skill(mut self, id: impl Into<String>) -> Self {
        self.skills.push(id.into());
        self
    }

    pub fn with_item(mut self, id: impl Into<String>, stock: Option<u32>) -> Self {
        self.items.push(ItemGrant {
            id: id.into(),
            stock,
        });
        self
    }

    pub fn player(mut self) -> Self {
        self.ai = false;
        self
    }
}
