//! Stat, element, and affinity identifiers.

use strum::{Display, EnumIter, EnumString, IntoStaticStr};

/// Every stat the resolution engine can compute.
///
/// Stats fall into three families that differ in their stored default and
/// in how contributions are folded in:
///
/// | Family | Default | Additive `val` | Floor |
/// |---|---|---|---|
/// | Primary | 1 | yes | integer, min 1 |
/// | Derived (additive) | 0 | yes | none (crit-mult-add min 0) |
/// | Multiplier | 1 | no | none (crit-mult-mult integer, min 1) |
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum StatKind {
    // ========================================================================
    // Primary
    // ========================================================================
    #[strum(to_string = "strength", serialize = "str")]
    Strength,
    #[strum(to_string = "agility", serialize = "agi")]
    Agility,
    #[strum(to_string = "fortitude", serialize = "fort")]
    Fortitude,
    #[strum(to_string = "intellect", serialize = "int")]
    Intellect,
    #[strum(to_string = "charisma", serialize = "cha")]
    Charisma,
    #[strum(to_string = "will", serialize = "wil")]
    Will,

    // ========================================================================
    // Derived (additive)
    // ========================================================================
    MaxHealth,
    MaxMana,
    Initiative,
    CritMultAdd,
    Accuracy,
    Damage,
    CritChance,
    Dodge,

    // ========================================================================
    // Multipliers
    // ========================================================================
    AccuracyMult,
    CritChanceMult,
    DodgeMult,
    DefenceMult,
    CritMultMult,
    DamageMult,
    HealSelfMult,
    HealTargetMult,
}

/// Stat family, which decides defaults and clamping.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StatFamily {
    Primary,
    Derived,
    Multiplier,
}

impl StatKind {
    pub const fn family(self) -> StatFamily {
        use StatKind::*;
        match self {
            Strength | Agility | Fortitude | Intellect | Charisma | Will => StatFamily::Primary,
            MaxHealth | MaxMana | Initiative | CritMultAdd | Accuracy | Damage | CritChance
            | Dodge => StatFamily::Derived,
            AccuracyMult | CritChanceMult | DodgeMult | DefenceMult | CritMultMult | DamageMult
            | HealSelfMult | HealTargetMult => StatFamily::Multiplier,
        }
    }

    /// Value used when a character has no stored base for this stat.
    pub const fn default_base(self) -> f64 {
        match self.family() {
            StatFamily::Primary | StatFamily::Multiplier => 1.0,
            StatFamily::Derived => 0.0,
        }
    }

    pub const fn is_primary(self) -> bool {
        matches!(self.family(), StatFamily::Primary)
    }

    pub const fn is_multiplier(self) -> bool {
        matches!(self.family(), StatFamily::Multiplier)
    }
}

/// Damage and condition element.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Display, EnumIter, EnumString, IntoStaticStr,
)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Element {
    Phys,
    Mind,
    Fire,
    Frost,
    Shock,
    Toxic,
    Holy,
    Void,
}

impl Element {
    /// Elements whose conditions escalate through several named statuses.
    pub const fn is_tiered(self) -> bool {
        matches!(self, Element::Phys | Element::Mind)
    }

    pub const fn flag(self) -> ElementSet {
        match self {
            Element::Phys => ElementSet::PHYS,
            Element::Mind => ElementSet::MIND,
            Element::Fire => ElementSet::FIRE,
            Element::Frost => ElementSet::FROST,
            Element::Shock => ElementSet::SHOCK,
            Element::Toxic => ElementSet::TOXIC,
            Element::Holy => ElementSet::HOLY,
            Element::Void => ElementSet::VOID,
        }
    }
}

bitflags::bitflags! {
    /// Compact set of elements.
    #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
    #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
    pub struct ElementSet: u16 {
        const PHYS = 1 << 0;
        const MIND = 1 << 1;
        const FIRE = 1 << 2;
        const FROST = 1 << 3;
        const SHOCK = 1 << 4;
        const TOXIC = 1 << 5;
        const HOLY = 1 << 6;
        const VOID = 1 << 7;
    }
}

impl ElementSet {
    pub fn has(self, element: Element) -> bool {
        self.contains(element.flag())
    }

    pub fn with(self, element: Element) -> Self {
        self | element.flag()
    }

    pub fn from_elements<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Self {
        elements
            .into_iter()
            .fold(Self::empty(), |set, element| set.with(*element))
    }
}

/// How a character reacts to an element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Display, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Affinity {
    Weak,
    Resist,
    Immune,
    Neutral,
}

/// Weak/resist/immune sets with the exclusivity rules applied.
///
/// Immune wins over weak and resist. An element listed as both weak and
/// resist cancels out to neutral.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Affinities {
    weak: ElementSet,
    resist: ElementSet,
    immune: ElementSet,
}

impl Affinities {
    pub fn new(weak: ElementSet, resist: ElementSet, immune: ElementSet) -> Self {
        let clash = weak & resist;
        Self {
            weak: (weak - clash) - immune,
            resist: (resist - clash) - immune,
            immune,
        }
    }

    pub fn of(&self, element: Element) -> Affinity {
        if self.immune.has(element) {
            Affinity::Immune
        } else if self.weak.has(element) {
            Affinity::Weak
        } else if self.resist.has(element) {
            Affinity::Resist
        } else {
            Affinity::Neutral
        }
    }

    pub fn weak(&self) -> ElementSet {
        self.weak
    }

    pub fn resist(&self) -> ElementSet {
        self.resist
    }

    pub fn immune(&self) -> ElementSet {
        self.immune
    }
}
