use std::collections::BTreeSet;

use crate::stats::{Affinity, Element, ElementSet};

/// What a character has learned about one opponent.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Memory {
    weak: ElementSet,
    resist: ElementSet,
    immune: ElementSet,
    neutral: ElementSet,
    /// The opponent has landed an attack on this character.
    pub attacked_me: bool,
    /// Action template ids the opponent has used against this character.
    pub attacks_used: BTreeSet<String>,
    /// Attitude toward the opponent, used by dialogue gating.
    pub sentiment: i32,
}

impl Memory {
    /// Records the observed reaction; a later observation replaces an earlier one.
    pub fn observe(&mut self, element: Element, affinity: Affinity) {
        let flag = element.flag();
        self.weak.remove(flag);
        self.resist.remove(flag);
        self.immune.remove(flag);
        self.neutral.remove(flag);
        match affinity {
            Affinity::Weak => self.weak.insert(flag),
            Affinity::Resist => self.resist.insert(flag),
            Affinity::Immune => self.immune.insert(flag),
            Affinity::Neutral => self.neutral.insert(flag),
        }
    }

    /// Remembered reaction, or `None` if never observed.
    pub fn recall(&self, element: Element) -> Option<Affinity> {
        if self.immune.has(element) {
            Some(Affinity::Immune)
        } else if self.weak.has(element) {
            Some(Affinity::Weak)
        } else if self.resist.has(element) {
            Some(Affinity::Resist)
        } else if self.neutral.has(element) {
            Some(Affinity::Neutral)
        } else {
            None
        }
    }
}
