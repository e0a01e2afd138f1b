//! Read-only content consumed by the engine.
//!
//! Templates are immutable value data. The engine clones a template into an
//! owned instance whenever it spawns a character, equipment, skill, item, or
//! modifier, so play never mutates the tables behind a [`ContentOracle`].
mod action;
mod character;
mod dialogue;
mod equipment;
mod modifier;
mod narrative;
mod rng;
mod tables;

pub use action::{
    Act, ActKind, ActTag, ActTarget, ActionTemplate, AiKind, AiProfile, AiTargeting, AttackParams,
    Cure, HealParams, LifeFilter, ModifyParams, Prerequisite, PreviousOutcome, TargetKind,
};
pub use character::{CharacterTemplate, Gender, ItemGrant};
pub use dialogue::{DialogueTree, Topic, TopicOutcome};
pub use equipment::{EquipmentTemplate, Slot};
pub use modifier::{
    EffectDuration, Exhaust, ExhaustScope, Expiry, ExpiryPoint, ModifierTemplate, PassiveEffect,
    Remodify, StackScope, Subject, TriggerAction, TriggerEvent, TriggerTemplate,
};
pub use narrative::{Narrative, NarrativeVars};
pub use rng::{CombatRng, PcgRng, RngOracle, compute_seed};
pub use tables::ContentTables;

use crate::error::{CombatError, TemplateKind};
use crate::stats::Element;

/// Lookup of static content by template id.
pub trait ContentOracle: Send + Sync {
    fn character(&self, id: &str) -> Option<&CharacterTemplate>;
    fn equipment(&self, id: &str) -> Option<&EquipmentTemplate>;
    fn action(&self, id: &str) -> Option<&ActionTemplate>;
    fn modifier(&self, id: &str) -> Option<&ModifierTemplate>;
    fn dialogue(&self, id: &str) -> Option<&DialogueTree>;

    /// Status modifier ids escalated into by `element`'s condition.
    fn status_pool(&self, element: Element) -> &[String];
}

/// Lookups that turn a missing id into a content-integrity error.
pub trait ContentOracleExt: ContentOracle {
    fn require_character(&self, id: &str) -> Result<&CharacterTemplate, CombatError> {
        self.character(id)
            .ok_or_else(|| CombatError::unknown(TemplateKind::Character, id))
    }

    fn require_equipment(&self, id: &str) -> Result<&EquipmentTemplate, CombatError> {
        self.equipment(id)
            .ok_or_else(|| CombatError::unknown(TemplateKind::Equipment, id))
    }

    fn require_action(&self, id: &str) -> Result<&ActionTemplate, CombatError> {
        self.action(id)
            .ok_or_else(|| CombatError::unknown(TemplateKind::Action, id))
    }

    fn require_modifier(&self, id: &str) -> Result<&ModifierTemplate, CombatError> {
        self.modifier(id)
            .ok_or_else(|| CombatError::unknown(TemplateKind::Modifier, id))
    }

    fn require_dialogue(&self, id: &str) -> Result<&DialogueTree, CombatError> {
        self.dialogue(id)
            .ok_or_else(|| CombatError::unknown(TemplateKind::Dialogue, id))
    }
}

impl<T: ContentOracle + ?Sized> ContentOracleExt for T {}

pub(crate) mod defaults {
    pub fn one() -> f64 {
        1.0
    }
}
