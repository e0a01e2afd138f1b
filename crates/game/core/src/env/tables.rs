use std::collections::BTreeMap;

use super::{
    ActionTemplate, CharacterTemplate, ContentOracle, DialogueTree, EquipmentTemplate,
    ModifierTemplate,
};
use crate::stats::Element;

/// In-memory content tables keyed by template id.
///
/// Built by the content loaders or directly in tests.
#[derive(Clone, Debug, Default)]
pub struct ContentTables {
    pub characters: BTreeMap<String, CharacterTemplate>,
    pub equipment: BTreeMap<String, EquipmentTemplate>,
    pub actions: BTreeMap<String, ActionTemplate>,
    pub modifiers: BTreeMap<String, ModifierTemplate>,
    pub dialogue: BTreeMap<String, DialogueTree>,
    /// Status modifier ids per element, in draw order.
    pub status_pools: BTreeMap<Element, Vec<String>>,
}

impl ContentTables {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_character(mut self, id: impl Into<String>, template: CharacterTemplate) -> Self {
        self.characters.insert(id.into(), template);
        self
    }

    pub fn with_equipment(mut self, id: impl Into<String>, template: EquipmentTemplate) -> Self {
        self.equipment.insert(id.into(), template);
        self
    }

    pub fn with_action(mut self, id: impl Into<String>, template: ActionTemplate) -> Self {
        self.actions.insert(id.into(), template);
        self
    }

    pub fn with_modifier(mut self, id: impl Into<String>, template: ModifierTemplate) -> Self {
        self.modifiers.insert(id.into(), template);
        self
    }

    pub fn with_dialogue(mut self, id: impl Into<String>, tree: DialogueTree) -> Self {
        self.dialogue.insert(id.into(), tree);
        self
    }

    pub fn with_status_pool(mut self, element: Element, statuses: &[&str]) -> Self {
        self.status_pools
            .insert(element, statuses.iter().map(|s| s.to_string()).collect());
        self
    }

    /// Merges `other` into `self`; entries in `other` win.
    pub fn merge(&mut self, other: ContentTables) {
        self.characters.extend(other.characters);
        self.equipment.extend(other.equipment);
        self.actions.extend(other.actions);
        self.modifiers.extend(other.modifiers);
        self.dialogue.extend(other.dialogue);
        self.status_pools.extend(other.status_pools);
    }
}

impl ContentOracle for ContentTables {
    fn character(&self, id: &str) -> Option<&CharacterTemplate> {
        self.characters.get(id)
    }

    fn equipment(&self, id: &str) -> Option<&EquipmentTemplate> {
        self.equipment.get(id)
    }

    fn action(&self, id: &str) -> Option<&ActionTemplate> {
        self.actions.get(id)
    }

    fn modifier(&self, id: &str) -> Option<&ModifierTemplate> {
        self.modifiers.get(id)
    }

    fn dialogue(&self, id: &str) -> Option<&DialogueTree> {
        self.dialogue.get(id)
    }

    fn status_pool(&self, element: Element) -> &[String] {
        self.status_pools
            .get(&element)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }
}
