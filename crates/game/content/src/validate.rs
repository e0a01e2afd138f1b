//! Cross-reference checks for content tables.
//!
//! The engine treats an unknown template id as fatal at the moment it looks
//! it up. Running [`validate`] after loading surfaces those errors before a
//! session starts.

use skirmish_core::env::{ActKind, TriggerAction};
use skirmish_core::{
    CombatError, ContentOracle, ContentTables, ModifierTemplate, Slot, TemplateKind,
};

/// Checks that every referenced template exists and is well formed.
pub fn validate(tables: &ContentTables) -> Result<(), CombatError> {
    for (id, character) in &tables.characters {
        for (slot, equipment) in [
            (Slot::Weapon, &character.weapon),
            (Slot::Armour, &character.armour),
            (Slot::Accessory, &character.accessory),
        ] {
            let Some(equipment) = equipment else { continue };
            let template = tables
                .equipment(equipment)
                .ok_or_else(|| CombatError::unknown(TemplateKind::Equipment, equipment.as_str()))?;
            if template.slot != slot {
                return Err(malformed(TemplateKind::Character, id, "equipment in the wrong slot"));
            }
        }
        for skill in &character.skills {
            require_action(tables, skill)?;
        }
        for item in &character.items {
            require_action(tables, &item.id)?;
        }
        if let Some(tree) = &character.dialogue
            && tables.dialogue(tree).is_none()
        {
            return Err(CombatError::unknown(TemplateKind::Dialogue, tree.as_str()));
        }
    }

    for (id, equipment) in &tables.equipment {
        for skill in &equipment.skills {
            require_action(tables, skill)?;
        }
        if let Some(passive) = &equipment.passive {
            check_modifier(tables, passive)?;
        }
        match (&equipment.attack, equipment.slot) {
            (Some(attack), Slot::Weapon) if attack.acts.is_empty() => {
                return Err(malformed(TemplateKind::Equipment, id, "weapon attack has no acts"));
            }
            (Some(_), Slot::Armour | Slot::Accessory) => {
                return Err(malformed(TemplateKind::Equipment, id, "only weapons carry an attack"));
            }
            _ => {}
        }
    }

    for (id, action) in &tables.actions {
        if action.acts.is_empty() {
            return Err(malformed(TemplateKind::Action, id, "action has no acts"));
        }
        for act in &action.acts {
            if let ActKind::Modify(params) = &act.kind {
                require_modifier(tables, &params.modifier)?;
            }
        }
    }

    for modifier in tables.modifiers.values() {
        check_modifier(tables, modifier)?;
    }

    for statuses in tables.status_pools.values() {
        for status in statuses {
            require_modifier(tables, status)?;
        }
    }
    Ok(())
}

fn check_modifier(tables: &ContentTables, modifier: &ModifierTemplate) -> Result<(), CombatError> {
    for trigger in &modifier.triggers {
        if let Some(TriggerAction::ApplyModifier { modifier, .. }) = &trigger.action {
            require_modifier(tables, modifier)?;
        }
    }
    Ok(())
}

fn require_action(tables: &ContentTables, id: &str) -> Result<(), CombatError> {
    tables
        .action(id)
        .map(|_| ())
        .ok_or_else(|| CombatError::unknown(TemplateKind::Action, id))
}

fn require_modifier(tables: &ContentTables, id: &str) -> Result<(), CombatError> {
    tables
        .modifier(id)
        .map(|_| ())
        .ok_or_else(|| CombatError::unknown(TemplateKind::Modifier, id))
}

fn malformed(kind: TemplateKind, id: &str, reason: &'static str) -> CombatError {
    CombatError::MalformedTemplate {
        kind,
        id: id.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use skirmish_core::{Act, ActionTemplate, CharacterTemplate, EquipmentTemplate};

    #[test]
    fn dangling_skill_is_reported() {
        let tables = ContentTables::new()
            .with_character("mage", CharacterTemplate::new("Mage").with_skill("fireball"));
        assert_eq!(
            validate(&tables),
            Err(CombatError::unknown(TemplateKind::Action, "fireball"))
        );
    }

    #[test]
    fn armour_in_weapon_slot_is_malformed() {
        let tables = ContentTables::new()
            .with_equipment("mail", EquipmentTemplate::new("Mail", Slot::Armour))
            .with_character("knight", CharacterTemplate::new("Knight").with_weapon("mail"));
        assert!(matches!(
            validate(&tables),
            Err(CombatError::MalformedTemplate { kind: TemplateKind::Character, .. })
        ));
    }

    #[test]
    fn modify_acts_need_their_modifier() {
        let tables = ContentTables::new()
            .with_action("rally", ActionTemplate::new("Rally").with_act(Act::modify("rallied")));
        assert_eq!(
            validate(&tables),
            Err(CombatError::unknown(TemplateKind::Modifier, "rallied"))
        );

        let fixed = tables.with_modifier("rallied", ModifierTemplate::new("Rallied"));
        assert_eq!(validate(&fixed), Ok(()));
    }
}
