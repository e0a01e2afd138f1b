//! Equipment and item ownership.
//!
//! A thing has at most one owner. Equipping grants the equipment's passive
//! modifier and its skills; unequipping takes both back.

use tracing::{debug, info};

use super::CombatEngine;
use crate::combat::CombatEvent;
use crate::env::{ContentOracleExt, Slot};
use crate::error::CombatError;
use crate::modifier::ModifierOrigin;
use crate::registry::{CharacterId, ThingId};
use crate::state::{Thing, ThingKind};

impl CombatEngine {
    /// Instantiates an unowned equipment piece from its template.
    pub fn instantiate_equipment(&mut self, template_id: &str) -> Result<ThingId, CombatError> {
        let template = self.content.require_equipment(template_id)?.clone();
        let id = self.world.registry.thing();
        self.world.things.insert(
            id,
            Thing {
                id,
                template: template_id.to_string(),
                name: template.name,
                kind: ThingKind::Equipment(template.slot),
                owner: None,
                action: template.attack,
                passive_template: template.passive,
                skill_templates: template.skills,
                stock: None,
                uses: 0,
                passive: None,
                grants: Vec::new(),
                granted_by: None,
            },
        );
        Ok(id)
    }

    /// Instantiates an unowned skill or item; `stock` overrides the template's.
    pub fn instantiate_action(
        &mut self,
        template_id: &str,
        kind: ThingKind,
        stock: Option<u32>,
    ) -> Result<ThingId, CombatError> {
        let template = self.content.require_action(template_id)?.clone();
        let id = self.world.registry.thing();
        self.world.things.insert(
            id,
            Thing {
                id,
                template: template_id.to_string(),
                name: template.name.clone(),
                kind,
                owner: None,
                stock: stock.or(template.stock),
                action: Some(template),
                passive_template: None,
                skill_templates: Vec::new(),
                uses: 0,
                passive: None,
                grants: Vec::new(),
                granted_by: None,
            },
        );
        Ok(id)
    }

    /// Equips `thing` on `character`, returning whatever it displaced.
    pub fn equip(
        &mut self,
        character: CharacterId,
        thing: ThingId,
    ) -> Result<Option<ThingId>, CombatError> {
        let item = self.world.thing(thing)?;
        let Some(slot) = item.slot() else {
            return Err(CombatError::NotEquipment(thing));
        };
        self.check_claim(character, thing)?;

        self.world.character_mut(character)?.items.retain(|id| *id != thing);
        let previous = self.unequip(character, slot)?;

        *self.world.character_mut(character)?.slot_mut(slot) = Some(thing);
        let item = self.world.thing_mut(thing)?;
        item.owner = Some(character);
        let passive = item.passive_template.clone();
        let skills = item.skill_templates.clone();
        let template = item.template.clone();

        if let Some(passive) = passive {
            let origin = ModifierOrigin::new(template.clone()).bound_to(thing);
            let granted = self.grant_modifier(&passive, character, character, origin)?;
            self.world.thing_mut(thing)?.passive = granted.modifier();
        }

        for skill in skills {
            let granted = self.instantiate_action(&skill, ThingKind::Skill, None)?;
            let instance = self.world.thing_mut(granted)?;
            instance.owner = Some(character);
            instance.granted_by = Some(thing);
            self.world.thing_mut(thing)?.grants.push(granted);
            self.world.character_mut(character)?.skills.push(granted);
        }

        debug!(%character, %thing, %template, ?slot, "equipped");
        Ok(previous)
    }

    /// Empties `slot`, dropping the passive and any granted skills.
    pub fn unequip(
        &mut self,
        character: CharacterId,
        slot: Slot,
    ) -> Result<Option<ThingId>, CombatError> {
        let Some(thing) = self.world.character_mut(character)?.slot_mut(slot).take() else {
            return Ok(None);
        };

        let item = self.world.thing_mut(thing)?;
        item.owner = None;
        let passive = item.passive.take();
        let grants = std::mem::take(&mut item.grants);

        if let Some(passive) = passive {
            self.remove_modifier(passive)?;
        }
        let holder = self.world.character_mut(character)?;
        holder.skills.retain(|id| !grants.contains(id));
        for granted in &grants {
            holder.ai_options.remove(granted);
        }
        holder.ai_options.remove(&thing);
        for granted in grants {
            self.world.things.remove(&granted);
        }

        debug!(%character, %thing, ?slot, "unequipped");
        Ok(Some(thing))
    }

    /// Hands a skill or item to `character`.
    pub fn give_item(&mut self, character: CharacterId, thing: ThingId) -> Result<(), CombatError> {
        self.check_claim(character, thing)?;
        self.check_unslotted(character, thing)?;
        let item = self.world.thing_mut(thing)?;
        item.owner = Some(character);
        let kind = item.kind;

        let holder = self.world.character_mut(character)?;
        let list = match kind {
            ThingKind::Skill => &mut holder.skills,
            ThingKind::Item | ThingKind::Equipment(_) => &mut holder.items,
        };
        if !list.contains(&thing) {
            list.push(thing);
        }
        Ok(())
    }

    /// Takes a carried skill or item away, leaving it unowned.
    pub fn take_item(&mut self, character: CharacterId, thing: ThingId) -> Result<(), CombatError> {
        let item = self.world.thing(thing)?;
        if item.owner != Some(character) {
            return Err(CombatError::ActionUnavailable {
                actor: character,
                thing,
                reason: crate::error::Unavailable::NotOwned,
            });
        }
        if let Some(slot) = item.slot()
            && self.world.character(character)?.slot(slot) == Some(thing)
        {
            self.unequip(character, slot)?;
            return Ok(());
        }

        let holder = self.world.character_mut(character)?;
        holder.skills.retain(|id| *id != thing);
        holder.items.retain(|id| *id != thing);
        holder.ai_options.remove(&thing);
        self.world.thing_mut(thing)?.owner = None;
        Ok(())
    }

    /// Spends one unit of a stocked thing, destroying it at zero.
    pub(crate) fn consume_stock(&mut self, owner: CharacterId, thing: ThingId) -> Result<(), CombatError> {
        let item = self.world.thing_mut(thing)?;
        let Some(stock) = item.stock.as_mut() else {
            return Ok(());
        };
        *stock = stock.saturating_sub(1);
        if *stock > 0 {
            return Ok(());
        }

        let name = item.name.clone();
        let holder = self.world.character_mut(owner)?;
        holder.items.retain(|id| *id != thing);
        holder.skills.retain(|id| *id != thing);
        holder.ai_options.remove(&thing);
        self.world.things.remove(&thing);

        info!(%owner, %thing, %name, "item used up");
        self.world.emit(CombatEvent::ItemDepleted { owner, thing });
        Ok(())
    }

    fn check_claim(&self, character: CharacterId, thing: ThingId) -> Result<(), CombatError> {
        match self.world.thing(thing)?.owner {
            Some(owner) if owner != character => Err(CombatError::DualOwnership {
                thing,
                owner,
                claimant: character,
            }),
            _ => Ok(()),
        }
    }

    /// A thing sitting in one of `character`'s slots cannot also be carried.
    fn check_unslotted(&self, character: CharacterId, thing: ThingId) -> Result<(), CombatError> {
        let Some(slot) = self.world.thing(thing)?.slot() else {
            return Ok(());
        };
        if self.world.character(character)?.slot(slot) == Some(thing) {
            return Err(CombatError::AlreadyEquipped { thing, character });
        }
        Ok(())
    }
}
