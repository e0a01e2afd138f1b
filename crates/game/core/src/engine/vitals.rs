//! Health and mana mutation.
//!
//! Every write to health or mana goes through here so that
//! `0 <= health <= max_health` holds and `health == 0` implies dead.

use tracing::info;

use super::CombatEngine;
use crate::combat::CombatEvent;
use crate::env::TriggerEvent;
use crate::error::CombatError;
use crate::modifier::TriggerContext;
use crate::registry::CharacterId;

impl CombatEngine {
    /// Subtracts `amount` from `target`'s health. Returns whether it died.
    pub(crate) fn deal_damage(
        &mut self,
        target: CharacterId,
        amount: i64,
        source: Option<CharacterId>,
    ) -> Result<bool, CombatError> {
        let character = self.world.character_mut(target)?;
        if !character.alive {
            return Ok(false);
        }
        character.health = (character.health - amount.max(0)).max(0);
        if character.health > 0 {
            return Ok(false);
        }

        self.kill(target, source)?;
        Ok(true)
    }

    pub(crate) fn kill(
        &mut self,
        target: CharacterId,
        killer: Option<CharacterId>,
    ) -> Result<(), CombatError> {
        let character = self.world.character_mut(target)?;
        if !character.alive {
            return Ok(());
        }
        character.alive = false;
        character.health = 0;
        info!(character = %target, killer = ?killer, "character died");

        self.world.emit(CombatEvent::Died {
            character: target,
            killer,
        });

        let ctx = TriggerContext::default().with_other(killer);
        self.check_triggers(target, TriggerEvent::Death, &ctx)?;
        if let Some(killer) = killer
            && killer != target
        {
            let ctx = TriggerContext::default().with_other(Some(target));
            self.check_triggers(killer, TriggerEvent::Kill, &ctx)?;
        }
        Ok(())
    }

    /// Restores up to `amount` health to a living character; returns the amount restored.
    pub(crate) fn restore_health(
        &mut self,
        target: CharacterId,
        amount: i64,
    ) -> Result<i64, CombatError> {
        let max = self.world.max_health(target)?;
        let character = self.world.character_mut(target)?;
        if !character.alive {
            return Ok(0);
        }
        let restored = amount.clamp(0, (max - character.health).max(0));
        character.health += restored;
        Ok(restored)
    }

    /// Brings a dead character back with `health` hit points.
    pub(crate) fn revive(&mut self, target: CharacterId, health: i64) -> Result<(), CombatError> {
        let max = self.world.max_health(target)?;
        let character = self.world.character_mut(target)?;
        if character.alive || health <= 0 {
            return Ok(());
        }
        character.alive = true;
        character.health = health.min(max);
        info!(character = %target, health = character.health, "character revived");
        self.world.emit(CombatEvent::Revived { character: target });
        Ok(())
    }

    pub(crate) fn restore_mana(&mut self, target: CharacterId, amount: i64) -> Result<i64, CombatError> {
        let max = self.world.max_mana(target)?;
        let character = self.world.character_mut(target)?;
        let restored = amount.clamp(-character.mana, (max - character.mana).max(0));
        character.mana += restored;
        Ok(restored)
    }

    /// Re-clamps health and mana after max values may have dropped.
    pub(crate) fn clamp_vitals(&mut self) -> Result<(), CombatError> {
        let ids: Vec<CharacterId> = self.world.characters.keys().copied().collect();
        for id in ids {
            let max_health = self.world.max_health(id)?;
            let max_mana = self.world.max_mana(id)?;
            let character = self.world.character_mut(id)?;
            character.health = character.health.min(max_health);
            character.mana = character.mana.clamp(0, max_mana);
        }
        Ok(())
    }
}
