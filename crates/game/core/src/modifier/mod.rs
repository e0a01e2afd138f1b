//! Modifier and triggered-effect lifecycle.
//!
//! - [`create`]: instantiation and the `one_per_c`/`one_per_id` stacking rules
//! - [`expiry`]: expiry and exhaust-lapse checkpoints
//! - [`trigger`]: event-driven triggered effects and their side effects

pub mod create;
pub mod expiry;
pub mod trigger;

pub use create::{GrantOutcome, ModifierOrigin};
pub use expiry::Checkpoint;
pub use trigger::TriggerContext;

use tracing::debug;

use crate::combat::CombatEvent;
use crate::engine::CombatEngine;
use crate::env::EffectDuration;
use crate::error::CombatError;
use crate::registry::ModifierId;

impl CombatEngine {
    /// Removes a modifier and everything hanging off it. Returns `false` if
    /// it was already gone.
    pub fn remove_modifier(&mut self, id: ModifierId) -> Result<bool, CombatError> {
        let Some(modifier) = self.world.modifiers.remove(&id) else {
            return Ok(false);
        };

        self.world.effects.retain(|_, effect| effect.modifier != id);
        for character in self.world.characters.values_mut() {
            for condition in character.conditions.values_mut() {
                condition.applied.retain(|applied| *applied != id);
            }
        }
        if let Some(thing) = modifier.bound_to
            && let Some(thing) = self.world.things.get_mut(&thing)
            && thing.passive == Some(id)
        {
            thing.passive = None;
        }

        debug!(modifier = %id, source = %modifier.source, "modifier removed");
        self.world.emit(CombatEvent::ModifierRemoved {
            modifier: id,
            description: modifier.template.description.clone(),
        });
        self.clamp_vitals()?;
        Ok(true)
    }

    /// Drops every live effect whose duration ends at or before `scope`.
    pub(crate) fn purge_effects(&mut self, scope: EffectDuration) -> Result<(), CombatError> {
        let before = self.world.effects.len();
        self.world
            .effects
            .retain(|_, effect| effect.duration > scope);
        let purged = before - self.world.effects.len();
        if purged > 0 {
            debug!(?scope, purged, "live effects purged");
            self.clamp_vitals()?;
        }
        Ok(())
    }
}
