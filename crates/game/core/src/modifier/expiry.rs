use tracing::debug;

use crate::engine::CombatEngine;
use crate::env::ExpiryPoint;
use crate::error::CombatError;
use crate::registry::{CharacterId, ModifierId};
use crate::state::Modifier;

/// A point in the round/turn cycle where expiry counters are evaluated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Checkpoint {
    RoundStart,
    TurnStart(CharacterId),
    TurnEnd(CharacterId),
}

impl Checkpoint {
    /// Whether `point` on `modifier` fires at this checkpoint.
    pub fn matches(self, point: ExpiryPoint, modifier: &Modifier) -> bool {
        match (self, point) {
            (Checkpoint::RoundStart, ExpiryPoint::RoundStart) => true,
            (Checkpoint::TurnStart(c), ExpiryPoint::TurnStart)
            | (Checkpoint::TurnEnd(c), ExpiryPoint::TurnEnd) => modifier.granter == c,
            (Checkpoint::TurnStart(c), ExpiryPoint::TargetTurnStart)
            | (Checkpoint::TurnEnd(c), ExpiryPoint::TargetTurnEnd) => modifier.targets.includes(c),
            _ => false,
        }
    }
}

impl CombatEngine {
    /// Decrements matching expiry counters and exhaust lapses, then removes
    /// every spent modifier. Returns the removed ids.
    pub fn check_expire(&mut self, checkpoint: Checkpoint) -> Result<Vec<ModifierId>, CombatError> {
        let mut spent = Vec::new();

        for modifier in self.world.modifiers.values_mut() {
            if modifier.exhausted {
                spent.push(modifier.id);
                continue;
            }

            if let Some(expiry) = modifier.template.expiry
                && checkpoint.matches(expiry.at, modifier)
                && let Some(count) = modifier.exp_count.as_mut()
            {
                *count -= 1;
            }

            if let Some(exhaust) = modifier.template.exhaust
                && let Some(lapse) = exhaust.lapse
                && checkpoint.matches(lapse, modifier)
            {
                if modifier.triggered_since_lapse {
                    modifier.triggered_since_lapse = false;
                } else if let Some(count) = modifier.exhaust_count.as_mut() {
                    *count -= 1;
                }
            }

            if modifier.is_spent() {
                spent.push(modifier.id);
            }
        }

        for id in &spent {
            self.remove_modifier(*id)?;
        }
        if !spent.is_empty() {
            debug!(?checkpoint, expired = spent.len(), "modifiers expired");
        }
        Ok(spent)
    }
}
