//! Archetype heuristics.
//!
//! Every option is scored the same way:
//!
//! ```text
//! value = is_possible × running_weight × situation
//! ```
//!
//! `situation` comes from the per-target scores of the option's valid
//! targets. Targets failing the option's prerequisite, or scoring zero, are
//! dropped; an option left with no targets is impossible.

use tracing::debug;

use crate::engine::CombatEngine;
use crate::env::{ActKind, ActionTemplate, AiKind, Prerequisite, Remodify, Slot};
use crate::error::CombatError;
use crate::registry::{CharacterId, ThingId};
use crate::stats::{Affinity, Element, weapon_element};

/// Desirability of one option this turn.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Score {
    pub is_possible: bool,
    /// Scored targets in roster order.
    pub targets: Vec<(CharacterId, f64)>,
    /// Factor applied to the running weight.
    pub situation: f64,
}

impl Score {
    pub fn impossible() -> Self {
        Self::default()
    }

    pub fn value(&self, weight: f64) -> f64 {
        if self.is_possible {
            (weight * self.situation).max(0.0)
        } else {
            0.0
        }
    }
}

impl CombatEngine {
    /// Scores `thing` as an option for `actor`.
    pub(crate) fn score_option(&self, actor: CharacterId, thing: ThingId) -> Result<Score, CombatError> {
        let item = self.world.thing(thing)?;
        let Some(action) = item.action.as_ref() else {
            return Ok(Score::impossible());
        };
        let element = match item.slot() {
            Some(Slot::Weapon) => weapon_element(&self.world, actor).unwrap_or(action.element),
            _ => action.element,
        };
        let sources = self.granted_sources(action, item.action_id())?;

        let mut targets = Vec::new();
        for target in self.valid_targets(actor, action)? {
            if let Some(prerequisite) = action.ai.prerequisite
                && !self.meets(actor, target, prerequisite, &sources)?
            {
                continue;
            }
            let score = match action.ai.kind {
                AiKind::Attacker => self.attack_score(actor, target, element)?,
                AiKind::Buffer => self.buff_score(target, &sources),
                AiKind::Healer => self.heal_score(target, action)?,
            };
            if score > 0.0 {
                targets.push((target, score));
            }
        }

        if targets.is_empty() {
            return Ok(Score::impossible());
        }
        let situation = if action.target.is_single() {
            targets.iter().map(|(_, s)| *s).fold(0.0, f64::max)
        } else {
            let mean = targets.iter().map(|(_, s)| *s).sum::<f64>() / targets.len() as f64;
            mean * (1.0 + 0.25 * (targets.len() - 1) as f64)
        };

        debug!(%actor, %thing, kind = %action.ai.kind, situation, targets = targets.len(), "option scored");
        Ok(Score {
            is_possible: true,
            targets,
            situation,
        })
    }

    /// Remembered affinity and how close the target is to falling.
    fn attack_score(&self, actor: CharacterId, target: CharacterId, element: Element) -> Result<f64, CombatError> {
        let attacker = self.world.character(actor)?;
        if self.world.character(target)?.team == attacker.team {
            return Ok(0.0);
        }
        let affinity = match attacker.memory.get(&target).and_then(|m| m.recall(element)) {
            Some(Affinity::Weak) => 2.0,
            Some(Affinity::Resist) => 0.5,
            Some(Affinity::Immune) => 0.0,
            Some(Affinity::Neutral) | None => 1.0,
        };
        let fraction = self.world.health_fraction(target)?;
        Ok(affinity * (1.5 - 0.5 * fraction))
    }

    /// Prefers targets that do not already carry what the action grants.
    fn buff_score(&self, target: CharacterId, sources: &[(String, Remodify)]) -> f64 {
        if sources.is_empty() {
            return 1.0;
        }
        let carried: Vec<&(String, Remodify)> = sources
            .iter()
            .filter(|(source, _)| self.world.has_modifier_source(target, source))
            .collect();
        if carried.len() < sources.len() {
            return 1.0;
        }
        if carried.iter().all(|(_, remodify)| *remodify == Remodify::Replace) {
            0.25
        } else {
            0.0
        }
    }

    fn heal_score(&self, target: CharacterId, action: &ActionTemplate) -> Result<f64, CombatError> {
        let character = self.world.character(target)?;
        if !character.alive {
            return Ok(1.5);
        }
        let missing = 1.0 - self.world.health_fraction(target)?;
        let cures = action
            .acts
            .iter()
            .any(|act| matches!(&act.kind, ActKind::Heal(params) if params.cure.is_some()));
        let conditioned = character.conditions.values().any(|c| c.value > 0.0);
        let relief = if cures && conditioned { 0.5 } else { 0.0 };
        Ok(missing * 2.0 + relief)
    }

    fn meets(
        &self,
        actor: CharacterId,
        target: CharacterId,
        prerequisite: Prerequisite,
        sources: &[(String, Remodify)],
    ) -> Result<bool, CombatError> {
        Ok(match prerequisite {
            Prerequisite::HealthBelow(limit) => self.world.health_fraction(target)? < limit,
            Prerequisite::SelfHealthBelow(limit) => self.world.health_fraction(actor)? < limit,
            Prerequisite::Unaffected => !sources
                .iter()
                .any(|(source, _)| self.world.has_modifier_source(target, source)),
            Prerequisite::Conditioned(amount) => self
                .world
                .character(target)?
                .conditions
                .values()
                .any(|c| c.value >= amount),
        })
    }

    /// Source ids (and stacking policy) of the modifiers an action grants.
    fn granted_sources(
        &self,
        action: &ActionTemplate,
        action_id: &str,
    ) -> Result<Vec<(String, Remodify)>, CombatError> {
        use crate::env::ContentOracleExt;

        action
            .granted_modifiers()
            .map(|id| {
                let template = self.content.require_modifier(id)?;
                let source = template.id.clone().unwrap_or_else(|| action_id.to_string());
                Ok((source, template.remodify))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn impossible_scores_nothing() {
        let score = Score {
            is_possible: false,
            targets: vec![(CharacterId(1), 1.0)],
            situation: 2.0,
        };
        assert_eq!(score.value(10.0), 0.0);
        assert_eq!(Score { is_possible: true, ..score }.value(10.0), 20.0);
    }
}
