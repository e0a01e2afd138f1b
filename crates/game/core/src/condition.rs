//! Elemental conditions.
//!
//! Landed hits accumulate a per-element condition value on the target. The
//! value escalates into status modifiers drawn from the element's status
//! pool:
//!
//! - `phys` and `mind` are tiered: `floor(value / threshold)` distinct
//!   statuses, capped at the pool size, added and removed as the tier moves
//! - every other element has a single status, applied while
//!   `value >= threshold`
//!
//! Each turn start decays the value by 1 (2 while a tier is applied) unless
//! it grew since the previous turn start.

use tracing::{debug, warn};

use crate::combat::CombatEvent;
use crate::engine::CombatEngine;
use crate::env::ContentOracleExt;
use crate::error::CombatError;
use crate::modifier::{GrantOutcome, ModifierOrigin};
use crate::registry::CharacterId;
use crate::stats::Element;

impl CombatEngine {
    /// Adds condition value from a landed hit.
    pub fn add_condition(
        &mut self,
        target: CharacterId,
        element: Element,
        amount: f64,
    ) -> Result<(), CombatError> {
        if amount <= 0.0 {
            return Ok(());
        }
        let condition = self
            .world
            .character_mut(target)?
            .conditions
            .entry(element)
            .or_default();
        condition.value += amount;
        condition.gained = true;
        self.update_condition_tier(target, element)
    }

    /// Reduces condition value directly; `None` cures every element.
    pub fn cure_condition(
        &mut self,
        target: CharacterId,
        element: Option<Element>,
        amount: f64,
    ) -> Result<(), CombatError> {
        let elements: Vec<Element> = match element {
            Some(element) => vec![element],
            None => self
                .world
                .character(target)?
                .conditions
                .keys()
                .copied()
                .collect(),
        };

        for element in elements {
            if let Some(condition) = self.world.character_mut(target)?.conditions.get_mut(&element) {
                condition.value = (condition.value - amount).max(0.0);
                self.update_condition_tier(target, element)?;
            }
        }
        Ok(())
    }

    /// Turn-start decay of every condition on `target`.
    pub fn decay_conditions(&mut self, target: CharacterId) -> Result<(), CombatError> {
        let decay = self.world.config.condition_decay;
        let decay_applied = self.world.config.condition_decay_applied;

        let mut touched = Vec::new();
        for (element, condition) in self.world.character_mut(target)?.conditions.iter_mut() {
            if condition.gained {
                condition.gained = false;
                continue;
            }
            if condition.value <= 0.0 {
                continue;
            }
            let step = if condition.tier() > 0 { decay_applied } else { decay };
            condition.value = (condition.value - step).max(0.0);
            touched.push(*element);
        }

        for element in touched {
            self.update_condition_tier(target, element)?;
        }
        Ok(())
    }

    /// Tier the condition should sit at for its current value.
    fn desired_tier(&self, element: Element, value: f64) -> usize {
        let threshold = self.world.config.condition_threshold;
        let pool = self.content.status_pool(element).len();
        if threshold <= 0.0 || pool == 0 {
            return 0;
        }
        if element.is_tiered() {
            ((value / threshold).floor() as usize).min(pool)
        } else {
            usize::from(value >= threshold)
        }
    }

    fn update_condition_tier(&mut self, target: CharacterId, element: Element) -> Result<(), CombatError> {
        let Some(condition) = self.world.character(target)?.condition(element) else {
            return Ok(());
        };
        let value = condition.value;
        let before = condition.tier();
        let desired = self.desired_tier(element, value);

        while self.tier_of(target, element)? < desired {
            let applied_sources: Vec<String> = self
                .world
                .character(target)?
                .condition(element)
                .map(|c| {
                    c.applied
                        .iter()
                        .filter_map(|id| self.world.modifiers.get(id))
                        .map(|m| m.source.clone())
                        .collect()
                })
                .unwrap_or_default();
            let remaining: Vec<String> = self
                .content
                .status_pool(element)
                .iter()
                .filter(|status| !applied_sources.contains(status))
                .cloned()
                .collect();
            if remaining.is_empty() {
                break;
            }

            let status = remaining[self.world.rng.index(remaining.len())].clone();
            let template = self.content.require_modifier(&status)?.clone();
            let outcome =
                self.grant_modifier(&template, target, target, ModifierOrigin::new(status.clone()))?;
            let GrantOutcome::Created(id) = outcome else {
                warn!(%target, %element, %status, "condition status could not be applied");
                break;
            };
            if let Some(condition) = self.world.character_mut(target)?.conditions.get_mut(&element) {
                condition.applied.push(id);
            }
        }

        while self.tier_of(target, element)? > desired {
            let last = self
                .world
                .character_mut(target)?
                .conditions
                .get_mut(&element)
                .and_then(|c| c.applied.pop());
            match last {
                Some(id) => {
                    self.remove_modifier(id)?;
                }
                None => break,
            }
        }

        let after = self.tier_of(target, element)?;
        if after != before {
            debug!(%target, %element, value, before, after, "condition tier changed");
            self.world.emit(CombatEvent::ConditionChanged {
                character: target,
                element,
                value,
                tier: after,
            });
        }
        Ok(())
    }

    fn tier_of(&self, target: CharacterId, element: Element) -> Result<usize, CombatError> {
        Ok(self
            .world
            .character(target)?
            .condition(element)
            .map_or(0, |c| c.tier()))
    }
}
