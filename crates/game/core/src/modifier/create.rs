//! Modifier instantiation and stacking rules.
//!
//! Before a modifier is created, existing live modifiers with the same
//! source id are matched against the template's stacking scopes:
//!
//! | Rule | Matches an existing modifier when |
//! |---|---|
//! | `one_per_c` | same source, same granter, and inside the scope |
//! | `one_per_id` | same source (any granter) and inside the scope |
//!
//! A scope is `Target` (the existing modifier already covers the target),
//! `Team` (it covers someone on the target's team), or `Global` (anywhere).
//! On a match `remodify` decides: `Replace` removes the matches and creates
//! anew, `Fail` aborts, and `Stack` folds the target into the first match.

use tracing::debug;

use crate::combat::{CombatEvent, LogRecord};
use crate::engine::CombatEngine;
use crate::env::{ExpiryPoint, ModifierTemplate, NarrativeVars, Remodify, StackScope};
use crate::error::CombatError;
use crate::registry::{CastId, CharacterId, ModifierId, ThingId};
use crate::state::{Modifier, Targets, Team};

/// Provenance of a new modifier.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModifierOrigin {
    /// Source id used when the template has no explicit id.
    pub source: String,
    pub cast: Option<CastId>,
    pub bound_to: Option<ThingId>,
}

impl ModifierOrigin {
    pub fn new(source: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            cast: None,
            bound_to: None,
        }
    }

    pub fn with_cast(mut self, cast: CastId) -> Self {
        self.cast = Some(cast);
        self
    }

    pub fn bound_to(mut self, thing: ThingId) -> Self {
        self.bound_to = Some(thing);
        self
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GrantOutcome {
    Created(ModifierId),
    /// The target was folded into an existing instance.
    Joined(ModifierId),
    /// `remodify: Fail` found a match.
    Refused,
}

impl GrantOutcome {
    pub fn modifier(self) -> Option<ModifierId> {
        match self {
            GrantOutcome::Created(id) | GrantOutcome::Joined(id) => Some(id),
            GrantOutcome::Refused => None,
        }
    }
}

impl CombatEngine {
    /// Grants a modifier built from `template` to `target`.
    pub fn grant_modifier(
        &mut self,
        template: &ModifierTemplate,
        target: CharacterId,
        granter: CharacterId,
        origin: ModifierOrigin,
    ) -> Result<GrantOutcome, CombatError> {
        let source = template
            .id
            .clone()
            .unwrap_or_else(|| origin.source.clone());

        if (template.shared || template.global)
            && let Some(cast) = origin.cast
            && let Some(existing) = self.world.log.shared_modifier(cast, &source)
            && let Some(modifier) = self.world.modifiers.get_mut(&existing)
        {
            modifier.targets.add(target);
            debug!(modifier = %existing, %target, "shared modifier extended");
            return Ok(GrantOutcome::Joined(existing));
        }

        let matches = self.stacking_matches(template, &source, target, granter)?;
        if let Some(&first) = matches.first() {
            match template.remodify {
                Remodify::Replace => {
                    for id in matches {
                        self.remove_modifier(id)?;
                    }
                }
                Remodify::Fail => {
                    debug!(%source, %target, "modifier refused by stacking rule");
                    return Ok(GrantOutcome::Refused);
                }
                Remodify::Stack => {
                    self.world.modifier_mut(first)?.targets.add(target);
                    return Ok(GrantOutcome::Joined(first));
                }
            }
        }

        Ok(GrantOutcome::Created(self.create_modifier(
            template, source, target, granter, origin,
        )?))
    }

    fn create_modifier(
        &mut self,
        template: &ModifierTemplate,
        source: String,
        target: CharacterId,
        granter: CharacterId,
        origin: ModifierOrigin,
    ) -> Result<ModifierId, CombatError> {
        let id = self.world.registry.modifier();

        let mut exp_count = template.expiry.map(|expiry| expiry.count);
        if let Some(expiry) = template.expiry
            && expiry.at == ExpiryPoint::TargetTurnEnd
            && target == granter
            && self.world.turn.is_active(granter)
            && let Some(count) = exp_count.as_mut()
        {
            // This turn's own end would otherwise consume a count.
            *count += 1;
        }

        let targets = if template.global {
            Targets::Global
        } else {
            Targets::List(vec![target])
        };

        self.world.modifiers.insert(
            id,
            Modifier {
                id,
                source: source.clone(),
                granter,
                targets,
                template: template.clone(),
                cast: origin.cast,
                bound_to: origin.bound_to,
                exp_count,
                exhaust_count: template.exhaust.map(|exhaust| exhaust.count),
                exhausted: false,
                triggered_since_lapse: false,
            },
        );

        self.world.record(
            granter,
            Some(target),
            origin.cast,
            None,
            LogRecord::ModifierApplied {
                modifier: id,
                source: source.clone(),
            },
        );
        self.world.emit(CombatEvent::ModifierApplied {
            modifier: id,
            target,
            description: template.description.clone(),
        });
        if let Some(text) = &template.text {
            let actor = self.name_of(granter);
            let victim = self.name_of(target);
            self.narrate(
                text,
                &NarrativeVars {
                    actor: Some(&actor),
                    target: Some(&victim),
                    ..NarrativeVars::default()
                },
            );
        }

        debug!(modifier = %id, %source, %target, %granter, "modifier created");
        self.clamp_vitals()?;
        Ok(id)
    }

    fn stacking_matches(
        &self,
        template: &ModifierTemplate,
        source: &str,
        target: CharacterId,
        granter: CharacterId,
    ) -> Result<Vec<ModifierId>, CombatError> {
        if template.one_per_c.is_none() && template.one_per_id.is_none() {
            return Ok(Vec::new());
        }
        let team = self.world.character(target)?.team;

        Ok(self
            .world
            .modifiers
            .values()
            .filter(|m| m.source == source)
            .filter(|m| {
                let per_c = template
                    .one_per_c
                    .is_some_and(|scope| m.granter == granter && self.in_scope(m, scope, target, team));
                let per_id = template
                    .one_per_id
                    .is_some_and(|scope| self.in_scope(m, scope, target, team));
                per_c || per_id
            })
            .map(|m| m.id)
            .collect())
    }

    fn in_scope(&self, modifier: &Modifier, scope: StackScope, target: CharacterId, team: Team) -> bool {
        match scope {
            StackScope::Global => true,
            StackScope::Target => modifier.targets.includes(target),
            StackScope::Team => match &modifier.targets {
                Targets::Global => true,
                Targets::List(list) => list.iter().any(|id| {
                    self.world
                        .characters
                        .get(id)
                        .is_some_and(|c| c.team == team)
                }),
            },
        }
    }
}
