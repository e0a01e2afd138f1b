//! Triggered effects.
//!
//! When a game event occurs, every live modifier on the affected character
//! is scanned for trigger entries that name the event and whose category
//! gates match the event's categories. Each match instantiates a
//! [`LiveEffect`] that feeds stat resolution until its duration lapses, runs
//! the entry's optional [`TriggerAction`], and charges the modifier's
//! exhaust counter once per exhaust window.

use tracing::debug;

use crate::combat::{LogRecord, Window};
use crate::engine::CombatEngine;
use crate::env::{
    ContentOracleExt, ExhaustScope, NarrativeVars, Subject, TriggerAction, TriggerEvent,
};
use crate::error::CombatError;
use crate::modifier::ModifierOrigin;
use crate::registry::{CastId, CharacterId, ModifierId};
use crate::state::LiveEffect;

/// Event details passed to trigger evaluation.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TriggerContext {
    pub categories: Vec<String>,
    /// The other party of the event.
    pub other: Option<CharacterId>,
    pub cast: Option<CastId>,
    pub act: Option<usize>,
}

impl TriggerContext {
    pub fn new(categories: Vec<String>) -> Self {
        Self {
            categories,
            ..Self::default()
        }
    }

    pub fn with_other(mut self, other: Option<CharacterId>) -> Self {
        self.other = other;
        self
    }

    pub fn with_act(mut self, cast: CastId, act: usize) -> Self {
        self.cast = Some(cast);
        self.act = Some(act);
        self
    }

    fn window(&self, scope: ExhaustScope, round: u32, turn: u32) -> Window {
        match (scope, self.cast, self.act) {
            (ExhaustScope::OncePerTurn, _, _) => Window::Turn { round, turn },
            (ExhaustScope::OncePerAct, Some(cast), Some(act)) => Window::Act { cast, act },
            _ => Window::Always,
        }
    }
}

impl CombatEngine {
    /// Fires `event` on `holder`'s modifiers. Returns the number of activations.
    pub fn check_triggers(
        &mut self,
        holder: CharacterId,
        event: TriggerEvent,
        ctx: &TriggerContext,
    ) -> Result<usize, CombatError> {
        let alive = self.world.character(holder)?.alive;
        if !alive && event != TriggerEvent::Death {
            return Ok(0);
        }

        let candidates: Vec<(ModifierId, usize)> = self
            .world
            .modifiers_on(holder)
            .filter(|m| !m.is_spent())
            .flat_map(|m| {
                m.template
                    .triggers
                    .iter()
                    .enumerate()
                    .filter(|(_, t)| t.on.contains(&event) && t.matches_categories(&ctx.categories))
                    .map(move |(entry, _)| (m.id, entry))
            })
            .collect();

        let mut fired = 0;
        for (modifier_id, entry) in candidates {
            // An earlier activation may have removed or exhausted it.
            let Some(modifier) = self.world.modifiers.get(&modifier_id) else {
                continue;
            };
            if modifier.is_spent() {
                continue;
            }
            let trigger = modifier.template.triggers[entry].clone();
            let exhaust = modifier.template.exhaust;

            if !trigger.stacks
                && self.world.effects.values().any(|effect| {
                    effect.holder == holder && effect.modifier == modifier_id && effect.entry == entry
                })
            {
                continue;
            }

            let charged = exhaust.is_some_and(|exhaust| {
                let window = ctx.window(exhaust.scope, self.world.turn.round, self.world.turn.turn);
                !self.world.log.triggered_in_window(modifier_id, window)
            });

            let effect_id = self.world.registry.effect();
            self.world.effects.insert(
                effect_id,
                LiveEffect {
                    id: effect_id,
                    modifier: modifier_id,
                    entry,
                    holder,
                    effects: trigger.effects.clone(),
                    duration: trigger.duration,
                    cast: ctx.cast,
                },
            );
            self.world.record(
                holder,
                ctx.other,
                ctx.cast,
                ctx.act,
                LogRecord::Trigger {
                    modifier: modifier_id,
                    entry,
                    event,
                },
            );

            let modifier = self.world.modifier_mut(modifier_id)?;
            modifier.triggered_since_lapse = true;
            if charged && let Some(count) = modifier.exhaust_count.as_mut() {
                *count -= 1;
                if *count <= 0 {
                    modifier.exhausted = true;
                }
            }
            fired += 1;
            debug!(%holder, modifier = %modifier_id, entry, %event, charged, "trigger fired");

            if let Some(text) = &trigger.text {
                let actor = self.name_of(holder);
                let other = ctx.other.map(|id| self.name_of(id));
                self.narrate(
                    text,
                    &NarrativeVars {
                        actor: Some(&actor),
                        target: other.as_deref(),
                        ..NarrativeVars::default()
                    },
                );
            }

            if let Some(action) = &trigger.action {
                self.run_trigger_action(holder, modifier_id, action, ctx)?;
            }
        }

        if fired > 0 {
            self.clamp_vitals()?;
        }
        Ok(fired)
    }

    fn run_trigger_action(
        &mut self,
        holder: CharacterId,
        modifier: ModifierId,
        action: &TriggerAction,
        ctx: &TriggerContext,
    ) -> Result<(), CombatError> {
        let subject_of = |subject: Subject| match subject {
            Subject::Holder => Some(holder),
            Subject::Other => ctx.other,
        };

        match action {
            TriggerAction::Heal { amount, subject } => {
                if let Some(target) = subject_of(*subject) {
                    self.restore_health(target, *amount)?;
                }
            }
            TriggerAction::Damage { amount, subject } => {
                if let Some(target) = subject_of(*subject) {
                    let source = (target != holder).then_some(holder);
                    self.deal_damage(target, *amount, source)?;
                }
            }
            TriggerAction::RestoreMana { amount } => {
                self.restore_mana(holder, *amount)?;
            }
            TriggerAction::Cure { element, amount } => {
                self.cure_condition(holder, *element, *amount)?;
            }
            TriggerAction::RemoveModifier => {
                self.remove_modifier(modifier)?;
            }
            TriggerAction::ApplyModifier {
                modifier: template_id,
                subject,
            } => {
                if let Some(target) = subject_of(*subject) {
                    let template = self.content.require_modifier(template_id)?.clone();
                    let mut origin = ModifierOrigin::new(template_id.clone());
                    origin.cast = ctx.cast;
                    self.grant_modifier(&template, target, holder, origin)?;
                }
            }
        }
        Ok(())
    }
}
