//! AI decisions for non-player characters.
//!
//! Each AI turn:
//!
//! 1. the option table is synced with what the character holds
//! 2. every option's running weight recovers toward its initial value and
//!    the option is scored ([`scoring`])
//! 3. impossible options drop out; a lone survivor is chosen outright,
//!    otherwise the top options are sampled by weight ([`selector`])
//! 4. the chosen option picks its targets the same way among its finalists
//! 5. the chosen option's weight resets to its reset value plus jitter
mod option;
pub mod scoring;
pub mod selector;

pub use option::AiOption;
pub use scoring::Score;

use tracing::{debug, info};

use crate::combat::TargetChoice;
use crate::config::CombatConfig;
use crate::engine::CombatEngine;
use crate::env::{ActionTemplate, AiTargeting, TargetKind};
use crate::error::CombatError;
use crate::registry::{CharacterId, ThingId};

/// What the AI settled on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AiDecision {
    pub thing: ThingId,
    pub choice: TargetChoice,
    /// The option came out of proportional sampling rather than being the only one.
    pub option_sampled: bool,
    /// The target came out of proportional sampling rather than being the only one.
    pub target_sampled: bool,
}

impl CombatEngine {
    /// Decides `actor`'s action. `Ok(None)` means every option was invalid.
    pub fn decide(&mut self, actor: CharacterId) -> Result<Option<AiDecision>, CombatError> {
        self.sync_ai_options(actor)?;
        let ids: Vec<ThingId> = self.world.character(actor)?.ai_options.keys().copied().collect();
        if ids.is_empty() {
            return Err(CombatError::NoAiOptions(actor));
        }
        let recovery = self.world.config.ai_weight_recovery;

        let mut scored = Vec::with_capacity(ids.len());
        for thing in ids {
            let score = if self.check_usable(actor, thing).is_ok() {
                self.score_option(actor, thing)?
            } else {
                Score::impossible()
            };
            let character = self.world.character_mut(actor)?;
            let Some(option) = character.ai_options.get_mut(&thing) else {
                continue;
            };
            option.recover(recovery);
            let value = score.value(option.weight);
            option.valid = value > 0.0;
            debug!(%actor, %thing, weight = option.weight, value, "option weighed");
            scored.push((thing, value, score));
        }

        let weights: Vec<f64> = scored.iter().map(|(_, value, _)| *value).collect();
        let pool = self.world.config.option_pool();
        let Some(pick) = selector::pick_weighted::<{ CombatConfig::MAX_AI_OPTION_POOL }>(
            &mut self.world.rng,
            &weights,
            pool,
        ) else {
            return Ok(None);
        };
        let (thing, _, score) = scored.swap_remove(pick.index);

        let action = self
            .world
            .thing(thing)?
            .action
            .clone()
            .ok_or(CombatError::NoAiOptions(actor))?;
        let (choice, target_sampled) = self.ai_target(actor, &action, &score)?;

        let jitter = self.world.config.ai_reset_jitter;
        let jitter = self.world.rng.uniform(0.0, jitter);
        if let Some(option) = self.world.character_mut(actor)?.ai_options.get_mut(&thing) {
            option.weight = option.reset + jitter;
        }

        info!(%actor, %thing, action = %action.name, ?choice, "AI decided");
        Ok(Some(AiDecision {
            thing,
            choice,
            option_sampled: pick.sampled,
            target_sampled,
        }))
    }

    /// Keeps one option per held thing that carries an action.
    fn sync_ai_options(&mut self, actor: CharacterId) -> Result<(), CombatError> {
        let held: Vec<(ThingId, crate::env::AiProfile)> = self
            .world
            .character(actor)?
            .holdings()
            .filter_map(|id| self.world.things.get(&id))
            .filter_map(|thing| {
                thing
                    .action
                    .as_ref()
                    .filter(|action| !action.acts.is_empty())
                    .map(|action| (thing.id, action.ai.clone()))
            })
            .collect();

        let options = &mut self.world.character_mut(actor)?.ai_options;
        options.retain(|id, _| held.iter().any(|(thing, _)| thing == id));
        for (thing, profile) in held {
            options
                .entry(thing)
                .or_insert_with(|| AiOption::new(thing, &profile));
        }
        Ok(())
    }

    fn ai_target(
        &mut self,
        actor: CharacterId,
        action: &ActionTemplate,
        score: &Score,
    ) -> Result<(TargetChoice, bool), CombatError> {
        let team = self.world.character(actor)?.team;
        let choice = match action.target {
            TargetKind::SelfOnly => TargetChoice::SelfTarget,
            TargetKind::EnemyTeam => TargetChoice::Team(team.opponent()),
            TargetKind::AllyTeam => TargetChoice::Team(team),
            TargetKind::Everyone => TargetChoice::Everyone,
            TargetKind::SingleEnemy | TargetKind::SingleAlly | TargetKind::Single => {
                return Ok(self.ai_single_target(action, score));
            }
        };
        Ok((choice, false))
    }

    fn ai_single_target(&mut self, action: &ActionTemplate, score: &Score) -> (TargetChoice, bool) {
        let candidates = &score.targets;
        if let [(only, _)] = candidates.as_slice() {
            return (TargetChoice::Character(*only), false);
        }

        match action.ai.targeting {
            AiTargeting::Random => {
                let index = self.world.rng.index(candidates.len());
                (TargetChoice::Character(candidates[index].0), true)
            }
            AiTargeting::Weighted => {
                let weights: Vec<f64> = candidates.iter().map(|(_, s)| *s).collect();
                let finalists = self.world.config.target_finalists();
                match selector::pick_weighted::<{ CombatConfig::MAX_AI_TARGET_FINALISTS }>(
                    &mut self.world.rng,
                    &weights,
                    finalists,
                ) {
                    Some(pick) => (TargetChoice::Character(candidates[pick.index].0), pick.sampled),
                    None => (TargetChoice::Character(candidates[0].0), false),
                }
            }
        }
    }
}
