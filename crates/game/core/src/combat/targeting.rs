//! Target selection for the first act and target derivation for later acts.

use crate::engine::CombatEngine;
use crate::env::{Act, ActTarget, ActionTemplate, LifeFilter, TargetKind};
use crate::error::CombatError;
use crate::registry::{CastId, CharacterId, ThingId};
use crate::state::Team;

use super::resolve::TargetChoice;

impl CombatEngine {
    /// Characters that `actor` could pick for `action` right now.
    ///
    /// For single-target kinds these are the candidates; for team, self,
    /// and everyone kinds this is the full resolved list.
    pub fn valid_targets(
        &self,
        actor: CharacterId,
        action: &ActionTemplate,
    ) -> Result<Vec<CharacterId>, CombatError> {
        let team = self.world.character(actor)?.team;
        let life = action.chosen_life();

        let ids = match action.target {
            TargetKind::SingleEnemy | TargetKind::EnemyTeam => self.members(Some(team.opponent()), life),
            TargetKind::SingleAlly | TargetKind::AllyTeam => self.members(Some(team), life),
            TargetKind::Single | TargetKind::Everyone => self.members(None, life),
            TargetKind::SelfOnly => vec![actor],
        };
        Ok(ids)
    }

    /// Valid targets for an owned action.
    pub fn valid_targets_for(
        &self,
        actor: CharacterId,
        thing: ThingId,
    ) -> Result<Vec<CharacterId>, CombatError> {
        let thing = self.world.thing(thing)?;
        match &thing.action {
            Some(action) => self.valid_targets(actor, action),
            None => Ok(Vec::new()),
        }
    }

    /// Resolves and validates the player's or AI's choice.
    pub(crate) fn chosen_targets(
        &self,
        actor: CharacterId,
        action: &ActionTemplate,
        choice: TargetChoice,
    ) -> Result<Vec<CharacterId>, CombatError> {
        let candidates = self.valid_targets(actor, action)?;
        if candidates.is_empty() {
            return Err(CombatError::NoValidTargets {
                actor,
                action: action.name.clone(),
            });
        }
        if !action.target.is_single() {
            return Ok(candidates);
        }

        match choice {
            TargetChoice::Character(target) if candidates.contains(&target) => Ok(vec![target]),
            TargetChoice::Character(target) => Err(CombatError::InvalidTarget {
                target,
                action: action.name.clone(),
            }),
            TargetChoice::SelfTarget if candidates.contains(&actor) => Ok(vec![actor]),
            _ => Err(CombatError::InvalidTarget {
                target: actor,
                action: action.name.clone(),
            }),
        }
    }

    /// Targets of act `index` (> 0) under its policy, filtered by life.
    pub(crate) fn act_targets(
        &mut self,
        actor: CharacterId,
        cast: CastId,
        index: usize,
        act: &Act,
        chosen: &[CharacterId],
    ) -> Result<Vec<CharacterId>, CombatError> {
        let team = self.world.character(actor)?.team;

        let raw = match act.policy(index) {
            ActTarget::Chosen => chosen.to_vec(),
            ActTarget::Previous(_) if index == 0 => chosen.to_vec(),
            ActTarget::Previous(outcome) => self.world.log.act_targets(cast, index - 1, outcome),
            ActTarget::RandomEnemies {
                count,
                exclude_previous,
            } => self.random_members(team.opponent(), act.life, count, exclude_previous.then_some(cast)),
            ActTarget::RandomAllies {
                count,
                exclude_previous,
            } => self.random_members(team, act.life, count, exclude_previous.then_some(cast)),
            ActTarget::EnemyTeam => self.members(Some(team.opponent()), act.life),
            ActTarget::AllyTeam => self.members(Some(team), act.life),
            ActTarget::SelfOnly => vec![actor],
            ActTarget::Everyone => self.members(None, act.life),
        };

        Ok(raw
            .into_iter()
            .filter(|id| {
                self.world
                    .characters
                    .get(id)
                    .is_some_and(|c| act.life.admits(c.alive))
            })
            .collect())
    }

    fn members(&self, team: Option<Team>, life: LifeFilter) -> Vec<CharacterId> {
        self.world
            .roster()
            .filter(|c| team.is_none_or(|team| c.team == team) && life.admits(c.alive))
            .map(|c| c.id)
            .collect()
    }

    fn random_members(
        &mut self,
        team: Team,
        life: LifeFilter,
        count: u32,
        exclude_cast: Option<CastId>,
    ) -> Vec<CharacterId> {
        let excluded = exclude_cast
            .map(|cast| self.world.log.cast_hits(cast))
            .unwrap_or_default();
        let mut pool: Vec<CharacterId> = self
            .members(Some(team), life)
            .into_iter()
            .filter(|id| !excluded.contains(id))
            .collect();

        let mut picked = Vec::new();
        while picked.len() < count as usize && !pool.is_empty() {
            let index = self.world.rng.index(pool.len());
            picked.push(pool.swap_remove(index));
        }
        picked
    }
}
