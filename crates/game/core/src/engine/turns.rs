//! Round and turn state machine.
//!
//! ```text
//! begin ─► next_turn ─┬─► AwaitingAction ─► select_action ─► AwaitingTarget ─► select_target ─┐
//!                     │         └──────────────► take_ai_turn / pass_turn ──────────────────►│
//!                     │                                                                      ▼
//!                     └─◄──────────────────────── end_turn ◄────────────────────────── Resolved
//! ```
//!
//! `next_turn` opens a new round whenever nobody is left ready. Initiative
//! decides the order inside a round; ties go to the lower character id.

use tracing::{info, warn};

use super::CombatEngine;
use crate::combat::{ActionReport, CombatEvent, TargetChoice};
use crate::env::{EffectDuration, TriggerEvent};
use crate::error::{CombatError, ErrorContext};
use crate::modifier::{Checkpoint, TriggerContext};
use crate::registry::{CharacterId, ThingId};
use crate::state::{CombatOutcome, Team, TurnPhase};
use crate::stats::StatKind;

/// What `next_turn` produced.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TurnBegin {
    /// `character` is waiting for an action.
    Act(CharacterId),
    /// `character` was dead (or died during turn start); its turn already ended.
    Skipped(CharacterId),
    Finished(CombatOutcome),
}

impl CombatEngine {
    pub fn phase(&self) -> TurnPhase {
        self.world.turn.phase
    }

    pub fn active_character(&self) -> Option<CharacterId> {
        self.world.turn.active
    }

    pub fn round(&self) -> u32 {
        self.world.turn.round
    }

    pub fn outcome(&self) -> Option<CombatOutcome> {
        self.world.turn.outcome
    }

    /// Starts the combat session.
    pub fn begin(&mut self) -> Result<(), CombatError> {
        self.expect_phase(TurnPhase::NotStarted)?;
        if self.world.characters.is_empty() {
            return Err(CombatError::EmptyRoster);
        }
        self.world.turn.phase = TurnPhase::Idle;
        info!(combatants = self.world.characters.len(), "combat started");
        Ok(())
    }

    /// Advances to the next character's turn, opening a round if needed.
    pub fn next_turn(&mut self) -> Result<TurnBegin, CombatError> {
        if let Some(outcome) = self.world.turn.outcome {
            return Ok(TurnBegin::Finished(outcome));
        }
        self.expect_phase(TurnPhase::Idle)?;
        if let Some(outcome) = self.decided_outcome() {
            self.finish(outcome);
            return Ok(TurnBegin::Finished(outcome));
        }

        let next = match self.next_ready()? {
            Some(id) => id,
            None => {
                self.start_round()?;
                self.next_ready()?.ok_or(CombatError::EmptyRoster)?
            }
        };

        let turn = &mut self.world.turn;
        turn.turn += 1;
        turn.active = Some(next);
        turn.selected = None;
        let (round, number) = (turn.round, turn.turn);
        info!(character = %next, round, turn = number, "turn started");
        self.world.emit(CombatEvent::TurnStarted {
            character: next,
            round,
            turn: number,
        });

        if self.world.character(next)?.alive {
            self.check_triggers(next, TriggerEvent::TurnStart, &TriggerContext::default())?;
            self.check_expire(Checkpoint::TurnStart(next))?;
            self.decay_conditions(next)?;
        }

        if !self.world.character(next)?.alive {
            self.close_turn(next)?;
            return Ok(TurnBegin::Skipped(next));
        }

        self.world.turn.phase = TurnPhase::AwaitingAction;
        Ok(TurnBegin::Act(next))
    }

    /// Records the player's action choice; may be called again to change it.
    pub fn select_action(&mut self, character: CharacterId, thing: ThingId) -> Result<(), CombatError> {
        self.expect_actor(character)?;
        if !matches!(
            self.world.turn.phase,
            TurnPhase::AwaitingAction | TurnPhase::AwaitingTarget
        ) {
            return Err(self.wrong_phase(TurnPhase::AwaitingAction));
        }
        self.check_usable(character, thing)?;

        self.world.turn.selected = Some(thing);
        self.world.turn.phase = TurnPhase::AwaitingTarget;
        Ok(())
    }

    /// Resolves the selected action against the player's target choice.
    ///
    /// A recoverable error (no valid or an invalid target) leaves the turn
    /// awaiting a target.
    pub fn select_target(
        &mut self,
        character: CharacterId,
        thing: ThingId,
        choice: TargetChoice,
    ) -> Result<ActionReport, CombatError> {
        self.expect_actor(character)?;
        self.expect_phase(TurnPhase::AwaitingTarget)?;
        if self.world.turn.selected != Some(thing) {
            return Err(CombatError::NoActionSelected(character));
        }

        let report = self.use_action(character, thing, choice)?;
        self.world.turn.selected = None;
        self.world.turn.phase = TurnPhase::Resolved;
        Ok(report)
    }

    /// Gives up the active character's action for this turn.
    pub fn pass_turn(&mut self, character: CharacterId) -> Result<(), CombatError> {
        self.expect_actor(character)?;
        if !matches!(
            self.world.turn.phase,
            TurnPhase::AwaitingAction | TurnPhase::AwaitingTarget
        ) {
            return Err(self.wrong_phase(TurnPhase::AwaitingAction));
        }
        info!(%character, "turn passed");
        self.world.emit(CombatEvent::TurnPassed { character });
        self.world.turn.selected = None;
        self.world.turn.phase = TurnPhase::Resolved;
        Ok(())
    }

    /// Lets the AI pick and resolve an action. Returns `None` when it passed.
    pub fn take_ai_turn(&mut self, character: CharacterId) -> Result<Option<ActionReport>, CombatError> {
        self.expect_actor(character)?;
        self.expect_phase(TurnPhase::AwaitingAction)?;

        let Some(decision) = self.decide(character)? else {
            warn!(%character, "no valid AI option, passing");
            self.pass_turn(character)?;
            return Ok(None);
        };

        self.world.turn.selected = Some(decision.thing);
        self.world.turn.phase = TurnPhase::AwaitingTarget;
        let report = self.use_action(character, decision.thing, decision.choice)?;
        self.world.turn.selected = None;
        self.world.turn.phase = TurnPhase::Resolved;
        Ok(Some(report))
    }

    /// Closes the active turn; returns the outcome if the combat is decided.
    pub fn end_turn(&mut self) -> Result<Option<CombatOutcome>, CombatError> {
        self.expect_phase(TurnPhase::Resolved)?;
        let active = self
            .world
            .turn
            .active
            .ok_or(CombatError::WrongPhase {
                expected: TurnPhase::Resolved,
                actual: TurnPhase::Idle,
            })?;
        self.close_turn(active)
    }

    fn close_turn(&mut self, character: CharacterId) -> Result<Option<CombatOutcome>, CombatError> {
        self.check_triggers(character, TriggerEvent::TurnEnd, &TriggerContext::default())?;
        self.check_expire(Checkpoint::TurnEnd(character))?;

        let state = self.world.character_mut(character)?;
        state.ready = false;
        state.acted = true;
        state.last_targets.clear();
        self.purge_effects(EffectDuration::EndOfTurn)?;

        self.world.emit(CombatEvent::TurnEnded { character });
        self.world.turn.active = None;
        self.world.turn.selected = None;
        self.world.turn.phase = TurnPhase::Idle;

        let outcome = self.decided_outcome();
        if let Some(outcome) = outcome {
            self.finish(outcome);
        }
        Ok(outcome)
    }

    fn start_round(&mut self) -> Result<(), CombatError> {
        let turn = &mut self.world.turn;
        turn.round += 1;
        turn.turn = 0;
        let round = turn.round;
        info!(round, "round started");
        self.world.emit(CombatEvent::RoundStarted { round });

        self.purge_effects(EffectDuration::EndOfRound)?;
        let living: Vec<CharacterId> = self
            .world
            .roster()
            .filter(|c| c.alive)
            .map(|c| c.id)
            .collect();
        for id in &living {
            self.check_triggers(*id, TriggerEvent::RoundStart, &TriggerContext::default())?;
        }
        self.check_expire(Checkpoint::RoundStart)?;

        for character in self.world.characters.values_mut() {
            character.ready = character.alive;
            character.acted = false;
        }
        Ok(())
    }

    /// Highest-initiative ready character, ties to the lower id.
    fn next_ready(&self) -> Result<Option<CharacterId>, CombatError> {
        let mut best: Option<(f64, CharacterId)> = None;
        for character in self.world.roster().filter(|c| c.ready) {
            let initiative = self.world.stat(character.id, StatKind::Initiative)?;
            if best.is_none_or(|(top, _)| initiative > top) {
                best = Some((initiative, character.id));
            }
        }
        Ok(best.map(|(_, id)| id))
    }

    fn decided_outcome(&self) -> Option<CombatOutcome> {
        let allies = self.world.living(Team::Ally).next().is_some();
        let enemies = self.world.living(Team::Enemy).next().is_some();
        match (allies, enemies) {
            (true, true) => None,
            (true, false) => Some(CombatOutcome::Victory(Team::Ally)),
            (false, true) => Some(CombatOutcome::Victory(Team::Enemy)),
            (false, false) => Some(CombatOutcome::Draw),
        }
    }

    fn finish(&mut self, outcome: CombatOutcome) {
        info!(?outcome, round = self.world.turn.round, "combat finished");
        self.world.turn.outcome = Some(outcome);
        self.world.turn.phase = TurnPhase::Finished;
        self.world.turn.active = None;
        self.world.emit(CombatEvent::CombatEnded { outcome });
    }

    fn expect_phase(&self, expected: TurnPhase) -> Result<(), CombatError> {
        if self.world.turn.outcome.is_some() {
            return Err(CombatError::CombatFinished);
        }
        if self.world.turn.phase != expected {
            return Err(self.wrong_phase(expected));
        }
        Ok(())
    }

    fn wrong_phase(&self, expected: TurnPhase) -> CombatError {
        CombatError::WrongPhase {
            expected,
            actual: self.world.turn.phase,
        }
    }

    fn expect_actor(&self, character: CharacterId) -> Result<(), CombatError> {
        if self.world.turn.outcome.is_some() {
            return Err(CombatError::CombatFinished);
        }
        if self.world.turn.active != Some(character) {
            let turn = &self.world.turn;
            return Err(CombatError::NotYourTurn {
                actor: character,
                context: ErrorContext::new(turn.round, turn.turn).with_actor(character),
            });
        }
        Ok(())
    }
}
