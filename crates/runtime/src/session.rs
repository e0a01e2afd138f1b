//! Turn driver.
//!
//! A [`Session`] owns one [`CombatEngine`] and advances it one turn per
//! [`Session::step`]. AI-controlled characters are resolved by the engine;
//! everyone else is asked through the configured [`PlayerController`].
//! After every step the engine's event outbox is drained, numbered, kept in
//! the session history, and published on the [`EventBus`].

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use skirmish_content::{ContentFactory, Encounter};
use skirmish_core::{
    CharacterId, CombatConfig, CombatEngine, CombatOutcome, ContentOracle, LogEntry,
    Team, TurnBegin,
};
use tokio::sync::broadcast;
use tracing::{debug, info, warn};

use crate::api::{PlayerCommand, PlayerController, Result, RuntimeError, TurnView};
use crate::config::RuntimeConfig;
use crate::events::{Event, EventBus, Topic};

/// How a session ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionOutcome {
    Decided(CombatOutcome),
    /// The round cap was reached with both sides standing.
    Stalemate { rounds: u32 },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepResult {
    Continue,
    Finished(SessionOutcome),
}

/// Everything needed to replay or audit a session.
#[derive(Serialize)]
struct CombatRecord<'a> {
    seed: u64,
    rounds: u32,
    outcome: Option<SessionOutcome>,
    log: &'a [LogEntry],
    events: &'a [Event],
}

pub struct Session {
    engine: CombatEngine,
    bus: EventBus,
    config: RuntimeConfig,
    controller: Option<Arc<dyn PlayerController>>,
    history: Vec<Event>,
    outcome: Option<SessionOutcome>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn engine(&self) -> &CombatEngine {
        &self.engine
    }

    pub fn config(&self) -> &RuntimeConfig {
        &self.config
    }

    pub fn bus(&self) -> &EventBus {
        &self.bus
    }

    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.bus.subscribe(topic)
    }

    /// Every event published so far, in order.
    pub fn history(&self) -> &[Event] {
        &self.history
    }

    pub fn outcome(&self) -> Option<SessionOutcome> {
        self.outcome
    }

    /// Plays one turn.
    pub async fn step(&mut self) -> Result<StepResult> {
        if let Some(outcome) = self.outcome {
            return Ok(StepResult::Finished(outcome));
        }
        if self.round_cap_reached() {
            let rounds = self.engine.round();
            info!(rounds, "round cap reached, stalemate");
            return Ok(StepResult::Finished(self.conclude(SessionOutcome::Stalemate { rounds })));
        }

        let result = match self.engine.next_turn()? {
            TurnBegin::Finished(outcome) => StepResult::Finished(SessionOutcome::Decided(outcome)),
            TurnBegin::Skipped(character) => {
                debug!(%character, "skipped turn of a fallen character");
                match self.engine.outcome() {
                    Some(outcome) => StepResult::Finished(SessionOutcome::Decided(outcome)),
                    None => StepResult::Continue,
                }
            }
            TurnBegin::Act(character) => {
                let played = self.play_turn(character).await;
                if played.is_err() {
                    self.flush();
                }
                played?;
                match self.engine.end_turn()? {
                    Some(outcome) => StepResult::Finished(SessionOutcome::Decided(outcome)),
                    None => StepResult::Continue,
                }
            }
        };

        self.flush();
        if let StepResult::Finished(outcome) = result {
            self.conclude(outcome);
        }
        Ok(result)
    }

    /// Plays turns until the combat is decided or the round cap is hit.
    pub async fn run(&mut self) -> Result<SessionOutcome> {
        loop {
            if let StepResult::Finished(outcome) = self.step().await? {
                return Ok(outcome);
            }
        }
    }

    /// Serializes the seed, outcome, combat log, and event history as JSON.
    pub fn export_json(&self) -> Result<String> {
        let record = CombatRecord {
            seed: self.config.seed,
            rounds: self.engine.round(),
            outcome: self.outcome,
            log: self.engine.world().log.entries(),
            events: &self.history,
        };
        serde_json::to_string_pretty(&record).map_err(RuntimeError::Export)
    }

    async fn play_turn(&mut self, actor: CharacterId) -> Result<()> {
        let ai = self.engine.world().character(actor)?.ai_controlled;
        if ai || self.config.ai_only {
            self.engine.take_ai_turn(actor)?;
            return Ok(());
        }

        let controller = self.controller.clone().ok_or(RuntimeError::ControllerNotSet)?;
        let mut rejections = 0;
        loop {
            let view = TurnView::capture(&self.engine, actor)?;
            let command = controller.choose(&view).await?;
            debug!(%actor, ?command, "player command");

            match self.apply(actor, command) {
                Ok(()) => return Ok(()),
                Err(err) if err.is_player_error() => {
                    warn!(%actor, error = %err, "command rejected");
                    rejections += 1;
                    controller.rejected(&view, &err).await;
                    if rejections >= self.config.max_rejections {
                        return Err(RuntimeError::TooManyRejections {
                            character: actor,
                            attempts: rejections,
                        });
                    }
                }
                Err(err) => return Err(err),
            }
        }
    }

    fn apply(&mut self, actor: CharacterId, command: PlayerCommand) -> Result<()> {
        match command {
            PlayerCommand::Use { thing, target } => {
                self.engine.select_action(actor, thing)?;
                self.engine.select_target(actor, thing, target)?;
            }
            PlayerCommand::Talk { listener, topic } => {
                let result = self.engine.choose_topic(listener, actor, &topic)?;
                debug!(%actor, %listener, topic = %result.topic, joined = ?result.joined, "talked");
                self.engine.pass_turn(actor)?;
            }
            PlayerCommand::Pass => self.engine.pass_turn(actor)?,
        }
        Ok(())
    }

    /// Whether the next turn would open a round past the cap.
    fn round_cap_reached(&self) -> bool {
        let cap = self.config.max_rounds;
        cap > 0
            && self.engine.round() >= cap
            && !self.engine.world().roster().any(|c| c.ready)
    }

    fn conclude(&mut self, outcome: SessionOutcome) -> SessionOutcome {
        if self.outcome.is_none() {
            info!(?outcome, rounds = self.engine.round(), "session finished");
            self.outcome = Some(outcome);
        }
        outcome
    }

    fn flush(&mut self) {
        for event in self.engine.drain_events() {
            let event = Event {
                sequence: self.history.len() as u64,
                event,
            };
            self.bus.publish(event.clone());
            self.history.push(event);
        }
    }
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    content: Option<Arc<dyn ContentOracle>>,
    combat_config: CombatConfig,
    config: RuntimeConfig,
    encounter: Option<Encounter>,
    controller: Option<Arc<dyn PlayerController>>,
}

impl Default for SessionBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl SessionBuilder {
    pub fn new() -> Self {
        Self {
            content: None,
            combat_config: CombatConfig::new(),
            config: RuntimeConfig::default(),
            encounter: None,
            controller: None,
        }
    }

    /// Loads content, rules, and the configured encounter from `config.content_dir`.
    pub fn from_content_dir(config: RuntimeConfig) -> Result<Self> {
        let factory = ContentFactory::new(config.content_dir.clone());
        let combat_config = factory.load_config().map_err(RuntimeError::Content)?;
        let tables = factory.load_tables().map_err(RuntimeError::Content)?;
        let mut encounters = factory
            .load_encounters(&tables)
            .map_err(RuntimeError::Content)?;
        let encounter = encounters
            .remove(&config.encounter)
            .ok_or_else(|| RuntimeError::UnknownEncounter(config.encounter.clone()))?;

        Ok(Self::new()
            .content(Arc::new(tables))
            .combat_config(combat_config)
            .encounter(encounter)
            .config(config))
    }

    pub fn content(mut self, content: Arc<dyn ContentOracle>) -> Self {
        self.content = Some(content);
        self
    }

    pub fn combat_config(mut self, config: CombatConfig) -> Self {
        self.combat_config = config;
        self
    }

    pub fn config(mut self, config: RuntimeConfig) -> Self {
        self.config = config;
        self
    }

    pub fn encounter(mut self, encounter: Encounter) -> Self {
        self.encounter = Some(encounter);
        self
    }

    pub fn controller(mut self, controller: Arc<dyn PlayerController>) -> Self {
        self.controller = Some(controller);
        self
    }

    /// Spawns the encounter and starts the combat.
    pub fn build(self) -> Result<Session> {
        let content = self.content.ok_or(RuntimeError::MissingContent)?;
        let encounter = self.encounter.ok_or(RuntimeError::MissingEncounter)?;

        let mut engine = CombatEngine::new(content, self.combat_config, self.config.seed);
        let ai = self.config.ai_only.then_some(true);
        for (team, roster) in [(Team::Ally, &encounter.allies), (Team::Enemy, &encounter.enemies)] {
            for template in roster {
                engine.spawn_with(template, team, ai)?;
            }
        }
        engine.begin()?;
        info!(
            seed = self.config.seed,
            allies = encounter.allies.len(),
            enemies = encounter.enemies.len(),
            "session started"
        );

        let mut session = Session {
            engine,
            bus: EventBus::with_capacity(self.config.event_buffer_size),
            config: self.config,
            controller: self.controller,
            history: Vec::new(),
            outcome: None,
        };
        session.flush();
        Ok(session)
    }
}
