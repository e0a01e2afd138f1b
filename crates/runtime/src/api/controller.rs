//! Asynchronous abstraction for sourcing player intent.
//!
//! Runtime users plug in [`PlayerController`] implementations so a session
//! can run with human input, scripted fixtures, or replays. AI-controlled
//! characters never reach a controller; the engine decides for them.
use std::collections::VecDeque;

use async_trait::async_trait;
use skirmish_core::{CharacterId, TargetChoice, ThingId};
use tokio::sync::Mutex;

use super::errors::{Result, RuntimeError};
use super::view::TurnView;

/// What a player-controlled character does with its turn.
#[derive(Clone, Debug, PartialEq)]
pub enum PlayerCommand {
    /// Use an owned action (the `selectAction` + `selectTarget` pair).
    Use { thing: ThingId, target: TargetChoice },
    /// Talk to `listener` about `topic`; uses up the turn.
    Talk { listener: CharacterId, topic: String },
    Pass,
}

/// Trait for providing player commands based on the current turn.
///
/// Different implementations can handle:
/// - Terminal or GUI input
/// - Scripted/replayed commands
/// - Testing fixtures
#[async_trait]
pub trait PlayerController: Send + Sync {
    /// Provide a command for `view.actor`.
    async fn choose(&self, view: &TurnView) -> Result<PlayerCommand>;

    /// Called when the engine rejected the last command; `choose` is asked again.
    async fn rejected(&self, _view: &TurnView, _error: &RuntimeError) {}
}

/// A controller that always passes.
/// Useful for testing or as a fallback.
pub struct PassController;

#[async_trait]
impl PlayerController for PassController {
    async fn choose(&self, _view: &TurnView) -> Result<PlayerCommand> {
        Ok(PlayerCommand::Pass)
    }
}

/// Replays a fixed queue of commands, then passes.
#[derive(Default)]
pub struct ScriptedController {
    commands: Mutex<VecDeque<PlayerCommand>>,
    rejections: Mutex<Vec<&'static str>>,
}

impl ScriptedController {
    pub fn new(commands: impl IntoIterator<Item = PlayerCommand>) -> Self {
        Self {
            commands: Mutex::new(commands.into_iter().collect()),
            rejections: Mutex::new(Vec::new()),
        }
    }

    /// Error codes of every rejected command, in order.
    pub async fn rejections(&self) -> Vec<&'static str> {
        self.rejections.lock().await.clone()
    }

    pub async fn remaining(&self) -> usize {
        self.commands.lock().await.len()
    }
}

#[async_trait]
impl PlayerController for ScriptedController {
    async fn choose(&self, _view: &TurnView) -> Result<PlayerCommand> {
        Ok(self
            .commands
            .lock()
            .await
            .pop_front()
            .unwrap_or(PlayerCommand::Pass))
    }

    async fn rejected(&self, _view: &TurnView, error: &RuntimeError) {
        use skirmish_core::GameError;
        self.rejections.lock().await.push(error.error_code());
    }
}
