//! Session orchestration for the combat engine.
//!
//! This crate wires content, the [`skirmish_core::CombatEngine`], player
//! input, and event fan-out into a [`Session`] that clients drive turn by
//! turn.
//!
//! Modules are organized by responsibility:
//! - [`session`] hosts the turn driver and its builder
//! - [`api`] exposes the types downstream clients interact with
//! - [`events`] provides a topic-based event bus for presentation layers
//! - [`config`] reads runtime settings from the environment
pub mod api;
pub mod config;
pub mod events;
pub mod session;

pub use api::{
    ActionView, CombatantView, PassController, PlayerCommand, PlayerController, Result,
    RuntimeError, ScriptedController, TalkView, TurnView,
};
pub use config::RuntimeConfig;
pub use events::{Event, EventBus, Topic};
pub use session::{Session, SessionBuilder, SessionOutcome, StepResult};
