//! Event fan-out for presentation layers.
//!
//! The engine appends [`skirmish_core::CombatEvent`]s to an ordered outbox;
//! the session drains it after every step, numbers each event, and
//! publishes it on the [`EventBus`] under its [`Topic`].
mod bus;

pub use bus::{Event, EventBus, Topic};
