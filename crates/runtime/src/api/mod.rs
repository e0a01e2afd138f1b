//! Public runtime API surface.
//!
//! Re-exports the controller abstraction, the turn snapshot handed to
//! controllers, and the runtime error type.
pub mod controller;
pub mod errors;
pub mod view;

pub use controller::{PassController, PlayerCommand, PlayerController, ScriptedController};
pub use errors::{Result, RuntimeError};
pub use view::{ActionView, CombatantView, TalkView, TurnView};
