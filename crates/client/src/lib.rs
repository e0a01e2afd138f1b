//! Terminal front end for the skirmish combat engine.
//!
//! - [`input`] reads player commands from stdin
//! - [`render`] turns engine events into text, including pronoun tables
//! - [`logging`] installs the tracing subscriber
pub mod input;
pub mod logging;
pub mod render;

pub use input::{StdinController, parse_command};
pub use logging::LogTarget;
pub use render::{Narrator, Pronouns, fill_pronouns, session_outcome, turn_menu};
