//! Action resolution.
//!
//! Formula modules ([`hit`], [`damage`], [`heal`]) are pure functions over
//! effective stat values. [`resolve`] and [`targeting`] drive them from the
//! engine: each act of an action derives its targets, resolves against each
//! target in order, and appends one [`CombatLog`] entry per target.

pub mod damage;
mod event;
pub mod heal;
pub mod hit;
mod log;
mod resolve;
mod targeting;

pub use event::CombatEvent;
pub use log::{ActRecord, CombatLog, LogEntry, LogRecord, Window};
pub use resolve::{ActionReport, TargetChoice, TargetRecord};
