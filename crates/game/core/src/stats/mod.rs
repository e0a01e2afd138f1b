//! Stat resolution.
//!
//! A character stores base values only. Every read goes through
//! [`effective_stat`], which folds in the passive effects of every live
//! modifier targeting the character and every live triggered effect it
//! holds:
//!
//! ```text
//! (base + Σ val) × Π multi → family bounds
//! ```
//!
//! Resolution only reads the world, so it is safe to call at any point,
//! including in the middle of resolving another stat.
pub mod bonus;
pub mod kinds;
mod resolve;

pub use bonus::{Bonus, BonusStack, StatBounds};
pub use kinds::{Affinities, Affinity, Element, ElementSet, StatFamily, StatKind};
pub use resolve::{effective_affinities, effective_stat, stat_sheet, weapon_element};
