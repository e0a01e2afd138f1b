use crate::env::{AiKind, AiProfile};
use crate::registry::ThingId;

/// AI bookkeeping for one usable thing of a character.
///
/// `weight` is the running weight carried between turns. It recovers toward
/// `initial` every time the option is considered and drops to `reset` (plus
/// jitter) when the option is chosen.
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AiOption {
    pub thing: ThingId,
    pub kind: AiKind,
    pub weight: f64,
    pub initial: f64,
    pub reset: f64,
    /// Passed validation on the most recent evaluation.
    pub valid: bool,
}

impl AiOption {
    pub fn new(thing: ThingId, profile: &AiProfile) -> Self {
        Self {
            thing,
            kind: profile.kind,
            weight: profile.initial_weight,
            initial: profile.initial_weight,
            reset: profile.reset_weight,
            valid: false,
        }
    }

    /// Moves the running weight `fraction` of the way back toward `initial`.
    pub fn recover(&mut self, fraction: f64) {
        self.weight += (self.initial - self.weight) * fraction.clamp(0.0, 1.0);
    }
}
