use crate::registry::{CharacterId, ThingId};
use crate::state::Team;

/// Where the active turn stands.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TurnPhase {
    /// `begin` has not been called.
    #[default]
    NotStarted,
    /// Between turns; call `next_turn`.
    Idle,
    AwaitingAction,
    AwaitingTarget,
    /// The action resolved; call `end_turn`.
    Resolved,
    Finished,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatOutcome {
    Victory(Team),
    /// Both teams fell together.
    Draw,
}

/// Round and turn bookkeeping.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TurnState {
    pub round: u32,
    /// Turn counter within the round.
    pub turn: u32,
    pub active: Option<CharacterId>,
    pub phase: TurnPhase,
    pub selected: Option<ThingId>,
    pub outcome: Option<CombatOutcome>,
}

impl TurnState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self, id: CharacterId) -> bool {
        self.active == Some(id)
    }
}
