//! Observable events emitted in order for the presentation layer.

use crate::combat::log::ActRecord;
use crate::registry::{CastId, CharacterId, ModifierId, ThingId};
use crate::state::{CombatOutcome, Team};
use crate::stats::Element;

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CombatEvent {
    RoundStarted {
        round: u32,
    },
    TurnStarted {
        character: CharacterId,
        round: u32,
        turn: u32,
    },
    TurnEnded {
        character: CharacterId,
    },
    ActionUsed {
        actor: CharacterId,
        thing: ThingId,
        cast: CastId,
        name: String,
        /// First chosen target, if any.
        target: Option<CharacterId>,
    },
    ActResolved {
        actor: CharacterId,
        target: CharacterId,
        cast: CastId,
        act: usize,
        record: ActRecord,
    },
    /// Flavor text with engine placeholders already filled.
    Narrative {
        text: String,
    },
    ModifierApplied {
        modifier: ModifierId,
        target: CharacterId,
        description: String,
    },
    ModifierRemoved {
        modifier: ModifierId,
        description: String,
    },
    ConditionChanged {
        character: CharacterId,
        element: Element,
        value: f64,
        tier: usize,
    },
    Died {
        character: CharacterId,
        killer: Option<CharacterId>,
    },
    Revived {
        character: CharacterId,
    },
    TeamChanged {
        character: CharacterId,
        team: Team,
    },
    ItemDepleted {
        owner: CharacterId,
        thing: ThingId,
    },
    TurnPassed {
        character: CharacterId,
    },
    CombatEnded {
        outcome: CombatOutcome,
    },
}
