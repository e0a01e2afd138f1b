//! Common error infrastructure for skirmish-core.
//!
//! Every subsystem error implements [`GameError`], which classifies it by
//! [`ErrorSeverity`]:
//!
//! - malformed content (unknown template id, empty action) is **Fatal**
//! - broken invariants (dual ownership, an AI with no options) are **Internal**
//! - caller mistakes (wrong turn, unknown handle) are **Validation**
//! - expected empty results (no valid targets, not enough mana) are
//!   **Recoverable**: the session continues and the caller picks again

use crate::registry::{CharacterId, ModifierId, ThingId};
use crate::state::TurnPhase;

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorSeverity {
    /// Recoverable error - retry with an alternative action or target.
    Recoverable,

    /// Validation error - invalid input, should not retry without changes.
    Validation,

    /// Internal error - an engine or content invariant was broken.
    Internal,

    /// Fatal error - content cannot be reasoned about, the session must stop.
    Fatal,
}

impl ErrorSeverity {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Internal and fatal errors both halt the operation.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Where in the session an error was raised.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ErrorContext {
    pub round: u32,
    pub turn: u32,
    pub actor: Option<CharacterId>,
    pub message: Option<&'static str>,
}

impl ErrorContext {
    #[must_use]
    pub const fn new(round: u32, turn: u32) -> Self {
        Self {
            round,
            turn,
            actor: None,
            message: None,
        }
    }

    #[must_use]
    pub const fn with_actor(mut self, actor: CharacterId) -> Self {
        self.actor = Some(actor);
        self
    }

    #[must_use]
    pub const fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

/// Common trait for all skirmish-core errors.
pub trait GameError: core::fmt::Display + core::fmt::Debug {
    fn severity(&self) -> ErrorSeverity;

    fn context(&self) -> Option<&ErrorContext> {
        None
    }

    /// Static identifier for this error variant.
    fn error_code(&self) -> &'static str {
        core::any::type_name::<Self>()
    }
}

/// Kind of content table an id was looked up in.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TemplateKind {
    Character,
    Equipment,
    Action,
    Modifier,
    Dialogue,
}

/// Why an owned action cannot be used right now.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "snake_case")]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Unavailable {
    NotOwned,
    NotAnAction,
    InsufficientMana,
    UsageLimitReached,
    OutOfStock,
}

/// Errors raised by the combat engine.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum CombatError {
    #[error("unknown {kind} template `{id}`")]
    UnknownTemplate { kind: TemplateKind, id: String },

    #[error("{kind} template `{id}` is malformed: {reason}")]
    MalformedTemplate {
        kind: TemplateKind,
        id: String,
        reason: &'static str,
    },

    #[error("unknown character {0}")]
    UnknownCharacter(CharacterId),

    #[error("unknown thing {0}")]
    UnknownThing(ThingId),

    #[error("unknown modifier {0}")]
    UnknownModifier(ModifierId),

    #[error("{thing} is owned by {owner} and cannot also be given to {claimant}")]
    DualOwnership {
        thing: ThingId,
        owner: CharacterId,
        claimant: CharacterId,
    },

    #[error("{thing} is already equipped by {character}")]
    AlreadyEquipped { thing: ThingId, character: CharacterId },

    #[error("{0} has no AI options at all")]
    NoAiOptions(CharacterId),

    #[error("no valid targets for {action} used by {actor}")]
    NoValidTargets { actor: CharacterId, action: String },

    #[error("{target} is not a valid target for {action}")]
    InvalidTarget { target: CharacterId, action: String },

    #[error("{thing} cannot be used by {actor}: {reason}")]
    ActionUnavailable {
        actor: CharacterId,
        thing: ThingId,
        reason: Unavailable,
    },

    #[error("{0} is not equipment")]
    NotEquipment(ThingId),

    #[error("it is not {actor}'s turn")]
    NotYourTurn {
        actor: CharacterId,
        context: ErrorContext,
    },

    #[error("expected turn phase {expected:?}, found {actual:?}")]
    WrongPhase {
        expected: TurnPhase,
        actual: TurnPhase,
    },

    #[error("no action selected for {0}")]
    NoActionSelected(CharacterId),

    #[error("combat has already finished")]
    CombatFinished,

    #[error("combat has no combatants")]
    EmptyRoster,
}

impl GameError for CombatError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownTemplate { .. } | Self::MalformedTemplate { .. } => ErrorSeverity::Fatal,
            Self::UnknownModifier(_)
            | Self::DualOwnership { .. }
            | Self::AlreadyEquipped { .. }
            | Self::NoAiOptions(_)
            | Self::EmptyRoster => ErrorSeverity::Internal,
            Self::UnknownCharacter(_)
            | Self::UnknownThing(_)
            | Self::InvalidTarget { .. }
            | Self::NotEquipment(_)
            | Self::NotYourTurn { .. }
            | Self::WrongPhase { .. }
            | Self::NoActionSelected(_)
            | Self::CombatFinished => ErrorSeverity::Validation,
            Self::NoValidTargets { .. } | Self::ActionUnavailable { .. } => {
                ErrorSeverity::Recoverable
            }
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::NotYourTurn { context, .. } => Some(context),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownTemplate { .. } => "UNKNOWN_TEMPLATE",
            Self::MalformedTemplate { .. } => "MALFORMED_TEMPLATE",
            Self::UnknownCharacter(_) => "UNKNOWN_CHARACTER",
            Self::UnknownThing(_) => "UNKNOWN_THING",
            Self::UnknownModifier(_) => "UNKNOWN_MODIFIER",
            Self::DualOwnership { .. } => "DUAL_OWNERSHIP",
            Self::AlreadyEquipped { .. } => "ALREADY_EQUIPPED",
            Self::NoAiOptions(_) => "NO_AI_OPTIONS",
            Self::NoValidTargets { .. } => "NO_VALID_TARGETS",
            Self::InvalidTarget { .. } => "INVALID_TARGET",
            Self::ActionUnavailable { .. } => "ACTION_UNAVAILABLE",
            Self::NotEquipment(_) => "NOT_EQUIPMENT",
            Self::NotYourTurn { .. } => "NOT_YOUR_TURN",
            Self::WrongPhase { .. } => "WRONG_PHASE",
            Self::NoActionSelected(_) => "NO_ACTION_SELECTED",
            Self::CombatFinished => "COMBAT_FINISHED",
            Self::EmptyRoster => "EMPTY_ROSTER",
        }
    }
}

impl CombatError {
    pub fn unknown(kind: TemplateKind, id: impl Into<String>) -> Self {
        Self::UnknownTemplate {
            kind,
            id: id.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn taxonomy_maps_to_severity() {
        assert_eq!(
            CombatError::unknown(TemplateKind::Action, "fireball").severity(),
            ErrorSeverity::Fatal
        );
        assert!(CombatError::NoAiOptions(CharacterId(1)).severity().is_internal());
        assert!(
            CombatError::NoValidTargets {
                actor: CharacterId(1),
                action: "heal".into(),
            }
            .severity()
            .is_recoverable()
        );
    }
}
