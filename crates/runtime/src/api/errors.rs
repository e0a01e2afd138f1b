//! Unified error types surfaced by the runtime API.
//!
//! Wraps engine, dialogue, content, and controller failures so clients can
//! bubble them up with consistent context.
use skirmish_core::{
    CharacterId, CombatError, DialogueError, ErrorContext, ErrorSeverity, GameError,
};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, RuntimeError>;

#[derive(Debug, Error)]
pub enum RuntimeError {
    #[error(transparent)]
    Combat(#[from] CombatError),

    #[error(transparent)]
    Dialogue(#[from] DialogueError),

    #[error("player controller not set")]
    ControllerNotSet,

    #[error("player controller failed: {0}")]
    Controller(String),

    #[error("session requires content to be configured before building")]
    MissingContent,

    #[error("session requires an encounter to be configured before building")]
    MissingEncounter,

    #[error("unknown encounter `{0}`")]
    UnknownEncounter(String),

    #[error("failed to load content")]
    Content(#[source] anyhow::Error),

    #[error("failed to export combat record")]
    Export(#[source] serde_json::Error),

    #[error("{character} had {attempts} commands rejected in a row")]
    TooManyRejections { character: CharacterId, attempts: u32 },
}

impl RuntimeError {
    /// Whether a player can fix this by choosing again.
    pub fn is_player_error(&self) -> bool {
        matches!(
            self.severity(),
            ErrorSeverity::Recoverable | ErrorSeverity::Validation
        )
    }
}

impl GameError for RuntimeError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Combat(err) => err.severity(),
            Self::Dialogue(err) => err.severity(),
            Self::UnknownEncounter(_) | Self::Content(_) => ErrorSeverity::Fatal,
            Self::ControllerNotSet
            | Self::Controller(_)
            | Self::MissingContent
            | Self::MissingEncounter
            | Self::Export(_)
            | Self::TooManyRejections { .. } => ErrorSeverity::Internal,
        }
    }

    fn context(&self) -> Option<&ErrorContext> {
        match self {
            Self::Combat(err) => err.context(),
            _ => None,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Combat(err) => err.error_code(),
            Self::Dialogue(err) => err.error_code(),
            Self::ControllerNotSet => "CONTROLLER_NOT_SET",
            Self::Controller(_) => "CONTROLLER_FAILED",
            Self::MissingContent => "MISSING_CONTENT",
            Self::MissingEncounter => "MISSING_ENCOUNTER",
            Self::UnknownEncounter(_) => "UNKNOWN_ENCOUNTER",
            Self::Content(_) => "CONTENT_LOAD_FAILED",
            Self::Export(_) => "EXPORT_FAILED",
            Self::TooManyRejections { .. } => "TOO_MANY_REJECTIONS",
        }
    }
}
