//! Deterministic turn-based combat rules.
//!
//! `skirmish-core` owns the canonical combat model: the entity registry and
//! world arena, stat resolution, modifiers and triggered effects, elemental
//! conditions, action resolution, the round/turn state machine, the AI, and
//! dialogue gating. It performs no I/O. All state mutation flows through
//! [`CombatEngine`]; content arrives through a [`ContentOracle`] and
//! observable output leaves as [`CombatEvent`]s.
pub mod ai;
pub mod combat;
pub mod condition;
pub mod config;
pub mod dialogue;
pub mod engine;
pub mod env;
pub mod error;
pub mod modifier;
pub mod registry;
pub mod state;
pub mod stats;

pub use ai::{AiDecision, AiOption};
pub use combat::{ActRecord, ActionReport, CombatEvent, CombatLog, LogEntry, LogRecord, TargetChoice, TargetRecord};
pub use config::CombatConfig;
pub use dialogue::{DialogueError, TopicResult};
pub use engine::{CombatEngine, TurnBegin};
pub use env::{
    Act, ActTarget, ActionTemplate, AiKind, AiProfile, AttackParams, CharacterTemplate, CombatRng,
    ContentOracle, ContentOracleExt, ContentTables, DialogueTree, EquipmentTemplate, Gender,
    HealParams, ModifierTemplate, Narrative, PassiveEffect, Slot, TargetKind, Topic,
    TriggerEvent, TriggerTemplate,
};
pub use error::{CombatError, ErrorContext, ErrorSeverity, GameError, TemplateKind, Unavailable};
pub use modifier::{Checkpoint, GrantOutcome, ModifierOrigin, TriggerContext};
pub use registry::{CastId, CharacterId, EffectId, ModifierId, Registry, ThingId};
pub use state::{Character, CombatOutcome, Modifier, Team, Thing, ThingKind, TurnPhase, World};
pub use stats::{Affinity, Element, ElementSet, StatKind};
