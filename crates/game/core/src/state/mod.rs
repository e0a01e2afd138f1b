//! Authoritative combat state.
//!
//! [`World`] is the arena that owns every simulation object. Objects refer to
//! each other through registry handles, and every "find by id" is a map
//! lookup on the world. Callers outside the engine receive `&World` only;
//! mutation flows through [`crate::engine::CombatEngine`].
mod character;
mod memory;
mod modifier;
mod thing;
mod turn;

pub use character::{Character, ConditionState, Team};
pub use memory::Memory;
pub use modifier::{LiveEffect, Modifier, Targets};
pub use thing::{Thing, ThingKind};
pub use turn::{CombatOutcome, TurnPhase, TurnState};

use std::collections::BTreeMap;

use crate::combat::{CombatEvent, CombatLog, LogEntry, LogRecord};
use crate::config::CombatConfig;
use crate::env::CombatRng;
use crate::error::CombatError;
use crate::registry::{CastId, CharacterId, EffectId, ModifierId, Registry, ThingId};
use crate::stats::{self, StatKind};

pub struct World {
    pub registry: Registry,
    pub characters: BTreeMap<CharacterId, Character>,
    pub things: BTreeMap<ThingId, Thing>,
    pub modifiers: BTreeMap<ModifierId, Modifier>,
    pub effects: BTreeMap<EffectId, LiveEffect>,
    pub log: CombatLog,
    pub turn: TurnState,
    pub rng: CombatRng,
    pub config: CombatConfig,
    /// Outbox drained by the runtime.
    pub events: Vec<CombatEvent>,
}

impl World {
    pub fn new(config: CombatConfig, seed: u64) -> Self {
        Self {
            registry: Registry::new(),
            characters: BTreeMap::new(),
            things: BTreeMap::new(),
            modifiers: BTreeMap::new(),
            effects: BTreeMap::new(),
            log: CombatLog::new(),
            turn: TurnState::new(),
            rng: CombatRng::new(seed),
            config,
            events: Vec::new(),
        }
    }

    // ===== lookups =====

    pub fn character(&self, id: CharacterId) -> Result<&Character, CombatError> {
        self.characters
            .get(&id)
            .ok_or(CombatError::UnknownCharacter(id))
    }

    pub fn character_mut(&mut self, id: CharacterId) -> Result<&mut Character, CombatError> {
        self.characters
            .get_mut(&id)
            .ok_or(CombatError::UnknownCharacter(id))
    }

    pub fn thing(&self, id: ThingId) -> Result<&Thing, CombatError> {
        self.things.get(&id).ok_or(CombatError::UnknownThing(id))
    }

    pub fn thing_mut(&mut self, id: ThingId) -> Result<&mut Thing, CombatError> {
        self.things.get_mut(&id).ok_or(CombatError::UnknownThing(id))
    }

    pub fn modifier(&self, id: ModifierId) -> Result<&Modifier, CombatError> {
        self.modifiers
            .get(&id)
            .ok_or(CombatError::UnknownModifier(id))
    }

    pub fn modifier_mut(&mut self, id: ModifierId) -> Result<&mut Modifier, CombatError> {
        self.modifiers
            .get_mut(&id)
            .ok_or(CombatError::UnknownModifier(id))
    }

    // ===== roster =====

    pub fn in_combat(&self, id: CharacterId) -> bool {
        self.characters.contains_key(&id)
    }

    pub fn roster(&self) -> impl Iterator<Item = &Character> {
        self.characters.values()
    }

    pub fn team(&self, team: Team) -> impl Iterator<Item = &Character> {
        self.characters.values().filter(move |c| c.team == team)
    }

    pub fn living(&self, team: Team) -> impl Iterator<Item = &Character> {
        self.team(team).filter(|c| c.alive)
    }

    /// Modifiers whose target list includes `id`.
    pub fn modifiers_on(&self, id: CharacterId) -> impl Iterator<Item = &Modifier> {
        self.modifiers
            .values()
            .filter(move |m| m.targets.includes(id))
    }

    /// Whether `id` carries a modifier with the given source id.
    pub fn has_modifier_source(&self, id: CharacterId, source: &str) -> bool {
        self.modifiers_on(id).any(|m| m.source == source)
    }

    // ===== derived values =====

    pub fn stat(&self, id: CharacterId, stat: StatKind) -> Result<f64, CombatError> {
        stats::effective_stat(self, id, stat)
    }

    /// Effective max health, never below 1.
    pub fn max_health(&self, id: CharacterId) -> Result<i64, CombatError> {
        Ok((self.stat(id, StatKind::MaxHealth)?.floor() as i64).max(1))
    }

    pub fn max_mana(&self, id: CharacterId) -> Result<i64, CombatError> {
        Ok((self.stat(id, StatKind::MaxMana)?.floor() as i64).max(0))
    }

    pub fn health_fraction(&self, id: CharacterId) -> Result<f64, CombatError> {
        let health = self.character(id)?.health as f64;
        Ok(health / self.max_health(id)? as f64)
    }

    // ===== log and events =====

    pub fn record(
        &mut self,
        actor: CharacterId,
        target: Option<CharacterId>,
        cast: Option<CastId>,
        act: Option<usize>,
        record: LogRecord,
    ) {
        self.log.push(LogEntry {
            round: self.turn.round,
            turn: self.turn.turn,
            actor,
            target,
            cast,
            act,
            record,
        });
    }

    pub fn emit(&mut self, event: CombatEvent) {
        self.events.push(event);
    }

    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        std::mem::take(&mut self.events)
    }
}
