//! Shared fixtures for the combat integration tests.
#![allow(dead_code)]

use std::sync::Arc;

use skirmish_core::env::{Act, ActionTemplate, AttackParams, EquipmentTemplate, Slot};
use skirmish_core::{
    CharacterId, CharacterTemplate, CombatConfig, CombatEngine, ContentTables, StatKind, ThingId,
    TurnBegin,
};

pub const SEED: u64 = 0x5eed;

/// An engine over `tables` with the damage roll disabled.
pub fn engine(tables: ContentTables) -> CombatEngine {
    engine_with(tables, CombatConfig::new().without_variance(), SEED)
}

pub fn engine_with(tables: ContentTables, config: CombatConfig, seed: u64) -> CombatEngine {
    CombatEngine::new(Arc::new(tables), config, seed)
}

/// Attack params that never miss and never crit.
pub fn sure_hit(damage: f64) -> AttackParams {
    AttackParams {
        accuracy: 1000.0,
        damage,
        crit: 0.0,
        ..AttackParams::default()
    }
}

pub fn weapon(name: &str, params: AttackParams) -> EquipmentTemplate {
    EquipmentTemplate::new(name, Slot::Weapon)
        .with_attack(ActionTemplate::new(name).with_act(Act::attack(params)))
}

/// A player-controlled combatant.
pub fn fighter(name: &str, max_health: f64) -> CharacterTemplate {
    CharacterTemplate::new(name)
        .with_stat(StatKind::MaxHealth, max_health)
        .player()
}

/// A fighter guaranteed to act first.
pub fn quick(name: &str, max_health: f64) -> CharacterTemplate {
    fighter(name, max_health).with_stat(StatKind::Agility, 100.0)
}

/// Starts the combat and returns whoever acts first.
pub fn first_turn(engine: &mut CombatEngine) -> CharacterId {
    engine.begin().unwrap();
    match engine.next_turn().unwrap() {
        TurnBegin::Act(id) => id,
        other => panic!("expected a turn, got {other:?}"),
    }
}

pub fn weapon_of(engine: &CombatEngine, id: CharacterId) -> ThingId {
    engine.world().character(id).unwrap().weapon.unwrap()
}

pub fn health(engine: &CombatEngine, id: CharacterId) -> i64 {
    engine.world().character(id).unwrap().health
}

/// Drives an all-AI combat until it ends or `max_turns` pass.
pub fn run_ai(engine: &mut CombatEngine, max_turns: usize) {
    engine.begin().unwrap();
    for _ in 0..max_turns {
        match engine.next_turn().unwrap() {
            TurnBegin::Finished(_) => return,
            TurnBegin::Skipped(_) => continue,
            TurnBegin::Act(id) => {
                engine.take_ai_turn(id).unwrap();
                if engine.end_turn().unwrap().is_some() {
                    return;
                }
            }
        }
    }
}
