use std::path::Path;
use std::sync::Arc;

use skirmish_content::Encounter;
use skirmish_core::env::{Act, ActionTemplate, AttackParams, DialogueTree, EquipmentTemplate, Slot, Topic as DialogueTopic, TopicOutcome};
use skirmish_core::state::Memory;
use skirmish_core::{
    Affinity, CharacterTemplate, CombatEvent, CombatOutcome, ContentTables, Element, Narrative, StatKind,
    TargetChoice, Team,
};
use skirmish_runtime::{
    PassController, PlayerCommand, RuntimeConfig, RuntimeError, ScriptedController, Session,
    SessionBuilder, SessionOutcome, Topic,
};

fn sure_hit(damage: f64) -> AttackParams {
    AttackParams {
        accuracy: 1000.0,
        damage,
        crit: 0.0,
        ..AttackParams::default()
    }
}

fn duel_tables() -> ContentTables {
    let sword = EquipmentTemplate::new("Sword", Slot::Weapon)
        .with_attack(ActionTemplate::new("Sword").with_act(Act::attack(sure_hit(20.0))));
    let mut parley = DialogueTopic::new("parley", Narrative::line("{actor} talks {target} down."));
    parley.outcome = TopicOutcome::Join {
        base: 1.0,
        per_point: 0.0,
    };

    ContentTables::new()
        .with_equipment("sword", sword)
        .with_dialogue("bandit", DialogueTree { topics: vec![parley] })
        .with_character(
            "hero",
            CharacterTemplate::new("Hero")
                .with_stat(StatKind::MaxHealth, 30.0)
                .with_stat(StatKind::Agility, 100.0)
                .with_weapon("sword")
                .player(),
        )
        .with_character(
            "bandit",
            CharacterTemplate {
                dialogue: Some("bandit".into()),
                ..CharacterTemplate::new("Bandit")
                    .with_stat(StatKind::MaxHealth, 15.0)
                    .with_weapon("sword")
            },
        )
        .with_character(
            "statue",
            CharacterTemplate::new("Statue")
                .with_stat(StatKind::MaxHealth, 15.0)
                .player(),
        )
}

fn duel(enemy: &str) -> SessionBuilder {
    Session::builder()
        .content(Arc::new(duel_tables()))
        .encounter(Encounter::new(["hero"], [enemy]))
}

fn hero_and_foe(session: &Session) -> (skirmish_core::CharacterId, skirmish_core::CharacterId) {
    let world = session.engine().world();
    let hero = world.team(Team::Ally).next().unwrap().id;
    let foe = world.team(Team::Enemy).next().unwrap().id;
    (hero, foe)
}

fn shipped_config() -> RuntimeConfig {
    RuntimeConfig {
        content_dir: Path::new(env!("CARGO_MANIFEST_DIR")).join("../game/content/data"),
        ..RuntimeConfig::default()
    }
    .ai_only()
    .with_seed(11)
}

#[tokio::test]
async fn scripted_player_wins_the_duel() {
    let mut session = duel("bandit").build().unwrap();
    let (hero, bandit) = hero_and_foe(&session);
    let sword = session.engine().world().character(hero).unwrap().weapon.unwrap();

    let script = ScriptedController::new([PlayerCommand::Use {
        thing: sword,
        target: TargetChoice::Character(bandit),
    }]);
    let mut session = duel("bandit").controller(Arc::new(script)).build().unwrap();

    let outcome = session.run().await.unwrap();
    assert_eq!(outcome, SessionOutcome::Decided(CombatOutcome::Victory(Team::Ally)));
    assert!(session
        .history()
        .iter()
        .any(|e| e.event == CombatEvent::Died { character: bandit, killer: Some(hero) }));
}

#[tokio::test]
async fn rejected_commands_are_retried() {
    let session = duel("bandit").build().unwrap();
    let (hero, bandit) = hero_and_foe(&session);
    let sword = session.engine().world().character(hero).unwrap().weapon.unwrap();

    let script = Arc::new(ScriptedController::new([
        PlayerCommand::Use {
            thing: sword,
            target: TargetChoice::Character(hero),
        },
        PlayerCommand::Use {
            thing: sword,
            target: TargetChoice::Character(bandit),
        },
    ]));
    let mut session = duel("bandit").controller(script.clone()).build().unwrap();
    session.step().await.unwrap();

    assert_eq!(script.rejections().await, vec!["INVALID_TARGET"]);
    assert_eq!(script.remaining().await, 0);
    assert_eq!(session.engine().world().character(bandit).unwrap().health, 0);
}

#[tokio::test]
async fn talking_an_enemy_over_ends_the_fight() {
    let session = duel("bandit").build().unwrap();
    let (_, bandit) = hero_and_foe(&session);

    let script = ScriptedController::new([PlayerCommand::Talk {
        listener: bandit,
        topic: "parley".into(),
    }]);
    let mut session = duel("bandit").controller(Arc::new(script)).build().unwrap();

    let outcome = session.run().await.unwrap();
    assert_eq!(outcome, SessionOutcome::Decided(CombatOutcome::Victory(Team::Ally)));
    assert!(session.history().iter().any(|e| e.event
        == CombatEvent::TeamChanged {
            character: bandit,
            team: Team::Ally
        }));
}

#[tokio::test]
async fn player_turn_without_controller_fails() {
    let mut session = duel("bandit").build().unwrap();
    let err = session.step().await.unwrap_err();
    assert!(matches!(err, RuntimeError::ControllerNotSet));

    let (hero, _) = hero_and_foe(&session);
    let history = session.history();
    assert!(history.iter().any(|e| e.event == CombatEvent::RoundStarted { round: 1 }));
    assert!(history.iter().any(
        |e| matches!(e.event, CombatEvent::TurnStarted { character, .. } if character == hero)
    ));
}

#[test]
fn learned_affinities_survive_serialization() {
    let mut memory = Memory::default();
    memory.observe(Element::Fire, Affinity::Weak);
    memory.observe(Element::Holy, Affinity::Immune);
    memory.sentiment = 2;

    let json = serde_json::to_string(&memory).unwrap();
    let restored: Memory = serde_json::from_str(&json).unwrap();
    assert_eq!(restored, memory);
    assert_eq!(restored.recall(Element::Fire), Some(Affinity::Weak));
    assert_eq!(restored.recall(Element::Holy), Some(Affinity::Immune));
}

#[tokio::test]
async fn passive_players_hit_the_round_cap() {
    let mut session = duel("statue")
        .config(RuntimeConfig::default().with_max_rounds(3))
        .controller(Arc::new(PassController))
        .build()
        .unwrap();

    let outcome = session.run().await.unwrap();
    assert_eq!(outcome, SessionOutcome::Stalemate { rounds: 3 });
    assert_eq!(session.engine().round(), 3);
}

#[tokio::test]
async fn subscribers_receive_published_events() {
    let mut session = duel("statue")
        .config(RuntimeConfig::default().with_max_rounds(1))
        .controller(Arc::new(PassController))
        .build()
        .unwrap();
    let mut turns = session.subscribe(Topic::Turn);

    session.step().await.unwrap();

    let first = turns.try_recv().unwrap();
    assert_eq!(first.event, CombatEvent::RoundStarted { round: 1 });
    assert_eq!(first.topic(), Topic::Turn);
}

#[tokio::test]
async fn same_seed_replays_the_shipped_encounter() {
    let mut first = SessionBuilder::from_content_dir(shipped_config()).unwrap().build().unwrap();
    let mut second = SessionBuilder::from_content_dir(shipped_config()).unwrap().build().unwrap();

    let a = first.run().await.unwrap();
    let b = second.run().await.unwrap();

    assert_eq!(a, b);
    assert_eq!(first.history(), second.history());
    assert_eq!(first.export_json().unwrap(), second.export_json().unwrap());
}

#[tokio::test]
async fn export_is_valid_json() {
    let mut session = SessionBuilder::from_content_dir(shipped_config()).unwrap().build().unwrap();
    session.run().await.unwrap();

    let value: serde_json::Value = serde_json::from_str(&session.export_json().unwrap()).unwrap();
    assert_eq!(value["seed"], 11);
    assert!(!value["log"].as_array().unwrap().is_empty());
    assert_eq!(
        value["events"].as_array().unwrap().len(),
        session.history().len()
    );
}

#[test]
fn unknown_encounter_is_fatal() {
    let config = RuntimeConfig {
        encounter: "nowhere".into(),
        ..shipped_config()
    };
    let err = SessionBuilder::from_content_dir(config).err().unwrap();
    assert!(matches!(err, RuntimeError::UnknownEncounter(id) if id == "nowhere"));
}
