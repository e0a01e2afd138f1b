//! Action availability, inventory, and dialogue through the public engine API.

mod common;

use common::*;
use skirmish_core::env::{HealParams, LifeFilter, ModifierTemplate, TargetKind, TopicOutcome};
use skirmish_core::{
    Act, ActionTemplate, CombatError, CombatEvent, ContentTables, DialogueTree, EquipmentTemplate,
    GameError, Narrative, PassiveEffect, Slot, StatKind, TargetChoice, Team, Topic, TurnBegin,
    Unavailable,
};

fn arsenal() -> ContentTables {
    let fireball = ActionTemplate {
        mana_cost: 10,
        ..ActionTemplate::new("Fireball").with_act(Act::attack(sure_hit(5.0)))
    };
    let potion = ActionTemplate::new("Potion")
        .targeting(TargetKind::SelfOnly)
        .with_act(Act::heal(HealParams {
            heal: 5.0,
            ..HealParams::default()
        }));
    let feint = ActionTemplate::new("Feint")
        .with_act(
            Act::attack(skirmish_core::AttackParams {
                accuracy: -1000.0,
                ..sure_hit(1.0)
            })
            .stop_on_miss(),
        )
        .with_act(Act::attack(sure_hit(10.0)));
    let mail = EquipmentTemplate::new("Mail", Slot::Armour).with_passive(
        ModifierTemplate::new("Mail").with_effect(PassiveEffect::flat(StatKind::Fortitude, 4.0)),
    );

    ContentTables::new()
        .with_equipment("stick", weapon("Stick", sure_hit(1.0)))
        .with_equipment("mail", mail)
        .with_action("fireball", fireball)
        .with_action("potion", potion)
        .with_action("feint", feint)
        .with_character(
            "mage",
            quick("Mage", 40.0)
                .with_stat(StatKind::MaxMana, 5.0)
                .with_weapon("stick")
                .with_skill("fireball")
                .with_skill("feint")
                .with_item("potion", Some(1)),
        )
        .with_character("dummy", fighter("Dummy", 40.0))
}

fn owned(engine: &skirmish_core::CombatEngine, id: skirmish_core::CharacterId, name: &str) -> skirmish_core::ThingId {
    let character = engine.world().character(id).unwrap();
    character
        .holdings()
        .find(|thing| engine.world().thing(*thing).unwrap().name == name)
        .unwrap()
}

#[test]
fn insufficient_mana_is_recoverable() {
    let mut engine = engine(arsenal());
    let mage = engine.spawn("mage", Team::Ally).unwrap();
    engine.spawn("dummy", Team::Enemy).unwrap();
    first_turn(&mut engine);

    let fireball = owned(&engine, mage, "Fireball");
    let err = engine.select_action(mage, fireball).unwrap_err();
    assert!(matches!(
        err,
        CombatError::ActionUnavailable {
            reason: Unavailable::InsufficientMana,
            ..
        }
    ));
    assert!(err.severity().is_recoverable());
    assert!(!engine.usable_actions(mage).unwrap().contains(&fireball));
}

#[test]
fn missed_act_halts_the_rest_of_the_cast() {
    let mut engine = engine(arsenal());
    let mage = engine.spawn("mage", Team::Ally).unwrap();
    let dummy = engine.spawn("dummy", Team::Enemy).unwrap();
    first_turn(&mut engine);

    let feint = owned(&engine, mage, "Feint");
    engine.select_action(mage, feint).unwrap();
    let report = engine
        .select_target(mage, feint, TargetChoice::Character(dummy))
        .unwrap();

    assert!(report.halted);
    assert_eq!(report.records.len(), 1);
    assert!(!report.records[0].record.success);
    assert_eq!(health(&engine, dummy), 40);
}

#[test]
fn last_unit_of_an_item_is_destroyed() {
    let mut engine = engine(arsenal());
    let mage = engine.spawn("mage", Team::Ally).unwrap();
    engine.spawn("dummy", Team::Enemy).unwrap();
    first_turn(&mut engine);

    let potion = owned(&engine, mage, "Potion");
    engine.select_action(mage, potion).unwrap();
    engine
        .select_target(mage, potion, TargetChoice::SelfTarget)
        .unwrap();

    assert!(engine.world().thing(potion).is_err());
    assert!(!engine.world().character(mage).unwrap().items.contains(&potion));
    assert!(engine
        .drain_events()
        .contains(&CombatEvent::ItemDepleted { owner: mage, thing: potion }));
}

#[test]
fn equipment_passive_follows_the_wearer() {
    let mut engine = engine(arsenal());
    let mage = engine.spawn("mage", Team::Ally).unwrap();
    let dummy = engine.spawn("dummy", Team::Enemy).unwrap();
    let mail = engine.instantiate_equipment("mail").unwrap();

    assert_eq!(engine.equip(mage, mail).unwrap(), None);
    assert_eq!(engine.stat(mage, StatKind::Fortitude).unwrap(), 5.0);

    let err = engine.equip(dummy, mail).unwrap_err();
    assert!(matches!(err, CombatError::DualOwnership { owner, .. } if owner == mage));

    assert_eq!(engine.unequip(mage, Slot::Armour).unwrap(), Some(mail));
    assert_eq!(engine.stat(mage, StatKind::Fortitude).unwrap(), 1.0);
    assert_eq!(engine.world().thing(mail).unwrap().owner, None);

    engine.equip(dummy, mail).unwrap();
    assert_eq!(engine.stat(dummy, StatKind::Fortitude).unwrap(), 5.0);
}

#[test]
fn a_sure_join_topic_switches_sides() {
    let mut parley = Topic::new("parley", Narrative::line("{actor} offers terms to {target}."));
    parley.sentiment_delta = 1;
    parley.outcome = TopicOutcome::Join {
        base: 1.0,
        per_point: 0.0,
    };
    let tables = arsenal()
        .with_dialogue("bandit", DialogueTree { topics: vec![parley] })
        .with_character("bandit", {
            let mut template = fighter("Bandit", 20.0);
            template.dialogue = Some("bandit".into());
            template
        });
    let mut engine = engine(tables);
    let mage = engine.spawn("mage", Team::Ally).unwrap();
    let bandit = engine.spawn("bandit", Team::Enemy).unwrap();

    let topics = engine.available_topics(bandit, mage).unwrap();
    assert_eq!(topics.len(), 1);

    let result = engine.choose_topic(bandit, mage, "parley").unwrap();
    assert_eq!(result.sentiment, 1);
    assert_eq!(result.joined, Some(true));

    let bandit_state = engine.world().character(bandit).unwrap();
    assert_eq!(bandit_state.team, Team::Ally);
    assert!(bandit_state.ai_controlled);
    let events = engine.drain_events();
    assert!(events.contains(&CombatEvent::Narrative {
        text: "Mage offers terms to Bandit.".into()
    }));
    assert!(events.contains(&CombatEvent::TeamChanged {
        character: bandit,
        team: Team::Ally
    }));
}

#[test]
fn acting_out_of_turn_is_rejected() {
    let mut engine = engine(arsenal());
    let mage = engine.spawn("mage", Team::Ally).unwrap();
    let dummy = engine.spawn("dummy", Team::Enemy).unwrap();
    first_turn(&mut engine);

    let stick = weapon_of(&engine, mage);
    let err = engine.select_action(dummy, stick).unwrap_err();
    assert_eq!(err.error_code(), "NOT_YOUR_TURN");
    assert_eq!(err.context().and_then(|c| c.actor), Some(dummy));

    let err = engine.end_turn().unwrap_err();
    assert!(matches!(err, CombatError::WrongPhase { .. }));
    engine.pass_turn(mage).unwrap();
    engine.end_turn().unwrap();
}

#[test]
fn items_cannot_be_claimed_twice() {
    let mut engine = engine(arsenal());
    let mage = engine.spawn("mage", Team::Ally).unwrap();
    let dummy = engine.spawn("dummy", Team::Enemy).unwrap();
    let potion = owned(&engine, mage, "Potion");

    let err = engine.give_item(dummy, potion).unwrap_err();
    assert!(matches!(
        err,
        CombatError::DualOwnership { owner, claimant, .. } if owner == mage && claimant == dummy
    ));
    assert!(engine.world().character(dummy).unwrap().items.is_empty());

    engine.take_item(mage, potion).unwrap();
    engine.give_item(dummy, potion).unwrap();
    assert_eq!(engine.world().thing(potion).unwrap().owner, Some(dummy));
    assert!(engine.world().character(dummy).unwrap().items.contains(&potion));
}

#[test]
fn equipped_things_are_not_also_carried() {
    let mut engine = engine(arsenal());
    let mage = engine.spawn("mage", Team::Ally).unwrap();
    let stick = weapon_of(&engine, mage);

    let err = engine.give_item(mage, stick).unwrap_err();
    assert!(matches!(err, CombatError::AlreadyEquipped { thing, .. } if thing == stick));
    let mage_state = engine.world().character(mage).unwrap();
    assert_eq!(mage_state.weapon, Some(stick));
    assert!(!mage_state.items.contains(&stick));
}

#[test]
fn usage_limit_locks_the_action() {
    let bolt = ActionTemplate {
        usage_limit: Some(1),
        ..ActionTemplate::new("Bolt").with_act(Act::attack(sure_hit(2.0)))
    };
    let tables = arsenal()
        .with_action("bolt", bolt)
        .with_character("adept", quick("Adept", 40.0).with_weapon("stick").with_skill("bolt"));
    let mut engine = engine(tables);
    let adept = engine.spawn("adept", Team::Ally).unwrap();
    let dummy = engine.spawn("dummy", Team::Enemy).unwrap();
    first_turn(&mut engine);

    let bolt = owned(&engine, adept, "Bolt");
    engine.select_action(adept, bolt).unwrap();
    engine
        .select_target(adept, bolt, TargetChoice::Character(dummy))
        .unwrap();
    assert_eq!(health(&engine, dummy), 38);

    let err = engine.check_usable(adept, bolt).unwrap_err();
    assert!(matches!(
        err,
        CombatError::ActionUnavailable {
            reason: Unavailable::UsageLimitReached,
            ..
        }
    ));
    let usable = engine.usable_actions(adept).unwrap();
    assert!(!usable.contains(&bolt));
    assert!(usable.contains(&weapon_of(&engine, adept)));
}

#[test]
fn a_reviving_heal_raises_the_fallen() {
    let smite = ActionTemplate::new("Smite")
        .targeting(TargetKind::Single)
        .with_act(Act::attack(sure_hit(50.0)));
    let raise = ActionTemplate::new("Raise")
        .targeting(TargetKind::SingleAlly)
        .with_act(
            Act::heal(HealParams {
                heal: 10.0,
                revive: true,
                ..HealParams::default()
            })
            .with_life(LifeFilter::Dead),
        );
    let tables = arsenal()
        .with_action("smite", smite)
        .with_action("raise", raise)
        .with_character(
            "medic",
            quick("Medic", 40.0)
                .with_weapon("stick")
                .with_skill("smite")
                .with_skill("raise"),
        )
        .with_character("squire", fighter("Squire", 30.0));
    let mut engine = engine(tables);
    let medic = engine.spawn("medic", Team::Ally).unwrap();
    let squire = engine.spawn("squire", Team::Ally).unwrap();
    engine.spawn("dummy", Team::Enemy).unwrap();

    assert_eq!(first_turn(&mut engine), medic);
    let smite = owned(&engine, medic, "Smite");
    engine.select_action(medic, smite).unwrap();
    engine
        .select_target(medic, smite, TargetChoice::Character(squire))
        .unwrap();
    engine.end_turn().unwrap();
    assert!(!engine.world().character(squire).unwrap().alive);

    loop {
        match engine.next_turn().unwrap() {
            TurnBegin::Act(id) if id == medic => break,
            TurnBegin::Act(id) => {
                engine.pass_turn(id).unwrap();
                engine.end_turn().unwrap();
            }
            TurnBegin::Skipped(_) => {}
            TurnBegin::Finished(outcome) => panic!("combat ended early: {outcome:?}"),
        }
    }

    let raise = owned(&engine, medic, "Raise");
    assert_eq!(engine.valid_targets_for(medic, raise).unwrap(), vec![squire]);
    engine.select_action(medic, raise).unwrap();
    engine
        .select_target(medic, raise, TargetChoice::Character(squire))
        .unwrap();

    let squire_state = engine.world().character(squire).unwrap();
    assert!(squire_state.alive);
    assert_eq!(squire_state.health, 10);
    assert!(engine
        .drain_events()
        .contains(&CombatEvent::Revived { character: squire }));
}
