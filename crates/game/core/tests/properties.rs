//! Invariants that hold across whole sessions.

mod common;

use common::*;
use skirmish_core::env::{
    Act, ActionTemplate, EquipmentTemplate, Exhaust, ExhaustScope, ExpiryPoint, Slot, ModifierTemplate, PassiveEffect, Remodify, StackScope, Subject,
    TriggerAction, TriggerTemplate,
};
use skirmish_core::{
    Checkpoint, CombatConfig, ContentTables, Element, GrantOutcome, ModifierOrigin, StatKind,
    TargetChoice, Team, TriggerEvent, TurnBegin,
};

fn skirmish_tables() -> ContentTables {
    ContentTables::new()
        .with_equipment("sword", weapon("Sword", skirmish_core::AttackParams {
            damage: 4.0,
            ..Default::default()
        }))
        .with_equipment("claws", weapon("Claws", skirmish_core::AttackParams {
            damage: 3.0,
            element: Some(Element::Toxic),
            ..Default::default()
        }))
        .with_character(
            "knight",
            fighter("Knight", 30.0)
                .with_stat(StatKind::Agility, 5.0)
                .with_weapon("sword"),
        )
        .with_character("rat", fighter("Rat", 12.0).with_weapon("claws"))
        .with_modifier("sick", ModifierTemplate::new("Sick").with_id("sick"))
        .with_status_pool(Element::Toxic, &["sick"])
}

fn ai_session(seed: u64) -> skirmish_core::CombatEngine {
    let mut engine = engine_with(skirmish_tables(), CombatConfig::new(), seed);
    engine.spawn_with("knight", Team::Ally, Some(true)).unwrap();
    engine.spawn_with("rat", Team::Enemy, Some(true)).unwrap();
    engine.spawn_with("rat", Team::Enemy, Some(true)).unwrap();
    engine
}

#[test]
fn same_seed_replays_the_same_session() {
    let mut first = ai_session(42);
    let mut second = ai_session(42);
    run_ai(&mut first, 200);
    run_ai(&mut second, 200);

    assert_eq!(first.drain_events(), second.drain_events());
    assert_eq!(first.world().log.entries(), second.world().log.entries());
    assert_eq!(first.outcome(), second.outcome());
}

#[test]
fn health_stays_clamped_through_a_session() {
    for seed in 0..8 {
        let mut engine = ai_session(seed);
        run_ai(&mut engine, 200);
        for character in engine.world().roster() {
            let max = engine.world().max_health(character.id).unwrap();
            assert!((0..=max).contains(&character.health));
            if character.health == 0 {
                assert!(!character.alive);
            }
        }
    }
}

#[test]
fn effective_stats_are_pure() {
    let mut engine = engine(skirmish_tables());
    let knight = engine.spawn("knight", Team::Ally).unwrap();
    let buff = ModifierTemplate::new("Rallied").with_effect(PassiveEffect::stat(StatKind::Agility, 2.0, 1.5));
    engine
        .grant_modifier(&buff, knight, knight, ModifierOrigin::new("rally"))
        .unwrap();

    let first = engine.stat(knight, StatKind::Agility).unwrap();
    for _ in 0..5 {
        assert_eq!(engine.stat(knight, StatKind::Agility).unwrap(), first);
    }
    // floor((5 + 2) × 1.5)
    assert_eq!(first, 10.0);
}

#[test]
fn global_scope_allows_one_instance() {
    let mark = ModifierTemplate::new("Marked")
        .with_id("mark")
        .one_per_id(StackScope::Global)
        .remodify(Remodify::Fail);
    let mut engine = engine(skirmish_tables());
    let knight = engine.spawn("knight", Team::Ally).unwrap();
    let rat = engine.spawn("rat", Team::Enemy).unwrap();
    let other = engine.spawn("rat", Team::Enemy).unwrap();

    let created = engine.grant_modifier(&mark, rat, knight, ModifierOrigin::new("x")).unwrap();
    assert!(matches!(created, GrantOutcome::Created(_)));
    let refused = engine.grant_modifier(&mark, other, rat, ModifierOrigin::new("x")).unwrap();
    assert_eq!(refused, GrantOutcome::Refused);

    let live = engine.world().modifiers.values().filter(|m| m.source == "mark").count();
    assert_eq!(live, 1);
}

#[test]
fn stacking_folds_new_targets_into_the_existing_instance() {
    let banner = ModifierTemplate::new("Banner")
        .with_id("banner")
        .one_per_c(StackScope::Team);
    let mut engine = engine(skirmish_tables());
    let knight = engine.spawn("knight", Team::Ally).unwrap();
    let squire = engine.spawn("knight", Team::Ally).unwrap();

    let first = engine.grant_modifier(&banner, knight, knight, ModifierOrigin::new("b")).unwrap();
    let second = engine.grant_modifier(&banner, squire, knight, ModifierOrigin::new("b")).unwrap();

    assert_eq!(second, GrantOutcome::Joined(first.modifier().unwrap()));
    assert_eq!(engine.world().modifiers.len(), 1);
    assert!(engine.world().has_modifier_source(squire, "banner"));
}

#[test]
fn expiry_counts_only_go_down() {
    let ward = ModifierTemplate::new("Ward").expires(ExpiryPoint::TurnEnd, 2);
    let mut engine = engine(skirmish_tables());
    let knight = engine.spawn("knight", Team::Ally).unwrap();

    let id = engine
        .grant_modifier(&ward, knight, knight, ModifierOrigin::new("ward"))
        .unwrap()
        .modifier()
        .unwrap();
    assert_eq!(engine.world().modifier(id).unwrap().exp_count, Some(2));

    engine.check_expire(Checkpoint::TurnStart(knight)).unwrap();
    assert_eq!(engine.world().modifier(id).unwrap().exp_count, Some(2));
    engine.check_expire(Checkpoint::TurnEnd(knight)).unwrap();
    assert_eq!(engine.world().modifier(id).unwrap().exp_count, Some(1));

    let removed = engine.check_expire(Checkpoint::TurnEnd(knight)).unwrap();
    assert_eq!(removed, vec![id]);
    assert!(engine.world().modifier(id).is_err());
}

#[test]
fn self_grant_on_own_turn_survives_its_turn_end() {
    let focus = ModifierTemplate::new("Focus").expires(ExpiryPoint::TargetTurnEnd, 1);
    let mut engine = engine(skirmish_tables().with_character("hero", quick("Hero", 30.0)));
    let knight = engine.spawn("hero", Team::Ally).unwrap();
    engine.spawn("rat", Team::Enemy).unwrap();

    assert_eq!(first_turn(&mut engine), knight);
    let id = engine
        .grant_modifier(&focus, knight, knight, ModifierOrigin::new("focus"))
        .unwrap()
        .modifier()
        .unwrap();
    assert_eq!(engine.world().modifier(id).unwrap().exp_count, Some(2));

    engine.pass_turn(knight).unwrap();
    engine.end_turn().unwrap();
    assert_eq!(engine.world().modifier(id).unwrap().exp_count, Some(1));
}

#[test]
fn immune_targets_take_no_damage() {
    let tables = ContentTables::new()
        .with_equipment("torch", weapon("Torch", skirmish_core::AttackParams {
            element: Some(Element::Fire),
            ..sure_hit(20.0)
        }))
        .with_character("hero", quick("Hero", 50.0).with_weapon("torch"))
        .with_character("salamander", {
            let mut template = fighter("Salamander", 50.0);
            template.immune = vec![Element::Fire];
            template
        });
    let mut engine = engine(tables);
    let hero = engine.spawn("hero", Team::Ally).unwrap();
    let salamander = engine.spawn("salamander", Team::Enemy).unwrap();

    first_turn(&mut engine);
    let torch = weapon_of(&engine, hero);
    engine.select_action(hero, torch).unwrap();
    let report = engine
        .select_target(hero, torch, TargetChoice::Character(salamander))
        .unwrap();

    let record = &report.records[0].record;
    assert!(record.success && record.immune);
    assert_eq!(record.amount, 0);
    assert_eq!(health(&engine, salamander), 50);
    assert!(engine.world().character(salamander).unwrap().condition(Element::Fire).is_none());
}

#[test]
fn spawned_instances_are_independent() {
    let mut engine = engine(skirmish_tables());
    let a = engine.spawn("rat", Team::Enemy).unwrap();
    let b = engine.spawn("rat", Team::Enemy).unwrap();

    let haste = ModifierTemplate::new("Haste").with_effect(PassiveEffect::flat(StatKind::Agility, 3.0));
    engine.grant_modifier(&haste, a, a, ModifierOrigin::new("haste")).unwrap();

    let world = engine.world();
    assert_ne!(weapon_of(&engine, a), weapon_of(&engine, b));
    assert_eq!(world.modifiers_on(b).count(), 0);
    assert_eq!(engine.stat(a, StatKind::Agility).unwrap(), 4.0);
    assert_eq!(engine.stat(b, StatKind::Agility).unwrap(), 1.0);
}

#[test]
fn thorns_trigger_exhausts_and_is_removed() {
    let thorns = ModifierTemplate::new("Thorns")
        .with_trigger(
            TriggerTemplate::on([TriggerEvent::AttackSuccessT]).with_action(TriggerAction::Damage {
                amount: 3,
                subject: Subject::Other,
            }),
        )
        .exhausts(1, ExhaustScope::EveryTime);
    let tables = ContentTables::new()
        .with_equipment("sword", weapon("Sword", sure_hit(1.0)))
        .with_character("hero", quick("Hero", 40.0).with_weapon("sword"))
        .with_character("briar", fighter("Briar", 40.0));
    let mut engine = engine(tables);
    let hero = engine.spawn("hero", Team::Ally).unwrap();
    let briar = engine.spawn("briar", Team::Enemy).unwrap();
    let id = engine
        .grant_modifier(&thorns, briar, briar, ModifierOrigin::new("thorns"))
        .unwrap()
        .modifier()
        .unwrap();

    first_turn(&mut engine);
    let sword = weapon_of(&engine, hero);
    engine.select_action(hero, sword).unwrap();
    engine
        .select_target(hero, sword, TargetChoice::Character(briar))
        .unwrap();

    assert_eq!(health(&engine, hero), 37);
    assert!(engine.world().modifier(id).unwrap().exhausted);

    engine.end_turn().unwrap();
    assert!(engine.world().modifier(id).is_err());
}

fn thorns(exhaust: Exhaust) -> ModifierTemplate {
    let mut thorns = ModifierTemplate::new("Thorns").with_trigger(
        TriggerTemplate::on([TriggerEvent::AttackSuccessT]).with_action(TriggerAction::Damage {
            amount: 3,
            subject: Subject::Other,
        }),
    );
    thorns.exhaust = Some(exhaust);
    thorns
}

#[test]
fn once_per_turn_thorns_spend_one_charge_per_turn() {
    let flail = EquipmentTemplate::new("Flail", Slot::Weapon).with_attack(
        ActionTemplate::new("Flail")
            .with_act(Act::attack(sure_hit(1.0)))
            .with_act(Act::attack(sure_hit(1.0))),
    );
    let tables = ContentTables::new()
        .with_equipment("flail", flail)
        .with_character("hero", quick("Hero", 40.0).with_weapon("flail"))
        .with_character("briar", fighter("Briar", 40.0));
    let mut engine = engine(tables);
    let hero = engine.spawn("hero", Team::Ally).unwrap();
    let briar = engine.spawn("briar", Team::Enemy).unwrap();
    let template = thorns(Exhaust {
        count: 2,
        scope: ExhaustScope::OncePerTurn,
        lapse: None,
    });
    let id = engine
        .grant_modifier(&template, briar, briar, ModifierOrigin::new("thorns"))
        .unwrap()
        .modifier()
        .unwrap();

    first_turn(&mut engine);
    let flail = weapon_of(&engine, hero);
    engine.select_action(hero, flail).unwrap();
    engine
        .select_target(hero, flail, TargetChoice::Character(briar))
        .unwrap();

    // Both hits retaliate; only the first costs a charge.
    assert_eq!(health(&engine, hero), 34);
    let modifier = engine.world().modifier(id).unwrap();
    assert_eq!(modifier.exhaust_count, Some(1));
    assert!(!modifier.exhausted);
}

#[test]
fn an_unused_lapse_window_costs_a_charge() {
    let tables = ContentTables::new().with_character("briar", fighter("Briar", 40.0));
    let mut engine = engine(tables);
    let briar = engine.spawn("briar", Team::Enemy).unwrap();
    let template = thorns(Exhaust {
        count: 2,
        scope: ExhaustScope::EveryTime,
        lapse: Some(ExpiryPoint::TurnEnd),
    });
    let id = engine
        .grant_modifier(&template, briar, briar, ModifierOrigin::new("thorns"))
        .unwrap()
        .modifier()
        .unwrap();

    assert!(engine.check_expire(Checkpoint::RoundStart).unwrap().is_empty());
    assert_eq!(engine.world().modifier(id).unwrap().exhaust_count, Some(2));

    assert!(engine.check_expire(Checkpoint::TurnEnd(briar)).unwrap().is_empty());
    assert_eq!(engine.world().modifier(id).unwrap().exhaust_count, Some(1));

    assert_eq!(engine.check_expire(Checkpoint::TurnEnd(briar)).unwrap(), vec![id]);
    assert!(engine.world().modifier(id).is_err());
}

#[test]
fn conditions_hold_after_gaining_then_decay_faster_while_tiered() {
    let tables = ContentTables::new()
        .with_character("hero", quick("Hero", 40.0))
        .with_character("rat", fighter("Rat", 20.0))
        .with_modifier("dazed", ModifierTemplate::new("Dazed").with_id("dazed"))
        .with_status_pool(Element::Phys, &["dazed"]);
    let mut engine = engine(tables);
    engine.spawn("hero", Team::Ally).unwrap();
    let rat = engine.spawn("rat", Team::Enemy).unwrap();

    engine.add_condition(rat, Element::Phys, 6.0).unwrap();
    assert!(engine.world().has_modifier_source(rat, "dazed"));

    let observe = |engine: &skirmish_core::CombatEngine| {
        let rat_state = engine.world().character(rat).unwrap();
        let phys = rat_state.condition(Element::Phys).unwrap();
        (phys.value, phys.tier(), engine.world().has_modifier_source(rat, "dazed"))
    };

    engine.begin().unwrap();
    let mut seen = Vec::new();
    while seen.len() < 2 {
        match engine.next_turn().unwrap() {
            TurnBegin::Act(id) => {
                if id == rat {
                    seen.push(observe(&engine));
                }
                engine.pass_turn(id).unwrap();
                engine.end_turn().unwrap();
            }
            other => panic!("unexpected turn: {other:?}"),
        }
    }

    // First turn start only clears the gain; the second drops 2 and the tier.
    assert_eq!(seen, [(6.0, 1, true), (4.0, 0, false)]);
}

#[test]
fn the_dead_get_a_pro_forma_turn() {
    let tables = ContentTables::new()
        .with_equipment("axe", weapon("Axe", sure_hit(50.0)))
        .with_character("hero", quick("Hero", 40.0).with_weapon("axe"))
        .with_character("ally", fighter("Ally", 40.0))
        .with_character("minion", fighter("Minion", 5.0))
        .with_character("boss", fighter("Boss", 500.0));
    let mut engine = engine(tables);
    let hero = engine.spawn("hero", Team::Ally).unwrap();
    engine.spawn("ally", Team::Ally).unwrap();
    let minion = engine.spawn("minion", Team::Enemy).unwrap();
    engine.spawn("boss", Team::Enemy).unwrap();

    first_turn(&mut engine);
    let axe = weapon_of(&engine, hero);
    engine.select_action(hero, axe).unwrap();
    engine
        .select_target(hero, axe, TargetChoice::Character(minion))
        .unwrap();
    assert_eq!(engine.end_turn().unwrap(), None);

    let mut skipped = false;
    for _ in 0..3 {
        match engine.next_turn().unwrap() {
            TurnBegin::Skipped(id) => {
                assert_eq!(id, minion);
                skipped = true;
                break;
            }
            TurnBegin::Act(id) => {
                engine.pass_turn(id).unwrap();
                engine.end_turn().unwrap();
            }
            TurnBegin::Finished(outcome) => panic!("combat ended early: {outcome:?}"),
        }
    }
    assert!(skipped);
}
