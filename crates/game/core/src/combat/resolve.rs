//! Action resolution: validation, cost, and the per-act/per-target loop.

use tracing::{debug, info};

use super::damage::{DamageInputs, affinity_multiplier, base_damage, final_damage};
use super::heal::{HealInputs, heal_amount};
use super::hit::{HitInputs, check_roll, crit_chance, hit_chance};
use super::log::{ActRecord, LogRecord};
use super::CombatEvent;
use crate::engine::CombatEngine;
use crate::env::{
    Act, ActKind, ActTag, ActionTemplate, AttackParams, ContentOracleExt, EffectDuration,
    HealParams, ModifyParams, NarrativeVars, Slot, TriggerEvent,
};
use crate::error::{CombatError, Unavailable};
use crate::modifier::{GrantOutcome, ModifierOrigin, TriggerContext};
use crate::registry::{CastId, CharacterId, ThingId};
use crate::state::Team;
use crate::stats::{Affinity, Element, StatKind, effective_affinities, weapon_element};

/// Target supplied with an action selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TargetChoice {
    Character(CharacterId),
    /// A whole team; only meaningful for team-wide actions.
    Team(Team),
    SelfTarget,
    Everyone,
}

/// One act resolved against one target.
#[derive(Clone, Debug, PartialEq)]
pub struct TargetRecord {
    pub act: usize,
    pub target: CharacterId,
    pub record: ActRecord,
}

/// Summary of a resolved action.
#[derive(Clone, Debug, PartialEq)]
pub struct ActionReport {
    pub actor: CharacterId,
    pub thing: ThingId,
    pub cast: CastId,
    pub name: String,
    pub records: Vec<TargetRecord>,
    /// A stop-on-miss act missed and the remaining acts were skipped.
    pub halted: bool,
}

impl ActionReport {
    pub fn damage_dealt(&self) -> i64 {
        self.records
            .iter()
            .filter(|r| r.record.kind == Some(ActTag::Attack))
            .map(|r| r.record.amount)
            .sum()
    }

    pub fn kills(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.records.iter().filter(|r| r.record.kill).map(|r| r.target)
    }
}

/// Per-cast values shared by every act.
struct CastFrame<'a> {
    actor: CharacterId,
    cast: CastId,
    action: &'a ActionTemplate,
    action_id: &'a str,
    from_weapon: bool,
}

impl CastFrame<'_> {
    fn categories(&self, element: Element) -> Vec<String> {
        let mut categories = self.action.categories.clone();
        categories.push(element.to_string());
        categories
    }
}

impl CombatEngine {
    /// Checks that `actor` may use `thing` right now.
    pub fn check_usable(&self, actor: CharacterId, thing: ThingId) -> Result<(), CombatError> {
        let unavailable = |reason| CombatError::ActionUnavailable { actor, thing, reason };
        let item = self.world.thing(thing)?;

        if item.owner != Some(actor) {
            return Err(unavailable(Unavailable::NotOwned));
        }
        if item.action.as_ref().is_none_or(|action| action.acts.is_empty()) {
            return Err(unavailable(Unavailable::NotAnAction));
        }
        if item.out_of_stock() {
            return Err(unavailable(Unavailable::OutOfStock));
        }
        if item.usage_exhausted() {
            return Err(unavailable(Unavailable::UsageLimitReached));
        }
        if item.mana_cost() > self.world.character(actor)?.mana {
            return Err(unavailable(Unavailable::InsufficientMana));
        }
        Ok(())
    }

    /// Everything `actor` could use this turn, weapon first.
    pub fn usable_actions(&self, actor: CharacterId) -> Result<Vec<ThingId>, CombatError> {
        Ok(self
            .world
            .character(actor)?
            .holdings()
            .filter(|thing| self.check_usable(actor, *thing).is_ok())
            .collect())
    }

    /// Resolves `thing` used by `actor` against `choice`.
    pub(crate) fn use_action(
        &mut self,
        actor: CharacterId,
        thing: ThingId,
        choice: TargetChoice,
    ) -> Result<ActionReport, CombatError> {
        self.check_usable(actor, thing)?;
        let item = self.world.thing(thing)?;
        let action = item
            .action
            .clone()
            .ok_or(CombatError::ActionUnavailable {
                actor,
                thing,
                reason: Unavailable::NotAnAction,
            })?;
        let action_id = item.action_id().to_string();
        let from_weapon = item.slot() == Some(Slot::Weapon);

        let chosen = self.chosen_targets(actor, &action, choice)?;
        let cast = self.world.registry.cast();

        if action.mana_cost > 0 {
            self.restore_mana(actor, -action.mana_cost)?;
        }
        self.world.thing_mut(thing)?.uses += 1;

        info!(%actor, %thing, %cast, action = %action.name, targets = chosen.len(), "action used");
        self.world.emit(CombatEvent::ActionUsed {
            actor,
            thing,
            cast,
            name: action.name.clone(),
            target: chosen.first().copied(),
        });
        if let Some(text) = &action.text {
            let actor_name = self.name_of(actor);
            let target_name = chosen.first().map(|id| self.name_of(*id));
            self.narrate(
                text,
                &NarrativeVars {
                    actor: Some(&actor_name),
                    target: target_name.as_deref(),
                    action: Some(&action.name),
                    ..NarrativeVars::default()
                },
            );
        }

        let frame = CastFrame {
            actor,
            cast,
            action: &action,
            action_id: &action_id,
            from_weapon,
        };
        let mut report = ActionReport {
            actor,
            thing,
            cast,
            name: action.name.clone(),
            records: Vec::new(),
            halted: false,
        };

        for (index, act) in action.acts.iter().enumerate() {
            if self.world.log.halted(cast) {
                debug!(%cast, index, "cast halted by a missed act");
                report.halted = true;
                break;
            }
            let targets = self.act_targets(actor, cast, index, act, &chosen)?;
            self.world.character_mut(actor)?.last_targets = targets.clone();

            for target in targets {
                // Earlier targets of this act may have changed who is alive.
                if !act.life.admits(self.world.character(target)?.alive) {
                    continue;
                }
                let record = match &act.kind {
                    ActKind::Attack(params) => self.resolve_attack(&frame, index, act, params, target)?,
                    ActKind::Heal(params) => self.resolve_heal(&frame, index, act, params, target)?,
                    ActKind::Modify(params) => self.resolve_modify(&frame, index, act, params, target)?,
                };
                report.records.push(TargetRecord {
                    act: index,
                    target,
                    record,
                });
            }
            self.purge_effects(EffectDuration::EndOfAct)?;
        }

        self.purge_effects(EffectDuration::EndOfAction)?;
        self.consume_stock(actor, thing)?;
        Ok(report)
    }

    fn resolve_attack(
        &mut self,
        frame: &CastFrame<'_>,
        index: usize,
        act: &Act,
        params: &AttackParams,
        target: CharacterId,
    ) -> Result<ActRecord, CombatError> {
        let actor = frame.actor;
        let cfg = self.world.config.clone();

        let element = match params.element {
            Some(element) => element,
            None if frame.from_weapon => weapon_element(&self.world, actor).unwrap_or(frame.action.element),
            None => frame.action.element,
        };
        let trigger = TriggerContext::new(frame.categories(element)).with_act(frame.cast, index);
        let on_target = trigger.clone().with_other(Some(target));
        let on_actor = trigger.with_other(Some(actor));

        self.check_triggers(actor, TriggerEvent::Attack, &on_target)?;
        self.check_triggers(target, TriggerEvent::AttackT, &on_actor)?;
        self.world
            .character_mut(target)?
            .memory_of(actor)
            .attacks_used
            .insert(frame.action_id.to_string());

        let stat_ratio = match (params.stat_accuracy, params.stat_dodge) {
            (Some(accuracy), Some(dodge)) => {
                let defender = self.world.stat(target, dodge)?;
                Some(self.world.stat(actor, accuracy)? / defender.max(1.0))
            }
            _ => None,
        };
        let chance = hit_chance(&HitInputs {
            base: params.accuracy,
            accuracy: self.world.stat(actor, StatKind::Accuracy)?,
            dodge: self.world.stat(target, StatKind::Dodge)?,
            accuracy_mult: self.world.stat(actor, StatKind::AccuracyMult)?,
            dodge_mult: self.world.stat(target, StatKind::DodgeMult)?,
            stat_ratio,
        });
        let roll = self.world.rng.roll_d100();

        let mut record = ActRecord::new(ActTag::Attack);
        record.element = Some(element);

        if !check_roll(roll, chance) {
            debug!(%actor, %target, roll, chance, "attack missed");
            self.check_triggers(actor, TriggerEvent::AttackFail, &on_target)?;
            self.check_triggers(target, TriggerEvent::AttackFailT, &on_actor)?;
            self.finish_act(frame, index, act, target, &record)?;
            if act.stop_on_miss {
                self.world
                    .record(actor, Some(target), Some(frame.cast), Some(index), LogRecord::Halt);
            }
            return Ok(record);
        }

        record.success = true;
        self.world.character_mut(target)?.memory_of(actor).attacked_me = true;
        self.check_triggers(actor, TriggerEvent::AttackSuccess, &on_target)?;
        self.check_triggers(target, TriggerEvent::AttackSuccessT, &on_actor)?;

        let mut multiplier = self.world.stat(actor, StatKind::DamageMult)?;
        let crit = crit_chance(
            params.crit,
            self.world.stat(actor, StatKind::CritChance)?,
            self.world.stat(actor, StatKind::CritChanceMult)?,
        );
        if check_roll(self.world.rng.roll_d100(), crit) {
            record.crit = true;
            multiplier *= (params.crit_mult + self.world.stat(actor, StatKind::CritMultAdd)?)
                * self.world.stat(actor, StatKind::CritMultMult)?;
            self.check_triggers(actor, TriggerEvent::Crit, &on_target)?;
            self.check_triggers(target, TriggerEvent::CritT, &on_actor)?;
        }

        let affinity = effective_affinities(&self.world, target)?.of(element);
        multiplier = affinity_multiplier(multiplier, affinity);
        record.weak = affinity == Affinity::Weak;
        record.resist = affinity == Affinity::Resist;
        record.immune = affinity == Affinity::Immune;
        self.world
            .character_mut(actor)?
            .memory_of(target)
            .observe(element, affinity);

        let damage_stat = self.world.stat(actor, StatKind::Damage)?;
        let scaling = match params.stat_damage {
            Some(stat) => Some(self.world.stat(actor, stat)?),
            None => None,
        };
        let base = base_damage(params.damage, damage_stat, params.damage_percent, scaling);
        let defence = match params.stat_defence {
            Some(stat) => {
                let attacker = match params.stat_damage {
                    Some(offence) => self.world.stat(actor, offence)?,
                    None => damage_stat,
                };
                Some((attacker, self.world.stat(target, stat)?))
            }
            None => None,
        };
        let variance = self
            .world
            .rng
            .uniform(cfg.damage_variance_low, cfg.damage_variance_high);
        let damage = final_damage(&DamageInputs {
            base,
            defence,
            multiplier,
            defence_mult: self.world.stat(target, StatKind::DefenceMult)?,
            variance,
        });

        record.amount = damage;
        record.kill = self.deal_damage(target, damage, Some(actor))?;
        debug!(%actor, %target, %element, ?affinity, crit = record.crit, damage, kill = record.kill, "attack landed");

        if !record.kill && !record.resist && !record.immune {
            let mut condition = params.condition.unwrap_or(cfg.condition_damage);
            if record.crit {
                condition += cfg.condition_crit_bonus;
            }
            if record.weak {
                condition += cfg.condition_weak_bonus;
            }
            self.add_condition(target, element, condition)?;
        }

        self.finish_act(frame, index, act, target, &record)?;
        Ok(record)
    }

    fn resolve_heal(
        &mut self,
        frame: &CastFrame<'_>,
        index: usize,
        act: &Act,
        params: &HealParams,
        target: CharacterId,
    ) -> Result<ActRecord, CombatError> {
        let actor = frame.actor;
        let mut record = ActRecord::new(ActTag::Heal);
        record.element = Some(frame.action.element);

        let alive = self.world.character(target)?.alive;
        if !alive && !params.revive {
            self.finish_act(frame, index, act, target, &record)?;
            return Ok(record);
        }

        let stat = match params.stat_heal {
            Some(stat) => Some(self.world.stat(actor, stat)?),
            None => None,
        };
        let amount = heal_amount(&HealInputs {
            base: params.heal,
            percent: params.heal_percent,
            stat,
            heal_target_mult: self.world.stat(actor, StatKind::HealTargetMult)?,
            heal_self_mult: self.world.stat(target, StatKind::HealSelfMult)?,
            max_hp_percent: params.max_hp_percent,
            max_health: self.world.max_health(target)?,
            health: self.world.character(target)?.health,
        });

        if alive {
            record.amount = self.restore_health(target, amount)?;
            record.success = true;
        } else if amount > 0 {
            self.revive(target, amount)?;
            record.amount = self.world.character(target)?.health;
            record.success = true;
        }

        if record.success {
            let ctx = TriggerContext::new(frame.action.categories.clone()).with_act(frame.cast, index);
            self.check_triggers(actor, TriggerEvent::Heal, &ctx.clone().with_other(Some(target)))?;
            self.check_triggers(target, TriggerEvent::HealT, &ctx.with_other(Some(actor)))?;
            if let Some(cure) = params.cure {
                self.cure_condition(target, cure.element, cure.amount)?;
            }
        }

        debug!(%actor, %target, amount = record.amount, revived = !alive && record.success, "heal resolved");
        self.finish_act(frame, index, act, target, &record)?;
        Ok(record)
    }

    fn resolve_modify(
        &mut self,
        frame: &CastFrame<'_>,
        index: usize,
        act: &Act,
        params: &ModifyParams,
        target: CharacterId,
    ) -> Result<ActRecord, CombatError> {
        let actor = frame.actor;
        let template = self.content.require_modifier(&params.modifier)?.clone();
        let origin = ModifierOrigin::new(frame.action_id).with_cast(frame.cast);
        let outcome = self.grant_modifier(&template, target, actor, origin)?;

        let mut record = ActRecord::new(ActTag::Modify);
        record.element = Some(frame.action.element);
        record.success = outcome != GrantOutcome::Refused;

        if record.success {
            let ctx = TriggerContext::new(frame.action.categories.clone()).with_act(frame.cast, index);
            self.check_triggers(actor, TriggerEvent::Modify, &ctx.clone().with_other(Some(target)))?;
            self.check_triggers(target, TriggerEvent::ModifyT, &ctx.with_other(Some(actor)))?;
        }

        self.finish_act(frame, index, act, target, &record)?;
        Ok(record)
    }

    /// Logs the act, emits its event, and narrates its outcome.
    fn finish_act(
        &mut self,
        frame: &CastFrame<'_>,
        index: usize,
        act: &Act,
        target: CharacterId,
        record: &ActRecord,
    ) -> Result<(), CombatError> {
        self.world.record(
            frame.actor,
            Some(target),
            Some(frame.cast),
            Some(index),
            LogRecord::Act(record.clone()),
        );
        self.world.emit(CombatEvent::ActResolved {
            actor: frame.actor,
            target,
            cast: frame.cast,
            act: index,
            record: record.clone(),
        });

        let text = if record.success {
            &act.text_success
        } else {
            &act.text_fail
        };
        if let Some(text) = text {
            let actor_name = self.name_of(frame.actor);
            let target_name = self.name_of(target);
            self.narrate(
                text,
                &NarrativeVars {
                    actor: Some(&actor_name),
                    target: Some(&target_name),
                    amount: Some(record.amount),
                    action: Some(&frame.action.name),
                },
            );
        }
        Ok(())
    }
}
