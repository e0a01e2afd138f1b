//! Plain-text presentation of session events.
//!
//! The engine fills `{actor}`, `{target}`, `{amount}` and `{action}` itself.
//! Pronoun placeholders are resolved here from the character's [`Gender`]:
//!
//! | Placeholder | Male | Female | Neutral | Plural |
//! |---|---|---|---|---|
//! | `{he}` | he | she | they | they |
//! | `{him}` | him | her | them | them |
//! | `{his}` | his | her | their | their |
//! | `{himself}` | himself | herself | themself | themselves |
//!
//! A bare placeholder refers to the line's target, falling back to the actor.
//! `{actor.his}` and `{target.his}` pin the referent. A leading capital
//! (`{He}`) capitalizes the word.

use std::collections::BTreeMap;

use skirmish_core::env::{ActTag, TargetKind};
use skirmish_core::{ActRecord, CharacterId, CombatEngine, CombatEvent, CombatOutcome, Gender, Team, ThingId};
use skirmish_runtime::{SessionOutcome, TurnView};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Pronouns {
    pub subject: &'static str,
    pub object: &'static str,
    pub possessive: &'static str,
    pub reflexive: &'static str,
}

impl Pronouns {
    pub const fn of(gender: Gender) -> Self {
        match gender {
            Gender::Male => Self::new("he", "him", "his", "himself"),
            Gender::Female => Self::new("she", "her", "her", "herself"),
            Gender::Neutral => Self::new("they", "them", "their", "themself"),
            Gender::Plural => Self::new("they", "them", "their", "themselves"),
        }
    }

    const fn new(
        subject: &'static str,
        object: &'static str,
        possessive: &'static str,
        reflexive: &'static str,
    ) -> Self {
        Self {
            subject,
            object,
            possessive,
            reflexive,
        }
    }

    fn form(&self, key: &str) -> Option<&'static str> {
        match key {
            "he" => Some(self.subject),
            "him" => Some(self.object),
            "his" => Some(self.possessive),
            "himself" => Some(self.reflexive),
            _ => None,
        }
    }
}

/// Replaces pronoun placeholders; anything unrecognised is left as written.
pub fn fill_pronouns(line: &str, actor: Option<Gender>, target: Option<Gender>) -> String {
    let mut out = String::with_capacity(line.len());
    let mut rest = line;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let tail = &rest[open..];
        let Some(close) = tail.find('}') else {
            rest = tail;
            break;
        };
        match resolve(&tail[1..close], actor, target) {
            Some(word) => out.push_str(&word),
            None => out.push_str(&tail[..=close]),
        }
        rest = &tail[close + 1..];
    }
    out.push_str(rest);
    out
}

fn resolve(token: &str, actor: Option<Gender>, target: Option<Gender>) -> Option<String> {
    let (gender, key) = if let Some(key) = token.strip_prefix("actor.") {
        (actor?, key)
    } else if let Some(key) = token.strip_prefix("target.") {
        (target?, key)
    } else {
        (target.or(actor)?, token)
    };

    let word = Pronouns::of(gender).form(&key.to_ascii_lowercase())?;
    if key.starts_with(|c: char| c.is_ascii_uppercase()) {
        let mut chars = word.chars();
        Some(
            chars
                .next()
                .map(|first| first.to_ascii_uppercase().to_string() + chars.as_str())
                .unwrap_or_default(),
        )
    } else {
        Some(word.to_string())
    }
}

struct Castmate {
    name: String,
    gender: Gender,
}

/// Turns [`CombatEvent`]s into lines of text.
///
/// Names are captured up front so that events about destroyed items still
/// render. The narrator tracks who is acting on whom to resolve pronouns.
pub struct Narrator {
    cast: BTreeMap<CharacterId, Castmate>,
    things: BTreeMap<ThingId, String>,
    actor: Option<CharacterId>,
    target: Option<CharacterId>,
}

impl Narrator {
    pub fn new(engine: &CombatEngine) -> Self {
        let world = engine.world();
        let cast = world
            .roster()
            .map(|c| {
                (
                    c.id,
                    Castmate {
                        name: c.name.clone(),
                        gender: c.gender,
                    },
                )
            })
            .collect();
        let things = world
            .things
            .values()
            .map(|t| (t.id, t.name.clone()))
            .collect();

        Self {
            cast,
            things,
            actor: None,
            target: None,
        }
    }

    pub fn render(&mut self, event: &CombatEvent) -> Option<String> {
        match event {
            CombatEvent::RoundStarted { round } => Some(format!("\n=== Round {round} ===")),
            CombatEvent::TurnStarted { character, .. } => {
                self.actor = Some(*character);
                self.target = None;
                Some(format!("-- {}'s turn --", self.name(*character)))
            }
            CombatEvent::TurnEnded { .. } => None,
            CombatEvent::ActionUsed {
                actor, name, target, ..
            } => {
                self.actor = Some(*actor);
                self.target = *target;
                Some(format!("{} uses {name}.", self.name(*actor)))
            }
            CombatEvent::ActResolved {
                actor,
                target,
                record,
                ..
            } => {
                self.actor = Some(*actor);
                self.target = Some(*target);
                describe_act(self.name(*target), record)
            }
            CombatEvent::Narrative { text } => Some(fill_pronouns(
                text,
                self.gender(self.actor),
                self.gender(self.target),
            )),
            CombatEvent::ModifierApplied {
                target,
                description,
                ..
            } => {
                self.target = Some(*target);
                (!description.is_empty()).then(|| {
                    format!("{} is now {}.", self.name(*target), description.to_lowercase())
                })
            }
            CombatEvent::ModifierRemoved { description, .. } if !description.is_empty() => {
                Some(format!("{description} wears off."))
            }
            CombatEvent::ModifierRemoved { .. } => None,
            CombatEvent::ConditionChanged {
                character,
                element,
                tier,
                ..
            } => Some(format!(
                "{}'s {element} condition is now at tier {tier}.",
                self.name(*character)
            )),
            CombatEvent::Died { character, killer } => Some(match killer {
                Some(killer) if killer != character => {
                    format!("{} is slain by {}!", self.name(*character), self.name(*killer))
                }
                _ => format!("{} falls!", self.name(*character)),
            }),
            CombatEvent::Revived { character } => {
                Some(format!("{} rises again.", self.name(*character)))
            }
            CombatEvent::TeamChanged { character, team } => Some(format!(
                "{} now fights for the {}.",
                self.name(*character),
                side(*team)
            )),
            CombatEvent::ItemDepleted { owner, thing } => Some(format!(
                "{} has no {} left.",
                self.name(*owner),
                self.things.get(thing).map_or("item", String::as_str)
            )),
            CombatEvent::TurnPassed { character } => {
                Some(format!("{} waits.", self.name(*character)))
            }
            CombatEvent::CombatEnded { outcome } => Some(combat_outcome(*outcome)),
        }
    }

    fn name(&self, id: CharacterId) -> &str {
        self.cast.get(&id).map_or("someone", |c| c.name.as_str())
    }

    fn gender(&self, id: Option<CharacterId>) -> Option<Gender> {
        id.and_then(|id| self.cast.get(&id)).map(|c| c.gender)
    }
}

fn describe_act(target: &str, record: &ActRecord) -> Option<String> {
    if !record.success {
        return Some(match record.kind {
            Some(ActTag::Attack) => format!("The attack misses {target}."),
            _ => format!("Nothing happens to {target}."),
        });
    }

    let mut line = match record.kind {
        Some(ActTag::Attack) if record.immune => return Some(format!("{target} is immune.")),
        Some(ActTag::Attack) => format!("{target} takes {} damage", record.amount),
        Some(ActTag::Heal) => format!("{target} recovers {} health", record.amount),
        Some(ActTag::Modify) | None => return None,
    };
    if record.crit {
        line.push_str(", a critical hit");
    }
    if record.weak {
        line.push_str(", a weak spot");
    }
    if record.resist {
        line.push_str(", partly resisted");
    }
    line.push('.');
    Some(line)
}

fn side(team: Team) -> &'static str {
    match team {
        Team::Ally => "party",
        Team::Enemy => "enemy",
    }
}

fn combat_outcome(outcome: CombatOutcome) -> String {
    match outcome {
        CombatOutcome::Victory(Team::Ally) => "Victory! The party stands.".to_string(),
        CombatOutcome::Victory(Team::Enemy) => "Defeat. The party has fallen.".to_string(),
        CombatOutcome::Draw => "Nobody is left standing.".to_string(),
    }
}

pub fn session_outcome(outcome: SessionOutcome) -> String {
    match outcome {
        SessionOutcome::Decided(outcome) => combat_outcome(outcome),
        SessionOutcome::Stalemate { rounds } => {
            format!("Neither side prevails after {rounds} rounds.")
        }
    }
}

/// The status board and numbered choices shown before a player turn.
pub fn turn_menu(view: &TurnView) -> String {
    let mut out = String::new();
    if let Some(actor) = view.actor_view() {
        out.push_str(&format!("Round {}: {} to act\n", view.round, actor.name));
    }
    for (slot, c) in view.roster.iter().enumerate() {
        let marker = if c.id == view.actor { '>' } else { ' ' };
        let state = if c.alive { "" } else { " (down)" };
        out.push_str(&format!(
            "{marker} [{slot}] {:<14} {:<5} HP {:>3}/{:<3} MP {:>3}/{:<3}{state}",
            c.name,
            c.team.to_string(),
            c.health,
            c.max_health,
            c.mana,
            c.max_mana,
        ));
        if !c.modifiers.is_empty() {
            out.push_str(&format!("  {}", c.modifiers.join(", ")));
        }
        out.push('\n');
    }

    out.push_str("Actions:\n");
    for (index, action) in view.actions.iter().enumerate() {
        let cost = if action.mana_cost > 0 {
            format!(" ({} MP)", action.mana_cost)
        } else {
            String::new()
        };
        out.push_str(&format!(
            "  use {index} [target]  {}{cost} -> {}\n",
            action.name,
            target_label(action.target)
        ));
    }
    for talk in &view.talk {
        let slot = view
            .roster
            .iter()
            .position(|c| c.id == talk.listener)
            .unwrap_or_default();
        out.push_str(&format!("  talk {slot} <topic>  {}\n", talk.topics.join(" | ")));
    }
    out.push_str("  pass\n");
    out
}

fn target_label(kind: TargetKind) -> &'static str {
    match kind {
        TargetKind::SingleEnemy => "one enemy",
        TargetKind::SingleAlly => "one ally",
        TargetKind::Single => "anyone",
        TargetKind::SelfOnly => "self",
        TargetKind::EnemyTeam => "all enemies",
        TargetKind::AllyTeam => "all allies",
        TargetKind::Everyone => "everyone",
    }
}
