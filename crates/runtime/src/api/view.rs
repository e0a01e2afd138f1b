//! Read-only turn snapshot handed to player controllers.

use skirmish_core::env::TargetKind;
use skirmish_core::{CharacterId, CombatEngine, CombatError, Gender, Team, ThingId};

/// Everything a player needs to pick a command.
#[derive(Clone, Debug, PartialEq)]
pub struct TurnView {
    pub round: u32,
    pub actor: CharacterId,
    pub roster: Vec<CombatantView>,
    /// Actions the actor can use right now.
    pub actions: Vec<ActionView>,
    /// Characters willing to talk, with their open topics.
    pub talk: Vec<TalkView>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct CombatantView {
    pub id: CharacterId,
    pub name: String,
    pub gender: Gender,
    pub team: Team,
    pub health: i64,
    pub max_health: i64,
    pub mana: i64,
    pub max_mana: i64,
    pub alive: bool,
    /// Descriptions of the modifiers currently on this character.
    pub modifiers: Vec<String>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ActionView {
    pub thing: ThingId,
    pub name: String,
    pub target: TargetKind,
    pub mana_cost: i64,
    /// Pickable targets for single-target kinds; the full list otherwise.
    pub targets: Vec<CharacterId>,
}

#[derive(Clone, Debug, PartialEq)]
pub struct TalkView {
    pub listener: CharacterId,
    pub topics: Vec<String>,
}

impl TurnView {
    pub fn capture(engine: &CombatEngine, actor: CharacterId) -> Result<Self, CombatError> {
        let world = engine.world();

        let mut roster = Vec::new();
        for character in world.roster() {
            roster.push(CombatantView {
                id: character.id,
                name: character.name.clone(),
                gender: character.gender,
                team: character.team,
                health: character.health,
                max_health: world.max_health(character.id)?,
                mana: character.mana,
                max_mana: world.max_mana(character.id)?,
                alive: character.alive,
                modifiers: world
                    .modifiers_on(character.id)
                    .map(|m| m.description().to_string())
                    .collect(),
            });
        }

        let mut actions = Vec::new();
        for thing in engine.usable_actions(actor)? {
            let instance = world.thing(thing)?;
            let Some(action) = &instance.action else {
                continue;
            };
            actions.push(ActionView {
                thing,
                name: instance.name.clone(),
                target: action.target,
                mana_cost: action.mana_cost,
                targets: engine.valid_targets(actor, action)?,
            });
        }

        let talk = world
            .roster()
            .filter(|c| c.id != actor && c.alive)
            .filter_map(|c| {
                let topics = engine.available_topics(c.id, actor).ok()?;
                Some(TalkView {
                    listener: c.id,
                    topics: topics.into_iter().map(|t| t.id).collect(),
                })
            })
            .collect();

        Ok(Self {
            round: engine.round(),
            actor,
            roster,
            actions,
            talk,
        })
    }

    pub fn combatant(&self, id: CharacterId) -> Option<&CombatantView> {
        self.roster.iter().find(|c| c.id == id)
    }

    pub fn actor_view(&self) -> Option<&CombatantView> {
        self.combatant(self.actor)
    }
}
