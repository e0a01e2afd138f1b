//! Combat engine: the single owner of the combat [`World`].
//!
//! Subsystems are split across modules as `impl CombatEngine` blocks:
//!
//! - [`turns`]: round/turn state machine and the player entry points
//! - `inventory`: equipment and item ownership
//! - `vitals`: damage, healing, death, and revival
//! - [`crate::modifier`]: modifier lifecycle and triggers
//! - [`crate::condition`]: elemental conditions
//! - [`crate::combat`]: action resolution
//! - [`crate::ai`]: AI decisions
//! - [`crate::dialogue`]: dialogue gating

mod inventory;
pub mod turns;
mod vitals;

pub use turns::TurnBegin;

use std::sync::Arc;

use tracing::debug;

use crate::combat::CombatEvent;
use crate::config::CombatConfig;
use crate::env::{ContentOracle, ContentOracleExt, Narrative, NarrativeVars};
use crate::error::CombatError;
use crate::registry::CharacterId;
use crate::state::{Character, Team, ThingKind, World};
use crate::stats::{Affinities, ElementSet, StatKind};

/// Owns the world and interprets content against it.
pub struct CombatEngine {
    pub(crate) world: World,
    pub(crate) content: Arc<dyn ContentOracle>,
}

impl CombatEngine {
    pub fn new(content: Arc<dyn ContentOracle>, config: CombatConfig, seed: u64) -> Self {
        Self {
            world: World::new(config, seed),
            content,
        }
    }

    pub fn world(&self) -> &World {
        &self.world
    }

    pub fn content(&self) -> &dyn ContentOracle {
        self.content.as_ref()
    }

    pub fn config(&self) -> &CombatConfig {
        &self.world.config
    }

    pub fn stat(&self, id: CharacterId, stat: StatKind) -> Result<f64, CombatError> {
        self.world.stat(id, stat)
    }

    /// Takes every event emitted since the last drain, in order.
    pub fn drain_events(&mut self) -> Vec<CombatEvent> {
        self.world.drain_events()
    }

    /// Spawns a character from its template with the template's control mode.
    pub fn spawn(&mut self, template_id: &str, team: Team) -> Result<CharacterId, CombatError> {
        self.spawn_with(template_id, team, None)
    }

    /// Spawns a character, overriding AI control when `ai` is given.
    ///
    /// The template is cloned, equipment/skills/items are instantiated, and
    /// the per-combat initiative roll is drawn.
    pub fn spawn_with(
        &mut self,
        template_id: &str,
        team: Team,
        ai: Option<bool>,
    ) -> Result<CharacterId, CombatError> {
        let template = self.content.require_character(template_id)?.clone();
        let id = self.world.registry.character();

        let die = self.world.config.initiative_die.max(1);
        let initiative_roll =
            f64::from(self.world.rng.range(1, die)) + f64::from(self.world.rng.range(1, die));

        let baseline = Affinities::new(
            ElementSet::from_elements(&template.weak),
            ElementSet::from_elements(&template.resist),
            ElementSet::from_elements(&template.immune),
        );

        self.world.characters.insert(
            id,
            Character {
                id,
                template: template_id.to_string(),
                name: template.name.clone(),
                gender: template.gender,
                team,
                ai_controlled: ai.unwrap_or(template.ai),
                base: template.stats.clone(),
                baseline,
                health: 0,
                mana: 0,
                alive: true,
                ready: false,
                acted: false,
                initiative_roll,
                weapon: None,
                armour: None,
                accessory: None,
                skills: Vec::new(),
                items: Vec::new(),
                memory: Default::default(),
                conditions: Default::default(),
                ai_options: Default::default(),
                dialogue: template.dialogue.clone(),
                last_targets: Vec::new(),
            },
        );

        for equipment in [&template.weapon, &template.armour, &template.accessory]
            .into_iter()
            .flatten()
        {
            let thing = self.instantiate_equipment(equipment)?;
            self.equip(id, thing)?;
        }
        for skill in &template.skills {
            let thing = self.instantiate_action(skill, ThingKind::Skill, None)?;
            self.give_item(id, thing)?;
        }
        for grant in &template.items {
            let thing = self.instantiate_action(&grant.id, ThingKind::Item, grant.stock)?;
            self.give_item(id, thing)?;
        }

        let max_health = self.world.max_health(id)?;
        let max_mana = self.world.max_mana(id)?;
        let character = self.world.character_mut(id)?;
        character.health = max_health;
        character.mana = max_mana;

        debug!(
            character = %id,
            template = template_id,
            ?team,
            initiative_roll,
            "spawned character"
        );
        Ok(id)
    }

    /// Renders `text` and appends it to the event outbox.
    pub(crate) fn narrate(&mut self, text: &Narrative, vars: &NarrativeVars<'_>) {
        if let Some(line) = text.render(&mut self.world.rng, vars) {
            self.world.emit(CombatEvent::Narrative { text: line });
        }
    }

    /// Character name for narrative substitution.
    pub(crate) fn name_of(&self, id: CharacterId) -> String {
        self.world
            .characters
            .get(&id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }
}
