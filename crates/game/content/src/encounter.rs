//! Encounter definitions: who fights on which side.

use skirmish_core::{CombatError, ContentOracle, ContentTables, TemplateKind};

/// Character template ids spawned on each team when a session starts.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Encounter {
    pub allies: Vec<String>,
    pub enemies: Vec<String>,
}

impl Encounter {
    pub fn new<A, E>(allies: A, enemies: E) -> Self
    where
        A: IntoIterator,
        A::Item: Into<String>,
        E: IntoIterator,
        E::Item: Into<String>,
    {
        Self {
            allies: allies.into_iter().map(Into::into).collect(),
            enemies: enemies.into_iter().map(Into::into).collect(),
        }
    }

    /// Checks that both sides are populated with known characters.
    pub fn validate(&self, id: &str, tables: &ContentTables) -> Result<(), CombatError> {
        if self.allies.is_empty() || self.enemies.is_empty() {
            return Err(CombatError::MalformedTemplate {
                kind: TemplateKind::Character,
                id: id.to_string(),
                reason: "encounter needs a combatant on each side",
            });
        }
        for character in self.allies.iter().chain(&self.enemies) {
            if tables.character(character).is_none() {
                return Err(CombatError::unknown(TemplateKind::Character, character.as_str()));
            }
        }
        Ok(())
    }
}
