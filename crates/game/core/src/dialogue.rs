//! Dialogue gating.
//!
//! A listener's dialogue tree offers topics gated by the listener's sentiment
//! toward the speaker and by its own health fraction. Choosing a topic shifts
//! the sentiment and, for a join topic, may win the listener over to the
//! speaker's team.

use tracing::{debug, info};

use crate::combat::CombatEvent;
use crate::engine::CombatEngine;
use crate::env::{ContentOracleExt, NarrativeVars, Topic};
use crate::error::{CombatError, ErrorSeverity, GameError};
use crate::registry::CharacterId;

#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum DialogueError {
    #[error("{listener} has nothing to talk about with {speaker}")]
    NoTopics {
        listener: CharacterId,
        speaker: CharacterId,
    },

    #[error("topic `{topic}` is not open for {listener}")]
    UnknownTopic { listener: CharacterId, topic: String },

    #[error("{0} cannot talk")]
    Silent(CharacterId),

    #[error(transparent)]
    Combat(#[from] CombatError),
}

impl GameError for DialogueError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::NoTopics { .. } => ErrorSeverity::Recoverable,
            Self::UnknownTopic { .. } | Self::Silent(_) => ErrorSeverity::Validation,
            Self::Combat(err) => err.severity(),
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::NoTopics { .. } => "DIALOGUE_NO_TOPICS",
            Self::UnknownTopic { .. } => "DIALOGUE_UNKNOWN_TOPIC",
            Self::Silent(_) => "DIALOGUE_SILENT",
            Self::Combat(err) => err.error_code(),
        }
    }
}

/// Result of a chosen topic.
#[derive(Clone, Debug, PartialEq)]
pub struct TopicResult {
    pub topic: String,
    /// Listener's sentiment toward the speaker after the change.
    pub sentiment: i32,
    /// `Some` for join topics: whether the listener switched sides.
    pub joined: Option<bool>,
}

impl CombatEngine {
    /// Topics `listener` is willing to discuss with `speaker` right now.
    pub fn available_topics(
        &self,
        listener: CharacterId,
        speaker: CharacterId,
    ) -> Result<Vec<Topic>, DialogueError> {
        let character = self.world.character(listener)?;
        self.world.character(speaker)?;
        if !character.alive {
            return Err(DialogueError::Silent(listener));
        }
        let Some(tree_id) = character.dialogue.as_deref() else {
            return Err(DialogueError::NoTopics { listener, speaker });
        };

        let tree = self.content.require_dialogue(tree_id)?;
        let sentiment = character.memory.get(&speaker).map_or(0, |m| m.sentiment);
        let health = self.world.health_fraction(listener)?;

        let topics: Vec<Topic> = tree
            .topics
            .iter()
            .filter(|topic| topic.is_open(sentiment, health))
            .cloned()
            .collect();
        if topics.is_empty() {
            return Err(DialogueError::NoTopics { listener, speaker });
        }
        Ok(topics)
    }

    /// Applies the chosen topic.
    pub fn choose_topic(
        &mut self,
        listener: CharacterId,
        speaker: CharacterId,
        topic_id: &str,
    ) -> Result<TopicResult, DialogueError> {
        let topic = self
            .available_topics(listener, speaker)?
            .into_iter()
            .find(|topic| topic.id == topic_id)
            .ok_or_else(|| DialogueError::UnknownTopic {
                listener,
                topic: topic_id.to_string(),
            })?;

        let speaker_name = self.name_of(speaker);
        let listener_name = self.name_of(listener);
        let vars = NarrativeVars {
            actor: Some(&speaker_name),
            target: Some(&listener_name),
            ..NarrativeVars::default()
        };
        self.narrate(&topic.text, &vars);

        let memory = self.world.character_mut(listener)?.memory_of(speaker);
        memory.sentiment += topic.sentiment_delta;
        let sentiment = memory.sentiment;
        debug!(%listener, %speaker, topic = %topic.id, sentiment, "topic chosen");

        if let Some(reply) = &topic.reply {
            self.narrate(reply, &vars);
        }

        let joined = match topic.outcome.join_chance(sentiment) {
            Some(chance) => {
                let success = self.world.rng.unit() < chance;
                if success {
                    let team = self.world.character(speaker)?.team;
                    let character = self.world.character_mut(listener)?;
                    if character.team != team {
                        character.team = team;
                        character.ai_controlled = true;
                        info!(%listener, %speaker, ?team, "character changed sides");
                        self.world.emit(CombatEvent::TeamChanged {
                            character: listener,
                            team,
                        });
                    }
                }
                Some(success)
            }
            None => None,
        };

        Ok(TopicResult {
            topic: topic.id,
            sentiment,
            joined,
        })
    }
}
