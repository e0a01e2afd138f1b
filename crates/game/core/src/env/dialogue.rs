//! Dialogue data: topics gated by sentiment and health.

use crate::env::narrative::Narrative;

/// What choosing a topic does beyond the sentiment change.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum TopicOutcome {
    #[default]
    Talk,
    /// The listener may switch to the speaker's team.
    /// Chance = `base + sentiment × per_point`, clamped to `[0, 1]`.
    Join { base: f64, per_point: f64 },
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Topic {
    pub id: String,
    pub text: Narrative,
    #[cfg_attr(feature = "serde", serde(default))]
    pub reply: Option<Narrative>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_sentiment: Option<i32>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_sentiment: Option<i32>,
    /// Listener health fraction must be at or below this value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub max_health: Option<f64>,
    /// Listener health fraction must be at or above this value.
    #[cfg_attr(feature = "serde", serde(default))]
    pub min_health: Option<f64>,
    #[cfg_attr(feature = "serde", serde(default))]
    pub sentiment_delta: i32,
    #[cfg_attr(feature = "serde", serde(default))]
    pub outcome: TopicOutcome,
}

impl Topic {
    pub fn new(id: impl Into<String>, text: Narrative) -> Self {
        Self {
            id: id.into(),
            text,
            reply: None,
            min_sentiment: None,
            max_sentiment: None,
            max_health: None,
            min_health: None,
            sentiment_delta: 0,
            outcome: TopicOutcome::Talk,
        }
    }

    /// Whether the topic is open for a listener in the given state.
    pub fn is_open(&self, sentiment: i32, health_fraction: f64) -> bool {
        self.min_sentiment.is_none_or(|min| sentiment >= min)
            && self.max_sentiment.is_none_or(|max| sentiment <= max)
            && self.max_health.is_none_or(|max| health_fraction <= max)
            && self.min_health.is_none_or(|min| health_fraction >= min)
    }
}

#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct DialogueTree {
    pub topics: Vec<Topic>,
}

impl TopicOutcome {
    pub fn join_chance(&self, sentiment: i32) -> Option<f64> {
        match self {
            TopicOutcome::Talk => None,
            TopicOutcome::Join { base, per_point } => {
                Some((base + f64::from(sentiment) * per_point).clamp(0.0, 1.0))
            }
        }
    }
}
