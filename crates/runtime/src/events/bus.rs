//! Topic-based event bus implementation.

use serde::{Deserialize, Serialize};
use skirmish_core::CombatEvent;
use tokio::sync::broadcast;

/// Topics for event routing
#[derive(Debug, Clone, Copy, Hash, Eq, PartialEq, Serialize, Deserialize)]
pub enum Topic {
    /// Action, damage, modifier, condition, and life changes
    Combat,
    /// Round and turn management events
    Turn,
    /// Rendered flavor text
    Narrative,
}

/// A published combat event with its position in the session.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub sequence: u64,
    pub event: CombatEvent,
}

impl Event {
    pub fn topic(&self) -> Topic {
        match self.event {
            CombatEvent::RoundStarted { .. }
            | CombatEvent::TurnStarted { .. }
            | CombatEvent::TurnEnded { .. }
            | CombatEvent::TurnPassed { .. }
            | CombatEvent::CombatEnded { .. } => Topic::Turn,
            CombatEvent::Narrative { .. } => Topic::Narrative,
            _ => Topic::Combat,
        }
    }
}

/// Topic-based event bus
///
/// Allows consumers to subscribe to specific topics and only receive
/// events they care about. Publishing never blocks; a subscriber that falls
/// more than the channel capacity behind observes `RecvError::Lagged`.
#[derive(Clone)]
pub struct EventBus {
    combat: broadcast::Sender<Event>,
    turn: broadcast::Sender<Event>,
    narrative: broadcast::Sender<Event>,
}

impl EventBus {
    /// Creates a new event bus with default capacity for each topic
    pub fn new() -> Self {
        Self::with_capacity(256)
    }

    /// Creates a new event bus with specified capacity per topic
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            combat: broadcast::channel(capacity).0,
            turn: broadcast::channel(capacity).0,
            narrative: broadcast::channel(capacity).0,
        }
    }

    /// Publish an event to its corresponding topic
    pub fn publish(&self, event: Event) {
        let topic = event.topic();
        if self.sender(topic).send(event).is_err() {
            // No subscribers for this topic - this is normal, not an error
            tracing::trace!("No subscribers for topic {:?}", topic);
        }
    }

    /// Subscribe to a specific topic
    pub fn subscribe(&self, topic: Topic) -> broadcast::Receiver<Event> {
        self.sender(topic).subscribe()
    }

    /// Subscribe to several topics at once
    pub fn subscribe_multiple(&self, topics: &[Topic]) -> Vec<(Topic, broadcast::Receiver<Event>)> {
        topics
            .iter()
            .map(|&topic| (topic, self.subscribe(topic)))
            .collect()
    }

    fn sender(&self, topic: Topic) -> &broadcast::Sender<Event> {
        match topic {
            Topic::Combat => &self.combat,
            Topic::Turn => &self.turn,
            Topic::Narrative => &self.narrative,
        }
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(sequence: u64, event: CombatEvent) -> Event {
        Event { sequence, event }
    }

    #[test]
    fn subscribers_only_see_their_topic() {
        let bus = EventBus::new();
        let mut turns = bus.subscribe(Topic::Turn);
        let mut lines = bus.subscribe(Topic::Narrative);

        bus.publish(event(0, CombatEvent::RoundStarted { round: 1 }));
        bus.publish(event(1, CombatEvent::Narrative { text: "hi".into() }));

        assert_eq!(turns.try_recv().unwrap().sequence, 0);
        assert!(turns.try_recv().is_err());
        assert_eq!(lines.try_recv().unwrap().sequence, 1);
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = EventBus::with_capacity(1);
        bus.publish(event(0, CombatEvent::RoundStarted { round: 1 }));
        bus.publish(event(1, CombatEvent::RoundStarted { round: 2 }));
    }
}
