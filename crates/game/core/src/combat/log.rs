//! Append-only combat log and its indexed queries.
//!
//! Every resolved act, triggered-effect activation, and modifier application
//! is stamped with round, turn, actor, target, cast, and act index. The
//! engine reads the log back for "previous act" targeting, exhaust windows,
//! stop-on-miss halts, and shared-modifier short-circuits.

use crate::env::{ActTag, PreviousOutcome, TriggerEvent};
use crate::registry::{CastId, CharacterId, ModifierId};
use crate::stats::Element;

/// Outcome of one act against one target.
#[derive(Clone, Debug, Default, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ActRecord {
    pub kind: Option<ActTag>,
    pub success: bool,
    pub crit: bool,
    pub weak: bool,
    pub resist: bool,
    pub immune: bool,
    pub kill: bool,
    pub element: Option<Element>,
    /// Damage dealt or health restored.
    pub amount: i64,
}

impl ActRecord {
    pub fn new(kind: ActTag) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }

    pub fn matches(&self, outcome: PreviousOutcome) -> bool {
        match outcome {
            PreviousOutcome::Success => self.success,
            PreviousOutcome::Fail => !self.success,
            PreviousOutcome::Crit => self.crit,
            PreviousOutcome::Any => true,
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum LogRecord {
    Act(ActRecord),
    Trigger {
        modifier: ModifierId,
        entry: usize,
        event: TriggerEvent,
    },
    ModifierApplied {
        modifier: ModifierId,
        source: String,
    },
    /// A stop-on-miss act missed; later acts of the cast abort.
    Halt,
}

#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LogEntry {
    pub round: u32,
    pub turn: u32,
    pub actor: CharacterId,
    pub target: Option<CharacterId>,
    pub cast: Option<CastId>,
    pub act: Option<usize>,
    pub record: LogRecord,
}

/// Window inside which a modifier's trigger activations count once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Window {
    Turn { round: u32, turn: u32 },
    Act { cast: CastId, act: usize },
    Always,
}

#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct CombatLog {
    entries: Vec<LogEntry>,
}

impl CombatLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, entry: LogEntry) {
        self.entries.push(entry);
    }

    pub fn entries(&self) -> &[LogEntry] {
        &self.entries
    }

    /// Entries appended at or after `index`.
    pub fn since(&self, index: usize) -> &[LogEntry] {
        self.entries.get(index..).unwrap_or(&[])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn acts_of(&self, cast: CastId) -> impl Iterator<Item = (&LogEntry, &ActRecord)> {
        self.entries.iter().filter_map(move |entry| match &entry.record {
            LogRecord::Act(record) if entry.cast == Some(cast) => Some((entry, record)),
            _ => None,
        })
    }

    /// Targets of act `act` in `cast` whose outcome matches, in resolution order.
    pub fn act_targets(&self, cast: CastId, act: usize, outcome: PreviousOutcome) -> Vec<CharacterId> {
        let mut targets = Vec::new();
        for (entry, record) in self.acts_of(cast) {
            if entry.act != Some(act) || !record.matches(outcome) {
                continue;
            }
            if let Some(target) = entry.target
                && !targets.contains(&target)
            {
                targets.push(target);
            }
        }
        targets
    }

    /// Every target successfully hit by any act of `cast` so far.
    pub fn cast_hits(&self, cast: CastId) -> Vec<CharacterId> {
        let mut targets = Vec::new();
        for (entry, record) in self.acts_of(cast) {
            if let Some(target) = entry.target
                && record.success
                && !targets.contains(&target)
            {
                targets.push(target);
            }
        }
        targets
    }

    pub fn halted(&self, cast: CastId) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.cast == Some(cast) && matches!(entry.record, LogRecord::Halt))
    }

    /// Whether `modifier` already triggered inside `window`.
    pub fn triggered_in_window(&self, modifier: ModifierId, window: Window) -> bool {
        self.entries.iter().rev().any(|entry| {
            let LogRecord::Trigger { modifier: m, .. } = entry.record else {
                return false;
            };
            if m != modifier {
                return false;
            }
            match window {
                Window::Turn { round, turn } => entry.round == round && entry.turn == turn,
                Window::Act { cast, act } => entry.cast == Some(cast) && entry.act == Some(act),
                Window::Always => false,
            }
        })
    }

    /// Modifier with `source` already created by `cast`, if any.
    pub fn shared_modifier(&self, cast: CastId, source: &str) -> Option<ModifierId> {
        self.entries.iter().find_map(|entry| match &entry.record {
            LogRecord::ModifierApplied { modifier, source: s }
                if entry.cast == Some(cast) && s == source =>
            {
                Some(*modifier)
            }
            _ => None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn act(cast: u32, act: usize, target: u32, success: bool) -> LogEntry {
        LogEntry {
            round: 1,
            turn: 1,
            actor: CharacterId(1),
            target: Some(CharacterId(target)),
            cast: Some(CastId(cast)),
            act: Some(act),
            record: LogRecord::Act(ActRecord {
                success,
                ..ActRecord::new(ActTag::Attack)
            }),
        }
    }

    #[test]
    fn previous_act_queries_filter_by_outcome() {
        let mut log = CombatLog::new();
        log.push(act(9, 0, 2, true));
        log.push(act(9, 0, 3, false));
        log.push(act(10, 0, 4, true));

        assert_eq!(
            log.act_targets(CastId(9), 0, PreviousOutcome::Success),
            vec![CharacterId(2)]
        );
        assert_eq!(
            log.act_targets(CastId(9), 0, PreviousOutcome::Fail),
            vec![CharacterId(3)]
        );
        assert_eq!(log.cast_hits(CastId(9)), vec![CharacterId(2)]);
        assert!(!log.halted(CastId(9)));
    }

    #[test]
    fn trigger_windows() {
        let mut log = CombatLog::new();
        log.push(LogEntry {
            round: 2,
            turn: 3,
            actor: CharacterId(1),
            target: None,
            cast: Some(CastId(7)),
            act: Some(0),
            record: LogRecord::Trigger {
                modifier: ModifierId(5),
                entry: 0,
                event: TriggerEvent::AttackT,
            },
        });

        assert!(log.triggered_in_window(ModifierId(5), Window::Turn { round: 2, turn: 3 }));
        assert!(!log.triggered_in_window(ModifierId(5), Window::Turn { round: 2, turn: 4 }));
        assert!(log.triggered_in_window(ModifierId(5), Window::Act { cast: CastId(7), act: 0 }));
        assert!(!log.triggered_in_window(ModifierId(5), Window::Act { cast: CastId(7), act: 1 }));
        assert!(!log.triggered_in_window(ModifierId(5), Window::Always));
    }
}
