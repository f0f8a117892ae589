use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::timer::{RunId, TimeField, TimerState};

/// Every state change in the engine produces an Event.
/// Renderers watch the state channel; everything else listens for these.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    /// A field was edited while in the editing state.
    FieldChanged {
        field: TimeField,
        value: u32,
        at: DateTime<Utc>,
    },
    CountdownStarted {
        run_id: RunId,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// One second elapsed; the fields now show `remaining_secs`.
    CountdownTicked {
        run_id: RunId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    CountdownFinished {
        run_id: RunId,
        total_secs: u64,
        at: DateTime<Utc>,
    },
    /// The run was stopped early and its remaining time dropped.
    CountdownCancelled {
        run_id: RunId,
        remaining_secs: u64,
        at: DateTime<Utc>,
    },
    StateSnapshot {
        state: TimerState,
        remaining_secs: Option<u64>,
        at: DateTime<Utc>,
    },
}

impl Event {
    pub fn run_id(&self) -> Option<RunId> {
        match self {
            Event::CountdownStarted { run_id, .. }
            | Event::CountdownTicked { run_id, .. }
            | Event::CountdownFinished { run_id, .. }
            | Event::CountdownCancelled { run_id, .. } => Some(*run_id),
            Event::FieldChanged { .. } | Event::StateSnapshot { .. } => None,
        }
    }

    /// True for the events that end a run.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            Event::CountdownFinished { .. } | Event::CountdownCancelled { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn serializes_with_type_tag() {
        let event = Event::CountdownTicked {
            run_id: RunId(3),
            remaining_secs: 42,
            at: Utc::now(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "CountdownTicked");
        assert_eq!(json["run_id"], 3);
        assert_eq!(json["remaining_secs"], 42);
    }

    #[test]
    fn terminal_events() {
        let at = Utc::now();
        let finished = Event::CountdownFinished {
            run_id: RunId(1),
            total_secs: 5,
            at,
        };
        let edited = Event::FieldChanged {
            field: TimeField::Hours,
            value: 2,
            at,
        };
        assert!(finished.is_terminal());
        assert_eq!(finished.run_id(), Some(RunId(1)));
        assert!(!edited.is_terminal());
        assert_eq!(edited.run_id(), None);
    }
}
