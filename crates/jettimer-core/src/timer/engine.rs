//! Countdown engine implementation.
//!
//! The engine is a plain state machine. It does not own threads or timers -
//! the caller feeds it one-second ticks and animation frames. The async
//! [`CountdownDriver`](super::CountdownDriver) is the usual caller.
//!
//! ## State Transitions
//!
//! ```text
//! Editing -> Running -> Editing
//! ```
//!
//! A run ends when the last tick lands or when it is cancelled. Either way the
//! arc snaps back to a full circle and the fields read `00:00:00`.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = TimerEngine::new();
//! engine.increment(TimeField::Seconds);
//! engine.start(Instant::now());
//! let run = engine.run_id().unwrap();
//! // Once per second:
//! engine.tick(run); // Returns Some(Event::CountdownFinished) at zero
//! ```

use std::fmt;
use std::time::{Duration, Instant};

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use super::gradient::next_color_index;
use super::parts::{TimeField, TimeParts};
use super::sweep::{SweepAnimation, FULL_SWEEP};
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Editing,
    Running,
}

/// Identifies one run so late ticks from an old run are ignored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunId(pub u64);

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Everything the view layer renders.
///
/// While editing, the time fields hold the duration of the next run.
/// While running, they hold the remaining time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimerState {
    pub editing: bool,
    /// Degrees of arc remaining, 360 down to 0.
    pub sweep_angle: f32,
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
    /// Position in the accent gradient.
    #[serde(default)]
    pub color_index: usize,
}

impl Default for TimerState {
    fn default() -> Self {
        Self {
            editing: true,
            sweep_angle: FULL_SWEEP,
            hours: 0,
            minutes: 0,
            seconds: 0,
            color_index: 0,
        }
    }
}

impl TimerState {
    pub fn mode(&self) -> Mode {
        if self.editing {
            Mode::Editing
        } else {
            Mode::Running
        }
    }

    pub fn parts(&self) -> TimeParts {
        TimeParts {
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
        }
    }

    fn set_parts(&mut self, parts: TimeParts) {
        self.hours = parts.hours;
        self.minutes = parts.minutes;
        self.seconds = parts.seconds;
    }
}

#[derive(Debug, Clone)]
struct Run {
    id: RunId,
    total_secs: u64,
    remaining_secs: u64,
    sweep: SweepAnimation,
    started_at: Instant,
}

/// Core countdown engine.
#[derive(Debug, Clone)]
pub struct TimerEngine {
    state: TimerState,
    run: Option<Run>,
    next_run_id: u64,
    gradient_len: usize,
}

impl Default for TimerEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl TimerEngine {
    /// Create an engine in the `Editing` state with a zero duration.
    pub fn new() -> Self {
        Self::with_gradient_len(0)
    }

    /// Create an engine whose color index cycles through `gradient_len` colors.
    pub fn with_gradient_len(gradient_len: usize) -> Self {
        Self {
            state: TimerState::default(),
            run: None,
            next_run_id: 1,
            gradient_len,
        }
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        self.state
    }

    pub fn mode(&self) -> Mode {
        self.state.mode()
    }

    pub fn is_running(&self) -> bool {
        self.run.is_some()
    }

    pub fn run_id(&self) -> Option<RunId> {
        self.run.as_ref().map(|r| r.id)
    }

    pub fn remaining_secs(&self) -> Option<u64> {
        self.run.as_ref().map(|r| r.remaining_secs)
    }

    /// Build a full state snapshot event.
    pub fn snapshot(&self) -> Event {
        Event::StateSnapshot {
            state: self.state,
            remaining_secs: self.remaining_secs(),
            at: Utc::now(),
        }
    }

    // ── Editing ──────────────────────────────────────────────────────

    /// Step a field up by one. No-op at the field's maximum or while running.
    pub fn increment(&mut self, field: TimeField) -> Option<Event> {
        let next = self.state.parts().get(field).checked_add(1)?;
        self.set(field, next)
    }

    /// Step a field down by one. No-op at zero or while running.
    pub fn decrement(&mut self, field: TimeField) -> Option<Event> {
        let next = self.state.parts().get(field).checked_sub(1)?;
        self.set(field, next)
    }

    /// Set a field directly. Out-of-range values are ignored.
    pub fn set(&mut self, field: TimeField, value: u32) -> Option<Event> {
        if !self.state.editing {
            debug!(%field, value, "ignoring edit while running");
            return None;
        }
        if !field.contains(value) {
            debug!(%field, value, max = field.max(), "ignoring out-of-range edit");
            return None;
        }
        if self.state.parts().get(field) == value {
            return None;
        }
        self.state.set_parts(self.state.parts().with(field, value));
        Some(Event::FieldChanged {
            field,
            value,
            at: Utc::now(),
        })
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start when editing, cancel when running.
    pub fn toggle(&mut self, now: Instant) -> Option<Event> {
        if self.state.editing {
            self.start(now)
        } else {
            self.cancel()
        }
    }

    /// Begin counting down the configured duration.
    ///
    /// Returns `None` when already running or when the duration is zero.
    pub fn start(&mut self, now: Instant) -> Option<Event> {
        if !self.state.editing {
            return None;
        }
        let total_secs = self.state.parts().total_seconds();
        if total_secs == 0 {
            debug!("ignoring start with zero duration");
            return None;
        }

        let id = RunId(self.next_run_id);
        self.next_run_id += 1;
        self.run = Some(Run {
            id,
            total_secs,
            remaining_secs: total_secs,
            sweep: SweepAnimation::countdown(Duration::from_secs(total_secs)),
            started_at: now,
        });
        self.state.editing = false;
        self.state.sweep_angle = FULL_SWEEP;

        info!(run = %id, total_secs, "countdown started");
        Some(Event::CountdownStarted {
            run_id: id,
            total_secs,
            at: Utc::now(),
        })
    }

    /// Abandon the current run. The remaining time is discarded.
    pub fn cancel(&mut self) -> Option<Event> {
        let run = self.run.take()?;
        self.return_to_editing();
        info!(run = %run.id, remaining_secs = run.remaining_secs, "countdown cancelled");
        Some(Event::CountdownCancelled {
            run_id: run.id,
            remaining_secs: run.remaining_secs,
            at: Utc::now(),
        })
    }

    /// Advance the given run by one second.
    ///
    /// Returns `None` if `run_id` is not the active run.
    pub fn tick(&mut self, run_id: RunId) -> Option<Event> {
        let run = self.run.as_mut().filter(|r| r.id == run_id)?;
        run.remaining_secs = run.remaining_secs.saturating_sub(1);
        let remaining_secs = run.remaining_secs;
        let total_secs = run.total_secs;

        if remaining_secs == 0 {
            self.run = None;
            self.return_to_editing();
            info!(run = %run_id, total_secs, "countdown finished");
            return Some(Event::CountdownFinished {
                run_id,
                total_secs,
                at: Utc::now(),
            });
        }

        self.state
            .set_parts(TimeParts::from_total_seconds(remaining_secs));
        Some(Event::CountdownTicked {
            run_id,
            remaining_secs,
            at: Utc::now(),
        })
    }

    /// Recompute the sweep angle for `now`. Returns the new angle.
    pub fn animate(&mut self, run_id: RunId, now: Instant) -> Option<f32> {
        let run = self.run.as_ref().filter(|r| r.id == run_id)?;
        let angle = run
            .sweep
            .value_at(now.saturating_duration_since(run.started_at));
        self.state.sweep_angle = angle;
        Some(angle)
    }

    /// Move to the next accent color. Returns the new index.
    pub fn advance_color(&mut self, run_id: RunId) -> Option<usize> {
        self.run.as_ref().filter(|r| r.id == run_id)?;
        self.state.color_index = next_color_index(self.state.color_index, self.gradient_len);
        Some(self.state.color_index)
    }

    // ── Internal ─────────────────────────────────────────────────────

    fn return_to_editing(&mut self) {
        self.state.editing = true;
        self.state.sweep_angle = FULL_SWEEP;
        self.state.set_parts(TimeParts::default());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn engine_with(parts: TimeParts) -> TimerEngine {
        let mut engine = TimerEngine::new();
        for field in TimeField::ALL {
            engine.set(field, parts.get(field));
        }
        engine
    }

    #[test]
    fn starts_in_editing_with_full_arc() {
        let engine = TimerEngine::new();
        assert_eq!(engine.mode(), Mode::Editing);
        assert_eq!(engine.state().sweep_angle, 360.0);
        assert_eq!(engine.state().parts(), TimeParts::default());
        assert!(engine.run_id().is_none());
    }

    #[test]
    fn increment_stops_at_max() {
        let mut engine = engine_with(TimeParts::new(23, 59, 59).unwrap());
        for field in TimeField::ALL {
            assert!(engine.increment(field).is_none());
        }
        assert_eq!(engine.state().parts(), TimeParts::new(23, 59, 59).unwrap());
    }

    #[test]
    fn decrement_stops_at_zero() {
        let mut engine = TimerEngine::new();
        for field in TimeField::ALL {
            assert!(engine.decrement(field).is_none());
        }
        assert_eq!(engine.state().parts(), TimeParts::default());
    }

    #[test]
    fn increment_emits_field_changed() {
        let mut engine = TimerEngine::new();
        match engine.increment(TimeField::Minutes) {
            Some(Event::FieldChanged { field, value, .. }) => {
                assert_eq!(field, TimeField::Minutes);
                assert_eq!(value, 1);
            }
            other => panic!("Expected FieldChanged, got {other:?}"),
        }
    }

    #[test]
    fn toggle_with_zero_duration_is_noop() {
        let mut engine = TimerEngine::new();
        assert!(engine.toggle(Instant::now()).is_none());
        assert_eq!(engine.mode(), Mode::Editing);
        assert_eq!(engine.state().sweep_angle, 360.0);
    }

    #[test]
    fn five_ticks_finish_the_run() {
        let mut engine = engine_with(TimeParts::new(0, 0, 5).unwrap());
        assert!(matches!(
            engine.toggle(Instant::now()),
            Some(Event::CountdownStarted { total_secs: 5, .. })
        ));
        assert_eq!(engine.mode(), Mode::Running);
        let run = engine.run_id().unwrap();

        for expected in (1..=4).rev() {
            match engine.tick(run) {
                Some(Event::CountdownTicked { remaining_secs, .. }) => {
                    assert_eq!(remaining_secs, expected);
                    assert_eq!(engine.state().seconds as u64, expected);
                }
                other => panic!("Expected CountdownTicked, got {other:?}"),
            }
        }
        assert!(matches!(
            engine.tick(run),
            Some(Event::CountdownFinished { total_secs: 5, .. })
        ));

        let state = engine.state();
        assert!(state.editing);
        assert_eq!(state.sweep_angle, 360.0);
        assert_eq!(state.parts(), TimeParts::default());
        assert!(engine.tick(run).is_none());
    }

    #[test]
    fn ticks_carry_across_minutes_and_hours() {
        let mut engine = engine_with(TimeParts::new(1, 0, 0).unwrap());
        engine.start(Instant::now());
        let run = engine.run_id().unwrap();
        engine.tick(run);
        assert_eq!(engine.state().parts(), TimeParts::new(0, 59, 59).unwrap());
    }

    #[test]
    fn toggle_mid_run_cancels_immediately() {
        let now = Instant::now();
        let mut engine = engine_with(TimeParts::new(0, 1, 0).unwrap());
        engine.toggle(now);
        let run = engine.run_id().unwrap();
        engine.tick(run);
        engine.animate(run, now + Duration::from_secs(30));
        assert_eq!(engine.state().sweep_angle, 180.0);

        match engine.toggle(now) {
            Some(Event::CountdownCancelled { remaining_secs, .. }) => assert_eq!(remaining_secs, 59),
            other => panic!("Expected CountdownCancelled, got {other:?}"),
        }
        let state = engine.state();
        assert!(state.editing);
        assert_eq!(state.sweep_angle, 360.0);
        assert!(engine.tick(run).is_none());
        assert!(engine.animate(run, now).is_none());
    }

    #[test]
    fn stale_run_id_is_ignored() {
        let now = Instant::now();
        let mut engine = engine_with(TimeParts::new(0, 0, 10).unwrap());
        engine.start(now);
        let old = engine.run_id().unwrap();
        engine.cancel();
        engine.set(TimeField::Seconds, 10);
        engine.start(now);
        let new = engine.run_id().unwrap();
        assert_ne!(old, new);

        assert!(engine.tick(old).is_none());
        assert_eq!(engine.remaining_secs(), Some(10));
        assert!(engine.tick(new).is_some());
        assert_eq!(engine.remaining_secs(), Some(9));
    }

    #[test]
    fn edits_are_ignored_while_running() {
        let mut engine = engine_with(TimeParts::new(0, 0, 3).unwrap());
        engine.start(Instant::now());
        assert!(engine.increment(TimeField::Hours).is_none());
        assert!(engine.set(TimeField::Minutes, 5).is_none());
        assert_eq!(engine.state().parts(), TimeParts::new(0, 0, 3).unwrap());
    }

    #[test]
    fn color_index_cycles_only_while_running() {
        let mut engine = TimerEngine::with_gradient_len(2);
        engine.set(TimeField::Seconds, 3);
        assert!(engine.advance_color(RunId(1)).is_none());
        engine.start(Instant::now());
        let run = engine.run_id().unwrap();
        assert_eq!(engine.advance_color(run), Some(1));
        assert_eq!(engine.advance_color(run), Some(0));
    }

    #[test]
    fn snapshot_returns_valid_event() {
        let engine = engine_with(TimeParts::new(0, 2, 0).unwrap());
        match engine.snapshot() {
            Event::StateSnapshot {
                state,
                remaining_secs,
                ..
            } => {
                assert!(state.editing);
                assert_eq!(state.minutes, 2);
                assert_eq!(remaining_secs, None);
            }
            _ => panic!("Expected StateSnapshot"),
        }
    }
}
