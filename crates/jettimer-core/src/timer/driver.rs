//! Async countdown driver.
//!
//! Wraps a [`TimerEngine`] and runs it in real time on tokio. State is
//! published through a `watch` channel for renderers and every transition
//! is broadcast as an [`Event`].
//!
//! One spawned task per run drives three independent progressions with
//! `tokio::select!`: the one-second tick, the sweep animation frames and
//! the gradient color cycle. Cancelling aborts that task.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use tokio::sync::{broadcast, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, warn};

use super::engine::{RunId, TimerEngine, TimerState};
use super::parts::TimeField;
use crate::events::Event;

const EVENT_CAPACITY: usize = 64;

/// Timing knobs for the driver.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DriverConfig {
    /// Interval between countdown steps. One second in normal use.
    pub tick: Duration,
    /// Interval between sweep angle updates.
    pub frame: Duration,
    /// Interval between accent color changes.
    pub color_cycle: Duration,
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            tick: Duration::from_secs(1),
            frame: Duration::from_millis(16),
            color_cycle: Duration::from_millis(300),
        }
    }
}

struct Shared {
    engine: Mutex<TimerEngine>,
    state_tx: watch::Sender<TimerState>,
    event_tx: broadcast::Sender<Event>,
}

impl Shared {
    fn engine(&self) -> MutexGuard<'_, TimerEngine> {
        self.engine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn publish(&self, engine: &TimerEngine, event: Option<Event>) {
        self.state_tx.send_replace(engine.state());
        if let Some(event) = event {
            // No subscribers is fine.
            let _ = self.event_tx.send(event);
        }
    }

    /// Returns false once the run is over.
    fn on_tick(&self, run_id: RunId) -> bool {
        let mut engine = self.engine();
        match engine.tick(run_id) {
            Some(event) => {
                let finished = event.is_terminal();
                self.publish(&engine, Some(event));
                !finished
            }
            None => false,
        }
    }

    fn on_frame(&self, run_id: RunId, now: Instant) -> bool {
        let mut engine = self.engine();
        if engine.animate(run_id, now.into_std()).is_none() {
            return false;
        }
        self.publish(&engine, None);
        true
    }

    fn on_color(&self, run_id: RunId) -> bool {
        let mut engine = self.engine();
        if engine.advance_color(run_id).is_none() {
            return false;
        }
        self.publish(&engine, None);
        true
    }
}

/// Real-time front end of the countdown engine.
///
/// Methods that start a run spawn onto the current tokio runtime and must be
/// called from within one.
pub struct CountdownDriver {
    shared: Arc<Shared>,
    config: DriverConfig,
    task: Mutex<Option<JoinHandle<()>>>,
}

impl CountdownDriver {
    pub fn new(config: DriverConfig, gradient_len: usize) -> Self {
        let engine = TimerEngine::with_gradient_len(gradient_len);
        let (state_tx, _) = watch::channel(engine.state());
        let (event_tx, _) = broadcast::channel(EVENT_CAPACITY);
        Self {
            shared: Arc::new(Shared {
                engine: Mutex::new(engine),
                state_tx,
                event_tx,
            }),
            config,
            task: Mutex::new(None),
        }
    }

    // ── Observation ──────────────────────────────────────────────────

    pub fn state(&self) -> TimerState {
        *self.shared.state_tx.borrow()
    }

    /// Receiver that always holds the latest state.
    pub fn subscribe(&self) -> watch::Receiver<TimerState> {
        self.shared.state_tx.subscribe()
    }

    /// Receiver for every event emitted from now on.
    pub fn events(&self) -> broadcast::Receiver<Event> {
        self.shared.event_tx.subscribe()
    }

    pub fn snapshot(&self) -> Event {
        self.shared.engine().snapshot()
    }

    /// Resolves once the driver is back in the editing state.
    pub async fn wait_until_editing(&self) {
        let mut rx = self.subscribe();
        // The sender lives in `self`, so the channel cannot close here.
        let _ = rx.wait_for(|s| s.editing).await;
    }

    // ── Editing ──────────────────────────────────────────────────────

    pub fn increment(&self, field: TimeField) -> bool {
        self.edit(|engine| engine.increment(field))
    }

    pub fn decrement(&self, field: TimeField) -> bool {
        self.edit(|engine| engine.decrement(field))
    }

    pub fn set(&self, field: TimeField, value: u32) -> bool {
        self.edit(|engine| engine.set(field, value))
    }

    fn edit<F>(&self, op: F) -> bool
    where
        F: FnOnce(&mut TimerEngine) -> Option<Event>,
    {
        let mut engine = self.shared.engine();
        let event = op(&mut engine);
        let changed = event.is_some();
        if changed {
            self.shared.publish(&engine, event);
        }
        changed
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start when editing, cancel when running.
    pub fn toggle(&self) -> Option<Event> {
        let running = self.shared.engine().is_running();
        if running {
            self.cancel()
        } else {
            self.start()
        }
    }

    /// Start counting down the configured duration.
    ///
    /// Returns `None` without side effects if the duration is zero or a run
    /// is already in progress.
    pub fn start(&self) -> Option<Event> {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        let (event, run_id) = {
            let mut engine = self.shared.engine();
            let event = engine.start(Instant::now().into_std())?;
            let run_id = engine.run_id()?;
            self.shared.publish(&engine, Some(event.clone()));
            (event, run_id)
        };

        if let Some(stale) = task.take() {
            warn!("aborting leftover countdown task");
            stale.abort();
        }
        let shared = Arc::clone(&self.shared);
        *task = Some(tokio::spawn(run_countdown(shared, run_id, self.config)));
        Some(event)
    }

    /// Stop the current run immediately, discarding the remaining time.
    pub fn cancel(&self) -> Option<Event> {
        let mut task = self.task.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
        let mut engine = self.shared.engine();
        let event = engine.cancel()?;
        self.shared.publish(&engine, Some(event.clone()));
        Some(event)
    }
}

impl Drop for CountdownDriver {
    fn drop(&mut self) {
        let task = self.task.get_mut().unwrap_or_else(PoisonError::into_inner);
        if let Some(handle) = task.take() {
            handle.abort();
        }
    }
}

async fn run_countdown(shared: Arc<Shared>, run_id: RunId, config: DriverConfig) {
    let start = Instant::now();
    let mut ticks = interval_at(start + config.tick, config.tick);
    let mut frames = interval_at(start + config.frame, config.frame);
    frames.set_missed_tick_behavior(MissedTickBehavior::Skip);
    let mut colors = interval_at(start + config.color_cycle, config.color_cycle);
    colors.set_missed_tick_behavior(MissedTickBehavior::Skip);

    loop {
        let keep_going = tokio::select! {
            biased;
            _ = ticks.tick() => shared.on_tick(run_id),
            now = frames.tick() => shared.on_frame(run_id, now),
            _ = colors.tick() => shared.on_color(run_id),
        };
        if !keep_going {
            break;
        }
    }
    debug!(run = %run_id, "countdown task exited");
}
