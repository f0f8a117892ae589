//! # JetTimer Core Library
//!
//! This library provides the business logic for the JetTimer countdown timer.
//! Front ends (the CLI binary, or any other renderer) only read published
//! state and call the entry points below.
//!
//! ## Architecture
//!
//! - **Timer Engine**: A two-state (Editing/Running) state machine that the
//!   caller advances with one-second ticks and animation frames
//! - **Countdown Driver**: Runs the engine in real time on tokio and publishes
//!   an observable [`TimerState`] plus a stream of [`Event`]s
//! - **Storage**: TOML-based configuration. Timer state is never persisted.
//!
//! ## Key Components
//!
//! - [`TimerEngine`]: Core countdown state machine
//! - [`CountdownDriver`]: Async driver with `start`/`cancel`/`toggle`
//! - [`SweepAnimation`]: Linear interpolation of the progress arc
//! - [`Config`]: Application configuration management

pub mod error;
pub mod events;
pub mod storage;
pub mod timer;

pub use error::{ConfigError, CoreError, ValidationError};
pub use events::Event;
pub use storage::Config;
pub use timer::{
    CountdownDriver, DriverConfig, Gradient, Mode, Rgb, RunId, SweepAnimation, TimeField,
    TimeParts, TimerEngine, TimerState,
};
