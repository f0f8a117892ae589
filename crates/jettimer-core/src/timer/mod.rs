mod display;
mod driver;
mod engine;
mod gradient;
mod parts;
mod sweep;

pub use display::{arc_bar, clock_face, field_label};
pub use driver::{CountdownDriver, DriverConfig};
pub use engine::{Mode, RunId, TimerEngine, TimerState};
pub use gradient::{default_progress_colors, Gradient, Rgb};
pub use parts::{TimeField, TimeParts, SECONDS_PER_HOUR, SECONDS_PER_MINUTE};
pub use sweep::{SweepAnimation, FULL_SWEEP};
