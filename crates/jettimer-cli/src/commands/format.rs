use clap::Args;
use jettimer_core::timer::clock_face;
use jettimer_core::{TimeParts, TimerState};

#[derive(Args)]
pub struct FormatArgs {
    #[arg(long, default_value = "0")]
    hours: u32,
    #[arg(long, default_value = "0")]
    minutes: u32,
    #[arg(long, default_value = "0")]
    seconds: u32,
    /// Render the running layout instead of the editing one
    #[arg(long)]
    running: bool,
}

pub fn run(args: FormatArgs) -> Result<(), Box<dyn std::error::Error>> {
    let parts = TimeParts::new(args.hours, args.minutes, args.seconds)?;
    let state = TimerState {
        editing: !args.running,
        hours: parts.hours,
        minutes: parts.minutes,
        seconds: parts.seconds,
        ..TimerState::default()
    };
    println!("{}", clock_face(&state));
    Ok(())
}
