use std::io::Write;

use clap::Args;
use jettimer_core::timer::{arc_bar, clock_face};
use jettimer_core::{Config, CountdownDriver, Event, Gradient, TimeField, TimeParts, TimerState};
use tokio::sync::broadcast::error::RecvError;
use tracing::{info, warn};

#[derive(Args)]
pub struct RunArgs {
    /// Hours (defaults to preset.hours)
    #[arg(long)]
    hours: Option<u32>,
    /// Minutes (defaults to preset.minutes)
    #[arg(long)]
    minutes: Option<u32>,
    /// Seconds (defaults to preset.seconds)
    #[arg(long)]
    seconds: Option<u32>,
    /// Print events as JSON lines instead of drawing the face
    #[arg(long)]
    json: bool,
    /// Disable colored output
    #[arg(long)]
    no_color: bool,
}

struct Renderer {
    gradient: Gradient,
    arc_width: usize,
    color: bool,
}

impl Renderer {
    fn line(&self, state: &TimerState) -> String {
        let face = clock_face(state);
        let arc = arc_bar(state.sweep_angle, self.arc_width);
        match self.gradient.color(state.color_index) {
            Some(c) if self.color && !state.editing => {
                format!("\r\x1b[38;2;{};{};{}m{arc}\x1b[0m  {face}", c.r, c.g, c.b)
            }
            _ => format!("\r{arc}  {face}"),
        }
    }
}

pub fn run(args: RunArgs) -> Result<(), Box<dyn std::error::Error>> {
    let config = Config::load_or_default();
    let preset = config.preset()?;
    let parts = TimeParts::new(
        args.hours.unwrap_or(preset.hours),
        args.minutes.unwrap_or(preset.minutes),
        args.seconds.unwrap_or(preset.seconds),
    )?;
    let renderer = Renderer {
        gradient: config.gradient()?,
        arc_width: config.ui.arc_width as usize,
        color: config.ui.color && !args.no_color,
    };

    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    runtime.block_on(countdown(parts, &config, renderer, args.json))
}

async fn countdown(
    parts: TimeParts,
    config: &Config,
    renderer: Renderer,
    json: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let driver = CountdownDriver::new(config.driver_config(), renderer.gradient.len());
    for field in TimeField::ALL {
        driver.set(field, parts.get(field));
    }

    let mut events = driver.events();
    let mut state_rx = driver.subscribe();
    let mut stdout = std::io::stdout();

    if driver.start().is_none() {
        info!("duration is zero, nothing to count down");
        return Ok(());
    }

    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);
    let mut interrupted = false;

    loop {
        tokio::select! {
            result = &mut ctrl_c, if !interrupted => {
                interrupted = true;
                if let Err(e) = result {
                    warn!("cannot listen for Ctrl-C: {e}");
                    continue;
                }
                driver.cancel();
            }
            received = events.recv() => match received {
                Ok(event) => {
                    if json {
                        println!("{}", serde_json::to_string(&event)?);
                    }
                    if event.is_terminal() {
                        if !json {
                            writeln!(stdout, "{}", renderer.line(&driver.state()))?;
                            if let Event::CountdownCancelled { remaining_secs, .. } = event {
                                writeln!(stdout, "cancelled with {remaining_secs}s left")?;
                            } else {
                                writeln!(stdout, "done")?;
                            }
                        }
                        break;
                    }
                }
                Err(RecvError::Lagged(skipped)) => {
                    warn!(skipped, "event receiver lagged");
                }
                Err(RecvError::Closed) => break,
            },
            changed = state_rx.changed(), if !json => {
                if changed.is_err() {
                    break;
                }
                let state = *state_rx.borrow_and_update();
                write!(stdout, "{}", renderer.line(&state))?;
                stdout.flush()?;
            }
        }
    }
    Ok(())
}
