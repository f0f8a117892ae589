//! Integration tests for the real-time countdown driver.
//!
//! All tests run on tokio's paused clock, so the seconds below are virtual.

use std::time::Duration;

use jettimer_core::{CountdownDriver, DriverConfig, Event, Mode, TimeField, TimeParts};
use tokio::sync::broadcast::error::TryRecvError;

fn driver_with(parts: TimeParts) -> CountdownDriver {
    let driver = CountdownDriver::new(DriverConfig::default(), 4);
    for field in TimeField::ALL {
        driver.set(field, parts.get(field));
    }
    driver
}

fn drain(events: &mut tokio::sync::broadcast::Receiver<Event>) -> Vec<Event> {
    let mut out = Vec::new();
    loop {
        match events.try_recv() {
            Ok(event) => out.push(event),
            Err(TryRecvError::Lagged(_)) => continue,
            Err(_) => break,
        }
    }
    out
}

#[tokio::test(start_paused = true)]
async fn test_five_second_run_completes() {
    let driver = driver_with(TimeParts::new(0, 0, 5).unwrap());
    let mut events = driver.events();

    assert!(matches!(
        driver.toggle(),
        Some(Event::CountdownStarted { total_secs: 5, .. })
    ));
    assert_eq!(driver.state().mode(), Mode::Running);

    driver.wait_until_editing().await;

    let events = drain(&mut events);
    let ticks: Vec<u64> = events
        .iter()
        .filter_map(|e| match e {
            Event::CountdownTicked { remaining_secs, .. } => Some(*remaining_secs),
            _ => None,
        })
        .collect();
    assert_eq!(ticks, vec![4, 3, 2, 1]);
    assert!(matches!(
        events.last(),
        Some(Event::CountdownFinished { total_secs: 5, .. })
    ));

    let state = driver.state();
    assert!(state.editing);
    assert_eq!(state.sweep_angle, 360.0);
    assert_eq!(state.parts(), TimeParts::default());
}

#[tokio::test(start_paused = true)]
async fn test_run_takes_its_full_duration() {
    let driver = driver_with(TimeParts::new(0, 0, 3).unwrap());
    let started = tokio::time::Instant::now();
    driver.start();
    driver.wait_until_editing().await;
    assert_eq!(started.elapsed(), Duration::from_secs(3));
}

#[tokio::test(start_paused = true)]
async fn test_fields_count_down_each_second() {
    let driver = driver_with(TimeParts::new(0, 1, 2).unwrap());
    driver.start();

    tokio::time::sleep(Duration::from_millis(500)).await;
    assert_eq!(driver.state().parts(), TimeParts::new(0, 1, 2).unwrap());

    tokio::time::sleep(Duration::from_secs(3)).await;
    assert_eq!(driver.state().parts(), TimeParts::new(0, 0, 59).unwrap());
    assert!(driver.state().sweep_angle < 360.0);
}

#[tokio::test(start_paused = true)]
async fn test_toggle_mid_run_discards_remaining_ticks() {
    let driver = driver_with(TimeParts::new(0, 0, 10).unwrap());
    let mut events = driver.events();
    driver.toggle();

    tokio::time::sleep(Duration::from_millis(3500)).await;
    assert!(driver.state().sweep_angle < 360.0);

    assert!(matches!(
        driver.toggle(),
        Some(Event::CountdownCancelled {
            remaining_secs: 7,
            ..
        })
    ));
    let state = driver.state();
    assert!(state.editing);
    assert_eq!(state.sweep_angle, 360.0);

    drain(&mut events);
    tokio::time::sleep(Duration::from_secs(10)).await;
    assert!(drain(&mut events).is_empty());
    assert!(driver.state().editing);
    assert_eq!(driver.state().sweep_angle, 360.0);
}

#[tokio::test(start_paused = true)]
async fn test_restart_after_cancel_runs_cleanly() {
    let driver = driver_with(TimeParts::new(0, 0, 4).unwrap());
    driver.start();
    tokio::time::sleep(Duration::from_millis(1500)).await;
    driver.cancel();

    driver.set(TimeField::Seconds, 2);
    let mut events = driver.events();
    driver.start();
    driver.wait_until_editing().await;

    let events = drain(&mut events);
    let run_ids: Vec<_> = events.iter().filter_map(Event::run_id).collect();
    assert!(run_ids.windows(2).all(|w| w[0] == w[1]));
    assert!(events.last().map(Event::is_terminal).unwrap_or(false));
}

#[tokio::test(start_paused = true)]
async fn test_color_index_cycles_while_running() {
    let driver = driver_with(TimeParts::new(0, 0, 2).unwrap());
    let before = driver.state().color_index;
    driver.start();
    tokio::time::sleep(Duration::from_millis(650)).await;
    assert_eq!(driver.state().color_index, (before + 2) % 4);
}

#[tokio::test(start_paused = true)]
async fn test_zero_duration_toggle_is_silent() {
    let driver = CountdownDriver::new(DriverConfig::default(), 4);
    let mut events = driver.events();
    assert!(driver.toggle().is_none());
    assert!(drain(&mut events).is_empty());
    assert!(driver.state().editing);
}
