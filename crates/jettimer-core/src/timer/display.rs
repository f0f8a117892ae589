//! Text rendering of the timer face.
//!
//! While editing each field carries its unit (`05h 30m 00s`); while running
//! the face reads like a clock (`05 : 30 : 00`).

use super::engine::TimerState;
use super::parts::TimeField;
use super::sweep::FULL_SWEEP;

const ARC_FILLED: char = '█';
const ARC_EMPTY: char = '░';

pub fn field_label(state: &TimerState, field: TimeField) -> String {
    let value = state.parts().get(field);
    if state.editing {
        format!("{value:02}{}", field.suffix())
    } else {
        format!("{value:02}")
    }
}

pub fn clock_face(state: &TimerState) -> String {
    let labels: Vec<String> = TimeField::ALL
        .iter()
        .map(|&field| field_label(state, field))
        .collect();
    if state.editing {
        labels.join(" ")
    } else {
        labels.join(" : ")
    }
}

/// Horizontal bar standing in for the arc, `width` cells wide.
pub fn arc_bar(sweep_angle: f32, width: usize) -> String {
    let fraction = (sweep_angle / FULL_SWEEP).clamp(0.0, 1.0);
    let filled = ((width as f32) * fraction).round() as usize;
    let filled = filled.min(width);
    let mut bar = String::with_capacity(width * ARC_FILLED.len_utf8());
    bar.extend(std::iter::repeat(ARC_FILLED).take(filled));
    bar.extend(std::iter::repeat(ARC_EMPTY).take(width - filled));
    bar
}
