use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

pub const SECONDS_PER_HOUR: u64 = 3600;
pub const SECONDS_PER_MINUTE: u64 = 60;

/// One of the three editable clock fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeField {
    Hours,
    Minutes,
    Seconds,
}

impl TimeField {
    pub const ALL: [TimeField; 3] = [TimeField::Hours, TimeField::Minutes, TimeField::Seconds];

    /// Largest value the field accepts (inclusive).
    pub fn max(self) -> u32 {
        match self {
            TimeField::Hours => 23,
            TimeField::Minutes | TimeField::Seconds => 59,
        }
    }

    pub fn contains(self, value: u32) -> bool {
        value <= self.max()
    }

    /// Unit suffix shown next to the value while editing.
    pub fn suffix(self) -> &'static str {
        match self {
            TimeField::Hours => "h",
            TimeField::Minutes => "m",
            TimeField::Seconds => "s",
        }
    }
}

impl fmt::Display for TimeField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TimeField::Hours => "hours",
            TimeField::Minutes => "minutes",
            TimeField::Seconds => "seconds",
        };
        f.write_str(name)
    }
}

/// An hours/minutes/seconds triple.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeParts {
    pub hours: u32,
    pub minutes: u32,
    pub seconds: u32,
}

impl TimeParts {
    /// Build a validated triple.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::OutOfRange`] for the first field outside its range.
    pub fn new(hours: u32, minutes: u32, seconds: u32) -> Result<Self, ValidationError> {
        let parts = Self {
            hours,
            minutes,
            seconds,
        };
        for field in TimeField::ALL {
            let value = parts.get(field);
            if !field.contains(value) {
                return Err(ValidationError::OutOfRange {
                    field,
                    value,
                    max: field.max(),
                });
            }
        }
        Ok(parts)
    }

    pub fn total_seconds(&self) -> u64 {
        u64::from(self.hours) * SECONDS_PER_HOUR
            + u64::from(self.minutes) * SECONDS_PER_MINUTE
            + u64::from(self.seconds)
    }

    /// Decompose a second count. Hours are not wrapped at 24.
    pub fn from_total_seconds(total: u64) -> Self {
        let hours = total / SECONDS_PER_HOUR;
        let rest = total % SECONDS_PER_HOUR;
        Self {
            hours: u32::try_from(hours).unwrap_or(u32::MAX),
            minutes: (rest / SECONDS_PER_MINUTE) as u32,
            seconds: (rest % SECONDS_PER_MINUTE) as u32,
        }
    }

    pub fn get(&self, field: TimeField) -> u32 {
        match field {
            TimeField::Hours => self.hours,
            TimeField::Minutes => self.minutes,
            TimeField::Seconds => self.seconds,
        }
    }

    pub(crate) fn with(mut self, field: TimeField, value: u32) -> Self {
        match field {
            TimeField::Hours => self.hours = value,
            TimeField::Minutes => self.minutes = value,
            TimeField::Seconds => self.seconds = value,
        }
        self
    }

    pub fn is_zero(&self) -> bool {
        self.total_seconds() == 0
    }
}
