//! Accent colors cycled while a countdown runs.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl FromStr for Rgb {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || ValidationError::InvalidColor(s.to_string());
        let hex = s.strip_prefix('#').ok_or_else(invalid)?;
        if hex.len() != 6 || !hex.is_ascii() {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        Ok(Self {
            r: channel(0)?,
            g: channel(2)?,
            b: channel(4)?,
        })
    }
}

impl fmt::Display for Rgb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
    }
}

/// Ordered list of colors; indices wrap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Gradient {
    colors: Vec<Rgb>,
}

impl Gradient {
    /// Parse a list of `#rrggbb` strings.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::InvalidColor`] for the first malformed entry.
    pub fn from_hex<S: AsRef<str>>(colors: &[S]) -> Result<Self, ValidationError> {
        let colors = colors
            .iter()
            .map(|c| c.as_ref().parse())
            .collect::<Result<Vec<Rgb>, _>>()?;
        Ok(Self { colors })
    }

    pub fn len(&self) -> usize {
        self.colors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    pub fn color(&self, index: usize) -> Option<Rgb> {
        if self.colors.is_empty() {
            return None;
        }
        self.colors.get(index % self.colors.len()).copied()
    }

    /// Index that follows `index`, wrapping to 0 after the last color.
    pub fn next_index(&self, index: usize) -> usize {
        next_color_index(index, self.colors.len())
    }
}

pub(crate) fn next_color_index(index: usize, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let next = index + 1;
    if next >= len {
        0
    } else {
        next
    }
}

/// Purple-to-pink ramp used when the config does not override it.
pub fn default_progress_colors() -> Vec<String> {
    [
        "#6200ee", "#7c1fe6", "#963ddd", "#b05cd5", "#ca7acc", "#e499c4", "#ca7acc",
        "#b05cd5", "#963ddd", "#7c1fe6",
    ]
    .iter()
    .map(|c| c.to_string())
    .collect()
}

impl Default for Gradient {
    fn default() -> Self {
        // The built-in list is known to parse.
        Self::from_hex(&default_progress_colors()).unwrap_or(Self { colors: Vec::new() })
    }
}
