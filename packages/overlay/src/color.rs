//! Green-to-red color ramp for water categories.
//!
//! Low categories are green (passable), high categories red (deep water).

use serde::Serialize;
use thiserror::Error;
use water_report_readings_models::{MAX_CATEGORY, MIN_CATEGORY};

/// A `#RRGGBB` display color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct Color(&'static str);

impl Color {
    /// The `#RRGGBB` string.
    #[must_use]
    pub const fn as_hex(self) -> &'static str {
        self.0
    }
}

impl std::fmt::Display for Color {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.0)
    }
}

/// The category has no entry in the color table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("water category {category} has no color (expected 0-8)")]
pub struct OutOfRangeCategory {
    /// The rejected category.
    pub category: i64,
}

/// Color for each category, indexed by category.
pub const COLOR_TABLE: [Color; 9] = [
    Color("#00FF00"),
    Color("#33FF00"),
    Color("#77FF00"),
    Color("#AAFF00"),
    Color("#FFFF00"),
    Color("#FFAA00"),
    Color("#FF7700"),
    Color("#FF3300"),
    Color("#FF0000"),
];

/// Looks up the display color for a water category.
///
/// # Errors
///
/// Returns [`OutOfRangeCategory`] if `category` is not in `0..=8`.
pub fn color_for(category: i64) -> Result<Color, OutOfRangeCategory> {
    if !(MIN_CATEGORY..=MAX_CATEGORY).contains(&category) {
        return Err(OutOfRangeCategory { category });
    }
    usize::try_from(category)
        .ok()
        .and_then(|idx| COLOR_TABLE.get(idx).copied())
        .ok_or(OutOfRangeCategory { category })
}
