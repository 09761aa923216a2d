#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Water reading and report types.
//!
//! A [`ReadingRecord`] is the unit of the published data file: one
//! geographic point plus a water category. A [`Report`] is a user-submitted
//! observation from which readings are derived.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::de::{self, Deserializer, Visitor};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Lowest water category (dry / safe).
pub const MIN_CATEGORY: i64 = 0;

/// Highest water category (deepest flooding).
pub const MAX_CATEGORY: i64 = 8;

/// Category given to a numeric `water` value that is not a whole number.
/// It is outside `0..=8`, so the reading parses but is never drawn.
pub const UNKNOWN_CATEGORY: i64 = -1;

/// Returns `true` if `category` is inside `[MIN_CATEGORY, MAX_CATEGORY]`.
#[must_use]
pub const fn is_valid_category(category: i64) -> bool {
    category >= MIN_CATEGORY && category <= MAX_CATEGORY
}

/// A WGS84 coordinate pair in decimal degrees.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LatLng {
    /// Latitude.
    pub latitude: f64,
    /// Longitude.
    pub longitude: f64,
}

impl LatLng {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// Whether both components are finite numbers.
    #[must_use]
    pub const fn is_finite(&self) -> bool {
        self.latitude.is_finite() && self.longitude.is_finite()
    }
}

/// Errors raised when a reading or report fails validation.
#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum ReadingError {
    /// The coordinate pair contains NaN or an infinity.
    #[error("non-finite coordinate ({latitude}, {longitude})")]
    NonFiniteCoordinate {
        /// Offending latitude.
        latitude: f64,
        /// Offending longitude.
        longitude: f64,
    },

    /// The water category lies outside `0..=8`.
    #[error("water category {category} outside 0-8")]
    CategoryOutOfRange {
        /// Offending category.
        category: i64,
    },
}

/// One water reading at a geographic point.
///
/// On the wire the fields are named `lat`, `lng` and `water`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReadingRecord {
    /// Latitude (WGS84).
    #[serde(rename = "lat")]
    pub latitude: f64,
    /// Longitude (WGS84).
    #[serde(rename = "lng")]
    pub longitude: f64,
    /// Water category, expected in `0..=8`.
    #[serde(rename = "water", deserialize_with = "deserialize_category")]
    pub category: i64,
}

/// Maps a JSON number to a category: whole numbers keep their value (`4.0`
/// is `4`), anything else becomes [`UNKNOWN_CATEGORY`].
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_precision_loss,
    clippy::float_cmp
)]
fn category_from_f64(value: f64) -> i64 {
    if value.fract() == 0.0 && value >= i64::MIN as f64 && value < i64::MAX as f64 {
        value as i64
    } else {
        UNKNOWN_CATEGORY
    }
}

struct CategoryVisitor;

impl Visitor<'_> for CategoryVisitor {
    type Value = i64;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a numeric water category")
    }

    fn visit_i64<E: de::Error>(self, value: i64) -> Result<i64, E> {
        Ok(value)
    }

    fn visit_u64<E: de::Error>(self, value: u64) -> Result<i64, E> {
        Ok(i64::try_from(value).unwrap_or(UNKNOWN_CATEGORY))
    }

    fn visit_f64<E: de::Error>(self, value: f64) -> Result<i64, E> {
        Ok(category_from_f64(value))
    }
}

fn deserialize_category<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i64, D::Error> {
    deserializer.deserialize_any(CategoryVisitor)
}

impl ReadingRecord {
    #[must_use]
    pub const fn new(latitude: f64, longitude: f64, category: i64) -> Self {
        Self {
            latitude,
            longitude,
            category,
        }
    }

    /// The reading's position.
    #[must_use]
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }

    /// Checks that both coordinates are finite.
    ///
    /// # Errors
    ///
    /// Returns [`ReadingError::NonFiniteCoordinate`] otherwise.
    pub const fn check_coordinates(&self) -> Result<(), ReadingError> {
        if self.position().is_finite() {
            Ok(())
        } else {
            Err(ReadingError::NonFiniteCoordinate {
                latitude: self.latitude,
                longitude: self.longitude,
            })
        }
    }

    /// Checks that the category is inside `0..=8`.
    ///
    /// # Errors
    ///
    /// Returns [`ReadingError::CategoryOutOfRange`] otherwise.
    pub const fn check_category(&self) -> Result<(), ReadingError> {
        if is_valid_category(self.category) {
            Ok(())
        } else {
            Err(ReadingError::CategoryOutOfRange {
                category: self.category,
            })
        }
    }
}

/// A user-submitted water report.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Report {
    /// Report collection this belongs to (e.g. `"WaterReport"`).
    pub title: String,
    /// Reporter's name.
    pub name: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
    /// Water category (0-8).
    pub water: i64,
    /// Whether the road is passable.
    pub road: bool,
    /// Free-form description.
    pub text: String,
    /// When the report was submitted.
    pub date: DateTime<Utc>,
}

impl Report {
    /// Projects the report onto the published reading shape.
    #[must_use]
    pub const fn to_reading(&self) -> ReadingRecord {
        ReadingRecord::new(self.latitude, self.longitude, self.water)
    }

    /// Validates coordinates and water category.
    ///
    /// # Errors
    ///
    /// Returns the first [`ReadingError`] found.
    pub fn validate(&self) -> Result<(), ReadingError> {
        let reading = self.to_reading();
        reading.check_coordinates()?;
        reading.check_category()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reading_uses_short_wire_names() {
        let json = serde_json::to_value(ReadingRecord::new(13.7, 100.5, 3)).unwrap();
        assert_eq!(json, serde_json::json!({"lat": 13.7, "lng": 100.5, "water": 3}));
    }

    #[test]
    fn reading_ignores_extra_fields() {
        let r: ReadingRecord =
            serde_json::from_str(r#"{"lat":1.0,"lng":2.0,"water":5,"road":true}"#).unwrap();
        assert_eq!(r, ReadingRecord::new(1.0, 2.0, 5));
    }

    #[test]
    fn whole_float_water_is_that_category() {
        let r: ReadingRecord = serde_json::from_str(r#"{"lat":1.0,"lng":2.0,"water":4.0}"#).unwrap();
        assert_eq!(r.category, 4);
        assert!(r.check_category().is_ok());
    }

    #[test]
    fn fractional_water_is_unknown_category() {
        let r: ReadingRecord = serde_json::from_str(r#"{"lat":1.0,"lng":2.0,"water":4.5}"#).unwrap();
        assert_eq!(r.category, UNKNOWN_CATEGORY);
        assert!(r.check_category().is_err());

        let huge: ReadingRecord =
            serde_json::from_str(r#"{"lat":1.0,"lng":2.0,"water":1e300}"#).unwrap();
        assert_eq!(huge.category, UNKNOWN_CATEGORY);
    }

    #[test]
    fn string_water_is_rejected() {
        assert!(
            serde_json::from_str::<ReadingRecord>(r#"{"lat":1.0,"lng":2.0,"water":"4"}"#).is_err()
        );
    }

    #[test]
    fn category_bounds() {
        assert!(is_valid_category(0));
        assert!(is_valid_category(8));
        assert!(!is_valid_category(-1));
        assert!(!is_valid_category(9));
        assert_eq!(
            ReadingRecord::new(0.0, 0.0, 9).check_category(),
            Err(ReadingError::CategoryOutOfRange { category: 9 })
        );
    }

    #[test]
    fn non_finite_coordinates_rejected() {
        let r = ReadingRecord::new(f64::NAN, 1.0, 2);
        assert!(matches!(
            r.check_coordinates(),
            Err(ReadingError::NonFiniteCoordinate { .. })
        ));
        assert!(ReadingRecord::new(1.0, 1.0, 2).check_coordinates().is_ok());
    }

    #[test]
    fn report_projects_to_reading() {
        let report = Report {
            title: "WaterReport".to_string(),
            name: "somchai".to_string(),
            latitude: 13.75,
            longitude: 100.5,
            water: 6,
            road: false,
            text: "knee deep".to_string(),
            date: Utc::now(),
        };
        assert_eq!(report.to_reading(), ReadingRecord::new(13.75, 100.5, 6));
        assert!(report.validate().is_ok());
    }
}
