#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! API request and response types for the water report service.
//!
//! Report submissions arrive as URL-encoded forms where every field is a
//! string; [`ReportForm::into_report`] converts and validates them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use water_report_readings_models::{ReadingError, ReadingRecord, Report};

/// A report submission as posted by the form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportForm {
    /// Reporter's name.
    #[serde(default)]
    pub name: String,
    /// Water category as text (`"0"`-`"8"`).
    pub water: String,
    /// Any non-empty value means the road is passable.
    #[serde(default)]
    pub road: String,
    /// Free-form description.
    #[serde(default)]
    pub text: String,
    /// Latitude as text.
    pub lat: String,
    /// Longitude as text.
    pub lng: String,
}

/// Errors from converting a [`ReportForm`].
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ReportError {
    /// A numeric field could not be parsed.
    #[error("field '{field}' is not a number: {value:?}")]
    InvalidNumber {
        /// Form field name.
        field: &'static str,
        /// The submitted text.
        value: String,
    },

    /// The values parsed but are out of range.
    #[error(transparent)]
    Invalid(#[from] ReadingError),
}

fn parse_field<T: std::str::FromStr>(field: &'static str, value: &str) -> Result<T, ReportError> {
    value
        .trim()
        .parse()
        .map_err(|_| ReportError::InvalidNumber {
            field,
            value: value.to_string(),
        })
}

impl ReportForm {
    /// Converts the submission into a [`Report`] stamped with `date`.
    ///
    /// # Errors
    ///
    /// Returns [`ReportError`] if a number fails to parse, a coordinate is
    /// not finite, or the water category is outside 0-8.
    pub fn into_report(self, title: &str, date: DateTime<Utc>) -> Result<Report, ReportError> {
        let report = Report {
            title: title.to_string(),
            latitude: parse_field("lat", &self.lat)?,
            longitude: parse_field("lng", &self.lng)?,
            water: parse_field("water", &self.water)?,
            road: !self.road.is_empty(),
            name: self.name,
            text: self.text,
            date,
        };
        report.validate()?;
        Ok(report)
    }
}

/// Data backing the report page.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiReportPage {
    /// Report collection title.
    pub title: String,
    /// Oldest report date included.
    pub start_date: DateTime<Utc>,
    /// Readings for the collection, newest first.
    pub reports: Vec<ReadingRecord>,
    /// Message to show above the form, if any.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Query parameters for the report page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageQueryParams {
    /// Message carried over from a failed submission.
    pub error: Option<String>,
}

/// Error body.
#[derive(Debug, Serialize, Deserialize)]
pub struct ApiError {
    pub error: String,
}

/// Health check response.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApiHealth {
    /// Whether the service is healthy.
    pub healthy: bool,
    /// Service version.
    pub version: String,
}
