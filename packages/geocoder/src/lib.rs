#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Address lookup for the water report map.
//!
//! Geocoding is delegated entirely to a third-party service behind the
//! [`AddressResolver`] trait:
//!
//! - **forward lookup**: free text to a list of [`Suggestion`]s,
//! - **reverse lookup**: a coordinate to a display address.
//!
//! Failures carry a [`GeocodeStatus`] mirroring the status codes map
//! widgets report, so callers can decide what (if anything) to show.
//! [`nominatim::NominatimResolver`] is the bundled implementation.

pub mod nominatim;
pub mod service_config;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use strum_macros::{AsRefStr, Display, EnumString};
use thiserror::Error;
use water_report_readings_models::LatLng;

/// Result status of a geocoding request.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    AsRefStr,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[strum(serialize_all = "SCREAMING_SNAKE_CASE")]
pub enum GeocodeStatus {
    /// At least one result was found.
    Ok,
    /// The request was valid but matched nothing.
    ZeroResults,
    /// Rate limit or quota exceeded.
    OverQueryLimit,
    /// The service refused the request (bad key, blocked agent).
    RequestDenied,
    /// The request was malformed (e.g. empty query).
    InvalidRequest,
    /// Transport failure or unrecognized response.
    UnknownError,
}

/// A geocoding request did not succeed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("geocoding failed: {status}")]
pub struct GeocodeFailure {
    /// Why it failed.
    pub status: GeocodeStatus,
}

impl GeocodeFailure {
    #[must_use]
    pub const fn new(status: GeocodeStatus) -> Self {
        Self { status }
    }
}

/// One forward-lookup candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Suggestion {
    /// Display address.
    pub label: String,
    /// Latitude (WGS84).
    pub latitude: f64,
    /// Longitude (WGS84).
    pub longitude: f64,
}

impl Suggestion {
    #[must_use]
    pub const fn position(&self) -> LatLng {
        LatLng::new(self.latitude, self.longitude)
    }
}

/// A third-party geocoding capability.
#[async_trait]
pub trait AddressResolver: Send + Sync {
    /// Resolves free text into candidate locations, best first.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeFailure`] with the service's status when no
    /// candidates are available.
    async fn forward_lookup(&self, text: &str) -> Result<Vec<Suggestion>, GeocodeFailure>;

    /// Resolves a coordinate into a display address.
    ///
    /// # Errors
    ///
    /// Returns [`GeocodeFailure`]; `ZERO_RESULTS` when nothing is there.
    async fn reverse_lookup(&self, latitude: f64, longitude: f64)
    -> Result<String, GeocodeFailure>;
}
