#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Circle overlays for water readings.
//!
//! [`render`] turns each [`ReadingRecord`] into one fixed-size circle whose
//! stroke and fill come from the [`color::color_for`] ramp, and hands it to
//! a [`MapSurface`]. Readings with an out-of-range category are skipped and
//! logged; the rest of the batch still renders.

pub mod color;
pub mod geojson_surface;
pub mod surface;

use serde::Serialize;
use water_report_readings_models::{LatLng, ReadingRecord};

pub use color::{Color, OutOfRangeCategory, color_for};
pub use geojson_surface::GeoJsonSurface;
pub use surface::{MapSurface, OverlayHandle, RecordingSurface};

/// Circle radius in meters.
pub const OVERLAY_RADIUS_M: f64 = 800.0;

/// Stroke opacity for every overlay.
pub const STROKE_OPACITY: f64 = 0.8;

/// Stroke width in pixels.
pub const STROKE_WEIGHT: u32 = 1;

/// Fill opacity for every overlay.
pub const FILL_OPACITY: f64 = 0.35;

/// A colored circle drawn at a reading's position.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Overlay {
    pub center: LatLng,
    /// Radius in meters.
    pub radius: f64,
    pub stroke_color: Color,
    pub stroke_opacity: f64,
    pub stroke_weight: u32,
    pub fill_color: Color,
    pub fill_opacity: f64,
}

impl Overlay {
    /// Builds the overlay for a single reading.
    ///
    /// # Errors
    ///
    /// Returns [`OutOfRangeCategory`] if the reading's category has no
    /// color.
    pub fn for_reading(record: &ReadingRecord) -> Result<Self, OutOfRangeCategory> {
        let color = color_for(record.category)?;
        Ok(Self {
            center: record.position(),
            radius: OVERLAY_RADIUS_M,
            stroke_color: color,
            stroke_opacity: STROKE_OPACITY,
            stroke_weight: STROKE_WEIGHT,
            fill_color: color,
            fill_opacity: FILL_OPACITY,
        })
    }
}

/// Outcome of a [`render`] pass.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RenderSummary {
    /// Handles of drawn overlays, in input order.
    pub handles: Vec<OverlayHandle>,
    /// Readings that were not drawn, with the reason.
    pub skipped: Vec<(ReadingRecord, OutOfRangeCategory)>,
}

impl RenderSummary {
    /// Number of overlays drawn.
    #[must_use]
    pub fn rendered(&self) -> usize {
        self.handles.len()
    }
}

/// Draws one overlay per reading onto `surface`.
///
/// Readings are processed in input order. A reading whose category has no
/// color is logged and skipped.
pub fn render<S: MapSurface + ?Sized>(records: &[ReadingRecord], surface: &mut S) -> RenderSummary {
    let mut summary = RenderSummary::default();

    for record in records {
        match Overlay::for_reading(record) {
            Ok(overlay) => summary.handles.push(surface.add_overlay(overlay)),
            Err(e) => {
                log::warn!(
                    "Skipping reading at ({}, {}): {e}",
                    record.latitude,
                    record.longitude
                );
                summary.skipped.push((*record, e));
            }
        }
    }

    log::debug!(
        "Rendered {} overlays ({} skipped)",
        summary.rendered(),
        summary.skipped.len()
    );

    summary
}
