//! The map widget boundary.
//!
//! A [`MapSurface`] is whatever actually draws: a browser map, a GeoJSON
//! export, or the in-memory [`RecordingSurface`] used by the CLI and tests.

use water_report_readings_models::LatLng;

use crate::Overlay;

/// Identifies an overlay owned by a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct OverlayHandle(pub usize);

/// Operations the rest of the system needs from an interactive map.
pub trait MapSurface {
    /// Takes ownership of `overlay` and draws it.
    fn add_overlay(&mut self, overlay: Overlay) -> OverlayHandle;

    /// Pans the view so `center` is in the middle.
    fn set_center(&mut self, center: LatLng);

    /// Sets the zoom level.
    fn set_zoom(&mut self, zoom: u8);

    /// Moves (or creates) the single draggable location marker.
    fn place_marker(&mut self, position: LatLng);
}

/// Surface that records every call instead of drawing.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RecordingSurface {
    overlays: Vec<Overlay>,
    center: Option<LatLng>,
    zoom: Option<u8>,
    marker: Option<LatLng>,
}

impl RecordingSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Overlays in the order they were added.
    #[must_use]
    pub fn overlays(&self) -> &[Overlay] {
        &self.overlays
    }

    #[must_use]
    pub fn overlay(&self, handle: OverlayHandle) -> Option<&Overlay> {
        self.overlays.get(handle.0)
    }

    #[must_use]
    pub const fn center(&self) -> Option<LatLng> {
        self.center
    }

    #[must_use]
    pub const fn zoom(&self) -> Option<u8> {
        self.zoom
    }

    #[must_use]
    pub const fn marker(&self) -> Option<LatLng> {
        self.marker
    }
}

impl MapSurface for RecordingSurface {
    fn add_overlay(&mut self, overlay: Overlay) -> OverlayHandle {
        self.overlays.push(overlay);
        OverlayHandle(self.overlays.len() - 1)
    }

    fn set_center(&mut self, center: LatLng) {
        self.center = Some(center);
    }

    fn set_zoom(&mut self, zoom: u8) {
        self.zoom = Some(zoom);
    }

    fn place_marker(&mut self, position: LatLng) {
        self.marker = Some(position);
    }
}
