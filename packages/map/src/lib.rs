#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Map application context.
//!
//! [`MapContext`] owns everything one map view needs: the drawing surface,
//! the address resolver, the location marker, the current zoom and the
//! latitude/longitude/address output fields. Search-box selections and
//! marker drags go through it.

pub mod search;

use std::sync::Arc;

use water_report_geocoder::{AddressResolver, GeocodeStatus, Suggestion};
use water_report_loader::{DataLoader, LoadError};
use water_report_overlay::{MapSurface, RenderSummary};
use water_report_readings_models::LatLng;

pub use search::{AddressSearchBox, SearchTicket};

/// Initial view center (central Thailand).
pub const DEFAULT_CENTER: LatLng = LatLng::new(13.83808, 100.546875);

/// Initial zoom level.
pub const DEFAULT_ZOOM: u8 = 6;

/// Zoom level applied after a search result is selected.
pub const SELECTION_ZOOM: u8 = 16;

/// Values shown in the location form.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct LocationFields {
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Display address.
    pub address: String,
}

/// Result of finishing a marker drag.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragOutcome {
    /// The reverse lookup succeeded and the fields were updated.
    Updated {
        /// The resolved address.
        address: String,
    },
    /// The lookup failed; fields were left as they were. The status can be
    /// shown as a warning.
    Unchanged {
        /// Status reported by the geocoder.
        status: GeocodeStatus,
    },
}

/// State for one map view.
pub struct MapContext<S: MapSurface> {
    surface: S,
    resolver: Arc<dyn AddressResolver>,
    marker: Option<LatLng>,
    current_zoom: u8,
    fields: LocationFields,
}

impl<S: MapSurface> MapContext<S> {
    /// Centers `surface` on [`DEFAULT_CENTER`] at [`DEFAULT_ZOOM`].
    pub fn new(mut surface: S, resolver: Arc<dyn AddressResolver>) -> Self {
        surface.set_center(DEFAULT_CENTER);
        surface.set_zoom(DEFAULT_ZOOM);
        Self {
            surface,
            resolver,
            marker: None,
            current_zoom: DEFAULT_ZOOM,
            fields: LocationFields::default(),
        }
    }

    #[must_use]
    pub const fn surface(&self) -> &S {
        &self.surface
    }

    pub const fn surface_mut(&mut self) -> &mut S {
        &mut self.surface
    }

    /// Consumes the context, returning the surface.
    pub fn into_surface(self) -> S {
        self.surface
    }

    #[must_use]
    pub const fn fields(&self) -> &LocationFields {
        &self.fields
    }

    #[must_use]
    pub const fn marker(&self) -> Option<LatLng> {
        self.marker
    }

    #[must_use]
    pub const fn current_zoom(&self) -> u8 {
        self.current_zoom
    }

    /// A search box sharing this context's resolver.
    #[must_use]
    pub fn search_box(&self) -> AddressSearchBox {
        AddressSearchBox::new(Arc::clone(&self.resolver))
    }

    /// Loads the readings file and draws it.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`]; the map is left without overlays.
    pub async fn load_overlays(
        &mut self,
        loader: &DataLoader,
        url: &str,
    ) -> Result<RenderSummary, LoadError> {
        loader.load_and_render(url, &mut self.surface).await
    }

    /// Records a zoom change made by the user.
    pub const fn zoom_changed(&mut self, zoom: u8) {
        self.current_zoom = zoom;
    }

    /// Applies a chosen search suggestion: moves the marker there, fills
    /// the fields, and centers and zooms the map on it.
    pub fn select(&mut self, suggestion: &Suggestion) {
        let position = suggestion.position();
        self.move_marker(position);

        self.fields.latitude = Some(position.latitude);
        self.fields.longitude = Some(position.longitude);
        self.fields.address.clone_from(&suggestion.label);

        self.surface.set_center(position);
        self.surface.set_zoom(SELECTION_ZOOM);
        self.current_zoom = SELECTION_ZOOM;

        log::debug!("Selected {:?} at {position:?}", suggestion.label);
    }

    /// Handles the end of a marker drag at `position`.
    ///
    /// The marker stays where it was dropped. The fields are only updated
    /// if the reverse lookup reports `OK`.
    pub async fn marker_drag_end(&mut self, position: LatLng) -> DragOutcome {
        self.move_marker(position);

        match self
            .resolver
            .reverse_lookup(position.latitude, position.longitude)
            .await
        {
            Ok(address) => {
                self.fields.latitude = Some(position.latitude);
                self.fields.longitude = Some(position.longitude);
                self.fields.address.clone_from(&address);
                DragOutcome::Updated { address }
            }
            Err(e) => {
                log::warn!(
                    "Reverse lookup at ({}, {}) failed: {e}",
                    position.latitude,
                    position.longitude
                );
                DragOutcome::Unchanged { status: e.status }
            }
        }
    }

    fn move_marker(&mut self, position: LatLng) {
        self.marker = Some(position);
        self.surface.place_marker(position);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use async_trait::async_trait;
    use water_report_geocoder::GeocodeFailure;
    use water_report_loader::{FetchError, Fetcher};
    use water_report_overlay::RecordingSurface;

    use super::*;

    /// Knows exactly one address.
    struct OneAddress;

    #[async_trait]
    impl AddressResolver for OneAddress {
        async fn forward_lookup(&self, text: &str) -> Result<Vec<Suggestion>, GeocodeFailure> {
            if text == "Chatuchak" {
                Ok(vec![Suggestion {
                    label: "Chatuchak, Bangkok".to_string(),
                    latitude: 13.8,
                    longitude: 100.55,
                }])
            } else {
                Err(GeocodeFailure::new(GeocodeStatus::ZeroResults))
            }
        }

        async fn reverse_lookup(
            &self,
            latitude: f64,
            longitude: f64,
        ) -> Result<String, GeocodeFailure> {
            if latitude > 0.0 && longitude > 0.0 {
                Ok("Chatuchak, Bangkok".to_string())
            } else {
                Err(GeocodeFailure::new(GeocodeStatus::ZeroResults))
            }
        }
    }

    struct Body(BTreeMap<&'static str, &'static str>);

    #[async_trait]
    impl Fetcher for Body {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.0
                .get(url)
                .map(|s| (*s).to_string())
                .ok_or_else(|| FetchError::Status { status: 404 })
        }
    }

    fn context() -> MapContext<RecordingSurface> {
        MapContext::new(RecordingSurface::new(), Arc::new(OneAddress))
    }

    #[test]
    fn starts_at_default_view() {
        let ctx = context();
        assert_eq!(ctx.surface().center(), Some(DEFAULT_CENTER));
        assert_eq!(ctx.surface().zoom(), Some(DEFAULT_ZOOM));
        assert_eq!(ctx.current_zoom(), DEFAULT_ZOOM);
        assert_eq!(ctx.marker(), None);
        assert_eq!(ctx.fields(), &LocationFields::default());
    }

    #[tokio::test]
    async fn selecting_a_suggestion_moves_marker_and_zooms() {
        let mut ctx = context();
        let suggestions = ctx.search_box().suggest("Chatuchak").await.unwrap();
        ctx.select(&suggestions[0]);

        let position = LatLng::new(13.8, 100.55);
        assert_eq!(ctx.marker(), Some(position));
        assert_eq!(ctx.surface().marker(), Some(position));
        assert_eq!(ctx.surface().center(), Some(position));
        assert_eq!(ctx.surface().zoom(), Some(16));
        assert_eq!(ctx.current_zoom(), 16);
        assert_eq!(ctx.fields().latitude, Some(13.8));
        assert_eq!(ctx.fields().longitude, Some(100.55));
        assert_eq!(ctx.fields().address, "Chatuchak, Bangkok");
    }

    #[tokio::test]
    async fn successful_drag_updates_fields() {
        let mut ctx = context();
        let outcome = ctx.marker_drag_end(LatLng::new(13.81, 100.56)).await;

        assert_eq!(
            outcome,
            DragOutcome::Updated {
                address: "Chatuchak, Bangkok".to_string()
            }
        );
        assert_eq!(ctx.fields().latitude, Some(13.81));
        assert_eq!(ctx.fields().longitude, Some(100.56));
        assert_eq!(ctx.fields().address, "Chatuchak, Bangkok");
    }

    #[tokio::test]
    async fn failed_drag_leaves_fields_unchanged() {
        let mut ctx = context();
        ctx.marker_drag_end(LatLng::new(13.81, 100.56)).await;
        let before = ctx.fields().clone();

        let dropped = LatLng::new(-10.0, -10.0);
        let outcome = ctx.marker_drag_end(dropped).await;

        assert_eq!(
            outcome,
            DragOutcome::Unchanged {
                status: GeocodeStatus::ZeroResults
            }
        );
        assert_eq!(ctx.fields(), &before);
        assert_eq!(ctx.marker(), Some(dropped));
    }

    #[test]
    fn zoom_changes_are_tracked() {
        let mut ctx = context();
        ctx.zoom_changed(11);
        assert_eq!(ctx.current_zoom(), 11);
    }

    #[tokio::test]
    async fn load_overlays_draws_readings() {
        let loader = DataLoader::new(Arc::new(Body(BTreeMap::from([(
            "/WaterReport/json",
            r#"[{"lat":13.7,"lng":100.5,"water":0},{"lat":14.0,"lng":100.6,"water":8}]"#,
        )]))));
        let mut ctx = context();

        let summary = ctx.load_overlays(&loader, "/WaterReport/json").await.unwrap();
        assert_eq!(summary.rendered(), 2);
        assert_eq!(ctx.surface().overlays().len(), 2);

        let err = ctx.load_overlays(&loader, "/missing").await.unwrap_err();
        assert!(matches!(err, LoadError::NetworkFailure { .. }));
        assert_eq!(ctx.into_surface().overlays().len(), 2);
    }
}
