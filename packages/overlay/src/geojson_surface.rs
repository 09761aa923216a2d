//! A [`MapSurface`] that exports overlays as a `GeoJSON` `FeatureCollection`.
//!
//! Each overlay becomes a `Point` feature at its center; the circle styling
//! travels in the feature properties so any web map can draw it.

use geojson::{Feature, FeatureCollection, Geometry, JsonObject, Value};
use water_report_readings_models::LatLng;

use crate::surface::{MapSurface, OverlayHandle};
use crate::Overlay;

/// Collects overlays for `GeoJSON` export. View and marker calls are kept
/// as foreign members on the collection.
#[derive(Debug, Default)]
pub struct GeoJsonSurface {
    overlays: Vec<Overlay>,
    center: Option<LatLng>,
    zoom: Option<u8>,
}

impl GeoJsonSurface {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of overlays added so far.
    #[must_use]
    pub fn len(&self) -> usize {
        self.overlays.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.overlays.is_empty()
    }

    /// Builds the feature collection.
    #[must_use]
    pub fn to_feature_collection(&self) -> FeatureCollection {
        let features = self.overlays.iter().map(overlay_feature).collect();

        let mut foreign = JsonObject::new();
        if let Some(center) = self.center {
            foreign.insert(
                "center".to_string(),
                serde_json::json!([center.longitude, center.latitude]),
            );
        }
        if let Some(zoom) = self.zoom {
            foreign.insert("zoom".to_string(), serde_json::json!(zoom));
        }

        FeatureCollection {
            bbox: None,
            features,
            foreign_members: (!foreign.is_empty()).then_some(foreign),
        }
    }
}

fn overlay_feature(overlay: &Overlay) -> Feature {
    let mut properties = JsonObject::new();
    properties.insert("radius".to_string(), serde_json::json!(overlay.radius));
    properties.insert(
        "strokeColor".to_string(),
        serde_json::json!(overlay.stroke_color.as_hex()),
    );
    properties.insert(
        "strokeOpacity".to_string(),
        serde_json::json!(overlay.stroke_opacity),
    );
    properties.insert(
        "strokeWeight".to_string(),
        serde_json::json!(overlay.stroke_weight),
    );
    properties.insert(
        "fillColor".to_string(),
        serde_json::json!(overlay.fill_color.as_hex()),
    );
    properties.insert(
        "fillOpacity".to_string(),
        serde_json::json!(overlay.fill_opacity),
    );

    Feature {
        bbox: None,
        geometry: Some(Geometry::new(Value::Point(vec![
            overlay.center.longitude,
            overlay.center.latitude,
        ]))),
        id: None,
        properties: Some(properties),
        foreign_members: None,
    }
}

impl MapSurface for GeoJsonSurface {
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
        log::debug!(
            "GeoJSON surface ignores marker at ({}, {})",
            position.latitude,
            position.longitude
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render;
    use water_report_readings_models::ReadingRecord;

    #[test]
    fn exports_one_point_feature_per_overlay() {
        let mut surface = GeoJsonSurface::new();
        render(
            &[
                ReadingRecord::new(13.7, 100.5, 0),
                ReadingRecord::new(14.0, 100.6, 8),
            ],
            &mut surface,
        );

        let fc = surface.to_feature_collection();
        assert_eq!(fc.features.len(), 2);

        let first = &fc.features[0];
        let Some(Geometry {
            value: Value::Point(coords),
            ..
        }) = &first.geometry
        else {
            panic!("expected a point geometry");
        };
        assert_eq!(coords, &vec![100.5, 13.7]);

        let props = first.properties.as_ref().unwrap();
        assert_eq!(props["fillColor"], "#00FF00");
        assert_eq!(props["radius"], 800.0);
        assert_eq!(fc.features[1].properties.as_ref().unwrap()["strokeColor"], "#FF0000");
    }

    #[test]
    fn view_is_carried_as_foreign_members() {
        let mut surface = GeoJsonSurface::new();
        assert!(surface.to_feature_collection().foreign_members.is_none());

        surface.set_zoom(6);
        let fc = surface.to_feature_collection();
        assert_eq!(fc.foreign_members.unwrap()["zoom"], 6);
    }
}
