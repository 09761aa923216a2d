#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Loads the water readings data file.
//!
//! The file is a JSON array of `{"lat": f64, "lng": f64, "water": number}`
//! objects. [`DataLoader::load`] fetches it once (no retry, no cache) and
//! parses it strictly; [`DataLoader::load_and_render`] also draws the
//! result, leaving the map empty if anything fails.

pub mod fetch;

use std::sync::Arc;

use thiserror::Error;
use water_report_overlay::{MapSurface, RenderSummary, render};
use water_report_readings_models::ReadingRecord;

pub use fetch::{DefaultFetcher, FetchError, Fetcher};

/// Errors from loading the readings file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The document could not be retrieved.
    #[error("failed to fetch {url}: {source}")]
    NetworkFailure {
        /// The URL that was requested.
        url: String,
        /// Underlying transport error.
        #[source]
        source: FetchError,
    },

    /// The document is not a valid readings array.
    #[error("failed to parse readings: {message}")]
    ParseFailure {
        /// Description of the parsing failure.
        message: String,
    },
}

/// Parses a readings document.
///
/// # Errors
///
/// Returns [`LoadError::ParseFailure`] if the body is not a JSON array, an
/// element lacks `lat`, `lng` or `water`, a field is not numeric, or a
/// coordinate is not finite. A fractional `water` value still parses; the
/// reading gets an out-of-range category and is skipped when rendered.
pub fn parse_records(body: &str) -> Result<Vec<ReadingRecord>, LoadError> {
    let elements: Vec<serde_json::Value> =
        serde_json::from_str(body).map_err(|e| LoadError::ParseFailure {
            message: format!("expected a JSON array: {e}"),
        })?;

    elements
        .into_iter()
        .enumerate()
        .map(|(idx, value)| {
            let record: ReadingRecord =
                serde_json::from_value(value).map_err(|e| LoadError::ParseFailure {
                    message: format!("element {idx}: {e}"),
                })?;
            record
                .check_coordinates()
                .map_err(|e| LoadError::ParseFailure {
                    message: format!("element {idx}: {e}"),
                })?;
            Ok(record)
        })
        .collect()
}

/// Fetches and parses readings files.
#[derive(Clone)]
pub struct DataLoader {
    fetcher: Arc<dyn Fetcher>,
}

impl Default for DataLoader {
    fn default() -> Self {
        Self::new(Arc::new(DefaultFetcher::default()))
    }
}

impl DataLoader {
    #[must_use]
    pub fn new(fetcher: Arc<dyn Fetcher>) -> Self {
        Self { fetcher }
    }

    /// Fetches `url` and parses it into readings.
    ///
    /// # Errors
    ///
    /// Returns [`LoadError::NetworkFailure`] if the fetch fails and
    /// [`LoadError::ParseFailure`] if the body is malformed.
    pub async fn load(&self, url: &str) -> Result<Vec<ReadingRecord>, LoadError> {
        let body = self
            .fetcher
            .fetch(url)
            .await
            .map_err(|source| LoadError::NetworkFailure {
                url: url.to_string(),
                source,
            })?;

        let records = parse_records(&body)?;
        log::info!("Loaded {} readings from {url}", records.len());
        Ok(records)
    }

    /// Loads `url` and draws every reading onto `surface`.
    ///
    /// On failure nothing is drawn and the error is logged and returned so
    /// the caller can show it.
    ///
    /// # Errors
    ///
    /// Returns the [`LoadError`] from [`Self::load`].
    pub async fn load_and_render<S: MapSurface + ?Sized>(
        &self,
        url: &str,
        surface: &mut S,
    ) -> Result<RenderSummary, LoadError> {
        match self.load(url).await {
            Ok(records) => Ok(render(&records, surface)),
            Err(e) => {
                log::error!("No overlays drawn: {e}");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use async_trait::async_trait;
    use water_report_overlay::RecordingSurface;

    use super::*;

    const THREE_READINGS: &str = r#"[{"lat":13.7,"lng":100.5,"water":0},{"lat":14.0,"lng":100.6,"water":8},{"lat":13.9,"lng":100.55,"water":4}]"#;

    /// Serves canned bodies by URL; unknown URLs fail like a dropped
    /// connection.
    struct StaticFetcher(BTreeMap<String, String>);

    impl StaticFetcher {
        fn with(url: &str, body: &str) -> Arc<dyn Fetcher> {
            Arc::new(Self(BTreeMap::from([(url.to_string(), body.to_string())])))
        }
    }

    #[async_trait]
    impl Fetcher for StaticFetcher {
        async fn fetch(&self, url: &str) -> Result<String, FetchError> {
            self.0.get(url).cloned().ok_or_else(|| {
                FetchError::Io(std::io::Error::new(
                    std::io::ErrorKind::ConnectionRefused,
                    "connection refused",
                ))
            })
        }
    }

    #[tokio::test]
    async fn loads_three_readings_field_for_field() {
        let loader = DataLoader::new(StaticFetcher::with("/WaterReport/json", THREE_READINGS));
        let records = loader.load("/WaterReport/json").await.unwrap();

        assert_eq!(
            records,
            vec![
                ReadingRecord::new(13.7, 100.5, 0),
                ReadingRecord::new(14.0, 100.6, 8),
                ReadingRecord::new(13.9, 100.55, 4),
            ]
        );
    }

    #[tokio::test]
    async fn truncated_body_is_parse_failure() {
        let loader = DataLoader::new(StaticFetcher::with("u", r#"[{"lat":13.7,"lng":100.5,"wa"#));
        let err = loader.load("u").await.unwrap_err();
        assert!(matches!(err, LoadError::ParseFailure { .. }), "{err}");
    }

    #[tokio::test]
    async fn unreachable_url_is_network_failure() {
        let loader = DataLoader::new(StaticFetcher::with("u", THREE_READINGS));
        let err = loader.load("other").await.unwrap_err();
        assert!(matches!(err, LoadError::NetworkFailure { ref url, .. } if url == "other"));
    }

    #[test]
    fn missing_field_is_parse_failure() {
        let err = parse_records(r#"[{"lat":1.0,"water":2}]"#).unwrap_err();
        let LoadError::ParseFailure { message } = err else {
            panic!("expected parse failure");
        };
        assert!(message.contains("element 0"), "{message}");
        assert!(message.contains("lng"), "{message}");
    }

    #[test]
    fn non_numeric_field_is_parse_failure() {
        assert!(matches!(
            parse_records(r#"[{"lat":"13.7","lng":100.5,"water":1}]"#),
            Err(LoadError::ParseFailure { .. })
        ));
        assert!(matches!(
            parse_records(r#"[{"lat":13.7,"lng":100.5,"water":"high"}]"#),
            Err(LoadError::ParseFailure { .. })
        ));
    }

    #[test]
    fn non_array_body_is_parse_failure() {
        assert!(matches!(
            parse_records(r#"{"lat":13.7,"lng":100.5,"water":1}"#),
            Err(LoadError::ParseFailure { .. })
        ));
    }

    #[test]
    fn out_of_range_category_still_parses() {
        let records = parse_records(r#"[{"lat":13.7,"lng":100.5,"water":11}]"#).unwrap();
        assert_eq!(records[0].category, 11);
    }

    #[test]
    fn whole_float_water_parses_as_category() {
        let records =
            parse_records(r#"[{"lat":13.7,"lng":100.5,"water":0},{"lat":13.8,"lng":100.5,"water":4.0}]"#)
                .unwrap();
        assert_eq!(
            records,
            vec![
                ReadingRecord::new(13.7, 100.5, 0),
                ReadingRecord::new(13.8, 100.5, 4),
            ]
        );
    }

    #[tokio::test]
    async fn fractional_water_skips_only_that_reading() {
        let body = r#"[{"lat":13.7,"lng":100.5,"water":0},{"lat":13.8,"lng":100.5,"water":4.5},{"lat":13.9,"lng":100.5,"water":8}]"#;
        let loader = DataLoader::new(StaticFetcher::with("data.json", body));
        let mut surface = RecordingSurface::new();

        let summary = loader.load_and_render("data.json", &mut surface).await.unwrap();

        assert_eq!(summary.rendered(), 2);
        assert_eq!(summary.skipped.len(), 1);
        assert!((summary.skipped[0].0.latitude - 13.8).abs() < f64::EPSILON);
        let colors: Vec<&str> = surface
            .overlays()
            .iter()
            .map(|o| o.fill_color.as_hex())
            .collect();
        assert_eq!(colors, ["#00FF00", "#FF0000"]);
    }

    #[test]
    fn empty_array_is_empty() {
        assert!(parse_records("[]").unwrap().is_empty());
    }

    #[tokio::test]
    async fn load_and_render_end_to_end() {
        let loader = DataLoader::new(StaticFetcher::with("data.json", THREE_READINGS));
        let mut surface = RecordingSurface::new();

        let summary = loader.load_and_render("data.json", &mut surface).await.unwrap();

        assert_eq!(summary.rendered(), 3);
        let colors: Vec<&str> = surface
            .overlays()
            .iter()
            .map(|o| o.stroke_color.as_hex())
            .collect();
        assert_eq!(colors, ["#00FF00", "#FF0000", "#FFFF00"]);
    }

    #[tokio::test]
    async fn failed_load_leaves_map_empty() {
        let loader = DataLoader::new(StaticFetcher::with("data.json", "not json"));
        let mut surface = RecordingSurface::new();

        let err = loader
            .load_and_render("data.json", &mut surface)
            .await
            .unwrap_err();

        assert!(matches!(err, LoadError::ParseFailure { .. }));
        assert!(surface.overlays().is_empty());
    }
}
