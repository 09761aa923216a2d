//! Nominatim / `OpenStreetMap` address resolver.
//!
//! Forward lookups use the free-form `/search` endpoint, reverse lookups the
//! `/reverse` endpoint. The public instance allows at most one request per
//! second and requires an identifying `User-Agent`.
//!
//! See <https://nominatim.org/release-docs/develop/api/Search/>

use async_trait::async_trait;

use crate::service_config::GeocodingService;
use crate::{AddressResolver, GeocodeFailure, GeocodeStatus, Suggestion};

/// [`AddressResolver`] backed by a Nominatim instance.
#[derive(Debug, Clone)]
pub struct NominatimResolver {
    client: reqwest::Client,
    service: GeocodingService,
}

impl NominatimResolver {
    #[must_use]
    pub const fn new(client: reqwest::Client, service: GeocodingService) -> Self {
        Self { client, service }
    }

    /// Builds a resolver with a client carrying the service's `User-Agent`.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be constructed.
    pub fn from_service(service: GeocodingService) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder()
            .user_agent(service.user_agent.clone())
            .build()?;
        Ok(Self::new(client, service))
    }

    #[must_use]
    pub const fn service(&self) -> &GeocodingService {
        &self.service
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{path}", self.service.base_url.trim_end_matches('/'))
    }

    async fn get_json(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<serde_json::Value, GeocodeFailure> {
        let resp = self
            .client
            .get(self.endpoint(path))
            .query(query)
            .send()
            .await
            .map_err(|e| {
                log::warn!("Nominatim {path} request failed: {e}");
                GeocodeFailure::new(GeocodeStatus::UnknownError)
            })?;

        if let Some(status) = status_for_http(resp.status().as_u16()) {
            log::warn!("Nominatim {path} returned HTTP {}", resp.status());
            return Err(GeocodeFailure::new(status));
        }

        resp.json().await.map_err(|e| {
            log::warn!("Nominatim {path} response was not JSON: {e}");
            GeocodeFailure::new(GeocodeStatus::UnknownError)
        })
    }
}

#[async_trait]
impl AddressResolver for NominatimResolver {
    async fn forward_lookup(&self, text: &str) -> Result<Vec<Suggestion>, GeocodeFailure> {
        let text = text.trim();
        if text.is_empty() {
            return Err(GeocodeFailure::new(GeocodeStatus::InvalidRequest));
        }

        let mut query = vec![
            ("q", text.to_string()),
            ("format", "jsonv2".to_string()),
            ("limit", self.service.limit.to_string()),
        ];
        if !self.service.country_codes.is_empty() {
            query.push(("countrycodes", self.service.country_codes.join(",")));
        }

        let body = self.get_json("search", &query).await?;
        parse_search_response(&body)
    }

    async fn reverse_lookup(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<String, GeocodeFailure> {
        let query = [
            ("lat", latitude.to_string()),
            ("lon", longitude.to_string()),
            ("format", "jsonv2".to_string()),
        ];

        let body = self.get_json("reverse", &query).await?;
        parse_reverse_response(&body)
    }
}

/// Maps an HTTP status to a failure status; `None` for success.
const fn status_for_http(code: u16) -> Option<GeocodeStatus> {
    match code {
        200..=299 => None,
        429 => Some(GeocodeStatus::OverQueryLimit),
        401 | 403 => Some(GeocodeStatus::RequestDenied),
        400 => Some(GeocodeStatus::InvalidRequest),
        _ => Some(GeocodeStatus::UnknownError),
    }
}

fn parse_coordinate(value: &serde_json::Value) -> Option<f64> {
    value
        .as_str()
        .and_then(|s| s.parse::<f64>().ok())
        .or_else(|| value.as_f64())
        .filter(|v| v.is_finite())
}

/// Parses a `/search` response into suggestions.
fn parse_search_response(body: &serde_json::Value) -> Result<Vec<Suggestion>, GeocodeFailure> {
    let results = body.as_array().ok_or_else(|| {
        log::warn!("Nominatim search response is not an array");
        GeocodeFailure::new(GeocodeStatus::UnknownError)
    })?;

    let suggestions: Vec<Suggestion> = results
        .iter()
        .filter_map(|hit| {
            Some(Suggestion {
                label: hit["display_name"].as_str()?.to_string(),
                latitude: parse_coordinate(&hit["lat"])?,
                longitude: parse_coordinate(&hit["lon"])?,
            })
        })
        .collect();

    if suggestions.is_empty() {
        return Err(GeocodeFailure::new(GeocodeStatus::ZeroResults));
    }

    Ok(suggestions)
}

/// Parses a `/reverse` response into a display address.
fn parse_reverse_response(body: &serde_json::Value) -> Result<String, GeocodeFailure> {
    if body.get("error").is_some() {
        return Err(GeocodeFailure::new(GeocodeStatus::ZeroResults));
    }

    body["display_name"]
        .as_str()
        .map(String::from)
        .ok_or(GeocodeFailure::new(GeocodeStatus::UnknownError))
}
