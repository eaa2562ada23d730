use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::location::LatLng;
use crate::provider::Geocoder;

/// Google-style geocoding client: one GET per lookup, first result wins.
pub struct HttpGeocoder {
    http: reqwest::Client,
    base_url: String,
}

#[derive(Deserialize)]
struct GeocodeResponse {
    #[serde(default)]
    results: Vec<GeocodeResult>,
}

#[derive(Deserialize)]
struct GeocodeResult {
    geometry: Geometry,
}

#[derive(Deserialize)]
struct Geometry {
    location: LatLng,
}

impl HttpGeocoder {
    pub fn new(http: reqwest::Client, base_url: impl Into<String>) -> Self {
        Self {
            http,
            base_url: base_url.into(),
        }
    }
}

#[async_trait]
impl Geocoder for HttpGeocoder {
    async fn geocode(&self, address: &str) -> Result<LatLng, AppError> {
        let url = format!("{}/json", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[("address", address), ("sensor", "false")])
            .send()
            .await
            .map_err(|err| AppError::Upstream(format!("geocoding request failed: {err}")))?;

        let decoded: GeocodeResponse = response
            .json()
            .await
            .map_err(|err| AppError::Upstream(format!("malformed geocoding response: {err}")))?;

        decoded
            .results
            .into_iter()
            .next()
            .map(|result| result.geometry.location)
            .ok_or_else(|| AppError::Upstream(format!("no geocoding results for {address:?}")))
    }
}
