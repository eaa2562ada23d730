use async_trait::async_trait;
use reqwest::StatusCode;
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::models::location::LatLng;
use crate::provider::{RideEstimate, RideProvider, RideReceipt};

/// Client for the sandbox ride-hailing API. Price estimates authenticate
/// with the server token; creating and finalizing requests ride on the
/// user's bearer token.
pub struct SandboxRideProvider {
    http: reqwest::Client,
    base_url: String,
    server_token: String,
    access_token: String,
}

#[derive(Deserialize)]
struct PriceEstimatesResponse {
    #[serde(default)]
    prices: Vec<RideEstimate>,
}

#[derive(Serialize)]
struct RideRequestBody<'a> {
    product_id: &'a str,
    start_latitude: f64,
    start_longitude: f64,
    end_latitude: f64,
    end_longitude: f64,
}

#[derive(Serialize)]
struct CompleteRideBody {
    status: &'static str,
}

impl SandboxRideProvider {
    pub fn new(
        http: reqwest::Client,
        base_url: impl Into<String>,
        server_token: impl Into<String>,
        access_token: impl Into<String>,
    ) -> Self {
        Self {
            http,
            base_url: base_url.into(),
            server_token: server_token.into(),
            access_token: access_token.into(),
        }
    }
}

#[async_trait]
impl RideProvider for SandboxRideProvider {
    async fn price_estimates(&self, from: LatLng, to: LatLng) -> Result<Vec<RideEstimate>, AppError> {
        let url = format!("{}/estimates/price", self.base_url);
        let response = self
            .http
            .get(&url)
            .query(&[
                ("start_latitude", from.lat),
                ("start_longitude", from.lng),
                ("end_latitude", to.lat),
                ("end_longitude", to.lng),
            ])
            .header("Authorization", format!("Token {}", self.server_token))
            .send()
            .await
            .map_err(|err| AppError::Upstream(format!("price estimate request failed: {err}")))?;

        let decoded: PriceEstimatesResponse = response
            .json()
            .await
            .map_err(|err| AppError::Upstream(format!("malformed price estimate response: {err}")))?;

        Ok(decoded.prices)
    }

    async fn request_ride(
        &self,
        product_id: &str,
        from: LatLng,
        to: LatLng,
    ) -> Result<RideReceipt, AppError> {
        let url = format!("{}/requests", self.base_url);
        let body = RideRequestBody {
            product_id,
            start_latitude: from.lat,
            start_longitude: from.lng,
            end_latitude: to.lat,
            end_longitude: to.lng,
        };

        let response = self
            .http
            .post(&url)
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await
            .map_err(|err| AppError::Upstream(format!("ride request failed: {err}")))?;

        response
            .json()
            .await
            .map_err(|err| AppError::Upstream(format!("malformed ride request response: {err}")))
    }

    async fn complete_ride(&self, request_id: &str) -> Result<(), AppError> {
        let url = format!("{}/sandbox/requests/{request_id}", self.base_url);
        let response = self
            .http
            .put(&url)
            .bearer_auth(&self.access_token)
            .json(&CompleteRideBody {
                status: "completed",
            })
            .send()
            .await
            .map_err(|err| AppError::Upstream(format!("ride completion request failed: {err}")))?;

        if response.status() != StatusCode::NO_CONTENT {
            return Err(AppError::Upstream(format!(
                "unexpected status {} completing ride request {request_id}",
                response.status()
            )));
        }

        Ok(())
    }
}
