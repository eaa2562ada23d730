pub mod geocode;
pub mod rides;

use async_trait::async_trait;
use serde::Deserialize;

use crate::error::AppError;
use crate::models::location::LatLng;

/// One ride product priced for a leg. `low_estimate` is absent for products
/// the provider cannot price up front; those entries are never selectable.
#[derive(Debug, Clone, Deserialize)]
pub struct RideEstimate {
    pub product_id: String,
    pub low_estimate: Option<f64>,
    pub distance: f64,
    pub duration: f64,
}

impl RideEstimate {
    /// Cheapest priced estimate in the batch, paired with its price. The
    /// earliest entry wins ties; `None` when nothing carries a price.
    pub fn cheapest(estimates: &[RideEstimate]) -> Option<(f64, &RideEstimate)> {
        let mut best: Option<(f64, &RideEstimate)> = None;

        for estimate in estimates {
            let Some(cost) = estimate.low_estimate else {
                continue;
            };
            match best {
                Some((best_cost, _)) if best_cost <= cost => {}
                _ => best = Some((cost, estimate)),
            }
        }

        best
    }
}

/// Result of creating a ride request with the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct RideReceipt {
    pub request_id: String,
    pub eta: f64,
}

#[async_trait]
pub trait Geocoder: Send + Sync {
    /// Resolves a free-text address to coordinates.
    async fn geocode(&self, address: &str) -> Result<LatLng, AppError>;
}

#[async_trait]
pub trait RideProvider: Send + Sync {
    /// Price estimates for a ride between two points.
    async fn price_estimates(&self, from: LatLng, to: LatLng) -> Result<Vec<RideEstimate>, AppError>;

    /// Creates a ride request for the chosen product.
    async fn request_ride(
        &self,
        product_id: &str,
        from: LatLng,
        to: LatLng,
    ) -> Result<RideReceipt, AppError>;

    /// Finalizes a previously created ride request; errors unless the
    /// provider acknowledges success.
    async fn complete_ride(&self, request_id: &str) -> Result<(), AppError>;
}
