use std::sync::Arc;

use crate::models::location::{Location, FIRST_LOCATION_ID};
use crate::models::trip::{TripPlan, TripProgress, FIRST_TRIP_ID};
use crate::observability::metrics::Metrics;
use crate::provider::{Geocoder, RideProvider};
use crate::store::Documents;

pub struct AppState {
    pub locations: Documents<Location>,
    pub trips: Documents<TripPlan>,
    /// Lifecycle records, stored under their plan's id.
    pub progress: Documents<TripProgress>,
    pub geocoder: Arc<dyn Geocoder>,
    pub rides: Arc<dyn RideProvider>,
    pub metrics: Metrics,
}

impl AppState {
    pub fn new(geocoder: Arc<dyn Geocoder>, rides: Arc<dyn RideProvider>) -> Self {
        Self {
            locations: Documents::new(FIRST_LOCATION_ID),
            trips: Documents::new(FIRST_TRIP_ID),
            progress: Documents::new(FIRST_TRIP_ID),
            geocoder,
            rides,
            metrics: Metrics::new(),
        }
    }
}
