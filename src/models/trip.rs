use serde::{Deserialize, Serialize};

/// Id handed to the first trip when the store is empty.
pub const FIRST_TRIP_ID: i64 = 1122;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TripStatus {
    Planning,
    Requesting,
    Reached,
}

#[derive(Debug, Deserialize)]
pub struct PlanTripRequest {
    pub starting_from_location_id: String,
    #[serde(default)]
    pub location_ids: Vec<String>,
}

/// The planner's output: visiting order plus cumulative estimates, return
/// leg included. Never re-optimized after creation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripPlan {
    pub id: i64,
    pub status: TripStatus,
    pub starting_from_location_id: String,
    pub best_route_location_ids: Vec<String>,
    pub total_uber_costs: f64,
    pub total_uber_duration: f64,
    pub total_distance: f64,
}

/// Lifecycle record for a trip being ridden, stored under the plan's id.
/// `next_destination_location_id` is empty until the first advance, then
/// walks `best_route_location_ids` and finally points back at the start.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TripProgress {
    pub id: i64,
    pub status: TripStatus,
    pub starting_from_location_id: String,
    pub next_destination_location_id: String,
    pub best_route_location_ids: Vec<String>,
    pub total_uber_costs: f64,
    pub total_uber_duration: f64,
    pub total_distance: f64,
    pub uber_wait_time_eta: f64,
}

impl TripProgress {
    pub fn from_plan(plan: &TripPlan) -> Self {
        Self {
            id: plan.id,
            status: plan.status,
            starting_from_location_id: plan.starting_from_location_id.clone(),
            next_destination_location_id: String::new(),
            best_route_location_ids: plan.best_route_location_ids.clone(),
            total_uber_costs: plan.total_uber_costs,
            total_uber_duration: plan.total_uber_duration,
            total_distance: plan.total_distance,
            uber_wait_time_eta: 0.0,
        }
    }
}
