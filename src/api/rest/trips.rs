use std::sync::Arc;
use std::time::Instant;

use axum::extract::{Path, State};
use axum::routing::{get, post, put};
use axum::Json;
use axum::Router;

use crate::engine::{lifecycle, planner};
use crate::error::AppError;
use crate::models::trip::{PlanTripRequest, TripPlan, TripProgress};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/trips", post(plan_trip))
        .route("/trips/:trip_id", get(get_trip))
        .route("/trips/:trip_id/request", put(request_trip))
}

async fn plan_trip(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<PlanTripRequest>,
) -> Result<Json<TripPlan>, AppError> {
    let started = Instant::now();
    let outcome = planner::plan_trip(&state, &payload).await;

    let label = if outcome.is_ok() { "success" } else { "error" };
    state
        .metrics
        .planning_latency_seconds
        .with_label_values(&[label])
        .observe(started.elapsed().as_secs_f64());
    state
        .metrics
        .trips_planned_total
        .with_label_values(&[label])
        .inc();

    outcome.map(Json)
}

async fn get_trip(
    State(state): State<Arc<AppState>>,
    Path(trip_id): Path<i64>,
) -> Result<Json<TripPlan>, AppError> {
    let plan = state
        .trips
        .find(trip_id)
        .ok_or_else(|| AppError::NotFound(format!("trip {trip_id} not found")))?;

    Ok(Json(plan))
}

async fn request_trip(
    State(state): State<Arc<AppState>>,
    Path(trip_id): Path<i64>,
) -> Result<Json<TripProgress>, AppError> {
    let outcome = lifecycle::advance_trip(&state, trip_id).await;

    let label = if outcome.is_ok() { "success" } else { "error" };
    state
        .metrics
        .trip_advances_total
        .with_label_values(&[label])
        .inc();

    outcome.map(Json)
}
