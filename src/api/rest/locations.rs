use std::sync::Arc;

use axum::extract::{Path, State};
use axum::routing::{get, post};
use axum::Json;
use axum::Router;

use crate::error::AppError;
use crate::models::location::{Location, LocationRequest};
use crate::state::AppState;

pub fn router() -> Router<Arc<AppState>> {
    Router::new()
        .route("/locations", post(create_location))
        .route(
            "/locations/:location_id",
            get(get_location).put(update_location).delete(remove_location),
        )
}

async fn create_location(
    State(state): State<Arc<AppState>>,
    Json(payload): Json<LocationRequest>,
) -> Result<Json<Location>, AppError> {
    let coordinate = state.geocoder.geocode(&payload.full_address()).await?;

    let location = Location {
        id: state.locations.next_id(),
        name: payload.name,
        address: payload.address,
        city: payload.city,
        state: payload.state,
        zip: payload.zip,
        coordinate,
    };

    state.locations.put(location.id, location.clone());
    state.metrics.locations_stored.inc();

    Ok(Json(location))
}

async fn get_location(
    State(state): State<Arc<AppState>>,
    Path(location_id): Path<i64>,
) -> Result<Json<Location>, AppError> {
    let location = state
        .locations
        .find(location_id)
        .ok_or_else(|| AppError::NotFound(format!("location {location_id} not found")))?;

    Ok(Json(location))
}

async fn update_location(
    State(state): State<Arc<AppState>>,
    Path(location_id): Path<i64>,
    Json(payload): Json<LocationRequest>,
) -> Result<Json<Location>, AppError> {
    let mut location = state
        .locations
        .find(location_id)
        .ok_or_else(|| AppError::NotFound(format!("location {location_id} not found")))?;

    // Updates re-geocode from the street fields; the stored name stays.
    let coordinate = state.geocoder.geocode(&payload.street_address()).await?;

    location.address = payload.address;
    location.city = payload.city;
    location.state = payload.state;
    location.zip = payload.zip;
    location.coordinate = coordinate;

    state.locations.put(location_id, location.clone());

    Ok(Json(location))
}

async fn remove_location(
    State(state): State<Arc<AppState>>,
    Path(location_id): Path<i64>,
) -> Result<&'static str, AppError> {
    if !state.locations.remove(location_id) {
        return Err(AppError::NotFound(format!(
            "location {location_id} not found"
        )));
    }

    state.metrics.locations_stored.dec();
    Ok("Location document deleted successfully.")
}
