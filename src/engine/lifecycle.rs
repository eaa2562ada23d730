use tracing::info;

use crate::error::AppError;
use crate::models::location::LatLng;
use crate::models::trip::{TripProgress, TripStatus};
use crate::provider::RideEstimate;
use crate::state::AppState;

/// The leg one advance will ride, resolved from the stored progress record.
#[derive(Debug, Clone, PartialEq, Eq)]
struct NextLeg {
    from_id: String,
    to_id: String,
    status: TripStatus,
}

/// Advances a trip one leg: picks the next stop, requests the cheapest ride
/// for the leg, finalizes it with the provider, and only then persists the
/// moved pointer. A retried advance that failed mid-flight may have created
/// a duplicate provider-side request; the stored record is untouched either
/// way.
pub async fn advance_trip(state: &AppState, trip_id: i64) -> Result<TripProgress, AppError> {
    let plan = state.trips.find(trip_id).ok_or(AppError::NoSuchTrip)?;
    let mut progress = state
        .progress
        .find(trip_id)
        .unwrap_or_else(|| TripProgress::from_plan(&plan));

    let leg = next_leg(&progress)?;
    let from = resolve_coordinate(state, &leg.from_id)?;
    let to = resolve_coordinate(state, &leg.to_id)?;

    let estimates = state.rides.price_estimates(from, to).await?;
    let (_, pick) = RideEstimate::cheapest(&estimates)
        .ok_or_else(|| AppError::Upstream("no priced ride products for this leg".to_string()))?;

    let receipt = state.rides.request_ride(&pick.product_id, from, to).await?;
    state.rides.complete_ride(&receipt.request_id).await?;

    // The record is only touched once the provider has confirmed the ride.
    progress.status = leg.status;
    progress.next_destination_location_id = leg.to_id;
    progress.uber_wait_time_eta = receipt.eta;
    state.progress.put(trip_id, progress.clone());

    info!(
        trip_id,
        next = %progress.next_destination_location_id,
        eta = progress.uber_wait_time_eta,
        "trip advanced"
    );

    Ok(progress)
}

/// Where the trip goes next. The pointer walks `best_route_location_ids`
/// one entry per call and closes with the return to the start; a trip that
/// has reached the start refuses further advances.
fn next_leg(progress: &TripProgress) -> Result<NextLeg, AppError> {
    let route = &progress.best_route_location_ids;

    if progress.next_destination_location_id.is_empty() {
        let first = route.first().ok_or(AppError::TripCompleted)?;
        return Ok(NextLeg {
            from_id: progress.starting_from_location_id.clone(),
            to_id: first.clone(),
            status: TripStatus::Requesting,
        });
    }

    if progress.status == TripStatus::Reached {
        return Err(AppError::TripCompleted);
    }

    let current = route
        .iter()
        .position(|id| *id == progress.next_destination_location_id)
        .ok_or_else(|| {
            AppError::DataConsistency(format!(
                "trip {} points at location {:?}, which is not on its route",
                progress.id, progress.next_destination_location_id
            ))
        })?;

    if current == route.len() - 1 {
        Ok(NextLeg {
            from_id: progress.next_destination_location_id.clone(),
            to_id: progress.starting_from_location_id.clone(),
            status: TripStatus::Reached,
        })
    } else {
        Ok(NextLeg {
            from_id: progress.next_destination_location_id.clone(),
            to_id: route[current + 1].clone(),
            status: TripStatus::Requesting,
        })
    }
}

fn resolve_coordinate(state: &AppState, raw_id: &str) -> Result<LatLng, AppError> {
    let id: i64 = raw_id.parse().map_err(|_| {
        AppError::DataConsistency(format!("stored location id {raw_id:?} is not numeric"))
    })?;

    let location = state.locations.find(id).ok_or_else(|| {
        AppError::DataConsistency(format!(
            "location {id} referenced by the trip no longer exists"
        ))
    })?;

    Ok(location.coordinate)
}
