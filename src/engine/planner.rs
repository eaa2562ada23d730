use tracing::info;

use crate::error::AppError;
use crate::models::location::LatLng;
use crate::models::trip::{PlanTripRequest, TripPlan, TripStatus};
use crate::provider::{RideEstimate, RideProvider};
use crate::state::AppState;

/// A resolved stop under consideration by the planner.
#[derive(Debug, Clone)]
struct Stop {
    id: i64,
    at: LatLng,
}

/// A committed leg: the stop it ends at plus the estimate that won it.
#[derive(Debug, Clone)]
struct Leg {
    stop: Stop,
    cost: f64,
    distance: f64,
    duration: f64,
}

/// Plans a trip over the requested locations and persists the result.
///
/// Visiting order is greedy: each round prices every remaining candidate
/// from the current position and commits the cheapest, breaking cost ties
/// by the shorter ride. The totals fold in the closing leg back to the
/// start. The plan is stored under a fresh id with status `planning`.
pub async fn plan_trip(state: &AppState, request: &PlanTripRequest) -> Result<TripPlan, AppError> {
    let start = resolve_stop(state, &request.starting_from_location_id)?;

    let mut remaining = Vec::with_capacity(request.location_ids.len());
    for raw_id in &request.location_ids {
        remaining.push(resolve_stop(state, raw_id)?);
    }

    let rounds = remaining.len();
    let mut position = start.at;
    let mut legs: Vec<Leg> = Vec::with_capacity(rounds);

    for _ in 0..rounds {
        // A round with no priceable candidate commits nothing.
        if let Some((index, leg)) = cheapest_next(state.rides.as_ref(), position, &remaining).await? {
            position = leg.stop.at;
            remaining.remove(index);
            legs.push(leg);
        }
    }

    let mut route = Vec::with_capacity(legs.len());
    let mut total_cost = 0.0;
    let mut total_distance = 0.0;
    let mut total_duration = 0.0;

    for leg in &legs {
        route.push(leg.stop.id.to_string());
        total_cost += leg.cost;
        total_distance += leg.distance;
        total_duration += leg.duration;
    }

    // Closing leg back to where the trip started.
    let estimates = state.rides.price_estimates(position, start.at).await?;
    if let Some((cost, pick)) = RideEstimate::cheapest(&estimates) {
        total_cost += cost;
        total_distance += pick.distance;
        total_duration += pick.duration;
    }

    let plan = TripPlan {
        id: state.trips.next_id(),
        status: TripStatus::Planning,
        starting_from_location_id: start.id.to_string(),
        best_route_location_ids: route,
        total_uber_costs: total_cost,
        total_uber_duration: total_duration,
        total_distance,
    };

    state.trips.put(plan.id, plan.clone());

    info!(
        trip_id = plan.id,
        stops = plan.best_route_location_ids.len(),
        total_cost = plan.total_uber_costs,
        "trip planned"
    );

    Ok(plan)
}

/// Prices every eligible remaining candidate from `position` and returns
/// the cheapest as the next stop, with its index in `remaining`. Ties fall
/// to the strictly shorter ride, then to the earlier candidate. `None`
/// when no candidate produced a usable estimate.
async fn cheapest_next(
    rides: &dyn RideProvider,
    position: LatLng,
    remaining: &[Stop],
) -> Result<Option<(usize, Leg)>, AppError> {
    let mut winner: Option<(usize, Leg)> = None;

    for (index, stop) in remaining.iter().enumerate() {
        // A candidate sitting exactly on the current position counts as
        // already reached this round; equality is exact, not a radius.
        if stop.at == position {
            continue;
        }

        let estimates = rides.price_estimates(position, stop.at).await?;
        let Some((cost, pick)) = RideEstimate::cheapest(&estimates) else {
            continue;
        };

        let replaces = match &winner {
            Some((_, best)) => {
                cost < best.cost || (cost == best.cost && pick.duration < best.duration)
            }
            None => true,
        };

        if replaces {
            winner = Some((
                index,
                Leg {
                    stop: stop.clone(),
                    cost,
                    distance: pick.distance,
                    duration: pick.duration,
                },
            ));
        }
    }

    Ok(winner)
}

fn resolve_stop(state: &AppState, raw_id: &str) -> Result<Stop, AppError> {
    let id: i64 = raw_id
        .trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid location id {raw_id:?}")))?;

    let location = state
        .locations
        .find(id)
        .ok_or_else(|| AppError::NotFound(format!("location {id} not found")))?;

    Ok(Stop {
        id,
        at: location.coordinate,
    })
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;
    use std::sync::Arc;

    use async_trait::async_trait;

    use super::plan_trip;
    use crate::error::AppError;
    use crate::models::location::{LatLng, Location};
    use crate::models::trip::{PlanTripRequest, TripStatus};
    use crate::provider::{Geocoder, RideEstimate, RideProvider, RideReceipt};
    use crate::state::AppState;

    struct NoGeocoder;

    #[async_trait]
    impl Geocoder for NoGeocoder {
        async fn geocode(&self, _address: &str) -> Result<LatLng, AppError> {
            Err(AppError::Upstream("geocoder not wired in this test".to_string()))
        }
    }

    type CoordKey = ((i64, i64), (i64, i64));

    fn coord_key(from: LatLng, to: LatLng) -> CoordKey {
        (
            ((from.lat * 1e6).round() as i64, (from.lng * 1e6).round() as i64),
            ((to.lat * 1e6).round() as i64, (to.lng * 1e6).round() as i64),
        )
    }

    /// Returns a scripted estimate batch per (from, to) pair; unknown pairs
    /// price as an empty batch.
    #[derive(Default)]
    struct FareTable {
        fares: HashMap<CoordKey, Vec<RideEstimate>>,
    }

    impl FareTable {
        fn fare(mut self, from: LatLng, to: LatLng, cost: f64, distance: f64, duration: f64) -> Self {
            self.fares.insert(
                coord_key(from, to),
                vec![RideEstimate {
                    product_id: "uber-x".to_string(),
                    low_estimate: Some(cost),
                    distance,
                    duration,
                }],
            );
            self
        }

        fn batch(mut self, from: LatLng, to: LatLng, estimates: Vec<RideEstimate>) -> Self {
            self.fares.insert(coord_key(from, to), estimates);
            self
        }
    }

    #[async_trait]
    impl RideProvider for FareTable {
        async fn price_estimates(&self, from: LatLng, to: LatLng) -> Result<Vec<RideEstimate>, AppError> {
            Ok(self
                .fares
                .get(&coord_key(from, to))
                .cloned()
                .unwrap_or_default())
        }

        async fn request_ride(
            &self,
            _product_id: &str,
            _from: LatLng,
            _to: LatLng,
        ) -> Result<RideReceipt, AppError> {
            Ok(RideReceipt {
                request_id: "req-1".to_string(),
                eta: 4.0,
            })
        }

        async fn complete_ride(&self, _request_id: &str) -> Result<(), AppError> {
            Ok(())
        }
    }

    fn at(lat: f64, lng: f64) -> LatLng {
        LatLng { lat, lng }
    }

    fn location(id: i64, coordinate: LatLng) -> Location {
        Location {
            id,
            name: format!("stop-{id}"),
            address: "1 Main St".to_string(),
            city: "Springfield".to_string(),
            state: "IL".to_string(),
            zip: "00000".to_string(),
            coordinate,
        }
    }

    fn state_with(locations: Vec<Location>, fares: FareTable) -> AppState {
        let state = AppState::new(Arc::new(NoGeocoder), Arc::new(fares));
        for loc in locations {
            state.locations.put(loc.id, loc);
        }
        state
    }

    fn request(start: i64, candidates: &[i64]) -> PlanTripRequest {
        PlanTripRequest {
            starting_from_location_id: start.to_string(),
            location_ids: candidates.iter().map(|id| id.to_string()).collect(),
        }
    }

    #[tokio::test]
    async fn commits_the_cheapest_leg_each_round() {
        let a = at(1.0, 1.0);
        let b = at(2.0, 2.0);
        let c = at(3.0, 3.0);

        let fares = FareTable::default()
            .fare(a, b, 5.0, 1.0, 600.0)
            .fare(a, c, 10.0, 2.0, 1200.0)
            .fare(b, c, 3.0, 1.5, 900.0)
            .fare(c, a, 2.0, 2.5, 1500.0);

        let state = state_with(
            vec![location(1, a), location(2, b), location(3, c)],
            fares,
        );

        let plan = plan_trip(&state, &request(1, &[2, 3])).await.unwrap();

        assert_eq!(plan.best_route_location_ids, vec!["2", "3"]);
        assert_eq!(plan.total_uber_costs, 10.0);
        assert_eq!(plan.total_distance, 5.0);
        assert_eq!(plan.total_uber_duration, 3000.0);
        assert_eq!(plan.status, TripStatus::Planning);
    }

    #[tokio::test]
    async fn route_is_a_permutation_of_the_candidates() {
        let a = at(0.0, 0.0);
        let stops: Vec<LatLng> = (1..=3).map(|i| at(i as f64, i as f64)).collect();

        let mut fares = FareTable::default();
        for (i, from) in std::iter::once(&a).chain(stops.iter()).enumerate() {
            for (j, to) in std::iter::once(&a).chain(stops.iter()).enumerate() {
                if i != j {
                    fares = fares.fare(*from, *to, (i + j) as f64, 1.0, 60.0);
                }
            }
        }

        let mut locations = vec![location(10, a)];
        for (i, stop) in stops.iter().enumerate() {
            locations.push(location(11 + i as i64, *stop));
        }

        let state = state_with(locations, fares);
        let plan = plan_trip(&state, &request(10, &[11, 12, 13])).await.unwrap();

        let mut visited = plan.best_route_location_ids.clone();
        visited.sort();
        assert_eq!(visited, vec!["11", "12", "13"]);
    }

    #[tokio::test]
    async fn equal_cost_falls_to_the_shorter_ride() {
        let a = at(1.0, 1.0);
        let b = at(2.0, 2.0);
        let c = at(3.0, 3.0);

        let fares = FareTable::default()
            .fare(a, b, 5.0, 1.0, 600.0)
            .fare(a, c, 5.0, 1.0, 480.0)
            .fare(c, b, 4.0, 1.0, 500.0)
            .fare(b, a, 1.0, 1.0, 100.0);

        let state = state_with(
            vec![location(1, a), location(2, b), location(3, c)],
            fares,
        );

        let plan = plan_trip(&state, &request(1, &[2, 3])).await.unwrap();

        assert_eq!(plan.best_route_location_ids, vec!["3", "2"]);
    }

    #[tokio::test]
    async fn unpriceable_round_commits_nothing() {
        let a = at(1.0, 1.0);
        let b = at(2.0, 2.0);
        let c = at(3.0, 3.0);

        // B is reachable from A, but nothing prices from B, so C is never
        // committed and the plan closes with the return leg B -> A.
        let fares = FareTable::default()
            .fare(a, b, 5.0, 1.0, 600.0)
            .fare(a, c, 6.0, 1.0, 700.0)
            .fare(b, a, 2.0, 1.0, 300.0);

        let state = state_with(
            vec![location(1, a), location(2, b), location(3, c)],
            fares,
        );

        let plan = plan_trip(&state, &request(1, &[2, 3])).await.unwrap();

        assert_eq!(plan.best_route_location_ids, vec!["2"]);
        assert_eq!(plan.total_uber_costs, 7.0);
    }

    #[tokio::test]
    async fn candidate_on_the_current_position_is_skipped_for_the_round() {
        let a = at(1.0, 1.0);
        let b = at(2.0, 2.0);

        // Candidate 3 shares the start's coordinates: round one must pick B,
        // after which the duplicate becomes a normal (degenerate) candidate.
        let fares = FareTable::default()
            .fare(a, b, 5.0, 1.0, 600.0)
            .fare(b, a, 7.0, 1.0, 700.0);

        let state = state_with(
            vec![location(1, a), location(2, b), location(3, a)],
            fares,
        );

        let plan = plan_trip(&state, &request(1, &[2, 3])).await.unwrap();

        assert_eq!(plan.best_route_location_ids, vec!["2", "3"]);
        assert_eq!(plan.total_uber_costs, 12.0);
    }

    #[tokio::test]
    async fn unpriced_products_are_ignored_when_picking_a_leg() {
        let a = at(1.0, 1.0);
        let b = at(2.0, 2.0);

        let fares = FareTable::default()
            .batch(
                a,
                b,
                vec![
                    RideEstimate {
                        product_id: "taxi".to_string(),
                        low_estimate: None,
                        distance: 9.0,
                        duration: 9.0,
                    },
                    RideEstimate {
                        product_id: "pool".to_string(),
                        low_estimate: Some(4.0),
                        distance: 1.0,
                        duration: 500.0,
                    },
                ],
            )
            .fare(b, a, 2.0, 1.0, 300.0);

        let state = state_with(vec![location(1, a), location(2, b)], fares);
        let plan = plan_trip(&state, &request(1, &[2])).await.unwrap();

        assert_eq!(plan.best_route_location_ids, vec!["2"]);
        assert_eq!(plan.total_uber_costs, 6.0);
    }

    #[tokio::test]
    async fn unknown_candidate_is_reported_before_any_pricing() {
        let a = at(1.0, 1.0);
        let state = state_with(vec![location(1, a)], FareTable::default());

        let err = plan_trip(&state, &request(1, &[99])).await.unwrap_err();

        assert!(matches!(err, AppError::NotFound(_)));
        assert!(state.trips.is_empty());
    }
}
