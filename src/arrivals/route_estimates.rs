use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::network::BusRoute;

/// Made-up operating figures shown next to a route.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RouteEstimate {
    pub route_id: String,
    /// End-to-end trip time, 20 minutes and up.
    pub estimated_minutes: u32,
    pub frequency_minutes: u32,
    /// Fare in rupees.
    pub fare: u32,
    pub stop_count: u32,
}

/// Longer route names stand in for longer routes: every ten characters add
/// five minutes to the base trip.
pub fn estimate_route(route: &BusRoute, rng: &mut dyn RngCore) -> RouteEstimate {
    let name_len = route.name.encode_utf16().count() as u32;
    let base_minutes = 20 + (name_len / 10) * 5;
    RouteEstimate {
        route_id: route.id.clone(),
        estimated_minutes: base_minutes + rng.random_range(0..15),
        frequency_minutes: rng.random_range(6..18),
        fare: rng.random_range(15..35),
        stop_count: rng.random_range(8..23),
    }
}

/// Time until the next departure, between 5 and 20 minutes from now.
pub fn next_departure_in(rng: &mut dyn RngCore) -> Duration {
    Duration::from_secs_f64(rng.random_range(5.0..20.0) * 60.0)
}
