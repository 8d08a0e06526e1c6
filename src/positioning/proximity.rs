// proximity.rs
//
// Places tracked buses on their route curves and answers "which buses are
// near me" for a point on the map.

use serde::{Deserialize, Serialize};

use crate::network::Area;
use crate::positioning::bezier::{Point, RouteCurve};
use crate::simulation_engine::vehicles::SimulatedBus;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusPosition {
    pub bus_id: String,
    pub route_id: String,
    pub position: Point,
}

/// Positions of the buses whose route runs in `area`.
///
/// Buses on routes the area does not list, or in an area with fewer than two
/// stops, are left out; they keep moving in the tracker all the same.
pub fn bus_positions(buses: &[SimulatedBus], area: &Area) -> Vec<BusPosition> {
    let Some(curve) = RouteCurve::from_stops(&area.stops) else {
        return Vec::new();
    };
    buses
        .iter()
        .filter(|bus| area.route(&bus.route_id).is_some())
        .map(|bus| BusPosition {
            bus_id: bus.id.clone(),
            route_id: bus.route_id.clone(),
            position: curve.point_at(bus.progress),
        })
        .collect()
}

/// Buses strictly closer than `radius` to `reference`, in fleet order.
pub fn nearby_buses(
    buses: &[SimulatedBus],
    area: &Area,
    reference: Point,
    radius: f64,
) -> Vec<BusPosition> {
    bus_positions(buses, area)
        .into_iter()
        .filter(|placed| placed.position.distance_to(reference) < radius)
        .collect()
}

/// The closest placed bus to `reference` and its distance.
pub fn nearest_bus(
    buses: &[SimulatedBus],
    area: &Area,
    reference: Point,
) -> Option<(BusPosition, f64)> {
    bus_positions(buses, area)
        .into_iter()
        .map(|placed| {
            let distance = placed.position.distance_to(reference);
            (placed, distance)
        })
        .min_by(|a, b| a.1.total_cmp(&b.1))
}
