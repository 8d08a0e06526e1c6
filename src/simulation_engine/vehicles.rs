use rand::Rng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Which way a bus is currently travelling along its route.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Forward,
    Backward,
}

impl Direction {
    pub fn flipped(self) -> Self {
        match self {
            Direction::Forward => Direction::Backward,
            Direction::Backward => Direction::Forward,
        }
    }
}

/// Represents a simulated bus shuttling between the two ends of a route.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulatedBus {
    pub id: String,
    pub route_id: String,
    /// 0.0 is the first stop of the route, 1.0 the last.
    pub progress: f64,
    pub direction: Direction,
}

impl SimulatedBus {
    /// Creates a bus at a given position. `ordinal` starts at 1.
    pub fn new(route_id: &str, ordinal: usize, progress: f64, direction: Direction) -> Self {
        Self {
            id: format!("{}-bus-{}", route_id, ordinal),
            route_id: route_id.to_string(),
            progress: clamp_progress(progress),
            direction,
        }
    }

    /// Creates a bus with a random position in [0, 1) and a random heading.
    pub fn random(route_id: &str, ordinal: usize, rng: &mut dyn RngCore) -> Self {
        let progress: f64 = rng.random();
        let direction = if rng.random_bool(0.5) {
            Direction::Forward
        } else {
            Direction::Backward
        };
        Self::new(route_id, ordinal, progress, direction)
    }

    /// Moves the bus by `step` in its current direction.
    ///
    /// Reaching either end clamps the progress to that end and heads the bus
    /// back the other way; any overshoot is dropped. A non-finite step leaves
    /// the bus where it is.
    pub fn advance(&mut self, step: f64) {
        if !step.is_finite() {
            return;
        }
        match self.direction {
            Direction::Forward => self.progress += step,
            Direction::Backward => self.progress -= step,
        }
        if self.progress >= 1.0 {
            self.progress = 1.0;
            self.direction = Direction::Backward;
        } else if self.progress <= 0.0 {
            self.progress = 0.0;
            self.direction = Direction::Forward;
        }
    }
}

/// Pins a progress value into [0, 1]; NaN counts as the start of the route.
pub fn clamp_progress(progress: f64) -> f64 {
    if progress.is_nan() {
        0.0
    } else {
        progress.clamp(0.0, 1.0)
    }
}

/// Number of buses running on a route: 2 or 3, fixed by the characters of its id.
///
/// Character codes are UTF-16 code units, so ids outside the BMP count the
/// same way a browser would count them.
pub fn bus_count_for_route(route_id: &str) -> usize {
    let parity = route_id
        .encode_utf16()
        .fold(0u32, |acc, unit| (acc + u32::from(unit)) % 2);
    2 + parity as usize
}

/// Builds the buses for one route with randomized starting state.
pub fn spawn_route_buses(route_id: &str, rng: &mut dyn RngCore) -> Vec<SimulatedBus> {
    (1..=bus_count_for_route(route_id))
        .map(|ordinal| SimulatedBus::random(route_id, ordinal, rng))
        .collect()
}
