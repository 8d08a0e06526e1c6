// src/shared_data.rs

use crate::simulation_engine::vehicles::{Direction, SimulatedBus};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// The whole fleet as it stood after a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FleetSnapshot {
    /// Bumped every time the tracked route set changes.
    pub session: u64,
    /// Ticks since the session started.
    pub tick: u64,
    pub timestamp: u64,
    pub buses: Vec<SimulatedBus>,
}

impl FleetSnapshot {
    /// Flattens the snapshot into one CSV-friendly row per bus.
    pub fn records(&self) -> Vec<BusPositionRecord> {
        self.buses
            .iter()
            .map(|bus| BusPositionRecord {
                timestamp: self.timestamp,
                session: self.session,
                tick: self.tick,
                bus_id: bus.id.clone(),
                route_id: bus.route_id.clone(),
                progress: bus.progress,
                direction: bus.direction,
            })
            .collect()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BusPositionRecord {
    pub timestamp: u64,
    pub session: u64,
    pub tick: u64,
    pub bus_id: String,
    pub route_id: String,
    pub progress: f64,
    pub direction: Direction,
}

pub fn current_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
