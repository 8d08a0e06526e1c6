// config.rs
//
// Runtime settings, read from a JSON file. Every field is optional in the
// file and falls back to the values in global_variables.

use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::global_variables::{
    AMQP_URL, ARRIVALS_REFRESH_MS, BUS_SPEED, NEARBY_RADIUS, SIMULATION_INTERVAL_MS,
};
use crate::network::TransitNetwork;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimulationConfig {
    pub tick_interval_ms: u64,
    /// Progress added or removed on every tick.
    pub step: f64,
    pub nearby_radius: f64,
    pub arrivals_refresh_ms: u64,
    /// Topology to load instead of the bundled one.
    pub network_file: Option<PathBuf>,
    pub amqp_url: String,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            tick_interval_ms: SIMULATION_INTERVAL_MS,
            step: BUS_SPEED,
            nearby_radius: NEARBY_RADIUS,
            arrivals_refresh_ms: ARRIVALS_REFRESH_MS,
            network_file: None,
            amqp_url: AMQP_URL.to_string(),
        }
    }
}

impl SimulationConfig {
    pub fn tick_interval(&self) -> Duration {
        Duration::from_millis(self.tick_interval_ms)
    }

    pub fn arrivals_refresh(&self) -> Duration {
        Duration::from_millis(self.arrivals_refresh_ms)
    }

    pub fn from_json_str(json: &str) -> Result<Self, serde_json::Error> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.validated())
    }

    /// Replaces a step that would move buses backwards or nowhere sensible.
    fn validated(mut self) -> Self {
        if !self.step.is_finite() || self.step < 0.0 {
            warn!("Invalid step {}, using {}", self.step, BUS_SPEED);
            self.step = BUS_SPEED;
        }
        self
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, Box<dyn Error>> {
        let contents = fs::read_to_string(path)?;
        Ok(Self::from_json_str(&contents)?)
    }

    /// Loads the file if present; a missing or broken file gives the defaults.
    pub fn load_or_default(path: impl AsRef<Path>) -> Self {
        let path = path.as_ref();
        if !path.exists() {
            info!("No config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load(path) {
            Ok(config) => config,
            Err(e) => {
                warn!("Ignoring config {}: {}", path.display(), e);
                Self::default()
            }
        }
    }

    /// The configured topology, or the bundled one when no file is set.
    pub fn network(&self) -> Result<TransitNetwork, Box<dyn Error>> {
        match &self.network_file {
            Some(path) => TransitNetwork::load(path),
            None => Ok(TransitNetwork::builtin()?),
        }
    }
}
