// live_arrivals.rs
//
// Simulated arrival board for a stop. The numbers are random and get redrawn
// on a timer, the same way the map's bus positions are driven.

use log::debug;
use rand::{Rng, RngCore};
use serde::{Deserialize, Serialize};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use crate::shared_data::current_timestamp;
use crate::simulation_engine::scheduler::{Scheduler, TimerHandle};

/// Routes listed on every board: (number, destination, operator).
pub const BOARD_ROUTES: [(&str, &str, &str); 5] = [
    ("142K", "Secunderabad", "TSRTC"),
    ("218", "Miyapur Metro", "TSRTC"),
    ("290", "JNTU", "TSRTC"),
    ("5K", "Ameerpet", "TSRTC"),
    ("113M", "Kompally", "TSRTC"),
];

const LIVE_TRACKING_CHANCE: f64 = 0.7;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BusArrival {
    pub route_number: String,
    pub destination: String,
    pub operator: String,
    /// Minutes until the bus reaches the stop, 1 to 15.
    pub minutes: u32,
    pub is_live: bool,
    pub bus_id: String,
}

/// Draws a fresh set of arrivals, soonest first.
pub fn generate_arrivals(rng: &mut dyn RngCore) -> Vec<BusArrival> {
    let mut arrivals: Vec<BusArrival> = BOARD_ROUTES
        .iter()
        .map(|&(number, destination, operator)| BusArrival {
            route_number: number.to_string(),
            destination: destination.to_string(),
            operator: operator.to_string(),
            minutes: rng.random_range(1..=15),
            is_live: rng.random_bool(LIVE_TRACKING_CHANCE),
            bus_id: format!("{}-{}", number, rng.random_range(0..100)),
        })
        .collect();
    arrivals.sort_by_key(|arrival| arrival.minutes);
    arrivals
}

/// How the board words an arrival time.
pub fn arrival_text(minutes: u32) -> String {
    match minutes {
        0 => "Arriving".to_string(),
        1 => "1 min".to_string(),
        n => format!("{} mins", n),
    }
}

#[derive(Debug, Default)]
struct BoardState {
    arrivals: Vec<BusArrival>,
    last_updated: u64,
}

/// Arrivals for one stop, redrawn every refresh period while the board is open.
pub struct ArrivalBoard {
    stop_id: String,
    state: Arc<Mutex<BoardState>>,
    _timer: TimerHandle,
}

impl ArrivalBoard {
    pub fn open<S: Scheduler>(
        scheduler: &S,
        stop_id: &str,
        refresh: Duration,
        mut rng: impl RngCore + Send + 'static,
    ) -> Self {
        let state = Arc::new(Mutex::new(BoardState {
            arrivals: generate_arrivals(&mut rng),
            last_updated: current_timestamp(),
        }));

        let shared = Arc::clone(&state);
        let board_stop = stop_id.to_string();
        let timer = scheduler.schedule(
            refresh,
            Box::new(move || {
                let arrivals = generate_arrivals(&mut rng);
                debug!("Refreshed {} arrivals for stop {}", arrivals.len(), board_stop);
                let mut board = shared.lock().unwrap_or_else(PoisonError::into_inner);
                board.arrivals = arrivals;
                board.last_updated = current_timestamp();
            }),
        );

        Self {
            stop_id: stop_id.to_string(),
            state,
            _timer: timer,
        }
    }

    pub fn stop_id(&self) -> &str {
        &self.stop_id
    }

    pub fn arrivals(&self) -> Vec<BusArrival> {
        self.lock().arrivals.clone()
    }

    pub fn last_updated(&self) -> u64 {
        self.lock().last_updated
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, BoardState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
