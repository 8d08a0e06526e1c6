//! Simulated live bus tracking for a campus transit map.
//!
//! [`simulation_engine`] keeps a small fleet of buses shuttling along the
//! tracked routes; [`positioning`] places them on the map and finds the ones
//! near the user.

pub mod arrivals;
pub mod communication;
pub mod config;
pub mod directions;
pub mod global_variables;
pub mod monitoring;
pub mod network;
pub mod positioning;
pub mod shared_data;
pub mod simulation_engine;
