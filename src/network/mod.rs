// network/mod.rs
pub mod transit_network;

pub use transit_network::{Area, BusRoute, BusStop, StopKind, TransitNetwork};
