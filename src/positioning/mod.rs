// positioning/mod.rs
pub mod bezier;
pub mod proximity;

pub use bezier::{quadratic_bezier, Point, RouteCurve};
pub use proximity::{bus_positions, nearby_buses, nearest_bus, BusPosition};
