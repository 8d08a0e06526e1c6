// simulation_engine/mod.rs
pub mod route_selector;
pub mod scheduler;
pub mod tracker;
pub mod vehicles;
