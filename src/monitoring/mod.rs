// monitoring/mod.rs
pub mod position_monitor;
