// arrivals/mod.rs
pub mod live_arrivals;
pub mod route_estimates;
