// tracker.rs
//
// Keeps the simulated fleet for whatever routes the map is showing and moves
// it along on a recurring timer.

use log::{debug, info};
use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use crate::config::SimulationConfig;
use crate::network::TransitNetwork;
use crate::shared_data::{current_timestamp, FleetSnapshot};
use crate::simulation_engine::route_selector::{unique_routes, RouteSelector};
use crate::simulation_engine::scheduler::{Scheduler, TimerHandle};
use crate::simulation_engine::vehicles::{clamp_progress, spawn_route_buses, SimulatedBus};

/// Called with the fleet after every tick.
pub type TickObserver = Box<dyn Fn(&FleetSnapshot) + Send + 'static>;

#[derive(Debug, Default)]
struct FleetState {
    session: u64,
    tick: u64,
    buses: Vec<SimulatedBus>,
}

impl FleetState {
    fn snapshot(&self) -> FleetSnapshot {
        FleetSnapshot {
            session: self.session,
            tick: self.tick,
            timestamp: current_timestamp(),
            buses: self.buses.clone(),
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Simulated buses for the currently tracked routes.
///
/// Changing the route set throws the old fleet away and starts a new session
/// with freshly spawned buses. Exactly one timer runs per non-empty session;
/// it is released on change, on [`BusTracker::stop`] and on drop.
pub struct BusTracker<S: Scheduler> {
    scheduler: S,
    interval: Duration,
    step: f64,
    rng: Box<dyn RngCore + Send>,
    fleet: Arc<Mutex<FleetState>>,
    observer: Arc<Mutex<Option<TickObserver>>>,
    tracked: Vec<String>,
    timer: Option<TimerHandle>,
}

impl<S: Scheduler> BusTracker<S> {
    pub fn new(scheduler: S, config: &SimulationConfig) -> Self {
        Self::with_rng(scheduler, config, StdRng::from_os_rng())
    }

    /// Uses the given random source for the starting positions of new buses.
    pub fn with_rng(
        scheduler: S,
        config: &SimulationConfig,
        rng: impl RngCore + Send + 'static,
    ) -> Self {
        Self {
            scheduler,
            interval: config.tick_interval(),
            step: config.step,
            rng: Box::new(rng),
            fleet: Arc::new(Mutex::new(FleetState::default())),
            observer: Arc::new(Mutex::new(None)),
            tracked: Vec::new(),
            timer: None,
        }
    }

    pub fn on_tick(&mut self, observer: impl Fn(&FleetSnapshot) + Send + 'static) {
        *lock(&self.observer) = Some(Box::new(observer));
    }

    /// Tracks the given routes. Returns whether a new fleet was created;
    /// asking for the routes already tracked keeps the current one.
    pub fn track<I, T>(&mut self, route_ids: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let routes = unique_routes(route_ids);
        if routes == self.tracked {
            return false;
        }

        let mut buses = Vec::new();
        for route_id in &routes {
            buses.extend(spawn_route_buses(route_id, self.rng.as_mut()));
        }
        self.start_session(routes, buses);
        true
    }

    /// Resolves a selector within an area and tracks the result.
    pub fn select(
        &mut self,
        selector: &RouteSelector,
        network: &TransitNetwork,
        area_id: &str,
    ) -> bool {
        self.track(selector.resolve(network, area_id))
    }

    /// Starts a session from a fleet built by the caller instead of a random one.
    /// The tracked routes are those of the given buses, in order.
    pub fn track_fleet(&mut self, mut buses: Vec<SimulatedBus>) {
        for bus in buses.iter_mut() {
            bus.progress = clamp_progress(bus.progress);
        }
        let routes = unique_routes(buses.iter().map(|bus| bus.route_id.as_str()));
        self.start_session(routes, buses);
    }

    /// Drops the fleet and releases the timer.
    pub fn stop(&mut self) {
        self.start_session(Vec::new(), Vec::new());
    }

    pub fn buses(&self) -> Vec<SimulatedBus> {
        lock(&self.fleet).buses.clone()
    }

    pub fn snapshot(&self) -> FleetSnapshot {
        lock(&self.fleet).snapshot()
    }

    pub fn tracked_routes(&self) -> &[String] {
        &self.tracked
    }

    pub fn session(&self) -> u64 {
        lock(&self.fleet).session
    }

    pub fn is_running(&self) -> bool {
        self.timer.is_some()
    }

    fn start_session(&mut self, routes: Vec<String>, buses: Vec<SimulatedBus>) {
        if let Some(timer) = self.timer.take() {
            timer.cancel();
        }

        let session = {
            let mut state = lock(&self.fleet);
            state.session += 1;
            state.tick = 0;
            state.buses = buses;
            info!(
                "Tracking session {}: {} buses on routes {:?}",
                state.session,
                state.buses.len(),
                routes
            );
            if state.buses.is_empty() {
                None
            } else {
                Some(state.session)
            }
        };
        self.tracked = routes;

        let Some(session) = session else {
            return;
        };

        let fleet = Arc::clone(&self.fleet);
        let observer = Arc::clone(&self.observer);
        let step = self.step;
        self.timer = Some(self.scheduler.schedule(
            self.interval,
            Box::new(move || {
                let snapshot = {
                    let mut state = lock(&fleet);
                    // A tick already under way when the session changed must not
                    // touch the new fleet.
                    if state.session != session {
                        return;
                    }
                    for bus in state.buses.iter_mut() {
                        bus.advance(step);
                    }
                    state.tick += 1;
                    debug!("Session {} tick {}", state.session, state.tick);
                    state.snapshot()
                };
                if let Some(observer) = lock(&observer).as_ref() {
                    observer(&snapshot);
                }
            }),
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation_engine::scheduler::ManualScheduler;
    use crate::simulation_engine::vehicles::Direction;

    const TICK: Duration = Duration::from_millis(3000);

    fn tracker(seed: u64) -> (ManualScheduler, BusTracker<ManualScheduler>) {
        let scheduler = ManualScheduler::new();
        let tracker = BusTracker::with_rng(
            scheduler.clone(),
            &SimulationConfig::default(),
            StdRng::seed_from_u64(seed),
        );
        (scheduler, tracker)
    }

    #[test]
    fn injected_fleet_is_pulled_into_bounds() {
        let (_, mut tracker) = tracker(0);
        tracker.track_fleet(vec![
            SimulatedBus {
                id: "5K-bus-1".into(),
                route_id: "5K".into(),
                progress: 1.5,
                direction: Direction::Forward,
            },
            SimulatedBus {
                id: "5K-bus-2".into(),
                route_id: "5K".into(),
                progress: f64::NAN,
                direction: Direction::Backward,
            },
        ]);
        let progress: Vec<f64> = tracker.buses().iter().map(|b| b.progress).collect();
        assert_eq!(progress, vec![1.0, 0.0]);
    }

    #[test]
    fn negative_step_cannot_push_a_bus_off_the_route() {
        let scheduler = ManualScheduler::new();
        let config = SimulationConfig {
            step: -0.05,
            ..SimulationConfig::default()
        };
        let mut tracker =
            BusTracker::with_rng(scheduler.clone(), &config, StdRng::seed_from_u64(0));
        tracker.track_fleet(vec![
            SimulatedBus::new("5K", 1, 0.02, Direction::Forward),
            SimulatedBus::new("5K", 2, 0.98, Direction::Backward),
        ]);

        for _ in 0..3 {
            scheduler.advance(TICK);
            for bus in tracker.buses() {
                assert!((0.0..=1.0).contains(&bus.progress), "{:?}", bus);
            }
        }
    }

    #[test]
    fn empty_selection_schedules_nothing() {
        let (scheduler, mut tracker) = tracker(1);
        let no_routes: Vec<String> = Vec::new();
        tracker.track(no_routes);
        assert!(tracker.buses().is_empty());
        assert!(!tracker.is_running());
        assert_eq!(scheduler.active_timers(), 0);

        tracker.track(["", "  "]);
        assert!(tracker.buses().is_empty());
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn fleet_size_is_per_route_and_repeatable() {
        let (_, mut first) = tracker(1);
        let (_, mut second) = tracker(99);
        first.track(["218"]);
        second.track(["218"]);
        assert_eq!(first.buses().len(), 3);
        assert_eq!(second.buses().len(), 3);
    }

    #[test]
    fn same_route_set_keeps_the_session() {
        let (scheduler, mut tracker) = tracker(3);
        assert!(tracker.track(["219"]));
        scheduler.advance(TICK);
        let before = tracker.buses();

        assert!(!tracker.track(vec!["219".to_string()]));
        assert_eq!(tracker.buses(), before);
        assert_eq!(tracker.session(), 1);
        assert_eq!(scheduler.active_timers(), 1);
    }

    #[test]
    fn changing_routes_replaces_fleet_and_timer() {
        let (scheduler, mut tracker) = tracker(5);
        tracker.track(["219"]);
        assert_eq!(tracker.buses().len(), 2);
        scheduler.advance(TICK * 3);
        assert_eq!(tracker.snapshot().tick, 3);

        tracker.track(["219", "288K"]);
        let snapshot = tracker.snapshot();
        assert_eq!(snapshot.session, 2);
        assert_eq!(snapshot.tick, 0);
        assert_eq!(snapshot.buses.len(), 5);
        assert_eq!(scheduler.active_timers(), 1);
        assert_eq!(tracker.tracked_routes(), ["219", "288K"]);
    }

    #[test]
    fn stop_clears_fleet_and_releases_timer() {
        let (scheduler, mut tracker) = tracker(8);
        tracker.track(["5K"]);
        tracker.stop();
        assert!(tracker.buses().is_empty());
        assert!(tracker.tracked_routes().is_empty());
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn dropping_the_tracker_releases_timer() {
        let (scheduler, mut tracker) = tracker(8);
        tracker.track(["5K"]);
        drop(tracker);
        assert_eq!(scheduler.active_timers(), 0);
    }

    #[test]
    fn injected_fleet_moves_deterministically() {
        let (scheduler, mut tracker) = tracker(0);
        tracker.track_fleet(vec![
            SimulatedBus::new("5K", 1, 0.0, Direction::Forward),
            SimulatedBus::new("5K", 2, 0.5, Direction::Forward),
        ]);
        assert_eq!(tracker.tracked_routes(), ["5K"]);

        scheduler.advance(TICK * 2);
        let progress: Vec<f64> = tracker.buses().iter().map(|b| b.progress).collect();
        assert!((progress[0] - 0.10).abs() < 1e-9);
        assert!((progress[1] - 0.60).abs() < 1e-9);
    }

    #[test]
    fn observer_sees_every_tick() {
        let (scheduler, mut tracker) = tracker(2);
        let seen = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&seen);
        tracker.on_tick(move |snapshot| sink.lock().unwrap().push(snapshot.tick));
        tracker.track(["219"]);

        scheduler.advance(TICK * 4);
        assert_eq!(*seen.lock().unwrap(), vec![1, 2, 3, 4]);
    }
}
