// tracker_main.rs
//
// Usage: tracker_main [area-id] [routes]
// `routes` is "all" (default), a single route id, or a comma-separated list.
use campus_bus_tracker::arrivals::live_arrivals::{arrival_text, ArrivalBoard};
use campus_bus_tracker::communication::messages::TrackerMessage;
use campus_bus_tracker::communication::publisher::{outbox, spawn_amqp_publisher};
use campus_bus_tracker::config::SimulationConfig;
use campus_bus_tracker::directions::mock_user_location;
use campus_bus_tracker::global_variables::CONFIG_FILE;
use campus_bus_tracker::positioning::nearby_buses;
use campus_bus_tracker::simulation_engine::route_selector::RouteSelector;
use campus_bus_tracker::simulation_engine::scheduler::TokioScheduler;
use campus_bus_tracker::simulation_engine::tracker::BusTracker;
use log::{error, info};
use rand::rngs::StdRng;
use rand::SeedableRng;
use tokio::runtime::Handle;

#[tokio::main]
async fn main() {
    env_logger::init();

    let config = SimulationConfig::load_or_default(CONFIG_FILE);
    let network = match config.network() {
        Ok(network) => network,
        Err(e) => {
            error!("Could not load transit network: {}", e);
            return;
        }
    };

    let mut args = std::env::args().skip(1);
    let area_id = args.next().unwrap_or_else(|| "jntu-hyderabad".to_string());
    let selector = args
        .next()
        .map(|arg| RouteSelector::from(Some(arg.as_str())))
        .unwrap_or(RouteSelector::All);
    let Some(area) = network.area(&area_id).cloned() else {
        error!("Unknown area '{}'", area_id);
        return;
    };

    let (outbox, messages) = outbox();
    let publisher = spawn_amqp_publisher(config.amqp_url.clone(), messages);

    let scheduler = TokioScheduler::new(Handle::current());
    let mut tracker = BusTracker::new(scheduler.clone(), &config);

    let user = mock_user_location(&mut StdRng::from_os_rng());
    info!("Placed you at ({:.1}, {:.1}) on the {} map", user.x, user.y, area.name);

    let tick_outbox = outbox.clone();
    let radius = config.nearby_radius;
    let tick_area = area.clone();
    tracker.on_tick(move |snapshot| {
        let nearby = nearby_buses(&snapshot.buses, &tick_area, user, radius);
        info!(
            "Tick {}: {} buses moving, {} nearby {:?}",
            snapshot.tick,
            snapshot.buses.len(),
            nearby.len(),
            nearby.iter().map(|b| b.bus_id.as_str()).collect::<Vec<_>>()
        );
        tick_outbox.send(TrackerMessage::FleetUpdated(snapshot.clone()));
    });

    tracker.select(&selector, &network, &area_id);
    outbox.send(TrackerMessage::SessionStarted {
        session: tracker.session(),
        routes: tracker.tracked_routes().to_vec(),
    });
    if !tracker.is_running() {
        info!("No routes to track in {}", area.name);
    }

    let board = area.stops.first().map(|stop| {
        ArrivalBoard::open(
            &scheduler,
            &stop.name,
            config.arrivals_refresh(),
            StdRng::from_os_rng(),
        )
    });
    if let Some(board) = &board {
        for arrival in board.arrivals() {
            info!(
                "{} to {} ({}): {}{}",
                arrival.route_number,
                arrival.destination,
                board.stop_id(),
                arrival_text(arrival.minutes),
                if arrival.is_live { " [live]" } else { "" }
            );
        }
    }

    if let Err(e) = tokio::signal::ctrl_c().await {
        error!("Could not listen for shutdown: {}", e);
    }

    let session = tracker.session();
    // Dropping the tracker releases its timer and the outbox held by the observer.
    drop(tracker);
    drop(board);
    outbox.send(TrackerMessage::SessionEnded { session });
    drop(outbox);

    match publisher.await {
        Ok(Ok(())) => info!("Tracker stopped."),
        Ok(Err(e)) => error!("Publisher error: {}", e),
        Err(e) => error!("Publisher task failed: {}", e),
    }
}
