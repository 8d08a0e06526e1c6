use campus_bus_tracker::config::SimulationConfig;
use campus_bus_tracker::global_variables::CONFIG_FILE;
use campus_bus_tracker::monitoring::position_monitor::{listen_bus_positions, run_cli};
use log::error;

#[tokio::main]
async fn main() {
    env_logger::init();
    let config = SimulationConfig::load_or_default(CONFIG_FILE);

    let listener = listen_bus_positions(config.amqp_url);
    let positions_listener = tokio::spawn(async move {
        match listener.await {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("Error in bus positions listener: {}", e),
            Err(e) => error!("Bus positions listener crashed: {}", e),
        }
    });

    run_cli().await;
    positions_listener.abort();
    // The AMQP consumer sits on a blocking thread the runtime would wait for.
    std::process::exit(0);
}
