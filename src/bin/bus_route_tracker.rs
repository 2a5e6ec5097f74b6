use bustime_tracker::app::{run_route_tracker, AppConfig};
use tracing::{error, info};

// full LineRef as listed by the OneBusAway routes-for-agency endpoint
const ROUTE_ID: &str = "MTA NYCT_SIM26";

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    info!("Starting bus route tracker...");

    let config = AppConfig::from_env();

    if let Err(e) = run_route_tracker(&config, ROUTE_ID, &mut std::io::stdout()).await {
        error!("Failed to write report: {}", e);
    }
}
