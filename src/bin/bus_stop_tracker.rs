use bustime_tracker::{
    app::{run_stop_tracker, AppConfig},
    reports::track_stop_arrivals::StopQuery,
};
use tracing::{error, info};

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();
    info!("Starting bus stop tracker...");

    let config = AppConfig::from_env();
    let queries = [
        StopQuery::new("MTA_805173", "SIM26"),
        StopQuery::new("MTA_203532", "SIM25"),
        StopQuery::new("MTA_201106", "SIM1C"),
    ];

    if let Err(e) = run_stop_tracker(&config, &queries, &mut std::io::stdout()).await {
        error!("Failed to write report: {}", e);
    }
}
