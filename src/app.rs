use std::{
    env,
    io::{self, Write},
    time::Duration,
};

use tracing::{error, info, warn};

use crate::{
    reports::{
        track_route_vehicles::track_route_vehicles,
        track_stop_arrivals::{track_stop_arrivals, StopQuery},
    },
    utils::mta_client::{MtaClient, DEFAULT_MTA_HOST},
};

/// Value shipped in the setup instructions; treated the same as no key at all.
pub const API_KEY_PLACEHOLDER: &str = "YOUR_API_KEY";

const DEFAULT_TIMEOUT_SECS: u64 = 30;

#[derive(Clone, Debug)]
pub struct AppConfig {
    pub mta_host: String,
    pub mta_key: Option<String>,
    pub timeout: Duration,
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|name| env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let timeout_secs = match lookup("MTA_TIMEOUT_SECS") {
            Some(raw) => raw.parse::<u64>().unwrap_or_else(|_| {
                warn!(
                    "Ignoring MTA_TIMEOUT_SECS={}, using {}s",
                    raw, DEFAULT_TIMEOUT_SECS
                );
                DEFAULT_TIMEOUT_SECS
            }),
            None => DEFAULT_TIMEOUT_SECS,
        };

        AppConfig {
            mta_host: lookup("MTA_HOST").unwrap_or_else(|| DEFAULT_MTA_HOST.to_string()),
            mta_key: lookup("MTA_API_KEY"),
            timeout: Duration::from_secs(timeout_secs),
        }
    }

    /// The configured key, unless it is empty or still the placeholder.
    pub fn api_key(&self) -> Option<&str> {
        self.mta_key
            .as_deref()
            .filter(|key| !key.is_empty() && *key != API_KEY_PLACEHOLDER)
    }
}

fn write_setup_instructions<W: Write>(out: &mut W) -> io::Result<()> {
    writeln!(
        out,
        "Please set your MTA_API_KEY in your environment variables"
    )?;
    writeln!(
        out,
        "or replace '{}' in the script with your actual key.",
        API_KEY_PLACEHOLDER
    )
}

/// Builds the client, or explains on `out` why no request will be made.
fn gen_client<W: Write>(config: &AppConfig, out: &mut W) -> io::Result<Option<MtaClient>> {
    let Some(api_key) = config.api_key() else {
        warn!("MTA_API_KEY is not set, skipping request");
        write_setup_instructions(out)?;
        return Ok(None);
    };

    match MtaClient::new(config.mta_host.clone(), api_key.to_string(), config.timeout) {
        Ok(client) => Ok(Some(client)),
        Err(e) => {
            error!("Failed to build MTA client: {}", e);
            writeln!(out, "An error occurred: {}", e)?;
            Ok(None)
        }
    }
}

pub async fn run_route_tracker<W: Write>(
    config: &AppConfig,
    route_id: &str,
    out: &mut W,
) -> io::Result<()> {
    let Some(client) = gen_client(config, out)? else {
        return Ok(());
    };

    info!("Tracking route {}", route_id);
    track_route_vehicles(&client, route_id, out).await
}

/// Runs each stop query in turn. A failed query does not stop the ones after it.
pub async fn run_stop_tracker<W: Write>(
    config: &AppConfig,
    queries: &[StopQuery],
    out: &mut W,
) -> io::Result<()> {
    let Some(client) = gen_client(config, out)? else {
        return Ok(());
    };

    for query in queries {
        info!(
            "Checking {} arrivals at {}",
            query.route_name, query.stop_id
        );
        track_stop_arrivals(&client, query, out).await?;
    }

    Ok(())
}
