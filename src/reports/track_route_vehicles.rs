use std::io::{self, Write};

use tracing::{error, info};

use crate::utils::{mta_client::MtaClient, siri_ref::short_name};

fn write_parse_failure<W: Write>(out: &mut W, route_id: &str) -> io::Result<()> {
    writeln!(out, "Could not parse the API response for {}.", route_id)?;
    writeln!(
        out,
        "This often means there are no active buses on this route right now."
    )
}

/// Prints the position and next stop of every bus currently running on `route_id`.
///
/// Fetch and parse failures are printed and swallowed; only write errors on `out`
/// are returned.
pub async fn track_route_vehicles<W: Write>(
    client: &MtaClient,
    route_id: &str,
    out: &mut W,
) -> io::Result<()> {
    let response = match client.get_vehicle_monitoring(route_id).await {
        Ok(response) => response,
        Err(e) if e.is_parse() => {
            error!("Failed to parse vehicle monitoring for {}: {}", route_id, e);
            return write_parse_failure(out, route_id);
        }
        Err(e) => {
            error!("Failed to fetch vehicle monitoring for {}: {}", route_id, e);
            return writeln!(out, "Error fetching data from the MTA API: {}", e);
        }
    };

    let Some(vehicle_activity) = response.vehicle_activity() else {
        error!("No vehicle monitoring delivery for {}", route_id);
        return write_parse_failure(out, route_id);
    };

    writeln!(out, "Tracking buses for route: {} 🚌\n", route_id)?;

    if vehicle_activity.is_empty() {
        return writeln!(out, "No active buses found for this route at the moment.");
    }

    info!("{} active buses on {}", vehicle_activity.len(), route_id);

    for activity in vehicle_activity {
        let journey = &activity.MonitoredVehicleJourney;
        let position = &journey.VehicleLocation;

        writeln!(out, "Bus ID: {}", short_name(&journey.VehicleRef))?;
        writeln!(out, "  Latitude: {:?}", position.Latitude)?;
        writeln!(out, "  Longitude: {:?}", position.Longitude)?;

        if let Some(next_stop) = journey.next_stop() {
            writeln!(
                out,
                "  Next Stop: {} ({})",
                next_stop.StopPointName, next_stop.Extensions.Distances.PresentableDistance
            )?;
        }

        writeln!(out, "{}", "-".repeat(20))?;
    }

    Ok(())
}
