use std::{
    collections::HashSet,
    io::{self, Write},
};

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use tracing::{debug, error};

use crate::{
    types::mta_stop_monitoring_response::MonitoredStopVisit,
    utils::{
        arrival_time::{arrival_status, ArrivalError, EASTERN},
        distance::{meters_to_miles, DistinctBusKey},
        mta_client::MtaClient,
        siri_ref::short_name,
    },
};

pub const DEFAULT_MAX_DISTANCE_IN_MILES: f64 = 5.0;

#[derive(Clone, Debug)]
pub struct StopQuery {
    pub stop_id: String,
    pub route_name: String,
    pub max_distance_in_miles: f64,
}

impl StopQuery {
    pub fn new(stop_id: impl Into<String>, route_name: impl Into<String>) -> Self {
        Self {
            stop_id: stop_id.into(),
            route_name: route_name.into(),
            max_distance_in_miles: DEFAULT_MAX_DISTANCE_IN_MILES,
        }
    }

    pub fn with_max_distance(mut self, miles: f64) -> Self {
        self.max_distance_in_miles = miles;
        self
    }
}

enum VisitsError {
    Io(io::Error),
    Arrival(ArrivalError),
}

impl From<io::Error> for VisitsError {
    fn from(e: io::Error) -> Self {
        VisitsError::Io(e)
    }
}

impl From<ArrivalError> for VisitsError {
    fn from(e: ArrivalError) -> Self {
        VisitsError::Arrival(e)
    }
}

const PARSE_FAILURE: &str =
    "Could not parse the API response. This may mean no buses are running.";

/// Prints how far away each bus of `query.route_name` is from `query.stop_id`,
/// measured from the current US Eastern time.
pub async fn track_stop_arrivals<W: Write>(
    client: &MtaClient,
    query: &StopQuery,
    out: &mut W,
) -> io::Result<()> {
    let now = Utc::now().with_timezone(&EASTERN);
    track_stop_arrivals_at(client, query, now, out).await
}

pub async fn track_stop_arrivals_at<W: Write>(
    client: &MtaClient,
    query: &StopQuery,
    now: DateTime<Tz>,
    out: &mut W,
) -> io::Result<()> {
    writeln!(
        out,
        "=== 🚌 Next {} Buses for Stop {} ===",
        query.route_name, query.stop_id
    )?;
    writeln!(out, "Current Time: {}\n", now.format("%I:%M:%S %p"))?;

    match client.get_stop_monitoring(&query.stop_id).await {
        Ok(response) => match response.stop_visits() {
            None => {
                error!("No stop monitoring delivery for {}", query.stop_id);
                writeln!(out, "{}", PARSE_FAILURE)?;
            }
            // nothing scheduled ends the report without the closing rule
            Some([]) => {
                return writeln!(
                    out,
                    "No buses are currently scheduled to arrive at stop {}.",
                    query.stop_id
                );
            }
            Some(visits) => match write_visits(visits, query, &now, out) {
                Ok(()) => {}
                Err(VisitsError::Arrival(e)) => {
                    error!("Failed to read arrival for {}: {}", query.stop_id, e);
                    writeln!(out, "An error occurred: {}", e)?;
                }
                Err(VisitsError::Io(e)) => return Err(e),
            },
        },
        Err(e) if e.is_parse() => {
            error!("Failed to parse stop monitoring for {}: {}", query.stop_id, e);
            writeln!(out, "{}", PARSE_FAILURE)?;
        }
        Err(e) => {
            error!("Failed to fetch stop monitoring for {}: {}", query.stop_id, e);
            writeln!(out, "Error fetching data from the MTA API: {}", e)?;
        }
    }

    writeln!(out, "{}", "=".repeat(20))
}

fn write_visits<W: Write>(
    visits: &[MonitoredStopVisit],
    query: &StopQuery,
    now: &DateTime<Tz>,
    out: &mut W,
) -> Result<(), VisitsError> {
    let mut distinct_buses = HashSet::new();

    for visit in visits {
        let journey = &visit.MonitoredVehicleJourney;
        let arrival = &journey.MonitoredCall;
        let distances = &arrival.Extensions.Distances;

        let route_name = short_name(&journey.LineRef);
        let distance_in_miles = meters_to_miles(distances.DistanceFromCall);

        if route_name != query.route_name
            || distance_in_miles >= query.max_distance_in_miles
            || !distinct_buses.insert(DistinctBusKey::new(route_name, distance_in_miles))
        {
            debug!(
                "Skipping {} at {} miles from {}",
                route_name, distance_in_miles, query.stop_id
            );
            continue;
        }

        writeln!(out, "Route: {} (to {})", route_name, journey.DestinationName)?;
        writeln!(out, "  Status: {}", distances.PresentableDistance)?;
        writeln!(out, "  Calculated distance: {:?}", distance_in_miles)?;

        if let Some(status) = arrival_status(arrival, now)? {
            writeln!(out, "  Arrival: {}", status)?;
        }

        writeln!(out, "{}", "-".repeat(20))?;
    }

    Ok(())
}
