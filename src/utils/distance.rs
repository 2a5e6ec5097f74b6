pub const MILES_PER_METER: f64 = 0.000621371;

pub fn meters_to_miles(meters: f64) -> f64 {
    meters * MILES_PER_METER
}

/// A (route, distance) pair already printed during one stop query. BusTime
/// occasionally lists the same vehicle more than once for a stop.
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct DistinctBusKey {
    route_name: String,
    miles_bits: u64,
}

impl DistinctBusKey {
    pub fn new(route_name: &str, distance_in_miles: f64) -> Self {
        DistinctBusKey {
            route_name: route_name.to_string(),
            miles_bits: distance_in_miles.to_bits(),
        }
    }
}
