#![allow(non_snake_case)]
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct Distances {
    pub PresentableDistance: String,
    pub DistanceFromCall: f64,
}

#[derive(Deserialize, Serialize)]
pub struct MonitoredCallExtensions {
    pub Distances: Distances,
}

#[derive(Deserialize, Serialize)]
pub struct MonitoredCall {
    pub ExpectedArrivalTime: Option<String>,
    pub AimedArrivalTime: Option<String>,
    pub Extensions: MonitoredCallExtensions,
}

#[derive(Deserialize, Serialize)]
pub struct MonitoredVehicleJourney {
    pub LineRef: String,
    pub DestinationName: String,
    pub MonitoredCall: MonitoredCall,
}

#[derive(Deserialize, Serialize)]
pub struct MonitoredStopVisit {
    pub MonitoredVehicleJourney: MonitoredVehicleJourney,
}

#[derive(Deserialize, Serialize)]
pub struct StopMonitoringDelivery {
    // missing (rather than empty) is treated as a malformed body
    pub MonitoredStopVisit: Vec<MonitoredStopVisit>,
}

#[derive(Deserialize, Serialize)]
pub struct ServiceDelivery {
    pub StopMonitoringDelivery: Vec<StopMonitoringDelivery>,
}

#[derive(Deserialize, Serialize)]
pub struct Siri {
    pub ServiceDelivery: ServiceDelivery,
}

#[derive(Deserialize, Serialize)]
pub struct GetStopMonitoringResponse {
    pub Siri: Siri,
}

impl GetStopMonitoringResponse {
    /// Visits of the first delivery, or `None` when the service delivery is empty.
    pub fn stop_visits(&self) -> Option<&[MonitoredStopVisit]> {
        self.Siri
            .ServiceDelivery
            .StopMonitoringDelivery
            .first()
            .map(|d| d.MonitoredStopVisit.as_slice())
    }
}
