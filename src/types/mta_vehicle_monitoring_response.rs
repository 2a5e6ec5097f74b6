#![allow(non_snake_case)]
use serde::{Deserialize, Serialize};

#[derive(Deserialize, Serialize)]
pub struct Distances {
    pub PresentableDistance: String,
}

#[derive(Deserialize, Serialize)]
pub struct OnwardCallExtensions {
    pub Distances: Distances,
}

#[derive(Deserialize, Serialize)]
pub struct OnwardCall {
    pub StopPointName: String,
    pub Extensions: OnwardCallExtensions,
}

#[derive(Deserialize, Serialize)]
pub struct OnwardCalls {
    // BusTime sends `"OnwardCalls": {}` for vehicles without upcoming calls
    #[serde(default)]
    pub OnwardCall: Vec<OnwardCall>,
}

#[derive(Deserialize, Serialize)]
pub struct VehicleLocation {
    pub Latitude: f64,
    pub Longitude: f64,
}

#[derive(Deserialize, Serialize)]
pub struct MonitoredVehicleJourney {
    pub VehicleRef: String,
    pub VehicleLocation: VehicleLocation,
    pub OnwardCalls: Option<OnwardCalls>,
}

impl MonitoredVehicleJourney {
    pub fn next_stop(&self) -> Option<&OnwardCall> {
        self.OnwardCalls.as_ref().and_then(|c| c.OnwardCall.first())
    }
}

#[derive(Deserialize, Serialize)]
pub struct VehicleActivity {
    pub MonitoredVehicleJourney: MonitoredVehicleJourney,
}

#[derive(Deserialize, Serialize)]
pub struct VehicleMonitoringDelivery {
    #[serde(default)]
    pub VehicleActivity: Vec<VehicleActivity>,
}

#[derive(Deserialize, Serialize)]
pub struct ServiceDelivery {
    pub VehicleMonitoringDelivery: Vec<VehicleMonitoringDelivery>,
}

#[derive(Deserialize, Serialize)]
pub struct Siri {
    pub ServiceDelivery: ServiceDelivery,
}

#[derive(Deserialize, Serialize)]
pub struct GetVehicleMonitoringResponse {
    pub Siri: Siri,
}

impl GetVehicleMonitoringResponse {
    /// Activities of the first delivery, or `None` when the service delivery is empty.
    pub fn vehicle_activity(&self) -> Option<&[VehicleActivity]> {
        self.Siri
            .ServiceDelivery
            .VehicleMonitoringDelivery
            .first()
            .map(|d| d.VehicleActivity.as_slice())
    }
}
