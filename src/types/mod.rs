pub mod mta_stop_monitoring_response;
pub mod mta_vehicle_monitoring_response;
