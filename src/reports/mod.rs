pub mod track_route_vehicles;
pub mod track_stop_arrivals;
