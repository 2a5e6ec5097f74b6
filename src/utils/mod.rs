pub mod arrival_time;
pub mod distance;
pub mod mta_client;
pub mod siri_ref;
