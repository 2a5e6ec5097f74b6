pub mod app;
pub mod reports;
pub mod types;
pub mod utils;
