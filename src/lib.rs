//! `farmcast` - Farm weather advisor
//!
//! Turns hourly district forecasts into daily farming risk summaries and
//! combines them with field sensor readings for crop and treatment advice.

pub mod aggregation;
pub mod api;
pub mod classification;
pub mod config;
pub mod district;
pub mod error;
pub mod models;
pub mod recommender;
pub mod sensors;
pub mod weather;
pub mod web;

// Re-export core types for public API
pub use config::AdvisorConfig;
pub use district::{DistrictResolver, get_weather_for_district, resolve_and_summarize};
pub use error::AdvisorError;
pub use models::{
    DailySummary, DistrictOutcome, DistrictReport, HourlySeries, Location, Risk, Safety,
};
pub use sensors::SensorStore;
pub use weather::{ForecastClient, ForecastProvider};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, AdvisorError>;
