//! Data models for the `farmcast` advisor
//!
//! - Location: named geographic coordinates
//! - Forecast: the raw hourly series returned by the provider
//! - Summary: daily summaries, hourly alerts and district reports

pub mod forecast;
pub mod location;
pub mod summary;

pub use forecast::{HourlyRecord, HourlySeries};
pub use location::Location;
pub use summary::{
    AlertKind, DailySummary, DistrictOutcome, DistrictReport, HourlyAlert, Risk, Safety,
};
