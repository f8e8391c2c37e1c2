//! District resolution and the forecast advisory entry point
//!
//! Maps a user-entered district name onto the fixed coordinate table, fetches
//! the hourly forecast and turns it into classified daily summaries.

use crate::aggregation::aggregate_daily;
use crate::classification::classify_day;
use crate::models::{
    DailySummary, DistrictOutcome, DistrictReport, HourlyAlert, HourlySeries, Location,
};
use crate::weather::{DEFAULT_FORECAST_DAYS, ForecastProvider};
use crate::{AdvisorError, Result};
use tracing::{debug, info, instrument};

/// Supported districts and their coordinates
pub const DISTRICTS: [(&str, f64, f64); 5] = [
    ("Ranchi", 23.344_315, 85.296_013),
    ("Jamshedpur", 22.805_618, 86.203_110),
    ("Dhanbad", 23.795_399, 86.427_040),
    ("Bokaro", 23.669_296, 86.151_115),
    ("Hazaribagh", 23.996_620, 85.369_110),
];

/// Trim and title-case a district name: `"  hazaribagh "` becomes `"Hazaribagh"`
#[must_use]
pub fn normalize_district_name(name: &str) -> String {
    let mut normalized = String::with_capacity(name.len());
    let mut word_start = true;
    for c in name.trim().chars() {
        if c.is_alphabetic() {
            if word_start {
                normalized.extend(c.to_uppercase());
            } else {
                normalized.extend(c.to_lowercase());
            }
            word_start = false;
        } else {
            normalized.push(c);
            word_start = true;
        }
    }
    normalized
}

/// Look up a district by name, after normalisation
#[must_use]
pub fn find_district(name: &str) -> Option<Location> {
    let normalized = normalize_district_name(name);
    DISTRICTS
        .iter()
        .find(|(district, _, _)| *district == normalized)
        .map(|&(district, latitude, longitude)| Location::new(latitude, longitude, district))
}

/// Service for resolving district names to coordinates
pub struct DistrictResolver;

impl DistrictResolver {
    /// Resolve a district name or fail with [`AdvisorError::NotFound`]
    pub fn resolve(name: &str) -> Result<Location> {
        debug!("Resolving district input: {:?}", name);
        let location = find_district(name)
            .ok_or_else(|| AdvisorError::not_found(normalize_district_name(name)))?;
        debug!(
            "Resolved district: {} at ({}, {})",
            location.name, location.latitude, location.longitude
        );
        Ok(location)
    }
}

/// Aggregate and classify an hourly series
#[must_use]
pub fn summarize_series(series: &HourlySeries) -> (Vec<DailySummary>, Vec<HourlyAlert>) {
    let aggregation = aggregate_daily(series);
    let daily_summary = aggregation
        .days
        .iter()
        .map(|(date, bucket)| classify_day(date, bucket))
        .collect();
    (daily_summary, aggregation.alerts)
}

/// Fetch and summarise the forecast window for one district
#[instrument(skip(provider))]
pub fn get_weather_for_district(
    provider: &dyn ForecastProvider,
    district_name: &str,
) -> Result<DistrictReport> {
    let location = DistrictResolver::resolve(district_name)?;
    let series = provider.fetch_hourly(&location, DEFAULT_FORECAST_DAYS)?;
    let (daily_summary, alerts) = summarize_series(&series);

    info!(
        "Summarised {} days with {} hourly alerts for {}",
        daily_summary.len(),
        alerts.len(),
        location.name
    );

    Ok(DistrictReport {
        district: location.name,
        daily_summary,
        alerts,
    })
}

/// Public entry point for the presentation layer
///
/// An unknown district becomes an [`DistrictOutcome::Error`] value; upstream
/// failures are returned as `Err` and are never retried.
pub fn resolve_and_summarize(
    provider: &dyn ForecastProvider,
    district_name: &str,
) -> Result<DistrictOutcome> {
    match get_weather_for_district(provider, district_name) {
        Ok(report) => Ok(DistrictOutcome::Report(report)),
        Err(err @ AdvisorError::NotFound { .. }) => Ok(DistrictOutcome::Error {
            error: err.to_string(),
        }),
        Err(err) => Err(err),
    }
}
