//! Daily aggregation of hourly forecast records
//!
//! Buckets every hour by its calendar date and raises hourly alerts for
//! sub-daily threshold breaches. Missing values follow the per-variable rules
//! of [`HourlyRecord`]: temperature, wind and cloud are dropped, precipitation
//! and radiation count as zero.

use crate::models::{AlertKind, HourlyAlert, HourlyRecord, HourlySeries};
use std::collections::BTreeMap;
use tracing::debug;

/// Hourly precipitation (mm) at or above which an hour raises an alert
pub const HEAVY_RAIN_HOURLY_MM: f64 = 10.0;
/// Hourly wind speed (m/s) at or above which an hour raises an alert
pub const HIGH_WIND_HOURLY_MS: f64 = 15.0;
/// Shortwave radiation (W/m²) an hour must exceed to count as a sunlight hour
pub const SUNLIGHT_RADIATION_MIN: f64 = 20.0;

/// Hourly values gathered for one calendar date
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DailyBucket {
    pub temps: Vec<f64>,
    pub winds: Vec<f64>,
    /// One entry per hour, zero-filled when the provider omitted the value
    pub precips: Vec<f64>,
    pub clouds: Vec<f64>,
    pub sunlight_hour_count: u32,
}

impl DailyBucket {
    fn add(&mut self, record: &HourlyRecord<'_>) {
        if let Some(temperature) = record.temperature {
            self.temps.push(temperature);
        }
        if let Some(wind_speed) = record.wind_speed {
            self.winds.push(wind_speed);
        }
        self.precips.push(record.precipitation);
        if let Some(cloud_cover) = record.cloud_cover {
            self.clouds.push(cloud_cover);
        }
        if record.shortwave_radiation > SUNLIGHT_RADIATION_MIN {
            self.sunlight_hour_count += 1;
        }
    }
}

/// Buckets in ascending date order plus alerts in hourly order
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Aggregation {
    pub days: BTreeMap<String, DailyBucket>,
    pub alerts: Vec<HourlyAlert>,
}

fn hourly_alerts(record: &HourlyRecord<'_>) -> impl Iterator<Item = AlertKind> {
    let heavy_rain =
        (record.precipitation >= HEAVY_RAIN_HOURLY_MM).then_some(AlertKind::HeavyRainHourly);
    let high_wind = record
        .wind_speed
        .filter(|wind| *wind >= HIGH_WIND_HOURLY_MS)
        .map(|_| AlertKind::HighWindHourly);
    heavy_rain.into_iter().chain(high_wind)
}

/// Group an hourly series into per-date buckets and collect hourly alerts
#[must_use]
pub fn aggregate_daily(series: &HourlySeries) -> Aggregation {
    let short = series.short_variables();
    if !short.is_empty() {
        debug!(
            "Hourly series has {} hours but short arrays for: {}",
            series.len(),
            short.join(", ")
        );
    }

    let mut aggregation = Aggregation::default();
    for record in series.records() {
        let date = record.date();
        aggregation
            .days
            .entry(date.to_string())
            .or_default()
            .add(&record);

        for kind in hourly_alerts(&record) {
            aggregation.alerts.push(HourlyAlert::new(date, kind));
        }
    }

    debug!(
        "Aggregated {} hours into {} days with {} alerts",
        series.len(),
        aggregation.days.len(),
        aggregation.alerts.len()
    );
    aggregation
}
