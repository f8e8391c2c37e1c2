//! Hourly forecast series as delivered by the provider
//!
//! The provider returns one array per variable, parallel-indexed with `time`.
//! Arrays can be shorter than `time`, missing entirely, or contain `null`
//! entries. Each of those cases is read the same way: the value is absent.
//! What "absent" means differs per variable, see [`HourlyRecord`].

use serde::{Deserialize, Serialize};

/// Parallel hourly arrays keyed by Open-Meteo variable name
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HourlySeries {
    /// ISO-8601 local timestamps, e.g. `2025-06-01T13:00`
    #[serde(default)]
    pub time: Vec<String>,
    /// Air temperature at 2 m in Celsius
    #[serde(rename = "temperature_2m", default)]
    pub temperature: Vec<Option<f64>>,
    /// Precipitation in mm for the preceding hour
    #[serde(default)]
    pub precipitation: Vec<Option<f64>>,
    /// Wind speed at 10 m in m/s
    #[serde(rename = "windspeed_10m", default)]
    pub wind_speed: Vec<Option<f64>>,
    /// Shortwave radiation in W/m²
    #[serde(default)]
    pub shortwave_radiation: Vec<Option<f64>>,
    /// Total cloud cover in percent
    #[serde(rename = "cloudcover", default)]
    pub cloud_cover: Vec<Option<f64>>,
}

/// One hour of the series with the missing-value rules applied
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct HourlyRecord<'a> {
    pub timestamp: &'a str,
    /// Dropped from the day when absent
    pub temperature: Option<f64>,
    /// Zero when absent
    pub precipitation: f64,
    /// Dropped from the day when absent
    pub wind_speed: Option<f64>,
    /// Zero when absent
    pub shortwave_radiation: f64,
    /// Dropped from the day when absent
    pub cloud_cover: Option<f64>,
}

impl HourlyRecord<'_> {
    /// Calendar date of this hour: the part of the timestamp before `T`
    #[must_use]
    pub fn date(&self) -> &str {
        self.timestamp
            .split_once('T')
            .map_or(self.timestamp, |(date, _)| date)
    }
}

fn value_at(values: &[Option<f64>], index: usize) -> Option<f64> {
    values.get(index).copied().flatten()
}

impl HourlySeries {
    /// Number of hours, always driven by the `time` array
    #[must_use]
    pub fn len(&self) -> usize {
        self.time.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.time.is_empty()
    }

    /// Record for hour `index`, or `None` past the end of `time`
    #[must_use]
    pub fn record(&self, index: usize) -> Option<HourlyRecord<'_>> {
        let timestamp = self.time.get(index)?;
        Some(HourlyRecord {
            timestamp,
            temperature: value_at(&self.temperature, index),
            precipitation: value_at(&self.precipitation, index).unwrap_or(0.0),
            wind_speed: value_at(&self.wind_speed, index),
            shortwave_radiation: value_at(&self.shortwave_radiation, index).unwrap_or(0.0),
            cloud_cover: value_at(&self.cloud_cover, index),
        })
    }

    /// Records in hourly index order
    pub fn records(&self) -> impl Iterator<Item = HourlyRecord<'_>> + '_ {
        (0..self.len()).filter_map(move |index| self.record(index))
    }

    /// Names of variables whose array is shorter than `time`
    #[must_use]
    pub fn short_variables(&self) -> Vec<&'static str> {
        let hours = self.len();
        [
            ("temperature_2m", self.temperature.len()),
            ("precipitation", self.precipitation.len()),
            ("windspeed_10m", self.wind_speed.len()),
            ("shortwave_radiation", self.shortwave_radiation.len()),
            ("cloudcover", self.cloud_cover.len()),
        ]
        .into_iter()
        .filter(|(_, len)| *len < hours)
        .map(|(name, _)| name)
        .collect()
    }
}
