//! Forecast fetcher for the Open-Meteo hourly API
//!
//! One blocking request per call: no retry, no caching. Callers that need
//! concurrency run independent fetches on their own threads.

use crate::config::WeatherConfig;
use crate::models::{HourlySeries, Location};
use crate::{AdvisorError, Result};
use reqwest::blocking::Client;
use std::time::{Duration, Instant};
use tracing::{debug, info, instrument, warn};

/// Hourly variables requested from the provider, in request order
pub const HOURLY_VARIABLES: [&str; 5] = [
    "temperature_2m",
    "precipitation",
    "windspeed_10m",
    "shortwave_radiation",
    "cloudcover",
];

/// Default forecast window in days
pub const DEFAULT_FORECAST_DAYS: u32 = 7;

/// Source of hourly forecast series for a coordinate
pub trait ForecastProvider: Send + Sync {
    /// Fetch `days` days of hourly data for `location`
    fn fetch_hourly(&self, location: &Location, days: u32) -> Result<HourlySeries>;
}

/// Blocking HTTP client for the Open-Meteo forecast endpoint
#[derive(Debug, Clone)]
pub struct ForecastClient {
    base_url: String,
    timezone: String,
    timeout: Duration,
}

impl ForecastClient {
    #[must_use]
    pub fn new(config: &WeatherConfig) -> Self {
        Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            timezone: config.timezone.clone(),
            timeout: Duration::from_secs(config.timeout_seconds.into()),
        }
    }

    fn forecast_url(&self) -> String {
        format!("{}/forecast", self.base_url)
    }

    // The blocking client owns a runtime, so it is built on the calling
    // thread and dropped there, never inside an async context.
    fn http_client(&self) -> Result<Client> {
        Client::builder()
            .timeout(self.timeout)
            .user_agent(concat!("farmcast/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| AdvisorError::upstream(format!("Failed to create HTTP client: {e}")))
    }
}

impl ForecastProvider for ForecastClient {
    #[instrument(skip(self, location), fields(district = %location.name))]
    fn fetch_hourly(&self, location: &Location, days: u32) -> Result<HourlySeries> {
        info!(
            "Fetching {}-day hourly forecast for {}",
            days,
            location.format_coordinates()
        );
        let start_time = Instant::now();

        let latitude = location.latitude.to_string();
        let longitude = location.longitude.to_string();
        let hourly = HOURLY_VARIABLES.join(",");
        let forecast_days = days.to_string();

        let response = self
            .http_client()?
            .get(self.forecast_url())
            .query(&[
                ("latitude", latitude.as_str()),
                ("longitude", longitude.as_str()),
                ("hourly", hourly.as_str()),
                ("timezone", self.timezone.as_str()),
                ("forecast_days", forecast_days.as_str()),
                ("wind_speed_unit", "ms"),
            ])
            .send()?;

        let status = response.status();
        debug!("Forecast response status: {}", status);
        if !status.is_success() {
            warn!("Forecast provider rejected request: {}", status);
            return Err(AdvisorError::upstream(format!(
                "forecast provider responded with {} - {}",
                status,
                status.canonical_reason().unwrap_or("Unknown error")
            )));
        }

        let forecast: openmeteo::ForecastResponse = response.json()?;
        let series = forecast.hourly.unwrap_or_default();

        info!(
            "Retrieved {} hourly records in {:.3}s",
            series.len(),
            start_time.elapsed().as_secs_f64()
        );

        Ok(series)
    }
}

/// `OpenMeteo` API response structures
mod openmeteo {
    use crate::models::HourlySeries;
    use serde::Deserialize;

    /// Forecast response; only the hourly block is consumed
    #[derive(Debug, Deserialize)]
    pub struct ForecastResponse {
        #[serde(default)]
        pub hourly: Option<HourlySeries>,
    }
}
