//! Rule-based crop recommendation
//!
//! Scores each candidate crop from field conditions (sensor readings and
//! today's forecast) plus the static soil profile of the farm.

use crate::Result;
use crate::aggregation::aggregate_daily;
use crate::models::{HourlySeries, Location};
use crate::sensors::{SensorKind, SensorStore};
use crate::weather::ForecastProvider;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

/// Number of crops returned by default
pub const DEFAULT_TOP_N: usize = 2;

/// Farm used for forecast-driven recommendations (Ranchi)
pub const FARM_LATITUDE: f64 = 23.344_315;
pub const FARM_LONGITUDE: f64 = 85.296_013;

const DEFAULT_TEMPERATURE: f64 = 25.0;
const DEFAULT_HUMIDITY: f64 = 60.0;
const DEFAULT_MOISTURE: f64 = 50.0;
const DEFAULT_PRESSURE: f64 = 1013.0;

/// Static soil test values of the farm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SoilProfile {
    #[serde(rename = "Nitrogen")]
    pub nitrogen: f64,
    #[serde(rename = "Phosphorous")]
    pub phosphorous: f64,
    #[serde(rename = "Potassium")]
    pub potassium: f64,
    #[serde(rename = "Ph")]
    pub ph: f64,
    #[serde(rename = "Zn")]
    pub zinc: f64,
    #[serde(rename = "S")]
    pub sulfur: f64,
}

pub const FARM_SOIL: SoilProfile = SoilProfile {
    nitrogen: 18.49,
    phosphorous: 18.37,
    potassium: 3.98,
    ph: 5.71,
    zinc: 1.90,
    sulfur: 12.21,
};

/// Field conditions fed into the crop rules
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FieldConditions {
    /// Air temperature in Celsius
    #[serde(rename = "Temperature")]
    pub temperature: f64,
    /// Relative humidity in percent
    #[serde(rename = "Humidity")]
    pub humidity: f64,
    /// Soil moisture sensor reading
    #[serde(rename = "Moisture")]
    pub moisture: f64,
    /// Pressure in hPa
    #[serde(rename = "Pressure")]
    pub pressure: f64,
    /// Today's rainfall in mm
    #[serde(rename = "Rainfall")]
    pub rainfall: f64,
    /// Today's max wind in m/s
    #[serde(rename = "Wind")]
    pub wind: f64,
    /// Today's mean cloud cover in percent
    #[serde(rename = "Cloud")]
    pub cloud: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Crop {
    Rice,
    Wheat,
    Cotton,
}

impl Crop {
    /// Candidates in tie-break order
    pub const ALL: [Crop; 3] = [Crop::Rice, Crop::Wheat, Crop::Cotton];
}

/// Recommended crops together with every input that produced them
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CropRecommendation {
    pub crops: Vec<Crop>,
    pub inputs: FieldConditions,
    pub soil: SoilProfile,
}

/// Today's rain, wind and cloud from the first date of a forecast series
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TodayWeather {
    pub rain: f64,
    pub wind: f64,
    pub cloud: f64,
}

impl TodayWeather {
    /// Zero for every value the series does not provide
    #[must_use]
    pub fn from_series(series: &HourlySeries) -> Self {
        let aggregation = aggregate_daily(series);
        let Some(first_day) = aggregation.days.values().next() else {
            return Self::default();
        };

        let cloud = if first_day.clouds.is_empty() {
            0.0
        } else {
            first_day.clouds.iter().sum::<f64>() / first_day.clouds.len() as f64
        };

        Self {
            rain: first_day.precips.iter().sum(),
            wind: first_day.winds.iter().copied().fold(0.0, f64::max),
            cloud,
        }
    }
}

/// Score every candidate crop, best first; ties keep [`Crop::ALL`] order
#[must_use]
pub fn score_crops(conditions: &FieldConditions, soil: &SoilProfile) -> Vec<(Crop, u32)> {
    let mut rice = 0;
    let mut wheat = 0;
    let mut cotton = 0;

    if conditions.temperature > 28.0 && conditions.moisture > 40.0 && soil.nitrogen > 15.0 {
        rice += 3;
    }
    if conditions.temperature > 25.0 && conditions.humidity < 70.0 && conditions.rainfall < 5.0 {
        wheat += 3;
    }
    if soil.potassium < 5.0 || conditions.humidity > 70.0 {
        cotton += 2;
    }
    if conditions.moisture < 40.0 {
        wheat += 1;
    }
    if conditions.rainfall > 50.0 {
        rice += 1;
    }

    let mut scores: Vec<(Crop, u32)> = Crop::ALL.into_iter().zip([rice, wheat, cotton]).collect();
    scores.sort_by(|a, b| b.1.cmp(&a.1));
    scores
}

/// The `top_n` best crops for the given conditions
#[must_use]
pub fn recommend_crops(
    conditions: &FieldConditions,
    soil: &SoilProfile,
    top_n: usize,
) -> Vec<Crop> {
    score_crops(conditions, soil)
        .into_iter()
        .take(top_n)
        .map(|(crop, _)| crop)
        .collect()
}

/// Recommend crops from manually entered conditions
#[must_use]
pub fn recommend_manual(conditions: FieldConditions, top_n: usize) -> CropRecommendation {
    CropRecommendation {
        crops: recommend_crops(&conditions, &FARM_SOIL, top_n),
        inputs: conditions,
        soil: FARM_SOIL,
    }
}

/// Recommend crops from the latest sensor readings and today's forecast
///
/// Sensors without a stored reading fall back to typical field values.
#[instrument(skip(store, provider))]
pub fn recommend_from_field(
    store: &SensorStore,
    provider: &dyn ForecastProvider,
    top_n: usize,
) -> Result<CropRecommendation> {
    let farm = Location::new(FARM_LATITUDE, FARM_LONGITUDE, "Farm");
    let today = TodayWeather::from_series(&provider.fetch_hourly(&farm, 1)?);

    let conditions = FieldConditions {
        temperature: store
            .latest_value(SensorKind::Temperature)
            .unwrap_or(DEFAULT_TEMPERATURE),
        humidity: store
            .latest_value(SensorKind::Humidity)
            .unwrap_or(DEFAULT_HUMIDITY),
        moisture: store
            .latest_value(SensorKind::SoilMoisture)
            .unwrap_or(DEFAULT_MOISTURE),
        pressure: store
            .latest_value(SensorKind::Pressure)
            .unwrap_or(DEFAULT_PRESSURE),
        rainfall: today.rain,
        wind: today.wind,
        cloud: today.cloud,
    };
    debug!("Field conditions: {:?}", conditions);

    Ok(recommend_manual(conditions, top_n))
}
