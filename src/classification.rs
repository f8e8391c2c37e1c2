//! Risk classification and farming advice for aggregated days
//!
//! Rules are evaluated in a fixed order and are independent of each other,
//! except that a day carries at most one temperature risk. The order fixes
//! both the risk list and the sequence of advisory sentences.

use crate::aggregation::DailyBucket;
use crate::models::{DailySummary, Risk, Safety};

/// Max temperature (°C) above which a day is too hot
pub const TEMP_TOO_HOT: f64 = 38.0;
/// Max temperature (°C) below which a day is too cold
pub const TEMP_TOO_COLD: f64 = 10.0;
/// Daily rain (mm) above which a day has heavy rainfall
pub const DAILY_RAIN_HEAVY_MM: f64 = 50.0;
/// Daily rain (mm) below which irrigation is advised
pub const DAILY_RAIN_DRY_MM: f64 = 5.0;
/// Max wind (m/s) above which a day has strong winds
pub const WIND_STRONG_MS: f64 = 15.0;
/// Minimum sunlight hours for healthy growth
pub const SUNLIGHT_HOURS_MIN: u32 = 4;
/// Mean cloud cover (%) above which a day is very cloudy
pub const CLOUD_HIGH_PERCENT: f64 = 80.0;

const ADVICE_TOO_HOT: &str = "High heat — avoid irrigation at noon.";
const ADVICE_TOO_COLD: &str = "Low temp — seed germination may slow down.";
const ADVICE_HEAVY_RAIN: &str = "Avoid sowing/fertilizer; flooding possible.";
const ADVICE_DRY: &str = "Irrigation may be needed.";
const ADVICE_STRONG_WIND: &str = "Avoid pesticide spraying; protect tall crops.";
const ADVICE_LOW_SUNLIGHT: &str = "Low sunlight may slow growth.";
const ADVICE_GOOD_SUNLIGHT: &str = "Good sunlight for crops.";
const ADVICE_HIGH_CLOUD: &str = "Very cloudy — less sunlight for crops.";
const ADVICE_DEFAULT: &str = "Good day for farming.";

fn max_of(values: &[f64]) -> Option<f64> {
    values.iter().copied().reduce(f64::max)
}

fn mean_of(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        None
    } else {
        Some(values.iter().sum::<f64>() / values.len() as f64)
    }
}

#[derive(Default)]
struct Findings {
    risks: Vec<Risk>,
    advice: Vec<&'static str>,
}

impl Findings {
    fn flag(&mut self, risk: Risk, advice: &'static str) {
        self.risks.push(risk);
        self.advice.push(advice);
    }

    fn advise(&mut self, advice: &'static str) {
        self.advice.push(advice);
    }
}

/// Summarise one day's bucket into a classified [`DailySummary`]
#[must_use]
pub fn classify_day(date: &str, bucket: &DailyBucket) -> DailySummary {
    let max_temp = max_of(&bucket.temps);
    // precips always has one entry per hour, so the empty sum is only a fallback
    let total_rain: f64 = bucket.precips.iter().sum();
    let max_wind = max_of(&bucket.winds);
    let avg_cloud = mean_of(&bucket.clouds);
    let sunlight_hours = bucket.sunlight_hour_count;

    let mut findings = Findings::default();

    match max_temp {
        Some(temp) if temp > TEMP_TOO_HOT => findings.flag(Risk::TooHot, ADVICE_TOO_HOT),
        Some(temp) if temp < TEMP_TOO_COLD => findings.flag(Risk::TooCold, ADVICE_TOO_COLD),
        _ => {}
    }

    if total_rain > DAILY_RAIN_HEAVY_MM {
        findings.flag(Risk::HeavyRainfall, ADVICE_HEAVY_RAIN);
    } else if total_rain < DAILY_RAIN_DRY_MM {
        findings.advise(ADVICE_DRY);
    }

    if max_wind.is_some_and(|wind| wind > WIND_STRONG_MS) {
        findings.flag(Risk::StrongWinds, ADVICE_STRONG_WIND);
    }

    if sunlight_hours < SUNLIGHT_HOURS_MIN {
        findings.flag(Risk::LowSunlight, ADVICE_LOW_SUNLIGHT);
    } else {
        findings.advise(ADVICE_GOOD_SUNLIGHT);
    }

    if avg_cloud.is_some_and(|cloud| cloud > CLOUD_HIGH_PERCENT) {
        findings.flag(Risk::HighCloud, ADVICE_HIGH_CLOUD);
    }

    if findings.advice.is_empty() {
        findings.advise(ADVICE_DEFAULT);
    }

    DailySummary {
        date: date.to_string(),
        max_temp,
        total_rain,
        max_wind,
        sunlight_hours,
        avg_cloud,
        safety: Safety::from_risks(&findings.risks),
        risks: findings.risks,
        advice: findings.advice,
    }
}
