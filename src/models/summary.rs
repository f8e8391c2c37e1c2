//! Daily summaries, hourly alerts and the per-district report

use serde::{Serialize, Serializer};

/// Serialize a unit enum as its human-readable label
macro_rules! serialize_as_label {
    ($ty:ty) => {
        impl Serialize for $ty {
            fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
                serializer.serialize_str(self.label())
            }
        }
    };
}

/// A named condition attached to a day when its threshold rule fires
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Risk {
    TooHot,
    TooCold,
    HeavyRainfall,
    StrongWinds,
    LowSunlight,
    HighCloud,
}

impl Risk {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Risk::TooHot => "Too Hot",
            Risk::TooCold => "Too Cold",
            Risk::HeavyRainfall => "Heavy Rainfall",
            Risk::StrongWinds => "Strong Winds",
            Risk::LowSunlight => "Low Sunlight",
            Risk::HighCloud => "High Cloud",
        }
    }

    /// Risks that make field work unsafe on their own
    #[must_use]
    pub fn is_hazard(&self) -> bool {
        matches!(self, Risk::HeavyRainfall | Risk::StrongWinds)
    }
}

serialize_as_label!(Risk);

/// Overall verdict for a day
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
    Safe,
    Caution,
    NotSafe,
}

impl Safety {
    /// Derive the verdict from a day's gathered risks
    #[must_use]
    pub fn from_risks(risks: &[Risk]) -> Self {
        if risks.iter().any(Risk::is_hazard) {
            Safety::NotSafe
        } else if risks.is_empty() {
            Safety::Safe
        } else {
            Safety::Caution
        }
    }

    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            Safety::Safe => "Safe",
            Safety::Caution => "Caution",
            Safety::NotSafe => "Not Safe",
        }
    }
}

serialize_as_label!(Safety);

/// Kind of sub-daily threshold breach
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertKind {
    HeavyRainHourly,
    HighWindHourly,
}

impl AlertKind {
    #[must_use]
    pub fn label(&self) -> &'static str {
        match self {
            AlertKind::HeavyRainHourly => "Heavy Rain Hourly",
            AlertKind::HighWindHourly => "High Wind Hourly",
        }
    }
}

serialize_as_label!(AlertKind);

/// Hourly threshold breach, recorded independently of the daily risks
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HourlyAlert {
    pub date: String,
    pub kind: AlertKind,
}

impl HourlyAlert {
    #[must_use]
    pub fn new(date: impl Into<String>, kind: AlertKind) -> Self {
        Self {
            date: date.into(),
            kind,
        }
    }
}

/// Aggregated and classified forecast for one calendar date
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailySummary {
    pub date: String,
    /// Highest hourly temperature in Celsius
    pub max_temp: Option<f64>,
    /// Sum of hourly precipitation in mm
    pub total_rain: f64,
    /// Highest hourly wind speed in m/s
    pub max_wind: Option<f64>,
    /// Hours with shortwave radiation above 20 W/m²
    pub sunlight_hours: u32,
    /// Mean cloud cover in percent
    pub avg_cloud: Option<f64>,
    /// Risks in rule evaluation order
    #[serde(serialize_with = "serialize_risks")]
    pub risks: Vec<Risk>,
    pub safety: Safety,
    /// Advisory sentences in rule evaluation order
    #[serde(serialize_with = "serialize_advice")]
    pub advice: Vec<&'static str>,
}

impl DailySummary {
    /// Comma-joined risk labels, or `None` for a risk-free day
    #[must_use]
    pub fn risks_label(&self) -> String {
        join_risks(&self.risks)
    }

    /// Advisory sentences joined by a space
    #[must_use]
    pub fn advice_text(&self) -> String {
        self.advice.join(" ")
    }

    #[must_use]
    pub fn has_risk(&self, risk: Risk) -> bool {
        self.risks.contains(&risk)
    }
}

fn join_risks(risks: &[Risk]) -> String {
    if risks.is_empty() {
        "None".to_string()
    } else {
        let labels: Vec<&str> = risks.iter().map(Risk::label).collect();
        labels.join(", ")
    }
}

fn serialize_risks<S: Serializer>(risks: &[Risk], serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&join_risks(risks))
}

fn serialize_advice<S: Serializer>(
    advice: &[&'static str],
    serializer: S,
) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(&advice.join(" "))
}

/// Forecast report for one district
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DistrictReport {
    pub district: String,
    pub daily_summary: Vec<DailySummary>,
    pub alerts: Vec<HourlyAlert>,
}

/// Result of a district lookup as handed to the presentation layer
///
/// Serializes to `{district, daily_summary, alerts}` or `{error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DistrictOutcome {
    Report(DistrictReport),
    Error { error: String },
}

impl DistrictOutcome {
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, DistrictOutcome::Error { .. })
    }

    #[must_use]
    pub fn report(&self) -> Option<&DistrictReport> {
        match self {
            DistrictOutcome::Report(report) => Some(report),
            DistrictOutcome::Error { .. } => None,
        }
    }
}
