//! Line protocol of the sensor board
//!
//! The board prints one reading per line, e.g. `DHT11 - Temperature: 27.5 C`.
//! The line prefix names the sensor; the value is the first number after the
//! first colon.

use regex::Regex;
use std::sync::LazyLock;

static NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[-+]?\d*\.\d+|\d+").expect("number pattern is valid"));

/// Sensors attached to the board
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorKind {
    Temperature,
    Humidity,
    SoilMoisture,
    Ldr,
    Pressure,
    Altitude,
}

impl SensorKind {
    pub const ALL: [SensorKind; 6] = [
        SensorKind::Temperature,
        SensorKind::Humidity,
        SensorKind::SoilMoisture,
        SensorKind::Ldr,
        SensorKind::Pressure,
        SensorKind::Altitude,
    ];

    /// Line prefix printed by the board for this sensor
    #[must_use]
    pub fn prefix(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "DHT11 - Temperature",
            SensorKind::Humidity => "DHT11 - Humidity",
            SensorKind::SoilMoisture => "Soil Moisture",
            SensorKind::Ldr => "LDR (Analog)",
            SensorKind::Pressure => "MPL3115A2 - Pressure",
            SensorKind::Altitude => "MPL3115A2 - Altitude",
        }
    }

    /// Name used in the CSV file and the API
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "Temperature",
            SensorKind::Humidity => "Humidity",
            SensorKind::SoilMoisture => "Soil Moisture",
            SensorKind::Ldr => "LDR",
            SensorKind::Pressure => "Pressure",
            SensorKind::Altitude => "Altitude",
        }
    }

    #[must_use]
    pub fn unit(&self) -> &'static str {
        match self {
            SensorKind::Temperature => "°C",
            SensorKind::Humidity => "%",
            SensorKind::SoilMoisture | SensorKind::Ldr => "",
            SensorKind::Pressure => "hPa",
            SensorKind::Altitude => "m",
        }
    }

    /// Sensor whose prefix starts `line`
    #[must_use]
    pub fn from_line(line: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|kind| line.starts_with(kind.prefix()))
    }
}

/// Extract the first number after the first `:` of a line, as printed
#[must_use]
pub fn parse_value(line: &str) -> Option<&str> {
    let (_, rest) = line.split_once(':')?;
    NUMBER.find(rest.trim()).map(|m| m.as_str())
}

/// Parse a board line into its sensor and raw value text
///
/// Lines with an unknown prefix, no colon or no number yield `None`.
#[must_use]
pub fn parse_line(line: &str) -> Option<(SensorKind, &str)> {
    let line = line.trim();
    let kind = SensorKind::from_line(line)?;
    let value = parse_value(line)?;
    Some((kind, value))
}
