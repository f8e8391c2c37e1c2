//! Latest-reading store backed by a CSV file
//!
//! The CSV is rewritten after every accepted reading and only ever holds the
//! newest value of each sensor, in first-seen order.

use crate::Result;
use crate::sensors::SensorKind;
use chrono::Local;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::{PoisonError, RwLock};
use tracing::{debug, warn};

/// Timestamp layout used in the CSV file
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// One sensor value as stored in the CSV file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SensorReading {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Sensor")]
    pub sensor: String,
    /// Value text as printed by the board
    #[serde(rename = "Value")]
    pub value: String,
    #[serde(rename = "Unit")]
    pub unit: String,
}

impl SensorReading {
    /// Reading for `kind` stamped with the current local time
    #[must_use]
    pub fn now(kind: SensorKind, value: &str) -> Self {
        Self {
            timestamp: Local::now().format(TIMESTAMP_FORMAT).to_string(),
            sensor: kind.name().to_string(),
            value: value.to_string(),
            unit: kind.unit().to_string(),
        }
    }

    #[must_use]
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }
}

/// Latest reading per sensor, shared between the ingest thread and the API
#[derive(Debug)]
pub struct SensorStore {
    csv_path: PathBuf,
    readings: RwLock<Vec<SensorReading>>,
}

impl SensorStore {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            readings: RwLock::new(Vec::new()),
        }
    }

    #[must_use]
    pub fn csv_path(&self) -> &Path {
        &self.csv_path
    }

    /// Replace the sensor's previous reading and rewrite the CSV file
    pub fn record(&self, reading: SensorReading) -> Result<()> {
        let snapshot = {
            let mut readings = self.readings.write().unwrap_or_else(PoisonError::into_inner);
            match readings.iter_mut().find(|r| r.sensor == reading.sensor) {
                Some(existing) => *existing = reading,
                None => readings.push(reading),
            }
            readings.clone()
        };
        self.write_csv(&snapshot)
    }

    /// In-memory latest readings
    #[must_use]
    pub fn latest(&self) -> Vec<SensorReading> {
        self.readings
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    fn write_csv(&self, readings: &[SensorReading]) -> Result<()> {
        let mut writer = csv::Writer::from_path(&self.csv_path)?;
        for reading in readings {
            writer.serialize(reading)?;
        }
        writer.flush()?;
        debug!("Wrote {} readings to {}", readings.len(), self.csv_path.display());
        Ok(())
    }

    /// All rows of the CSV file; a missing file reads as empty
    pub fn read_history(&self) -> Result<Vec<SensorReading>> {
        if !self.csv_path.exists() {
            return Ok(Vec::new());
        }
        let mut reader = csv::Reader::from_path(&self.csv_path)?;
        let rows = reader
            .deserialize()
            .collect::<std::result::Result<Vec<SensorReading>, csv::Error>>()?;
        Ok(rows)
    }

    /// Last persisted value of a sensor, if present and numeric
    #[must_use]
    pub fn latest_value(&self, kind: SensorKind) -> Option<f64> {
        let rows = match self.read_history() {
            Ok(rows) => rows,
            Err(e) => {
                warn!("Error reading sensor CSV {}: {}", self.csv_path.display(), e);
                return None;
            }
        };
        rows.iter()
            .rev()
            .find(|row| row.sensor == kind.name())
            .and_then(SensorReading::numeric_value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn store() -> (TempDir, SensorStore) {
        let dir = TempDir::new().unwrap();
        let store = SensorStore::new(dir.path().join("iot_data.csv"));
        (dir, store)
    }

    #[test]
    fn test_record_keeps_latest_per_sensor() {
        let (_dir, store) = store();
        store.record(SensorReading::now(SensorKind::Temperature, "27.5")).unwrap();
        store.record(SensorReading::now(SensorKind::Humidity, "61")).unwrap();
        store.record(SensorReading::now(SensorKind::Temperature, "28.0")).unwrap();

        let latest = store.latest();
        assert_eq!(latest.len(), 2);
        assert_eq!(latest[0].sensor, "Temperature");
        assert_eq!(latest[0].value, "28.0");
        assert_eq!(latest[0].unit, "°C");
        assert_eq!(latest[1].sensor, "Humidity");
    }

    #[test]
    fn test_csv_mirrors_latest_readings() {
        let (_dir, store) = store();
        store.record(SensorReading::now(SensorKind::Pressure, "1008.25")).unwrap();
        store.record(SensorReading::now(SensorKind::Pressure, "1009")).unwrap();

        let contents = std::fs::read_to_string(store.csv_path()).unwrap();
        assert!(contents.starts_with("Timestamp,Sensor,Value,Unit"));
        assert_eq!(store.read_history().unwrap(), store.latest());
        assert_eq!(store.latest_value(SensorKind::Pressure), Some(1009.0));
    }

    #[test]
    fn test_latest_value_missing_or_unparseable() {
        let (_dir, store) = store();
        assert_eq!(store.latest_value(SensorKind::Temperature), None);
        assert!(store.read_history().unwrap().is_empty());

        std::fs::write(
            store.csv_path(),
            "Timestamp,Sensor,Value,Unit\n2025-06-01 10:00:00,Humidity,n/a,%\n",
        )
        .unwrap();
        assert_eq!(store.latest_value(SensorKind::Humidity), None);
    }

    #[test]
    fn test_latest_value_uses_last_matching_row() {
        let (_dir, store) = store();
        std::fs::write(
            store.csv_path(),
            "Timestamp,Sensor,Value,Unit\n\
             2025-06-01 10:00:00,Soil Moisture,40,\n\
             2025-06-01 10:00:01,Soil Moisture,55,\n",
        )
        .unwrap();
        assert_eq!(store.latest_value(SensorKind::SoilMoisture), Some(55.0));
    }
}
