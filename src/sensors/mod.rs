//! Field sensor support
//!
//! - Protocol: parsing the text lines printed by the sensor board
//! - Store: latest reading per sensor, mirrored to a CSV file
//! - Ingest: the blocking loop feeding device lines into the store

pub mod ingest;
pub mod protocol;
pub mod store;

pub use ingest::{ingest_lines, spawn_ingestion};
pub use protocol::{SensorKind, parse_line};
pub use store::{SensorReading, SensorStore};
