//! Blocking ingestion loop for the sensor board's serial output

use crate::Result;
use crate::sensors::{SensorReading, SensorStore, parse_line};
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, info, warn};

/// Read board lines until EOF, recording every recognised reading
///
/// Undecodable lines and read errors are logged and skipped. Returns the
/// number of readings recorded.
pub fn ingest_lines<R: BufRead>(
    mut reader: R,
    store: &SensorStore,
    poll_interval: Duration,
) -> usize {
    let mut recorded = 0;
    let mut buffer = Vec::new();

    loop {
        buffer.clear();
        match reader.read_until(b'\n', &mut buffer) {
            Ok(0) => break,
            Ok(_) => {}
            Err(e) => {
                warn!("Error reading sensor line: {}", e);
                thread::sleep(poll_interval);
                continue;
            }
        }

        let line = match std::str::from_utf8(&buffer) {
            Ok(line) => line.trim(),
            Err(e) => {
                warn!("Skipping undecodable sensor line: {}", e);
                continue;
            }
        };
        if line.is_empty() {
            continue;
        }

        match parse_line(line) {
            Some((kind, value)) => {
                debug!("{} = {} {}", kind.name(), value, kind.unit());
                match store.record(SensorReading::now(kind, value)) {
                    Ok(()) => recorded += 1,
                    Err(e) => warn!("Error writing sensor reading: {}", e),
                }
            }
            None => debug!("Ignoring sensor line: {:?}", line),
        }

        if !poll_interval.is_zero() {
            thread::sleep(poll_interval);
        }
    }

    info!("Sensor stream closed after {} readings", recorded);
    recorded
}

/// Open the serial device and run [`ingest_lines`] on a dedicated thread
///
/// The device is expected to be configured for the board's baud rate (9600)
/// before it is opened.
pub fn spawn_ingestion(
    device_path: &Path,
    store: Arc<SensorStore>,
    poll_interval: Duration,
) -> Result<JoinHandle<usize>> {
    let device = File::open(device_path)?;
    info!("Reading sensor board from {}", device_path.display());

    let handle = thread::Builder::new()
        .name("sensor-ingest".to_string())
        .spawn(move || ingest_lines(BufReader::new(device), &store, poll_interval))?;
    Ok(handle)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensors::SensorKind;
    use std::io::{Cursor, Write};
    use tempfile::{NamedTempFile, TempDir};

    const BOARD_OUTPUT: &[u8] = b"Booting...\r\n\
        DHT11 - Temperature: 29.5 C\r\n\
        DHT11 - Humidity: 64 %\r\n\
        Soil Moisture: 38\r\n\
        LDR (Analog): \xff\xfe\r\n\
        LDR (Analog): 712\r\n\
        MPL3115A2 - Pressure: 1004.5 hPa\r\n\
        MPL3115A2 - Altitude: 651.2 m\r\n\
        DHT11 - Temperature: 30.0 C\r\n";

    #[test]
    fn test_ingest_lines_records_known_sensors() {
        let dir = TempDir::new().unwrap();
        let store = SensorStore::new(dir.path().join("iot.csv"));

        let recorded = ingest_lines(Cursor::new(BOARD_OUTPUT), &store, Duration::ZERO);

        assert_eq!(recorded, 7);
        let latest = store.latest();
        assert_eq!(latest.len(), 6);
        assert_eq!(store.latest_value(SensorKind::Temperature), Some(30.0));
        assert_eq!(store.latest_value(SensorKind::Ldr), Some(712.0));
        assert_eq!(store.latest_value(SensorKind::Altitude), Some(651.2));
    }

    #[test]
    fn test_spawn_ingestion_reads_device_file() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(SensorStore::new(dir.path().join("iot.csv")));
        let mut device = NamedTempFile::new().unwrap();
        device.write_all(b"DHT11 - Humidity: 55 %\n").unwrap();

        let handle = spawn_ingestion(device.path(), Arc::clone(&store), Duration::ZERO).unwrap();

        assert_eq!(handle.join().unwrap(), 1);
        assert_eq!(store.latest_value(SensorKind::Humidity), Some(55.0));
    }

    #[test]
    fn test_spawn_ingestion_missing_device() {
        let dir = TempDir::new().unwrap();
        let store = Arc::new(SensorStore::new(dir.path().join("iot.csv")));
        let result = spawn_ingestion(&dir.path().join("ttyACM9"), store, Duration::ZERO);
        assert!(result.is_err());
    }
}
