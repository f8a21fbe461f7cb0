//! Hand-off point between the sensor and whatever stores or publishes its readings.
//!
//! A [`Sample`] serializes to the payload telemetry backends receive:
//!
//! ```json
//! {"ts":1760878800123,"temperature":22.14,"humidity":42.3}
//! ```

use log::info;
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::time::{SystemTime, UNIX_EPOCH};

use crate::Reading;

#[derive(thiserror::Error, Debug)]
pub enum TelemetryError {
    #[error("failed to encode sample")]
    Encode(#[from] serde_json::Error),

    #[error("failed to write sample")]
    Io(#[from] std::io::Error),
}

/// A reading stamped with the time it was taken.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Sample {
    /// Milliseconds since the Unix epoch.
    pub ts: u64,
    /// Degrees Celsius.
    pub temperature: f32,
    /// Percent relative humidity.
    pub humidity: f32,
}

impl Sample {
    pub fn new(reading: Reading, ts: u64) -> Self {
        Sample {
            ts,
            temperature: reading.temperature,
            humidity: reading.relative_humidity,
        }
    }

    /// Stamps `reading` with the current system time.
    pub fn now(reading: Reading) -> Self {
        // a clock set before 1970 is reported as the epoch itself
        let ts = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or_default();
        Sample::new(reading, ts)
    }
}

/// Destination for samples, e.g. a message broker or a time-series database.
pub trait Sink {
    type Error;

    fn publish(&mut self, sample: &Sample) -> Result<(), Self::Error>;
}

/// Writes each sample as one line of JSON.
pub struct JsonLines<W: Write> {
    out: W,
}

impl<W: Write> JsonLines<W> {
    pub fn new(out: W) -> Self {
        JsonLines { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl<W: Write> Sink for JsonLines<W> {
    type Error = TelemetryError;

    fn publish(&mut self, sample: &Sample) -> Result<(), TelemetryError> {
        let payload = serde_json::to_string(sample)?;
        info!("{}", payload);
        writeln!(self.out, "{}", payload)?;
        self.out.flush()?;
        Ok(())
    }
}
