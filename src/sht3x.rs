use embedded_hal::delay::DelayNs;
use log::debug;

use crate::bus::Bus;
use crate::crc::crc8;
use crate::error::{BusError, Error, Field, Result};

/// Address with the ADDR pin pulled high, used by the Grove SHT3x module.
pub const DEFAULT_ADDRESS: u16 = 0x45;
/// Address with the ADDR pin pulled low.
pub const ALTERNATE_ADDRESS: u16 = 0x44;

/// Single shot measurement, high repeatability, clock stretching disabled (command 0x2400).
const CMD_MEASURE_HIGH_REP: u8 = 0x24;
const CMD_MEASURE_HIGH_REP_ARG: u8 = 0x00;
/// Worst-case conversion time for high repeatability.
const MEASUREMENT_DURATION_MS: u32 = 16;
const READ_REGISTER: u8 = 0x00;
const FRAME_LEN: usize = 6;

/// Calibrated measurement returned by [`Sht3x::read`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Reading {
    /// Temperature in degrees Celsius.
    pub temperature: f32,
    /// Relative humidity in percent. Not clamped, may leave 0..=100 slightly at the extremes.
    pub relative_humidity: f32,
}

impl Reading {
    /// Converts raw 16-bit sensor words using the datasheet formulas.
    pub fn from_raw(temperature: u16, humidity: u16) -> Self {
        Reading {
            temperature: -45.0 + 175.0 * f32::from(temperature) / 65535.0,
            relative_humidity: 100.0 * f32::from(humidity) / 65535.0,
        }
    }

    pub fn fahrenheit(&self) -> f32 {
        self.temperature * 9.0 / 5.0 + 32.0
    }
}

/// The 6 bytes returned for one measurement:
/// `[temp MSB, temp LSB, temp CRC, humidity MSB, humidity LSB, humidity CRC]`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RawFrame([u8; FRAME_LEN]);

impl RawFrame {
    pub fn new(bytes: [u8; FRAME_LEN]) -> Self {
        RawFrame(bytes)
    }

    /// Checks both CRCs, temperature first, and returns the raw temperature and humidity words.
    pub fn validate(&self) -> Result<(u16, u16)> {
        let [t_msb, t_lsb, t_crc, h_msb, h_lsb, h_crc] = self.0;
        let temperature = checked_word([t_msb, t_lsb], t_crc, Field::Temperature)?;
        let humidity = checked_word([h_msb, h_lsb], h_crc, Field::Humidity)?;
        Ok((temperature, humidity))
    }

    pub fn to_reading(&self) -> Result<Reading> {
        let (temperature, humidity) = self.validate()?;
        Ok(Reading::from_raw(temperature, humidity))
    }
}

impl TryFrom<&[u8]> for RawFrame {
    type Error = BusError;

    fn try_from(data: &[u8]) -> std::result::Result<Self, BusError> {
        let bytes = <[u8; FRAME_LEN]>::try_from(data).map_err(|_| BusError::ShortTransfer {
            expected: FRAME_LEN,
            actual: data.len(),
        })?;
        Ok(RawFrame(bytes))
    }
}

fn checked_word(word: [u8; 2], received: u8, field: Field) -> Result<u16> {
    let expected = crc8(&word);
    if expected != received {
        return Err(Error::Checksum {
            field,
            expected,
            received,
        });
    }
    Ok(u16::from_be_bytes(word))
}

/// Driver for a Sensirion SHT3x sensor.
///
/// `read` takes `&mut self`, so one sensor never has two measurements in flight. If several
/// sensors share one bus the caller has to serialize access to it.
pub struct Sht3x<B, D> {
    bus: B,
    delay: D,
    address: u16,
}

impl<B, D> Sht3x<B, D>
where
    B: Bus,
    D: DelayNs,
{
    /// Creates a driver for a sensor at [`DEFAULT_ADDRESS`].
    pub fn new(bus: B, delay: D) -> Self {
        Self::with_address(bus, delay, DEFAULT_ADDRESS)
    }

    pub fn with_address(bus: B, delay: D, address: u16) -> Self {
        Sht3x {
            bus,
            delay,
            address,
        }
    }

    pub fn address(&self) -> u16 {
        self.address
    }

    /// Gives back the bus and delay provider.
    pub fn release(self) -> (B, D) {
        (self.bus, self.delay)
    }

    /// Triggers one measurement and returns it once both CRCs check out.
    ///
    /// Blocks for the full conversion time between the command and the read. Nothing is
    /// retried: a bus failure or CRC mismatch is returned as is and no partial reading is ever
    /// produced.
    pub fn read(&mut self) -> Result<Reading> {
        self.bus.write_command(
            self.address,
            CMD_MEASURE_HIGH_REP,
            &[CMD_MEASURE_HIGH_REP_ARG],
        )?;
        self.delay.delay_ms(MEASUREMENT_DURATION_MS);

        let data = self.bus.read_block(self.address, READ_REGISTER, FRAME_LEN)?;
        let frame = RawFrame::try_from(data.as_slice())?;
        debug!("sht3x {:#04x} raw frame {:02x?}", self.address, frame.0);

        frame.to_reading()
    }
}
