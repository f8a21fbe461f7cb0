//! Reads Sensirion SHT3x temperature and humidity sensors through USB-to-I2C adapters that
//! implement the i2c-tiny-usb protocol.
//!
//! ```no_run
//! use sht3x_tiny_usb::{Sht3x, StdDelay, UsbAdapter};
//!
//! let adapter = UsbAdapter::open_single_device()?;
//! let mut sensor = Sht3x::new(adapter, StdDelay);
//! let reading = sensor.read()?;
//! println!("{:.2}°C {:.2}%", reading.temperature, reading.relative_humidity);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! The driver only needs a [`Bus`], which every `i2c::BulkTransfer` with [`BusError`] errors
//! provides, so other transports can be plugged in.

mod adapter;
mod bus;
mod connection;
mod crc;
mod delay;
mod error;
mod protocol;
mod sht3x;
pub mod telemetry;

#[cfg(all(test, feature = "hw-tests"))]
mod hw_tests;

pub(crate) use connection::Connection;

pub use adapter::*;
pub use bus::{Bus, MAX_ADDRESS};
pub use crc::crc8;
pub use delay::StdDelay;
pub use error::*;
pub use protocol::KNOWN_VENDOR_PRODUCT_IDS;
pub use sht3x::*;
pub use rusb;
