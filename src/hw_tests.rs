//! Testcases that need an i2c-tiny-usb adapter with an SHT3x sensor at the default address
//! attached, so they're not run by default. To include them, run the tests with:
//! `cargo test --features hw-tests`
//!
//! They share one physical bus and are therefore serialized.

use crate::{Error, Sht3x, StdDelay, UsbAdapter};
use serial_test::serial;

#[test]
#[serial]
pub fn test_connect() {
    UsbAdapter::open_single_device().unwrap();
}

#[test]
#[serial]
pub fn test_read_sensor() {
    let adapter = UsbAdapter::open_single_device().unwrap();
    let mut sensor = Sht3x::new(adapter, StdDelay);
    let reading = sensor.read().unwrap();
    assert!((-45.0..=130.0).contains(&reading.temperature));
    assert!((0.0..=100.0).contains(&reading.relative_humidity));
}

#[test]
#[serial]
pub fn test_missing_sensor_is_nack() {
    let adapter = UsbAdapter::open_single_device().unwrap();
    // nothing answers here on the test setup
    let mut sensor = Sht3x::with_address(adapter, StdDelay, 0x08);
    assert!(matches!(sensor.read(), Err(Error::Bus(_))));
}
