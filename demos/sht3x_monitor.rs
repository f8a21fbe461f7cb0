//! Polls an SHT3x sensor forever and prints every reading, followed by its telemetry payload as
//! a line of JSON. Optional arguments are the polling interval in seconds (default 60) and the
//! sensor address (default 0x45).
//!
//! ```
//! $ RUST_LOG=info cargo run --example sht3x-monitor 10 0x44
//! Temperature in Celsius is 22.14 C
//! Relative Humidity is 42.30 %
//! {"ts":1760878800123,"temperature":22.14,"humidity":42.3}
//! ```
//!
//! A failed reading is logged and the cycle skipped; the next attempt happens after the usual
//! interval.

use log::{error, info};
use sht3x_tiny_usb::telemetry::{JsonLines, Sample, Sink};
use sht3x_tiny_usb::{Sht3x, StdDelay, UsbAdapter, DEFAULT_ADDRESS};
use std::thread::sleep;
use std::time::Duration;

type Result<T> = std::result::Result<T, Box<dyn std::error::Error>>;

const DEFAULT_INTERVAL_SECS: u64 = 60;

fn parse_address(arg: &str) -> Result<u16> {
    let address = match arg.strip_prefix("0x") {
        Some(hex) => u16::from_str_radix(hex, 16)?,
        None => arg.parse()?,
    };
    Ok(address)
}

pub fn main() -> Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let interval = match args.next() {
        Some(val) => Duration::from_secs(val.parse()?),
        None => Duration::from_secs(DEFAULT_INTERVAL_SECS),
    };
    let address = match args.next() {
        Some(val) => parse_address(&val)?,
        None => DEFAULT_ADDRESS,
    };

    let adapter = UsbAdapter::open_single_device()?;
    let mut sensor = Sht3x::with_address(adapter, StdDelay, address);
    let mut sink = JsonLines::new(std::io::stdout());
    info!(
        "polling sensor at {:#04x} every {}s",
        address,
        interval.as_secs()
    );

    loop {
        match sensor.read() {
            Ok(reading) => {
                println!("Temperature in Celsius is {:.2} C", reading.temperature);
                println!("Relative Humidity is {:.2} %", reading.relative_humidity);
                sink.publish(&Sample::now(reading))?;
            }
            Err(e) => error!("reading failed: {}", e),
        }
        sleep(interval);
    }
}
