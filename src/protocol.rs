use i2c::{Message, ReadFlags, WriteFlags};
use log::{debug, trace};
use std::time::Duration;

use crate::{BusError, Connection};

/// USB vendor/product ID pairs used by i2c-tiny-usb compatible adapters.
pub const KNOWN_VENDOR_PRODUCT_IDS: [(u16, u16); 2] = [
    (0x0403, 0xc631), // FTDI
    (0x1c40, 0x0534), // EZPrototypes
];

#[allow(dead_code)]
mod cmd {
    pub const ECHO: u8 = 0;
    pub const GET_FUNC: u8 = 1;
    pub const SET_DELAY: u8 = 2;
    pub const GET_STATUS: u8 = 3;
    pub const I2C_IO: u8 = 4;

    // OR'd with I2C_IO on the first and last message of a transfer
    pub const BEGIN: u8 = 1;
    pub const END: u8 = 2;
}

#[allow(dead_code)]
mod status {
    pub const IDLE: u8 = 0;
    pub const ADDRESS_ACK: u8 = 1;
    pub const ADDRESS_NAK: u8 = 2;
}

mod func {
    pub const I2C: u32 = 0x0000_0001;
    pub const PROTOCOL_MANGLING: u32 = 0x0000_0004;
}

/// Per-message flags passed in wValue, same values as the Linux `I2C_M_*` constants.
mod msg {
    pub const RD: u16 = 0x0001;
    pub const NOSTART: u16 = 0x4000;
    pub const REV_DIR_ADDR: u16 = 0x2000;
    pub const IGNORE_NAK: u16 = 0x1000;
    pub const NO_RD_ACK: u16 = 0x0800;
}

pub const TIMEOUT: Duration = Duration::from_secs(1);

const ECHO_PATTERNS: [u16; 8] = [0, 0xaaaa, 0x5555, 0xffff, 0x55aa, 0xaa55, 0x0f0f, 0xf0f0];

fn request_type_in() -> u8 {
    use rusb::constants::*;
    LIBUSB_REQUEST_TYPE_VENDOR | LIBUSB_RECIPIENT_INTERFACE | LIBUSB_ENDPOINT_IN
}

fn request_type_out() -> u8 {
    use rusb::constants::*;
    LIBUSB_REQUEST_TYPE_VENDOR | LIBUSB_RECIPIENT_INTERFACE | LIBUSB_ENDPOINT_OUT
}

fn read_flag_bits(flags: ReadFlags) -> u16 {
    let mut bits = msg::RD;
    if flags.contains(ReadFlags::NACK) {
        bits |= msg::NO_RD_ACK;
    }
    if flags.contains(ReadFlags::REVERSE_RW) {
        bits |= msg::REV_DIR_ADDR;
    }
    if flags.contains(ReadFlags::NO_START) {
        bits |= msg::NOSTART;
    }
    bits
}

fn write_flag_bits(flags: WriteFlags) -> u16 {
    let mut bits = 0;
    if flags.contains(WriteFlags::IGNORE_NACK) {
        bits |= msg::IGNORE_NAK;
    }
    if flags.contains(WriteFlags::REVERSE_RW) {
        bits |= msg::REV_DIR_ADDR;
    }
    if flags.contains(WriteFlags::NO_START) {
        bits |= msg::NOSTART;
    }
    bits
}

fn control_in(
    dev: &impl Connection,
    request: u8,
    value: u16,
    index: u16,
    data: &mut [u8],
) -> Result<(), BusError> {
    let n = dev.read_control(request_type_in(), request, value, index, data, TIMEOUT)?;
    if n != data.len() {
        return Err(BusError::ShortTransfer {
            expected: data.len(),
            actual: n,
        });
    }
    Ok(())
}

fn control_out(
    dev: &impl Connection,
    request: u8,
    value: u16,
    index: u16,
    data: &[u8],
) -> Result<(), BusError> {
    let n = dev.write_control(request_type_out(), request, value, index, data, TIMEOUT)?;
    if n != data.len() {
        return Err(BusError::ShortTransfer {
            expected: data.len(),
            actual: n,
        });
    }
    Ok(())
}

fn status(dev: &impl Connection) -> Result<u8, BusError> {
    let mut buf = [0u8; 1];
    control_in(dev, cmd::GET_STATUS, msg::RD, 0, &mut buf)?;
    Ok(buf[0])
}

/// Runs `messages` as one combined I2C transaction: START before the first message, repeated
/// START between messages and STOP after the last one.
pub(crate) fn transfer(dev: &impl Connection, messages: &mut [Message]) -> Result<(), BusError> {
    let count = messages.len();
    for (i, message) in messages.iter_mut().enumerate() {
        let mut request = cmd::I2C_IO;
        if i == 0 {
            request |= cmd::BEGIN;
        }
        if i + 1 == count {
            request |= cmd::END;
        }

        let result = match message {
            Message::Read {
                address,
                data,
                flags,
            } => {
                trace!("i2c read {:#04x}: {} bytes", address, data.len());
                control_in(dev, request, read_flag_bits(*flags), *address, data)
            }
            Message::Write {
                address,
                data,
                flags,
            } => {
                trace!("i2c write {:#04x}: {:02x?}", address, data);
                control_out(dev, request, write_flag_bits(*flags), *address, data)
            }
        };

        // A missing ACK usually makes the control transfer fail as well, so the adapter status is
        // what tells the two cases apart.
        if status(dev)? == status::ADDRESS_NAK {
            return Err(BusError::Nack);
        }
        result?;
    }

    Ok(())
}

/// Checks that the device speaks i2c-tiny-usb and supports plain I2C transfers. Returns the read
/// and write flags it can honor.
pub(crate) fn probe(dev: &impl Connection) -> Result<(ReadFlags, WriteFlags), BusError> {
    let mut buf = [0u8; 4];
    control_in(dev, cmd::GET_FUNC, msg::RD, 0, &mut buf)?;
    let functionality = u32::from_le_bytes(buf);
    debug!("adapter functionality: {:#010x}", functionality);
    if functionality & func::I2C == 0 {
        return Err(rusb::Error::NotSupported.into());
    }

    let supported = if functionality & func::PROTOCOL_MANGLING != 0 {
        (
            ReadFlags::NACK | ReadFlags::REVERSE_RW | ReadFlags::NO_START,
            WriteFlags::IGNORE_NACK | WriteFlags::REVERSE_RW | WriteFlags::NO_START,
        )
    } else {
        Default::default()
    };

    // ECHO carries its argument in wValue, so it can't go through the flag-based helpers
    for pattern in ECHO_PATTERNS {
        let mut echo = [0u8; 2];
        let n = dev.read_control(request_type_in(), cmd::ECHO, pattern, 0, &mut echo, TIMEOUT)?;
        if n != echo.len() || u16::from_le_bytes(echo) != pattern {
            debug!("echo mismatch for {:#06x}", pattern);
            return Err(rusb::Error::Other.into());
        }
    }

    Ok(supported)
}
