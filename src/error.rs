use std::fmt;

/// Failure of a single bus transaction.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum BusError {
    #[error("USB error")]
    Usb(#[from] rusb::Error),

    #[error("no acknowledgement from the i2c device")]
    Nack,

    #[error("short transfer: expected {expected} bytes, got {actual}")]
    ShortTransfer { expected: usize, actual: usize },

    #[error("address {0:#x} is outside the 7-bit range")]
    InvalidAddress(u16),
}

/// Measurement field protected by its own checksum.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Temperature,
    Humidity,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Field::Temperature => f.write_str("temperature"),
            Field::Humidity => f.write_str("humidity"),
        }
    }
}

/// Failure of one sensor acquisition.
#[derive(thiserror::Error, Debug, PartialEq, Eq)]
pub enum Error {
    #[error("bus transaction failed")]
    Bus(#[from] BusError),

    #[error("{field} CRC mismatch: computed {expected:#04x}, received {received:#04x}")]
    Checksum {
        field: Field,
        expected: u8,
        received: u8,
    },
}

pub type Result<T> = std::result::Result<T, Error>;
