//! Raw write and read transactions addressed to a single device, on top of any
//! `i2c::BulkTransfer` implementation.

use i2c::{BulkTransfer, Master, Message};
use log::trace;

use crate::BusError;

/// Largest valid 7-bit device address.
pub const MAX_ADDRESS: u16 = 0x7f;

/// Byte-level transactions the sensor driver needs from the bus.
///
/// Each call is one complete I2C transaction and is never retried.
pub trait Bus {
    /// Sends `command` followed by `payload` to the device at `address`.
    fn write_command(&mut self, address: u16, command: u8, payload: &[u8])
        -> Result<(), BusError>;

    /// Selects `register` and reads back exactly `length` bytes in one combined transaction
    /// (repeated START between the two messages).
    fn read_block(&mut self, address: u16, register: u8, length: usize)
        -> Result<Vec<u8>, BusError>;
}

fn check_address(address: u16) -> Result<(), BusError> {
    if address > MAX_ADDRESS {
        return Err(BusError::InvalidAddress(address));
    }
    Ok(())
}

impl<T> Bus for T
where
    T: Master<Error = BusError> + BulkTransfer + ?Sized,
{
    fn write_command(
        &mut self,
        address: u16,
        command: u8,
        payload: &[u8],
    ) -> Result<(), BusError> {
        check_address(address)?;
        let mut data = Vec::with_capacity(payload.len() + 1);
        data.push(command);
        data.extend_from_slice(payload);
        trace!("write_command {:#04x}: {:02x?}", address, data);

        self.i2c_transfer(&mut [Message::Write {
            address,
            data: data.as_slice(),
            flags: Default::default(),
        }])
    }

    fn read_block(
        &mut self,
        address: u16,
        register: u8,
        length: usize,
    ) -> Result<Vec<u8>, BusError> {
        check_address(address)?;
        let mut data = vec![0u8; length];
        self.i2c_transfer(&mut [
            Message::Write {
                address,
                data: &[register],
                flags: Default::default(),
            },
            Message::Read {
                address,
                data: data.as_mut_slice(),
                flags: Default::default(),
            },
        ])?;
        trace!("read_block {:#04x}/{:#04x}: {:02x?}", address, register, data);
        Ok(data)
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::time::Instant;

    /// One message as seen on the wire, with the time the transfer carrying it started.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Recorded {
        Write { address: u16, data: Vec<u8> },
        Read { address: u16, length: usize },
    }

    /// I2C master that logs every message and answers reads from a queue of scheduled
    /// responses. A read with nothing scheduled fails with `Nack`.
    #[derive(Default)]
    pub struct RecordingBus {
        pub messages: Vec<(Instant, Recorded)>,
        pub transfers: usize,
        responses: VecDeque<Result<Vec<u8>, BusError>>,
        write_failures: VecDeque<BusError>,
    }

    impl RecordingBus {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn schedule_read(&mut self, data: &[u8]) {
            self.responses.push_back(Ok(data.into()));
        }

        pub fn schedule_read_error(&mut self, error: BusError) {
            self.responses.push_back(Err(error));
        }

        /// Makes the next transfer containing a write fail.
        pub fn fail_next_write(&mut self, error: BusError) {
            self.write_failures.push_back(error);
        }

        pub fn recorded(&self) -> Vec<Recorded> {
            self.messages.iter().map(|(_, m)| m.clone()).collect()
        }
    }

    impl Master for RecordingBus {
        type Error = BusError;
    }

    impl BulkTransfer for RecordingBus {
        fn i2c_transfer_support(&mut self) -> Result<(i2c::ReadFlags, i2c::WriteFlags), BusError> {
            Ok(Default::default())
        }

        fn i2c_transfer(&mut self, messages: &mut [Message]) -> Result<(), BusError> {
            self.transfers += 1;
            let now = Instant::now();
            for message in messages.iter_mut() {
                match message {
                    Message::Write { address, data, .. } => {
                        self.messages.push((
                            now,
                            Recorded::Write {
                                address: *address,
                                data: data.to_vec(),
                            },
                        ));
                        if let Some(error) = self.write_failures.pop_front() {
                            return Err(error);
                        }
                    }
                    Message::Read { address, data, .. } => {
                        self.messages.push((
                            now,
                            Recorded::Read {
                                address: *address,
                                length: data.len(),
                            },
                        ));
                        let response = self.responses.pop_front().unwrap_or(Err(BusError::Nack))?;
                        if response.len() != data.len() {
                            return Err(BusError::ShortTransfer {
                                expected: data.len(),
                                actual: response.len(),
                            });
                        }
                        data.copy_from_slice(&response);
                    }
                }
            }
            Ok(())
        }
    }
}
