use crate::{protocol, BusError};
use log::debug;
use rusb::{Device, DeviceHandle, GlobalContext, UsbContext};

/// An opened i2c-tiny-usb adapter, usable as an I2C master through `i2c::BulkTransfer` and
/// therefore as a [`crate::Bus`].
pub struct UsbAdapter<T: UsbContext> {
    device_handle: DeviceHandle<T>,
    supported_flags: (i2c::ReadFlags, i2c::WriteFlags),
}

/// Lists attached USB devices that identify as i2c-tiny-usb adapters.
pub fn devices() -> Result<Vec<Device<GlobalContext>>, BusError> {
    let mut found = Vec::new();
    for device in rusb::devices()?.iter() {
        let descriptor = device.device_descriptor()?;
        let id = (descriptor.vendor_id(), descriptor.product_id());
        if protocol::KNOWN_VENDOR_PRODUCT_IDS.contains(&id) {
            debug!(
                "found adapter {:04x}:{:04x} on bus {} address {}",
                id.0,
                id.1,
                device.bus_number(),
                device.address()
            );
            found.push(device);
        }
    }
    Ok(found)
}

impl<T: UsbContext> UsbAdapter<T> {
    pub fn open(device: &Device<T>) -> Result<Self, BusError> {
        let device_handle = device.open()?;
        device_handle.claim_interface(0)?;
        let supported_flags = protocol::probe(&device_handle)?;
        Ok(Self {
            device_handle,
            supported_flags,
        })
    }
}

impl UsbAdapter<GlobalContext> {
    /// Opens the only attached adapter. Fails if there are none or more than one.
    pub fn open_single_device() -> Result<Self, BusError> {
        let devs = devices()?;
        match devs.as_slice() {
            [] => Err(rusb::Error::NoDevice.into()),
            [device] => UsbAdapter::open(device),
            _ => Err(rusb::Error::Other.into()),
        }
    }
}

impl<T: UsbContext> i2c::Master for UsbAdapter<T> {
    type Error = BusError;
}

impl<T: UsbContext> i2c::BulkTransfer for UsbAdapter<T> {
    fn i2c_transfer_support(&mut self) -> Result<(i2c::ReadFlags, i2c::WriteFlags), BusError> {
        Ok(self.supported_flags)
    }

    fn i2c_transfer(&mut self, messages: &mut [i2c::Message]) -> Result<(), BusError> {
        protocol::transfer(&self.device_handle, messages)
    }
}
