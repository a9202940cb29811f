//! [`HidTransport`] backed by the `hidapi` crate.

use crate::{HidCommonError, HidCommonResult, HidDeviceInfo, HidTransport};
use hidapi::{HidApi, HidDevice};
use std::time::Duration;
use tracing::{debug, info};

/// Feature reports on these devices never exceed this size.
pub const FEATURE_BUFFER_SIZE: usize = 256;

pub struct HidApiTransport {
    device: HidDevice,
    info: HidDeviceInfo,
}

impl HidApiTransport {
    /// Open the first device matching `vendor_id:product_id` in non-blocking mode.
    pub fn open(vendor_id: u16, product_id: u16) -> HidCommonResult<Self> {
        let api = HidApi::new().map_err(|e| HidCommonError::OpenError(e.to_string()))?;
        let device = api.open(vendor_id, product_id).map_err(|e| {
            HidCommonError::DeviceNotFound(format!("{vendor_id:04x}:{product_id:04x}: {e}"))
        })?;

        let mut info = HidDeviceInfo::new(vendor_id, product_id);
        if let Ok(Some(manufacturer)) = device.get_manufacturer_string() {
            info = info.with_manufacturer(manufacturer);
        }
        if let Ok(Some(product)) = device.get_product_string() {
            info = info.with_product_name(product);
        }
        if let Ok(Some(serial)) = device.get_serial_number_string() {
            info = info.with_serial(serial);
        }

        device
            .set_blocking_mode(false)
            .map_err(|e| HidCommonError::OpenError(e.to_string()))?;

        info!(
            device = %info.display_name(),
            serial = info.serial_number.as_deref().unwrap_or("-"),
            "opened HID device"
        );
        Ok(Self { device, info })
    }
}

/// Buffer for a feature query; hidapi takes the report id in the first byte.
fn feature_request(report_id: u8) -> [u8; FEATURE_BUFFER_SIZE] {
    let mut buf = [0u8; FEATURE_BUFFER_SIZE];
    if let Some(first) = buf.first_mut() {
        *first = report_id;
    }
    buf
}

impl HidTransport for HidApiTransport {
    fn get_feature_report(&mut self, report_id: u8) -> HidCommonResult<Vec<u8>> {
        let mut buf = feature_request(report_id);
        let size = self
            .device
            .get_feature_report(&mut buf)
            .map_err(|e| HidCommonError::ReadError(e.to_string()))?;
        debug!(report_id, size, "feature report received");
        Ok(buf.get(..size).unwrap_or(&buf).to_vec())
    }

    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
        self.device
            .send_feature_report(data)
            .map_err(|e| HidCommonError::WriteError(e.to_string()))?;
        Ok(data.len())
    }

    fn read_report(&mut self, timeout: Duration) -> HidCommonResult<Option<Vec<u8>>> {
        let mut buf = [0u8; FEATURE_BUFFER_SIZE];
        let timeout_ms = i32::try_from(timeout.as_millis()).unwrap_or(i32::MAX);
        let size = self
            .device
            .read_timeout(&mut buf, timeout_ms)
            .map_err(|e| HidCommonError::ReadError(e.to_string()))?;
        if size == 0 {
            return Ok(None);
        }
        Ok(Some(buf.get(..size).unwrap_or(&buf).to_vec()))
    }

    fn device_info(&self) -> &HidDeviceInfo {
        &self.info
    }
}
