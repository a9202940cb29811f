//! HID transport trait

use crate::{HidCommonResult, HidDeviceInfo};
use std::time::Duration;

/// Feature and interrupt report access to a single opened device.
///
/// All calls are synchronous. Only [`HidTransport::read_report`] may wait, and
/// never for longer than the supplied timeout.
pub trait HidTransport {
    /// Query feature report `report_id`; the returned bytes start with the report id.
    fn get_feature_report(&mut self, report_id: u8) -> HidCommonResult<Vec<u8>>;

    /// Write a feature report; `data[0]` is the report id. Returns the bytes accepted.
    fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize>;

    /// Read one interrupt report. `Ok(None)` means nothing arrived before `timeout`.
    fn read_report(&mut self, timeout: Duration) -> HidCommonResult<Option<Vec<u8>>>;

    fn device_info(&self) -> &HidDeviceInfo;
}

pub mod mock {
    //! Scripted in-memory device.

    use super::*;
    use crate::HidCommonError;
    use std::collections::{HashMap, VecDeque};
    use tracing::trace;

    /// In-memory [`HidTransport`] driven by queued responses.
    ///
    /// Feature queries are answered from a one-shot queue first (where `None`
    /// scripts a failure), then from the persistent per-id response. With write
    /// echo enabled, every sent feature report becomes the persistent response
    /// for its id, which models a device that accepts every configuration.
    #[derive(Debug, Default)]
    pub struct MockTransport {
        info: HidDeviceInfo,
        feature_reports: HashMap<u8, Vec<u8>>,
        feature_queue: HashMap<u8, VecDeque<Option<Vec<u8>>>>,
        interrupt_queue: VecDeque<Vec<u8>>,
        sent_reports: Vec<Vec<u8>>,
        feature_queries: Vec<u8>,
        echo_writes: bool,
        fail_writes: bool,
        disconnected: bool,
    }

    impl MockTransport {
        pub fn new(vendor_id: u16, product_id: u16) -> Self {
            Self {
                info: HidDeviceInfo::new(vendor_id, product_id),
                echo_writes: true,
                ..Default::default()
            }
        }

        pub fn with_write_echo(mut self, echo: bool) -> Self {
            self.echo_writes = echo;
            self
        }

        /// Persistent answer for queries of `data[0]`.
        pub fn set_feature_report(&mut self, data: Vec<u8>) {
            if let Some(&id) = data.first() {
                self.feature_reports.insert(id, data);
            }
        }

        /// One-shot answer, consumed before the persistent one.
        pub fn queue_feature_report(&mut self, data: Vec<u8>) {
            if let Some(&id) = data.first() {
                self.feature_queue.entry(id).or_default().push_back(Some(data));
            }
        }

        /// Make the next query of `report_id` fail.
        pub fn fail_next_feature_query(&mut self, report_id: u8) {
            self.feature_queue
                .entry(report_id)
                .or_default()
                .push_back(None);
        }

        pub fn set_write_failure(&mut self, fail: bool) {
            self.fail_writes = fail;
        }

        pub fn queue_interrupt_report(&mut self, data: Vec<u8>) {
            self.interrupt_queue.push_back(data);
        }

        pub fn disconnect(&mut self) {
            self.disconnected = true;
        }

        pub fn reconnect(&mut self) {
            self.disconnected = false;
        }

        /// Every feature report written, in order.
        pub fn sent_reports(&self) -> &[Vec<u8>] {
            &self.sent_reports
        }

        /// Written feature reports whose id is `report_id`.
        pub fn sent_reports_with_id(&self, report_id: u8) -> Vec<&[u8]> {
            self.sent_reports
                .iter()
                .filter(|r| r.first() == Some(&report_id))
                .map(Vec::as_slice)
                .collect()
        }

        /// Report ids of every feature query, in order.
        pub fn feature_queries(&self) -> &[u8] {
            &self.feature_queries
        }

        pub fn pending_interrupt_reports(&self) -> usize {
            self.interrupt_queue.len()
        }
    }

    impl HidTransport for MockTransport {
        fn get_feature_report(&mut self, report_id: u8) -> HidCommonResult<Vec<u8>> {
            if self.disconnected {
                return Err(HidCommonError::Disconnected);
            }
            self.feature_queries.push(report_id);

            let queued = self
                .feature_queue
                .get_mut(&report_id)
                .and_then(VecDeque::pop_front);
            let response = match queued {
                Some(scripted) => scripted,
                None => self.feature_reports.get(&report_id).cloned(),
            };
            trace!(report_id, found = response.is_some(), "mock feature query");

            response.ok_or_else(|| {
                HidCommonError::ReadError(format!("no feature report 0x{report_id:02X}"))
            })
        }

        fn send_feature_report(&mut self, data: &[u8]) -> HidCommonResult<usize> {
            if self.disconnected {
                return Err(HidCommonError::Disconnected);
            }
            if self.fail_writes {
                return Err(HidCommonError::WriteError("scripted write failure".into()));
            }
            trace!(len = data.len(), "mock feature write");

            self.sent_reports.push(data.to_vec());
            if self.echo_writes {
                self.set_feature_report(data.to_vec());
            }
            Ok(data.len())
        }

        fn read_report(&mut self, _timeout: Duration) -> HidCommonResult<Option<Vec<u8>>> {
            if self.disconnected {
                return Err(HidCommonError::Disconnected);
            }
            Ok(self.interrupt_queue.pop_front())
        }

        fn device_info(&self) -> &HidDeviceInfo {
            &self.info
        }
    }
}
