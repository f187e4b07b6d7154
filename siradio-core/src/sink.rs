//! Outbound contract for decoded punches

use crate::types::PunchRecord;
use alloc::vec::Vec;

/// Receiver of decoded punches, called once per punch in stream order
pub trait PunchSink {
    /// Handle one decoded punch
    fn on_punch(&mut self, record: &PunchRecord);
}

impl PunchSink for Vec<PunchRecord> {
    fn on_punch(&mut self, record: &PunchRecord) {
        self.push(*record);
    }
}

impl<F> PunchSink for F
where
    F: FnMut(&PunchRecord),
{
    fn on_punch(&mut self, record: &PunchRecord) {
        self(record)
    }
}
