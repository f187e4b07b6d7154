//! Outbound SMSRC message dispatch

use siradio_core::{PunchRecord, PunchSink};
use std::io::Write;
use tracing::{debug, warn};

/// Format a punch as an SMSRC message
pub fn format_message(control_number: u16, card_number: u32, time_of_day_seconds: u32) -> String {
    format!("SMSRC {} {} {}", control_number, card_number, time_of_day_seconds)
}

/// Sink writing one `<destination>\t<message>` line per punch
///
/// Without a destination every punch is dropped. Write failures are
/// counted and logged; they never reach the scanner.
pub struct MessageDispatcher<W> {
    writer: W,
    destination: Option<String>,
    control_override: Option<u16>,
    sent: usize,
    failed: usize,
}

impl<W: Write> MessageDispatcher<W> {
    /// Create a dispatcher
    pub fn new(writer: W, destination: Option<String>, control_override: Option<u16>) -> Self {
        Self {
            writer,
            destination,
            control_override,
            sent: 0,
            failed: 0,
        }
    }

    /// Message for a punch, control override applied
    pub fn message_for(&self, record: &PunchRecord) -> String {
        let control = self.control_override.unwrap_or(record.control_number);
        format_message(control, record.card_number, record.time_of_day_seconds)
    }

    /// Messages written successfully
    pub fn sent(&self) -> usize {
        self.sent
    }

    /// Messages that failed to write
    pub fn failed(&self) -> usize {
        self.failed
    }

    /// Give back the writer
    pub fn into_inner(self) -> W {
        self.writer
    }
}

impl<W: Write> PunchSink for MessageDispatcher<W> {
    fn on_punch(&mut self, record: &PunchRecord) {
        let msg = self.message_for(record);
        let Some(destination) = self.destination.as_deref() else {
            debug!("No destination configured, dropping {}", msg);
            return;
        };

        debug!("Sending msg {}", msg);
        let result = writeln!(self.writer, "{}\t{}", destination, msg).and_then(|_| self.writer.flush());
        match result {
            Ok(()) => self.sent += 1,
            Err(e) => {
                self.failed += 1;
                warn!("Failed to send {}: {}", msg, e);
            }
        }
    }
}
