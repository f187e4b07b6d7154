//! Serial transport and the reader worker
//!
//! The port handle has a single owner: it is moved into the
//! [`SerialTransport`], which is moved into the worker thread, and closed
//! when the read loop ends.

use crate::constants::DEFAULT_BAUD_RATE;
use crate::error::FrameError;
use crate::scanner::ScanStats;
use crate::sink::PunchSink;
use crate::stream::PunchStream;
use serialport::{DataBits, FlowControl, Parity, SerialPort, StopBits};
use std::io::{self, ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;

#[cfg(feature = "logging")]
use tracing::{debug, info, warn};

/// Default size of a single read from the port
pub const DEFAULT_READ_BUFFER: usize = 4096;

/// How long a read waits for data before the stop flag is checked again
pub const DEFAULT_READ_TIMEOUT: Duration = Duration::from_millis(200);

/// Line settings for a station port
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SerialSettings {
    /// Line speed in baud
    pub baud_rate: u32,

    /// Size of a single read
    pub read_buffer: usize,

    /// Read timeout on the port
    pub read_timeout: Duration,
}

impl SerialSettings {
    /// Build settings from a configured baud rate, falling back to 38400
    /// when the value is not positive
    pub fn from_configured(baud_rate: i64) -> Self {
        Self {
            baud_rate: normalized_baud_rate(baud_rate),
            ..Default::default()
        }
    }
}

impl Default for SerialSettings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE,
            read_buffer: DEFAULT_READ_BUFFER,
            read_timeout: DEFAULT_READ_TIMEOUT,
        }
    }
}

/// Configured baud rate, or the default when it is zero, negative or too large
pub fn normalized_baud_rate(configured: i64) -> u32 {
    if configured <= 0 {
        return DEFAULT_BAUD_RATE;
    }
    u32::try_from(configured).unwrap_or(DEFAULT_BAUD_RATE)
}

/// Why the read loop stopped
#[derive(Debug)]
pub enum TransportEnd {
    /// The port reported end of stream
    Closed,
    /// Stop was requested through the stop handle
    Stopped,
    /// A read failed
    Failed(io::Error),
}

/// Owned serial port feeding raw chunks to a data sink
pub struct SerialTransport<R> {
    port: R,
    settings: SerialSettings,
    stop: Arc<AtomicBool>,
}

impl SerialTransport<Box<dyn SerialPort>> {
    /// Open a station port at the configured speed, 8 data bits, one stop
    /// bit, no parity and no flow control
    pub fn open(path: &str, settings: SerialSettings) -> Result<Self, FrameError> {
        let port = serialport::new(path, settings.baud_rate)
            .data_bits(DataBits::Eight)
            .stop_bits(StopBits::One)
            .parity(Parity::None)
            .flow_control(FlowControl::None)
            .timeout(settings.read_timeout)
            .open()?;

        #[cfg(feature = "logging")]
        info!(baud = settings.baud_rate, "Opened station port {}", path);

        Ok(Self::new(port, settings))
    }
}

impl<R: Read> SerialTransport<R> {
    /// Wrap an already opened port
    pub fn new(port: R, settings: SerialSettings) -> Self {
        Self {
            port,
            settings,
            stop: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Settings in effect
    pub fn settings(&self) -> &SerialSettings {
        &self.settings
    }

    /// Handle that ends the read loop before its next read
    pub fn stop_handle(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.stop)
    }

    /// Run the read loop until the port closes, fails or is stopped
    ///
    /// Every non-empty read is passed to `on_data` in order. `on_terminate`
    /// is called exactly once when the loop ends; the port is dropped
    /// right after.
    pub fn run<D, T>(mut self, mut on_data: D, on_terminate: T)
    where
        D: FnMut(&[u8]),
        T: FnOnce(TransportEnd),
    {
        let mut buf = vec![0u8; self.settings.read_buffer.max(1)];

        let end = loop {
            if self.stop.load(Ordering::Acquire) {
                break TransportEnd::Stopped;
            }

            match self.port.read(&mut buf) {
                Ok(0) => break TransportEnd::Closed,
                Ok(n) => on_data(&buf[..n]),
                Err(e)
                    if matches!(
                        e.kind(),
                        ErrorKind::Interrupted | ErrorKind::WouldBlock | ErrorKind::TimedOut
                    ) =>
                {
                    continue
                }
                Err(e) => break TransportEnd::Failed(e),
            }
        };

        #[cfg(feature = "logging")]
        debug!("Runner stopped: {:?}", end);

        on_terminate(end);
    }
}

/// Summary returned by the worker thread
#[derive(Debug)]
pub struct WorkerReport<S> {
    /// Cumulative scan statistics
    pub stats: ScanStats,

    /// Why the read loop ended
    pub end: TransportEnd,

    /// The sink, handed back to the caller
    pub sink: S,
}

/// Run the read loop on a background thread, feeding each chunk
/// synchronously through `stream` into `sink`
pub fn spawn_worker<R, S>(
    transport: SerialTransport<R>,
    mut stream: PunchStream,
    mut sink: S,
) -> io::Result<JoinHandle<WorkerReport<S>>>
where
    R: Read + Send + 'static,
    S: PunchSink + Send + 'static,
{
    thread::Builder::new()
        .name("siradio-reader".into())
        .spawn(move || {
            let mut end = None;
            transport.run(
                |chunk| {
                    stream.feed_into(chunk, &mut sink);
                },
                |reason| end = Some(reason),
            );

            let end = end.unwrap_or(TransportEnd::Closed);
            if let TransportEnd::Failed(_e) = &end {
                #[cfg(feature = "logging")]
                warn!("Station port failed: {}", _e);
            }

            WorkerReport {
                stats: stream.stats().clone(),
                end,
                sink,
            }
        })
}
