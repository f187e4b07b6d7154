//! Chunked punch stream
//!
//! Serial reads hand out chunks of arbitrary size, so a frame can straddle
//! two reads. [`PunchStream`] keeps the cut-off tail of the last frame in a
//! `BytesMut` and prepends it to the next chunk.
//!
//! ```
//! use siradio_core::stream::PunchStream;
//!
//! let mut stream = PunchStream::new();
//! let first = stream.feed(&[0x02, 0xD3, 0x09, 0x00, 0x05]);
//! let second = stream.feed(&[0x00, 0x00, 0x00, 0x64, 0x00, 0x01, 0x2C, 0x03]);
//! assert!(first.is_empty());
//! assert_eq!(second.len(), 1);
//! ```

use crate::constants::END_TX;
use crate::scanner::{scan, ScanOutcome, ScanStats};
use crate::sink::PunchSink;
use crate::types::{unsigned_view, PunchRecord};
use alloc::vec::Vec;
use bytes::BytesMut;

#[cfg(feature = "logging")]
use tracing::trace;

/// What to do with a frame cut off by the end of a chunk
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ChunkPolicy {
    /// Keep the partial frame and complete it with the next chunk
    #[default]
    Carry,
    /// Parse every chunk on its own and drop partial frames
    Independent,
}

/// Stateful scanner fed with consecutive chunks of one byte stream
#[derive(Debug, Default)]
pub struct PunchStream {
    /// Partial frame carried over from the previous chunk
    carry: BytesMut,
    /// Last frame was decoded but its end marker has not arrived
    awaiting_end: bool,
    policy: ChunkPolicy,
    stats: ScanStats,
}

impl PunchStream {
    /// Create a stream that carries partial frames across chunks
    pub fn new() -> Self {
        Self::with_policy(ChunkPolicy::Carry)
    }

    /// Create a stream with an explicit chunk policy
    pub fn with_policy(policy: ChunkPolicy) -> Self {
        Self {
            carry: BytesMut::new(),
            awaiting_end: false,
            policy,
            stats: ScanStats::default(),
        }
    }

    /// Feed a chunk and return the punches it completed
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<PunchRecord> {
        let mut punches = Vec::new();
        self.feed_into(chunk, &mut punches);
        punches
    }

    /// Feed a chunk of signed bytes, as handed out by some serial drivers
    pub fn feed_signed(&mut self, chunk: &[i8]) -> Vec<PunchRecord> {
        self.feed(&unsigned_view(chunk))
    }

    /// Feed a chunk and dispatch every completed punch to `sink`
    ///
    /// Returns the number of punches dispatched.
    pub fn feed_into<S>(&mut self, chunk: &[u8], sink: &mut S) -> usize
    where
        S: PunchSink + ?Sized,
    {
        let mut outcome = if self.carry.is_empty() {
            self.pass(chunk)
        } else {
            let mut buf = core::mem::take(&mut self.carry);
            buf.extend_from_slice(chunk);
            self.pass(&buf)
        };

        // Carried bytes were already counted when they arrived
        outcome.stats.bytes_scanned = chunk.len();
        self.stats.merge(&outcome.stats);

        for located in &outcome.punches {
            sink.on_punch(&located.record);
        }
        outcome.punches.len()
    }

    /// Scan one buffer, finishing the previous frame's trailer first
    fn pass(&mut self, data: &[u8]) -> ScanOutcome {
        let start = if self.awaiting_end {
            match memchr::memchr(END_TX, data) {
                Some(end) => {
                    self.awaiting_end = false;
                    end + 1
                }
                // Still inside the trailer
                None => return ScanOutcome::default(),
            }
        } else {
            0
        };

        let outcome = scan(data, start);
        if self.policy == ChunkPolicy::Carry {
            match outcome.partial {
                Some(partial) => self.keep(&data[partial..]),
                None => self.awaiting_end = outcome.awaiting_end,
            }
        }
        outcome
    }

    fn keep(&mut self, tail: &[u8]) {
        #[cfg(feature = "logging")]
        trace!("Carrying {} bytes of a partial frame", tail.len());

        self.carry.clear();
        self.carry.extend_from_slice(tail);
    }

    /// Number of bytes waiting for the next chunk
    pub fn pending(&self) -> usize {
        self.carry.len()
    }

    /// Drop any carried bytes and forget an unfinished trailer
    pub fn reset(&mut self) {
        self.carry.clear();
        self.awaiting_end = false;
    }

    /// Chunk policy in effect
    pub fn policy(&self) -> ChunkPolicy {
        self.policy
    }

    /// Cumulative statistics over every chunk fed so far
    pub fn stats(&self) -> &ScanStats {
        &self.stats
    }
}
