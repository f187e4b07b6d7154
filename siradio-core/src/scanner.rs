//! Stream scanner locating station frames in arbitrary byte chunks

use crate::constants::{END_TX, EXTENDED_FRAME_LEN, START_TX, TYPE_OFFSET};
use crate::decoder::decode_frame;
use crate::error::FrameError;
use crate::types::PunchRecord;
use alloc::vec::Vec;

#[cfg(feature = "logging")]
use tracing::{debug, warn};

/// A punch decoded at a specific offset in the buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocatedPunch {
    /// Byte offset of the frame's start marker
    pub offset: usize,

    /// The decoded punch
    pub record: PunchRecord,
}

/// Scan statistics
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanStats {
    /// Total bytes scanned
    pub bytes_scanned: usize,

    /// Number of start markers found
    pub markers_found: usize,

    /// Number of extended frames decoded into punches
    pub punches_decoded: usize,

    /// Number of normal-protocol frames skipped
    pub unsupported_frames: usize,

    /// Number of frames with an unknown type byte
    pub unknown_frames: usize,

    /// Number of frames running past the end of the buffer
    pub truncated_frames: usize,

    /// Number of passes that ended without finding an end marker
    pub end_markers_missing: usize,
}

impl ScanStats {
    /// Percentage of start markers that produced a punch
    pub fn decode_rate(&self) -> f64 {
        if self.markers_found == 0 {
            0.0
        } else {
            (self.punches_decoded as f64 / self.markers_found as f64) * 100.0
        }
    }

    /// Accumulate another pass into these totals
    pub fn merge(&mut self, other: &ScanStats) {
        self.bytes_scanned += other.bytes_scanned;
        self.markers_found += other.markers_found;
        self.punches_decoded += other.punches_decoded;
        self.unsupported_frames += other.unsupported_frames;
        self.unknown_frames += other.unknown_frames;
        self.truncated_frames += other.truncated_frames;
        self.end_markers_missing += other.end_markers_missing;
    }
}

/// Result of one scan pass over a buffer
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanOutcome {
    /// Punches in stream order
    pub punches: Vec<LocatedPunch>,

    /// Pass statistics
    pub stats: ScanStats,

    /// Start marker of the first frame cut off by the end of the buffer
    pub partial: Option<usize>,

    /// The buffer ended after a complete frame but before its end marker
    pub awaiting_end: bool,
}

/// Scan `data` from `start` for frames and decode every extended punch
///
/// This function:
/// 1. Searches forward for the next start marker
/// 2. Hands the marker position to the decoder
/// 3. Searches for the next end marker, past the decoded payload when
///    there was one, right after the type byte for skipped frame types,
///    or right after the start marker for truncated frames
/// 4. Resumes after that end marker until the buffer is exhausted
///
/// Malformed content never stops the pass; it is counted and logged.
pub fn scan(data: &[u8], start: usize) -> ScanOutcome {
    let mut outcome = ScanOutcome {
        stats: ScanStats {
            bytes_scanned: data.len().saturating_sub(start),
            ..Default::default()
        },
        ..Default::default()
    };
    let mut pos = start;

    #[cfg(feature = "logging")]
    debug!("Starting scan of {} bytes at offset {}", data.len(), start);

    while pos < data.len() {
        let Some(rel) = find_marker(&data[pos..], START_TX) else {
            // No frame yet
            break;
        };
        let at = pos + rel;
        outcome.stats.markers_found += 1;

        let mut truncated = false;
        let resume_from = match decode_frame(data, at) {
            Ok(record) => {
                #[cfg(feature = "logging")]
                debug!(
                    control = record.control_number,
                    card = record.card_number,
                    time = record.time_of_day_seconds,
                    "Decoded punch at offset {}",
                    at
                );

                outcome.stats.punches_decoded += 1;
                outcome.punches.push(LocatedPunch { offset: at, record });
                at + EXTENDED_FRAME_LEN
            }
            Err(FrameError::UnsupportedProtocol(_byte)) => {
                #[cfg(feature = "logging")]
                warn!(type_byte = _byte, "Non-extended protocol isn't supported");

                outcome.stats.unsupported_frames += 1;
                at + TYPE_OFFSET + 1
            }
            Err(FrameError::UnknownFrameType(_byte)) => {
                #[cfg(feature = "logging")]
                warn!(type_byte = _byte, "Read unknown frame type byte {}", _byte);

                outcome.stats.unknown_frames += 1;
                at + TYPE_OFFSET + 1
            }
            Err(_e) => {
                #[cfg(feature = "logging")]
                debug!("Skipping frame at offset {}: {}", at, _e);

                outcome.stats.truncated_frames += 1;
                outcome.partial.get_or_insert(at);
                truncated = true;
                at + 1
            }
        };

        match data
            .get(resume_from..)
            .and_then(|rest| find_marker(rest, END_TX))
        {
            Some(rel) => pos = resume_from + rel + 1,
            None => {
                outcome.stats.end_markers_missing += 1;
                outcome.awaiting_end = !truncated;
                break;
            }
        }
    }

    #[cfg(feature = "logging")]
    debug!(
        "Scan complete: {} punches from {} markers",
        outcome.stats.punches_decoded, outcome.stats.markers_found
    );

    outcome
}

/// Scan a whole buffer and return only the punches
pub fn scan_punches(data: &[u8]) -> Vec<PunchRecord> {
    scan(data, 0)
        .punches
        .into_iter()
        .map(|located| located.record)
        .collect()
}

/// Find the next occurrence of a single-byte marker
fn find_marker(data: &[u8], marker: u8) -> Option<usize> {
    memchr::memchr(marker, data)
}
