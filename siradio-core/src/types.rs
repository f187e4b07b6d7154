//! Core types for decoded station frames

use crate::constants::{CONTROL_EXTENDED, CONTROL_NORMAL, HALF_DAY_SECONDS};
use alloc::string::String;
use alloc::vec::Vec;
use serde::{Deserialize, Serialize};

/// Station protocol variant announced by the byte after the start marker
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FrameType {
    /// Extended protocol (0xD3), decoded into a punch
    Extended,
    /// Normal protocol (0x53), recognized but not decoded
    Normal,
    /// Any other type byte
    Unknown(u8),
}

impl FrameType {
    /// Classify a raw type byte
    pub const fn from_byte(byte: u8) -> Self {
        match byte {
            CONTROL_EXTENDED => FrameType::Extended,
            CONTROL_NORMAL => FrameType::Normal,
            other => FrameType::Unknown(other),
        }
    }

    /// Raw type byte for this variant
    pub const fn as_byte(&self) -> u8 {
        match self {
            FrameType::Extended => CONTROL_EXTENDED,
            FrameType::Normal => CONTROL_NORMAL,
            FrameType::Unknown(byte) => *byte,
        }
    }
}

/// A single competitor-card-at-control timing event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PunchRecord {
    /// Control (station) number
    pub control_number: u16,

    /// Competitor card number, already resolved from short or long form
    pub card_number: u32,

    /// Time of day in seconds, half-day flag applied
    pub time_of_day_seconds: u32,
}

impl PunchRecord {
    /// Create a new punch record
    pub fn new(control_number: u16, card_number: u32, time_of_day_seconds: u32) -> Self {
        Self {
            control_number,
            card_number,
            time_of_day_seconds,
        }
    }

    /// True when the punch falls in the second 12-hour period of the day
    pub fn half_day(&self) -> bool {
        self.time_of_day_seconds >= HALF_DAY_SECONDS
    }

    /// Render the time of day as `HH:MM:SS`
    pub fn wall_clock(&self) -> String {
        let t = self.time_of_day_seconds;
        alloc::format!("{:02}:{:02}:{:02}", t / 3600, (t / 60) % 60, t % 60)
    }
}

/// Reinterpret signed bytes as unsigned 0-255 values
///
/// Transports that hand out `i8` buffers must go through this before any
/// marker comparison, so 0xD3 never shows up as a negative number.
pub fn unsigned_view(signed: &[i8]) -> Vec<u8> {
    signed.iter().map(|&b| b as u8).collect()
}
