//! Constants for the SportIdent station transmit protocol

/// Start-of-transmission marker opening every frame
pub const START_TX: u8 = 0x02;

/// End-of-transmission marker closing every frame
pub const END_TX: u8 = 0x03;

/// Frame type byte of the extended station protocol
pub const CONTROL_EXTENDED: u8 = 0xD3;

/// Frame type byte of the normal (non-extended) station protocol
pub const CONTROL_NORMAL: u8 = 0x53;

/// Seconds added to the raw time when the half-day flag is set
pub const HALF_DAY_SECONDS: u32 = 12 * 3600;

/// Weight of the series byte in a short-form card number
pub const SERIES_MULTIPLIER: u32 = 100_000;

/// Lowest series value selecting the short card encoding
pub const MIN_SHORT_SERIES: u8 = 1;

/// Highest series value selecting the short card encoding
pub const MAX_SHORT_SERIES: u8 = 4;

/// Default serial line speed of a station
pub const DEFAULT_BAUD_RATE: u32 = 38_400;

// Extended frame field offsets, relative to the start marker.
//
// 02 D3 LEN CN1 CN0 SI3 SI2 SI1 SI0 TD TH TL ... 03

/// Offset of the frame type byte
pub const TYPE_OFFSET: usize = 1;

/// Offset of the payload length byte
pub const LEN_OFFSET: usize = 2;

/// Offset of the high byte of the control (station) number
pub const CONTROL_HI_OFFSET: usize = 3;

/// Offset of the low byte of the control (station) number
pub const CONTROL_LO_OFFSET: usize = 4;

/// Offset of the most significant card byte
pub const CARD_B3_OFFSET: usize = 5;

/// Offset of the card series byte (also the third card byte in long form)
pub const SERIES_OFFSET: usize = 6;

/// Offset of the high byte of the short card number
pub const CARD_HI_OFFSET: usize = 7;

/// Offset of the low byte of the short card number
pub const CARD_LO_OFFSET: usize = 8;

/// Offset of the flag byte carrying the half-day bit
pub const FLAGS_OFFSET: usize = 9;

/// Offset of the high byte of the time-of-day field
pub const TIME_HI_OFFSET: usize = 10;

/// Offset of the low byte of the time-of-day field
pub const TIME_LO_OFFSET: usize = 11;

/// Half-day bit inside the flag byte
pub const HALF_DAY_FLAG: u8 = 0x01;

/// Bytes needed from the start marker to read every extended field
pub const EXTENDED_FRAME_LEN: usize = TIME_LO_OFFSET + 1;

/// Length byte written by the encoder (field bytes between LEN and the end marker)
pub const EXTENDED_LEN_BYTE: u8 = (EXTENDED_FRAME_LEN - CONTROL_HI_OFFSET) as u8;
