//! Extended-protocol frame decoding

use crate::constants::{
    CARD_B3_OFFSET, CARD_HI_OFFSET, CARD_LO_OFFSET, CONTROL_HI_OFFSET, CONTROL_LO_OFFSET,
    EXTENDED_FRAME_LEN, FLAGS_OFFSET, HALF_DAY_FLAG, HALF_DAY_SECONDS, MAX_SHORT_SERIES,
    MIN_SHORT_SERIES, SERIES_MULTIPLIER, SERIES_OFFSET, START_TX, TIME_HI_OFFSET, TIME_LO_OFFSET,
    TYPE_OFFSET,
};
use crate::error::FrameError;
use crate::types::{FrameType, PunchRecord};

/// Decode the frame whose start marker sits at `index`
///
/// All field offsets are relative to the start marker:
/// 1. Type byte: 0xD3 (extended) is decoded, 0x53 (normal) and anything
///    else are reported as errors without reading further
/// 2. Control number: bytes 3..5, big-endian
/// 3. Card: bytes 5..9, big-endian, byte 6 doubling as the series
/// 4. Flags: byte 9, bit 0 is the half-day flag
/// 5. Time of day: bytes 10..12, big-endian
///
/// Never panics; a frame running past the end of `buf` yields
/// [`FrameError::IncompleteFrame`].
pub fn decode_frame(buf: &[u8], index: usize) -> Result<PunchRecord, FrameError> {
    let available = buf.len().saturating_sub(index);

    match buf.get(index) {
        Some(&START_TX) => {}
        Some(&other) => return Err(FrameError::MissingStartMarker(other)),
        None => {
            return Err(FrameError::IncompleteFrame {
                expected: EXTENDED_FRAME_LEN,
                actual: 0,
            })
        }
    }

    // No room for a type byte
    let Some(&type_byte) = buf.get(index + TYPE_OFFSET) else {
        return Err(FrameError::IncompleteFrame {
            expected: EXTENDED_FRAME_LEN,
            actual: available,
        });
    };

    match FrameType::from_byte(type_byte) {
        FrameType::Extended => {}
        FrameType::Normal => return Err(FrameError::UnsupportedProtocol(type_byte)),
        FrameType::Unknown(byte) => return Err(FrameError::UnknownFrameType(byte)),
    }

    if available < EXTENDED_FRAME_LEN {
        return Err(FrameError::IncompleteFrame {
            expected: EXTENDED_FRAME_LEN,
            actual: available,
        });
    }

    let frame = &buf[index..index + EXTENDED_FRAME_LEN];

    let control_number = u16::from_be_bytes([frame[CONTROL_HI_OFFSET], frame[CONTROL_LO_OFFSET]]);

    let series = frame[SERIES_OFFSET];
    let short_card = u16::from_be_bytes([frame[CARD_HI_OFFSET], frame[CARD_LO_OFFSET]]);
    let long_card = u32::from_be_bytes([
        frame[CARD_B3_OFFSET],
        frame[SERIES_OFFSET],
        frame[CARD_HI_OFFSET],
        frame[CARD_LO_OFFSET],
    ]);

    let raw_time = u16::from_be_bytes([frame[TIME_HI_OFFSET], frame[TIME_LO_OFFSET]]);
    let half_day = frame[FLAGS_OFFSET] & HALF_DAY_FLAG == HALF_DAY_FLAG;

    Ok(PunchRecord {
        control_number,
        card_number: resolve_card_number(series, short_card, long_card),
        time_of_day_seconds: resolve_time_of_day(half_day, raw_time),
    })
}

/// Pick the short or long card encoding based on the series byte
pub fn resolve_card_number(series: u8, short_card: u16, long_card: u32) -> u32 {
    if (MIN_SHORT_SERIES..=MAX_SHORT_SERIES).contains(&series) {
        short_card as u32 + SERIES_MULTIPLIER * series as u32
    } else {
        long_card
    }
}

/// Apply the half-day flag to the raw 16-bit time field
pub fn resolve_time_of_day(half_day: bool, raw_time: u16) -> u32 {
    if half_day {
        raw_time as u32 + HALF_DAY_SECONDS
    } else {
        raw_time as u32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: [u8; 13] = [
        0x02, 0xD3, 0x00, 0x00, 0x05, 0x00, 0x00, 0x00, 0x64, 0x00, 0x01, 0x2C, 0x03,
    ];

    #[test]
    fn test_decode_sample_frame() {
        let record = decode_frame(&SAMPLE, 0).unwrap();
        assert_eq!(record, PunchRecord::new(5, 100, 300));
    }

    #[test]
    fn test_decode_at_offset() {
        let mut buf = vec![0xAA, 0xBB, 0xCC];
        buf.extend_from_slice(&SAMPLE);
        let record = decode_frame(&buf, 3).unwrap();
        assert_eq!(record.control_number, 5);
        assert_eq!(record.card_number, 100);
    }

    #[test]
    fn test_short_series_card() {
        let mut frame = SAMPLE;
        frame[SERIES_OFFSET] = 3;
        frame[CARD_HI_OFFSET] = 0x30;
        frame[CARD_LO_OFFSET] = 0x39;
        // Most significant byte is ignored in short form
        frame[CARD_B3_OFFSET] = 0x7F;

        let record = decode_frame(&frame, 0).unwrap();
        assert_eq!(record.card_number, 312_345);
    }

    #[test]
    fn test_long_card_when_series_out_of_range() {
        let mut frame = SAMPLE;
        frame[CARD_B3_OFFSET] = 0x00;
        frame[SERIES_OFFSET] = 0x1E;
        frame[CARD_HI_OFFSET] = 0x84;
        frame[CARD_LO_OFFSET] = 0x80;

        let record = decode_frame(&frame, 0).unwrap();
        assert_eq!(record.card_number, 0x1E8480);
        assert_eq!(record.card_number, 2_000_000);
    }

    #[test]
    fn test_half_day_flag() {
        let mut frame = SAMPLE;
        frame[FLAGS_OFFSET] = 0x0D;

        let record = decode_frame(&frame, 0).unwrap();
        assert_eq!(record.time_of_day_seconds, 300 + 43_200);
    }

    #[test]
    fn test_high_control_byte() {
        let mut frame = SAMPLE;
        frame[CONTROL_HI_OFFSET] = 0x01;
        frame[CONTROL_LO_OFFSET] = 0xF4;

        assert_eq!(decode_frame(&frame, 0).unwrap().control_number, 500);
    }

    #[test]
    fn test_normal_protocol_is_unsupported() {
        let frame = [0x02, 0x53, 0x00, 0x03];
        assert_eq!(
            decode_frame(&frame, 0),
            Err(FrameError::UnsupportedProtocol(0x53))
        );
    }

    #[test]
    fn test_unknown_type_byte() {
        let frame = [0x02, 0xFF, 0x03];
        assert_eq!(decode_frame(&frame, 0), Err(FrameError::UnknownFrameType(255)));
    }

    #[test]
    fn test_truncated_frame() {
        let result = decode_frame(&SAMPLE[..11], 0);
        assert_eq!(
            result,
            Err(FrameError::IncompleteFrame {
                expected: EXTENDED_FRAME_LEN,
                actual: 11
            })
        );
    }

    #[test]
    fn test_start_marker_in_last_byte() {
        let buf = [0x00, 0x00, 0x02];
        assert!(matches!(
            decode_frame(&buf, 2),
            Err(FrameError::IncompleteFrame { actual: 1, .. })
        ));
    }

    #[test]
    fn test_index_past_end() {
        assert!(matches!(
            decode_frame(&SAMPLE, 40),
            Err(FrameError::IncompleteFrame { actual: 0, .. })
        ));
    }

    #[test]
    fn test_not_a_start_marker() {
        assert_eq!(
            decode_frame(&SAMPLE, 1),
            Err(FrameError::MissingStartMarker(0xD3))
        );
    }

    #[test]
    fn test_resolve_card_number_boundaries() {
        assert_eq!(resolve_card_number(0, 100, 100), 100);
        assert_eq!(resolve_card_number(1, 100, 0x0001_0064), 100_100);
        assert_eq!(resolve_card_number(4, 65_535, 0), 465_535);
        assert_eq!(resolve_card_number(5, 100, 0x0005_0064), 0x0005_0064);
    }

    #[test]
    fn test_resolve_time_of_day() {
        assert_eq!(resolve_time_of_day(false, 300), 300);
        assert_eq!(resolve_time_of_day(true, 300), 43_500);
        assert_eq!(resolve_time_of_day(true, u16::MAX), 65_535 + 43_200);
    }
}
