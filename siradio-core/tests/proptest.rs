//! Property-based tests using proptest

use siradio_core::{
    constants::{EXTENDED_FRAME_LEN, SERIES_MULTIPLIER, START_TX},
    decoder::{decode_frame, resolve_card_number, resolve_time_of_day},
    encoder::{encode_punch, encode_punches},
    scanner::{scan, scan_punches},
    stream::PunchStream,
    FrameError, PunchRecord,
};
use proptest::prelude::*;

fn short_card() -> impl Strategy<Value = u32> {
    (1u32..=4, 0u32..=65_535).prop_map(|(series, short)| series * SERIES_MULTIPLIER + short)
}

fn punch() -> impl Strategy<Value = PunchRecord> {
    (any::<u16>(), short_card(), 0u32..86_400)
        .prop_map(|(control, card, time)| PunchRecord::new(control, card, time))
}

proptest! {
    #[test]
    fn prop_no_start_marker_no_frames(
        data in prop::collection::vec(any::<u8>(), 0..4096)
    ) {
        let data: Vec<u8> = data.into_iter().filter(|&b| b != START_TX).collect();
        let outcome = scan(&data, 0);
        prop_assert!(outcome.punches.is_empty());
        prop_assert_eq!(outcome.stats.markers_found, 0);
    }

    #[test]
    fn prop_scan_never_panics(
        data in prop::collection::vec(any::<u8>(), 0..8192),
        start in 0usize..9000
    ) {
        let _ = scan(&data, start);
    }

    #[test]
    fn prop_decode_only_reads_whole_frames(
        mut data in prop::collection::vec(any::<u8>(), 0..64),
        index in 0usize..80,
        plant_header in any::<bool>()
    ) {
        if plant_header && index + 1 < data.len() {
            data[index] = 0x02;
            data[index + 1] = 0xD3;
        }

        match decode_frame(&data, index) {
            Ok(record) => {
                prop_assert!(index + EXTENDED_FRAME_LEN <= data.len());
                prop_assert_eq!(data[index], 0x02);
                prop_assert_eq!(data[index + 1], 0xD3);
                // Nothing past the last field byte matters
                let alone = decode_frame(&data[index..index + EXTENDED_FRAME_LEN], 0);
                prop_assert_eq!(alone, Ok(record));
            }
            Err(FrameError::IncompleteFrame { expected, actual }) => {
                prop_assert_eq!(expected, EXTENDED_FRAME_LEN);
                prop_assert!(actual < EXTENDED_FRAME_LEN);
                prop_assert_eq!(actual, data.len().saturating_sub(index));
            }
            Err(FrameError::MissingStartMarker(byte)) => {
                prop_assert_eq!(data[index], byte);
                prop_assert_ne!(byte, 0x02);
            }
            Err(FrameError::UnsupportedProtocol(byte)) => {
                prop_assert_eq!(byte, 0x53);
            }
            Err(FrameError::UnknownFrameType(byte)) => {
                prop_assert_eq!(data[index + 1], byte);
                prop_assert!(byte != 0xD3 && byte != 0x53);
            }
            Err(other) => prop_assert!(false, "unexpected error: {:?}", other),
        }
    }

    #[test]
    fn prop_decode_is_deterministic(
        payload in prop::collection::vec(any::<u8>(), 10)
    ) {
        let mut frame = vec![0x02, 0xD3];
        frame.extend_from_slice(&payload);
        frame.push(0x03);

        let first = decode_frame(&frame, 0).unwrap();
        let second = decode_frame(&frame.clone(), 0).unwrap();
        prop_assert_eq!(first, second);
    }

    #[test]
    fn prop_card_resolution(series in any::<u8>(), short in any::<u16>(), long in any::<u32>()) {
        let card = resolve_card_number(series, short, long);
        if (1..=4).contains(&series) {
            prop_assert_eq!(card, short as u32 + 100_000 * series as u32);
        } else {
            prop_assert_eq!(card, long);
        }
    }

    #[test]
    fn prop_time_resolution(raw in any::<u16>()) {
        prop_assert_eq!(resolve_time_of_day(false, raw), raw as u32);
        prop_assert_eq!(resolve_time_of_day(true, raw), raw as u32 + 43_200);
    }

    #[test]
    fn prop_stream_order_preserved(records in prop::collection::vec(punch(), 1..50)) {
        let data = encode_punches(&records).unwrap();
        prop_assert_eq!(scan_punches(&data), records);
    }

    #[test]
    fn prop_chunking_does_not_lose_punches(
        records in prop::collection::vec(punch(), 1..20),
        chunk_size in 1usize..40
    ) {
        let data = encode_punches(&records).unwrap();
        let mut stream = PunchStream::new();
        let mut punches = Vec::new();
        for chunk in data.chunks(chunk_size) {
            punches.extend(stream.feed(chunk));
        }
        prop_assert_eq!(punches, records);
    }

    #[test]
    fn prop_truncated_frame_yields_nothing(record in punch(), cut in 1usize..12) {
        let frame = encode_punch(&record).unwrap();
        let outcome = scan(&frame[..cut], 0);
        prop_assert!(outcome.punches.is_empty());
        prop_assert_eq!(outcome.partial, Some(0));
    }
}
