//! Extended frame encoding
//!
//! Stations only transmit, so this exists to build captures for replay
//! and tests.

use crate::constants::{
    CONTROL_EXTENDED, END_TX, EXTENDED_FRAME_LEN, EXTENDED_LEN_BYTE, HALF_DAY_FLAG,
    HALF_DAY_SECONDS, MAX_SHORT_SERIES, MIN_SHORT_SERIES, SERIES_MULTIPLIER, START_TX,
};
use crate::error::FrameError;
use crate::types::PunchRecord;
use bytes::{BufMut, Bytes, BytesMut};

/// Encode a punch into an extended frame
///
/// The frame is encoded with the following layout:
/// 1. Start marker (0x02) and type byte (0xD3)
/// 2. Length byte
/// 3. Control number (2 bytes, big-endian)
/// 4. Card (4 bytes): short form `00 SERIES HI LO` when the card number is
///    `series * 100000 + short` with series 1-4, long form otherwise
/// 5. Flags (1 byte, bit 0 = half day)
/// 6. Time of day within the half day (2 bytes, big-endian)
/// 7. End marker (0x03)
pub fn encode_punch(record: &PunchRecord) -> Result<Bytes, FrameError> {
    let card = encode_card(record.card_number)?;
    let (flags, raw_time) = encode_time(record.time_of_day_seconds)?;

    let mut buf = BytesMut::with_capacity(EXTENDED_FRAME_LEN + 1);
    buf.put_u8(START_TX);
    buf.put_u8(CONTROL_EXTENDED);
    buf.put_u8(EXTENDED_LEN_BYTE);
    buf.put_u16(record.control_number);
    buf.put_slice(&card);
    buf.put_u8(flags);
    buf.put_u16(raw_time);
    buf.put_u8(END_TX);

    Ok(buf.freeze())
}

/// Encode a sequence of punches back to back
pub fn encode_punches<'a, I>(records: I) -> Result<Bytes, FrameError>
where
    I: IntoIterator<Item = &'a PunchRecord>,
{
    let mut buf = BytesMut::new();
    for record in records {
        buf.put_slice(&encode_punch(record)?);
    }
    Ok(buf.freeze())
}

fn encode_card(card_number: u32) -> Result<[u8; 4], FrameError> {
    let series = card_number / SERIES_MULTIPLIER;
    let short = card_number % SERIES_MULTIPLIER;
    let short_series = MIN_SHORT_SERIES as u32..=MAX_SHORT_SERIES as u32;

    if short_series.contains(&series) && short <= u16::MAX as u32 {
        let [hi, lo] = (short as u16).to_be_bytes();
        return Ok([0, series as u8, hi, lo]);
    }

    let bytes = card_number.to_be_bytes();
    // Long form would be read back as a short-series card
    if (MIN_SHORT_SERIES..=MAX_SHORT_SERIES).contains(&bytes[1]) {
        return Err(FrameError::UnencodablePunch {
            field: "card_number",
            value: card_number,
        });
    }
    Ok(bytes)
}

fn encode_time(time_of_day_seconds: u32) -> Result<(u8, u16), FrameError> {
    let (flags, raw) = if time_of_day_seconds >= HALF_DAY_SECONDS {
        (HALF_DAY_FLAG, time_of_day_seconds - HALF_DAY_SECONDS)
    } else {
        (0, time_of_day_seconds)
    };

    let raw = u16::try_from(raw).map_err(|_| FrameError::UnencodablePunch {
        field: "time_of_day_seconds",
        value: time_of_day_seconds,
    })?;
    Ok((flags, raw))
}
