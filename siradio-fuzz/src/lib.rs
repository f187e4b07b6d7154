//! Fuzzing harness for siradio-core
//!
//! To use with cargo-fuzz:
//! 1. Install cargo-fuzz: cargo install cargo-fuzz
//! 2. Run fuzzer: cargo fuzz run fuzz_scan

use siradio_core::stream::PunchStream;

pub fn fuzz_decode(data: &[u8]) {
    use siradio_core::decoder::decode_frame;

    // Try to decode at every position - should never panic
    for index in 0..=data.len() {
        let _ = decode_frame(data, index);
    }
}

pub fn fuzz_scan(data: &[u8]) {
    use siradio_core::scanner::scan;

    // Try to scan - should never panic
    let _ = scan(data, 0);
}

/// Feed the input in chunks whose sizes are taken from the first byte
pub fn fuzz_stream(data: &[u8]) {
    let Some((&first, rest)) = data.split_first() else {
        return;
    };
    let chunk_size = (first as usize).max(1);

    let mut stream = PunchStream::new();
    for chunk in rest.chunks(chunk_size) {
        let _ = stream.feed(chunk);
    }
}
