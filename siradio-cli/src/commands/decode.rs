use anyhow::{Context, Result};
use colored::*;
use serde::{Deserialize, Serialize};
use siradio_core::constants::EXTENDED_FRAME_LEN;
use siradio_core::scanner::{scan, ScanStats};
use siradio_core::stream::{ChunkPolicy, PunchStream};
use siradio_core::PunchRecord;
use std::fs;
use std::io::{self, Read};
use tracing::info;

#[derive(Serialize, Deserialize)]
struct DecodedPunch {
    /// Start marker offset, known when the capture is scanned in one pass
    offset: Option<usize>,
    control_number: u16,
    card_number: u32,
    time_of_day_seconds: u32,
    clock: String,
    /// Hex dump of the frame fields
    raw: Option<String>,
}

impl DecodedPunch {
    fn new(record: &PunchRecord, offset: Option<usize>, raw: Option<String>) -> Self {
        Self {
            offset,
            control_number: record.control_number,
            card_number: record.card_number,
            time_of_day_seconds: record.time_of_day_seconds,
            clock: record.wall_clock(),
            raw,
        }
    }
}

/// Decode a captured station byte stream
///
/// With `chunk_size` the capture is replayed in reads of that size, the way
/// the serial worker sees it; otherwise it is scanned in one pass.
pub fn execute(
    input: &str,
    output: Option<&str>,
    stats_only: bool,
    chunk_size: Option<usize>,
    policy: ChunkPolicy,
) -> Result<()> {
    info!("Decoding capture: {}", input);

    // Read input file or stdin
    let data = if input == "-" {
        let mut buf = Vec::new();
        io::stdin().read_to_end(&mut buf)?;
        buf
    } else {
        fs::read(input).with_context(|| format!("Failed to read input file: {}", input))?
    };

    info!("Capture size: {} bytes", data.len());

    let (punches, stats) = match chunk_size {
        Some(size) => replay(&data, size.max(1), policy),
        None => {
            let outcome = scan(&data, 0);
            let punches = outcome
                .punches
                .iter()
                .map(|p| {
                    let raw = data
                        .get(p.offset..p.offset + EXTENDED_FRAME_LEN)
                        .map(hex::encode);
                    DecodedPunch::new(&p.record, Some(p.offset), raw)
                })
                .collect();
            (punches, outcome.stats)
        }
    };

    print_stats(&stats);

    if stats_only {
        return Ok(());
    }

    if let Some(output_path) = output {
        let json = serde_json::to_string_pretty(&punches)
            .with_context(|| "Failed to serialize decoded punches")?;

        fs::write(output_path, json)
            .with_context(|| format!("Failed to write output file: {}", output_path))?;

        info!("Decoded punches written to: {}", output_path);
    } else {
        println!("=== Punches ===");
        for punch in &punches {
            println!(
                "Control {:>4}  card {:>8}  {} ({} s)",
                punch.control_number, punch.card_number, punch.clock, punch.time_of_day_seconds
            );
        }
    }

    Ok(())
}

fn replay(data: &[u8], chunk_size: usize, policy: ChunkPolicy) -> (Vec<DecodedPunch>, ScanStats) {
    let mut stream = PunchStream::with_policy(policy);
    let mut punches = Vec::new();
    for chunk in data.chunks(chunk_size) {
        for record in stream.feed(chunk) {
            punches.push(DecodedPunch::new(&record, None, None));
        }
    }
    if stream.pending() > 0 {
        info!("{} bytes of an unfinished frame left at end of capture", stream.pending());
    }
    (punches, stream.stats().clone())
}

fn print_stats(stats: &ScanStats) {
    println!("\n=== Decode Results ===");
    println!("Bytes scanned:      {} bytes", stats.bytes_scanned);
    println!("Start markers:      {}", stats.markers_found);
    println!("Punches decoded:    {}", stats.punches_decoded.to_string().green());

    let skipped = [
        ("Normal protocol:    ", stats.unsupported_frames),
        ("Unknown frames:     ", stats.unknown_frames),
        ("Truncated frames:   ", stats.truncated_frames),
    ];
    for (label, count) in skipped {
        if count > 0 {
            println!("{}{}", label, count.to_string().yellow());
        } else {
            println!("{}{}", label, count);
        }
    }
    println!("Decode rate:        {:.2}%", stats.decode_rate());
    println!();
}
