use anyhow::{Context, Result};
use siradio_core::encoder::encode_punch;
use siradio_core::PunchRecord;
use std::fs;
use tracing::info;

/// Build a station capture from a JSON array of punch records
pub fn execute(input: &str, output: &str) -> Result<()> {
    info!("Encoding punches from {} to {}", input, output);

    // Read input JSON
    let content = fs::read_to_string(input)
        .with_context(|| format!("Failed to read input file: {}", input))?;

    let records: Vec<PunchRecord> =
        serde_json::from_str(&content).with_context(|| "Failed to parse JSON input")?;

    info!("Found {} punches to encode", records.len());

    let mut output_data = Vec::new();
    for (i, record) in records.iter().enumerate() {
        let frame = encode_punch(record)
            .with_context(|| format!("Failed to encode punch {} ({:?})", i, record))?;
        output_data.extend_from_slice(&frame);
    }

    // Write output file
    fs::write(output, &output_data)
        .with_context(|| format!("Failed to write output file: {}", output))?;

    info!(
        "Successfully encoded {} punches ({} bytes total)",
        records.len(),
        output_data.len()
    );

    Ok(())
}
