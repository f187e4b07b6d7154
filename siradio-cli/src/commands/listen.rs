use crate::config::Settings;
use crate::dispatch::MessageDispatcher;
use anyhow::{anyhow, Context, Result};
use colored::*;
use siradio_core::stream::PunchStream;
use siradio_core::transport::{spawn_worker, SerialTransport, TransportEnd};
use std::fs::File;
use std::io::{self, Read, Write};
use tracing::{info, warn};

/// Relay punches from a station port until the port closes or fails
///
/// Messages go to `output` when given, stdout otherwise.
pub fn execute(device: &str, settings: &Settings, output: Option<&str>) -> Result<()> {
    let serial = settings.serial();
    info!(
        baud = serial.baud_rate,
        destination = settings.destination.as_deref().unwrap_or("<none>"),
        "Listening on {}",
        device
    );

    let transport = SerialTransport::open(device, serial)
        .with_context(|| format!("Failed to open station port: {}", device))?;

    relay(transport, settings, output).with_context(|| format!("Read from {} failed", device))
}

/// Run the reader worker over an opened transport and print a session summary
pub fn relay<R>(
    transport: SerialTransport<R>,
    settings: &Settings,
    output: Option<&str>,
) -> Result<()>
where
    R: Read + Send + 'static,
{
    if settings.destination.is_none() {
        warn!("No destination configured, punches will not be relayed");
    }

    let writer: Box<dyn Write + Send> = match output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("Failed to create output file: {}", path))?,
        ),
        None => Box::new(io::stdout()),
    };
    let dispatcher =
        MessageDispatcher::new(writer, settings.destination.clone(), settings.control_number);

    let handle = spawn_worker(
        transport,
        PunchStream::with_policy(settings.chunk_policy()),
        dispatcher,
    )
    .with_context(|| "Failed to start reader thread")?;

    let report = handle
        .join()
        .map_err(|_| anyhow!("Reader thread panicked"))?;

    println!("\n=== Session Summary ===");
    println!("Bytes read:         {} bytes", report.stats.bytes_scanned);
    println!("Punches decoded:    {}", report.stats.punches_decoded);
    println!("Messages sent:      {}", report.sink.sent());
    if report.sink.failed() > 0 {
        println!("Messages failed:    {}", report.sink.failed().to_string().red());
    }

    match report.end {
        TransportEnd::Closed | TransportEnd::Stopped => {
            println!("{} Station port closed", "✓".green());
            Ok(())
        }
        TransportEnd::Failed(e) => {
            println!("{} Station port failed", "✗".red());
            Err(e.into())
        }
    }
}
