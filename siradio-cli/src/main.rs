use anyhow::Result;
use clap::{Parser, Subcommand};
use siradio_cli::{commands, Overrides, Settings};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser)]
#[command(name = "siradio")]
#[command(about = "Siradio - SportIdent radio-control punch relay", long_about = None)]
#[command(version)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Relay punches from a station port as SMSRC messages
    Listen {
        /// Station device node (e.g. /dev/ttyUSB0)
        #[arg(short, long)]
        device: String,

        /// JSON settings file
        #[arg(short, long)]
        config: Option<String>,

        /// Line speed; values <= 0 fall back to 38400
        #[arg(long, allow_negative_numbers = true)]
        baud: Option<i64>,

        /// Message destination; without one nothing is relayed
        #[arg(long)]
        destination: Option<String>,

        /// Control number to report instead of the decoded one
        #[arg(long)]
        control: Option<u16>,

        /// Parse every read on its own, dropping frames split across reads
        #[arg(long)]
        independent_chunks: bool,

        /// Write messages to this file instead of stdout
        #[arg(short, long)]
        output: Option<String>,
    },

    /// Decode a captured station byte stream
    Decode {
        /// Capture file, or - for stdin
        #[arg(short, long)]
        input: String,

        /// Output JSON file for decoded punches
        #[arg(short, long)]
        output: Option<String>,

        /// Show statistics only
        #[arg(long)]
        stats_only: bool,

        /// Replay the capture in reads of this many bytes
        #[arg(long)]
        chunk_size: Option<usize>,

        /// With --chunk-size, drop frames split across reads
        #[arg(long)]
        independent_chunks: bool,
    },

    /// Build a station capture from a JSON array of punches
    Encode {
        /// Input JSON file (array of punch records)
        #[arg(short, long)]
        input: String,

        /// Output capture file
        #[arg(short, long)]
        output: String,
    },
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    // Execute command
    match cli.command {
        Commands::Listen {
            device,
            config,
            baud,
            destination,
            control,
            independent_chunks,
            output,
        } => {
            let overrides = Overrides {
                baud_rate: baud,
                destination,
                control_number: control,
                independent_chunks,
            };
            let settings = Settings::load(config.as_deref(), overrides)?;
            commands::listen::execute(&device, &settings, output.as_deref())
        }

        Commands::Decode {
            input,
            output,
            stats_only,
            chunk_size,
            independent_chunks,
        } => {
            let settings = Settings {
                independent_chunks,
                ..Default::default()
            };
            commands::decode::execute(
                &input,
                output.as_deref(),
                stats_only,
                chunk_size,
                settings.chunk_policy(),
            )
        }

        Commands::Encode { input, output } => commands::encode::execute(&input, &output),
    }
}
