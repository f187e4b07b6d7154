//! Relay settings: JSON file first, command-line flags on top

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use siradio_core::constants::DEFAULT_BAUD_RATE;
use siradio_core::stream::ChunkPolicy;
use siradio_core::transport::{normalized_baud_rate, SerialSettings};
use std::fs;
use tracing::debug;

/// Persistent relay settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Station line speed; values <= 0 fall back to 38400
    pub baud_rate: i64,

    /// Where outbound messages go; no destination means nothing is sent
    pub destination: Option<String>,

    /// Control number put in outbound messages instead of the decoded one
    pub control_number: Option<u16>,

    /// Parse every read on its own instead of carrying partial frames
    pub independent_chunks: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            baud_rate: DEFAULT_BAUD_RATE as i64,
            destination: None,
            control_number: None,
            independent_chunks: false,
        }
    }
}

/// Command-line values that take precedence over the settings file
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// `--baud`
    pub baud_rate: Option<i64>,
    /// `--destination`
    pub destination: Option<String>,
    /// `--control`
    pub control_number: Option<u16>,
    /// `--independent-chunks`
    pub independent_chunks: bool,
}

impl Settings {
    /// Load settings from an optional JSON file, then apply overrides
    pub fn load(path: Option<&str>, overrides: Overrides) -> Result<Self> {
        let mut settings = match path {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .with_context(|| format!("Failed to read settings file: {}", path))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse settings file: {}", path))?
            }
            None => Settings::default(),
        };

        if let Some(baud_rate) = overrides.baud_rate {
            settings.baud_rate = baud_rate;
        }
        if overrides.destination.is_some() {
            settings.destination = overrides.destination;
        }
        if overrides.control_number.is_some() {
            settings.control_number = overrides.control_number;
        }
        settings.independent_chunks |= overrides.independent_chunks;

        // Blank destination is the same as none
        if settings
            .destination
            .as_deref()
            .is_some_and(|d| d.trim().is_empty())
        {
            settings.destination = None;
        }

        debug!(?settings, "Loaded settings");
        Ok(settings)
    }

    /// Baud rate to use, default applied
    pub fn effective_baud_rate(&self) -> u32 {
        normalized_baud_rate(self.baud_rate)
    }

    /// Serial settings derived from these settings
    pub fn serial(&self) -> SerialSettings {
        SerialSettings::from_configured(self.baud_rate)
    }

    /// Chunk policy for the punch stream
    pub fn chunk_policy(&self) -> ChunkPolicy {
        if self.independent_chunks {
            ChunkPolicy::Independent
        } else {
            ChunkPolicy::Carry
        }
    }
}
