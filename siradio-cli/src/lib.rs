//! Library entry for siradio-cli used by integration tests and embedding.

pub mod commands;
pub mod config;
pub mod dispatch;

// Re-export commands for convenience
pub use commands::*;

pub use config::{Overrides, Settings};
pub use dispatch::{format_message, MessageDispatcher};
