//! # Siradio Core
//!
//! Decoding of punch transmissions from SportIdent control stations.
//!
//! ## Modules
//!
//! - `constants`: Protocol markers, field offsets and defaults
//! - `types`: Core types (PunchRecord, FrameType)
//! - `decoder`: Extended frame decoding
//! - `scanner`: Self-resynchronizing frame scanning
//! - `stream`: Chunked input with partial-frame carry
//! - `sink`: Outbound punch contract
//! - `encoder`: Extended frame encoding for captures and tests
//! - `transport`: Serial read loop and worker (requires `std`)

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod constants;
pub mod decoder;
pub mod encoder;
pub mod error;
pub mod scanner;
pub mod sink;
pub mod stream;
#[cfg(feature = "std")]
pub mod transport;
pub mod types;

// Re-export commonly used types
pub use error::FrameError;
pub use sink::PunchSink;
pub use stream::{ChunkPolicy, PunchStream};
pub use types::{FrameType, PunchRecord};

/// Result type alias for Siradio operations
pub type Result<T> = core::result::Result<T, FrameError>;
