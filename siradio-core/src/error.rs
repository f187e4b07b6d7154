//! Error types for frame decoding and transport

use alloc::string::String;

/// Errors that can occur while decoding, encoding or receiving frames
#[cfg_attr(feature = "std", derive(thiserror::Error))]
#[derive(Debug, Clone, PartialEq)]
pub enum FrameError {
    /// Incomplete frame - not enough data
    #[cfg_attr(feature = "std", error("Incomplete frame: expected {expected} bytes, got {actual}"))]
    IncompleteFrame {
        /// The number of bytes expected from the start marker.
        expected: usize,
        /// The number of bytes actually available.
        actual: usize,
    },

    /// Frame uses the normal (non-extended) station protocol
    #[cfg_attr(feature = "std", error("Non-extended protocol isn't supported (type byte {0:#04x})"))]
    UnsupportedProtocol(u8),

    /// Frame type byte is not a known station protocol
    #[cfg_attr(feature = "std", error("Unknown frame type byte {0}"))]
    UnknownFrameType(u8),

    /// Decoding was requested at a position that is not a start marker
    #[cfg_attr(feature = "std", error("Expected start marker, got {0:#04x}"))]
    MissingStartMarker(u8),

    /// Punch cannot be represented in an extended frame
    #[cfg_attr(feature = "std", error("Cannot encode {field} value {value} in an extended frame"))]
    UnencodablePunch {
        /// Name of the offending field.
        field: &'static str,
        /// The value that does not fit.
        value: u32,
    },

    /// IO error on the serial transport
    #[cfg_attr(feature = "std", error("IO error: {0}"))]
    Io(String),
}

#[cfg(feature = "std")]
impl From<std::io::Error> for FrameError {
    fn from(err: std::io::Error) -> Self {
        FrameError::Io(err.to_string())
    }
}

#[cfg(feature = "std")]
impl From<serialport::Error> for FrameError {
    fn from(err: serialport::Error) -> Self {
        FrameError::Io(err.to_string())
    }
}
