//! Protocol error types.

use thiserror::Error;

/// Errors raised while building or decoding frames.
///
/// Decode-side errors never escape [`crate::FrameParser`]; they are folded
/// into [`crate::ResponseKind::Error`] responses. Encode-side validation
/// errors are returned to the caller that built the request.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FrameError {
    /// Frame data is too short for the variant being decoded.
    #[error("frame too short: expected at least {expected} bytes, got {actual}")]
    FrameTooShort {
        /// Expected minimum length.
        expected: usize,
        /// Actual length received.
        actual: usize,
    },

    /// Stated length exceeds the supported maximum.
    #[error("unsupported frame length {0}")]
    UnsupportedLength(u16),

    /// Checksum verification failed.
    #[error("checksum mismatch: expected 0x{expected:02X}, got 0x{actual:02X}")]
    ChecksumMismatch {
        /// Checksum computed over the received frame data.
        expected: u8,
        /// Checksum byte received on the wire.
        actual: u8,
    },

    /// Request payload exceeds the per-kind maximum.
    #[error("payload too large: maximum {max} bytes, got {actual}")]
    PayloadTooLarge {
        /// Maximum allowed payload.
        max: usize,
        /// Actual payload length.
        actual: usize,
    },

    /// Broadcast destinations can never be acknowledged.
    #[error("broadcast transmit cannot request an acknowledgement")]
    BroadcastWithAck,

    /// AT commands are exactly two printable ASCII characters.
    #[error("invalid AT command name")]
    InvalidAtCommand,

    /// Frame id 0 is the no-response sentinel and cannot be set explicitly.
    #[error("invalid frame id: {0}")]
    InvalidFrameId(u16),

    /// A reserved byte appeared unescaped inside a frame (strict mode only).
    #[error("unescaped reserved byte 0x{0:02X} inside frame")]
    UnescapedReservedByte(u8),

    /// A sample frame carried an unexpected sample count.
    #[error("unsupported sample count {0}")]
    UnsupportedSampleCount(u8),
}
