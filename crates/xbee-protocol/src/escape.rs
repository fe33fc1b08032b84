//! Byte stuffing.
//!
//! Everything after the start delimiter is stuffed so that the reserved
//! bytes (0x7E start, 0x7D escape, 0x11 XON, 0x13 XOFF) never appear as
//! data: each is replaced by `0x7D` followed by the byte XORed with 0x20.
//!
//! Decoding is done incrementally inside the frame parser one byte at a
//! time, so the length and checksum bookkeeping can run over unescaped
//! bytes; [`Unescaper`] holds the one bit of state that needs (whether
//! the previous raw byte was the escape introducer).

use crate::constants::*;

/// True if the byte must be escaped on the wire.
pub fn is_reserved(byte: u8) -> bool {
    matches!(byte, START_BYTE | ESCAPE_BYTE | XON_BYTE | XOFF_BYTE)
}

/// Escape `data` for transmission. Reserved bytes become a two-byte
/// escape sequence, everything else passes through unchanged.
pub fn escape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    for &b in data {
        if is_reserved(b) {
            out.push(ESCAPE_BYTE);
            out.push(b ^ ESCAPE_XOR);
        } else {
            out.push(b);
        }
    }
    out
}

/// Unescape a complete byte run. The streaming parser uses [`Unescaper`]
/// instead; this form exists for tests and offline tooling.
pub fn unescape(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len());
    let mut un = Unescaper::new();
    for &b in data {
        if let Some(logical) = un.push(b).byte() {
            out.push(logical);
        }
    }
    out
}

/// One step of streaming unescape.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Unescaped {
    /// The raw byte completed a logical byte.
    Byte(u8),
    /// The raw byte was the escape introducer; the logical byte follows.
    Pending,
    /// A reserved byte appeared without an escape. The value is still
    /// usable as data (permissive firmware tolerance); callers decide
    /// whether to accept it.
    Unexpected(u8),
}

impl Unescaped {
    /// The logical byte, if this step produced one.
    pub fn byte(self) -> Option<u8> {
        match self {
            Unescaped::Byte(b) | Unescaped::Unexpected(b) => Some(b),
            Unescaped::Pending => None,
        }
    }
}

/// Streaming unescaper: feed raw wire bytes, get logical bytes.
#[derive(Debug, Default)]
pub struct Unescaper {
    esc: bool,
}

impl Unescaper {
    /// Create an unescaper with no pending escape.
    pub fn new() -> Self {
        Unescaper { esc: false }
    }

    /// Feed one raw byte.
    pub fn push(&mut self, raw: u8) -> Unescaped {
        if self.esc {
            self.esc = false;
            return Unescaped::Byte(raw ^ ESCAPE_XOR);
        }
        match raw {
            ESCAPE_BYTE => {
                self.esc = true;
                Unescaped::Pending
            }
            b if is_reserved(b) => Unescaped::Unexpected(b),
            b => Unescaped::Byte(b),
        }
    }

    /// Drop any pending escape state.
    pub fn reset(&mut self) {
        self.esc = false;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_reserved_bytes() {
        let escaped = escape(&[0x00, 0x7E, 0x7D, 0x11, 0x13, 0x42]);
        assert_eq!(
            escaped,
            vec![0x00, 0x7D, 0x5E, 0x7D, 0x5D, 0x7D, 0x31, 0x7D, 0x33, 0x42]
        );
    }

    #[test]
    fn test_escape_passthrough() {
        let data = vec![0x01, 0x02, 0x42, 0xFF];
        assert_eq!(escape(&data), data);
    }

    #[test]
    fn test_unescape_round_trip() {
        let data = vec![0x7E, 0x00, 0x7D, 0x11, 0x13, 0x20, 0x5E, 0xFF];
        assert_eq!(unescape(&escape(&data)), data);
    }

    #[test]
    fn test_streaming_unescaper() {
        let mut un = Unescaper::new();
        assert_eq!(un.push(0x42), Unescaped::Byte(0x42));
        assert_eq!(un.push(0x7D), Unescaped::Pending);
        assert_eq!(un.push(0x5E), Unescaped::Byte(0x7E));
        assert_eq!(un.push(0x11), Unescaped::Unexpected(0x11));
    }
}
