//! Frame encoding and the streaming parser.
//!
//! [`encode_frame`] wraps a request's frame data in the outer wire
//! format: checksum computed over the unescaped data, then
//! `START | LEN_MSB | LEN_LSB | data | checksum` with every byte after
//! the start delimiter stuffed.
//!
//! [`FrameParser`] is the inverse, built as a push parser so the read
//! loop can feed it whatever chunk sizes the transport produces. It
//! unescapes byte-at-a-time, tracks the stated length and running
//! checksum, and emits one [`Response`] per completed frame. Bytes
//! between frames that are not the start delimiter are discarded with a
//! warning (the protocol resynchronizes by scanning for 0x7E). The
//! parser never fails: bad lengths, bad checksums and variant-decode
//! errors all surface as [`ResponseKind::Error`] responses carrying the
//! raw bytes read.

use bytes::{BufMut, BytesMut};
use log::warn;

use crate::checksum::Checksum;
use crate::constants::*;
use crate::error::FrameError;
use crate::escape::{escape, Unescaped, Unescaper};
use crate::registry::ResponseRegistry;
use crate::request::Request;
use crate::response::{Response, ResponseKind};

/// Encode a request into wire bytes, validating it first.
pub fn encode_frame(request: &Request) -> Result<Vec<u8>, FrameError> {
    encode_frame_data(&request.frame_data()?)
}

/// Encode raw frame data (API id + payload) into wire bytes.
pub fn encode_frame_data(data: &[u8]) -> Result<Vec<u8>, FrameError> {
    if data.is_empty() || data.len() > MAX_FRAME_DATA_SIZE {
        return Err(FrameError::UnsupportedLength(data.len() as u16));
    }

    let mut checksum = Checksum::new();
    checksum.add_all(data);

    // Unescaped packet after the start byte: length, data, checksum.
    let mut body = Vec::with_capacity(data.len() + 3);
    body.put_u16(data.len() as u16);
    body.extend_from_slice(data);
    body.put_u8(checksum.compute());

    let mut out = Vec::with_capacity(body.len() + 1);
    out.push(START_BYTE);
    out.extend_from_slice(&escape(&body));
    Ok(out)
}

/// Tuning knobs for the parser.
#[derive(Debug, Clone)]
pub struct ParserOptions {
    /// When false (the default), a reserved byte appearing unescaped
    /// inside a frame is taken as data with a warning; some firmware
    /// revisions fail to escape. When true it aborts the frame into an
    /// Error response.
    pub strict_unescape: bool,
}

impl Default for ParserOptions {
    fn default() -> Self {
        ParserOptions {
            strict_unescape: false,
        }
    }
}

#[derive(Debug)]
enum ParseState {
    /// Scanning for the start delimiter.
    Idle,
    /// Expecting the length MSB.
    LenMsb,
    /// Expecting the length LSB.
    LenLsb,
    /// Consuming frame data plus the trailing checksum byte.
    Data { remaining: usize },
}

/// Incremental frame parser.
pub struct FrameParser {
    registry: ResponseRegistry,
    options: ParserOptions,
    unescaper: Unescaper,
    state: ParseState,
    /// Unescaped bytes of the frame in progress: length, data, checksum.
    raw: BytesMut,
    stated_length: u16,
    discarded: u64,
}

impl FrameParser {
    /// Parser with the default registry and options.
    pub fn new() -> Self {
        FrameParser::with_registry(ResponseRegistry::with_defaults(), ParserOptions::default())
    }

    /// Parser with a caller-supplied registry and options.
    pub fn with_registry(registry: ResponseRegistry, options: ParserOptions) -> Self {
        FrameParser {
            registry,
            options,
            unescaper: Unescaper::new(),
            state: ParseState::Idle,
            raw: BytesMut::with_capacity(MAX_FRAME_DATA_SIZE + 4),
            stated_length: 0,
            discarded: 0,
        }
    }

    /// Mutable access to the decoder registry.
    pub fn registry_mut(&mut self) -> &mut ResponseRegistry {
        &mut self.registry
    }

    /// Total bytes discarded while scanning for a start delimiter.
    pub fn discarded_bytes(&self) -> u64 {
        self.discarded
    }

    /// Feed a chunk of raw wire bytes, returning every frame it completed.
    pub fn push(&mut self, data: &[u8]) -> Vec<Response> {
        let mut responses = Vec::new();
        for &b in data {
            if let Some(response) = self.push_byte(b) {
                responses.push(response);
            }
        }
        responses
    }

    /// Feed a single raw wire byte.
    pub fn push_byte(&mut self, byte: u8) -> Option<Response> {
        if matches!(self.state, ParseState::Idle) {
            if byte == START_BYTE {
                self.begin_frame();
            } else {
                self.discarded += 1;
                warn!("discarding 0x{:02X} while scanning for frame start", byte);
            }
            return None;
        }

        let logical = match self.unescaper.push(byte) {
            Unescaped::Pending => return None,
            Unescaped::Byte(b) => b,
            Unescaped::Unexpected(b) => {
                if self.options.strict_unescape {
                    return Some(self.abort_frame(FrameError::UnescapedReservedByte(b)));
                }
                warn!("unescaped reserved byte 0x{:02X} inside frame, treating as data", b);
                b
            }
        };

        self.raw.put_u8(logical);
        match self.state {
            ParseState::Idle => unreachable!("handled above"),
            ParseState::LenMsb => {
                self.stated_length = (logical as u16) << 8;
                self.state = ParseState::LenLsb;
                None
            }
            ParseState::LenLsb => {
                self.stated_length |= logical as u16;
                if self.stated_length == 0 || self.stated_length as usize > MAX_FRAME_DATA_SIZE {
                    return Some(self.abort_frame(FrameError::UnsupportedLength(self.stated_length)));
                }
                // Frame data plus the checksum byte.
                self.state = ParseState::Data {
                    remaining: self.stated_length as usize + 1,
                };
                None
            }
            ParseState::Data { remaining } => {
                let remaining = remaining - 1;
                if remaining > 0 {
                    self.state = ParseState::Data { remaining };
                    return None;
                }
                Some(self.finish_frame())
            }
        }
    }

    fn begin_frame(&mut self) {
        self.raw.clear();
        self.unescaper.reset();
        self.stated_length = 0;
        self.state = ParseState::LenMsb;
    }

    /// Wrap a framing failure into an Error response and resynchronize.
    fn abort_frame(&mut self, cause: FrameError) -> Response {
        let raw = std::mem::take(&mut self.raw).to_vec();
        let api_id = raw.get(2).copied().unwrap_or(0);
        self.state = ParseState::Idle;
        self.unescaper.reset();
        Response {
            api_id,
            length: self.stated_length,
            checksum: 0,
            raw,
            kind: ResponseKind::Error {
                message: cause.to_string(),
                cause: Some(cause),
            },
        }
    }

    /// All bytes of one frame are in `raw`; verify and decode it.
    fn finish_frame(&mut self) -> Response {
        let raw = std::mem::take(&mut self.raw).to_vec();
        self.state = ParseState::Idle;

        let length = self.stated_length;
        // raw = [len_msb, len_lsb, api_id, payload..., checksum]
        let frame_data = &raw[2..raw.len() - 1];
        let received_checksum = raw[raw.len() - 1];

        let mut checksum = Checksum::new();
        checksum.add_all(frame_data);
        let expected = checksum.compute();
        checksum.add(received_checksum);

        let api_id = frame_data[0];
        let kind = if !checksum.verify() {
            let cause = FrameError::ChecksumMismatch {
                expected,
                actual: received_checksum,
            };
            ResponseKind::Error {
                message: cause.to_string(),
                cause: Some(cause),
            }
        } else {
            match self.registry.decode(api_id, &frame_data[1..]) {
                Ok(kind) => kind,
                Err(cause) => ResponseKind::Error {
                    message: cause.to_string(),
                    cause: Some(cause),
                },
            }
        };

        Response {
            api_id,
            length,
            checksum: received_checksum,
            raw,
            kind,
        }
    }
}

impl Default for FrameParser {
    fn default() -> Self {
        FrameParser::new()
    }
}

impl std::fmt::Debug for FrameParser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FrameParser")
            .field("state", &self.state)
            .field("stated_length", &self.stated_length)
            .field("discarded", &self.discarded)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::address::Address16;
    use crate::request::AtCommandName;

    #[test]
    fn test_encode_at_command_frame() {
        let request = Request::AtCommand {
            frame_id: 0x52,
            command: AtCommandName::new("NJ").unwrap(),
            parameter: vec![0xFF],
        };
        assert_eq!(
            encode_frame(&request).unwrap(),
            vec![0x7E, 0x00, 0x05, 0x08, 0x52, 0x4E, 0x4A, 0xFF, 0x0E]
        );
    }

    #[test]
    fn test_encode_escapes_reserved_payload() {
        // Frame data [0x23, 0x11]: the XON byte must be stuffed.
        let wire = encode_frame_data(&[0x23, 0x11]).unwrap();
        assert_eq!(wire, vec![0x7E, 0x00, 0x02, 0x23, 0x7D, 0x31, 0xCB]);
    }

    #[test]
    fn test_encode_rejects_empty_frame_data() {
        assert!(encode_frame_data(&[]).is_err());
    }

    #[test]
    fn test_round_trip_preserves_frame_data() {
        let frame_data = vec![0x42, 0x01, 0x7E, 0x7D, 0x11, 0x13, 0x99];
        let wire = encode_frame_data(&frame_data).unwrap();
        let mut parser = FrameParser::new();
        let responses = parser.push(&wire);
        assert_eq!(responses.len(), 1);
        let response = &responses[0];
        assert!(!response.is_error());
        assert_eq!(response.api_id, 0x42);
        match &response.kind {
            ResponseKind::Generic { payload } => assert_eq!(payload, &frame_data[1..]),
            other => panic!("wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_parse_reference_io_sample_frame() {
        // RX16 I/O sample: source 0x5678, RSSI -36, one sample with A0 active.
        let wire = [
            0x7E, 0x00, 0x0A, 0x83, 0x56, 0x78, 0x24, 0x00, 0x01, 0x02, 0x00, 0x03, 0xFF, 0x85,
        ];
        let mut parser = FrameParser::new();
        let responses = parser.push(&wire);
        assert_eq!(responses.len(), 1);
        match &responses[0].kind {
            ResponseKind::Rx16IoSample {
                source,
                rssi,
                samples,
                ..
            } => {
                assert_eq!(*source, Address16(0x5678));
                assert_eq!(*rssi, -36);
                assert_eq!(samples.len(), 1);
                assert_eq!(samples[0].analog(0), Some(1023));
            }
            other => panic!("wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_corrupted_checksum_yields_error_response() {
        let mut wire = encode_frame_data(&[0x42, 0x01, 0x02]).unwrap();
        let last = wire.len() - 1;
        wire[last] ^= 0xFF;
        let mut parser = FrameParser::new();
        let responses = parser.push(&wire);
        assert_eq!(responses.len(), 1);
        let response = &responses[0];
        assert!(response.is_error());
        assert!(matches!(
            response.kind,
            ResponseKind::Error {
                cause: Some(FrameError::ChecksumMismatch { .. }),
                ..
            }
        ));
        // Raw bytes are preserved for diagnostics (length + data + checksum).
        assert_eq!(response.raw.len(), wire.len() - 1);
    }

    #[test]
    fn test_resynchronizes_past_garbage() {
        let wire = encode_frame_data(&[0x42, 0x55]).unwrap();
        let mut stream = vec![0x00, 0x01, 0x02];
        stream.extend_from_slice(&wire);
        let mut parser = FrameParser::new();
        let responses = parser.push(&stream);
        assert_eq!(responses.len(), 1);
        assert_eq!(parser.discarded_bytes(), 3);
    }

    #[test]
    fn test_partial_feed() {
        let wire = encode_frame_data(&[0x42, 0x01, 0x02, 0x03]).unwrap();
        let mut parser = FrameParser::new();
        let (a, b) = wire.split_at(3);
        assert!(parser.push(a).is_empty());
        let responses = parser.push(b);
        assert_eq!(responses.len(), 1);
    }

    #[test]
    fn test_two_frames_in_one_push() {
        let mut stream = encode_frame_data(&[0x42, 0x01]).unwrap();
        stream.extend_from_slice(&encode_frame_data(&[0x42, 0x02]).unwrap());
        let mut parser = FrameParser::new();
        assert_eq!(parser.push(&stream).len(), 2);
    }

    #[test]
    fn test_permissive_unescaped_reserved_byte() {
        // Frame data [0x42, 0x11, 0x01] sent without stuffing the XON byte.
        let wire = [0x7E, 0x00, 0x03, 0x42, 0x11, 0x01, 0xAB];
        let mut parser = FrameParser::new();
        let responses = parser.push(&wire);
        assert_eq!(responses.len(), 1);
        match &responses[0].kind {
            ResponseKind::Generic { payload } => assert_eq!(payload, &vec![0x11, 0x01]),
            other => panic!("wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_strict_unescaped_reserved_byte() {
        let wire = [0x7E, 0x00, 0x03, 0x42, 0x11, 0x01, 0xAB];
        let mut parser = FrameParser::with_registry(
            ResponseRegistry::with_defaults(),
            ParserOptions {
                strict_unescape: true,
            },
        );
        let responses = parser.push(&wire);
        assert_eq!(responses.len(), 1);
        assert!(responses[0].is_error());
    }

    #[test]
    fn test_oversized_length_rejected() {
        let wire = [0x7E, 0xFF, 0xFF];
        let mut parser = FrameParser::new();
        let responses = parser.push(&wire);
        assert_eq!(responses.len(), 1);
        assert!(matches!(
            responses[0].kind,
            ResponseKind::Error {
                cause: Some(FrameError::UnsupportedLength(0xFFFF)),
                ..
            }
        ));
    }
}
