//! XBee API-mode wire protocol
//!
//! This crate implements the framed binary protocol spoken by XBee-family
//! radio modules over a serial link. Every frame on the wire looks like:
//!
//! ```text
//! +-------+---------+---------+--------------------+----------+
//! | 0x7E  | len MSB | len LSB | API id + payload   | checksum |
//! +-------+---------+---------+--------------------+----------+
//! ```
//!
//! The length field counts only the unescaped API id + payload bytes.
//! Every byte after the start delimiter is byte-stuffed: the reserved
//! values 0x7E, 0x7D, 0x11 and 0x13 are replaced by `0x7D, value ^ 0x20`.
//! The checksum is `0xFF - (sum of frame data & 0xFF)`.
//!
//! Two protocol dialects share this outer framing:
//!
//! - **802.15.4** (point-to-point): TX requests 0x00/0x01, RX 0x80/0x81,
//!   I/O samples 0x82/0x83, TX status 0x89.
//! - **ZigBee** (mesh): TX 0x10/0x11, RX 0x90/0x91, I/O sample 0x92,
//!   TX status 0x8B, node identification 0x95.
//!
//! AT commands (0x08/0x09/0x17 with responses 0x88/0x97) and modem
//! status (0x8A) are common to both.
//!
//! The crate is pure: [`encode_frame`] turns a [`Request`] into wire
//! bytes, and [`FrameParser`] turns a wire byte stream into [`Response`]
//! values. The parser never fails: malformed input comes back as a
//! [`ResponseKind::Error`] response carrying the raw bytes, so a read
//! loop can keep running unconditionally.

mod address;
mod checksum;
mod constants;
mod error;
mod escape;
mod frame;
mod io_sample;
mod registry;
mod request;
mod response;

pub use address::*;
pub use checksum::*;
pub use constants::*;
pub use error::*;
pub use escape::*;
pub use frame::*;
pub use io_sample::*;
pub use registry::*;
pub use request::*;
pub use response::*;
