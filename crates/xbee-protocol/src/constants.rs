//! Protocol constants
//!
//! API identifiers, reserved wire bytes, and size limits for the
//! XBee API-mode protocol.

// ============================================================================
// Reserved Wire Bytes
// ============================================================================

/// Frame start delimiter.
pub const START_BYTE: u8 = 0x7E;
/// Escape introducer for byte stuffing.
pub const ESCAPE_BYTE: u8 = 0x7D;
/// Software flow control XON.
pub const XON_BYTE: u8 = 0x11;
/// Software flow control XOFF.
pub const XOFF_BYTE: u8 = 0x13;
/// XOR mask applied to an escaped byte.
pub const ESCAPE_XOR: u8 = 0x20;

// ============================================================================
// API Identifiers (host → module)
// ============================================================================

/// 802.15.4 transmit to a 64-bit address.
pub const API_TX_REQUEST_64: u8 = 0x00;
/// 802.15.4 transmit to a 16-bit address.
pub const API_TX_REQUEST_16: u8 = 0x01;
/// Local AT command, applied immediately.
pub const API_AT_COMMAND: u8 = 0x08;
/// Local AT command, queued until an AC command applies it.
pub const API_AT_COMMAND_QUEUE: u8 = 0x09;
/// ZigBee transmit request.
pub const API_ZB_TX_REQUEST: u8 = 0x10;
/// ZigBee explicit-addressing transmit request.
pub const API_ZB_EXPLICIT_TX_REQUEST: u8 = 0x11;
/// AT command addressed to a remote node.
pub const API_REMOTE_AT_COMMAND: u8 = 0x17;

// ============================================================================
// API Identifiers (module → host)
// ============================================================================

/// 802.15.4 receive packet, 64-bit source address.
pub const API_RX_64: u8 = 0x80;
/// 802.15.4 receive packet, 16-bit source address.
pub const API_RX_16: u8 = 0x81;
/// 802.15.4 I/O sample, 64-bit source address.
pub const API_RX_64_IO_SAMPLE: u8 = 0x82;
/// 802.15.4 I/O sample, 16-bit source address.
pub const API_RX_16_IO_SAMPLE: u8 = 0x83;
/// Local AT command response.
pub const API_AT_RESPONSE: u8 = 0x88;
/// 802.15.4 transmit status.
pub const API_TX_STATUS: u8 = 0x89;
/// Modem status (reset, association, ...).
pub const API_MODEM_STATUS: u8 = 0x8A;
/// ZigBee transmit status.
pub const API_ZB_TX_STATUS: u8 = 0x8B;
/// ZigBee receive packet.
pub const API_ZB_RX: u8 = 0x90;
/// ZigBee explicit-addressing receive packet.
pub const API_ZB_EXPLICIT_RX: u8 = 0x91;
/// ZigBee I/O sample.
pub const API_ZB_IO_SAMPLE: u8 = 0x92;
/// Node identification indicator.
pub const API_NODE_IDENTIFICATION: u8 = 0x95;
/// Remote AT command response.
pub const API_REMOTE_AT_RESPONSE: u8 = 0x97;

// ============================================================================
// Request Option Bits
// ============================================================================

/// 802.15.4 TX option: do not request an acknowledgement.
pub const TX_OPTION_DISABLE_ACK: u8 = 0x01;
/// 802.15.4 TX option: send with the broadcast PAN id.
pub const TX_OPTION_BROADCAST_PAN: u8 = 0x04;
/// Remote AT option: apply changes on the remote immediately.
pub const REMOTE_AT_OPTION_APPLY_CHANGES: u8 = 0x02;

// ============================================================================
// Sizes
// ============================================================================

/// Maximum payload of an 802.15.4 transmit request.
pub const MAX_TX_PAYLOAD: usize = 100;
/// Maximum payload of a ZigBee transmit request.
pub const MAX_ZB_TX_PAYLOAD: usize = 72;
/// Upper bound on the stated length of an inbound frame. Anything larger
/// is treated as corruption and the parser resynchronizes.
pub const MAX_FRAME_DATA_SIZE: usize = 512;
/// Analog samples are 10-bit ADC readings.
pub const ANALOG_SAMPLE_MASK: u16 = 0x03FF;
