//! Inbound responses.
//!
//! A [`Response`] is the envelope the frame parser hands out for every
//! completed frame: the API id, stated length, checksum and raw bytes,
//! plus the typed [`ResponseKind`] payload. Frames whose API id has no
//! registered decoder come out as [`ResponseKind::Generic`]; frames that
//! fail checksum or field decoding come out as [`ResponseKind::Error`].
//! Construction is the parser's job; everything here is immutable after
//! that.

use std::fmt;

use crate::address::{Address16, Address64};
use crate::error::FrameError;
use crate::io_sample::{decode_wpan_samples, decode_zb_sample, IoSample};
use crate::request::AtCommandName;

// ============================================================================
// Status Enums
// ============================================================================

/// Outcome of a local or remote AT command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AtCommandStatus {
    /// Command applied.
    Ok,
    /// Generic failure.
    Error,
    /// The command name is not recognized.
    InvalidCommand,
    /// The parameter is out of range or malformed.
    InvalidParameter,
    /// No response from the remote node (remote AT only).
    NoResponse,
    /// Unmapped status code.
    Unknown(u8),
}

impl From<u8> for AtCommandStatus {
    fn from(v: u8) -> Self {
        match v {
            0 => AtCommandStatus::Ok,
            1 => AtCommandStatus::Error,
            2 => AtCommandStatus::InvalidCommand,
            3 => AtCommandStatus::InvalidParameter,
            4 => AtCommandStatus::NoResponse,
            other => AtCommandStatus::Unknown(other),
        }
    }
}

/// Unsolicited modem state changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModemStatusKind {
    /// Hardware reset occurred.
    HardwareReset,
    /// Watchdog timer reset occurred.
    WatchdogReset,
    /// Joined a network / associated.
    Associated,
    /// Left the network / disassociated.
    Disassociated,
    /// Synchronization lost.
    SyncLost,
    /// Coordinator realignment.
    CoordinatorRealignment,
    /// Coordinator started.
    CoordinatorStarted,
    /// Network stack error; codes 0x80 and above land here.
    StackError(u8),
    /// Unmapped low status code.
    Unknown(u8),
}

impl From<u8> for ModemStatusKind {
    fn from(v: u8) -> Self {
        match v {
            0 => ModemStatusKind::HardwareReset,
            1 => ModemStatusKind::WatchdogReset,
            2 => ModemStatusKind::Associated,
            3 => ModemStatusKind::Disassociated,
            4 => ModemStatusKind::SyncLost,
            5 => ModemStatusKind::CoordinatorRealignment,
            6 => ModemStatusKind::CoordinatorStarted,
            v if v >= 0x80 => ModemStatusKind::StackError(v),
            other => ModemStatusKind::Unknown(other),
        }
    }
}

/// Outcome of an 802.15.4 transmit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxStatusKind {
    /// Delivered (or broadcast sent).
    Success,
    /// No acknowledgement received after all retries.
    NoAck,
    /// Channel never became clear.
    CcaFailure,
    /// Frame purged (coordinator timeout on an indirect message).
    Purged,
    /// Unmapped status code.
    Unknown(u8),
}

impl From<u8> for TxStatusKind {
    fn from(v: u8) -> Self {
        match v {
            0 => TxStatusKind::Success,
            1 => TxStatusKind::NoAck,
            2 => TxStatusKind::CcaFailure,
            3 => TxStatusKind::Purged,
            other => TxStatusKind::Unknown(other),
        }
    }
}

/// Outcome of a ZigBee transmit.
///
/// 0x2C and 0x32 are both documented upstream as resource exhaustion;
/// both are retained but callers should not rely on telling them apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeliveryStatus {
    /// Delivered.
    Success,
    /// MAC acknowledgement failure.
    MacAckFailure,
    /// Channel never became clear.
    CcaFailure,
    /// Invalid destination endpoint.
    InvalidDestinationEndpoint,
    /// Network acknowledgement failure.
    NetworkAckFailure,
    /// Not joined to a network.
    NotJoined,
    /// Destination is this node.
    SelfAddressed,
    /// 16-bit address not found.
    AddressNotFound,
    /// No route to the destination.
    RouteNotFound,
    /// Resource error (0x2C).
    ResourceError,
    /// Resource error, out of buffers (0x32).
    NoFreeBuffers,
    /// Payload exceeded the network limit.
    PayloadTooLarge,
    /// Unmapped status code.
    Unknown(u8),
}

impl From<u8> for DeliveryStatus {
    fn from(v: u8) -> Self {
        match v {
            0x00 => DeliveryStatus::Success,
            0x01 => DeliveryStatus::MacAckFailure,
            0x02 => DeliveryStatus::CcaFailure,
            0x15 => DeliveryStatus::InvalidDestinationEndpoint,
            0x21 => DeliveryStatus::NetworkAckFailure,
            0x22 => DeliveryStatus::NotJoined,
            0x23 => DeliveryStatus::SelfAddressed,
            0x24 => DeliveryStatus::AddressNotFound,
            0x25 => DeliveryStatus::RouteNotFound,
            0x2C => DeliveryStatus::ResourceError,
            0x32 => DeliveryStatus::NoFreeBuffers,
            0x74 => DeliveryStatus::PayloadTooLarge,
            other => DeliveryStatus::Unknown(other),
        }
    }
}

/// How a ZigBee transmit was routed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscoveryStatus {
    /// No discovery overhead.
    NoOverhead,
    /// Address discovery was needed.
    AddressDiscovery,
    /// Route discovery was needed.
    RouteDiscovery,
    /// Both address and route discovery were needed.
    AddressAndRoute,
    /// Extended timeout discovery.
    ExtendedTimeout,
    /// Unmapped status code.
    Unknown(u8),
}

impl From<u8> for DiscoveryStatus {
    fn from(v: u8) -> Self {
        match v {
            0x00 => DiscoveryStatus::NoOverhead,
            0x01 => DiscoveryStatus::AddressDiscovery,
            0x02 => DiscoveryStatus::RouteDiscovery,
            0x03 => DiscoveryStatus::AddressAndRoute,
            0x40 => DiscoveryStatus::ExtendedTimeout,
            other => DiscoveryStatus::Unknown(other),
        }
    }
}

/// Role of a node in the mesh.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeviceType {
    /// Network coordinator.
    Coordinator,
    /// Routing node.
    Router,
    /// Sleeping end device.
    EndDevice,
    /// Unmapped device type.
    Unknown(u8),
}

impl From<u8> for DeviceType {
    fn from(v: u8) -> Self {
        match v {
            0 => DeviceType::Coordinator,
            1 => DeviceType::Router,
            2 => DeviceType::EndDevice,
            other => DeviceType::Unknown(other),
        }
    }
}

/// What triggered a node identification broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IdentificationEvent {
    /// Commissioning pushbutton pressed.
    Pushbutton,
    /// Node joined the network.
    Joined,
    /// Node power cycled.
    PowerCycle,
    /// Unmapped event code.
    Unknown(u8),
}

impl From<u8> for IdentificationEvent {
    fn from(v: u8) -> Self {
        match v {
            1 => IdentificationEvent::Pushbutton,
            2 => IdentificationEvent::Joined,
            3 => IdentificationEvent::PowerCycle,
            other => IdentificationEvent::Unknown(other),
        }
    }
}

// ============================================================================
// Response Envelope
// ============================================================================

/// A decoded inbound frame.
#[derive(Debug, Clone)]
pub struct Response {
    /// API identifier (the first frame-data byte).
    pub api_id: u8,
    /// Length stated on the wire (unescaped API id + payload bytes).
    pub length: u16,
    /// Checksum byte received on the wire.
    pub checksum: u8,
    /// Raw unescaped bytes as read: length, frame data, checksum. Kept
    /// for diagnostics, especially on error responses.
    pub raw: Vec<u8>,
    /// Typed payload.
    pub kind: ResponseKind,
}

impl Response {
    /// True if this frame failed to decode.
    pub fn is_error(&self) -> bool {
        matches!(self.kind, ResponseKind::Error { .. })
    }

    /// Human-readable failure description for error responses.
    pub fn error_message(&self) -> Option<&str> {
        match &self.kind {
            ResponseKind::Error { message, .. } => Some(message),
            _ => None,
        }
    }

    /// The correlation frame id, for response kinds that carry one.
    pub fn frame_id(&self) -> Option<u8> {
        match self.kind {
            ResponseKind::AtResponse { frame_id, .. }
            | ResponseKind::RemoteAtResponse { frame_id, .. }
            | ResponseKind::TxStatus { frame_id, .. }
            | ResponseKind::ZbTxStatus { frame_id, .. } => Some(frame_id),
            _ => None,
        }
    }
}

/// Typed payload of an inbound frame, one case per API id.
#[derive(Debug, Clone)]
pub enum ResponseKind {
    /// Local AT command response (0x88).
    AtResponse {
        /// Correlation id.
        frame_id: u8,
        /// Echoed command name.
        command: AtCommandName,
        /// Command outcome.
        status: AtCommandStatus,
        /// Returned register value, if any.
        value: Vec<u8>,
    },

    /// Remote AT command response (0x97).
    RemoteAtResponse {
        /// Correlation id.
        frame_id: u8,
        /// Responding node's 64-bit address.
        remote64: Address64,
        /// Responding node's 16-bit address.
        remote16: Address16,
        /// Echoed command name.
        command: AtCommandName,
        /// Command outcome.
        status: AtCommandStatus,
        /// Returned register value, if any.
        value: Vec<u8>,
    },

    /// Modem status (0x8A).
    ModemStatus {
        /// The reported state change.
        status: ModemStatusKind,
    },

    /// 802.15.4 transmit status (0x89).
    TxStatus {
        /// Correlation id.
        frame_id: u8,
        /// Delivery outcome.
        status: TxStatusKind,
    },

    /// ZigBee transmit status (0x8B).
    ZbTxStatus {
        /// Correlation id.
        frame_id: u8,
        /// 16-bit address the frame was delivered to.
        remote16: Address16,
        /// Number of application retries.
        retry_count: u8,
        /// Delivery outcome.
        delivery: DeliveryStatus,
        /// Route/address discovery overhead.
        discovery: DiscoveryStatus,
    },

    /// 802.15.4 receive, 64-bit source (0x80).
    Rx64 {
        /// Source address.
        source: Address64,
        /// Received signal strength in dBm (wire byte negated).
        rssi: i8,
        /// Receive option bits.
        options: u8,
        /// Application payload.
        payload: Vec<u8>,
    },

    /// 802.15.4 receive, 16-bit source (0x81).
    Rx16 {
        /// Source address.
        source: Address16,
        /// Received signal strength in dBm (wire byte negated).
        rssi: i8,
        /// Receive option bits.
        options: u8,
        /// Application payload.
        payload: Vec<u8>,
    },

    /// 802.15.4 I/O sample, 64-bit source (0x82).
    Rx64IoSample {
        /// Source address.
        source: Address64,
        /// Received signal strength in dBm (wire byte negated).
        rssi: i8,
        /// Receive option bits.
        options: u8,
        /// Stacked samples, oldest first.
        samples: Vec<IoSample>,
    },

    /// 802.15.4 I/O sample, 16-bit source (0x83).
    Rx16IoSample {
        /// Source address.
        source: Address16,
        /// Received signal strength in dBm (wire byte negated).
        rssi: i8,
        /// Receive option bits.
        options: u8,
        /// Stacked samples, oldest first.
        samples: Vec<IoSample>,
    },

    /// ZigBee receive (0x90).
    ZbRx {
        /// Source 64-bit address.
        source64: Address64,
        /// Source 16-bit address.
        source16: Address16,
        /// Receive option bits.
        options: u8,
        /// Application payload.
        payload: Vec<u8>,
    },

    /// ZigBee explicit-addressing receive (0x91).
    ZbExplicitRx {
        /// Source 64-bit address.
        source64: Address64,
        /// Source 16-bit address.
        source16: Address16,
        /// Source endpoint.
        src_endpoint: u8,
        /// Destination endpoint.
        dst_endpoint: u8,
        /// Cluster id.
        cluster_id: u16,
        /// Profile id.
        profile_id: u16,
        /// Receive option bits.
        options: u8,
        /// Application payload.
        payload: Vec<u8>,
    },

    /// ZigBee I/O sample (0x92).
    ZbIoSample {
        /// Source 64-bit address.
        source64: Address64,
        /// Source 16-bit address.
        source16: Address16,
        /// Receive option bits.
        options: u8,
        /// The single sample.
        sample: IoSample,
    },

    /// Node identification indicator (0x95).
    NodeIdentification {
        /// Sender's 64-bit address.
        sender64: Address64,
        /// Sender's 16-bit address.
        sender16: Address16,
        /// Receive option bits.
        options: u8,
        /// Identified node's 16-bit address.
        remote16: Address16,
        /// Identified node's 64-bit address.
        remote64: Address64,
        /// Node identifier string (NI register).
        node_identifier: String,
        /// Parent's 16-bit address.
        parent16: Address16,
        /// Node role.
        device_type: DeviceType,
        /// What triggered the identification.
        event: IdentificationEvent,
        /// Profile id.
        profile_id: u16,
        /// Manufacturer id.
        manufacturer_id: u16,
    },

    /// Frame with an API id no decoder is registered for; the payload is
    /// preserved verbatim.
    Generic {
        /// Frame data after the API id.
        payload: Vec<u8>,
    },

    /// Frame that failed to decode. The envelope's `raw` field holds the
    /// bytes read.
    Error {
        /// What went wrong.
        message: String,
        /// Typed cause, when decoding produced one.
        cause: Option<FrameError>,
    },
}

impl fmt::Display for ResponseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseKind::AtResponse { command, status, .. } => {
                write!(f, "AT {} {:?}", command, status)
            }
            ResponseKind::RemoteAtResponse { command, status, remote64, .. } => {
                write!(f, "remote AT {} {:?} from {}", command, status, remote64)
            }
            ResponseKind::ModemStatus { status } => write!(f, "modem status {:?}", status),
            ResponseKind::TxStatus { frame_id, status } => {
                write!(f, "tx status {:?} (frame {})", status, frame_id)
            }
            ResponseKind::ZbTxStatus { frame_id, delivery, .. } => {
                write!(f, "zb tx status {:?} (frame {})", delivery, frame_id)
            }
            ResponseKind::Rx64 { source, payload, .. } => {
                write!(f, "rx {} bytes from {}", payload.len(), source)
            }
            ResponseKind::Rx16 { source, payload, .. } => {
                write!(f, "rx {} bytes from {}", payload.len(), source)
            }
            ResponseKind::Rx64IoSample { source, samples, .. } => {
                write!(f, "{} io sample(s) from {}", samples.len(), source)
            }
            ResponseKind::Rx16IoSample { source, samples, .. } => {
                write!(f, "{} io sample(s) from {}", samples.len(), source)
            }
            ResponseKind::ZbRx { source64, payload, .. } => {
                write!(f, "zb rx {} bytes from {}", payload.len(), source64)
            }
            ResponseKind::ZbExplicitRx { source64, cluster_id, payload, .. } => {
                write!(
                    f,
                    "zb explicit rx {} bytes from {} (cluster 0x{:04X})",
                    payload.len(),
                    source64,
                    cluster_id
                )
            }
            ResponseKind::ZbIoSample { source64, .. } => {
                write!(f, "zb io sample from {}", source64)
            }
            ResponseKind::NodeIdentification { remote64, node_identifier, .. } => {
                write!(f, "node id '{}' at {}", node_identifier, remote64)
            }
            ResponseKind::Generic { payload } => write!(f, "generic ({} bytes)", payload.len()),
            ResponseKind::Error { message, .. } => write!(f, "error: {}", message),
        }
    }
}

// ============================================================================
// Variant Decoders
// ============================================================================
//
// Each decoder receives the frame-data bytes after the API id and must
// account for every field it reads with an explicit length guard; the
// parser turns any Err into an Error-kind response.

fn need(payload: &[u8], expected: usize) -> Result<(), FrameError> {
    if payload.len() < expected {
        return Err(FrameError::FrameTooShort {
            expected,
            actual: payload.len(),
        });
    }
    Ok(())
}

fn addr64(payload: &[u8]) -> Address64 {
    let mut bytes = [0u8; 8];
    bytes.copy_from_slice(&payload[..8]);
    Address64::from_bytes(bytes)
}

fn at_name(payload: &[u8]) -> AtCommandName {
    AtCommandName([payload[0], payload[1]])
}

/// The wire carries RSSI as a positive magnitude; readings are negative dBm.
/// Magnitudes above 127 never occur on real hardware; if one shows up it
/// saturates to -127 rather than wrapping.
fn rssi_dbm(byte: u8) -> i8 {
    -(byte.min(127) as i8)
}

pub(crate) fn decode_at_response(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 4)?;
    Ok(ResponseKind::AtResponse {
        frame_id: payload[0],
        command: at_name(&payload[1..3]),
        status: AtCommandStatus::from(payload[3]),
        value: payload[4..].to_vec(),
    })
}

pub(crate) fn decode_remote_at_response(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 14)?;
    Ok(ResponseKind::RemoteAtResponse {
        frame_id: payload[0],
        remote64: addr64(&payload[1..9]),
        remote16: Address16::from_bytes(payload[9], payload[10]),
        command: at_name(&payload[11..13]),
        status: AtCommandStatus::from(payload[13]),
        value: payload[14..].to_vec(),
    })
}

pub(crate) fn decode_modem_status(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 1)?;
    Ok(ResponseKind::ModemStatus {
        status: ModemStatusKind::from(payload[0]),
    })
}

pub(crate) fn decode_tx_status(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 2)?;
    Ok(ResponseKind::TxStatus {
        frame_id: payload[0],
        status: TxStatusKind::from(payload[1]),
    })
}

pub(crate) fn decode_zb_tx_status(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 6)?;
    Ok(ResponseKind::ZbTxStatus {
        frame_id: payload[0],
        remote16: Address16::from_bytes(payload[1], payload[2]),
        retry_count: payload[3],
        delivery: DeliveryStatus::from(payload[4]),
        discovery: DiscoveryStatus::from(payload[5]),
    })
}

pub(crate) fn decode_rx_64(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 10)?;
    Ok(ResponseKind::Rx64 {
        source: addr64(&payload[..8]),
        rssi: rssi_dbm(payload[8]),
        options: payload[9],
        payload: payload[10..].to_vec(),
    })
}

pub(crate) fn decode_rx_16(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 4)?;
    Ok(ResponseKind::Rx16 {
        source: Address16::from_bytes(payload[0], payload[1]),
        rssi: rssi_dbm(payload[2]),
        options: payload[3],
        payload: payload[4..].to_vec(),
    })
}

pub(crate) fn decode_rx_64_io_sample(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 10)?;
    Ok(ResponseKind::Rx64IoSample {
        source: addr64(&payload[..8]),
        rssi: rssi_dbm(payload[8]),
        options: payload[9],
        samples: decode_wpan_samples(&payload[10..])?,
    })
}

pub(crate) fn decode_rx_16_io_sample(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 4)?;
    Ok(ResponseKind::Rx16IoSample {
        source: Address16::from_bytes(payload[0], payload[1]),
        rssi: rssi_dbm(payload[2]),
        options: payload[3],
        samples: decode_wpan_samples(&payload[4..])?,
    })
}

pub(crate) fn decode_zb_rx(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 11)?;
    Ok(ResponseKind::ZbRx {
        source64: addr64(&payload[..8]),
        source16: Address16::from_bytes(payload[8], payload[9]),
        options: payload[10],
        payload: payload[11..].to_vec(),
    })
}

pub(crate) fn decode_zb_explicit_rx(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 17)?;
    Ok(ResponseKind::ZbExplicitRx {
        source64: addr64(&payload[..8]),
        source16: Address16::from_bytes(payload[8], payload[9]),
        src_endpoint: payload[10],
        dst_endpoint: payload[11],
        cluster_id: u16::from_be_bytes([payload[12], payload[13]]),
        profile_id: u16::from_be_bytes([payload[14], payload[15]]),
        options: payload[16],
        payload: payload[17..].to_vec(),
    })
}

pub(crate) fn decode_zb_io_sample(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 11)?;
    Ok(ResponseKind::ZbIoSample {
        source64: addr64(&payload[..8]),
        source16: Address16::from_bytes(payload[8], payload[9]),
        options: payload[10],
        sample: decode_zb_sample(&payload[11..])?,
    })
}

pub(crate) fn decode_node_identification(payload: &[u8]) -> Result<ResponseKind, FrameError> {
    need(payload, 22)?;
    let sender64 = addr64(&payload[..8]);
    let sender16 = Address16::from_bytes(payload[8], payload[9]);
    let options = payload[10];
    let remote16 = Address16::from_bytes(payload[11], payload[12]);
    let remote64 = addr64(&payload[13..21]);

    // Node identifier runs to the NUL terminator.
    let rest = &payload[21..];
    let nul = rest
        .iter()
        .position(|&b| b == 0)
        .ok_or(FrameError::FrameTooShort {
            expected: 22,
            actual: payload.len(),
        })?;
    let node_identifier = String::from_utf8_lossy(&rest[..nul]).into_owned();

    let tail = &rest[nul + 1..];
    need(tail, 8)?;
    Ok(ResponseKind::NodeIdentification {
        sender64,
        sender16,
        options,
        remote16,
        remote64,
        node_identifier,
        parent16: Address16::from_bytes(tail[0], tail[1]),
        device_type: DeviceType::from(tail[2]),
        event: IdentificationEvent::from(tail[3]),
        profile_id: u16::from_be_bytes([tail[4], tail[5]]),
        manufacturer_id: u16::from_be_bytes([tail[6], tail[7]]),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_response_decode() {
        let payload = [0x01, b'B', b'D', 0x00, 0x07];
        let kind = decode_at_response(&payload).unwrap();
        match kind {
            ResponseKind::AtResponse {
                frame_id,
                command,
                status,
                value,
            } => {
                assert_eq!(frame_id, 1);
                assert_eq!(command.as_str(), "BD");
                assert_eq!(status, AtCommandStatus::Ok);
                assert_eq!(value, vec![0x07]);
            }
            other => panic!("wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_at_response_too_short() {
        assert!(matches!(
            decode_at_response(&[0x01, b'B']),
            Err(FrameError::FrameTooShort { .. })
        ));
    }

    #[test]
    fn test_modem_status_stack_error_bucket() {
        assert_eq!(
            ModemStatusKind::from(0x83),
            ModemStatusKind::StackError(0x83)
        );
        assert_eq!(ModemStatusKind::from(0x42), ModemStatusKind::Unknown(0x42));
        assert_eq!(ModemStatusKind::from(2), ModemStatusKind::Associated);
    }

    #[test]
    fn test_delivery_status_resource_duplicates() {
        assert_eq!(DeliveryStatus::from(0x2C), DeliveryStatus::ResourceError);
        assert_eq!(DeliveryStatus::from(0x32), DeliveryStatus::NoFreeBuffers);
        assert_eq!(DeliveryStatus::from(0x7F), DeliveryStatus::Unknown(0x7F));
    }

    #[test]
    fn test_rx16_rssi_negated() {
        let payload = [0x12, 0x34, 40, 0x00, 0xAB];
        match decode_rx_16(&payload).unwrap() {
            ResponseKind::Rx16 { source, rssi, payload, .. } => {
                assert_eq!(source, Address16(0x1234));
                assert_eq!(rssi, -40);
                assert_eq!(payload, vec![0xAB]);
            }
            other => panic!("wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_rssi_saturates_instead_of_wrapping() {
        assert_eq!(rssi_dbm(0x24), -36);
        assert_eq!(rssi_dbm(127), -127);
        assert_eq!(rssi_dbm(0x80), -127);
        assert_eq!(rssi_dbm(0xFF), -127);
    }

    #[test]
    fn test_zb_tx_status_decode() {
        let payload = [0x47, 0x7D, 0x84, 0x00, 0x00, 0x01];
        match decode_zb_tx_status(&payload).unwrap() {
            ResponseKind::ZbTxStatus {
                frame_id,
                remote16,
                retry_count,
                delivery,
                discovery,
            } => {
                assert_eq!(frame_id, 0x47);
                assert_eq!(remote16, Address16(0x7D84));
                assert_eq!(retry_count, 0);
                assert_eq!(delivery, DeliveryStatus::Success);
                assert_eq!(discovery, DiscoveryStatus::AddressDiscovery);
            }
            other => panic!("wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_node_identification_decode() {
        let mut payload = Vec::new();
        payload.extend_from_slice(&Address64(0x0013A200400A3E02).to_bytes());
        payload.extend_from_slice(&[0x7D, 0x84]); // sender16
        payload.push(0x02); // options
        payload.extend_from_slice(&[0x7D, 0x84]); // remote16
        payload.extend_from_slice(&Address64(0x0013A200400A3E02).to_bytes());
        payload.extend_from_slice(b"SENSOR-1\0");
        payload.extend_from_slice(&[0xFF, 0xFE]); // parent16
        payload.push(0x01); // router
        payload.push(0x02); // joined
        payload.extend_from_slice(&[0xC1, 0x05]); // profile
        payload.extend_from_slice(&[0x10, 0x1E]); // manufacturer

        match decode_node_identification(&payload).unwrap() {
            ResponseKind::NodeIdentification {
                node_identifier,
                device_type,
                event,
                profile_id,
                manufacturer_id,
                parent16,
                ..
            } => {
                assert_eq!(node_identifier, "SENSOR-1");
                assert_eq!(device_type, DeviceType::Router);
                assert_eq!(event, IdentificationEvent::Joined);
                assert_eq!(profile_id, 0xC105);
                assert_eq!(manufacturer_id, 0x101E);
                assert_eq!(parent16, Address16::UNKNOWN);
            }
            other => panic!("wrong kind: {:?}", other),
        }
    }

    #[test]
    fn test_node_identification_missing_nul() {
        let mut payload = vec![0u8; 21];
        payload.extend_from_slice(b"NAME-WITHOUT-TERMINATOR");
        assert!(decode_node_identification(&payload).is_err());
    }
}
