//! Outgoing requests.
//!
//! A [`Request`] carries the typed form of one host → module frame. The
//! `frame_data` encoder produces the unescaped API id + payload bytes;
//! wrapping them in start/length/checksum/stuffing is the frame encoder's
//! job (see [`crate::encode_frame`]).
//!
//! Frame id 0 is the "no response" sentinel: the module stays silent, so
//! a synchronous sender must never use it.

use crate::address::{Address16, Address64};
use crate::constants::*;
use crate::error::FrameError;

/// A two-character AT command name, e.g. `NI` or `D0`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AtCommandName(pub [u8; 2]);

impl AtCommandName {
    /// Build from a 2-character ASCII string.
    pub fn new(name: &str) -> Result<Self, FrameError> {
        let bytes = name.as_bytes();
        if bytes.len() != 2 || !bytes.iter().all(|b| b.is_ascii_graphic()) {
            return Err(FrameError::InvalidAtCommand);
        }
        Ok(AtCommandName([bytes[0], bytes[1]]))
    }

    /// The command as a string slice.
    pub fn as_str(&self) -> &str {
        // Constructors only accept printable ASCII.
        std::str::from_utf8(&self.0).unwrap_or("??")
    }
}

impl std::fmt::Display for AtCommandName {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Requests that can be sent to the module.
#[derive(Debug, Clone)]
pub enum Request {
    /// Local AT command, applied immediately.
    AtCommand {
        /// Correlation id (0 = no response).
        frame_id: u8,
        /// Two-character command name.
        command: AtCommandName,
        /// Parameter bytes; empty queries the current value.
        parameter: Vec<u8>,
    },

    /// Local AT command, queued until applied.
    AtCommandQueue {
        /// Correlation id (0 = no response).
        frame_id: u8,
        /// Two-character command name.
        command: AtCommandName,
        /// Parameter bytes; empty queries the current value.
        parameter: Vec<u8>,
    },

    /// AT command addressed to a remote node.
    RemoteAtCommand {
        /// Correlation id (0 = no response).
        frame_id: u8,
        /// Remote 64-bit address.
        dest64: Address64,
        /// Remote 16-bit address ([`Address16::UNKNOWN`] to route by the
        /// 64-bit address).
        dest16: Address16,
        /// Apply changes on the remote without a separate AC command.
        apply_changes: bool,
        /// Two-character command name.
        command: AtCommandName,
        /// Parameter bytes.
        parameter: Vec<u8>,
    },

    /// 802.15.4 transmit to a 64-bit address.
    TxRequest64 {
        /// Correlation id (0 = no response).
        frame_id: u8,
        /// Destination address.
        dest: Address64,
        /// Option bits ([`TX_OPTION_DISABLE_ACK`], [`TX_OPTION_BROADCAST_PAN`]).
        options: u8,
        /// Payload, at most [`MAX_TX_PAYLOAD`] bytes.
        payload: Vec<u8>,
    },

    /// 802.15.4 transmit to a 16-bit address.
    TxRequest16 {
        /// Correlation id (0 = no response).
        frame_id: u8,
        /// Destination address.
        dest: Address16,
        /// Option bits ([`TX_OPTION_DISABLE_ACK`], [`TX_OPTION_BROADCAST_PAN`]).
        options: u8,
        /// Payload, at most [`MAX_TX_PAYLOAD`] bytes.
        payload: Vec<u8>,
    },

    /// ZigBee transmit request.
    ZbTxRequest {
        /// Correlation id (0 = no response).
        frame_id: u8,
        /// Destination 64-bit address.
        dest64: Address64,
        /// Destination 16-bit address ([`Address16::UNKNOWN`] if unknown).
        dest16: Address16,
        /// Maximum hops (0 = network maximum).
        broadcast_radius: u8,
        /// Option bits.
        options: u8,
        /// Payload, at most [`MAX_ZB_TX_PAYLOAD`] bytes.
        payload: Vec<u8>,
    },

    /// ZigBee explicit-addressing transmit request.
    ZbExplicitTxRequest {
        /// Correlation id (0 = no response).
        frame_id: u8,
        /// Destination 64-bit address.
        dest64: Address64,
        /// Destination 16-bit address.
        dest16: Address16,
        /// Source endpoint.
        src_endpoint: u8,
        /// Destination endpoint.
        dst_endpoint: u8,
        /// Cluster id.
        cluster_id: u16,
        /// Profile id.
        profile_id: u16,
        /// Maximum hops (0 = network maximum).
        broadcast_radius: u8,
        /// Option bits.
        options: u8,
        /// Payload, at most [`MAX_ZB_TX_PAYLOAD`] bytes.
        payload: Vec<u8>,
    },
}

impl Request {
    /// The API identifier for this request kind.
    pub fn api_id(&self) -> u8 {
        match self {
            Request::AtCommand { .. } => API_AT_COMMAND,
            Request::AtCommandQueue { .. } => API_AT_COMMAND_QUEUE,
            Request::RemoteAtCommand { .. } => API_REMOTE_AT_COMMAND,
            Request::TxRequest64 { .. } => API_TX_REQUEST_64,
            Request::TxRequest16 { .. } => API_TX_REQUEST_16,
            Request::ZbTxRequest { .. } => API_ZB_TX_REQUEST,
            Request::ZbExplicitTxRequest { .. } => API_ZB_EXPLICIT_TX_REQUEST,
        }
    }

    /// The correlation frame id (0 means no response will be generated).
    pub fn frame_id(&self) -> u8 {
        match *self {
            Request::AtCommand { frame_id, .. }
            | Request::AtCommandQueue { frame_id, .. }
            | Request::RemoteAtCommand { frame_id, .. }
            | Request::TxRequest64 { frame_id, .. }
            | Request::TxRequest16 { frame_id, .. }
            | Request::ZbTxRequest { frame_id, .. }
            | Request::ZbExplicitTxRequest { frame_id, .. } => frame_id,
        }
    }

    /// Encode the unescaped frame data (API id + payload), validating
    /// protocol constraints.
    pub fn frame_data(&self) -> Result<Vec<u8>, FrameError> {
        let mut buf = Vec::with_capacity(MAX_TX_PAYLOAD + 16);
        buf.push(self.api_id());

        match self {
            Request::AtCommand {
                frame_id,
                command,
                parameter,
            }
            | Request::AtCommandQueue {
                frame_id,
                command,
                parameter,
            } => {
                buf.push(*frame_id);
                buf.extend_from_slice(&command.0);
                buf.extend_from_slice(parameter);
            }

            Request::RemoteAtCommand {
                frame_id,
                dest64,
                dest16,
                apply_changes,
                command,
                parameter,
            } => {
                buf.push(*frame_id);
                buf.extend_from_slice(&dest64.to_bytes());
                buf.extend_from_slice(&dest16.to_bytes());
                buf.push(if *apply_changes {
                    REMOTE_AT_OPTION_APPLY_CHANGES
                } else {
                    0
                });
                buf.extend_from_slice(&command.0);
                buf.extend_from_slice(parameter);
            }

            Request::TxRequest64 {
                frame_id,
                dest,
                options,
                payload,
            } => {
                check_payload(payload, MAX_TX_PAYLOAD)?;
                check_broadcast_ack(dest.is_broadcast(), *options)?;
                buf.push(*frame_id);
                buf.extend_from_slice(&dest.to_bytes());
                buf.push(*options);
                buf.extend_from_slice(payload);
            }

            Request::TxRequest16 {
                frame_id,
                dest,
                options,
                payload,
            } => {
                check_payload(payload, MAX_TX_PAYLOAD)?;
                check_broadcast_ack(dest.is_broadcast(), *options)?;
                buf.push(*frame_id);
                buf.extend_from_slice(&dest.to_bytes());
                buf.push(*options);
                buf.extend_from_slice(payload);
            }

            Request::ZbTxRequest {
                frame_id,
                dest64,
                dest16,
                broadcast_radius,
                options,
                payload,
            } => {
                check_payload(payload, MAX_ZB_TX_PAYLOAD)?;
                buf.push(*frame_id);
                buf.extend_from_slice(&dest64.to_bytes());
                buf.extend_from_slice(&dest16.to_bytes());
                buf.push(*broadcast_radius);
                buf.push(*options);
                buf.extend_from_slice(payload);
            }

            Request::ZbExplicitTxRequest {
                frame_id,
                dest64,
                dest16,
                src_endpoint,
                dst_endpoint,
                cluster_id,
                profile_id,
                broadcast_radius,
                options,
                payload,
            } => {
                check_payload(payload, MAX_ZB_TX_PAYLOAD)?;
                buf.push(*frame_id);
                buf.extend_from_slice(&dest64.to_bytes());
                buf.extend_from_slice(&dest16.to_bytes());
                buf.push(*src_endpoint);
                buf.push(*dst_endpoint);
                buf.extend_from_slice(&cluster_id.to_be_bytes());
                buf.extend_from_slice(&profile_id.to_be_bytes());
                buf.push(*broadcast_radius);
                buf.push(*options);
                buf.extend_from_slice(payload);
            }
        }

        Ok(buf)
    }
}

fn check_payload(payload: &[u8], max: usize) -> Result<(), FrameError> {
    if payload.len() > max {
        return Err(FrameError::PayloadTooLarge {
            max,
            actual: payload.len(),
        });
    }
    Ok(())
}

/// A broadcast frame is never acknowledged, so requesting an ack (the
/// default when the disable bit is clear) is a contradiction.
fn check_broadcast_ack(is_broadcast: bool, options: u8) -> Result<(), FrameError> {
    if is_broadcast && options & TX_OPTION_DISABLE_ACK == 0 {
        return Err(FrameError::BroadcastWithAck);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_at_command_frame_data() {
        let req = Request::AtCommand {
            frame_id: 0x52,
            command: AtCommandName::new("NJ").unwrap(),
            parameter: vec![0xFF],
        };
        assert_eq!(req.frame_data().unwrap(), vec![0x08, 0x52, b'N', b'J', 0xFF]);
    }

    #[test]
    fn test_at_command_name_validation() {
        assert!(AtCommandName::new("NI").is_ok());
        assert!(AtCommandName::new("N").is_err());
        assert!(AtCommandName::new("NID").is_err());
        assert!(AtCommandName::new("N\n").is_err());
    }

    #[test]
    fn test_tx16_frame_data() {
        let req = Request::TxRequest16 {
            frame_id: 0x01,
            dest: Address16(0x5678),
            options: 0,
            payload: vec![0x48, 0x69],
        };
        assert_eq!(
            req.frame_data().unwrap(),
            vec![0x01, 0x01, 0x56, 0x78, 0x00, 0x48, 0x69]
        );
    }

    #[test]
    fn test_tx_payload_limit() {
        let req = Request::TxRequest64 {
            frame_id: 1,
            dest: Address64(0x1122),
            options: 0,
            payload: vec![0; MAX_TX_PAYLOAD + 1],
        };
        assert_eq!(
            req.frame_data(),
            Err(FrameError::PayloadTooLarge {
                max: MAX_TX_PAYLOAD,
                actual: MAX_TX_PAYLOAD + 1
            })
        );
    }

    #[test]
    fn test_zb_tx_payload_limit() {
        let req = Request::ZbTxRequest {
            frame_id: 1,
            dest64: Address64::COORDINATOR,
            dest16: Address16::UNKNOWN,
            broadcast_radius: 0,
            options: 0,
            payload: vec![0; MAX_ZB_TX_PAYLOAD + 1],
        };
        assert!(matches!(
            req.frame_data(),
            Err(FrameError::PayloadTooLarge { .. })
        ));
    }

    #[test]
    fn test_broadcast_with_ack_rejected() {
        let req = Request::TxRequest16 {
            frame_id: 1,
            dest: Address16::BROADCAST,
            options: 0,
            payload: vec![1, 2, 3],
        };
        assert_eq!(req.frame_data(), Err(FrameError::BroadcastWithAck));

        let ok = Request::TxRequest16 {
            frame_id: 1,
            dest: Address16::BROADCAST,
            options: TX_OPTION_DISABLE_ACK,
            payload: vec![1, 2, 3],
        };
        assert!(ok.frame_data().is_ok());
    }

    #[test]
    fn test_zb_explicit_layout() {
        let req = Request::ZbExplicitTxRequest {
            frame_id: 0x21,
            dest64: Address64(0x0013A200400A0127),
            dest16: Address16::UNKNOWN,
            src_endpoint: 0xE8,
            dst_endpoint: 0xE8,
            cluster_id: 0x0011,
            profile_id: 0xC105,
            broadcast_radius: 0,
            options: 0,
            payload: vec![0xAA],
        };
        let data = req.frame_data().unwrap();
        assert_eq!(data[0], API_ZB_EXPLICIT_TX_REQUEST);
        assert_eq!(data[1], 0x21);
        assert_eq!(&data[2..10], &Address64(0x0013A200400A0127).to_bytes());
        assert_eq!(&data[10..12], &[0xFF, 0xFE]);
        assert_eq!(&data[12..18], &[0xE8, 0xE8, 0x00, 0x11, 0xC1, 0x05]);
        assert_eq!(&data[18..21], &[0x00, 0x00, 0xAA]);
    }
}
