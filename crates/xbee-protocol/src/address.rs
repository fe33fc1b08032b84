//! Network addresses.
//!
//! Modules are addressed by a 16-bit network address and a fixed 64-bit
//! serial number, both big-endian on the wire.

use std::fmt;

/// A 16-bit network address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address16(pub u16);

impl Address16 {
    /// Broadcast to all modules.
    pub const BROADCAST: Address16 = Address16(0xFFFF);
    /// Address unknown / not yet assigned (mesh networks use this as the
    /// "route by 64-bit address" sentinel).
    pub const UNKNOWN: Address16 = Address16(0xFFFE);

    /// Build from wire bytes (MSB first).
    pub fn from_bytes(msb: u8, lsb: u8) -> Self {
        Address16(u16::from_be_bytes([msb, lsb]))
    }

    /// Wire representation, MSB first.
    pub fn to_bytes(self) -> [u8; 2] {
        self.0.to_be_bytes()
    }

    /// True for the broadcast address.
    pub fn is_broadcast(self) -> bool {
        self == Address16::BROADCAST
    }
}

impl fmt::Display for Address16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:04X}", self.0)
    }
}

impl From<u16> for Address16 {
    fn from(v: u16) -> Self {
        Address16(v)
    }
}

/// A 64-bit serial-number address.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Address64(pub u64);

impl Address64 {
    /// The network coordinator.
    pub const COORDINATOR: Address64 = Address64(0);
    /// Broadcast to all modules.
    pub const BROADCAST: Address64 = Address64(0x0000_0000_0000_FFFF);

    /// Build from 8 wire bytes, MSB first.
    pub fn from_bytes(bytes: [u8; 8]) -> Self {
        Address64(u64::from_be_bytes(bytes))
    }

    /// Build from a slice. Returns None if the slice is not 8 bytes.
    pub fn from_slice(slice: &[u8]) -> Option<Self> {
        if slice.len() == 8 {
            let mut bytes = [0u8; 8];
            bytes.copy_from_slice(slice);
            Some(Address64::from_bytes(bytes))
        } else {
            None
        }
    }

    /// Wire representation, MSB first.
    pub fn to_bytes(self) -> [u8; 8] {
        self.0.to_be_bytes()
    }

    /// True for the broadcast address.
    pub fn is_broadcast(self) -> bool {
        self == Address64::BROADCAST
    }
}

impl fmt::Display for Address64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:016X}", self.0)
    }
}

impl From<u64> for Address64 {
    fn from(v: u64) -> Self {
        Address64(v)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address16_byte_order() {
        let addr = Address16::from_bytes(0x12, 0x34);
        assert_eq!(addr.0, 0x1234);
        assert_eq!(addr.to_bytes(), [0x12, 0x34]);
    }

    #[test]
    fn test_address64_round_trip() {
        let bytes = [0x00, 0x13, 0xA2, 0x00, 0x40, 0x0A, 0x01, 0x27];
        let addr = Address64::from_bytes(bytes);
        assert_eq!(addr.to_bytes(), bytes);
        assert_eq!(format!("{}", addr), "0x0013A200400A0127");
    }

    #[test]
    fn test_well_known_addresses() {
        assert!(Address16::BROADCAST.is_broadcast());
        assert!(!Address16::UNKNOWN.is_broadcast());
        assert!(Address64::BROADCAST.is_broadcast());
        assert_eq!(Address64::COORDINATOR.0, 0);
    }
}
