//! Frame checksum.
//!
//! A single-byte running sum over the unescaped frame data (API id +
//! payload). On encode the transmitted byte is `0xFF - (sum & 0xFF)`;
//! on decode the sum of the frame data plus the checksum byte must come
//! to 0xFF. One instance covers exactly one frame.

/// Running checksum accumulator.
#[derive(Debug, Default)]
pub struct Checksum {
    sum: u32,
}

impl Checksum {
    /// Create a fresh accumulator.
    pub fn new() -> Self {
        Checksum { sum: 0 }
    }

    /// Fold one unescaped byte into the sum.
    pub fn add(&mut self, byte: u8) {
        self.sum += byte as u32;
    }

    /// Fold a run of unescaped bytes into the sum.
    pub fn add_all(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.add(b);
        }
    }

    /// The checksum byte to transmit after the frame data.
    pub fn compute(&self) -> u8 {
        0xFF - (self.sum & 0xFF) as u8
    }

    /// Verify a received frame. The received checksum byte must already
    /// have been folded in with [`Checksum::add`].
    pub fn verify(&self) -> bool {
        (self.sum & 0xFF) as u8 == 0xFF
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    // Reference vector from the module documentation.
    const FRAME_DATA: [u8; 10] = [0x83, 0x56, 0x78, 0x24, 0x00, 0x01, 0x02, 0x00, 0x03, 0xFF];

    #[test]
    fn test_checksum_reference_vector() {
        let mut ck = Checksum::new();
        ck.add_all(&FRAME_DATA);
        assert_eq!(ck.compute(), 0x85);
    }

    #[test]
    fn test_checksum_verify_reference_vector() {
        let mut ck = Checksum::new();
        ck.add_all(&FRAME_DATA);
        ck.add(0x85);
        assert!(ck.verify());
    }

    #[test]
    fn test_checksum_verify_rejects_corruption() {
        let mut ck = Checksum::new();
        ck.add_all(&FRAME_DATA);
        ck.add(0x84);
        assert!(!ck.verify());
    }

    #[test]
    fn test_checksum_empty_frame() {
        let ck = Checksum::new();
        assert_eq!(ck.compute(), 0xFF);
    }
}
