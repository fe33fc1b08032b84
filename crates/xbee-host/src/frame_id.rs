//! Frame id allocation.

use xbee_protocol::FrameError;

/// Cyclic allocator for correlation frame ids.
///
/// Ids run 1..=255 and wrap; 0 is the "no response" sentinel and is
/// never produced. Not internally synchronized: callers that allocate
/// from several threads serialize access (the session wraps one in a
/// mutex).
#[derive(Debug)]
pub struct FrameIdAllocator {
    current: u8,
}

impl FrameIdAllocator {
    /// Allocator whose first `next()` returns 1.
    pub fn new() -> Self {
        FrameIdAllocator { current: 0 }
    }

    /// The next frame id, wrapping 255 back to 1.
    pub fn next(&mut self) -> u8 {
        self.current = if self.current >= 255 {
            1
        } else {
            self.current + 1
        };
        self.current
    }

    /// Reset the sequence so the next allocation continues after `value`.
    /// Rejects the sentinel id 0.
    pub fn set(&mut self, value: u8) -> Result<(), FrameError> {
        if value == 0 {
            return Err(FrameError::InvalidFrameId(0));
        }
        self.current = value;
        Ok(())
    }

    /// The most recently allocated id (0 before any allocation).
    pub fn current(&self) -> u8 {
        self.current
    }
}

impl Default for FrameIdAllocator {
    fn default() -> Self {
        FrameIdAllocator::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_at_one() {
        let mut ids = FrameIdAllocator::new();
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);
    }

    #[test]
    fn test_wraps_skipping_zero() {
        let mut ids = FrameIdAllocator::new();
        ids.set(255).unwrap();
        assert_eq!(ids.next(), 1);
    }

    #[test]
    fn test_rejects_sentinel() {
        let mut ids = FrameIdAllocator::new();
        assert!(ids.set(0).is_err());
        assert!(ids.set(255).is_ok());
    }
}
