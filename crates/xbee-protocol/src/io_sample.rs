//! I/O sample decoding.
//!
//! Sample frames report the state of the module's digital and analog
//! input channels. A channel mask up front says which channels are
//! present; digital states follow as two raw bytes (only when at least
//! one digital channel is active), then one 10-bit value per active
//! analog channel, MSB first, in ascending channel order.
//!
//! The 802.15.4 dialect packs a 16-bit channel indicator (bits 0-8 the
//! digital channels DIO0-DIO8, bits 9-14 the analog channels A0-A5) and
//! may stack several samples in one frame behind a count byte. The
//! ZigBee dialect carries a 16-bit digital mask plus an 8-bit analog
//! mask and always exactly one sample.

use crate::constants::ANALOG_SAMPLE_MASK;
use crate::error::FrameError;

/// One decoded I/O sample.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IoSample {
    digital_mask: u16,
    analog_mask: u8,
    digital: Option<u16>,
    analog: Vec<u16>,
}

impl IoSample {
    /// True if the given digital channel was sampled.
    pub fn is_digital_enabled(&self, channel: u8) -> bool {
        channel < 16 && self.digital_mask & (1 << channel) != 0
    }

    /// State of a digital channel, if it was sampled.
    pub fn digital(&self, channel: u8) -> Option<bool> {
        if !self.is_digital_enabled(channel) {
            return None;
        }
        self.digital.map(|bits| bits & (1 << channel) != 0)
    }

    /// True if the given analog channel was sampled.
    pub fn is_analog_enabled(&self, channel: u8) -> bool {
        channel < 8 && self.analog_mask & (1 << channel) != 0
    }

    /// Reading of an analog channel in [0, 1023], if it was sampled.
    pub fn analog(&self, channel: u8) -> Option<u16> {
        if !self.is_analog_enabled(channel) {
            return None;
        }
        // Values are stored in ascending channel order; count the active
        // channels below this one to find the index.
        let index = (0..channel)
            .filter(|&c| self.analog_mask & (1 << c) != 0)
            .count();
        self.analog.get(index).copied()
    }

    /// All analog readings in ascending channel order.
    pub fn analog_values(&self) -> &[u16] {
        &self.analog
    }

    /// True if the sample contains any digital channel.
    pub fn has_digital(&self) -> bool {
        self.digital_mask != 0
    }

    /// True if the sample contains any analog channel.
    pub fn has_analog(&self) -> bool {
        self.analog_mask != 0
    }
}

/// Reads one sample body (digital bytes + analog values) off the front
/// of `data`, returning the sample and the number of bytes consumed.
fn decode_sample_body(
    data: &[u8],
    digital_mask: u16,
    analog_mask: u8,
) -> Result<(IoSample, usize), FrameError> {
    let mut pos = 0;

    let digital = if digital_mask != 0 {
        if data.len() < 2 {
            return Err(FrameError::FrameTooShort {
                expected: 2,
                actual: data.len(),
            });
        }
        let bits = u16::from_be_bytes([data[0], data[1]]);
        pos += 2;
        Some(bits)
    } else {
        None
    };

    let analog_count = analog_mask.count_ones() as usize;
    let needed = pos + analog_count * 2;
    if data.len() < needed {
        return Err(FrameError::FrameTooShort {
            expected: needed,
            actual: data.len(),
        });
    }
    let mut analog = Vec::with_capacity(analog_count);
    for _ in 0..analog_count {
        let value = u16::from_be_bytes([data[pos], data[pos + 1]]) & ANALOG_SAMPLE_MASK;
        analog.push(value);
        pos += 2;
    }

    Ok((
        IoSample {
            digital_mask,
            analog_mask,
            digital,
            analog,
        },
        pos,
    ))
}

/// Decode the 802.15.4 sample block: count byte, 16-bit channel
/// indicator, then `count` stacked sample bodies.
pub fn decode_wpan_samples(data: &[u8]) -> Result<Vec<IoSample>, FrameError> {
    if data.len() < 3 {
        return Err(FrameError::FrameTooShort {
            expected: 3,
            actual: data.len(),
        });
    }
    let count = data[0];
    let indicator = u16::from_be_bytes([data[1], data[2]]);
    let digital_mask = indicator & 0x01FF;
    let analog_mask = ((indicator >> 9) & 0x3F) as u8;

    let mut samples = Vec::with_capacity(count as usize);
    let mut pos = 3;
    for _ in 0..count {
        let (sample, consumed) = decode_sample_body(&data[pos..], digital_mask, analog_mask)?;
        samples.push(sample);
        pos += consumed;
    }
    Ok(samples)
}

/// Decode the ZigBee sample block: count byte (must be 1), 16-bit
/// digital mask, 8-bit analog mask, one sample body.
pub fn decode_zb_sample(data: &[u8]) -> Result<IoSample, FrameError> {
    if data.len() < 4 {
        return Err(FrameError::FrameTooShort {
            expected: 4,
            actual: data.len(),
        });
    }
    if data[0] != 1 {
        return Err(FrameError::UnsupportedSampleCount(data[0]));
    }
    let digital_mask = u16::from_be_bytes([data[1], data[2]]);
    let analog_mask = data[3];
    let (sample, _) = decode_sample_body(&data[4..], digital_mask, analog_mask)?;
    Ok(sample)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wpan_analog_only() {
        // A0 and A2 active: indicator bits 9 and 11.
        let indicator = (1u16 << 9) | (1 << 11);
        let mut data = vec![1, (indicator >> 8) as u8, indicator as u8];
        data.extend_from_slice(&[0x02, 0x4C]); // A0 = 588
        data.extend_from_slice(&[0x03, 0xFF]); // A2 = 1023
        let samples = decode_wpan_samples(&data).unwrap();
        assert_eq!(samples.len(), 1);
        let s = &samples[0];
        assert!(!s.has_digital());
        assert_eq!(s.analog_values().len(), 2);
        assert_eq!(s.analog(0), Some(588));
        assert_eq!(s.analog(1), None);
        assert_eq!(s.analog(2), Some(1023));
    }

    #[test]
    fn test_wpan_analog_masked_to_10_bits() {
        let indicator = 1u16 << 9; // A0
        let data = vec![1, (indicator >> 8) as u8, indicator as u8, 0xFF, 0xFF];
        let samples = decode_wpan_samples(&data).unwrap();
        assert_eq!(samples[0].analog(0), Some(1023));
    }

    #[test]
    fn test_wpan_stacked_samples() {
        // DIO1 active, two samples.
        let indicator = 1u16 << 1;
        let data = vec![
            2,
            (indicator >> 8) as u8,
            indicator as u8,
            0x00,
            0x02, // sample 1: DIO1 high
            0x00,
            0x00, // sample 2: DIO1 low
        ];
        let samples = decode_wpan_samples(&data).unwrap();
        assert_eq!(samples.len(), 2);
        assert_eq!(samples[0].digital(1), Some(true));
        assert_eq!(samples[1].digital(1), Some(false));
        assert_eq!(samples[0].digital(0), None);
    }

    #[test]
    fn test_zb_sample() {
        // DIO3 + AD1 active.
        let data = vec![
            1, // sample count
            0x00, 0x08, // digital mask: DIO3
            0x02, // analog mask: AD1
            0x00, 0x08, // DIO3 high
            0x01, 0x00, // AD1 = 256
        ];
        let sample = decode_zb_sample(&data).unwrap();
        assert_eq!(sample.digital(3), Some(true));
        assert_eq!(sample.analog(1), Some(256));
    }

    #[test]
    fn test_zb_sample_count_must_be_one() {
        let data = vec![2, 0x00, 0x00, 0x00];
        assert_eq!(
            decode_zb_sample(&data),
            Err(FrameError::UnsupportedSampleCount(2))
        );
    }

    #[test]
    fn test_truncated_sample_rejected() {
        let indicator = 1u16 << 9;
        let data = vec![1, (indicator >> 8) as u8, indicator as u8, 0x02];
        assert!(matches!(
            decode_wpan_samples(&data),
            Err(FrameError::FrameTooShort { .. })
        ));
    }
}
