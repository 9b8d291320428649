//! Bias-free byte-to-character encoding.
//!
//! Maps keystream bytes onto the flattened character set by rejection
//! sampling: with N characters, only bytes below `floor(256 / N) * N` are
//! used, and those map through `byte % N`. Bytes at or above the limit are
//! discarded outright, which removes modulo bias exactly — every character
//! keeps an identical number of accepted preimages.

use crate::charset::Charset;

/// Rejection-sampling encoder over a flattened character set.
pub struct Encoder {
    characters: Vec<u8>,
    limit: usize,
}

impl Encoder {
    /// Build an encoder for the given canonical charset.
    #[must_use]
    pub fn new(charset: &Charset) -> Self {
        let characters = charset.flatten();
        // 1 <= N <= 256, so the limit lands in 1..=256.
        let limit = (256 / characters.len()) * characters.len();
        Self { characters, limit }
    }

    /// Encode a single keystream byte.
    ///
    /// Returns `None` when the byte falls into the rejected tail; no
    /// character is produced or consumed for it.
    #[must_use]
    pub fn encode(&self, byte: u8) -> Option<u8> {
        if (byte as usize) < self.limit {
            Some(self.characters[byte as usize % self.characters.len()])
        } else {
            None
        }
    }

    /// Size of the flattened alphabet.
    #[must_use]
    pub fn alphabet_len(&self) -> usize {
        self.characters.len()
    }

    /// The exclusive upper bound on accepted byte values.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_charset_limit_is_248() {
        // N = 62, floor(256 / 62) * 62 = 248.
        let encoder = Encoder::new(&Charset::default());
        assert_eq!(encoder.alphabet_len(), 62);
        assert_eq!(encoder.limit(), 248);
    }

    #[test]
    fn bytes_below_limit_map_through_modulo() {
        let encoder = Encoder::new(&Charset::default());
        assert_eq!(encoder.encode(0), Some(b'0'));
        assert_eq!(encoder.encode(9), Some(b'9'));
        assert_eq!(encoder.encode(10), Some(b'A'));
        assert_eq!(encoder.encode(61), Some(b'z'));
        assert_eq!(encoder.encode(62), Some(b'0'));
        assert_eq!(encoder.encode(247), Some(b'z'));
    }

    #[test]
    fn bytes_at_or_above_limit_are_rejected() {
        let encoder = Encoder::new(&Charset::default());
        for byte in 248..=255u16 {
            assert_eq!(encoder.encode(byte as u8), None);
        }
    }

    #[test]
    fn every_character_has_equal_preimage_count() {
        let encoder = Encoder::new(&Charset::default());
        let mut counts = std::collections::HashMap::new();
        for byte in 0..=255u8 {
            if let Some(c) = encoder.encode(byte) {
                *counts.entry(c).or_insert(0u32) += 1;
            }
        }
        assert_eq!(counts.len(), 62);
        assert!(counts.values().all(|&n| n == 4));
    }

    #[test]
    fn single_character_alphabet_accepts_everything() {
        let charset = Charset::parse("x").unwrap();
        let encoder = Encoder::new(&charset);
        assert_eq!(encoder.limit(), 256);
        for byte in 0..=255u8 {
            assert_eq!(encoder.encode(byte), Some(b'x'));
        }
    }

    #[test]
    fn power_of_two_alphabet_rejects_nothing() {
        // N = 16 divides 256 evenly.
        let charset = Charset::parse("0-9a-f").unwrap();
        let encoder = Encoder::new(&charset);
        assert_eq!(encoder.limit(), 256);
    }
}
