#![allow(clippy::unwrap_used)]

//! Property-based tests for the password calculation pipeline.

use calcpw_core::{calculate, Charset, Config, Encoder};
use proptest::prelude::*;

/// Single iteration keeps the PBKDF2 step cheap; the properties under
/// test do not depend on the iteration count.
const PROP_ITERATIONS: u32 = 1;

proptest! {
    /// Output length always equals the configured length exactly.
    #[test]
    fn password_length_is_exact(
        secret in proptest::collection::vec(any::<u8>(), 1..32),
        info in proptest::collection::vec(any::<u8>(), 1..32),
        length in 1usize..64,
    ) {
        let config =
            Config::new(length, Charset::default(), false, PROP_ITERATIONS).unwrap();
        let password = calculate(&secret, &info, &config).unwrap();
        prop_assert_eq!(password.len(), length);
    }

    /// Identical inputs always yield an identical password.
    #[test]
    fn calculation_is_deterministic(
        secret in proptest::collection::vec(any::<u8>(), 1..32),
        info in proptest::collection::vec(any::<u8>(), 1..32),
    ) {
        let config = Config::new(16, Charset::default(), false, PROP_ITERATIONS).unwrap();
        let first = calculate(&secret, &info, &config).unwrap();
        let second = calculate(&secret, &info, &config).unwrap();
        prop_assert_eq!(first, second);
    }

    /// Every password character belongs to the flattened charset.
    #[test]
    fn output_stays_within_charset(
        secret in proptest::collection::vec(any::<u8>(), 1..32),
        info in proptest::collection::vec(any::<u8>(), 1..32),
    ) {
        let charset = Charset::parse("0-9 a-f").unwrap();
        let flat = charset.flatten();
        let config = Config::new(24, charset, false, PROP_ITERATIONS).unwrap();

        let password = calculate(&secret, &info, &config).unwrap();
        prop_assert!(password.bytes().all(|b| flat.contains(&b)));
    }

    /// With enforcement on, every group contributes at least one
    /// character.
    #[test]
    fn enforcement_guarantees_group_coverage(
        secret in proptest::collection::vec(any::<u8>(), 1..16),
        info in proptest::collection::vec(any::<u8>(), 1..16),
    ) {
        let charset = Charset::parse("0-9 A-Z a-z").unwrap();
        let config = Config::new(8, charset, true, PROP_ITERATIONS).unwrap();

        let password = calculate(&secret, &info, &config).unwrap();
        let bytes = password.as_bytes();
        for group in config.charset().groups() {
            prop_assert!(group.chars().iter().any(|c| bytes.contains(c)));
        }
    }

    /// The encoder's acceptance region is exactly `[0, limit)` and the
    /// accepted preimages are spread evenly over the alphabet.
    #[test]
    fn encoder_has_no_modulo_bias(groups in "[a-z]{1,6}( [0-9]{1,4}){0,2}") {
        // The generated strings always contain at least one group.
        let charset = Charset::parse(&groups).unwrap();
        let encoder = Encoder::new(&charset);
        let n = encoder.alphabet_len();
        prop_assert_eq!(encoder.limit(), (256 / n) * n);

        let mut counts = std::collections::HashMap::new();
        for byte in 0..=255u8 {
            match encoder.encode(byte) {
                Some(c) => {
                    prop_assert!((byte as usize) < encoder.limit());
                    *counts.entry(c).or_insert(0usize) += 1;
                }
                None => prop_assert!((byte as usize) >= encoder.limit()),
            }
        }
        prop_assert_eq!(counts.len(), n);
        prop_assert!(counts.values().all(|&c| c == 256 / n));
    }
}
