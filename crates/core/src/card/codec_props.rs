//! Property-based tests for the PAN codec.
//!
//! - Round-trip: decrypt(encrypt(p)) == p for every 16-digit PAN
//! - Randomization: repeated encryption never repeats a ciphertext
//! - Masking: fixed prefix, last four digits preserved
//! - Validation: wrong-length input is always rejected

use proptest::prelude::*;

use super::codec::{mask, validate_pan, PanCodec, PanKey};

const TEST_KEY_B64: &str = "BwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwcHBwc=";

fn test_codec() -> PanCodec {
    PanCodec::new(&PanKey::from_base64("k1", TEST_KEY_B64).unwrap())
}

/// Strategy to generate 16-digit PANs, leading zeros included.
fn pan_strategy() -> impl Strategy<Value = String> {
    (0u64..=9_999_999_999_999_999).prop_map(|n| format!("{n:016}"))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// *For any* 16-digit PAN, decrypting the encrypted form SHALL
    /// reproduce the original exactly.
    #[test]
    fn prop_encrypt_decrypt_round_trip(pan in pan_strategy()) {
        let codec = test_codec();
        let ciphertext = codec.encrypt(&pan).unwrap();
        prop_assert_eq!(codec.decrypt(&ciphertext).unwrap(), pan);
    }

    /// Encryption samples a fresh nonce per call, so identical PANs
    /// SHALL NOT produce identical ciphertexts.
    #[test]
    fn prop_encryption_is_randomized(pan in pan_strategy()) {
        let codec = test_codec();
        let a = codec.encrypt(&pan).unwrap();
        let b = codec.encrypt(&pan).unwrap();
        prop_assert_ne!(a, b);
    }

    /// The masked form SHALL be the fixed asterisk prefix followed by the
    /// last four digits of the PAN.
    #[test]
    fn prop_mask_keeps_only_last_four(pan in pan_strategy()) {
        let masked = mask(&pan).unwrap();
        prop_assert_eq!(&masked[..15], "**** **** **** ");
        prop_assert_eq!(&masked[15..], &pan[12..]);
    }

    /// Digit strings of any other length SHALL be rejected everywhere a
    /// PAN is accepted.
    #[test]
    fn prop_wrong_length_rejected(input in "[0-9]{0,15}|[0-9]{17,24}") {
        let codec = test_codec();
        prop_assert!(validate_pan(&input).is_err());
        prop_assert!(mask(&input).is_err());
        prop_assert!(codec.encrypt(&input).is_err());
    }
}
