//! PAN encryption, decryption, and display masking.
//!
//! PANs are stored as AES-256-GCM ciphertexts with a fresh random nonce per
//! encryption, so the same card number encrypts to a different string every
//! time and any tampering with the stored value fails authentication on
//! decrypt. The key is injected at construction; there is no default key in
//! source. The stored text form is `<key_id>:<base64(nonce || ciphertext)>`
//! so a future key rotation can tell which key produced a given value.
//!
//! Masking replaces the first twelve digits with four asterisk groups and
//! keeps the last four: `**** **** **** 3456`.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Key, Nonce};
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine as _;
use std::fmt;
use thiserror::Error;

use cardvault_shared::config::PanCryptoConfig;

/// Exact length of a PAN in ASCII digits.
pub const PAN_LENGTH: usize = 16;

/// AES-GCM nonce length in bytes.
const NONCE_LENGTH: usize = 12;

/// Errors that can occur while encoding, decoding, or masking a PAN.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Input is not exactly 16 ASCII digits.
    #[error("PAN must be exactly 16 ASCII digits")]
    InvalidPan,

    /// The configured key material is unusable.
    #[error("Invalid PAN encryption key: {0}")]
    InvalidKey(String),

    /// Ciphertext was produced under a key this codec does not hold.
    #[error("Ciphertext references unknown key id: {0}")]
    UnknownKeyId(String),

    /// Ciphertext does not have the expected structure.
    #[error("Malformed ciphertext")]
    Malformed,

    /// The cipher rejected the payload (tampered or corrupt ciphertext).
    #[error("Ciphertext failed authentication")]
    CipherFailure,
}

/// A named 256-bit PAN encryption key.
///
/// The key id is embedded in every ciphertext so values stay attributable
/// to the key that produced them when keys are rotated.
#[derive(Clone)]
pub struct PanKey {
    key_id: String,
    key: Key<Aes256Gcm>,
}

impl PanKey {
    /// Builds a key from its identifier and base64-encoded material.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidKey` if the identifier is empty or
    /// contains `':'` (the ciphertext separator), if the material is not
    /// valid base64, or if it does not decode to exactly 32 bytes.
    pub fn from_base64(key_id: impl Into<String>, key_base64: &str) -> Result<Self, CodecError> {
        let key_id = key_id.into();
        if key_id.is_empty() || key_id.contains(':') {
            return Err(CodecError::InvalidKey(
                "key id must be non-empty and must not contain ':'".to_string(),
            ));
        }

        let bytes = BASE64
            .decode(key_base64)
            .map_err(|e| CodecError::InvalidKey(e.to_string()))?;
        if bytes.len() != 32 {
            return Err(CodecError::InvalidKey(format!(
                "expected 32 bytes of key material, got {}",
                bytes.len()
            )));
        }

        Ok(Self {
            key_id,
            key: *Key::<Aes256Gcm>::from_slice(&bytes),
        })
    }

    /// Builds the key from loaded configuration.
    ///
    /// # Errors
    ///
    /// Same conditions as [`PanKey::from_base64`].
    pub fn from_config(config: &PanCryptoConfig) -> Result<Self, CodecError> {
        Self::from_base64(config.key_id.clone(), &config.key_base64)
    }

    /// Returns the key identifier.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }
}

// Key material must never end up in logs.
impl fmt::Debug for PanKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PanKey")
            .field("key_id", &self.key_id)
            .finish_non_exhaustive()
    }
}

/// Reversible PAN codec bound to one [`PanKey`].
#[derive(Clone)]
pub struct PanCodec {
    key_id: String,
    cipher: Aes256Gcm,
}

impl PanCodec {
    /// Creates a codec from a key.
    #[must_use]
    pub fn new(key: &PanKey) -> Self {
        Self {
            key_id: key.key_id.clone(),
            cipher: Aes256Gcm::new(&key.key),
        }
    }

    /// Returns the id of the key this codec encrypts under.
    #[must_use]
    pub fn key_id(&self) -> &str {
        &self.key_id
    }

    /// Encrypts a plaintext PAN into its stored text form.
    ///
    /// Non-deterministic: repeated calls with the same PAN produce
    /// different ciphertexts.
    ///
    /// # Errors
    ///
    /// Returns `CodecError::InvalidPan` unless the input is exactly 16
    /// ASCII digits.
    pub fn encrypt(&self, pan: &str) -> Result<String, CodecError> {
        validate_pan(pan)?;

        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, pan.as_bytes())
            .map_err(|_| CodecError::CipherFailure)?;

        let mut payload = Vec::with_capacity(NONCE_LENGTH + ciphertext.len());
        payload.extend_from_slice(nonce.as_slice());
        payload.extend_from_slice(&ciphertext);

        Ok(format!("{}:{}", self.key_id, BASE64.encode(payload)))
    }

    /// Decrypts a stored ciphertext back into the plaintext PAN.
    ///
    /// # Errors
    ///
    /// - `CodecError::Malformed` if the text form or payload structure is
    ///   wrong
    /// - `CodecError::UnknownKeyId` if the value was produced under a
    ///   different key
    /// - `CodecError::CipherFailure` if authentication fails (tampering)
    pub fn decrypt(&self, ciphertext: &str) -> Result<String, CodecError> {
        let (key_id, payload_b64) = ciphertext.split_once(':').ok_or(CodecError::Malformed)?;
        if key_id != self.key_id {
            return Err(CodecError::UnknownKeyId(key_id.to_string()));
        }

        let payload = BASE64
            .decode(payload_b64)
            .map_err(|_| CodecError::Malformed)?;
        if payload.len() <= NONCE_LENGTH {
            return Err(CodecError::Malformed);
        }

        let (nonce, body) = payload.split_at(NONCE_LENGTH);
        let plaintext = self
            .cipher
            .decrypt(Nonce::from_slice(nonce), body)
            .map_err(|_| CodecError::CipherFailure)?;

        let pan = String::from_utf8(plaintext).map_err(|_| CodecError::Malformed)?;
        validate_pan(&pan)?;
        Ok(pan)
    }
}

/// Validates that the input is exactly 16 ASCII digits.
pub fn validate_pan(pan: &str) -> Result<(), CodecError> {
    if pan.len() == PAN_LENGTH && pan.bytes().all(|b| b.is_ascii_digit()) {
        Ok(())
    } else {
        Err(CodecError::InvalidPan)
    }
}

/// Masks a plaintext PAN for display, keeping only the last four digits.
///
/// # Errors
///
/// Returns `CodecError::InvalidPan` unless the input is exactly 16 ASCII
/// digits.
pub fn mask(pan: &str) -> Result<String, CodecError> {
    validate_pan(pan)?;
    Ok(format!("**** **** **** {}", &pan[PAN_LENGTH - 4..]))
}
