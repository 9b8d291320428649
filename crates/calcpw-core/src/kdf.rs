//! PBKDF2-HMAC-SHA256 key derivation.
//!
//! Derives the fixed-length key material that seeds the keystream from the
//! secret master password and the service information string. The
//! information string doubles as the salt, which is what makes the result
//! reproducible per service.

use pbkdf2::pbkdf2_hmac;
use sha2::Sha256;
use std::fmt;
use zeroize::{Zeroize, ZeroizeOnDrop};

use crate::error::CalcError;

/// Output length of the KDF in bytes (256 bits) — the AES-256 key size.
pub const KEY_LEN: usize = 32;

/// Default PBKDF2 iteration count.
///
/// Chosen for acceptable latency on microcontroller-class hardware, which
/// the calculation is designed to stay portable to.
pub const DEFAULT_ITERATIONS: u32 = 512_000;

/// 32-byte secret-derived key material.
///
/// Lives for one invocation only: zeroized on drop, masked in `Debug`, and
/// never serialized. Only the keystream generator reads the raw bytes.
#[derive(Zeroize, ZeroizeOnDrop)]
pub struct KeyMaterial([u8; KEY_LEN]);

impl KeyMaterial {
    /// Raw key bytes, for the block cipher only.
    #[must_use]
    pub(crate) fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.0
    }

    /// Expose the raw bytes for known-answer tests.
    #[cfg(test)]
    pub(crate) fn expose(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("KeyMaterial(***)")
    }
}

/// Derive 32-byte [`KeyMaterial`] from a secret and an information string.
///
/// Both inputs are opaque byte sequences; no encoding is enforced here.
/// `info` is used as the PBKDF2 salt.
///
/// # Errors
///
/// - [`CalcError::EmptySecret`] / [`CalcError::EmptyInfo`] if either input
///   is empty
/// - [`CalcError::ZeroIterations`] if `iterations` is zero
pub fn derive(secret: &[u8], info: &[u8], iterations: u32) -> Result<KeyMaterial, CalcError> {
    if secret.is_empty() {
        return Err(CalcError::EmptySecret);
    }
    if info.is_empty() {
        return Err(CalcError::EmptyInfo);
    }
    if iterations == 0 {
        return Err(CalcError::ZeroIterations);
    }

    let mut key = [0u8; KEY_LEN];
    pbkdf2_hmac::<Sha256>(secret, info, iterations, &mut key);
    Ok(KeyMaterial(key))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
