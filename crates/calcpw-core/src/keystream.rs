//! Counter-mode keystream expansion.
//!
//! Expands 32-byte key material into an unbounded sequence of 16-byte
//! pseudorandom blocks: each block is the AES-256 encryption of an
//! incrementing counter. The initial counter is the encryption of the
//! all-zero block under the same key — a *derived* IV rather than a random
//! nonce, because determinism is the whole point of the calculation.

use aes::cipher::{generic_array::GenericArray, BlockEncrypt, KeyInit};
use aes::Aes256;

use crate::error::CalcError;
use crate::kdf::KeyMaterial;

/// Keystream block length in bytes (the AES block size).
pub const BLOCK_LEN: usize = 16;

/// Lazy, unbounded keystream over an incrementing counter.
///
/// Not restartable: the counter is initialized once per invocation and
/// only ever moves forward. The enforcement automaton relies on this —
/// a restart keeps drawing from the same ongoing stream.
pub struct Keystream {
    cipher: Aes256,
    counter: [u8; BLOCK_LEN],
}

impl Keystream {
    /// Build a keystream from derived key material.
    ///
    /// Encrypts the all-zero block to initialize the counter.
    ///
    /// # Errors
    ///
    /// Returns [`CalcError::Primitive`] if the block cipher rejects the
    /// key material.
    pub fn new(key: &KeyMaterial) -> Result<Self, CalcError> {
        let cipher = Aes256::new_from_slice(key.as_bytes())
            .map_err(|e| CalcError::Primitive(format!("block cipher key setup failed: {e}")))?;

        let mut iv = GenericArray::from([0u8; BLOCK_LEN]);
        cipher.encrypt_block(&mut iv);

        Ok(Self {
            cipher,
            counter: iv.into(),
        })
    }

    /// Produce the next 16-byte block and advance the counter.
    pub fn next_block(&mut self) -> [u8; BLOCK_LEN] {
        let mut block = GenericArray::from(self.counter);
        self.cipher.encrypt_block(&mut block);
        increment(&mut self.counter);
        block.into()
    }
}

impl Iterator for Keystream {
    type Item = [u8; BLOCK_LEN];

    /// Never returns `None`; consumption must be bounded by the caller.
    fn next(&mut self) -> Option<Self::Item> {
        Some(self.next_block())
    }
}

/// Increment a big-endian counter block by one.
///
/// The carry walks over every byte unconditionally — no early exit once
/// the carry dies out, so the increment takes the same time regardless of
/// the counter value.
fn increment(counter: &mut [u8; BLOCK_LEN]) {
    let mut carry = 1u16;
    for byte in counter.iter_mut().rev() {
        let sum = u16::from(*byte) + carry;
        *byte = (sum & 0xFF) as u8;
        carry = sum >> 8;
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
