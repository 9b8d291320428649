//! `calcpw-core` — Deterministic calc.pw password calculation; audit target.
//!
//! Derives a reproducible password from a secret master password and a
//! service-specific information string. Nothing is ever stored — every
//! invocation recomputes the password from scratch:
//!
//! 1. PBKDF2-HMAC-SHA256 turns secret + info into 32-byte key material
//! 2. AES-256 in counter mode (with a derived IV) expands it into an
//!    unbounded keystream
//! 3. rejection sampling maps keystream bytes onto the canonical
//!    character set without modulo bias
//! 4. enforcement mode optionally restarts accumulation until every
//!    character group is represented
//!
//! This crate is pure computation: no terminal handling, no process
//! plumbing, no logging. The streaming test modes write through a caller
//! supplied sink and are the only I/O surface.

#![cfg_attr(test, allow(clippy::unwrap_used))]

pub mod calc;
pub mod charset;
pub mod encode;
pub mod error;
pub mod kdf;
pub mod keystream;

pub use calc::{
    calculate, stream_encoded, stream_raw_keystream, Config, DEFAULT_LENGTH, MAX_LENGTH,
    MIN_LENGTH,
};
pub use charset::{CharacterGroup, Charset, DEFAULT_CHARSET};
pub use encode::Encoder;
pub use error::CalcError;
pub use kdf::{derive, KeyMaterial, DEFAULT_ITERATIONS, KEY_LEN};
pub use keystream::{Keystream, BLOCK_LEN};
