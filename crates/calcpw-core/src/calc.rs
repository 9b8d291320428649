//! Password calculation: configuration, the enforcement automaton, and the
//! three execution modes.
//!
//! Password mode accumulates encoded characters until the configured
//! length is reached. With enforcement enabled, reaching the length
//! triggers a coverage check over every character group; a failed check
//! clears the buffer and keeps drawing from the *same* ongoing keystream.
//! The two test modes stream raw keystream blocks and encoded characters
//! indefinitely for statistical validation (dieharder, modulo-bias
//! analysis) and carry no length or enforcement semantics.

use serde::Serialize;
use std::io::Write;

use crate::charset::Charset;
use crate::encode::Encoder;
use crate::error::CalcError;
use crate::kdf::{self, DEFAULT_ITERATIONS};
use crate::keystream::{Keystream, BLOCK_LEN};

/// Smallest allowed password length.
pub const MIN_LENGTH: usize = 1;

/// Largest allowed password length.
///
/// Kept small enough for microcontroller-class implementations of the
/// same calculation.
pub const MAX_LENGTH: usize = 1024;

/// Default password length.
pub const DEFAULT_LENGTH: usize = 16;

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

/// Validated, immutable calculation parameters.
///
/// Built once via [`Config::new`] and passed by reference into the mode
/// entry points; there is no global state. An instance always satisfies
/// the invariants, so the entry points never re-validate.
#[derive(Clone, Debug, Serialize)]
pub struct Config {
    length: usize,
    charset: Charset,
    enforce: bool,
    pbkdf2_iterations: u32,
}

impl Config {
    /// Validate and freeze a parameter set.
    ///
    /// # Errors
    ///
    /// - [`CalcError::LengthOutOfRange`] unless
    ///   [`MIN_LENGTH`] ≤ `length` ≤ [`MAX_LENGTH`]
    /// - [`CalcError::UnsatisfiableEnforcement`] if `enforce` is set and
    ///   the charset has more groups than `length` positions
    /// - [`CalcError::ZeroIterations`] if `pbkdf2_iterations` is zero
    pub fn new(
        length: usize,
        charset: Charset,
        enforce: bool,
        pbkdf2_iterations: u32,
    ) -> Result<Self, CalcError> {
        if !(MIN_LENGTH..=MAX_LENGTH).contains(&length) {
            return Err(CalcError::LengthOutOfRange {
                min: MIN_LENGTH,
                max: MAX_LENGTH,
                got: length,
            });
        }
        if enforce && charset.group_count() > length {
            return Err(CalcError::UnsatisfiableEnforcement {
                groups: charset.group_count(),
                length,
            });
        }
        if pbkdf2_iterations == 0 {
            return Err(CalcError::ZeroIterations);
        }

        Ok(Self {
            length,
            charset,
            enforce,
            pbkdf2_iterations,
        })
    }

    /// Configured password length.
    #[must_use]
    pub fn length(&self) -> usize {
        self.length
    }

    /// The canonical character set.
    #[must_use]
    pub fn charset(&self) -> &Charset {
        &self.charset
    }

    /// Whether per-group coverage is enforced.
    #[must_use]
    pub fn enforce(&self) -> bool {
        self.enforce
    }

    /// PBKDF2 iteration count.
    #[must_use]
    pub fn pbkdf2_iterations(&self) -> u32 {
        self.pbkdf2_iterations
    }
}

impl Default for Config {
    /// Length 16, default charset, enforcement off, 512 000 iterations.
    fn default() -> Self {
        Self {
            length: DEFAULT_LENGTH,
            charset: Charset::default(),
            enforce: false,
            pbkdf2_iterations: DEFAULT_ITERATIONS,
        }
    }
}

// ---------------------------------------------------------------------------
// Password mode
// ---------------------------------------------------------------------------

/// Calculate the password for `secret` + `info` under `config`.
///
/// Deterministic: identical inputs always yield the identical password,
/// across runs and across conforming implementations. The output is
/// exactly `config.length()` characters; no partial output is produced on
/// any error path.
///
/// With enforcement enabled there is no retry ceiling — a character set
/// whose groups can never be jointly covered under the encoding makes
/// this call run forever. Cancellation, if needed, is the caller's job.
///
/// # Errors
///
/// - [`CalcError::EmptySecret`] / [`CalcError::EmptyInfo`] on empty inputs
/// - [`CalcError::Primitive`] if a cryptographic primitive fails
/// - [`CalcError::NonUtf8Output`] if the charset selects bytes that do
///   not form valid UTF-8
pub fn calculate(secret: &[u8], info: &[u8], config: &Config) -> Result<String, CalcError> {
    let key = kdf::derive(secret, info, config.pbkdf2_iterations())?;
    let stream = Keystream::new(&key)?;
    let encoder = Encoder::new(config.charset());

    let password = accumulate(
        stream,
        &encoder,
        config.charset(),
        config.length(),
        config.enforce(),
    );

    String::from_utf8(password).map_err(|_| CalcError::NonUtf8Output)
}

/// Draw encoded characters from a block source until the enforcement
/// automaton completes.
///
/// Generic over the block source so tests can inject crafted keystreams.
/// Production sources are unbounded; if a (test) source runs dry the
/// buffer is returned as-is.
fn accumulate<I>(
    blocks: I,
    encoder: &Encoder,
    charset: &Charset,
    length: usize,
    enforce: bool,
) -> Vec<u8>
where
    I: IntoIterator<Item = [u8; BLOCK_LEN]>,
{
    let mut password: Vec<u8> = Vec::with_capacity(length);

    for block in blocks {
        for &byte in &block {
            if let Some(character) = encoder.encode(byte) {
                password.push(character);

                if password.len() >= length {
                    if enforce && !covers_all_groups(charset, &password) {
                        // A group went uncovered: restart accumulation on
                        // the same ongoing stream.
                        password.clear();
                    } else {
                        return password;
                    }
                }
            }
        }
    }

    password
}

/// Check that every character group contributes to the password.
///
/// Evaluates all group members against all password positions
/// unconditionally, combining with bitwise boolean accumulation instead of
/// short-circuit logic, so the running time carries no signal about where
/// (or whether) a match occurred.
fn covers_all_groups(charset: &Charset, password: &[u8]) -> bool {
    let mut full = true;
    for group in charset.groups() {
        let mut partial = false;
        for &candidate in group.chars() {
            for &position in password {
                partial |= candidate == position;
            }
        }
        full &= partial;
    }
    full
}

// ---------------------------------------------------------------------------
// Streaming test modes
// ---------------------------------------------------------------------------

/// Emit raw keystream blocks to `sink`, indefinitely.
///
/// Bypasses the encoder entirely; meant for statistical validation of the
/// keystream (e.g. dieharder). One block is produced and written at a
/// time — unbounded output is never buffered.
///
/// # Errors
///
/// Returns only on failure: key derivation, primitive, or sink errors.
pub fn stream_raw_keystream<W: Write>(
    secret: &[u8],
    info: &[u8],
    config: &Config,
    sink: &mut W,
) -> Result<(), CalcError> {
    let key = kdf::derive(secret, info, config.pbkdf2_iterations())?;
    let mut stream = Keystream::new(&key)?;

    loop {
        let block = stream.next_block();
        sink.write_all(&block)?;
    }
}

/// Emit the bias-free encoded character stream to `sink`, indefinitely.
///
/// Bypasses length and enforcement; meant for statistical validation of
/// the encoding step (modulo-bias analysis). Characters are written as
/// they are produced.
///
/// # Errors
///
/// Returns only on failure: key derivation, primitive, or sink errors.
pub fn stream_encoded<W: Write>(
    secret: &[u8],
    info: &[u8],
    config: &Config,
    sink: &mut W,
) -> Result<(), CalcError> {
    let key = kdf::derive(secret, info, config.pbkdf2_iterations())?;
    let mut stream = Keystream::new(&key)?;
    let encoder = Encoder::new(config.charset());

    loop {
        let block = stream.next_block();
        for &byte in &block {
            if let Some(character) = encoder.encode(byte) {
                sink.write_all(&[character])?;
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
