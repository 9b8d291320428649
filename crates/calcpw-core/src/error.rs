//! Error types for `calcpw-core`.

use thiserror::Error;

/// Errors produced by the password calculation.
///
/// Configuration and input errors are recoverable — the caller may correct
/// the offending value and retry. Primitive failures abort the invocation;
/// no partial output is ever emitted on any error path.
#[derive(Debug, Error)]
pub enum CalcError {
    /// The character set string parsed to zero character groups.
    #[error("character set is malformed")]
    MalformedCharset,

    /// Requested password length is outside the allowed range.
    #[error("length must be between {min} and {max}, got {got}")]
    LengthOutOfRange {
        /// Smallest allowed length.
        min: usize,
        /// Largest allowed length.
        max: usize,
        /// The rejected value.
        got: usize,
    },

    /// Enforcement cannot be satisfied: more character groups than
    /// password positions.
    #[error("length ({length}) is smaller than the number of enforced character groups ({groups})")]
    UnsatisfiableEnforcement {
        /// Number of character groups in the canonical charset.
        groups: usize,
        /// Configured password length.
        length: usize,
    },

    /// The PBKDF2 iteration count is zero.
    #[error("iteration count must be at least 1")]
    ZeroIterations,

    /// The secret master password is empty.
    #[error("password must not be empty")]
    EmptySecret,

    /// The service information string is empty.
    #[error("information must not be empty")]
    EmptyInfo,

    /// An underlying cryptographic primitive failed — fatal for the
    /// current invocation.
    #[error("cryptographic primitive failure: {0}")]
    Primitive(String),

    /// The character set selected bytes that do not form valid UTF-8,
    /// so the finished password cannot be returned as a string.
    #[error("character set produces non-UTF-8 output")]
    NonUtf8Output,

    /// The output sink of a streaming mode failed.
    #[error("output sink failed: {0}")]
    Sink(#[from] std::io::Error),
}
