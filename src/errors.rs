//! Error type shared by every module of the crate.
//!
//! Every variant is a precondition failure: the caller handed in data of the
//! wrong shape or outside the group. A proof that is well formed but does not
//! verify is not an error; verification reports it as `Ok(false)`.

use thiserror::Error;

/// Errors raised by the mixnet library.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MixnetError {
    /// Two operands that must have the same length do not.
    #[error("length mismatch in {context}: expected {expected}, got {actual}")]
    LengthMismatch {
        /// Operation that detected the mismatch.
        context: &'static str,
        /// Length required by the operation.
        expected: usize,
        /// Length actually supplied.
        actual: usize,
    },

    /// An operation that needs at least one row or element got none.
    #[error("empty input to {0}")]
    EmptyInput(&'static str),

    /// Rows of a row set do not all share the same width.
    #[error("row {row} has width {actual}, expected {expected}")]
    InvalidWidth {
        /// Index of the offending row.
        row: usize,
        /// Width of the first row.
        expected: usize,
        /// Width of the offending row.
        actual: usize,
    },

    /// A decoded group element is not a member of the order-q subgroup.
    #[error("element is not a member of the order-q subgroup")]
    NotInSubgroup,

    /// A decoded scalar is not in `[0, q)` or exceeds the exponent width.
    #[error("scalar is out of range")]
    ScalarOutOfRange,

    /// A single batch handed to a windowed exponentiation is too large.
    #[error("batch of {size} bases exceeds the maximum batch size {max}")]
    BatchTooLarge {
        /// Number of bases in the rejected batch.
        size: usize,
        /// Largest batch the engine accepts.
        max: usize,
    },

    /// A byte encoding does not have the width the contract requires.
    #[error("encoding has {actual} bytes, expected {expected}")]
    InvalidEncoding {
        /// Required width in bytes.
        expected: usize,
        /// Width supplied.
        actual: usize,
    },

    /// An exponentiation modulus is zero.
    #[error("modulus must be nonzero")]
    InvalidModulus,

    /// The index vector does not describe a bijection on `[0, n)`.
    #[error("not a permutation: {0}")]
    InvalidPermutation(&'static str),

    /// A public key does not belong to the supplied secret key.
    #[error("public key does not match the secret key")]
    KeyMismatch,

    /// Domain parameters fail validation.
    #[error("invalid group parameters: {0}")]
    InvalidGroup(&'static str),

    /// The worker pool could not be created.
    #[error("worker pool error: {0}")]
    ThreadPool(String),

    /// A configuration value could not be parsed.
    #[error("configuration error: {0}")]
    Config(String),

    /// Encoding or decoding of a persisted object failed.
    #[error("serialization error: {0}")]
    Serialization(String),
}

impl MixnetError {
    /// Builds a [`MixnetError::LengthMismatch`] for `context`.
    pub fn length(context: &'static str, expected: usize, actual: usize) -> Self {
        MixnetError::LengthMismatch {
            context,
            expected,
            actual,
        }
    }
}

/// Fails with [`MixnetError::LengthMismatch`] unless `expected == actual`.
pub(crate) fn check_len(
    context: &'static str,
    expected: usize,
    actual: usize,
) -> Result<(), MixnetError> {
    if expected == actual {
        Ok(())
    } else {
        Err(MixnetError::length(context, expected, actual))
    }
}
