//! Errors returned by the field, parameter, permutation, and sponge layers.
//!
//! Every failure is surfaced as an explicit `Result` to the caller; there are
//! no retries and no silent fallback values, since a silently wrong digest is
//! a security failure rather than a functional one.

use thiserror::Error;

/// A shape violation detected while constructing a
/// [`Parameters`](crate::poseidon::Parameters) bundle.
///
/// These are fatal: the parameter set cannot be used and the caller must fix
/// the input data. Cryptographic preconditions (primality of the modulus,
/// non-singularity of MDS submatrices, `gcd(alpha, p - 1) = 1`) are *not*
/// checked here and remain the parameter generator's responsibility.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InvalidParametersError {
    /// The round-constant table does not have one row per round.
    #[error("expected {expected} round-constant rows (full + partial rounds), got {actual}")]
    RoundConstantCount {
        /// `full_rounds + partial_rounds`.
        expected: usize,
        /// Number of rows supplied.
        actual: usize,
    },

    /// A round-constant row does not have one entry per state cell.
    #[error("round-constant row {row} has {actual} entries, expected {expected}")]
    RoundConstantWidth {
        /// Index of the offending row.
        row: usize,
        /// The state width `t`.
        expected: usize,
        /// Number of entries in the row.
        actual: usize,
    },

    /// The mixing matrix does not have `width` rows.
    #[error("MDS matrix has {rows} rows, expected {width}")]
    MdsRowCount {
        /// The state width `t`.
        width: usize,
        /// Number of rows supplied.
        rows: usize,
    },

    /// A mixing-matrix row does not have `width` entries.
    #[error("MDS matrix row {row} has {actual} entries, expected {expected}")]
    MdsRowWidth {
        /// Index of the offending row.
        row: usize,
        /// The state width `t`.
        expected: usize,
        /// Number of entries in the row.
        actual: usize,
    },

    /// The rate must leave a non-empty capacity section: `1 <= rate < width`.
    #[error("rate {rate} is not in 1..{width}")]
    RateOutOfRange {
        /// The requested rate.
        rate: usize,
        /// The state width `t`.
        width: usize,
    },

    /// The full-round count is split in half around the partial rounds, so it
    /// must be even.
    #[error("full-round count {full_rounds} must be even")]
    OddFullRounds {
        /// The requested full-round count.
        full_rounds: usize,
    },
}

/// The state slice handed to the permutation does not have exactly `width`
/// entries.
///
/// This indicates a bug in the code pairing a state with a parameter set, not
/// a recoverable runtime condition; treat it as an assertion failure.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
#[error("state has {actual} elements, expected {expected}")]
pub struct StateLengthMismatchError {
    /// The parameter set's state width `t`.
    pub expected: usize,
    /// The length of the slice actually supplied.
    pub actual: usize,
}

/// A caller protocol violation at the sponge boundary.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SpongeError {
    /// `absorb` was called after squeezing began. Mixing the two phases
    /// breaks the sponge's security argument, so the transition is one-way.
    #[error("cannot absorb after squeezing has begun")]
    InvalidSpongeState,

    /// An absorbed element belongs to a different field than the sponge's
    /// parameter set. Elements are never coerced between fields.
    #[error("absorbed element belongs to a different field than the sponge parameters")]
    TypeMismatch,

    /// The sponge's state and parameters disagree on the state width.
    #[error(transparent)]
    StateLengthMismatch(#[from] StateLengthMismatchError),
}

/// An arithmetic failure inside the field layer.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum FieldError {
    /// Attempted to invert the additive identity.
    #[error("division by zero: the additive identity has no inverse")]
    DivisionByZero,
}
