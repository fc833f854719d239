//! Tree invariant violations
//!
//! None of these are reachable through the public API; they are reported by
//! `OrderedMap::check_invariants` so tests can state exactly what broke.

use thiserror::Error;

/// A structural invariant of an `OrderedMap` that does not hold
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InvariantViolation {
    #[error("node balance factor {balance} outside [-1, 1]")]
    Unbalanced { balance: i64 },

    #[error("cached height {cached} differs from actual height {actual}")]
    StaleHeight { cached: u32, actual: u32 },

    #[error("key at in-order position {position} is smaller than its predecessor")]
    OutOfOrder { position: usize },

    #[error("recorded length {recorded} differs from node count {counted}")]
    LengthMismatch { recorded: usize, counted: usize },
}

impl InvariantViolation {
    /// Returns the string code for this violation
    pub fn code(&self) -> &'static str {
        match self {
            InvariantViolation::Unbalanced { .. } => "CHIRP_TREE_UNBALANCED",
            InvariantViolation::StaleHeight { .. } => "CHIRP_TREE_STALE_HEIGHT",
            InvariantViolation::OutOfOrder { .. } => "CHIRP_TREE_OUT_OF_ORDER",
            InvariantViolation::LengthMismatch { .. } => "CHIRP_TREE_LENGTH_MISMATCH",
        }
    }
}

/// Result type for invariant checks
pub type InvariantResult<T> = Result<T, InvariantViolation>;
