//! Store error types
//!
//! All store failures are expected-path: a duplicate write is rejected
//! before anything is mutated, and the store is left unchanged.

use std::fmt;

use thiserror::Error;

use crate::model::UserId;

/// Entity kinds with an identity index
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EntityKind {
    User,
    Post,
}

impl EntityKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EntityKind::User => "user",
            EntityKind::Post => "post",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Store errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("{kind} {id} already exists")]
    DuplicateIdentity { kind: EntityKind, id: u64 },

    #[error("user {follower} already follows user {followee}")]
    DuplicateRelationship { follower: UserId, followee: UserId },

    #[error("{0} store lock poisoned by a panicked writer")]
    Poisoned(&'static str),
}

impl StoreError {
    /// Returns the string code for this error
    pub fn code(&self) -> &'static str {
        match self {
            StoreError::DuplicateIdentity { .. } => "CHIRP_DUPLICATE_IDENTITY",
            StoreError::DuplicateRelationship { .. } => "CHIRP_DUPLICATE_RELATIONSHIP",
            StoreError::Poisoned(_) => "CHIRP_LOCK_POISONED",
        }
    }

    /// Duplicates are the caller's concern; poisoning is not
    pub fn is_duplicate(&self) -> bool {
        matches!(
            self,
            StoreError::DuplicateIdentity { .. } | StoreError::DuplicateRelationship { .. }
        )
    }
}

/// Result type for store operations
pub type StoreResult<T> = Result<T, StoreError>;
