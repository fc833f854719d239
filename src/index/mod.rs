//! Ordered index substrate for chirpdb
//!
//! Every store is composed from one generic height-balanced tree.
//!
//! # Design Principles
//!
//! - One tree type, parameterised by key and value
//! - In-memory only, grow-only (no delete)
//! - Deterministic: traversal order is fully defined, duplicates included
//!
//! # Invariants
//!
//! - Balance factor of every node in {-1, 0, 1} after each insert
//! - Ascending traversal is non-decreasing by key
//! - Equal keys traverse newest-inserted first

mod avl;
mod derived;
mod errors;
mod traversal;

pub use avl::OrderedMap;
pub use derived::{sorted_by, DerivedView};
pub use errors::{InvariantResult, InvariantViolation};
pub use traversal::{padded, top_n, Ascending, Descending, Range};
