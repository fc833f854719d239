//! Domain records stored by chirpdb
//!
//! The stores treat these as values: they read the identity and the
//! attributes they index on, and never modify a record after insert.

mod records;

pub use records::{FollowEdge, PostId, PostRecord, Timestamp, UserId, UserRecord};
