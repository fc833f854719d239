//! Multi-index entity stores
//!
//! Three stores share the ordered index substrate:
//!
//! - `UserStore`: identity index by user id, join-date ordering
//! - `PostStore`: identity index by post id, post-date ordering, trend tracker
//! - `FollowStore`: two-sided follow graph and follower leaderboard
//!
//! Stores are single-threaded: writes take `&mut self`, reads `&self`.
//! Sharing across threads goes through `service::DataLayer`.
//!
//! # Invariants
//!
//! - Identity indexes never hold two records with the same id
//! - Every write checks before it mutates; a rejected write changes nothing
//! - Attribute orderings break ties by id

mod date_index;
mod errors;
mod follows;
mod posts;
mod predicate;
mod users;

pub use errors::{EntityKind, StoreError, StoreResult};
pub use follows::FollowStore;
pub use posts::PostStore;
pub use predicate::{PostFilter, UserFilter};
pub use users::UserStore;
