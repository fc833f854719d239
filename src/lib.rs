//! chirpdb - An in-memory, multi-index data layer for a micro-blogging service
//!
//! Users, posts and follow relationships live in stores built from one
//! generic height-balanced tree (`index::OrderedMap`). Non-identity orderings
//! are derived views; follower and trend rankings are aggregates ranked on
//! demand.
//!
//! ```
//! use chirpdb::config::StoreConfig;
//! use chirpdb::model::{PostRecord, UserRecord};
//! use chirpdb::service::DataLayer;
//! use chrono::{TimeZone, Utc};
//!
//! let layer = DataLayer::new(&StoreConfig::default());
//! let when = Utc.with_ymd_and_hms(2020, 1, 1, 0, 0, 0).unwrap();
//!
//! layer.add_user(UserRecord::new(1, "ada", when)).unwrap();
//! layer.add_post(PostRecord::new(10, 1, "hello #rust", when)).unwrap();
//! assert_eq!(layer.top_trending().unwrap()[0].as_deref(), Some("#rust"));
//! ```

pub mod config;
pub mod index;
pub mod model;
pub mod observability;
pub mod ranking;
pub mod service;
pub mod store;
