//! Observability subsystem for chirpdb
//!
//! - Structured logging (one JSON line per event)
//! - Monotonic counters
//! - Typed lifecycle and write events
//!
//! Observability is read-only: nothing here influences store behaviour.
//!
//! # Usage
//!
//! ```
//! use chirpdb::observability::{log_event, Event, MetricsRegistry};
//!
//! let metrics = MetricsRegistry::new();
//! metrics.increment_users_added();
//! log_event(Event::UserAdded, &[("id", "7")]);
//! ```

mod events;
mod logger;
mod metrics;

pub use events::Event;
pub use logger::{Logger, Severity};
pub use metrics::{MetricsRegistry, MetricsSnapshot};

/// Log a typed event at its own severity
pub fn log_event(event: Event, fields: &[(&str, &str)]) {
    Logger::log(event.severity(), event.as_str(), fields);
}
