//! Domain layer for loggly-shipper.
//!
//! Contains the canonical types shared across all modules:
//! - `LogEvent`: one unit of log data (free-text message or structured record)
//! - `TagSet`: deduplicated tag collection and the default/call merge policy
//! - `ShipperError`: every failure a dispatch can report

pub mod error;
pub mod log_event;
pub mod tags;

pub use error::ShipperError;
pub use log_event::LogEvent;
pub use tags::TagSet;
