#![deny(warnings, rust_2024_compatibility)]
// Specific pedantic lints enforced (not blanket allow):
#![deny(
    clippy::explicit_iter_loop,
    clippy::manual_let_else,
    clippy::semicolon_if_nothing_returned,
    clippy::inconsistent_struct_constructor
)]
#![allow(
    clippy::cast_possible_truncation, // Millisecond counters stay far below u64::MAX
    clippy::missing_errors_doc,
    clippy::module_name_repetitions,  // e.g. ShipperError in domain::error
    clippy::must_use_candidate,
    clippy::doc_markdown
)]

pub mod app;
pub mod client;
pub mod domain;
pub mod sender;

// Re-export main types for easy access
pub use app::Config;
pub use client::LogClient;
pub use domain::{LogEvent, ShipperError, TagSet};
pub use sender::{Completion, DispatchResponse, DispatchResult, DispatchStats};

// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
