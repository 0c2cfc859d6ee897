//! Observability
//!
//! - `telemetry`: subscriber construction from log settings
//! - `logger`: the logging handle that tags flagged errors

pub mod logger;
pub mod telemetry;

pub use logger::{LogArg, Logger};
