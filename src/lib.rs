//! errflags - bit-flag error classification and aggregation
//!
//! Error categories are named bit patterns. Leaf categories get one bit each
//! from a [`Counter`]; composite categories are unions of leaves, so an error
//! can be asked "are you any kind of user error?" with a single intersection.
//!
//! - **Flags**: [`Flag`], [`Counter`], [`intersect`]
//! - **Errors**: [`FlaggedError`] and the [`ErrorFlagged`] capability
//! - **Aggregation**: [`ErrorAggregator`] groups messages by flag for reporting
//! - **Logging**: [`Logger`] tags events with the flag of the error logged
//! - **Config**: TOML decoding with defaults and required keys
//!
//! # Quick Start
//!
//! ```
//! use errflags::{ErrorAggregator, Flag, Logger};
//!
//! let logger = Logger::disabled();
//! let bad_input = logger.new_error_flag("BadInput");
//! let not_authorized = logger.new_error_flag("NotAuthorized");
//! let io = logger.new_error_flag("IOError");
//! let user_error = Flag::join("UserError", [&bad_input, &not_authorized]);
//!
//! let mut report = ErrorAggregator::new();
//! report.add(&user_error, "your input is wrong");
//! report.add(&io, "cannot find resource");
//!
//! assert!(report.has_error_matching(&not_authorized));
//! assert_eq!(report.overall_flag().name(), "UserError/IOError");
//! assert_eq!(
//!     report.report(),
//!     "[UserError]\n\tyour input is wrong\n\n[IOError]\n\tcannot find resource"
//! );
//! ```

// ─── Core ──────────────────────────────────────────────────────────
pub mod aggregator;
pub mod bitset;
pub mod flag;
pub mod flagged;

// ─── Application ───────────────────────────────────────────────────
pub mod check;
pub mod cli;
pub mod config;
pub mod errors;
pub mod observability;

pub use aggregator::ErrorAggregator;
pub use bitset::Bitset;
pub use flag::{intersect, Counter, Flag};
pub use flagged::{err_is, flag_of, ErrorFlagged, FlaggedError};
pub use observability::{LogArg, Logger};
