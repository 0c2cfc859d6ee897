//! Structured logging handle
//!
//! [`Logger`] is created once at startup and passed to whatever needs to log.
//! Each call takes a list of [`LogArg`]s; the last flagged error among them
//! contributes its flag name as the `flag` field, and every event records the
//! caller's `file:line` as `loc`.

use super::telemetry::{build_dispatch, sanitize_for_log};
use crate::aggregator::ErrorAggregator;
use crate::config::LogSettings;
use crate::errors::LogSetupError;
use crate::flag::{Counter, Flag};
use crate::flagged::{ErrorFlagged, FlaggedError};
use parking_lot::Mutex;
use std::fmt;
use std::panic::Location;
use std::path::Path;
use std::sync::Arc;
use tracing::{Dispatch, Level};

/// One argument of a log call.
#[derive(Clone, Copy)]
pub enum LogArg<'a> {
    Text(&'a str),
    Display(&'a dyn fmt::Display),
    Flagged(&'a dyn ErrorFlagged),
}

impl<'a> LogArg<'a> {
    pub fn display(value: &'a dyn fmt::Display) -> Self {
        LogArg::Display(value)
    }

    fn flag_name(&self) -> Option<&'a str> {
        match *self {
            LogArg::Flagged(err) => Some(err.flag_name()),
            _ => None,
        }
    }
}

impl fmt::Display for LogArg<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogArg::Text(s) => f.write_str(s),
            LogArg::Display(d) => write!(f, "{}", d),
            LogArg::Flagged(e) => write!(f, "{}", e),
        }
    }
}

impl<'a> From<&'a str> for LogArg<'a> {
    fn from(s: &'a str) -> Self {
        LogArg::Text(s)
    }
}

impl<'a> From<&'a String> for LogArg<'a> {
    fn from(s: &'a String) -> Self {
        LogArg::Text(s)
    }
}

impl<'a> From<&'a FlaggedError> for LogArg<'a> {
    fn from(e: &'a FlaggedError) -> Self {
        LogArg::Flagged(e)
    }
}

impl<'a> From<&'a ErrorAggregator> for LogArg<'a> {
    fn from(e: &'a ErrorAggregator) -> Self {
        LogArg::Flagged(e)
    }
}

impl<'a> From<&'a dyn ErrorFlagged> for LogArg<'a> {
    fn from(e: &'a dyn ErrorFlagged) -> Self {
        LogArg::Flagged(e)
    }
}

macro_rules! emit {
    ($level:expr, $($rest:tt)*) => {
        match $level {
            Level::ERROR => tracing::error!($($rest)*),
            Level::WARN => tracing::warn!($($rest)*),
            Level::INFO => tracing::info!($($rest)*),
            Level::DEBUG => tracing::debug!($($rest)*),
            _ => tracing::trace!($($rest)*),
        }
    };
}

/// Logging handle with bound fields and an error-flag allocator.
///
/// Handles derived through [`Logger::with_field`] share the allocator, so
/// flags created from any of them never collide.
#[derive(Debug, Clone)]
pub struct Logger {
    dispatch: Dispatch,
    fields: Vec<(String, String)>,
    counter: Arc<Mutex<Counter>>,
}

impl Logger {
    pub fn new(settings: &LogSettings) -> Result<Self, LogSetupError> {
        Ok(Self::from_dispatch(build_dispatch(settings)?))
    }

    pub fn from_dispatch(dispatch: Dispatch) -> Self {
        Self {
            dispatch,
            fields: Vec::new(),
            counter: Arc::new(Mutex::new(Counter::new())),
        }
    }

    /// Logger that drops every event.
    pub fn disabled() -> Self {
        Self::from_dispatch(Dispatch::none())
    }

    /// Allocate a fresh leaf flag.
    pub fn new_error_flag(&self, name: impl Into<String>) -> Flag {
        self.counter.lock().allocate(name)
    }

    /// Wildcard flag covering every flag allocated from this logger so far.
    pub fn any_error_flag(&self, name: impl Into<String>) -> Flag {
        self.counter.lock().allocated(name)
    }

    pub fn with_field(&self, key: impl Into<String>, value: impl fmt::Display) -> Logger {
        self.with_fields([(key, value)])
    }

    pub fn with_fields<I, K, V>(&self, fields: I) -> Logger
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: fmt::Display,
    {
        let mut bound = self.fields.clone();
        bound.extend(
            fields
                .into_iter()
                .map(|(k, v)| (k.into(), sanitize_for_log(&v.to_string()))),
        );
        Logger {
            dispatch: self.dispatch.clone(),
            fields: bound,
            counter: Arc::clone(&self.counter),
        }
    }

    /// Run `f` with this logger's dispatcher as the default, so events from
    /// library code inside `f` reach the same output.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }

    #[track_caller]
    pub fn log(&self, level: Level, args: &[LogArg<'_>]) {
        let caller = Location::caller();
        let file = Path::new(caller.file())
            .file_name()
            .map(|f| f.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<???>".to_string());
        let loc = format!("{}:{}", file, caller.line());

        let message = args
            .iter()
            .map(|a| a.to_string())
            .collect::<Vec<_>>()
            .join(" ");
        let flag = args
            .iter()
            .rev()
            .find_map(LogArg::flag_name)
            .map(sanitize_for_log);
        let fields = (!self.fields.is_empty()).then(|| {
            self.fields
                .iter()
                .map(|(k, v)| format!("{}={}", k, v))
                .collect::<Vec<_>>()
                .join(" ")
        });

        self.in_scope(|| {
            emit!(
                level,
                loc = %loc,
                flag = flag.as_deref().map(tracing::field::display),
                fields = fields.as_deref().map(tracing::field::display),
                "{}",
                message
            )
        });
    }

    #[track_caller]
    pub fn error(&self, args: &[LogArg<'_>]) {
        self.log(Level::ERROR, args);
    }

    #[track_caller]
    pub fn warn(&self, args: &[LogArg<'_>]) {
        self.log(Level::WARN, args);
    }

    #[track_caller]
    pub fn info(&self, args: &[LogArg<'_>]) {
        self.log(Level::INFO, args);
    }

    #[track_caller]
    pub fn debug(&self, args: &[LogArg<'_>]) {
        self.log(Level::DEBUG, args);
    }

    #[track_caller]
    pub fn trace(&self, args: &[LogArg<'_>]) {
        self.log(Level::TRACE, args);
    }

    /// Log a single flagged error at `level`.
    #[track_caller]
    pub fn flagged(&self, level: Level, err: &dyn ErrorFlagged) {
        self.log(level, &[LogArg::Flagged(err)]);
    }
}
