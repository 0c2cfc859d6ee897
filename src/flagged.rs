//! The flagged-error capability
//!
//! Anything that can be reported into an [`ErrorAggregator`] or tagged by the
//! [`Logger`](crate::observability::logger::Logger) implements
//! [`ErrorFlagged`]. [`FlaggedError`] is the single-message implementation;
//! the aggregator implements it too, so filtering composes.

use crate::aggregator::ErrorAggregator;
use crate::flag::Flag;
use std::borrow::Cow;
use std::error::Error as StdError;
use std::fmt;

/// An error tagged with a [`Flag`].
pub trait ErrorFlagged: StdError {
    fn flag(&self) -> &Flag;

    fn flag_name(&self) -> &str {
        self.flag().name()
    }

    /// Human-readable message, without the flag name.
    fn message(&self) -> Cow<'_, str>;

    /// The part of `self` matching `mask`, or `None` when nothing matches.
    fn filtered(&self, mask: &Flag) -> Option<Box<dyn ErrorFlagged>>;
}

/// One failure and its category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlaggedError {
    pub flag: Flag,
    pub message: String,
}

impl FlaggedError {
    pub fn new(flag: &Flag, message: impl Into<String>) -> Self {
        Self {
            flag: flag.clone(),
            message: message.into(),
        }
    }

    pub fn is(&self, mask: &Flag) -> bool {
        self.flag.intersects(mask)
    }
}

impl fmt::Display for FlaggedError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl StdError for FlaggedError {}

impl ErrorFlagged for FlaggedError {
    fn flag(&self) -> &Flag {
        &self.flag
    }

    fn message(&self) -> Cow<'_, str> {
        Cow::Borrowed(&self.message)
    }

    fn filtered(&self, mask: &Flag) -> Option<Box<dyn ErrorFlagged>> {
        if self.is(mask) {
            Some(Box::new(self.clone()))
        } else {
            None
        }
    }
}

/// Flag of the first flagged error in `err`'s source chain.
pub fn flag_of<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Flag> {
    let mut current = Some(err);
    while let Some(e) = current {
        if let Some(flagged) = e.downcast_ref::<FlaggedError>() {
            return Some(&flagged.flag);
        }
        if let Some(aggregate) = e.downcast_ref::<ErrorAggregator>() {
            return Some(aggregate.overall_flag());
        }
        current = e.source();
    }
    None
}

/// True when `err` (or something in its source chain) is a flagged error
/// whose flag intersects `mask`.
///
/// Works with `anyhow::Error` through `err_is(e.as_ref(), &mask)`.
pub fn err_is(err: &(dyn StdError + 'static), mask: &Flag) -> bool {
    flag_of(err).is_some_and(|flag| flag.intersects(mask))
}
