//! Error aggregation by flag
//!
//! [`ErrorAggregator`] collects `(flag, message)` pairs from many sources and
//! groups them by exact bit pattern, keeping first-insertion order so reports
//! are stable. A running union of every group's flag answers "did anything of
//! category X happen" without scanning the groups.
//!
//! ```
//! use errflags::{ErrorAggregator, Flag};
//!
//! let user = Flag::leaf("UserError", 0);
//! let io = Flag::leaf("IOError", 2);
//!
//! let mut report = ErrorAggregator::new();
//! report.add(&user, "bad input");
//! report.add(&io, "cannot find resource");
//!
//! assert!(report.has_error_matching(&user));
//! let only_io = report.filtered_by(&io).unwrap();
//! assert_eq!(only_io.report(), "[IOError]\n\tcannot find resource");
//! ```

use crate::flag::Flag;
use crate::flagged::ErrorFlagged;
use std::borrow::Cow;
use std::fmt;

/// Separator between messages of one group, and between groups in
/// [`ErrorAggregator::all_messages`].
pub const MESSAGE_SEPARATOR: &str = "\n\t";

/// Separator between flag names in the aggregate flag name.
pub const NAME_SEPARATOR: &str = "/";

#[derive(Debug, Clone)]
struct Group {
    flag: Flag,
    /// Never empty once the group exists.
    messages: Vec<String>,
}

impl Group {
    fn message(&self) -> String {
        self.messages.join(MESSAGE_SEPARATOR)
    }
}

/// Failures grouped by flag, with the union of all flags seen.
#[derive(Debug, Clone, Default)]
pub struct ErrorAggregator {
    overall: Flag,
    groups: Vec<Group>,
}

impl ErrorAggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `message` under `flag`.
    ///
    /// Messages with the same bit pattern share one group. Only the first add
    /// of a pattern contributes its name to the aggregate name.
    ///
    /// `flag` must carry at least one bit. A zero flag would create a group
    /// that the overall flag does not cover, so [`error_object`] and
    /// [`filtered_by`] could not see it. Debug builds panic on it.
    ///
    /// [`error_object`]: ErrorAggregator::error_object
    /// [`filtered_by`]: ErrorAggregator::filtered_by
    pub fn add(&mut self, flag: &Flag, message: impl AsRef<str>) {
        debug_assert!(
            !flag.is_empty(),
            "error flag '{}' has no bits set",
            flag.name()
        );

        let index = match self.find(flag) {
            Some(index) => {
                self.overall = Flag::from_bits(
                    self.overall.name(),
                    self.overall.bits().union(flag.bits()),
                );
                index
            }
            None => {
                let mut name = self.overall.name().to_string();
                if !name.is_empty() {
                    name.push_str(NAME_SEPARATOR);
                }
                name.push_str(flag.name());
                self.overall = Flag::from_bits(name, self.overall.bits().union(flag.bits()));

                tracing::trace!(flag = flag.name(), "new error group");
                self.groups.push(Group {
                    flag: flag.clone(),
                    messages: Vec::new(),
                });
                self.groups.len() - 1
            }
        };

        let group = &mut self.groups[index];
        // An empty message is replaced rather than separated from the next.
        if group.messages.iter().all(String::is_empty) {
            group.messages.clear();
        }
        group.messages.push(message.as_ref().to_string());
    }

    /// Record a flagged error under its own flag.
    pub fn add_flagged(&mut self, err: &dyn ErrorFlagged) {
        self.add(err.flag(), err.message());
    }

    fn find(&self, flag: &Flag) -> Option<usize> {
        self.groups.iter().position(|g| g.flag == *flag)
    }

    /// Union of every flag added so far, named after the groups.
    pub fn overall_flag(&self) -> &Flag {
        &self.overall
    }

    pub fn has_error_matching(&self, mask: &Flag) -> bool {
        self.overall.intersects(mask)
    }

    /// `self` as a flagged error, or `None` while nothing has been added.
    pub fn error_object(&self) -> Option<&dyn ErrorFlagged> {
        if self.overall.is_empty() {
            None
        } else {
            Some(self)
        }
    }

    /// New aggregator holding only the groups whose flag intersects `mask`.
    pub fn filtered_by(&self, mask: &Flag) -> Option<ErrorAggregator> {
        if !self.has_error_matching(mask) {
            return None;
        }

        let mut filtered = ErrorAggregator::new();
        for group in self.groups.iter().filter(|g| g.flag.intersects(mask)) {
            for message in &group.messages {
                filtered.add(&group.flag, message);
            }
        }
        Some(filtered)
    }

    /// Every message, groups in insertion order, without flag names.
    pub fn all_messages(&self) -> String {
        self.join_messages(|_| true)
    }

    /// Messages of the groups matching `mask`.
    pub fn messages_matching(&self, mask: &Flag) -> String {
        self.join_messages(|g| g.flag.intersects(mask))
    }

    fn join_messages(&self, keep: impl Fn(&Group) -> bool) -> String {
        self.groups
            .iter()
            .filter(|g| keep(g))
            .flat_map(|g| g.messages.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(MESSAGE_SEPARATOR)
    }

    /// One `[Flag]` header per group followed by its indented messages,
    /// groups separated by a blank line.
    pub fn report(&self) -> String {
        self.groups
            .iter()
            .map(|g| format!("[{}]{}{}", g.flag.name(), MESSAGE_SEPARATOR, g.message()))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Groups in insertion order as `(flag, messages)`, one entry per add.
    pub fn groups(&self) -> impl Iterator<Item = (&Flag, &[String])> {
        self.groups.iter().map(|g| (&g.flag, g.messages.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }
}

impl fmt::Display for ErrorAggregator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.report())
    }
}

impl std::error::Error for ErrorAggregator {}

impl ErrorFlagged for ErrorAggregator {
    fn flag(&self) -> &Flag {
        &self.overall
    }

    fn message(&self) -> Cow<'_, str> {
        Cow::Owned(self.all_messages())
    }

    fn filtered(&self, mask: &Flag) -> Option<Box<dyn ErrorFlagged>> {
        self.filtered_by(mask)
            .map(|agg| Box::new(agg) as Box<dyn ErrorFlagged>)
    }
}
