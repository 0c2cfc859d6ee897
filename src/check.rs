//! Config file checking
//!
//! Reads TOML files, classifies every problem under an error flag and
//! collects the results in an [`ErrorAggregator`].

use crate::aggregator::ErrorAggregator;
use crate::config::missing_fields;
use crate::flag::Flag;
use crate::flagged::FlaggedError;
use crate::observability::Logger;
use anyhow::{bail, Result};
use serde::Serialize;
use std::path::Path;

/// Error categories reported by [`check_files`].
#[derive(Debug, Clone)]
pub struct Categories {
    pub io: Flag,
    pub parsing: Flag,
    pub missing: Flag,
    /// Parsing or missing keys: anything wrong with the file contents
    pub input: Flag,
}

impl Categories {
    /// Category names accepted by [`Categories::lookup`].
    pub const NAMES: [&'static str; 4] = ["io", "parsing", "missing", "input"];

    pub fn allocate(logger: &Logger) -> Self {
        let io = logger.new_error_flag("IOError");
        let parsing = logger.new_error_flag("ParsingError");
        let missing = logger.new_error_flag("MissingField");
        let input = Flag::join("InputError", [&parsing, &missing]);
        Self {
            io,
            parsing,
            missing,
            input,
        }
    }

    pub fn all(&self) -> [(&'static str, &Flag); 4] {
        [
            ("io", &self.io),
            ("parsing", &self.parsing),
            ("missing", &self.missing),
            ("input", &self.input),
        ]
    }

    pub fn lookup(&self, name: &str) -> Option<&Flag> {
        self.all()
            .into_iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map(|(_, flag)| flag)
    }

    /// Union of the named categories.
    pub fn mask<S: AsRef<str>>(&self, names: &[S]) -> Result<Flag> {
        let mut flags = Vec::with_capacity(names.len());
        for name in names {
            match self.lookup(name.as_ref()) {
                Some(flag) => flags.push(flag),
                None => bail!(
                    "unknown category '{}' (expected one of: {})",
                    name.as_ref(),
                    Self::NAMES.join(", ")
                ),
            }
        }
        Ok(Flag::concat(flags))
    }
}

/// Check each file: it must be readable, parse as TOML and contain every
/// key in `required`.
pub fn check_files<P: AsRef<Path>>(
    files: &[P],
    required: &[&str],
    categories: &Categories,
    logger: &Logger,
) -> ErrorAggregator {
    let mut report = ErrorAggregator::new();
    for path in files {
        let path = path.as_ref();
        let log = logger.with_field("file", path.display());
        let problems = check_file(path, required, categories);
        if problems.is_empty() {
            log.debug(&["config ok".into()]);
        }
        for err in &problems {
            log.warn(&["config check failed:".into(), err.into()]);
            report.add_flagged(err);
        }
    }
    report
}

fn check_file(path: &Path, required: &[&str], categories: &Categories) -> Vec<FlaggedError> {
    let content = match std::fs::read_to_string(path) {
        Ok(content) => content,
        Err(e) => {
            return vec![FlaggedError::new(
                &categories.io,
                format!("{}: {}", path.display(), e),
            )]
        }
    };

    let table: toml::Table = match toml::from_str(&content) {
        Ok(table) => table,
        Err(e) => {
            let rendered = e.to_string();
            let summary = rendered.lines().next().unwrap_or_default();
            return vec![FlaggedError::new(
                &categories.parsing,
                format!("{}: {}", path.display(), summary),
            )];
        }
    };

    missing_fields(&table, required)
        .into_iter()
        .map(|key| {
            FlaggedError::new(
                &categories.missing,
                format!("{}: missing required key '{}'", path.display(), key),
            )
        })
        .collect()
}

/// Restrict `report` to groups intersecting `mask`, or keep it whole when
/// no mask is given. `None` when nothing is left to report.
pub fn select(report: &ErrorAggregator, mask: Option<&Flag>) -> Option<ErrorAggregator> {
    match mask {
        Some(mask) => report.filtered_by(mask),
        None => report.error_object().map(|_| report.clone()),
    }
}

/// JSON shape of a report.
#[derive(Debug, Serialize)]
pub struct ReportView<'a> {
    pub flag: &'a str,
    pub groups: Vec<GroupView<'a>>,
}

#[derive(Debug, Serialize)]
pub struct GroupView<'a> {
    pub flag: &'a str,
    pub bits: Vec<usize>,
    pub messages: Vec<&'a str>,
}

impl<'a> ReportView<'a> {
    pub fn new(report: &'a ErrorAggregator) -> Self {
        Self {
            flag: report.overall_flag().name(),
            groups: report
                .groups()
                .map(|(flag, messages)| GroupView {
                    flag: flag.name(),
                    bits: flag.bits().ones().collect(),
                    messages: messages.iter().map(String::as_str).collect(),
                })
                .collect(),
        }
    }
}
