//! Subscriber construction
//!
//! Builds `tracing` dispatchers from [`LogSettings`]. Nothing here installs a
//! global subscriber: the dispatcher is owned by a
//! [`Logger`](super::logger::Logger) handle and entered explicitly.

use crate::config::{LogFormat, LogOutput, LogSettings};
use crate::errors::LogSetupError;
use parking_lot::Mutex;
use std::fs::File;
use std::io;
use std::sync::Arc;
use tracing::level_filters::LevelFilter;
use tracing::Dispatch;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriter};

/// Dispatcher for `settings`: output, level, colors and format.
pub fn build_dispatch(settings: &LogSettings) -> Result<Dispatch, LogSetupError> {
    let level = settings.level_filter()?;
    let writer = make_writer(&settings.output_target())?;
    Ok(dispatch_with_writer(
        writer,
        level,
        settings.colors,
        settings.format,
    ))
}

/// Writer for a log destination. Files are created or truncated.
pub fn make_writer(output: &LogOutput) -> Result<BoxMakeWriter, LogSetupError> {
    let writer = match output {
        LogOutput::Stdout => BoxMakeWriter::new(io::stdout),
        LogOutput::Stderr => BoxMakeWriter::new(io::stderr),
        LogOutput::File(path) => {
            let file = File::create(path).map_err(|source| LogSetupError::OpenOutput {
                path: path.clone(),
                source,
            })?;
            BoxMakeWriter::new(std::sync::Mutex::new(file))
        }
    };
    Ok(writer)
}

pub fn dispatch_with_writer<W>(
    writer: W,
    level: LevelFilter,
    colors: bool,
    format: LogFormat,
) -> Dispatch
where
    W: for<'w> MakeWriter<'w> + Send + Sync + 'static,
{
    let builder = tracing_subscriber::fmt()
        .with_writer(writer)
        .with_max_level(level)
        .with_ansi(colors)
        .with_target(false)
        .with_level(true);

    match format {
        LogFormat::Text => Dispatch::new(builder.compact().finish()),
        LogFormat::Json => Dispatch::new(builder.json().finish()),
    }
}

/// Escape control characters so a field value stays on one log line.
pub fn sanitize_for_log(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c if c.is_control() => out.push_str(&format!("\\u{:04x}", c as u32)),
            _ => out.push(c),
        }
    }
    out
}

/// In-memory log sink, cloneable and shareable between dispatchers.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.inner.lock()).into_owned()
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.inner.lock().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for SharedBuffer {
    type Writer = SharedBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
