//! # Structured logging plugins.
//!
//! Two built-in plugins pick the `tracing` level from CLI flags and install
//! the process-wide `fmt` subscriber:
//!
//! - [`debug`]: `--debug` and `--tinted`; installs the subscriber.
//! - [`log`]: `--log`; lowers the default to `ERROR` unless `--log` is given.
//!
//! ## Level precedence
//! ```text
//! --debug                          → DEBUG
//! else forced level (e.g. --log)   → forced
//! else default level (log plugin)  → default
//! else                             → INFO
//! ```

pub mod debug;
pub mod log;

use std::fmt;
use std::io;
use std::sync::{Arc, Mutex, PoisonError};

use tracing::Level;
use tracing_subscriber::fmt::MakeWriter;
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::cli::Plugins;
use crate::error::CliError;

/// Level and destination negotiated by before-command hooks.
#[derive(Default)]
pub struct LogSettings {
    /// Level used when nothing forces one.
    pub default_level: Option<Level>,
    /// Level forced by a flag such as `--log`.
    pub forced_level: Option<Level>,
    /// Destination of log lines; stderr when unset.
    pub writer: Option<BoxMakeWriter>,
    effective: Option<Level>,
}

impl LogSettings {
    /// Applies the precedence rules; `debug` is the state of `--debug`.
    pub fn resolve(&self, debug: bool) -> Level {
        if debug {
            return Level::DEBUG;
        }
        self.forced_level
            .or(self.default_level)
            .unwrap_or(Level::INFO)
    }

    /// Level picked by the debug plugin, once it has run.
    pub fn effective_level(&self) -> Option<Level> {
        self.effective
    }

    pub(crate) fn set_effective(&mut self, level: Level) {
        self.effective = Some(level);
    }
}

impl fmt::Debug for LogSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LogSettings")
            .field("default_level", &self.default_level)
            .field("forced_level", &self.forced_level)
            .field("writer", &self.writer.as_ref().map(|_| ".."))
            .field("effective", &self.effective)
            .finish()
    }
}

/// Builds the `fmt` subscriber used by [`install`].
pub fn subscriber(
    level: Level,
    tinted: bool,
    writer: BoxMakeWriter,
) -> impl tracing::Subscriber + Send + Sync + 'static {
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_ansi(tinted)
        .with_target(true)
        .with_writer(writer)
        .finish()
}

/// Installs the process-wide subscriber.
///
/// Returns `Ok(false)` if a global subscriber was already installed, which
/// is left in place.
pub fn install(level: Level, tinted: bool, writer: BoxMakeWriter) -> Result<bool, CliError> {
    match tracing::subscriber::set_global_default(subscriber(level, tinted, writer)) {
        Ok(()) => Ok(true),
        Err(err) if tracing::dispatcher::has_been_set() => {
            tracing::debug!(error = %err, "global subscriber already installed; keeping it");
            Ok(false)
        }
        Err(err) => Err(CliError::Logging {
            error: err.to_string(),
        }),
    }
}

/// Registers the built-in logging plugins.
pub fn register(plugins: &mut Plugins) {
    debug::register(plugins);
    log::register(plugins);
}

/// In-memory log sink, handy for capturing output in tests and tools.
#[derive(Clone, Default)]
pub struct SharedBuffer(Arc<Mutex<Vec<u8>>>);

impl SharedBuffer {
    /// Creates an empty buffer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Captured output, lossily decoded.
    pub fn contents(&self) -> String {
        let buf = self.0.lock().unwrap_or_else(PoisonError::into_inner);
        String::from_utf8_lossy(&buf).into_owned()
    }

    /// Discards everything captured so far.
    pub fn clear(&self) {
        self.0.lock().unwrap_or_else(PoisonError::into_inner).clear();
    }

    /// Boxes a clone of this buffer as a writer for [`LogSettings::writer`].
    pub fn make_writer_boxed(&self) -> BoxMakeWriter {
        BoxMakeWriter::new(self.clone())
    }
}

impl io::Write for SharedBuffer {
    fn write(&mut self, data: &[u8]) -> io::Result<usize> {
        self.0
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .extend_from_slice(data);
        Ok(data.len())
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
