//! # LogWriter: forwards events to `tracing`
//!
//! A minimal subscriber that writes incoming [`Event`]s as structured
//! `tracing` records under the `cliwork::events` target.
//!
//! ## Example output (fmt layer)
//! ```text
//! INFO cliwork::events: command="serve" work starting
//! DEBUG cliwork::events: command="serve" unit="http" unit stopped
//! ERROR cliwork::events: command="serve" unit="db" error="refused" unit failed
//! WARN cliwork::events: command="serve" unit="db" error="late" failure ignored
//! ```

use async_trait::async_trait;

use crate::events::{Event, EventKind};
use crate::subscribers::Subscribe;

/// Event writer subscriber.
#[derive(Default)]
pub struct LogWriter;

impl LogWriter {
    /// Construct a new [`LogWriter`].
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Subscribe for LogWriter {
    async fn on_event(&self, e: &Event) {
        let command = e.command.as_deref().unwrap_or_default();
        let unit = e.unit.as_deref().unwrap_or_default();
        let error = e.error.as_deref().unwrap_or_default();
        match e.kind {
            EventKind::WorkStarting => {
                tracing::info!(target: "cliwork::events", seq = e.seq, command, "work starting");
            }
            EventKind::WorkEnded => {
                tracing::info!(target: "cliwork::events", seq = e.seq, command, error, "work ended");
            }
            EventKind::ShutdownRequested => {
                tracing::info!(target: "cliwork::events", seq = e.seq, command, "shutdown requested");
            }
            EventKind::UnitStopped => {
                tracing::debug!(target: "cliwork::events", seq = e.seq, command, unit, "unit stopped");
            }
            EventKind::UnitFailed => {
                tracing::error!(target: "cliwork::events", seq = e.seq, command, unit, error, "unit failed");
            }
            EventKind::FailureIgnored => {
                tracing::warn!(target: "cliwork::events", seq = e.seq, command, unit, error, "failure ignored");
            }
            EventKind::SubscriberOverflow => {
                tracing::warn!(target: "cliwork::events", subscriber = unit, reason = error, "subscriber overflow");
            }
            EventKind::SubscriberPanicked => {
                tracing::warn!(target: "cliwork::events", subscriber = unit, info = error, "subscriber panicked");
            }
        }
    }

    fn name(&self) -> &'static str {
        "LogWriter"
    }
}
