//! # Runtime events emitted by the supervisor and its runs.
//!
//! The [`EventKind`] enum classifies event types across three categories:
//! - **Run events**: one supervision run starting and ending
//! - **Unit events**: a work unit stopping, failing, or having its failure ignored
//! - **Subscriber events**: delivery problems inside the [`SubscriberSet`](crate::SubscriberSet)
//!
//! The [`Event`] struct carries additional metadata such as timestamps,
//! the command display name, the unit name and error messages.
//!
//! ## Ordering guarantees
//! Each event has a globally unique sequence number (`seq`) that increases monotonically.
//! Use `seq` to restore the exact order when events are delivered out of order.
//!
//! ## Example
//! ```rust
//! use cliwork::{Event, EventKind};
//!
//! let ev = Event::new(EventKind::UnitFailed)
//!     .with_command("serve")
//!     .with_unit("http")
//!     .with_error("address in use");
//!
//! assert_eq!(ev.kind, EventKind::UnitFailed);
//! assert_eq!(ev.unit.as_deref(), Some("http"));
//! assert_eq!(ev.error.as_deref(), Some("address in use"));
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering as AtomicOrdering};
use std::time::SystemTime;

/// Global sequence counter for event ordering.
static EVENT_SEQ: AtomicU64 = AtomicU64::new(0);

/// Classification of runtime events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    // === Subscriber events ===
    /// Subscriber panicked during event processing.
    ///
    /// Sets:
    /// - `unit`: subscriber name
    /// - `error`: panic info/message
    SubscriberPanicked,

    /// Subscriber dropped an event (queue full or worker closed).
    ///
    /// Sets:
    /// - `unit`: subscriber name
    /// - `error`: reason string (e.g., "full", "closed")
    SubscriberOverflow,

    // === Run events ===
    /// A supervision run is about to launch its units.
    ///
    /// Sets:
    /// - `command`: command display name
    WorkStarting,

    /// Every unit of a supervision run has returned.
    ///
    /// Sets:
    /// - `command`: command display name
    /// - `error`: surfaced failure, if any
    WorkEnded,

    /// Process termination signal observed; the run is being cancelled.
    ///
    /// Sets:
    /// - `command`: command display name
    ShutdownRequested,

    // === Unit events ===
    /// Unit returned without failure (completed or wound down).
    ///
    /// Sets:
    /// - `command`, `unit`
    UnitStopped,

    /// Unit failure recorded as the run's outcome; cancellation follows.
    ///
    /// Sets:
    /// - `command`, `unit`
    /// - `error`: failure message
    UnitFailed,

    /// Unit failed after a failure was already recorded; the failure is dropped.
    ///
    /// Sets:
    /// - `command`, `unit`
    /// - `error`: dropped failure message
    FailureIgnored,
}

/// Runtime event with optional metadata.
///
/// - `seq`: monotonic global sequence for ordering
/// - `at`: wall-clock timestamp (for logs)
/// - other optional fields are set depending on the [`EventKind`]
#[derive(Clone, Debug)]
pub struct Event {
    /// Globally unique, monotonically increasing sequence number.
    pub seq: u64,
    /// Wall-clock timestamp.
    pub at: SystemTime,
    /// Event classification.
    pub kind: EventKind,
    /// Display name of the command the run belongs to.
    pub command: Option<Arc<str>>,
    /// Name of the work unit (or subscriber), if applicable.
    pub unit: Option<Arc<str>>,
    /// Human-readable error (failures, overflow details, etc.).
    pub error: Option<Arc<str>>,
}

impl Event {
    /// Creates a new event of the given kind with current timestamp and next sequence number.
    pub fn new(kind: EventKind) -> Self {
        Self {
            seq: EVENT_SEQ.fetch_add(1, AtomicOrdering::Relaxed),
            at: SystemTime::now(),
            kind,
            command: None,
            unit: None,
            error: None,
        }
    }

    /// Attaches the command display name.
    #[inline]
    pub fn with_command(mut self, command: impl Into<Arc<str>>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Attaches a unit name.
    #[inline]
    pub fn with_unit(mut self, unit: impl Into<Arc<str>>) -> Self {
        self.unit = Some(unit.into());
        self
    }

    /// Attaches an error message.
    #[inline]
    pub fn with_error(mut self, error: impl Into<Arc<str>>) -> Self {
        self.error = Some(error.into());
        self
    }

    /// Creates a subscriber overflow event.
    #[inline]
    pub fn subscriber_overflow(subscriber: &'static str, reason: &'static str) -> Self {
        Event::new(EventKind::SubscriberOverflow)
            .with_unit(subscriber)
            .with_error(format!("subscriber={subscriber} reason={reason}"))
    }

    /// Creates a subscriber panic event.
    #[inline]
    pub fn subscriber_panicked(subscriber: &'static str, info: String) -> Self {
        Event::new(EventKind::SubscriberPanicked)
            .with_unit(subscriber)
            .with_error(info)
    }

    /// `true` for overflow reports, which are never re-reported on overflow.
    #[inline]
    pub fn is_subscriber_overflow(&self) -> bool {
        matches!(self.kind, EventKind::SubscriberOverflow)
    }
}
