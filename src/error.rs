//! Error types used by the cliwork supervisor, work units and CLI plugins.
//!
//! This module defines two error enums:
//!
//! - [`WorkError`]: errors returned by individual work units.
//! - [`CliError`]: errors raised while wiring plugins into a command.
//!
//! [`HookError`] is the boxed failure type returned by before-command hooks.
//!
//! Both enums provide helper methods (`as_label`, `as_message`) for logs.

use std::fmt::Display;

use thiserror::Error;

/// # Errors produced by work units.
///
/// Only genuine failures end up being surfaced by the
/// [`Supervisor`](crate::Supervisor); [`WorkError::Canceled`] is the
/// graceful way of saying "I stopped because I was asked to".
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum WorkError {
    /// Work failed before it was asked to wind down.
    #[error("work failed: {error}")]
    Fail {
        /// The underlying error message.
        error: String,
    },

    /// Work panicked; the payload message is kept when it was a string.
    #[error("work panicked: {info}")]
    Panicked {
        /// Panic payload message.
        info: String,
    },

    /// Work observed cancellation and wound down.
    #[error("context cancelled")]
    Canceled,
}

impl WorkError {
    /// Shorthand for [`WorkError::Fail`] from anything displayable.
    ///
    /// # Example
    /// ```
    /// use cliwork::WorkError;
    ///
    /// let err = WorkError::fail("foo!");
    /// assert_eq!(err.to_string(), "work failed: foo!");
    /// ```
    pub fn fail(error: impl Display) -> Self {
        WorkError::Fail {
            error: error.to_string(),
        }
    }

    /// Returns a short stable label (snake_case) for use in logs.
    pub fn as_label(&self) -> &'static str {
        match self {
            WorkError::Fail { .. } => "work_failed",
            WorkError::Panicked { .. } => "work_panicked",
            WorkError::Canceled => "work_canceled",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            WorkError::Fail { error } => format!("error: {error}"),
            WorkError::Panicked { info } => format!("panic: {info}"),
            WorkError::Canceled => "context cancelled".to_string(),
        }
    }

    /// `true` for outcomes that count as a graceful wind-down rather than a failure.
    pub fn is_graceful(&self) -> bool {
        matches!(self, WorkError::Canceled)
    }
}

impl From<std::io::Error> for WorkError {
    fn from(err: std::io::Error) -> Self {
        WorkError::fail(err)
    }
}

/// # Failure returned by a before-command hook.
///
/// Any error type converts into it, so hooks can use `?` freely; plain
/// messages convert with `.into()`.
pub type HookError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// # Errors raised while applying CLI plugins.
#[non_exhaustive]
#[derive(Error, Debug)]
pub enum CliError {
    /// A before-command hook failed; remaining hooks were skipped.
    #[error("plugin {plugin:?} failed before command: {source}")]
    Hook {
        /// Name of the failing plugin.
        plugin: String,
        /// The hook's error.
        #[source]
        source: HookError,
    },

    /// Placement hints of a plugin group form a cycle.
    #[error("plugin placements form a cycle between {plugins:?}")]
    PlacementCycle {
        /// Plugins that could not be ordered.
        plugins: Vec<String>,
    },

    /// Invalid placement hint.
    #[error("invalid placement {placement:?}")]
    Placement {
        /// The hint as given.
        placement: String,
    },

    /// The structured logger could not be installed.
    #[error("logging setup failed: {error}")]
    Logging {
        /// The underlying error message.
        error: String,
    },
}

impl CliError {
    /// Returns a short stable label (snake_case) for use in logs.
    ///
    /// # Example
    /// ```
    /// use cliwork::CliError;
    ///
    /// let err = CliError::PlacementCycle { plugins: vec!["a".into(), "b".into()] };
    /// assert_eq!(err.as_label(), "cli_placement_cycle");
    /// ```
    pub fn as_label(&self) -> &'static str {
        match self {
            CliError::Hook { .. } => "cli_hook_failed",
            CliError::PlacementCycle { .. } => "cli_placement_cycle",
            CliError::Placement { .. } => "cli_placement_invalid",
            CliError::Logging { .. } => "cli_logging_failed",
        }
    }

    /// Returns a human-readable message with details about the error.
    pub fn as_message(&self) -> String {
        match self {
            CliError::Hook { plugin, source } => format!("hook {plugin}: {source}"),
            CliError::PlacementCycle { plugins } => format!("placement cycle: {plugins:?}"),
            CliError::Placement { placement } => format!("bad placement: {placement}"),
            CliError::Logging { error } => format!("logging: {error}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn canceled_is_graceful() {
        assert!(WorkError::Canceled.is_graceful());
        assert!(!WorkError::fail("boom").is_graceful());
        assert!(
            !WorkError::Panicked {
                info: "boom".into()
            }
            .is_graceful()
        );
    }

    #[test]
    fn hook_error_keeps_message() {
        let err = CliError::Hook {
            plugin: "canary".into(),
            source: "fooerror".into(),
        };
        assert!(err.to_string().contains("fooerror"));
        assert_eq!(err.as_label(), "cli_hook_failed");
    }

    #[test]
    fn io_errors_become_failures() {
        let err: WorkError = std::io::Error::other("disk gone").into();
        assert_eq!(err.as_label(), "work_failed");
        assert!(err.as_message().contains("disk gone"));
    }
}
