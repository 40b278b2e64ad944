//! # Command handle passed to hooks and work units.
//!
//! [`CommandContext`] bundles what the selected command is about to run
//! with: its display name, the parsed [`ArgMatches`] and the
//! [`LogSettings`] that before-command hooks negotiate. Work units receive it
//! read-only as a [`CommandRef`].

use std::sync::Arc;

use clap::{ArgMatches, Command};

use crate::logging::LogSettings;

/// Shared, read-only handle to the command context.
pub type CommandRef = Arc<CommandContext>;

/// The command a run belongs to.
#[derive(Debug)]
pub struct CommandContext {
    name: String,
    matches: ArgMatches,
    log: LogSettings,
}

impl CommandContext {
    /// Creates a context with an explicit display name.
    pub fn new(name: impl Into<String>, matches: ArgMatches) -> Self {
        Self {
            name: name.into(),
            matches,
            log: LogSettings::default(),
        }
    }

    /// Creates a context for `cmd`, using its display name if set and its
    /// name otherwise.
    ///
    /// # Example
    /// ```
    /// use clap::Command;
    /// use cliwork::CommandContext;
    ///
    /// let cmd = Command::new("foo").display_name("foo-cli");
    /// let matches = cmd.clone().get_matches_from(["foo"]);
    /// let ctx = CommandContext::from_command(&cmd, matches);
    /// assert_eq!(ctx.display_name(), "foo-cli");
    /// ```
    pub fn from_command(cmd: &Command, matches: ArgMatches) -> Self {
        let name = cmd.get_display_name().unwrap_or_else(|| cmd.get_name());
        Self::new(name, matches)
    }

    /// Display name used in log lines and events.
    pub fn display_name(&self) -> &str {
        &self.name
    }

    /// Parsed arguments of the command.
    pub fn matches(&self) -> &ArgMatches {
        &self.matches
    }

    /// Value of a boolean flag; `false` if the flag is unset or unknown.
    pub fn flag(&self, id: &str) -> bool {
        self.matches
            .try_get_one::<bool>(id)
            .ok()
            .flatten()
            .copied()
            .unwrap_or(false)
    }

    /// Logging settings negotiated by before-command hooks.
    pub fn log_settings(&self) -> &LogSettings {
        &self.log
    }

    /// Mutable access for hooks adjusting the log level or writer.
    pub fn log_settings_mut(&mut self) -> &mut LogSettings {
        &mut self.log
    }

    /// Freezes the context into a shareable handle for work units.
    pub fn into_ref(self) -> CommandRef {
        Arc::new(self)
    }
}
