//! # Modular CLI wiring.
//!
//! [`Plugins`] collects three kinds of contributions from independent
//! modules and applies them to one command:
//!
//! ```text
//! setup:  PluginGroup<SetupCli>       add_flags(root)         in placement order
//! before: PluginGroup<BeforeCommand>  before_command(&mut ctx) in placement order,
//!                                                              stop at first error
//! work:   Vec<WorkRef>                do_all(sup, parent, ctx) concurrently, no order
//! ```
//!
//! ## Example
//! ```
//! use clap::{Arg, ArgAction, Command};
//! use cliwork::{CommandContext, Placement, Plugins};
//!
//! let mut plugins = Plugins::new();
//! plugins.register_setup("dry-run", Placement::None, |cmd: Command| {
//!     cmd.arg(Arg::new("dry-run").long("dry-run").action(ArgAction::SetTrue))
//! });
//! plugins.register_before("dry-run", Placement::None, |ctx: &mut CommandContext| {
//!     if ctx.flag("dry-run") {
//!         return Err("dry runs are not supported yet".into());
//!     }
//!     Ok(())
//! });
//!
//! let root = plugins.add_flags(Command::new("foo")).unwrap();
//! let matches = root.clone().get_matches_from(["foo", "--dry-run"]);
//! let mut ctx = CommandContext::from_command(&root, matches);
//! assert!(plugins.before_command(&mut ctx).is_err());
//! ```

use clap::Command;
use tokio_util::sync::CancellationToken;

use crate::command::{CommandContext, CommandRef};
use crate::core::Supervisor;
use crate::error::{CliError, HookError, WorkError};
use crate::plugin::{Placement, PluginGroup};
use crate::work::WorkRef;

/// Flag-setup callback: receives the root command and returns it with its
/// flags added.
pub type SetupCli = Box<dyn Fn(Command) -> Command + Send + Sync>;

/// Before-command callback: inspects parsed flags and adjusts the context.
pub type BeforeCommand = Box<dyn Fn(&mut CommandContext) -> Result<(), HookError> + Send + Sync>;

/// Explicit registry of flag-setup hooks, before-command hooks and work units.
#[derive(Default)]
pub struct Plugins {
    setup: PluginGroup<SetupCli>,
    before: PluginGroup<BeforeCommand>,
    work: Vec<WorkRef>,
}

impl Plugins {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry with the built-in `--debug`, `--tinted` and `--log`
    /// plugins.
    pub fn with_logging() -> Self {
        let mut plugins = Self::new();
        crate::logging::register(&mut plugins);
        plugins
    }

    /// Registers a flag-setup callback.
    pub fn register_setup<F>(
        &mut self,
        plugin: impl Into<String>,
        placement: Placement,
        f: F,
    ) -> &mut Self
    where
        F: Fn(Command) -> Command + Send + Sync + 'static,
    {
        self.setup.register(plugin, placement, Box::new(f));
        self
    }

    /// Registers a before-command callback.
    pub fn register_before<F>(
        &mut self,
        plugin: impl Into<String>,
        placement: Placement,
        f: F,
    ) -> &mut Self
    where
        F: Fn(&mut CommandContext) -> Result<(), HookError> + Send + Sync + 'static,
    {
        self.before.register(plugin, placement, Box::new(f));
        self
    }

    /// Registers a background work unit.
    pub fn register_work(&mut self, unit: WorkRef) -> &mut Self {
        self.work.push(unit);
        self
    }

    /// Registered work units.
    pub fn work(&self) -> &[WorkRef] {
        &self.work
    }

    /// Flag-setup group, for inspecting the resolved order.
    pub fn setup_group(&self) -> &PluginGroup<SetupCli> {
        &self.setup
    }

    /// Before-command group, for inspecting the resolved order.
    pub fn before_group(&self) -> &PluginGroup<BeforeCommand> {
        &self.before
    }

    /// Runs every flag-setup callback on `root`, in placement order.
    pub fn add_flags(&self, root: Command) -> Result<Command, CliError> {
        let mut cmd = root;
        for (plugin, setup) in self.setup.ordered()? {
            tracing::trace!(plugin, "adding flags");
            cmd = setup(cmd);
        }
        Ok(cmd)
    }

    /// Runs the before-command callbacks in placement order, stopping at the
    /// first failure.
    ///
    /// Call this after argument parsing and before the command's own logic.
    pub fn before_command(&self, ctx: &mut CommandContext) -> Result<(), CliError> {
        for (plugin, hook) in self.before.ordered()? {
            tracing::trace!(plugin, "before command");
            hook(ctx).map_err(|source| CliError::Hook {
                plugin: plugin.to_string(),
                source,
            })?;
        }
        Ok(())
    }

    /// Runs all registered work units with `sup`; see [`Supervisor::run_all`].
    pub async fn do_all(
        &self,
        sup: &Supervisor,
        parent: &CancellationToken,
        cmd: CommandRef,
    ) -> Result<(), WorkError> {
        sup.run_all(parent, self.work.clone(), cmd).await
    }
}
