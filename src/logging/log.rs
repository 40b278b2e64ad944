//! `--log` flag: quiet by default, informational logging on request.
//!
//! Flag setup runs after [`debug`](super::debug) so that `--log` can conflict
//! with `--debug`; the before-command hook runs ahead of it so the forced
//! level is in place when the logger gets installed.

use clap::{Arg, ArgAction, Command};
use tracing::Level;

use crate::cli::Plugins;
use crate::command::CommandContext;
use crate::error::HookError;
use crate::logging::debug;
use crate::plugin::Placement;

/// Plugin name used for placement hints.
pub const PLUGIN: &str = "cliwork/log";
/// Enables informational logging output.
pub const LOG_FLAG: &str = "log";

/// Registers `--log`, placed around the [`debug`] plugin.
///
/// `--log` conflicts with `--debug`, which clap requires to exist: register
/// the debug plugin as well, or use [`crate::logging::register`].
pub fn register(plugins: &mut Plugins) {
    plugins
        .register_setup(PLUGIN, Placement::After(debug::PLUGIN.into()), setup_cli)
        .register_before(PLUGIN, Placement::Before(debug::PLUGIN.into()), before_command);
}

fn setup_cli(cmd: Command) -> Command {
    cmd.arg(
        Arg::new(LOG_FLAG)
            .long(LOG_FLAG)
            .global(true)
            .action(ArgAction::SetTrue)
            .conflicts_with(debug::DEBUG_FLAG)
            .help("enables logging output"),
    )
}

fn before_command(ctx: &mut CommandContext) -> Result<(), HookError> {
    let log = ctx.flag(LOG_FLAG);
    let settings = ctx.log_settings_mut();
    settings.default_level.get_or_insert(Level::ERROR);
    if log {
        settings.forced_level = Some(Level::INFO);
    }
    Ok(())
}
