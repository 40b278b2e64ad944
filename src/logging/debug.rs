//! `--debug` and `--tinted` flags; installs the structured logger.

use clap::{Arg, ArgAction, Command};
use tracing_subscriber::fmt::writer::BoxMakeWriter;

use crate::cli::Plugins;
use crate::command::CommandContext;
use crate::error::HookError;
use crate::plugin::Placement;

/// Plugin name used for placement hints.
pub const PLUGIN: &str = "cliwork/debug";
/// Enables debug level logging.
pub const DEBUG_FLAG: &str = "debug";
/// Enables ANSI colouring of log lines.
pub const TINTED_FLAG: &str = "tinted";

/// Registers `--debug`/`--tinted` and the logger-installing hook on `plugins`.
pub fn register(plugins: &mut Plugins) {
    plugins
        .register_setup(PLUGIN, Placement::None, setup_cli)
        .register_before(PLUGIN, Placement::None, before_command);
}

fn setup_cli(cmd: Command) -> Command {
    cmd.arg(
        Arg::new(DEBUG_FLAG)
            .long(DEBUG_FLAG)
            .global(true)
            .action(ArgAction::SetTrue)
            .help("enables debug structured logging output"),
    )
    .arg(
        Arg::new(TINTED_FLAG)
            .long(TINTED_FLAG)
            .global(true)
            .action(ArgAction::SetTrue)
            .help("tints structured logging output"),
    )
}

fn before_command(ctx: &mut CommandContext) -> Result<(), HookError> {
    let debug = ctx.flag(DEBUG_FLAG);
    let tinted = ctx.flag(TINTED_FLAG);

    let settings = ctx.log_settings_mut();
    let level = settings.resolve(debug);
    settings.set_effective(level);
    let writer = settings
        .writer
        .take()
        .unwrap_or_else(|| BoxMakeWriter::new(std::io::stderr));

    super::install(level, tinted, writer)?;
    tracing::debug!("debug logging enabled");
    Ok(())
}
