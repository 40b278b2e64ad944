use clap::Command;
use clap::error::ErrorKind;
use cliwork::logging::{self, SharedBuffer};
use cliwork::{CommandContext, Plugins};
use tracing::Level;

fn run_hooks(args: &[&str]) -> CommandContext {
    let plugins = Plugins::with_logging();
    let root = plugins.add_flags(Command::new("foo")).unwrap();
    let matches = root.clone().try_get_matches_from(args).unwrap();
    let mut ctx = CommandContext::from_command(&root, matches);
    // Keep output off stderr if this test happens to install the global logger.
    ctx.log_settings_mut().writer = Some(SharedBuffer::new().make_writer_boxed());
    plugins.before_command(&mut ctx).unwrap();
    ctx
}

#[test]
fn quiet_by_default() {
    let ctx = run_hooks(&["foo"]);
    assert_eq!(ctx.log_settings().effective_level(), Some(Level::ERROR));
}

#[test]
fn log_flag_forces_info() {
    let ctx = run_hooks(&["foo", "--log"]);
    assert_eq!(ctx.log_settings().effective_level(), Some(Level::INFO));
}

#[test]
fn debug_flag_wins() {
    let ctx = run_hooks(&["foo", "--debug", "--tinted"]);
    assert_eq!(ctx.log_settings().effective_level(), Some(Level::DEBUG));
}

#[test]
fn debug_alone_defaults_to_info() {
    let mut plugins = Plugins::new();
    logging::debug::register(&mut plugins);
    let root = plugins.add_flags(Command::new("foo")).unwrap();
    let matches = root.clone().get_matches_from(["foo"]);
    let mut ctx = CommandContext::from_command(&root, matches);
    ctx.log_settings_mut().writer = Some(SharedBuffer::new().make_writer_boxed());
    plugins.before_command(&mut ctx).unwrap();
    assert_eq!(ctx.log_settings().effective_level(), Some(Level::INFO));
}

#[test]
fn log_and_debug_conflict() {
    let plugins = Plugins::with_logging();
    let root = plugins.add_flags(Command::new("foo")).unwrap();
    let err = root
        .try_get_matches_from(["foo", "--log", "--debug"])
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ArgumentConflict);
}

#[test]
fn log_hook_runs_before_debug_hook() {
    let plugins = Plugins::with_logging();
    assert_eq!(
        plugins.before_group().plugins().unwrap(),
        vec![logging::log::PLUGIN, logging::debug::PLUGIN]
    );
    assert_eq!(
        plugins.setup_group().plugins().unwrap(),
        vec![logging::debug::PLUGIN, logging::log::PLUGIN]
    );
}

#[test]
fn flags_are_global() {
    let plugins = Plugins::with_logging();
    let root = plugins
        .add_flags(Command::new("foo").subcommand(Command::new("serve")))
        .unwrap();
    let matches = root
        .try_get_matches_from(["foo", "serve", "--log"])
        .unwrap();
    let (_, sub) = matches.subcommand().unwrap();
    assert!(sub.get_flag(logging::log::LOG_FLAG));
}
