//! Installs the process-wide logger, so it lives in its own test binary.

use clap::Command;
use cliwork::logging::SharedBuffer;
use cliwork::{CommandContext, Plugins, Supervisor, SupervisorConfig};
use tokio_util::sync::CancellationToken;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn debug_flag_installs_logger_for_the_run() {
    let buf = SharedBuffer::new();
    let plugins = Plugins::with_logging();
    let root = plugins.add_flags(Command::new("foo")).unwrap();
    let matches = root.clone().get_matches_from(["foo", "--debug"]);
    let mut ctx = CommandContext::from_command(&root, matches);
    ctx.log_settings_mut().writer = Some(buf.make_writer_boxed());
    plugins.before_command(&mut ctx).unwrap();

    let parent = CancellationToken::new();
    parent.cancel();
    Supervisor::new(SupervisorConfig::default())
        .run_all(&parent, plugins.work().to_vec(), ctx.into_ref())
        .await
        .unwrap();

    let out = buf.contents();
    assert!(out.contains("debug logging enabled"), "{out}");
    let start = out.find("foo work starting").expect("start line");
    let end = out.find("foo work ended").expect("end line");
    assert!(start < end);

    // A second install keeps the first subscriber.
    let again = cliwork::logging::install(
        tracing::Level::ERROR,
        false,
        SharedBuffer::new().make_writer_boxed(),
    )
    .unwrap();
    assert!(!again);
}
