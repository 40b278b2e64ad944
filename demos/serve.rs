//! Example: CLI flags from the logging plugins plus two work units under `run_until_signal`.
//!
//! Demonstrates:
//! - `Plugins::with_logging` adding `--debug`, `--tinted` and `--log`;
//! - a custom flag and before-command hook;
//! - a long-running unit that honours cancellation and a one-shot unit;
//! - the built-in `LogWriter` subscriber.
//!
//! Run with:
//! ```bash
//! cargo run --example serve -- --log
//! cargo run --example serve -- --debug --fail-after 2
//! ```
//! Stop it with Ctrl-C.

use std::sync::Arc;
use std::time::Duration;

use clap::{Arg, Command, value_parser};
use cliwork::{
    CommandContext, CommandRef, LogWriter, Placement, Plugins, Supervisor, SupervisorConfig,
    WorkError, WorkFn,
};
use tokio_util::sync::CancellationToken;

const FAIL_AFTER: &str = "fail-after";

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let mut plugins = Plugins::with_logging();
    plugins
        .register_setup("serve", Placement::Last, |cmd: Command| {
            cmd.arg(
                Arg::new(FAIL_AFTER)
                    .long(FAIL_AFTER)
                    .value_parser(value_parser!(u64))
                    .help("fails the ticker after this many ticks"),
            )
        })
        .register_before("serve", Placement::Last, |ctx: &mut CommandContext| {
            if ctx.matches().get_one::<u64>(FAIL_AFTER) == Some(&0) {
                return Err("--fail-after must be positive".into());
            }
            Ok(())
        })
        .register_work(WorkFn::arc("ticker", |ctx: CancellationToken, cmd: CommandRef| {
            let fail_after = cmd.matches().get_one::<u64>(FAIL_AFTER).copied();
            async move {
                let mut ticks = 0u64;
                loop {
                    tokio::select! {
                        _ = ctx.cancelled() => return Ok(()),
                        _ = tokio::time::sleep(Duration::from_secs(1)) => {}
                    }
                    ticks += 1;
                    tracing::info!(ticks, "tick");
                    if fail_after.is_some_and(|limit| ticks >= limit) {
                        return Err(WorkError::fail(format!("gave up after {ticks} ticks")));
                    }
                }
            }
        }))
        .register_work(WorkFn::arc("warmup", |_ctx: CancellationToken, _cmd: CommandRef| async move {
            tokio::time::sleep(Duration::from_millis(200)).await;
            tracing::info!("caches warmed");
            Ok::<_, WorkError>(())
        }));

    let root = plugins.add_flags(Command::new("serve"))?;
    let mut ctx = CommandContext::from_command(&root, root.clone().get_matches());
    plugins.before_command(&mut ctx)?;

    let sup = Supervisor::builder(SupervisorConfig::default())
        .with_subscriber(Arc::new(LogWriter::new()))
        .build();
    sup.run_until_signal(plugins.work().to_vec(), ctx.into_ref()).await?;
    Ok(())
}
