//! # One supervision run: launch, settle, join.
//!
//! A [`SupervisionRun`] lives for exactly one [`Supervisor::run_all`](crate::Supervisor::run_all)
//! call. It owns:
//! - the child [`CancellationToken`] derived from the caller's parent token,
//! - the [`ErrorSlot`] holding the first genuine failure,
//! - the [`JoinSet`] acting as join barrier over all launched units.
//!
//! ## Settling a unit outcome
//! ```text
//! Ok(())              ──► UnitStopped
//! Err(Canceled)       ──► UnitStopped        (graceful wind-down)
//! Err(e), slot empty  ──► UnitFailed  ──► token.cancel()
//! Err(e), slot filled ──► FailureIgnored     (not surfaced)
//! Err(e), token cancelled ─► FailureIgnored  (not surfaced)
//! panic               ──► treated as Err(Panicked)
//! ```
//!
//! ## States
//! ```text
//! Idle ──► Running ──► (Cancelling) ──► Joining ──► Done
//!
//! Cancelling is recorded at most once: when the parent is cancelled or the
//! first failure is recorded, including while units are being joined.
//! ```

use std::fmt;
use std::sync::Arc;

use futures::FutureExt;
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;

use crate::command::CommandRef;
use crate::core::slot::ErrorSlot;
use crate::error::WorkError;
use crate::events::{Bus, Event, EventKind};
use crate::work::WorkRef;

/// Lifecycle of a supervision run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum RunState {
    Idle,
    Running,
    Cancelling,
    Joining,
    Done,
}

impl fmt::Display for RunState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            RunState::Idle => "idle",
            RunState::Running => "running",
            RunState::Cancelling => "cancelling",
            RunState::Joining => "joining",
            RunState::Done => "done",
        };
        f.write_str(s)
    }
}

/// Everything a unit wrapper needs to report its outcome.
#[derive(Clone)]
struct Settle {
    token: CancellationToken,
    slot: Arc<ErrorSlot>,
    bus: Bus,
    command: Arc<str>,
}

impl Settle {
    fn outcome(&self, unit: &str, res: Result<(), WorkError>) {
        let err = match res {
            Ok(()) => return self.stopped(unit),
            Err(e) if e.is_graceful() => return self.stopped(unit),
            Err(e) => e,
        };

        let message = err.to_string();
        if self.token.is_cancelled() {
            return self.ignored(unit, &message);
        }
        match self.slot.offer(err) {
            Ok(()) => {
                tracing::error!(
                    command = %self.command,
                    unit,
                    error = %message,
                    "work failed; cancelling remaining work"
                );
                self.bus.publish(
                    Event::new(EventKind::UnitFailed)
                        .with_command(Arc::clone(&self.command))
                        .with_unit(unit)
                        .with_error(message),
                );
                self.token.cancel();
            }
            Err(_rejected) => self.ignored(unit, &message),
        }
    }

    /// Failure returned once the run was already winding down: flagged, never surfaced.
    fn ignored(&self, unit: &str, message: &str) {
        tracing::warn!(
            command = %self.command,
            unit,
            error = %message,
            "ignoring failure returned after cancellation"
        );
        self.bus.publish(
            Event::new(EventKind::FailureIgnored)
                .with_command(Arc::clone(&self.command))
                .with_unit(unit)
                .with_error(message),
        );
    }

    fn stopped(&self, unit: &str) {
        tracing::debug!(command = %self.command, unit, "unit stopped");
        self.bus.publish(
            Event::new(EventKind::UnitStopped)
                .with_command(Arc::clone(&self.command))
                .with_unit(unit),
        );
    }
}

/// Ephemeral state of one `run_all` invocation.
pub(crate) struct SupervisionRun {
    settle: Settle,
    set: JoinSet<()>,
    state: RunState,
}

impl SupervisionRun {
    /// Derives the run's token from `parent`; cancelling the parent cancels the run.
    pub(crate) fn new(parent: &CancellationToken, command: Arc<str>, bus: Bus) -> Self {
        Self {
            settle: Settle {
                token: parent.child_token(),
                slot: Arc::new(ErrorSlot::new()),
                bus,
                command,
            },
            set: JoinSet::new(),
            state: RunState::Idle,
        }
    }

    /// Marks the run as launching units; called once before the first [`launch`](Self::launch).
    pub(crate) fn start(&mut self) {
        self.transition(RunState::Running);
    }

    /// Spawns one unit with the shared token and command handle.
    pub(crate) fn launch(&mut self, unit: WorkRef, cmd: CommandRef) {
        let settle = self.settle.clone();
        self.set.spawn(async move {
            let fut = unit.run(settle.token.clone(), cmd);
            let res = match std::panic::AssertUnwindSafe(fut).catch_unwind().await {
                Ok(res) => res,
                Err(panic) => Err(WorkError::Panicked {
                    info: crate::panic_message(panic.as_ref()),
                }),
            };
            settle.outcome(unit.name(), res);
        });
    }

    /// Waits for every launched unit and returns the surfaced failure, if any.
    pub(crate) async fn join(mut self) -> Result<(), WorkError> {
        let token = self.settle.token.clone();
        let mut cancelling = token.is_cancelled();
        if cancelling {
            self.transition(RunState::Cancelling);
        }
        self.transition(RunState::Joining);

        loop {
            tokio::select! {
                _ = token.cancelled(), if !cancelling => {
                    cancelling = true;
                    self.transition(RunState::Cancelling);
                }
                next = self.set.join_next() => match next {
                    Some(Ok(())) => {}
                    Some(Err(join_err)) => {
                        // Wrappers catch unit panics; this only fires if settling itself panicked.
                        let info = match join_err.try_into_panic() {
                            Ok(panic) => crate::panic_message(panic.as_ref()),
                            Err(join_err) => join_err.to_string(),
                        };
                        self.settle.outcome("<unknown>", Err(WorkError::Panicked { info }));
                    }
                    None => break,
                },
            }
        }

        self.transition(RunState::Done);
        tracing::debug!(
            command = %self.settle.command,
            failed = self.settle.slot.is_filled(),
            "all units joined"
        );
        match self.settle.slot.take() {
            Some(err) => Err(err),
            None => Ok(()),
        }
    }

    fn transition(&mut self, to: RunState) {
        tracing::debug!(
            command = %self.settle.command,
            from = %self.state,
            to = %to,
            "supervision run state"
        );
        self.state = to;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::CommandContext;
    use crate::work::WorkFn;
    use clap::Command;
    use std::time::Duration;

    struct Bomb;

    #[async_trait::async_trait]
    impl crate::work::Work for Bomb {
        fn name(&self) -> &str {
            "bomb"
        }

        async fn run(&self, _ctx: CancellationToken, _cmd: CommandRef) -> Result<(), WorkError> {
            panic!("bad unit")
        }
    }

    fn cmd() -> CommandRef {
        let matches = Command::new("foo").get_matches_from(["foo"]);
        CommandContext::new("foo", matches).into_ref()
    }

    #[tokio::test]
    async fn empty_run_succeeds() {
        let parent = CancellationToken::new();
        let mut run = SupervisionRun::new(&parent, "foo".into(), Bus::new(8));
        run.start();
        assert!(run.join().await.is_ok());
        assert!(!parent.is_cancelled());
    }

    #[tokio::test]
    async fn panicking_unit_becomes_failure_and_cancels_siblings() {
        let parent = CancellationToken::new();
        let mut run = SupervisionRun::new(&parent, "foo".into(), Bus::new(8));
        run.start();
        run.launch(Arc::new(Bomb), cmd());
        run.launch(
            WorkFn::arc("waiter", |ctx: CancellationToken, _cmd: CommandRef| async move {
                ctx.cancelled().await;
                Ok(())
            }),
            cmd(),
        );

        let res = tokio::time::timeout(Duration::from_secs(5), run.join())
            .await
            .expect("join must not hang");
        match res {
            Err(WorkError::Panicked { info }) => assert_eq!(info, "bad unit"),
            other => panic!("unexpected outcome: {other:?}"),
        }
        assert!(!parent.is_cancelled(), "child cancellation must not leak upwards");
    }

    #[tokio::test]
    async fn canceled_error_counts_as_graceful() {
        let parent = CancellationToken::new();
        parent.cancel();
        let mut run = SupervisionRun::new(&parent, "foo".into(), Bus::new(8));
        run.start();
        run.launch(
            WorkFn::arc("polite", |ctx: CancellationToken, _cmd: CommandRef| async move {
                ctx.cancelled().await;
                Err(WorkError::Canceled)
            }),
            cmd(),
        );
        assert!(run.join().await.is_ok());
    }

    #[tokio::test]
    async fn late_failure_after_parent_cancel_is_ignored() {
        let parent = CancellationToken::new();
        parent.cancel();
        let bus = Bus::new(8);
        let mut rx = bus.subscribe();
        let mut run = SupervisionRun::new(&parent, "foo".into(), bus);
        run.start();
        run.launch(
            WorkFn::arc("stubborn", |ctx: CancellationToken, _cmd: CommandRef| async move {
                ctx.cancelled().await;
                Err(WorkError::fail("late"))
            }),
            cmd(),
        );

        assert!(run.join().await.is_ok());
        let ev = rx.recv().await.expect("ignored failure event");
        assert_eq!(ev.kind, EventKind::FailureIgnored);
        assert_eq!(ev.unit.as_deref(), Some("stubborn"));
        assert_eq!(ev.error.as_deref(), Some("work failed: late"));
    }

    #[tokio::test]
    async fn states_follow_run_lifecycle() {
        use crate::logging::{SharedBuffer, subscriber};

        let buf = SharedBuffer::new();
        let _guard = tracing::subscriber::set_default(subscriber(
            tracing::Level::DEBUG,
            false,
            buf.make_writer_boxed(),
        ));

        let parent = CancellationToken::new();
        parent.cancel();
        let mut run = SupervisionRun::new(&parent, "foo".into(), Bus::new(8));
        run.start();
        assert!(run.join().await.is_ok());

        let out = buf.contents();
        let transitions: Vec<&str> = out
            .lines()
            .filter(|l| l.contains("supervision run state"))
            .filter_map(|l| l.split("to=").nth(1))
            .map(|rest| rest.split_whitespace().next().unwrap_or_default())
            .collect();
        assert_eq!(transitions, vec!["running", "cancelling", "joining", "done"]);
    }
}
