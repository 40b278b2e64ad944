//! # Supervisor: fail-fast fan-out/fan-in of work units.
//!
//! The [`Supervisor`] owns the event [`Bus`] and the optional subscriber
//! listener. Each [`Supervisor::run_all`] call creates one
//! [`SupervisionRun`], launches every unit concurrently and joins them all.
//!
//! ## High-level architecture
//! ```text
//! run_all(parent, units, cmd)
//!   │
//!   ├─► info!("<name> work starting")   + WorkStarting
//!   ├─► run token = parent.child_token()
//!   ├─► JoinSet::spawn(unit.run(token, cmd))    (one per unit)
//!   │        │
//!   │        └─► first genuine failure ─► ErrorSlot ─► token.cancel()
//!   │                                                   (siblings wind down)
//!   ├─► join every unit (no abort, no timeout)
//!   ├─► info!("<name> work ended")      + WorkEnded
//!   └─► Err(first failure) | Ok(())
//! ```
//!
//! ## Rules
//! - Exactly one token is derived per run and shared by all its units.
//! - At most one failure is surfaced; later failures are logged and dropped.
//! - The run never returns while a launched unit is still running.
//! - Cancelling the run token never cancels the caller's parent token.

use std::sync::Arc;

use tokio::sync::broadcast;
use tokio_util::sync::CancellationToken;

use crate::command::CommandRef;
use crate::config::SupervisorConfig;
use crate::core::{builder::SupervisorBuilder, run::SupervisionRun, shutdown};
use crate::error::WorkError;
use crate::events::{Bus, Event, EventKind};
use crate::work::WorkRef;

/// Launches work units concurrently under one cancellation token and
/// surfaces the first failure.
pub struct Supervisor {
    cfg: SupervisorConfig,
    bus: Bus,
    /// Stops the subscriber listener when the supervisor is dropped.
    listener: CancellationToken,
}

impl Supervisor {
    /// Creates a supervisor without subscribers.
    ///
    /// Does not need a tokio runtime.
    pub fn new(cfg: SupervisorConfig) -> Self {
        let bus = Bus::new(cfg.bus_capacity_clamped());
        Self::new_internal(cfg, bus, CancellationToken::new())
    }

    /// Returns a builder for attaching subscribers.
    pub fn builder(cfg: SupervisorConfig) -> SupervisorBuilder {
        SupervisorBuilder::new(cfg)
    }

    pub(crate) fn new_internal(cfg: SupervisorConfig, bus: Bus, listener: CancellationToken) -> Self {
        Self { cfg, bus, listener }
    }

    /// Returns the configuration this supervisor was built with.
    pub fn config(&self) -> &SupervisorConfig {
        &self.cfg
    }

    /// Creates a receiver for events published after this call.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.bus.subscribe()
    }

    /// Runs all `units` concurrently until each has returned.
    ///
    /// Every unit receives the same child token of `parent` and a clone of
    /// `cmd`. The first unit to fail genuinely has its error recorded and the
    /// token cancelled, asking the remaining units to wind down. `parent` may
    /// already be cancelled; units then see a cancelled token from the start.
    ///
    /// Returns the recorded failure, or `Ok(())` if none was recorded.
    ///
    /// # Example
    /// ```
    /// use clap::Command;
    /// use tokio_util::sync::CancellationToken;
    /// use cliwork::{CommandContext, CommandRef, Supervisor, SupervisorConfig, WorkFn, WorkRef, WorkError};
    ///
    /// # #[tokio::main(flavor = "current_thread")]
    /// # async fn main() {
    /// let cmd = Command::new("foo");
    /// let ctx = CommandContext::from_command(&cmd, cmd.clone().get_matches_from(["foo"])).into_ref();
    ///
    /// let units: Vec<WorkRef> = vec![
    ///     WorkFn::arc("oneshot", |_ctx: CancellationToken, _cmd: CommandRef| async move {
    ///         Ok::<_, WorkError>(())
    ///     }),
    ///     WorkFn::arc("broken", |_ctx: CancellationToken, _cmd: CommandRef| async move {
    ///         Err(WorkError::fail("foo!"))
    ///     }),
    ///     WorkFn::arc("server", |ctx: CancellationToken, _cmd: CommandRef| async move {
    ///         ctx.cancelled().await;
    ///         Ok::<_, WorkError>(())
    ///     }),
    /// ];
    ///
    /// let sup = Supervisor::new(SupervisorConfig::default());
    /// let err = sup.run_all(&CancellationToken::new(), units, ctx).await.unwrap_err();
    /// assert!(err.to_string().contains("foo!"));
    /// # }
    /// ```
    pub async fn run_all(
        &self,
        parent: &CancellationToken,
        units: Vec<WorkRef>,
        cmd: CommandRef,
    ) -> Result<(), WorkError> {
        let name: Arc<str> = Arc::from(cmd.display_name());

        tracing::info!(command = %name, units = units.len(), "{name} work starting");
        self.bus
            .publish(Event::new(EventKind::WorkStarting).with_command(Arc::clone(&name)));

        let mut run = SupervisionRun::new(parent, Arc::clone(&name), self.bus.clone());
        run.start();
        for unit in units {
            run.launch(unit, Arc::clone(&cmd));
        }
        let res = run.join().await;

        tracing::info!(command = %name, "{name} work ended");
        let mut ended = Event::new(EventKind::WorkEnded).with_command(name);
        if let Err(err) = &res {
            ended = ended.with_error(err.to_string());
        }
        self.bus.publish(ended);
        res
    }

    /// Runs all `units` until they end on their own or the process receives
    /// a termination signal, which cancels the run.
    ///
    /// If the signal handlers cannot be installed the run continues without
    /// them.
    pub async fn run_until_signal(
        &self,
        units: Vec<WorkRef>,
        cmd: CommandRef,
    ) -> Result<(), WorkError> {
        let root = CancellationToken::new();
        let name: Arc<str> = Arc::from(cmd.display_name());

        let run = self.run_all(&root, units, cmd);
        tokio::pin!(run);

        tokio::select! {
            res = &mut run => return res,
            signal = shutdown::termination_signal() => match signal {
                Ok(signal) => {
                    tracing::info!(command = %name, signal, "termination signal received; winding down");
                    self.bus
                        .publish(Event::new(EventKind::ShutdownRequested).with_command(name));
                    root.cancel();
                }
                Err(err) => {
                    tracing::warn!(command = %name, error = %err, "cannot listen for termination signals");
                }
            },
        }
        run.await
    }
}

impl Drop for Supervisor {
    fn drop(&mut self) {
        self.listener.cancel();
    }
}
