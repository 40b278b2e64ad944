//! # cliwork
//!
//! **cliwork** is a small command-line support library: independent modules
//! register CLI flags, before-command hooks and background work, and the
//! command runs all that work concurrently under one cancellation token.
//!
//! ## Architecture
//! ```text
//!   module A          module B          module C
//!   setup / before    setup             work unit
//!        │                │                 │
//!        ▼                ▼                 ▼
//! ┌───────────────────────────────────────────────────────┐
//! │ Plugins                                               │
//! │  - PluginGroup<SetupCli>       (placement ordered)    │
//! │  - PluginGroup<BeforeCommand>  (placement ordered)    │
//! │  - Vec<WorkRef>                (unordered)            │
//! └──────┬─────────────────┬───────────────────┬──────────┘
//!        ▼                 ▼                   ▼
//!    add_flags()     before_command()       do_all()
//!                                              │
//!                                              ▼
//!                       ┌────────────────────────────────────┐
//!                       │ Supervisor::run_all                │
//!                       │  child token ─► unit 1 … unit N    │
//!                       │  first failure ─► cancel siblings  │
//!                       │  join all ─► Err(first) | Ok(())   │
//!                       └──────────────────┬─────────────────┘
//!                                          ▼
//!                                 Bus ─► SubscriberSet
//! ```
//!
//! ## Features
//! | Area            | Description                                               | Key types                              |
//! |-----------------|-----------------------------------------------------------|----------------------------------------|
//! | **Supervision** | Fail-fast fan-out/fan-in of cooperative work units.       | [`Supervisor`], [`SupervisorConfig`]   |
//! | **Work**        | Define units as trait objects or closures.                | [`Work`], [`WorkFn`], [`WorkRef`]      |
//! | **Plugins**     | Flag setup and before-command hooks with placement hints. | [`Plugins`], [`PluginGroup`], [`Placement`] |
//! | **Logging**     | `--debug`, `--tinted`, `--log` flags and logger install.  | [`logging`], [`LogSettings`]           |
//! | **Events**      | Run lifecycle events and subscribers.                     | [`Event`], [`Subscribe`]               |
//! | **Errors**      | Typed errors.                                             | [`WorkError`], [`CliError`]            |
//!
//! ## Optional features
//! - `logging` (default): exports the built-in [`LogWriter`] subscriber.
//!
//! ## Example
//! ```rust,no_run
//! use clap::Command;
//! use tokio_util::sync::CancellationToken;
//! use cliwork::{CommandContext, CommandRef, Plugins, Supervisor, SupervisorConfig, WorkError, WorkFn};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut plugins = Plugins::with_logging();
//!     plugins.register_work(WorkFn::arc("ticker", |ctx: CancellationToken, _cmd: CommandRef| async move {
//!         while !ctx.is_cancelled() {
//!             tokio::time::sleep(std::time::Duration::from_millis(250)).await;
//!         }
//!         Ok::<_, WorkError>(())
//!     }));
//!
//!     let root = plugins.add_flags(Command::new("serve"))?;
//!     let mut ctx = CommandContext::from_command(&root, root.clone().get_matches());
//!     plugins.before_command(&mut ctx)?;
//!
//!     let sup = Supervisor::new(SupervisorConfig::default());
//!     sup.run_until_signal(plugins.work().to_vec(), ctx.into_ref()).await?;
//!     Ok(())
//! }
//! ```

mod cli;
mod command;
mod config;
mod core;
mod error;
mod events;
pub mod logging;
mod plugin;
mod subscribers;
mod work;

// ---- Public re-exports ----

pub use cli::{BeforeCommand, Plugins, SetupCli};
pub use command::{CommandContext, CommandRef};
pub use config::SupervisorConfig;
pub use crate::core::{Supervisor, SupervisorBuilder};
pub use error::{CliError, HookError, WorkError};
pub use events::{Bus, Event, EventKind};
pub use logging::LogSettings;
pub use plugin::{Placement, PluginGroup};
pub use subscribers::{Subscribe, SubscriberSet};
pub use work::{Work, WorkFn, WorkRef};

#[cfg(feature = "logging")]
pub use subscribers::LogWriter;

/// Extracts a readable message from a panic payload.
pub(crate) fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(msg) = panic.downcast_ref::<&'static str>() {
        (*msg).to_string()
    } else if let Some(msg) = panic.downcast_ref::<String>() {
        msg.clone()
    } else {
        "unknown panic".to_string()
    }
}
