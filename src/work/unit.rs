//! # Work unit abstraction.
//!
//! This module defines the [`Work`] trait (async, cancelable) and the common
//! handle type [`WorkRef`], an `Arc<dyn Work>` suitable for sharing across
//! the supervisor.
//!
//! A unit receives a [`CancellationToken`] and the command it runs for. It
//! works until it is done on its own, or until the token is cancelled, in
//! which case it winds down and returns `Ok(())` (or
//! [`WorkError::Canceled`]).

use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::command::CommandRef;
use crate::error::WorkError;

/// # Shared handle to a work unit.
pub type WorkRef = Arc<dyn Work>;

/// # Asynchronous, cancelable unit of work.
///
/// ## Contract
/// - Return an error only for genuine failures observed **before**
///   cancellation; after `ctx` is cancelled, wind down and return `Ok(())`.
/// - Join or release everything spawned internally before returning.
///
/// # Example
/// ```
/// use tokio_util::sync::CancellationToken;
/// use async_trait::async_trait;
/// use cliwork::{CommandRef, Work, WorkError};
///
/// struct Ticker;
///
/// #[async_trait]
/// impl Work for Ticker {
///     fn name(&self) -> &str { "ticker" }
///
///     async fn run(&self, ctx: CancellationToken, _cmd: CommandRef) -> Result<(), WorkError> {
///         loop {
///             tokio::select! {
///                 _ = ctx.cancelled() => return Ok(()),
///                 _ = tokio::time::sleep(std::time::Duration::from_millis(250)) => {}
///             }
///         }
///     }
/// }
/// ```
#[async_trait]
pub trait Work: Send + Sync + 'static {
    /// Returns a stable, human-readable unit name.
    fn name(&self) -> &str;

    /// Performs the work until completion or cancellation.
    async fn run(&self, ctx: CancellationToken, cmd: CommandRef) -> Result<(), WorkError>;
}
