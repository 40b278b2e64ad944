//! # Function-backed work (`WorkFn`)
//!
//! [`WorkFn`] wraps a closure `F: Fn(CancellationToken, CommandRef) -> Fut`,
//! producing a fresh future per run. No state is shared between runs; if a
//! unit needs shared state, capture an `Arc<...>` explicitly.
//!
//! ## Example
//! ```rust
//! use tokio_util::sync::CancellationToken;
//! use cliwork::{CommandRef, WorkFn, WorkRef};
//!
//! let w: WorkRef = WorkFn::arc("janitor", |ctx: CancellationToken, _cmd: CommandRef| async move {
//!     ctx.cancelled().await;
//!     Ok(())
//! });
//!
//! assert_eq!(w.name(), "janitor");
//! ```

use std::borrow::Cow;
use std::future::Future;
use std::sync::Arc;

use async_trait::async_trait;
use tokio_util::sync::CancellationToken;

use crate::command::CommandRef;
use crate::error::WorkError;
use crate::work::unit::Work;

/// Function-backed work implementation.
pub struct WorkFn<F> {
    name: Cow<'static, str>,
    f: F,
}

impl<F, Fut> WorkFn<F>
where
    F: Fn(CancellationToken, CommandRef) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), WorkError>> + Send + 'static,
{
    /// Creates a new function-backed unit.
    ///
    /// Prefer [`WorkFn::arc`] when you immediately need a [`WorkRef`](crate::WorkRef).
    pub fn new(name: impl Into<Cow<'static, str>>, f: F) -> Self {
        Self {
            name: name.into(),
            f,
        }
    }

    /// Creates the unit and returns it as a shared handle.
    pub fn arc(name: impl Into<Cow<'static, str>>, f: F) -> Arc<Self> {
        Arc::new(Self::new(name, f))
    }
}

impl<F> std::fmt::Debug for WorkFn<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WorkFn").field("name", &self.name).finish()
    }
}

#[async_trait]
impl<F, Fut> Work for WorkFn<F>
where
    F: Fn(CancellationToken, CommandRef) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<(), WorkError>> + Send + 'static,
{
    fn name(&self) -> &str {
        &self.name
    }

    async fn run(&self, ctx: CancellationToken, cmd: CommandRef) -> Result<(), WorkError> {
        (self.f)(ctx, cmd).await
    }
}
