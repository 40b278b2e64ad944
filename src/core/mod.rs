//! Supervisor core: fan-out, fail-fast cancellation, fan-in.
//!
//! The only public API from this module is [`Supervisor`] and its
//! [`SupervisorBuilder`].
//!
//! Internal modules:
//! - [`run`]: one supervision run (token, error slot, join barrier);
//! - [`slot`]: first-write-wins error holder;
//! - [`supervisor`]: `run_all` and `run_until_signal`;
//! - [`shutdown`]: cross-platform termination signal handling;
//! - [`builder`]: wires subscribers to the event bus.

mod builder;
mod run;
mod shutdown;
mod slot;
mod supervisor;

pub use builder::SupervisorBuilder;
pub use supervisor::Supervisor;
