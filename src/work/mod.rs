//! # Work unit abstractions.
//!
//! - [`Work`] - trait for implementing async cancelable work
//! - [`WorkFn`] - function-backed implementation
//! - [`WorkRef`] - shared reference to a unit (`Arc<dyn Work>`)

mod unit;
mod work_fn;

pub use unit::{Work, WorkRef};
pub use work_fn::WorkFn;
