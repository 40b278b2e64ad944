//! # Supervisor configuration.
//!
//! Provides [`SupervisorConfig`], the settings shared by every run of a
//! [`Supervisor`](crate::Supervisor).
//!
//! ## Sentinel values
//! - `bus_capacity = 0` → clamped to 1 by [`SupervisorConfig::bus_capacity_clamped`]

/// Configuration for the work supervisor.
///
/// ## Field semantics
/// - `bus_capacity`: Event bus ring buffer size (min 1; clamped)
///
/// ## Notes
/// No grace period exists: after cancelling, the supervisor joins every
/// unit, however long that takes.
#[derive(Clone, Debug)]
pub struct SupervisorConfig {
    /// Capacity of the event bus broadcast channel ring buffer.
    ///
    /// Slow receivers that lag behind more than `bus_capacity` events will
    /// receive `Lagged` and skip older items.
    pub bus_capacity: usize,
}

impl SupervisorConfig {
    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }
}

impl Default for SupervisorConfig {
    /// Default configuration:
    ///
    /// - `bus_capacity = 1024`
    fn default() -> Self {
        Self { bus_capacity: 1024 }
    }
}
