//! # Single-slot error holder.
//!
//! [`ErrorSlot`] keeps the first failure offered to it and rejects every
//! later one. The fast path is a single atomic swap, so concurrent offers
//! from unit wrappers never block each other for long.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, PoisonError};

use crate::error::WorkError;

/// First-write-wins holder for a run's surfaced failure.
#[derive(Debug, Default)]
pub(crate) struct ErrorSlot {
    filled: AtomicBool,
    error: Mutex<Option<WorkError>>,
}

impl ErrorSlot {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Stores `err` if the slot is still empty.
    ///
    /// Returns the error back when another failure was already accepted.
    pub(crate) fn offer(&self, err: WorkError) -> Result<(), WorkError> {
        if self.filled.swap(true, Ordering::SeqCst) {
            return Err(err);
        }
        let mut slot = self.error.lock().unwrap_or_else(PoisonError::into_inner);
        *slot = Some(err);
        Ok(())
    }

    pub(crate) fn is_filled(&self) -> bool {
        self.filled.load(Ordering::SeqCst)
    }

    /// Removes the stored failure. The slot stays closed for further offers.
    pub(crate) fn take(&self) -> Option<WorkError> {
        self.error
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
    }
}
