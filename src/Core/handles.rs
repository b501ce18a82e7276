use crossbeam_utils::CachePadded;
use log::warn;
use std::sync::atomic::{AtomicUsize, Ordering};

use super::error::HandleError;

/// Default ceiling on concurrently open handles.
pub const DEFAULT_MAX_HANDLES: usize = 8;

/// Advisory open/close bookkeeping layered above the store.
///
/// The counter never touches store state. It only refuses opens past `max`
/// and reports releases that have no matching open. The count saturates at
/// both ends instead of wrapping.
pub struct HandleCounter {
    /// Currently open handles. Padded so hot open/close traffic does not
    /// false-share with whatever the counter is embedded next to.
    pub(crate) open: CachePadded<AtomicUsize>,
    pub(crate) max: usize,
}

impl HandleCounter {
    pub fn new(max: usize) -> Self {
        Self {
            open: CachePadded::new(AtomicUsize::new(0)),
            max,
        }
    }

    /// Register one more open handle. Returns the new count.
    pub fn open(&self) -> Result<usize, HandleError> {
        loop {
            let current = self.open.load(Ordering::Acquire);
            let next = match current.checked_add(1) {
                Some(next) if next <= self.max => next,
                _ => {
                    warn!("open refused: {} of {} handles in use", current, self.max);
                    return Err(HandleError::TooManyHandles { max: self.max });
                }
            };

            if self
                .open
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return Ok(next);
            }
            std::hint::spin_loop();
        }
    }

    /// Drop one open handle. Returns the remaining count.
    pub fn close(&self) -> Result<usize, HandleError> {
        loop {
            let current = self.open.load(Ordering::Acquire);
            let Some(next) = current.checked_sub(1) else {
                warn!("release called with no open handles");
                return Err(HandleError::UnbalancedClose);
            };

            if self
                .open
                .compare_exchange_weak(current, next, Ordering::AcqRel, Ordering::Relaxed)
                .is_ok()
            {
                return Ok(next);
            }
            std::hint::spin_loop();
        }
    }

    pub fn current(&self) -> usize {
        self.open.load(Ordering::Relaxed)
    }

    pub fn max(&self) -> usize {
        self.max
    }
}

impl Default for HandleCounter {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_HANDLES)
    }
}
