// This is the slot ring behind the log - one message per slot

use super::layout::SlotGeometry;
use parking_lot::RwLock;

/// A fixed-capacity log of length-capped messages that overwrites its oldest
/// entry when full.
///
/// ### Concurrency Design:
/// - **Writers (append)** take the lock exclusively. The caller's bytes are
///   copied into private scratch memory first, so the critical section is
///   only the slot commit and the cursor updates.
/// - **Readers (read)** take the lock shared. Cursor snapshot and traversal
///   happen under the same guard; the assembled bytes are handed to the
///   caller after the guard is dropped.
pub struct LogStore {
    /// Slot partitioning. Immutable after construction, so it lives outside
    /// the lock.
    pub(crate) geometry: SlotGeometry,

    /// Slot memory and cursors, guarded as one unit.
    pub(crate) state: RwLock<StoreState>,
}

/// Everything a writer mutates.
pub(crate) struct StoreState {
    /// `slot_count * slot_capacity` bytes, zeroed at construction.
    pub(crate) slots: Box<[u8]>,

    /// Slot the next append lands in.
    pub(crate) head: usize,

    /// Oldest retained slot.
    pub(crate) tail: usize,

    /// Newest retained slot. Upper bound of every read traversal.
    pub(crate) last_written: usize,

    /// Retained slots, `0..=slot_count`.
    pub(crate) count: usize,
}
