// Plain cursor snapshot of the slot ring; no locks, no references into the store

/// Cursor state of a `LogStore`, captured under one read guard.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct StoreCursors {
    pub head: usize,
    pub tail: usize,
    pub last_written: usize,
    pub count: usize,
}
