use crate::Core::error::StoreError;
use std::ops::Range;

/// Byte that ends the content of a slot.
pub const TERMINATOR: u8 = 0;

/// Total backing capacity in bytes of a default store.
pub const DEFAULT_TOTAL_CAPACITY: usize = 1 << 5;

/// Bytes per slot of a default store, terminator included.
pub const DEFAULT_SLOT_CAPACITY: usize = 8;

/// One content byte plus the terminator.
pub const MIN_SLOT_CAPACITY: usize = 2;

/// Fixed partitioning of the backing array into slots.
///
/// All index arithmetic of the ring lives here. Slot counts are not required
/// to be a power of two, so wrapping is a modulo rather than a mask.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlotGeometry {
    total_capacity: usize,
    slot_capacity: usize,
    slot_count: usize,
}

impl SlotGeometry {
    /// Validate a capacity pair.
    ///
    /// `total_capacity` must be a non-zero exact multiple of `slot_capacity`,
    /// and a slot must hold at least one content byte plus the terminator.
    pub fn new(total_capacity: usize, slot_capacity: usize) -> Result<Self, StoreError> {
        if slot_capacity < MIN_SLOT_CAPACITY {
            return Err(StoreError::InvalidArgument(
                "slot capacity must leave room for one byte and a terminator",
            ));
        }
        if total_capacity == 0 {
            return Err(StoreError::InvalidArgument("total capacity must be non-zero"));
        }
        if total_capacity % slot_capacity != 0 {
            return Err(StoreError::InvalidArgument(
                "total capacity must be a multiple of slot capacity",
            ));
        }

        Ok(Self {
            total_capacity,
            slot_capacity,
            slot_count: total_capacity / slot_capacity,
        })
    }

    #[inline]
    pub fn total_capacity(&self) -> usize {
        self.total_capacity
    }

    #[inline]
    pub fn slot_capacity(&self) -> usize {
        self.slot_capacity
    }

    #[inline]
    pub fn slot_count(&self) -> usize {
        self.slot_count
    }

    /// Longest message a slot keeps.
    #[inline]
    pub fn max_message_len(&self) -> usize {
        self.slot_capacity - 1
    }

    /// Slot following `index`, wrapping at the end of the ring.
    #[inline]
    pub fn next(&self, index: usize) -> usize {
        (index + 1) % self.slot_count
    }

    /// Byte range of slot `index` in the backing array.
    #[inline]
    pub fn slot_range(&self, index: usize) -> Range<usize> {
        let start = index * self.slot_capacity;
        start..start + self.slot_capacity
    }

    /// Where to start copying a message of `len` bytes so that only its
    /// last `max_message_len()` bytes are kept. Zero when it fits.
    #[inline]
    pub fn retained_offset(&self, len: usize) -> usize {
        len.saturating_sub(self.max_message_len())
    }
}

impl Default for SlotGeometry {
    fn default() -> Self {
        Self {
            total_capacity: DEFAULT_TOTAL_CAPACITY,
            slot_capacity: DEFAULT_SLOT_CAPACITY,
            slot_count: DEFAULT_TOTAL_CAPACITY / DEFAULT_SLOT_CAPACITY,
        }
    }
}
