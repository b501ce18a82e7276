use std::sync::Arc;

use super::Store::layout::{SlotGeometry, DEFAULT_SLOT_CAPACITY, DEFAULT_TOTAL_CAPACITY};
use super::Store::LogStore;
use crate::Core::error::StoreError;
use crate::Core::handles::DEFAULT_MAX_HANDLES;
use crate::Device::LogDevice;

/// Configuration for a store, and optionally the device in front of it.
#[derive(Clone, Debug)]
pub struct LogBuilder {
    total_capacity: usize,
    slot_capacity: usize,
    max_handles: usize,
}

impl Default for LogBuilder {
    fn default() -> Self {
        Self {
            total_capacity: DEFAULT_TOTAL_CAPACITY, // 32 bytes
            slot_capacity: DEFAULT_SLOT_CAPACITY,   // 7 characters + terminator
            max_handles: DEFAULT_MAX_HANDLES,
        }
    }
}

impl LogBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_total_capacity(mut self, bytes: usize) -> Self {
        self.total_capacity = bytes;
        self
    }

    pub fn with_slot_capacity(mut self, bytes: usize) -> Self {
        self.slot_capacity = bytes;
        self
    }

    /// Size the store by slot count instead of total bytes.
    pub fn with_slots(mut self, slots: usize, slot_capacity: usize) -> Self {
        self.slot_capacity = slot_capacity;
        self.total_capacity = slots.saturating_mul(slot_capacity);
        self
    }

    pub fn with_max_handles(mut self, max: usize) -> Self {
        self.max_handles = max;
        self
    }

    pub fn geometry(&self) -> Result<SlotGeometry, StoreError> {
        SlotGeometry::new(self.total_capacity, self.slot_capacity)
    }

    pub fn build_store(self) -> Result<LogStore, StoreError> {
        LogStore::with_geometry(self.geometry()?)
    }

    pub fn build_device(self) -> Result<LogDevice, StoreError> {
        let max_handles = self.max_handles;
        let store = self.build_store()?;
        Ok(LogDevice::new(Arc::new(store), max_handles))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_device_constants() {
        let store = LogBuilder::new().build_store().unwrap();
        assert_eq!(store.total_capacity(), 32);
        assert_eq!(store.slot_capacity(), 8);
        assert_eq!(store.slot_count(), 4);
    }

    #[test]
    fn with_slots_sizes_by_count() {
        let store = LogBuilder::new().with_slots(16, 64).build_store().unwrap();
        assert_eq!(store.slot_count(), 16);
        assert_eq!(store.total_capacity(), 1024);
    }

    #[test]
    fn invalid_pairs_do_not_build() {
        let err = LogBuilder::new()
            .with_total_capacity(33)
            .build_store()
            .unwrap_err();
        assert!(matches!(err, StoreError::InvalidArgument(_)));
    }

    #[test]
    fn device_carries_handle_limit() {
        let device = LogBuilder::new().with_max_handles(3).build_device().unwrap();
        assert_eq!(device.max_handles(), 3);
    }
}
