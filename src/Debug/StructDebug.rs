use crate::Core::handles::HandleCounter;
use crate::Device::LogDevice;
use crate::Ring::Store::LogStore;
use std::fmt;

/// Debug function for LogStore
///
/// Shows the slot geometry and, when the lock is free, the cursors.
/// Never dumps slot memory and never blocks: a store whose write lock is
/// held renders its cursors as `<locked>`.
pub fn debug_log_store(store: &LogStore, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let mut s = f.debug_struct("LogStore");
    s.field("slot_count", &store.geometry.slot_count())
        .field("slot_capacity", &store.geometry.slot_capacity());
    match store.state.try_read() {
        Some(state) => s
            .field("head", &state.head)
            .field("tail", &state.tail)
            .field("last_written", &state.last_written)
            .field("count", &state.count),
        None => s.field("cursors", &"<locked>"),
    };
    s.finish()
}

/// Debug function for LogDevice
///
/// Shows:
/// - Open handle count and ceiling
/// - Underlying LogStore details
pub fn debug_log_device(device: &LogDevice, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("LogDevice")
        .field("open_handles", &device.open_handles())
        .field("max_handles", &device.max_handles())
        .field("store", &**device.store())
        .finish()
}

pub fn debug_handle_counter(handles: &HandleCounter, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.debug_struct("HandleCounter")
        .field("open", &handles.current())
        .field("max", &handles.max)
        .finish()
}
