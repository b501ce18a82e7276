// C ABI over one process-wide log device.
//
// This layer plays the registration/lifecycle role: `klog_init` creates the
// single device, `klog_exit` tears it down. Everything else resolves the
// device per call. Return values follow the kernel convention: non-negative
// on success, a negated errno on failure.

use crate::Core::transfer::{RawSink, RawSource};
use crate::Device::LogDevice;
use crate::Ring::LogBuilder;
use lazy_static::lazy_static;
use log::{error, info, warn};
use parking_lot::RwLock;
use std::sync::Arc;

const KLOG_SUCCESS: i32 = 0;

lazy_static! {
    static ref DEVICE: RwLock<Option<Arc<LogDevice>>> = RwLock::new(None);
}

/// Current device, if one is registered. The read guard is not held past
/// the clone, so store calls never run under the registry lock.
fn device() -> Option<Arc<LogDevice>> {
    DEVICE.read().clone()
}

// -----------------------------------------------------------------------------
// Lifecycle
// -----------------------------------------------------------------------------

/// Register the process-wide device.
///
/// # Arguments
/// * `total_capacity` - Backing bytes; an exact multiple of `slot_capacity`.
/// * `slot_capacity` - Bytes per message slot, terminator included (>= 2).
/// * `max_handles` - Ceiling on concurrent opens.
///
/// # Returns
/// * 0 on success, `-EALREADY` if a device exists, `-EINVAL`/`-ENOMEM` if
///   the store cannot be built.
#[no_mangle]
pub extern "C" fn klog_init(total_capacity: usize, slot_capacity: usize, max_handles: usize) -> i32 {
    let mut slot = DEVICE.write();
    if slot.is_some() {
        warn!("klog_init called while a device is registered");
        return -libc::EALREADY;
    }

    match LogBuilder::new()
        .with_total_capacity(total_capacity)
        .with_slot_capacity(slot_capacity)
        .with_max_handles(max_handles)
        .build_device()
    {
        Ok(device) => {
            *slot = Some(Arc::new(device));
            info!("klog device registered");
            KLOG_SUCCESS
        }
        Err(e) => {
            error!("klog_init failed: {}", e);
            -e.errno()
        }
    }
}

/// Tear down the process-wide device.
///
/// Calls already holding the device finish against it; the store is freed
/// when the last of them returns.
#[no_mangle]
pub extern "C" fn klog_exit() -> i32 {
    match DEVICE.write().take() {
        Some(device) => {
            if device.open_handles() > 0 {
                warn!(
                    "klog device unregistered with {} handles still open",
                    device.open_handles()
                );
            }
            info!("klog device unregistered");
            KLOG_SUCCESS
        }
        None => -libc::ENODEV,
    }
}

// -----------------------------------------------------------------------------
// File operations
// -----------------------------------------------------------------------------

/// Count one open of the device.
///
/// # Returns
/// * 0 on success, `-EBUSY` past the handle ceiling, `-ENODEV` without a device.
#[no_mangle]
pub extern "C" fn klog_open() -> i32 {
    let Some(device) = device() else {
        return -libc::ENODEV;
    };
    match device.open_raw() {
        Ok(_) => KLOG_SUCCESS,
        Err(e) => -e.errno(),
    }
}

/// Count one release of the device.
///
/// # Returns
/// * 0 on success, `-EBADF` when there is no matching open.
#[no_mangle]
pub extern "C" fn klog_release() -> i32 {
    let Some(device) = device() else {
        return -libc::ENODEV;
    };
    match device.release_raw() {
        Ok(_) => KLOG_SUCCESS,
        Err(e) => -e.errno(),
    }
}

/// Append one message.
///
/// # Arguments
/// * `buf` - Pointer to the message bytes.
/// * `len` - Length of the message.
///
/// # Returns
/// * `len` on success (the whole message is consumed even when only its
///   tail fits a slot), `-EFAULT` if `buf` is null and `len` is non-zero.
#[no_mangle]
pub extern "C" fn klog_write(buf: *const u8, len: usize) -> isize {
    let Some(device) = device() else {
        return -(libc::ENODEV as isize);
    };

    let source = unsafe { RawSource::new(buf, len) };
    match device.write(&source) {
        Ok(written) => written as isize,
        Err(e) => {
            error!("klog_write failed: {}", e);
            -(e.errno() as isize)
        }
    }
}

/// Read the retained stream.
///
/// # Arguments
/// * `buf` - Destination buffer.
/// * `len` - Capacity of `buf`; the most bytes returned.
/// * `pos` - In/out stream position for this open; 0 on the first read.
///
/// # Returns
/// * Bytes copied (0 at end of stream or on an empty log), `-EINVAL` for a
///   zero `len`, `-EFAULT` if `buf` or `pos` is null.
#[no_mangle]
pub extern "C" fn klog_read(buf: *mut u8, len: usize, pos: *mut u64) -> isize {
    if pos.is_null() {
        return -(libc::EFAULT as isize);
    }
    let Some(device) = device() else {
        return -(libc::ENODEV as isize);
    };

    let mut sink = unsafe { RawSink::new(buf, len) };
    let pos = unsafe { &mut *pos };
    match device.read_at(pos, &mut sink, len) {
        Ok(read) => read as isize,
        Err(e) => {
            error!("klog_read failed: {}", e);
            -(e.errno() as isize)
        }
    }
}
