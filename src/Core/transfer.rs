// Byte-transfer collaborators.
//
// The store never touches caller memory directly. Copy-in goes through a
// `Source` and copy-out through a `Sink`, and either may fault. The store
// only ever calls them outside its lock and against private scratch memory.

use super::error::TransferFault;
use std::ptr;

/// Caller-side bytes the store copies in from.
pub trait Source {
    /// Total length of the caller's message.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Copy `dst.len()` bytes starting at `offset` into `dst`.
    fn copy_out(&self, offset: usize, dst: &mut [u8]) -> Result<(), TransferFault>;
}

/// Caller-side destination the store copies assembled bytes out to.
pub trait Sink {
    /// Copy all of `src` into the destination, or fault without a partial
    /// result being observable to the store.
    fn copy_in(&mut self, src: &[u8]) -> Result<(), TransferFault>;
}

impl Source for [u8] {
    fn len(&self) -> usize {
        <[u8]>::len(self)
    }

    fn copy_out(&self, offset: usize, dst: &mut [u8]) -> Result<(), TransferFault> {
        let end = offset
            .checked_add(dst.len())
            .filter(|&end| end <= <[u8]>::len(self))
            .ok_or(TransferFault::new(0, dst.len()))?;
        dst.copy_from_slice(&self[offset..end]);
        Ok(())
    }
}

impl Source for Vec<u8> {
    fn len(&self) -> usize {
        self.as_slice().len()
    }

    fn copy_out(&self, offset: usize, dst: &mut [u8]) -> Result<(), TransferFault> {
        self.as_slice().copy_out(offset, dst)
    }
}

impl Sink for Vec<u8> {
    fn copy_in(&mut self, src: &[u8]) -> Result<(), TransferFault> {
        self.extend_from_slice(src);
        Ok(())
    }
}

/// A fixed caller buffer. Faults when the payload does not fit.
impl Sink for [u8] {
    fn copy_in(&mut self, src: &[u8]) -> Result<(), TransferFault> {
        if src.len() > self.len() {
            return Err(TransferFault::new(0, src.len()));
        }
        self[..src.len()].copy_from_slice(src);
        Ok(())
    }
}

/// Source over a raw pointer handed across the C ABI.
pub struct RawSource {
    ptr: *const u8,
    len: usize,
}

impl RawSource {
    /// # Safety
    /// If `ptr` is non-null it must be valid for reads of `len` bytes for the
    /// lifetime of the returned value. A null `ptr` is allowed and faults on
    /// any non-empty copy.
    pub unsafe fn new(ptr: *const u8, len: usize) -> Self {
        Self { ptr, len }
    }
}

impl Source for RawSource {
    fn len(&self) -> usize {
        self.len
    }

    fn copy_out(&self, offset: usize, dst: &mut [u8]) -> Result<(), TransferFault> {
        if dst.is_empty() {
            return Ok(());
        }
        if self.ptr.is_null() || offset.saturating_add(dst.len()) > self.len {
            return Err(TransferFault::new(0, dst.len()));
        }
        // Safety: bounds checked above, validity guaranteed by `new`'s contract.
        unsafe {
            ptr::copy_nonoverlapping(self.ptr.add(offset), dst.as_mut_ptr(), dst.len());
        }
        Ok(())
    }
}

/// Sink over a raw pointer handed across the C ABI.
pub struct RawSink {
    ptr: *mut u8,
    capacity: usize,
}

impl RawSink {
    /// # Safety
    /// If `ptr` is non-null it must be valid for writes of `capacity` bytes
    /// for the lifetime of the returned value.
    pub unsafe fn new(ptr: *mut u8, capacity: usize) -> Self {
        Self { ptr, capacity }
    }
}

impl Sink for RawSink {
    fn copy_in(&mut self, src: &[u8]) -> Result<(), TransferFault> {
        if src.is_empty() {
            return Ok(());
        }
        if self.ptr.is_null() || src.len() > self.capacity {
            return Err(TransferFault::new(0, src.len()));
        }
        unsafe {
            ptr::copy_nonoverlapping(src.as_ptr(), self.ptr, src.len());
        }
        Ok(())
    }
}
