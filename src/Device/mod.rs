// Device facade over the log store: advisory open/release bookkeeping and
// per-open stream positions. Holds no store state of its own.

use log::{debug, trace};
use std::sync::Arc;

use crate::Core::error::{HandleError, StoreError};
use crate::Core::handles::HandleCounter;
use crate::Core::transfer::{Sink, Source};
use crate::Ring::Store::LogStore;

mod debug;

/// A log store exposed the way a character device exposes it.
pub struct LogDevice {
    store: Arc<LogStore>,
    handles: HandleCounter,
}

/// One open of a `LogDevice`. Releases itself on drop.
pub struct DeviceHandle<'a> {
    device: &'a LogDevice,
    pos: u64,
}

impl LogDevice {
    pub fn new(store: Arc<LogStore>, max_handles: usize) -> Self {
        Self {
            store,
            handles: HandleCounter::new(max_handles),
        }
    }

    pub fn store(&self) -> &Arc<LogStore> {
        &self.store
    }

    /// Open the device, starting a fresh stream position.
    pub fn open(&self) -> Result<DeviceHandle<'_>, HandleError> {
        self.open_raw()?;
        Ok(DeviceHandle {
            device: self,
            pos: 0,
        })
    }

    /// Count an open without handing out a handle. Callers pair this with
    /// `release_raw` themselves.
    pub fn open_raw(&self) -> Result<usize, HandleError> {
        let open = self.handles.open()?;
        debug!("device opened ({} of {})", open, self.handles.max());
        Ok(open)
    }

    pub fn release_raw(&self) -> Result<usize, HandleError> {
        let open = self.handles.close()?;
        debug!("device released ({} still open)", open);
        Ok(open)
    }

    /// Read the retained stream once per position.
    ///
    /// A non-zero `*pos` means this open already consumed the stream and gets
    /// end-of-stream (0). Otherwise up to `count` bytes are copied to `sink`
    /// and `*pos` advances by that many. An empty store also yields 0 and
    /// leaves `*pos` alone.
    pub fn read_at<S: Sink + ?Sized>(
        &self,
        pos: &mut u64,
        sink: &mut S,
        count: usize,
    ) -> Result<usize, StoreError> {
        if *pos > 0 {
            trace!("read at {}: end of stream", pos);
            return Ok(0);
        }

        let read = self.store.read_into(sink, count)?;
        *pos += read as u64;
        Ok(read)
    }

    /// Append one message. Returns the bytes consumed from the caller, which
    /// is the full source length even when the store kept only its tail.
    pub fn write<S: Source + ?Sized>(&self, source: &S) -> Result<usize, StoreError> {
        self.store.append_from(source)?;
        Ok(source.len())
    }

    pub fn open_handles(&self) -> usize {
        self.handles.current()
    }

    pub fn max_handles(&self) -> usize {
        self.handles.max()
    }
}

impl<'a> DeviceHandle<'a> {
    pub fn device(&self) -> &'a LogDevice {
        self.device
    }

    pub fn position(&self) -> u64 {
        self.pos
    }

    /// Seek back to the start so the next read sees the stream again.
    pub fn rewind(&mut self) {
        self.pos = 0;
    }

    pub fn read<S: Sink + ?Sized>(&mut self, sink: &mut S, count: usize) -> Result<usize, StoreError> {
        self.device.read_at(&mut self.pos, sink, count)
    }

    pub fn read_to_vec(&mut self, count: usize) -> Result<Vec<u8>, StoreError> {
        let mut out = Vec::new();
        self.read(&mut out, count)?;
        Ok(out)
    }

    pub fn write<S: Source + ?Sized>(&self, source: &S) -> Result<usize, StoreError> {
        self.device.write(source)
    }
}

impl Drop for DeviceHandle<'_> {
    fn drop(&mut self) {
        // an unbalanced release is already reported by the counter
        let _ = self.device.release_raw();
    }
}
