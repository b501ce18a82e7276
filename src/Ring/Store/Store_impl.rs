use log::{debug, info, trace};
use parking_lot::RwLock;

use super::layout::{SlotGeometry, TERMINATOR};
use super::Store::{LogStore, StoreState};
use crate::Core::error::StoreError;
use crate::Core::transfer::{Sink, Source};
use crate::Ring::Structs::Store_Structs::StoreCursors;

impl LogStore {
    /// Create a store of `total_capacity / slot_capacity` empty slots.
    ///
    /// Fails with `InvalidArgument` if the pair does not partition evenly or a
    /// slot cannot hold one byte plus the terminator, and with `OutOfMemory`
    /// if the backing storage cannot be reserved.
    pub fn new(total_capacity: usize, slot_capacity: usize) -> Result<Self, StoreError> {
        Self::with_geometry(SlotGeometry::new(total_capacity, slot_capacity)?)
    }

    /// Create a store over an already validated geometry.
    pub fn with_geometry(geometry: SlotGeometry) -> Result<Self, StoreError> {
        let requested = geometry.total_capacity();
        let mut backing: Vec<u8> = Vec::new();
        backing
            .try_reserve_exact(requested)
            .map_err(|_| StoreError::OutOfMemory { requested })?;
        backing.resize(requested, TERMINATOR);

        info!(
            "log store created: {} slots of {} bytes",
            geometry.slot_count(),
            geometry.slot_capacity()
        );

        Ok(Self {
            geometry,
            state: RwLock::new(StoreState {
                slots: backing.into_boxed_slice(),
                head: 0,
                tail: 0,
                last_written: 0,
                count: 0,
            }),
        })
    }

    /// Append one message, evicting the oldest entry if the store is full.
    ///
    /// Messages longer than `max_message_len()` keep their *last* bytes.
    /// Returns the number of content bytes stored.
    pub fn append(&self, message: &[u8]) -> Result<usize, StoreError> {
        self.append_from(message)
    }

    /// Append one message pulled from a transfer collaborator.
    ///
    /// The copy-in happens before the write lock is taken; if it faults
    /// nothing has been committed and the store is untouched.
    pub fn append_from<S: Source + ?Sized>(&self, source: &S) -> Result<usize, StoreError> {
        let len = source.len();
        let offset = self.geometry.retained_offset(len);
        let mut scratch = vec![0u8; len - offset];
        source.copy_out(offset, &mut scratch)?;

        let (slot, evicted) = self.state.write().commit(&self.geometry, &scratch);

        if evicted {
            debug!("store full, slot {} overwritten", slot);
        }
        trace!(
            "appended {} of {} bytes to slot {}",
            scratch.len(),
            len,
            slot
        );
        Ok(scratch.len())
    }

    /// Read up to `max_bytes` of the retained stream, oldest entry first.
    pub fn read(&self, max_bytes: usize) -> Result<Vec<u8>, StoreError> {
        let mut out = Vec::new();
        self.read_into(&mut out, max_bytes)?;
        Ok(out)
    }

    /// Read up to `max_bytes` of the retained stream into a transfer
    /// collaborator. Returns the number of bytes handed over.
    ///
    /// Entries are concatenated without delimiters. The traversal starts at
    /// the oldest entry, visits at most `len()` slots and stops after the
    /// newest one; if the next entry does not fit it is cut so exactly
    /// `max_bytes` are returned. The copy to `sink` happens once, after the
    /// read guard is released.
    pub fn read_into<S: Sink + ?Sized>(
        &self,
        sink: &mut S,
        max_bytes: usize,
    ) -> Result<usize, StoreError> {
        if max_bytes == 0 {
            return Err(StoreError::InvalidArgument("zero-length read"));
        }

        let assembled = {
            let state = self.state.read();
            if state.count == 0 {
                return Ok(0);
            }
            state.collect(&self.geometry, max_bytes)
        };

        sink.copy_in(&assembled)?;
        trace!("read {} bytes (max {})", assembled.len(), max_bytes);
        Ok(assembled.len())
    }

    /// Retained messages as discrete entries, oldest first.
    pub fn entries(&self) -> Vec<Vec<u8>> {
        let state = self.state.read();
        let entries = state
            .retained(&self.geometry)
            .map(<[u8]>::to_vec)
            .collect();
        entries
    }

    /// Cursor state, captured atomically.
    pub fn cursors(&self) -> StoreCursors {
        let state = self.state.read();
        StoreCursors {
            head: state.head,
            tail: state.tail,
            last_written: state.last_written,
            count: state.count,
        }
    }

    pub fn len(&self) -> usize {
        self.state.read().count
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn is_full(&self) -> bool {
        self.len() == self.geometry.slot_count()
    }

    pub fn geometry(&self) -> SlotGeometry {
        self.geometry
    }

    pub fn slot_count(&self) -> usize {
        self.geometry.slot_count()
    }

    pub fn slot_capacity(&self) -> usize {
        self.geometry.slot_capacity()
    }

    pub fn total_capacity(&self) -> usize {
        self.geometry.total_capacity()
    }

    pub fn max_message_len(&self) -> usize {
        self.geometry.max_message_len()
    }
}

impl Drop for LogStore {
    fn drop(&mut self) {
        info!(
            "log store released: {} of {} slots in use",
            self.state.get_mut().count,
            self.geometry.slot_count()
        );
    }
}

impl StoreState {
    /// Write `content` into the head slot and advance the cursors.
    ///
    /// Returns the slot written and whether the oldest entry was evicted.
    fn commit(&mut self, geometry: &SlotGeometry, content: &[u8]) -> (usize, bool) {
        debug_assert!(content.len() <= geometry.max_message_len());

        let slot = self.head;
        let evicted = self.count == geometry.slot_count();
        if evicted {
            // head == tail when full; the oldest entry is the one about to go
            self.tail = geometry.next(self.tail);
        }

        let dst = &mut self.slots[geometry.slot_range(slot)];
        dst[..content.len()].copy_from_slice(content);
        dst[content.len()..].fill(TERMINATOR);

        self.last_written = slot;
        self.head = geometry.next(slot);
        if !evicted {
            self.count += 1;
        }

        (slot, evicted)
    }

    /// Content of slot `index` up to its terminator.
    fn slot_content<'a>(&'a self, geometry: &SlotGeometry, index: usize) -> &'a [u8] {
        let slot = &self.slots[geometry.slot_range(index)];
        let len = slot
            .iter()
            .position(|&b| b == TERMINATOR)
            .unwrap_or(geometry.max_message_len());
        &slot[..len]
    }

    /// Retained entries from `tail` through `last_written`, never more than
    /// `count` of them.
    fn retained<'a>(&'a self, geometry: &'a SlotGeometry) -> impl Iterator<Item = &'a [u8]> + 'a {
        let mut index = self.tail;
        let mut done = false;
        (0..self.count).map_while(move |_| {
            if done {
                return None;
            }
            let content = self.slot_content(geometry, index);
            done = index == self.last_written;
            index = geometry.next(index);
            Some(content)
        })
    }

    /// Concatenate retained entries into a private buffer of at most
    /// `max_bytes`.
    fn collect(&self, geometry: &SlotGeometry, max_bytes: usize) -> Vec<u8> {
        let hint = max_bytes.min(self.count * geometry.max_message_len());
        let mut out = Vec::with_capacity(hint);

        for content in self.retained(geometry) {
            let room = max_bytes - out.len();
            if content.len() > room {
                out.extend_from_slice(&content[..room]);
                break;
            }
            out.extend_from_slice(content);
        }

        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store(total: usize, slot: usize) -> LogStore {
        LogStore::new(total, slot).unwrap()
    }

    #[test]
    fn fresh_cursors() {
        let s = store(32, 8);
        assert_eq!(s.cursors(), StoreCursors::default());
        assert!(s.is_empty());
        assert!(!s.is_full());
    }

    #[test]
    fn full_append_moves_tail_with_head() {
        let s = store(12, 4);
        for msg in [b"a", b"b", b"c"] {
            s.append(msg).unwrap();
        }
        assert_eq!(
            s.cursors(),
            StoreCursors { head: 0, tail: 0, last_written: 2, count: 3 }
        );

        s.append(b"d").unwrap();
        assert_eq!(
            s.cursors(),
            StoreCursors { head: 1, tail: 1, last_written: 0, count: 3 }
        );
    }

    #[test]
    fn overwrite_clears_the_old_tail_bytes() {
        let s = store(8, 4);
        s.append(b"xyz").unwrap();
        s.append(b"abc").unwrap();
        s.append(b"q").unwrap();
        assert_eq!(s.entries(), vec![b"abc".to_vec(), b"q".to_vec()]);
    }

    #[test]
    fn collect_cuts_the_last_entry() {
        let s = store(32, 8);
        s.append(b"abc").unwrap();
        s.append(b"defg").unwrap();
        assert_eq!(s.read(5).unwrap(), b"abcde");
        assert_eq!(s.read(3).unwrap(), b"abc");
        assert_eq!(s.read(100).unwrap(), b"abcdefg");
    }
}
