use klog_ring::Core::transfer::{Sink, Source};
use klog_ring::{LogStore, StoreCursors, StoreError, TransferFault};

fn concat(messages: &[&[u8]]) -> Vec<u8> {
    messages.concat()
}

#[test]
fn create_validates_geometry() {
    assert!(LogStore::new(32, 8).is_ok());
    assert!(LogStore::new(2, 2).is_ok());

    for (total, slot) in [(32, 1), (32, 0), (0, 8), (33, 8), (8, 16)] {
        let err = LogStore::new(total, slot).unwrap_err();
        assert!(
            matches!(err, StoreError::InvalidArgument(_)),
            "({}, {}) gave {:?}",
            total,
            slot,
            err
        );
    }
}

#[test]
fn empty_store_reads_nothing() {
    let store = LogStore::new(32, 8).unwrap();
    assert_eq!(store.read(64).unwrap(), b"");
    assert!(store.entries().is_empty());
}

#[test]
fn zero_length_read_is_rejected() {
    let store = LogStore::new(32, 8).unwrap();
    assert!(matches!(store.read(0), Err(StoreError::InvalidArgument(_))));

    // rejected whether or not anything was written
    store.append(b"abc").unwrap();
    assert!(matches!(store.read(0), Err(StoreError::InvalidArgument(_))));
}

#[test]
fn five_into_four_evicts_the_first() {
    let store = LogStore::new(32, 8).unwrap();
    for msg in ["a", "b", "c", "d", "e"] {
        store.append(msg.as_bytes()).unwrap();
    }

    assert_eq!(store.len(), 4);
    assert!(store.is_full());
    assert_eq!(store.read(64).unwrap(), b"bcde");

    let cursors = store.cursors();
    assert_eq!(cursors.tail, 1, "tail names the slot holding \"b\"");
    assert_eq!(store.entries()[0], b"b");
    assert_eq!(
        cursors,
        StoreCursors {
            head: 1,
            tail: 1,
            last_written: 0,
            count: 4
        }
    );
}

#[test]
fn long_message_keeps_its_tail() {
    let store = LogStore::new(32, 8).unwrap();
    assert_eq!(store.append(b"01234567").unwrap(), 7);
    assert_eq!(store.read(64).unwrap(), b"1234567");
}

#[test]
fn truncation_boundaries() {
    let store = LogStore::new(32, 8).unwrap();
    assert_eq!(store.append(b"abcdefg").unwrap(), 7); // exactly M-1
    assert_eq!(store.append(b"abcdefgh").unwrap(), 7); // M, first byte dropped
    assert_eq!(store.append(b"the quick brown fox").unwrap(), 7);
    assert_eq!(store.append(b"").unwrap(), 0);

    assert_eq!(
        store.entries(),
        vec![
            b"abcdefg".to_vec(),
            b"bcdefgh".to_vec(),
            b"own fox".to_vec(),
            Vec::new(),
        ]
    );
}

#[test]
fn empty_messages_still_occupy_slots() {
    let store = LogStore::new(16, 4).unwrap();
    store.append(b"xyz").unwrap();
    store.append(b"").unwrap();
    store.append(b"").unwrap();
    store.append(b"").unwrap();

    assert_eq!(store.len(), 4);
    assert_eq!(store.read(16).unwrap(), b"xyz");

    // a fifth empty message evicts "xyz"; the ring holds only empty entries
    store.append(b"").unwrap();
    assert_eq!(store.len(), 4);
    assert_eq!(store.read(16).unwrap(), b"");
    assert_eq!(store.entries(), vec![Vec::<u8>::new(); 4]);
}

#[test]
fn eviction_keeps_exactly_the_last_n() {
    let mut rng = fastrand::Rng::with_seed(0x6b6c_6f67);
    let slots = 5;
    let store = LogStore::new(slots * 6, 6).unwrap();

    let mut appended: Vec<Vec<u8>> = Vec::new();
    for k in 0..3 * slots {
        let len = rng.usize(1..=5);
        let msg: Vec<u8> = (0..len).map(|_| rng.alphanumeric() as u8).collect();
        store.append(&msg).unwrap();
        appended.push(msg);

        let expected: Vec<&[u8]> = appended
            .iter()
            .skip(appended.len().saturating_sub(slots))
            .map(Vec::as_slice)
            .collect();
        assert_eq!(store.len(), (k + 1).min(slots));
        assert_eq!(store.read(1024).unwrap(), concat(&expected), "after {} appends", k + 1);
    }
}

#[test]
fn read_never_exceeds_max_bytes() {
    let store = LogStore::new(64, 8).unwrap();
    for msg in ["alpha", "beta", "gamma", "delta", "epsilon"] {
        store.append(msg.as_bytes()).unwrap();
    }
    let full = store.read(1024).unwrap();
    assert_eq!(full, b"alphabetagammadeltaepsilon");

    for max in 1..=full.len() + 4 {
        let out = store.read(max).unwrap();
        assert!(out.len() <= max);
        assert_eq!(out, &full[..max.min(full.len())]);
    }
}

#[test]
fn read_stops_at_the_newest_entry_after_wrap() {
    let store = LogStore::new(24, 8).unwrap();
    for i in 0..10 {
        store.append(format!("m{}", i).as_bytes()).unwrap();
    }
    let cursors = store.cursors();
    assert_eq!(cursors.last_written, 9 % 3);
    assert_eq!(cursors.tail, 10 % 3);
    assert_eq!(store.read(100).unwrap(), b"m7m8m9");
}

#[test]
fn read_into_a_short_sink_faults_without_side_effects() {
    let store = LogStore::new(32, 8).unwrap();
    store.append(b"abcd").unwrap();
    store.append(b"efgh").unwrap();
    let before = store.cursors();

    let mut small = [0u8; 4];
    let err = store.read_into(&mut small[..], 8).unwrap_err();
    assert_eq!(err, StoreError::TransferFault(TransferFault::new(0, 8)));
    assert_eq!(store.cursors(), before);

    let mut big = [0u8; 8];
    assert_eq!(store.read_into(&mut big[..], 8).unwrap(), 8);
    assert_eq!(&big, b"abcdefgh");
}

/// Source that faults on every copy.
struct FaultySource(usize);

impl Source for FaultySource {
    fn len(&self) -> usize {
        self.0
    }

    fn copy_out(&self, _offset: usize, dst: &mut [u8]) -> Result<(), TransferFault> {
        Err(TransferFault::new(0, dst.len()))
    }
}

/// Sink that faults on every copy.
struct FaultySink;

impl Sink for FaultySink {
    fn copy_in(&mut self, src: &[u8]) -> Result<(), TransferFault> {
        Err(TransferFault::new(0, src.len()))
    }
}

#[test]
fn faulting_source_commits_nothing() {
    let store = LogStore::new(16, 4).unwrap();
    for msg in ["a", "b", "c", "d"] {
        store.append(msg.as_bytes()).unwrap();
    }
    let before = store.cursors();

    let err = store.append_from(&FaultySource(3)).unwrap_err();
    assert!(matches!(err, StoreError::TransferFault(_)));
    assert_eq!(store.cursors(), before);
    assert_eq!(store.read(16).unwrap(), b"abcd");
}

#[test]
fn faulting_sink_leaves_the_store_readable() {
    let store = LogStore::new(16, 4).unwrap();
    store.append(b"abc").unwrap();

    assert!(store.read_into(&mut FaultySink, 16).is_err());
    // the read guard was released on the fault path
    store.append(b"def").unwrap();
    assert_eq!(store.read(16).unwrap(), b"abcdef");
}

#[test]
fn embedded_terminator_ends_the_entry() {
    let store = LogStore::new(16, 8).unwrap();
    store.append(b"ab\0cd").unwrap();
    assert_eq!(store.read(16).unwrap(), b"ab");
}

#[test]
fn debug_output_shows_cursors_not_bytes() {
    let store = LogStore::new(32, 8).unwrap();
    store.append(b"secret").unwrap();
    let rendered = format!("{:?}", store);
    assert!(rendered.contains("slot_count: 4"));
    assert!(rendered.contains("count: 1"));
    assert!(!rendered.contains("secret"));
}
