/*!
 * String Batch Test
 * End-to-end consumer scenario: build strings in tracked blocks, then bulk
 * release at the end of the unit of work
 */

use memsweep::MemoryTracker;
use pretty_assertions::assert_eq;

/// Allocate a tracked block holding `text` plus a NUL terminator
fn string_init(tracker: &MemoryTracker, text: &[u8]) -> usize {
    let addr = tracker.allocate(text.len() + 1).unwrap();
    tracker.write_bytes(addr, 0, text).unwrap();
    tracker.write_bytes(addr, text.len(), &[0]).unwrap();
    addr
}

fn string_copy(tracker: &MemoryTracker, addr: usize, len: usize) -> usize {
    let bytes = tracker.read_bytes(addr, 0, len).unwrap();
    string_init(tracker, &bytes)
}

fn string_concat(tracker: &MemoryTracker, a: usize, a_len: usize, b: usize, b_len: usize) -> usize {
    let mut joined = tracker.read_bytes(a, 0, a_len).unwrap();
    joined.extend(tracker.read_bytes(b, 0, b_len).unwrap());
    string_init(tracker, &joined)
}

#[test]
fn test_string_unit_of_work_is_swept_in_bulk() {
    let tracker = MemoryTracker::new();

    let first = string_init(&tracker, b"valami");
    let second = string_copy(&tracker, first, 6);
    let third = string_concat(&tracker, first, 6, second, 6);

    // All three blocks are simultaneously tracked until the bulk release
    assert_eq!(tracker.tracked_count(), 3);
    assert_eq!(tracker.read_bytes(first, 0, 7).unwrap(), b"valami\0");
    assert_eq!(tracker.read_bytes(second, 0, 7).unwrap(), b"valami\0");
    assert_eq!(
        tracker.read_bytes(third, 0, 13).unwrap(),
        b"valamivalami\0"
    );

    tracker.release_all();
    assert_eq!(tracker.tracked_count(), 0);
    assert!(!tracker.is_valid(first));
    assert!(!tracker.is_valid(second));
    assert!(!tracker.is_valid(third));
}
