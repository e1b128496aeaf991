/*!
 * Block Store Tests
 * OOM handling, address recycling and byte access on the simulated heap
 */

use memsweep::memory::{BlockStore, MemoryError};
use pretty_assertions::assert_eq;
use std::sync::Arc;

#[test]
fn test_store_initialization() {
    let store = BlockStore::with_capacity(1024 * 1024);
    let (total, used, available) = store.info();

    assert_eq!(total, 1024 * 1024);
    assert_eq!(used, 0);
    assert_eq!(available, total);
}

#[test]
fn test_addresses_are_distinct() {
    let store = BlockStore::new();

    let a = store.allocate(1024).unwrap();
    let b = store.allocate(2048).unwrap();
    let c = store.allocate(0).unwrap();
    let d = store.allocate(0).unwrap();

    assert_ne!(a, b);
    assert_ne!(c, d);

    let (_, used, _) = store.info();
    assert_eq!(used, 1024 + 2048);
}

#[test]
fn test_out_of_memory_reporting() {
    let store = BlockStore::with_capacity(4096);

    store.allocate(3000).unwrap();
    let result = store.allocate(2000);

    match result {
        Err(MemoryError::OutOfMemory {
            requested,
            available,
            used,
            total,
        }) => {
            assert_eq!(requested, 2000);
            assert_eq!(available, 1096);
            assert_eq!(used, 3000);
            assert_eq!(total, 4096);
        }
        other => panic!("Expected OutOfMemory, got {:?}", other),
    }
}

#[test]
fn test_release_recycles_address() {
    let store = BlockStore::new();

    let a = store.allocate(1024).unwrap();
    store.release(a).unwrap();
    assert_eq!(store.stats().recyclable_blocks, 1);

    // Next allocation of the same size reuses the slot
    let b = store.allocate(1024).unwrap();
    assert_eq!(b, a);
    assert_eq!(store.stats().recyclable_blocks, 0);
}

#[test]
fn test_recycled_block_reads_back_zeroed() {
    let store = BlockStore::new();

    let a = store.allocate(64).unwrap();
    store.write_bytes(a, 0, &[0xff; 64]).unwrap();
    store.release(a).unwrap();

    let b = store.allocate(64).unwrap();
    assert_eq!(b, a);
    assert_eq!(store.read_bytes(b, 0, 64).unwrap(), vec![0u8; 64]);
}

#[test]
fn test_double_release_is_an_error() {
    let store = BlockStore::new();

    let a = store.allocate(128).unwrap();
    store.release(a).unwrap();
    assert_eq!(store.release(a), Err(MemoryError::InvalidAddress(a)));
}

#[test]
fn test_release_unknown_address_is_an_error() {
    let store = BlockStore::new();
    assert_eq!(
        store.release(0xdead_beef),
        Err(MemoryError::InvalidAddress(0xdead_beef))
    );
}

#[test]
fn test_write_and_read_with_offsets() {
    let store = BlockStore::new();

    let a = store.allocate(16).unwrap();
    store.write_bytes(a, 4, b"abcd").unwrap();

    assert_eq!(store.read_bytes(a, 0, 4).unwrap(), vec![0u8; 4]);
    assert_eq!(store.read_bytes(a, 4, 4).unwrap(), b"abcd");
}

#[test]
fn test_out_of_bounds_access_is_rejected() {
    let store = BlockStore::new();

    let a = store.allocate(8).unwrap();
    assert_eq!(
        store.write_bytes(a, 4, b"too long"),
        Err(MemoryError::InvalidAddress(a))
    );
    assert_eq!(
        store.read_bytes(a, 0, 9),
        Err(MemoryError::InvalidAddress(a))
    );
}

#[test]
fn test_shrink_then_read_respects_new_bounds() {
    let store = BlockStore::new();

    let a = store.allocate(16).unwrap();
    store.write_bytes(a, 0, b"0123456789abcdef").unwrap();

    let same = store.reallocate(a, 4).unwrap();
    assert_eq!(same, a);
    assert_eq!(store.block_size(a), Some(4));
    assert_eq!(store.read_bytes(a, 0, 4).unwrap(), b"0123");
    assert!(store.read_bytes(a, 0, 5).is_err());
}

#[test]
fn test_grow_relocates_and_frees_old_slot() {
    let store = BlockStore::new();

    let a = store.allocate(32).unwrap();
    store.write_bytes(a, 0, b"moved").unwrap();

    let b = store.reallocate(a, 64).unwrap();
    assert_ne!(b, a);
    assert!(!store.is_valid(a));
    assert_eq!(store.read_bytes(b, 0, 5).unwrap(), b"moved");
    // Grown region is zero-filled
    assert_eq!(store.read_bytes(b, 32, 32).unwrap(), vec![0u8; 32]);

    let (_, used, _) = store.info();
    assert_eq!(used, 64);
    assert_eq!(store.stats().recyclable_blocks, 1);
}

#[test]
fn test_reallocate_unknown_address_is_an_error() {
    let store = BlockStore::new();
    assert_eq!(
        store.reallocate(0x9999, 64),
        Err(MemoryError::InvalidAddress(0x9999))
    );
}

#[test]
fn test_zeroed_allocation_tracks_usage() {
    let store = BlockStore::new();

    let a = store.allocate_zeroed(4, 16).unwrap();
    assert_eq!(store.block_size(a), Some(64));
    assert_eq!(store.read_bytes(a, 0, 64).unwrap(), vec![0u8; 64]);
}

#[test]
fn test_concurrent_allocations() {
    use std::thread;

    let store = Arc::new(BlockStore::new());
    let mut handles = vec![];

    for _ in 0..10 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            store.allocate(1024).unwrap();
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let (_, used, _) = store.info();
    assert_eq!(used, 10 * 1024);
    assert_eq!(store.stats().live_blocks, 10);
}

#[test]
fn test_stats_pressure_levels() {
    let store = BlockStore::with_capacity(1000);

    store.allocate(650).unwrap();
    assert_eq!(
        store.stats().memory_pressure(),
        memsweep::memory::MemoryPressure::Medium
    );

    store.allocate(200).unwrap();
    let stats = store.stats();
    assert!(stats.usage_percentage > 80.0);
    assert_eq!(
        stats.memory_pressure(),
        memsweep::memory::MemoryPressure::High
    );
}

#[test]
fn test_concurrent_oom_attempts_do_not_panic() {
    use std::thread;

    // Several oversized reservations can be in flight at once, pushing the
    // used counter transiently past the pool size while they revert
    let store = Arc::new(BlockStore::with_capacity(1000));
    let mut handles = vec![];

    for _ in 0..8 {
        let store = Arc::clone(&store);
        handles.push(thread::spawn(move || {
            for _ in 0..100 {
                let _ = store.allocate(900);
                let _ = store.info();
                if let Ok(addr) = store.allocate(900) {
                    store.release(addr).unwrap();
                }
            }
        }));
    }
    for handle in handles {
        handle.join().unwrap();
    }

    let (total, _, available) = store.info();
    assert!(available <= total);
}
