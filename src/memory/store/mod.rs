/*!
 * Block Store
 * Simulated heap backing the tracker
 *
 * Hands out opaque addresses from a monotonically increasing cursor, keeps
 * per-block byte storage lazily, recycles released addresses through a
 * size-bucketed free list, and enforces a fixed pool capacity with OOM
 * reporting and pressure warnings.
 */

mod alloc;
mod bytes;
mod free_list;

use super::traits::{BlockAllocator, MemoryInfo};
use super::types::{Block, MemoryResult, MemoryStats};
use crate::core::limits::{DEFAULT_MEMORY_POOL, INITIAL_ADDRESS};
use crate::core::types::{Address, Size};
use ahash::RandomState;
use dashmap::DashMap;
use self::free_list::FreeList;
use log::info;
use parking_lot::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Simulated block store
pub struct BlockStore {
    blocks: DashMap<Address, Block, RandomState>,
    data: DashMap<Address, Vec<u8>, RandomState>,
    next_address: AtomicUsize,
    total_memory: Size,
    used_memory: AtomicUsize,
    free_list: Mutex<FreeList>,
}

impl BlockStore {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MEMORY_POOL)
    }

    /// Create a store with a custom pool capacity (useful for testing)
    pub fn with_capacity(total: Size) -> Self {
        info!(
            "Block store initialized with {} bytes and size-bucketed free list recycling",
            total
        );
        Self {
            blocks: DashMap::with_hasher(RandomState::new()),
            data: DashMap::with_hasher(RandomState::new()),
            next_address: AtomicUsize::new(INITIAL_ADDRESS),
            total_memory: total,
            used_memory: AtomicUsize::new(0),
            free_list: Mutex::new(FreeList::new()),
        }
    }

    /// Check if an address refers to a live block
    pub fn is_valid(&self, address: Address) -> bool {
        self.blocks.contains_key(&address)
    }

    /// Get the size of a live block if it exists
    pub fn block_size(&self, address: Address) -> Option<Size> {
        self.blocks.get(&address).map(|entry| entry.value().size)
    }

    /// Get overall memory info: (total, used, available).
    ///
    /// `used` can transiently overshoot the pool size while a concurrent
    /// OOM reverts its reservation, hence the saturating arithmetic.
    pub fn info(&self) -> (Size, Size, Size) {
        let used = self.used_memory.load(Ordering::SeqCst);
        (self.total_memory, used, self.total_memory.saturating_sub(used))
    }

    /// Get detailed memory statistics
    pub fn stats(&self) -> MemoryStats {
        let used = self.used_memory.load(Ordering::SeqCst);
        MemoryStats {
            total_memory: self.total_memory,
            used_memory: used,
            available_memory: self.total_memory.saturating_sub(used),
            usage_percentage: (used as f64 / self.total_memory as f64) * 100.0,
            live_blocks: self.blocks.len(),
            recyclable_blocks: self.free_list.lock().len(),
        }
    }
}

impl Default for BlockStore {
    fn default() -> Self {
        Self::new()
    }
}

// Trait interfaces delegate to the inherent implementations
impl BlockAllocator for BlockStore {
    fn allocate(&self, size: Size) -> MemoryResult<Address> {
        BlockStore::allocate(self, size)
    }

    fn allocate_zeroed(&self, count: Size, unit: Size) -> MemoryResult<Address> {
        BlockStore::allocate_zeroed(self, count, unit)
    }

    fn reallocate(&self, address: Address, new_size: Size) -> MemoryResult<Address> {
        BlockStore::reallocate(self, address, new_size)
    }

    fn release(&self, address: Address) -> MemoryResult<()> {
        BlockStore::release(self, address)
    }

    fn is_valid(&self, address: Address) -> bool {
        BlockStore::is_valid(self, address)
    }

    fn block_size(&self, address: Address) -> Option<Size> {
        BlockStore::block_size(self, address)
    }

    fn write_bytes(&self, address: Address, offset: Size, data: &[u8]) -> MemoryResult<()> {
        BlockStore::write_bytes(self, address, offset, data)
    }

    fn read_bytes(&self, address: Address, offset: Size, len: Size) -> MemoryResult<Vec<u8>> {
        BlockStore::read_bytes(self, address, offset, len)
    }
}

impl MemoryInfo for BlockStore {
    fn stats(&self) -> MemoryStats {
        BlockStore::stats(self)
    }

    fn info(&self) -> (Size, Size, Size) {
        BlockStore::info(self)
    }
}
