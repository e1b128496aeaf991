/*!
 * Test Helpers
 * Counting backend for leak/double-free verification
 */

use memsweep::core::types::{Address, Size};
use memsweep::memory::{BlockAllocator, BlockStore, MemoryInfo, MemoryResult, MemoryStats};
use std::sync::atomic::{AtomicI64, Ordering};

/// Backend wrapper that counts live blocks.
///
/// Every allocation increments the counter, every successful release
/// decrements it. After a full purge the counter must read zero: a positive
/// value is a leak, a negative one a double free.
#[derive(Default)]
pub struct CountingBackend {
    inner: BlockStore,
    live: AtomicI64,
}

impl CountingBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn live(&self) -> i64 {
        self.live.load(Ordering::SeqCst)
    }
}

impl BlockAllocator for CountingBackend {
    fn allocate(&self, size: Size) -> MemoryResult<Address> {
        let address = self.inner.allocate(size)?;
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(address)
    }

    fn allocate_zeroed(&self, count: Size, unit: Size) -> MemoryResult<Address> {
        let address = self.inner.allocate_zeroed(count, unit)?;
        self.live.fetch_add(1, Ordering::SeqCst);
        Ok(address)
    }

    fn reallocate(&self, address: Address, new_size: Size) -> MemoryResult<Address> {
        // Relocation swaps one live block for another; the count is unchanged
        self.inner.reallocate(address, new_size)
    }

    fn release(&self, address: Address) -> MemoryResult<()> {
        self.inner.release(address)?;
        self.live.fetch_sub(1, Ordering::SeqCst);
        Ok(())
    }

    fn is_valid(&self, address: Address) -> bool {
        self.inner.is_valid(address)
    }

    fn block_size(&self, address: Address) -> Option<Size> {
        self.inner.block_size(address)
    }

    fn write_bytes(&self, address: Address, offset: Size, data: &[u8]) -> MemoryResult<()> {
        self.inner.write_bytes(address, offset, data)
    }

    fn read_bytes(&self, address: Address, offset: Size, len: Size) -> MemoryResult<Vec<u8>> {
        self.inner.read_bytes(address, offset, len)
    }
}

impl MemoryInfo for CountingBackend {
    fn stats(&self) -> MemoryStats {
        self.inner.stats()
    }

    fn info(&self) -> (Size, Size, Size) {
        self.inner.info()
    }
}
