/*!
 * Memory Traits
 * Backing-store abstractions the tracker routes through
 */

use super::types::*;
use crate::core::types::{Address, Size};

/// Block allocator interface: the "underlying allocator" the tracker wraps.
///
/// Addresses returned here are opaque handles; the registry layer compares
/// them by identity only.
pub trait BlockAllocator: Send + Sync {
    /// Allocate a block of `size` bytes
    fn allocate(&self, size: Size) -> MemoryResult<Address>;

    /// Allocate `count * unit` bytes, zero-filled
    fn allocate_zeroed(&self, count: Size, unit: Size) -> MemoryResult<Address>;

    /// Resize a block, relocating it when it cannot grow in place.
    ///
    /// On failure the original block is left valid and untouched.
    fn reallocate(&self, address: Address, new_size: Size) -> MemoryResult<Address>;

    /// Release a block back to the store
    fn release(&self, address: Address) -> MemoryResult<()>;

    /// Check whether an address refers to a live block
    fn is_valid(&self, address: Address) -> bool;

    /// Size of a live block, if any
    fn block_size(&self, address: Address) -> Option<Size>;

    /// Write into a live block at a byte offset
    fn write_bytes(&self, address: Address, offset: Size, data: &[u8]) -> MemoryResult<()>;

    /// Read from a live block at a byte offset
    fn read_bytes(&self, address: Address, offset: Size, len: Size) -> MemoryResult<Vec<u8>>;
}

/// Memory statistics provider
pub trait MemoryInfo: Send + Sync {
    /// Get overall memory statistics
    fn stats(&self) -> MemoryStats;

    /// Get memory info as (total, used, available)
    fn info(&self) -> (Size, Size, Size);

    /// Get memory pressure level
    fn pressure(&self) -> MemoryPressure {
        self.stats().memory_pressure()
    }
}

/// Full backend contract the tracker holds behind a trait object
pub trait Backend: BlockAllocator + MemoryInfo {}

/// Implement Backend for types that implement both halves
impl<T> Backend for T where T: BlockAllocator + MemoryInfo {}
