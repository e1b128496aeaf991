/*!
 * Block Store Allocation
 * Allocation, release and resize logic
 */

use super::BlockStore;
use crate::core::limits::{CRITICAL_THRESHOLD, MEDIUM_THRESHOLD, WARNING_THRESHOLD};
use crate::core::types::{Address, Size};
use crate::memory::types::{Block, MemoryError, MemoryPressure, MemoryResult};
use log::{error, info, warn};
use std::sync::atomic::Ordering;

impl BlockStore {
    /// Allocate a block of `size` bytes with graceful OOM handling and
    /// address recycling
    pub fn allocate(&self, size: Size) -> MemoryResult<Address> {
        // Reserve the bytes atomically; revert on overshoot
        let used = self.used_memory.fetch_add(size, Ordering::SeqCst);
        if used + size > self.total_memory {
            self.used_memory.fetch_sub(size, Ordering::SeqCst);

            // Another thread's not-yet-reverted overshoot can leave
            // `used` transiently above the pool size
            let available = self.total_memory.saturating_sub(used);
            error!(
                "OOM: requested {} bytes, only {} bytes available ({} used / {} total)",
                size, available, used, self.total_memory
            );

            return Err(MemoryError::OutOfMemory {
                requested: size,
                available,
                used,
                total: self.total_memory,
            });
        }

        let address = self.take_address(size);
        self.blocks.insert(address, Block::new(address, size));

        let used_now = used + size;
        if let Some(level) = self.check_pressure(used_now) {
            warn!(
                "Memory pressure {}: allocated {} bytes at 0x{:x} ({:.1}% used: {} / {})",
                level,
                size,
                address,
                (used_now as f64 / self.total_memory as f64) * 100.0,
                used_now,
                self.total_memory
            );
        } else {
            info!("Allocated {} bytes at 0x{:x}", size, address);
        }

        Ok(address)
    }

    /// Allocate `count * unit` bytes, zero-filled.
    ///
    /// Unwritten blocks already read back as zeros; the eager buffer makes
    /// the calloc-style contract explicit for size queries on the data map.
    pub fn allocate_zeroed(&self, count: Size, unit: Size) -> MemoryResult<Address> {
        let total = count
            .checked_mul(unit)
            .ok_or(MemoryError::SizeOverflow { count, unit })?;

        let address = self.allocate(total)?;
        if total > 0 {
            self.data.insert(address, vec![0u8; total]);
        }
        Ok(address)
    }

    /// Release a block back to the store and queue its address for recycling
    pub fn release(&self, address: Address) -> MemoryResult<()> {
        match self.blocks.remove(&address) {
            Some((_, block)) => {
                self.data.remove(&address);
                self.used_memory.fetch_sub(block.size, Ordering::SeqCst);
                self.free_list.lock().insert(block.size, address);

                info!(
                    "Released {} bytes at 0x{:x}, address queued for recycling",
                    block.size, address
                );
                Ok(())
            }
            None => {
                warn!(
                    "Attempted to release invalid or already freed address 0x{:x}",
                    address
                );
                Err(MemoryError::InvalidAddress(address))
            }
        }
    }

    /// Resize a block. Shrinking happens in place; growing relocates the
    /// block to a fresh address and moves its bytes.
    ///
    /// On failure the original block stays valid and untouched.
    pub fn reallocate(&self, address: Address, new_size: Size) -> MemoryResult<Address> {
        let old_size = self
            .blocks
            .get(&address)
            .map(|entry| entry.value().size)
            .ok_or(MemoryError::InvalidAddress(address))?;

        if new_size <= old_size {
            if let Some(mut entry) = self.blocks.get_mut(&address) {
                entry.value_mut().size = new_size;
            }
            if let Some(mut buf) = self.data.get_mut(&address) {
                buf.value_mut().truncate(new_size);
            }
            self.used_memory
                .fetch_sub(old_size - new_size, Ordering::SeqCst);

            info!(
                "Resized block 0x{:x} in place: {} -> {} bytes",
                address, old_size, new_size
            );
            return Ok(address);
        }

        // Reserve the extra bytes before touching the block so a failed
        // grow leaves the original registration and contents intact
        let delta = new_size - old_size;
        let used = self.used_memory.fetch_add(delta, Ordering::SeqCst);
        if used + delta > self.total_memory {
            self.used_memory.fetch_sub(delta, Ordering::SeqCst);

            let available = self.total_memory.saturating_sub(used);
            error!(
                "OOM on resize of 0x{:x}: needed {} more bytes, only {} available",
                address, delta, available
            );

            return Err(MemoryError::OutOfMemory {
                requested: delta,
                available,
                used,
                total: self.total_memory,
            });
        }

        let new_address = self.take_address(new_size);
        if let Some((_, mut buf)) = self.data.remove(&address) {
            buf.resize(new_size, 0u8);
            self.data.insert(new_address, buf);
        }
        self.blocks.remove(&address);
        self.blocks.insert(new_address, Block::new(new_address, new_size));
        self.free_list.lock().insert(old_size, address);

        info!(
            "Relocated block 0x{:x} -> 0x{:x} ({} -> {} bytes)",
            address, new_address, old_size, new_size
        );
        Ok(new_address)
    }

    /// Pick an address for a new block, preferring recycled slots
    fn take_address(&self, size: Size) -> Address {
        {
            let mut free_list = self.free_list.lock();
            if let Some((slot, address)) = free_list.take(size) {
                // A write that lost the race with release can leave bytes
                // keyed by a freed address; the recycled block must read
                // back zeroed
                self.data.remove(&address);
                info!(
                    "Recycled address 0x{:x} (slot size {}, requested {})",
                    address, slot, size
                );
                return address;
            }
        }

        // Zero-sized blocks still advance the cursor so every handle stays
        // distinct
        self.next_address.fetch_add(size.max(1), Ordering::SeqCst)
    }

    fn check_pressure(&self, used: Size) -> Option<MemoryPressure> {
        let usage_ratio = used as f64 / self.total_memory as f64;

        if usage_ratio >= CRITICAL_THRESHOLD {
            Some(MemoryPressure::Critical)
        } else if usage_ratio >= WARNING_THRESHOLD {
            Some(MemoryPressure::High)
        } else if usage_ratio >= MEDIUM_THRESHOLD {
            Some(MemoryPressure::Medium)
        } else {
            None
        }
    }
}
