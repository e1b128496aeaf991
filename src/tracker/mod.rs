/*!
 * Memory Tracker
 * The semi-automatic allocation contract
 *
 * Every operation routes through the registry selected by the current
 * instance at call time. Blocks obtained here are released in bulk by
 * [`MemoryTracker::release_all`] / [`MemoryTracker::release_instance`], on
 * drop, or individually by [`MemoryTracker::release_one`].
 */

mod global;

pub use global::global;

use crate::core::limits::DEFAULT_INSTANCE_CAPACITY;
use crate::core::types::{Address, InstanceId, Size};
use crate::memory::traits::Backend;
use crate::memory::types::{MemoryError, MemoryResult, MemoryStats};
use crate::memory::BlockStore;
use crate::registry::InstanceSpace;
use log::{info, warn};
use std::sync::{Arc, Once};

/// Semi-automatic allocation tracker.
///
/// An explicit context object: callers thread a reference through their code
/// instead of relying on ambient global state. The [`global`] accessor
/// provides the ambient mode for callers that want the original ergonomics,
/// including an exit-time purge.
pub struct MemoryTracker {
    store: Arc<dyn Backend>,
    space: InstanceSpace,
    first_register: Once,
    on_first_register: Option<fn()>,
}

impl MemoryTracker {
    pub fn new() -> Self {
        Self::with_backend(Arc::new(BlockStore::new()))
    }

    /// Tracker over a store with a custom pool capacity (useful for testing)
    pub fn with_capacity(total: Size) -> Self {
        Self::with_backend(Arc::new(BlockStore::with_capacity(total)))
    }

    /// Tracker over a caller-supplied backend
    pub fn with_backend(store: Arc<dyn Backend>) -> Self {
        Self {
            store,
            space: InstanceSpace::new(DEFAULT_INSTANCE_CAPACITY),
            first_register: Once::new(),
            on_first_register: None,
        }
    }

    /// Replace the instance table. Configure before first use: any handles
    /// already tracked are forgotten, not released.
    pub fn with_instance_capacity(mut self, capacity: usize) -> Self {
        self.space = InstanceSpace::new(capacity);
        self
    }

    /// Run `hook` exactly once, on the first successful registration
    pub(crate) fn with_first_register_hook(mut self, hook: fn()) -> Self {
        self.on_first_register = Some(hook);
        self
    }

    fn note_registration(&self) {
        if let Some(hook) = self.on_first_register {
            self.first_register.call_once(hook);
        }
    }

    /// Allocate a block and track it in the current instance.
    ///
    /// On failure nothing stays allocated and nothing is registered.
    pub fn allocate(&self, size: Size) -> MemoryResult<Address> {
        let address = self.store.allocate(size)?;
        self.track_new(address)?;
        Ok(address)
    }

    /// Allocate `count * unit` zero-filled bytes and track the block
    pub fn allocate_zeroed(&self, count: Size, unit: Size) -> MemoryResult<Address> {
        let address = self.store.allocate_zeroed(count, unit)?;
        self.track_new(address)?;
        Ok(address)
    }

    /// Register a freshly obtained block, rolling it back to the store when
    /// registration fails so no partially tracked block stays live.
    ///
    /// Registration can fail when a stale registry entry still names a
    /// recycled address (a relocated block whose old handle was tracked by
    /// a different instance).
    fn track_new(&self, address: Address) -> MemoryResult<()> {
        if let Err(err) = self.space.insert_current(address) {
            if let Err(release_err) = self.store.release(address) {
                warn!(
                    "Rollback of unregistered block 0x{:x} failed: {}",
                    address, release_err
                );
            }
            return Err(err);
        }
        self.note_registration();
        Ok(())
    }

    /// Resize a block. When the store relocates it, the old handle is
    /// dropped from the current registry and the new one tracked in its
    /// place, leaving the registry size unchanged. An in-place resize leaves
    /// the registry untouched.
    ///
    /// On failure the original block and its registration are untouched.
    pub fn resize(&self, address: Address, new_size: Size) -> MemoryResult<Address> {
        let new_address = self.store.reallocate(address, new_size)?;
        if new_address != address {
            self.space.remove_current(address);
            match self.space.insert_current(new_address) {
                Ok(()) => {}
                // The store has already moved the block, so failing here
                // would strand it. A stale entry naming the recycled
                // address means the handle is tracked either way.
                Err(MemoryError::AlreadyTracked(_)) => {
                    warn!(
                        "Relocated block 0x{:x} was already named by a stale entry in instance {}",
                        new_address,
                        self.space.current()
                    );
                }
                Err(err) => return Err(err),
            }
            self.note_registration();
        }
        Ok(new_address)
    }

    /// Track a block the caller obtained from the backend directly, so later
    /// purges sweep it. No allocation is performed.
    pub fn adopt(&self, address: Address) -> MemoryResult<()> {
        if !self.store.is_valid(address) {
            return Err(MemoryError::InvalidAddress(address));
        }
        // A handle lives in at most one registry at a time
        if let Some(instance) = self.space.tracked_in(address) {
            warn!(
                "Refusing to adopt 0x{:x}: already tracked by instance {}",
                address, instance
            );
            return Err(MemoryError::AlreadyTracked(address));
        }
        self.space.insert_current(address)?;
        self.note_registration();
        Ok(())
    }

    /// Release one tracked block immediately and stop tracking it.
    ///
    /// Intended for occasional early release; purging the instance is the
    /// primary release path.
    pub fn release_one(&self, address: Address) -> MemoryResult<()> {
        if !self.space.remove_current(address) {
            return Err(MemoryError::NotTracked(address));
        }
        self.store.release(address)
    }

    /// Route subsequent operations to instance `index`
    pub fn select_instance(&self, index: InstanceId) -> MemoryResult<()> {
        self.space.select(index)
    }

    /// Currently selected instance index
    pub fn current_instance(&self) -> InstanceId {
        self.space.current()
    }

    /// Release every block tracked by the current instance. Returns the
    /// number of bytes freed.
    pub fn release_instance(&self) -> Size {
        let instance = self.space.current();
        let freed = self.release_handles(self.space.drain_current());
        if freed > 0 {
            info!("Purged instance {}: {} bytes freed", instance, freed);
        }
        freed
    }

    /// Release every block in every instance and reset the selection to 0.
    /// Safe to call repeatedly. Returns the number of bytes freed.
    pub fn release_all(&self) -> Size {
        let freed = self.release_handles(self.space.drain_all());
        if freed > 0 {
            info!("Purged all instances: {} bytes freed", freed);
        }
        freed
    }

    fn release_handles(&self, handles: Vec<Address>) -> Size {
        let mut freed = 0;
        for address in handles {
            let size = self.store.block_size(address).unwrap_or(0);
            match self.store.release(address) {
                Ok(()) => freed += size,
                // Registry and store disagree: the block escaped through the
                // backend. Keep purging the rest.
                Err(err) => warn!("Purge could not release 0x{:x}: {}", address, err),
            }
        }
        freed
    }

    /// Number of handles tracked by the current instance
    pub fn tracked_count(&self) -> usize {
        self.space.len_current()
    }

    /// Number of handles tracked by instance `index`
    pub fn tracked_count_in(&self, index: InstanceId) -> MemoryResult<usize> {
        self.space.len_of(index)
    }

    /// Check whether an address refers to a live block in the backend
    pub fn is_valid(&self, address: Address) -> bool {
        self.store.is_valid(address)
    }

    /// Backend statistics
    pub fn stats(&self) -> MemoryStats {
        self.store.stats()
    }

    /// Backend memory info: (total, used, available)
    pub fn info(&self) -> (Size, Size, Size) {
        self.store.info()
    }

    /// Write into a tracked or backend-owned block
    pub fn write_bytes(&self, address: Address, offset: Size, data: &[u8]) -> MemoryResult<()> {
        self.store.write_bytes(address, offset, data)
    }

    /// Read from a tracked or backend-owned block
    pub fn read_bytes(&self, address: Address, offset: Size, len: Size) -> MemoryResult<Vec<u8>> {
        self.store.read_bytes(address, offset, len)
    }
}

impl Default for MemoryTracker {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for MemoryTracker {
    fn drop(&mut self) {
        self.release_all();
    }
}
