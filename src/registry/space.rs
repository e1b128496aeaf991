/*!
 * Instance Space
 * Fixed-capacity table of registries routed by a current-instance index
 */

use super::Registry;
use crate::core::limits::DEFAULT_INSTANCE_CAPACITY;
use crate::core::types::{Address, InstanceId};
use crate::memory::types::{MemoryError, MemoryResult};
use ahash::RandomState;
use dashmap::DashMap;
use log::info;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Namespace isolation for independent registries.
///
/// Registries are created lazily the first time their index is touched. The
/// current index is shared by every caller of the owning tracker; it is
/// always within `[0, capacity)`.
pub struct InstanceSpace {
    registries: DashMap<InstanceId, Registry, RandomState>,
    current: AtomicUsize,
    capacity: usize,
}

impl InstanceSpace {
    /// Create a space with `capacity` selectable instances.
    ///
    /// `capacity` must be nonzero: index 0 is the default instance.
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "instance capacity must be nonzero");
        Self {
            registries: DashMap::with_hasher(RandomState::new()),
            current: AtomicUsize::new(0),
            capacity,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Route subsequent operations to instance `index`.
    ///
    /// Out-of-range indices are rejected and leave the selection unchanged.
    pub fn select(&self, index: InstanceId) -> MemoryResult<()> {
        if index >= self.capacity {
            return Err(MemoryError::InvalidInstance {
                index,
                capacity: self.capacity,
            });
        }
        self.current.store(index, Ordering::SeqCst);
        Ok(())
    }

    /// Currently selected instance index
    pub fn current(&self) -> InstanceId {
        self.current.load(Ordering::SeqCst)
    }

    /// Track a handle in the current registry
    pub fn insert_current(&self, address: Address) -> MemoryResult<()> {
        self.registries
            .entry(self.current())
            .or_default()
            .insert(address)
    }

    /// Stop tracking a handle in the current registry
    pub fn remove_current(&self, address: Address) -> bool {
        self.registries
            .get_mut(&self.current())
            .map(|mut registry| registry.remove(address))
            .unwrap_or(false)
    }

    /// Find which instance tracks a handle, if any
    pub fn tracked_in(&self, address: Address) -> Option<InstanceId> {
        self.registries
            .iter()
            .find(|entry| entry.value().contains(address))
            .map(|entry| *entry.key())
    }

    /// Number of handles tracked by instance `index`
    pub fn len_of(&self, index: InstanceId) -> MemoryResult<usize> {
        if index >= self.capacity {
            return Err(MemoryError::InvalidInstance {
                index,
                capacity: self.capacity,
            });
        }
        Ok(self
            .registries
            .get(&index)
            .map(|registry| registry.len())
            .unwrap_or(0))
    }

    /// Number of handles tracked by the current instance
    pub fn len_current(&self) -> usize {
        self.registries
            .get(&self.current())
            .map(|registry| registry.len())
            .unwrap_or(0)
    }

    /// Empty the current registry, handing back its handles for release
    pub fn drain_current(&self) -> Vec<Address> {
        let index = self.current();
        let drained = self
            .registries
            .get_mut(&index)
            .map(|mut registry| registry.drain())
            .unwrap_or_default();

        if !drained.is_empty() {
            info!(
                "Drained {} tracked handles from instance {}",
                drained.len(),
                index
            );
        }
        drained
    }

    /// Empty every registry and reset the current index to 0
    pub fn drain_all(&self) -> Vec<Address> {
        let mut drained = Vec::new();
        for mut entry in self.registries.iter_mut() {
            drained.append(&mut entry.value_mut().drain());
        }
        self.current.store(0, Ordering::SeqCst);

        if !drained.is_empty() {
            info!(
                "Drained {} tracked handles from all instances, selection reset to 0",
                drained.len()
            );
        }
        drained
    }
}

impl Default for InstanceSpace {
    fn default() -> Self {
        Self::new(DEFAULT_INSTANCE_CAPACITY)
    }
}
