/*!
 * Registry
 * Live-sets of tracked block handles, partitioned into instances
 */

mod space;

pub use space::InstanceSpace;

use crate::core::types::Address;
use crate::memory::types::{MemoryError, MemoryResult};
use ahash::RandomState;
use std::collections::HashSet;

/// Live-set of block handles for one instance.
///
/// Handles are compared by identity only. A handle appears at most once here
/// and in at most one registry overall; duplicate registration is rejected
/// instead of silently absorbed.
#[derive(Debug, Default)]
pub struct Registry {
    handles: HashSet<Address, RandomState>,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Track a handle. Fails if the handle is already tracked here.
    pub fn insert(&mut self, address: Address) -> MemoryResult<()> {
        if !self.handles.insert(address) {
            return Err(MemoryError::AlreadyTracked(address));
        }
        Ok(())
    }

    /// Stop tracking a handle. Returns whether it was tracked.
    ///
    /// Does not release the underlying block.
    pub fn remove(&mut self, address: Address) -> bool {
        self.handles.remove(&address)
    }

    pub fn contains(&self, address: Address) -> bool {
        self.handles.contains(&address)
    }

    /// Empty the registry, handing back every tracked handle for release
    pub fn drain(&mut self) -> Vec<Address> {
        self.handles.drain().collect()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }
}
