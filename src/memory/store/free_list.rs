/*!
 * Free List
 * Released addresses bucketed by former block size
 */

use crate::core::types::{Address, Size};
use std::collections::BTreeMap;

/// Size-bucketed free list for address recycling.
///
/// `take` returns the smallest slot whose former size covers the request, so
/// a recycled address always has room for the block being placed there.
#[derive(Debug, Default)]
pub(super) struct FreeList {
    by_size: BTreeMap<Size, Vec<Address>>,
    len: usize,
}

impl FreeList {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, size: Size, address: Address) {
        self.by_size.entry(size).or_default().push(address);
        self.len += 1;
    }

    /// Best-fit lookup: smallest bucket at least `size` bytes wide
    pub fn take(&mut self, size: Size) -> Option<(Size, Address)> {
        let slot = self.by_size.range(size..).next().map(|(s, _)| *s)?;
        let bucket = self.by_size.get_mut(&slot)?;
        let address = bucket.pop()?;
        if bucket.is_empty() {
            self.by_size.remove(&slot);
        }
        self.len -= 1;
        Some((slot, address))
    }

    pub fn len(&self) -> usize {
        self.len
    }
}

#[cfg(test)]
mod tests {
    use super::FreeList;

    #[test]
    fn best_fit_prefers_smallest_covering_slot() {
        let mut list = FreeList::new();
        list.insert(64, 0x1000);
        list.insert(256, 0x2000);
        list.insert(1024, 0x3000);

        let (slot, address) = list.take(100).unwrap();
        assert_eq!(slot, 256);
        assert_eq!(address, 0x2000);
        assert_eq!(list.len(), 2);
    }

    #[test]
    fn take_fails_when_no_slot_covers_request() {
        let mut list = FreeList::new();
        list.insert(64, 0x1000);
        assert!(list.take(65).is_none());
        assert_eq!(list.len(), 1);
    }

    #[test]
    fn empty_buckets_are_removed() {
        let mut list = FreeList::new();
        list.insert(64, 0x1000);
        assert!(list.take(64).is_some());
        assert!(list.take(1).is_none());
        assert_eq!(list.len(), 0);
    }
}
