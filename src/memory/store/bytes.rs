/*!
 * Block Store Byte Access
 * Read/write operations on live blocks
 */

use super::BlockStore;
use crate::core::types::{Address, Size};
use crate::memory::types::{MemoryError, MemoryResult};

impl BlockStore {
    /// Write bytes into a live block at a byte offset.
    ///
    /// The write must fit within the block bounds.
    pub fn write_bytes(&self, address: Address, offset: Size, data: &[u8]) -> MemoryResult<()> {
        let size = self
            .block_size(address)
            .ok_or(MemoryError::InvalidAddress(address))?;
        let end = offset
            .checked_add(data.len())
            .filter(|end| *end <= size)
            .ok_or(MemoryError::InvalidAddress(address))?;

        let mut buf = self
            .data
            .entry(address)
            .or_insert_with(|| vec![0u8; size]);
        if buf.len() < size {
            buf.resize(size, 0u8);
        }
        buf[offset..end].copy_from_slice(data);

        Ok(())
    }

    /// Read bytes from a live block at a byte offset.
    ///
    /// Blocks that were never written read back as zeros.
    pub fn read_bytes(&self, address: Address, offset: Size, len: Size) -> MemoryResult<Vec<u8>> {
        let size = self
            .block_size(address)
            .ok_or(MemoryError::InvalidAddress(address))?;
        let end = offset
            .checked_add(len)
            .filter(|end| *end <= size)
            .ok_or(MemoryError::InvalidAddress(address))?;

        let out = match self.data.get(&address) {
            Some(buf) => buf
                .get(offset..end)
                .map(|bytes| bytes.to_vec())
                .unwrap_or_else(|| vec![0u8; len]),
            None => vec![0u8; len],
        };
        Ok(out)
    }
}
