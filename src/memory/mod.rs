/*!
 * Memory
 * Simulated block store, allocator trait seam, and common memory types
 */

mod store;
pub mod traits;
pub mod types;

pub use store::BlockStore;
pub use traits::{Backend, BlockAllocator, MemoryInfo};
pub use types::{Block, MemoryError, MemoryPressure, MemoryResult, MemoryStats};
