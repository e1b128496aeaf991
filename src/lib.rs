/*!
 * MemSweep Library
 * Semi-automatic allocation tracking exposed as a library
 *
 * Blocks obtained through a [`MemoryTracker`] are recorded in the registry of
 * the currently selected instance, so a single bulk-release call reclaims
 * every block issued since the last purge. Individual blocks can still be
 * released early, resized, or adopted from the backing store.
 */

pub mod core;
pub mod memory;
pub mod registry;
pub mod tracker;

// Re-exports
pub use memory::{
    Backend, Block, BlockAllocator, BlockStore, MemoryError, MemoryInfo, MemoryPressure,
    MemoryResult, MemoryStats,
};
pub use registry::{InstanceSpace, Registry};
pub use tracker::{global, MemoryTracker};
