/*!
 * Memory Types
 * Common types for block allocation and tracking
 */

use crate::core::types::{Address, Size};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Memory operation result
pub type MemoryResult<T> = Result<T, MemoryError>;

/// Memory errors
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryError {
    #[error("Out of memory: requested {requested} bytes, available {available} bytes ({used} used / {total} total)")]
    OutOfMemory {
        requested: usize,
        available: usize,
        used: usize,
        total: usize,
    },

    #[error("Allocation size overflow: {count} elements of {unit} bytes")]
    SizeOverflow { count: usize, unit: usize },

    #[error("Invalid block address: 0x{0:x}")]
    InvalidAddress(Address),

    #[error("Invalid instance index {index}, capacity is {capacity}")]
    InvalidInstance { index: usize, capacity: usize },

    #[error("Block 0x{0:x} is already tracked")]
    AlreadyTracked(Address),

    #[error("Block 0x{0:x} is not tracked by the active instance")]
    NotTracked(Address),
}

/// Block metadata held by the store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Block {
    pub address: Address,
    pub size: Size,
}

impl Block {
    pub fn new(address: Address, size: Size) -> Self {
        Self { address, size }
    }
}

/// Store-wide memory statistics
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MemoryStats {
    pub total_memory: usize,
    pub used_memory: usize,
    pub available_memory: usize,
    pub usage_percentage: f64,
    /// Blocks currently owned by callers
    pub live_blocks: usize,
    /// Released addresses waiting in the free list for recycling
    pub recyclable_blocks: usize,
}

impl MemoryStats {
    pub fn memory_pressure(&self) -> MemoryPressure {
        if self.usage_percentage >= 95.0 {
            MemoryPressure::Critical
        } else if self.usage_percentage >= 80.0 {
            MemoryPressure::High
        } else if self.usage_percentage >= 60.0 {
            MemoryPressure::Medium
        } else {
            MemoryPressure::Low
        }
    }
}

/// Memory pressure levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum MemoryPressure {
    Low,
    Medium,
    High,
    Critical,
}

impl std::fmt::Display for MemoryPressure {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MemoryPressure::Low => write!(f, "LOW"),
            MemoryPressure::Medium => write!(f, "MEDIUM"),
            MemoryPressure::High => write!(f, "HIGH"),
            MemoryPressure::Critical => write!(f, "CRITICAL"),
        }
    }
}
