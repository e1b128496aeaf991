/*!
 * Limits
 * Default capacities and thresholds
 */

use super::types::{Address, Size};

/// Default capacity of the simulated memory pool (64 MB)
pub const DEFAULT_MEMORY_POOL: Size = 64 * 1024 * 1024;

/// Default number of independent tracking instances
pub const DEFAULT_INSTANCE_CAPACITY: usize = 100;

/// First address handed out by a fresh store. Keeps the zero page unmapped so
/// a null-like handle can never collide with a live block.
pub const INITIAL_ADDRESS: Address = 0x1000;

/// Memory pressure medium threshold (fraction of the pool in use)
pub const MEDIUM_THRESHOLD: f64 = 0.60;

/// Memory pressure warning threshold
pub const WARNING_THRESHOLD: f64 = 0.80;

/// Memory pressure critical threshold
pub const CRITICAL_THRESHOLD: f64 = 0.95;
