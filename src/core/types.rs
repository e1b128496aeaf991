/*!
 * Core Types
 * Type aliases shared by the store, registries and tracker
 */

/// Address type for block handles.
///
/// Opaque to the registry layer: handles are compared by identity only, the
/// value is meaningful to the backing store alone.
pub type Address = usize;

/// Size type for block and pool sizes, in bytes
pub type Size = usize;

/// Index of one tracking instance inside an [`crate::registry::InstanceSpace`]
pub type InstanceId = usize;
