/*!
 * Core Types and Limits
 * Common definitions used across the crate
 */

pub mod limits;
pub mod types;

pub use types::{Address, InstanceId, Size};
