//! Application services
//!
//! Services orchestrate domain logic with I/O operations.

pub mod hierarchy;

pub use hierarchy::HierarchyService;
