//! Rule-based portfolio allocation.
//!
//! Maps an inflation/growth quadrant to fixed weights across equities, gold,
//! bonds and cash.

pub mod mapper;

pub use mapper::{allocate, Allocation, AllocationPolicy};
