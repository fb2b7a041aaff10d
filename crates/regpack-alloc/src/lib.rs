//! Control-register allocation.
//!
//! Assigns each typed field a contiguous bit slice in one of the twelve
//! application registers (CR6..CR17). The packing order comes from a
//! [`Strategy`]; placement itself is a single greedy top-down pass.

pub mod allocation;
pub mod allocator;
pub mod error;
pub mod field;
pub mod image;
pub mod strategy;

pub use allocation::{Allocation, Placement};
pub use allocator::{allocate, FIRST_REGISTER, LAST_REGISTER, REGISTER_BITS, REGISTER_COUNT, TOTAL_BITS};
pub use error::{AllocationError, Result};
pub use field::Field;
pub use image::RegisterImage;
pub use strategy::Strategy;
