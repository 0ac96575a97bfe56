//! System-on-Chip (SoC) Components.
//!
//! This module organizes the components on the memory side of the cache:
//! the backing-memory port trait and the simulated memory behind it.

/// Simulated backing memory.
pub mod memory;

/// Backing-memory port trait.
pub mod traits;

pub use memory::SimMemory;
pub use traits::BackingMemory;
