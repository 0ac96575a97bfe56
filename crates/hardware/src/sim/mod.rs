//! Simulation driver and memory image loading.
//!
//! Provides the hex image loader and the top-level simulator that steps the
//! instruction cache against its backing memory.

/// Hex memory image parsing.
pub mod loader;

/// Cycle driver for the cache and memory.
pub mod simulator;

pub use loader::LoaderError;
pub use simulator::{SimError, Simulator};
