//! Set-associative instruction cache simulator library.
//!
//! This crate implements a cycle-stepped model of a read-only instruction cache with the following:
//! 1. **Replacement:** Matrix pseudo-LRU over a packed pairwise-order history word.
//! 2. **Cache:** Tag and data storage with a lookup / refill / flush state machine.
//! 3. **Memory:** A fixed-latency, word-addressed backing memory with fault injection.
//! 4. **Simulation:** Hex image loader, cycle driver, configuration, and statistics.

/// Common types and constants (address layout, port signals, errors).
pub mod common;
/// Simulator configuration (defaults, cache geometry, backing memory).
pub mod config;
/// Cache core (replacement, storage, controller, bypass).
pub mod core;
/// Image loader and cycle driver.
pub mod sim;
/// Backing memory and the memory port trait.
pub mod soc;
/// Cache statistics collection and reporting.
pub mod stats;

/// Root configuration type; use `Config::default()` or deserialize from JSON.
pub use crate::config::Config;
/// Instruction cache as built from a configuration.
pub use crate::core::units::cache::InstructionCache;
/// Top-level simulator; construct with `Simulator::new`.
pub use crate::sim::Simulator;
/// Backing memory model.
pub use crate::soc::memory::SimMemory;
