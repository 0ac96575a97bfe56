//! Cache core implementation.
//!
//! This module contains the functional units of the simulated instruction
//! fetch path: the cache itself with its replacement logic, storage arrays,
//! controller state machine and bypass path.

/// Functional units (instruction cache).
pub mod units;
