//! Common utilities and types used throughout the cache simulator.
//!
//! This module provides the building blocks shared by the cache, its backing
//! memory and the simulation driver. It includes:
//! 1. **Address Layout:** Tag / set / offset decomposition of requester addresses.
//! 2. **Constants:** Bus widths, associativity limits and filler patterns.
//! 3. **Bus Operations:** The read / write / none operation code.
//! 4. **Error Handling:** Construction-time configuration errors.
//! 5. **Port Signals:** Request and response bundles for both buses.

/// Address field decomposition.
pub mod addr;

/// Common constants used throughout the simulator.
pub mod constants;

/// Bus operation definitions.
pub mod data;

/// Error types for configuration validation.
pub mod error;

/// Request/response signal bundles.
pub mod port;

pub use addr::{AddressLayout, CacheAddr};
pub use constants::{MAX_WAYS, WORD_BYTES};
pub use data::MemOp;
pub use error::ConfigError;
pub use port::{CpuRequest, CpuResponse, MemRequest, MemResponse};
