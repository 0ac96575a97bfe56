//! Configuration error definitions.
//!
//! Every constructor in this crate validates its geometry up front and returns
//! a [`ConfigError`] instead of building a partially usable instance. Runtime
//! memory faults are not errors; they travel on the `fault` bus signal.

use thiserror::Error;

/// Result type for fallible construction.
pub type Result<T> = std::result::Result<T, ConfigError>;

/// Rejected construction-time parameter.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// Only 32-bit data buses are modelled.
    #[error("unsupported data width: {0} bits (supported: 32)")]
    UnsupportedDataWidth(u32),

    /// A size or count that must be a power of two is not.
    #[error("{field} must be a power of two, got {value}")]
    NotPowerOfTwo {
        /// Name of the offending parameter.
        field: &'static str,
        /// Rejected value.
        value: u64,
    },

    /// A parameter lies outside its supported range.
    #[error("{field} out of range: {value} (valid range: {min}-{max})")]
    OutOfRange {
        /// Name of the offending parameter.
        field: &'static str,
        /// Rejected value.
        value: u64,
        /// Smallest accepted value.
        min: u64,
        /// Largest accepted value.
        max: u64,
    },

    /// The address bus cannot hold the set index and block offset fields.
    #[error("address width {address_width} too narrow: set index and block offset need {required} bits")]
    AddressTooNarrow {
        /// Configured address width.
        address_width: u32,
        /// Bits consumed by set index plus block offset.
        required: u32,
    },
}

/// Checks that `value` is a non-zero power of two.
pub(crate) fn require_power_of_two(field: &'static str, value: u64) -> Result<()> {
    if value.is_power_of_two() {
        Ok(())
    } else {
        Err(ConfigError::NotPowerOfTwo { field, value })
    }
}

/// Checks that `min <= value <= max`.
pub(crate) fn require_range(field: &'static str, value: u64, min: u64, max: u64) -> Result<()> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(ConfigError::OutOfRange {
            field,
            value,
            min,
            max,
        })
    }
}
