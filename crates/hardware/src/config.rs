//! Configuration system for the cache simulator.
//!
//! This module defines the configuration structures used to parameterize the
//! simulator. It provides:
//! 1. **Defaults:** Baseline cache geometry and backing-memory parameters.
//! 2. **Structures:** Cache and memory configuration, grouped under [`Config`].
//! 3. **Validation:** [`CacheConfig::geometry`] turns a raw configuration into a
//!    checked [`CacheGeometry`], the only form the cache constructors accept.
//!
//! Configuration is supplied via JSON (the CLI `--config` flag) or built with
//! `Config::default()`.

use serde::Deserialize;

use crate::common::addr::AddressLayout;
use crate::common::constants::{MAX_ADDRESS_WIDTH, MAX_WAYS, WORD_BITS, WORD_BYTES};
use crate::common::error::{ConfigError, Result, require_power_of_two, require_range};

/// Default configuration constants for the simulator.
///
/// These values define the baseline geometry when not explicitly overridden
/// in a JSON configuration file.
mod defaults {
    /// Data bus width in bits.
    pub const DATA_WIDTH: u32 = 32;

    /// Line size in bytes (8 words).
    pub const BLOCK_BYTES: usize = 32;

    /// Number of sets (512 sets x 32 bytes = 16 KiB per way).
    pub const SETS: usize = 512;

    /// Associativity.
    pub const WAYS: usize = 2;

    /// Address bus width in bits.
    pub const ADDRESS_WIDTH: u32 = 32;

    /// Backing memory size in bytes (64 KiB).
    pub const MEMORY_SIZE: usize = 64 * 1024;

    /// Cycles a request is held before the backing memory answers it.
    pub const MEMORY_LATENCY: u32 = 1;

    /// Bytes encoded by one line of a hex memory image.
    pub const HEX_BYTES_PER_LINE: usize = 16;
}

/// Root configuration.
///
/// # Examples
///
/// ```
/// use icache_core::config::Config;
///
/// let json = r#"{
///     "cache": { "block_bytes": 16, "sets": 64, "ways": 4 },
///     "memory": { "latency": 2 }
/// }"#;
///
/// let config: Config = serde_json::from_str(json).unwrap();
/// assert!(config.cache.enabled);
/// assert_eq!(config.cache.ways, 4);
/// assert_eq!(config.memory.latency, 2);
/// let geometry = config.cache.geometry().unwrap();
/// assert_eq!(geometry.words_per_line(), 4);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Instruction cache configuration
    #[serde(default)]
    pub cache: CacheConfig,
    /// Backing memory configuration
    #[serde(default)]
    pub memory: MemoryConfig,
}

/// Instruction cache configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct CacheConfig {
    /// Build the cache; when false the requester is wired straight to memory
    #[serde(default = "CacheConfig::default_enabled")]
    pub enabled: bool,

    /// Data bus width in bits (only 32 is supported)
    #[serde(default = "CacheConfig::default_data_width")]
    pub data_width: u32,

    /// Line size in bytes
    #[serde(default = "CacheConfig::default_block_bytes")]
    pub block_bytes: usize,

    /// Number of sets
    #[serde(default = "CacheConfig::default_sets")]
    pub sets: usize,

    /// Associativity (number of ways)
    #[serde(default = "CacheConfig::default_ways")]
    pub ways: usize,

    /// Significant address bits
    #[serde(default = "CacheConfig::default_address_width")]
    pub address_width: u32,
}

impl CacheConfig {
    /// Returns the default enable flag.
    fn default_enabled() -> bool {
        true
    }

    /// Returns the default data width in bits.
    fn default_data_width() -> u32 {
        defaults::DATA_WIDTH
    }

    /// Returns the default line size in bytes.
    fn default_block_bytes() -> usize {
        defaults::BLOCK_BYTES
    }

    /// Returns the default set count.
    fn default_sets() -> usize {
        defaults::SETS
    }

    /// Returns the default associativity.
    fn default_ways() -> usize {
        defaults::WAYS
    }

    /// Returns the default address width in bits.
    fn default_address_width() -> u32 {
        defaults::ADDRESS_WIDTH
    }

    /// Validates the configuration and derives the cache geometry.
    ///
    /// # Errors
    ///
    /// * [`ConfigError::UnsupportedDataWidth`] unless `data_width` is 32.
    /// * [`ConfigError::NotPowerOfTwo`] for `block_bytes`, `sets` or `ways`.
    /// * [`ConfigError::OutOfRange`] when `block_bytes < 4`, `ways` is outside
    ///   `2..=16` or `address_width` is outside `1..=32`.
    /// * [`ConfigError::AddressTooNarrow`] when the set index and block offset
    ///   do not fit in `address_width`.
    pub fn geometry(&self) -> Result<CacheGeometry> {
        if self.data_width != WORD_BITS {
            return Err(ConfigError::UnsupportedDataWidth(self.data_width));
        }

        require_power_of_two("block_bytes", self.block_bytes as u64)?;
        require_range(
            "block_bytes",
            self.block_bytes as u64,
            u64::from(WORD_BYTES),
            1 << MAX_ADDRESS_WIDTH,
        )?;
        require_power_of_two("sets", self.sets as u64)?;
        require_power_of_two("ways", self.ways as u64)?;
        require_range("ways", self.ways as u64, 2, MAX_WAYS as u64)?;
        require_range(
            "address_width",
            u64::from(self.address_width),
            1,
            u64::from(MAX_ADDRESS_WIDTH),
        )?;

        let offset_bits = self.block_bytes.trailing_zeros();
        let set_bits = self.sets.trailing_zeros();
        let required = offset_bits + set_bits;
        if required > self.address_width {
            return Err(ConfigError::AddressTooNarrow {
                address_width: self.address_width,
                required,
            });
        }

        Ok(CacheGeometry {
            layout: AddressLayout::new(self.address_width, offset_bits, set_bits),
            ways: self.ways,
        })
    }
}

impl Default for CacheConfig {
    /// Creates a default cache configuration.
    ///
    /// Enabled, 2-way, 512 sets of 32-byte lines on a 32-bit address bus.
    fn default() -> Self {
        Self {
            enabled: true,
            data_width: defaults::DATA_WIDTH,
            block_bytes: defaults::BLOCK_BYTES,
            sets: defaults::SETS,
            ways: defaults::WAYS,
            address_width: defaults::ADDRESS_WIDTH,
        }
    }
}

/// Validated cache geometry.
///
/// Only obtainable through [`CacheConfig::geometry`], so every instance
/// satisfies the power-of-two and width constraints.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheGeometry {
    layout: AddressLayout,
    ways: usize,
}

impl CacheGeometry {
    /// Address field layout.
    #[inline(always)]
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Associativity.
    #[inline(always)]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// Number of sets.
    #[inline(always)]
    pub const fn sets(&self) -> usize {
        self.layout.sets()
    }

    /// Words per line.
    #[inline(always)]
    pub const fn words_per_line(&self) -> usize {
        self.layout.words_per_line()
    }

    /// Line size in bytes.
    #[inline(always)]
    pub const fn block_bytes(&self) -> usize {
        1 << self.layout.offset_bits()
    }

    /// Total data capacity in bytes.
    pub const fn capacity_bytes(&self) -> usize {
        self.block_bytes() * self.sets() * self.ways
    }
}

/// Backing memory configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct MemoryConfig {
    /// Memory size in bytes
    #[serde(default = "MemoryConfig::default_size")]
    pub size_bytes: usize,

    /// Cycles a request is held before it is answered
    #[serde(default = "MemoryConfig::default_latency")]
    pub latency: u32,

    /// Bytes per line of the hex memory image
    #[serde(default = "MemoryConfig::default_hex_bytes_per_line")]
    pub hex_bytes_per_line: usize,
}

impl MemoryConfig {
    /// Returns the default memory size in bytes.
    fn default_size() -> usize {
        defaults::MEMORY_SIZE
    }

    /// Returns the default response latency in cycles.
    fn default_latency() -> u32 {
        defaults::MEMORY_LATENCY
    }

    /// Returns the default hex image line width in bytes.
    fn default_hex_bytes_per_line() -> usize {
        defaults::HEX_BYTES_PER_LINE
    }
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            size_bytes: defaults::MEMORY_SIZE,
            latency: defaults::MEMORY_LATENCY,
            hex_bytes_per_line: defaults::HEX_BYTES_PER_LINE,
        }
    }
}
