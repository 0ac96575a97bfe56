//! Simulator: owns the instruction cache and its backing memory side-by-side.
//!
//! Every [`Simulator::step`] clocks the cache once, which in turn clocks the
//! memory once. [`Simulator::fetch`] plays the requester: it holds a read
//! until the cache answers and reports faults and hangs as [`SimError`].

use std::path::Path;

use thiserror::Error;
use tracing::{debug, info};

use super::loader::{self, LoaderError};
use crate::common::error::ConfigError;
use crate::common::port::{CpuRequest, CpuResponse};
use crate::config::{Config, MemoryConfig};
use crate::core::units::cache::InstructionCache;
use crate::core::units::cache::controller::ControllerState;
use crate::soc::memory::SimMemory;
use crate::stats::CacheStats;

/// Cycles a single fetch may take before it is reported as hung.
pub const DEFAULT_TIMEOUT_CYCLES: u64 = 1 << 20;

/// Errors reported by the simulation driver.
#[derive(Debug, Error)]
pub enum SimError {
    /// The fetch completed with a fault.
    #[error("fetch of {addr:#010x} faulted")]
    Fault {
        /// Requested address.
        addr: u32,
    },

    /// The fetch did not complete within the cycle limit.
    #[error("fetch of {addr:#010x} did not complete within {cycles} cycles")]
    Timeout {
        /// Requested address.
        addr: u32,
        /// Cycles waited.
        cycles: u64,
    },

    /// The configuration was rejected.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The memory image could not be loaded.
    #[error(transparent)]
    Loader(#[from] LoaderError),
}

/// Top-level simulator: instruction cache + backing memory.
#[derive(Debug)]
pub struct Simulator {
    /// Instruction cache (or bypass path).
    pub cache: InstructionCache,
    /// Backing memory.
    pub memory: SimMemory,
    memory_config: MemoryConfig,
    timeout_cycles: u64,
}

impl Simulator {
    /// Builds the cache and memory described by `config`.
    ///
    /// # Errors
    ///
    /// [`SimError::Config`] when either the cache or the memory configuration
    /// is rejected.
    pub fn new(config: &Config) -> Result<Self, SimError> {
        let cache = InstructionCache::new(&config.cache)?;
        let memory = SimMemory::new(config.memory.size_bytes, config.memory.latency)?;
        Ok(Self {
            cache,
            memory,
            memory_config: config.memory.clone(),
            timeout_cycles: DEFAULT_TIMEOUT_CYCLES,
        })
    }

    /// Replaces the per-fetch cycle limit.
    #[must_use]
    pub const fn with_timeout(mut self, cycles: u64) -> Self {
        self.timeout_cycles = cycles;
        self
    }

    /// Loads a hex image at address zero.
    ///
    /// # Errors
    ///
    /// [`SimError::Loader`] when the file is unreadable, malformed or too large.
    pub fn load_image(&mut self, path: impl AsRef<Path>) -> Result<usize, SimError> {
        let words = loader::load_hex_file(
            path,
            self.memory_config.hex_bytes_per_line,
            self.memory.size_bytes(),
        )?;
        self.memory.load_words(0, &words);
        Ok(words.len())
    }

    /// Advances one clock cycle.
    pub fn step(&mut self, request: &CpuRequest, invalidate: bool) -> CpuResponse {
        self.cache.tick(request, invalidate, &mut self.memory)
    }

    /// Runs idle cycles until the cache can accept a lookup.
    ///
    /// # Returns
    ///
    /// Number of cycles run.
    ///
    /// # Errors
    ///
    /// [`SimError::Timeout`] if the controller stays busy past the cycle limit.
    pub fn settle(&mut self) -> Result<u64, SimError> {
        let mut cycles = 0;
        while self.cache.state().is_some_and(ControllerState::is_busy) {
            if cycles >= self.timeout_cycles {
                return Err(SimError::Timeout { addr: 0, cycles });
            }
            let _ = self.step(&CpuRequest::IDLE, false);
            cycles += 1;
        }
        Ok(cycles)
    }

    /// Pulses `invalidate` for one cycle and waits for the sweep to finish.
    ///
    /// # Errors
    ///
    /// [`SimError::Timeout`] if the sweep does not finish.
    pub fn invalidate(&mut self) -> Result<u64, SimError> {
        let _ = self.step(&CpuRequest::IDLE, true);
        Ok(self.settle()? + 1)
    }

    /// Reads one instruction word through the cache.
    ///
    /// The read is held valid until the cache answers, as the bus protocol
    /// requires.
    ///
    /// # Errors
    ///
    /// [`SimError::Fault`] when the response carries `fault`, and
    /// [`SimError::Timeout`] when no response arrives within the cycle limit.
    pub fn fetch(&mut self, addr: u32) -> Result<u32, SimError> {
        let request = CpuRequest::read(addr);
        let mut cycles = 0;
        loop {
            let response = self.step(&request, false);
            cycles += 1;
            if response.ready {
                if response.fault {
                    debug!(addr, cycles, "fetch faulted");
                    return Err(SimError::Fault { addr });
                }
                return Ok(response.rdata);
            }
            if cycles >= self.timeout_cycles {
                return Err(SimError::Timeout { addr, cycles });
            }
        }
    }

    /// Fetches every address in order, stopping at the first error.
    ///
    /// # Errors
    ///
    /// The first error returned by [`Simulator::fetch`].
    pub fn run_trace<I>(&mut self, addrs: I) -> Result<Vec<u32>, SimError>
    where
        I: IntoIterator<Item = u32>,
    {
        let words = addrs
            .into_iter()
            .map(|addr| self.fetch(addr))
            .collect::<Result<Vec<_>, _>>()?;
        info!(fetches = words.len(), cycles = self.stats().cycles, "trace complete");
        Ok(words)
    }

    /// Statistics accumulated since construction.
    pub fn stats(&self) -> &CacheStats {
        self.cache.stats()
    }
}
