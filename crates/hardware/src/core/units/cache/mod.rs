//! Set-Associative Instruction Cache.
//!
//! This module implements a read-only, cycle-stepped instruction cache. It provides:
//! 1. **Replacement:** Matrix pseudo-LRU over a packed pairwise history word.
//! 2. **Storage:** Tag memory (valid, tag, history per set) and line data per way.
//! 3. **Controller:** The lookup / refill / flush state machine.
//! 4. **Bypass:** A zero-latency pass-through used when the cache is disabled.
//!
//! [`InstructionCache`] selects between the controller and the bypass at
//! construction time from [`CacheConfig::enabled`].

/// Pass-through path for a disabled cache.
pub mod bypass;

/// Lookup, refill and flush state machine.
pub mod controller;

/// Per-way line data storage.
pub mod data_array;

/// Matrix pseudo-LRU replacement logic.
pub mod plru;

/// Tag and history storage.
pub mod tag_store;

use self::bypass::BypassPath;
use self::controller::{CacheController, ControllerState};
use crate::common::error::Result;
use crate::common::port::CpuRequest;
use crate::common::port::CpuResponse;
use crate::config::CacheConfig;
use crate::soc::traits::BackingMemory;
use crate::stats::CacheStats;

/// Instruction cache as instantiated from a configuration.
#[derive(Clone, Debug)]
pub enum InstructionCache {
    /// Cache present.
    Enabled(Box<CacheController>),
    /// Cache disabled; requests go straight to memory.
    Disabled(BypassPath),
}

impl InstructionCache {
    /// Builds the cache described by `config`.
    ///
    /// The geometry is validated even when the cache is disabled, so a
    /// configuration is either accepted or rejected independent of `enabled`.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`](crate::common::error::ConfigError)
    /// found by [`CacheConfig::geometry`].
    pub fn new(config: &CacheConfig) -> Result<Self> {
        let geometry = config.geometry()?;
        if config.enabled {
            Ok(Self::Enabled(Box::new(CacheController::new(&geometry)?)))
        } else {
            Ok(Self::Disabled(BypassPath::new()))
        }
    }

    /// Advances one clock cycle.
    pub fn tick<M>(&mut self, request: &CpuRequest, invalidate: bool, memory: &mut M) -> CpuResponse
    where
        M: BackingMemory + ?Sized,
    {
        match self {
            Self::Enabled(controller) => controller.tick(request, invalidate, memory),
            Self::Disabled(bypass) => bypass.tick(request, memory),
        }
    }

    /// Controller state, or `None` for the bypass path.
    pub fn state(&self) -> Option<ControllerState> {
        match self {
            Self::Enabled(controller) => Some(controller.state()),
            Self::Disabled(_) => None,
        }
    }

    /// The controller when the cache is enabled.
    pub fn controller(&self) -> Option<&CacheController> {
        match self {
            Self::Enabled(controller) => Some(controller),
            Self::Disabled(_) => None,
        }
    }

    /// Statistics accumulated since construction.
    pub fn stats(&self) -> &CacheStats {
        match self {
            Self::Enabled(controller) => controller.stats(),
            Self::Disabled(bypass) => bypass.stats(),
        }
    }
}
