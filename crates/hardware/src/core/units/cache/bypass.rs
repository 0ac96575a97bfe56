//! Pass-through path used when the cache is disabled.
//!
//! The requester bus is wired straight to backing memory: each request field
//! is forwarded unchanged and each response field is returned unchanged, in
//! the same cycle. `invalidate` has nothing to act on and is ignored.

use crate::common::port::{CpuRequest, CpuResponse, MemRequest};
use crate::soc::traits::BackingMemory;
use crate::stats::CacheStats;

/// Stateless cache replacement.
///
/// Only the cycle counter is tracked so the statistics report stays populated.
#[derive(Clone, Debug, Default)]
pub struct BypassPath {
    stats: CacheStats,
}

impl BypassPath {
    /// Creates a bypass path.
    pub fn new() -> Self {
        Self::default()
    }

    /// Forwards one cycle of traffic.
    pub fn tick<M>(&mut self, request: &CpuRequest, memory: &mut M) -> CpuResponse
    where
        M: BackingMemory + ?Sized,
    {
        self.stats.cycles += 1;
        memory.cycle(&MemRequest::from(request)).into()
    }

    /// Statistics accumulated since construction.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }
}
