//! Backing-memory port trait.
//!
//! This module defines the `BackingMemory` trait implemented by everything the
//! cache (or the bypass path) can refill from. It provides:
//! 1. **Clocking:** One `cycle` call per simulated clock edge.
//! 2. **Handshake:** The initiator holds `valid` and the request fields stable
//!    until a response with `ready` is returned; that cycle accepts the beat.
//!
//! Implementors decide their own latency; the controller only observes `ready`.

use crate::common::port::{MemRequest, MemResponse};

/// Target side of the backing-memory bus.
pub trait BackingMemory {
    /// Samples this cycle's request and returns this cycle's response.
    ///
    /// Called exactly once per clock, whether or not `request.valid` is set.
    ///
    /// # Arguments
    ///
    /// * `request` - Request bundle driven by the initiator this cycle.
    ///
    /// # Returns
    ///
    /// The response bundle; `rdata` and `fault` are meaningful only when `ready` is set.
    fn cycle(&mut self, request: &MemRequest) -> MemResponse;
}

impl<M: BackingMemory + ?Sized> BackingMemory for Box<M> {
    fn cycle(&mut self, request: &MemRequest) -> MemResponse {
        (**self).cycle(request)
    }
}
