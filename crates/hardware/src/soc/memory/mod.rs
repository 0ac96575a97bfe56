//! Simulated Backing Memory.
//!
//! This module implements the word-addressed memory the cache refills from. It provides:
//! 1. **Storage:** A power-of-two array of 32-bit words; upper address bits alias.
//! 2. **Latency:** A fixed number of held-`valid` cycles before each beat is accepted.
//! 3. **Writes:** Byte-lane merging under `byte_enable`, used by the bypass path.
//! 4. **Fault injection:** Per-word error responses for exercising refill faults.

use std::collections::HashSet;

use tracing::trace;

use crate::common::constants::{BYTE_LANES, IDLE_READ_DATA, MIN_MEMORY_BYTES, WORD_SHIFT};
use crate::common::data::MemOp;
use crate::common::error::{Result, require_power_of_two, require_range};
use crate::common::port::{MemRequest, MemResponse};
use crate::soc::traits::BackingMemory;

/// Largest supported memory: the full 32-bit byte address space.
const MAX_MEMORY_BYTES: u64 = 1 << 32;

/// Fixed-latency word memory.
#[derive(Clone, Debug)]
pub struct SimMemory {
    words: Vec<u32>,
    index_mask: usize,
    latency: u32,
    held: u32,
    faults: HashSet<usize>,
    beats: u64,
}

impl SimMemory {
    /// Creates a zero-filled memory.
    ///
    /// # Arguments
    ///
    /// * `size_bytes` - Capacity; a power of two of at least 4 KiB.
    /// * `latency` - Cycles `valid` must be held before a beat is accepted (0 = same cycle).
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`](crate::common::error::ConfigError) for an
    /// unsupported size.
    pub fn new(size_bytes: usize, latency: u32) -> Result<Self> {
        require_power_of_two("size_bytes", size_bytes as u64)?;
        require_range(
            "size_bytes",
            size_bytes as u64,
            MIN_MEMORY_BYTES as u64,
            MAX_MEMORY_BYTES,
        )?;
        let word_count = size_bytes >> WORD_SHIFT;
        Ok(Self {
            words: vec![0; word_count],
            index_mask: word_count - 1,
            latency,
            held: 0,
            faults: HashSet::new(),
            beats: 0,
        })
    }

    #[inline(always)]
    fn index(&self, addr: u32) -> usize {
        (addr as usize >> WORD_SHIFT) & self.index_mask
    }

    /// Capacity in bytes.
    pub fn size_bytes(&self) -> usize {
        self.words.len() << WORD_SHIFT
    }

    /// Response latency in cycles.
    pub const fn latency(&self) -> u32 {
        self.latency
    }

    /// Number of beats accepted so far.
    pub const fn beats(&self) -> u64 {
        self.beats
    }

    /// Reads the word containing `addr` without going through the bus.
    pub fn read_word(&self, addr: u32) -> u32 {
        self.words[self.index(addr)]
    }

    /// Overwrites the word containing `addr` without going through the bus.
    pub fn write_word(&mut self, addr: u32, value: u32) {
        let idx = self.index(addr);
        self.words[idx] = value;
    }

    /// Copies `words` into consecutive word slots starting at `base`.
    pub fn load_words(&mut self, base: u32, words: &[u32]) {
        for (i, &word) in words.iter().enumerate() {
            let addr = base.wrapping_add((i as u32) << WORD_SHIFT);
            self.write_word(addr, word);
        }
    }

    /// Makes every accepted beat to the word containing `addr` report `fault`.
    pub fn inject_fault(&mut self, addr: u32) {
        let _ = self.faults.insert(self.index(addr));
    }

    /// Removes every injected fault.
    pub fn clear_faults(&mut self) {
        self.faults.clear();
    }

    fn merge_lanes(old: u32, new: u32, byte_enable: u8) -> u32 {
        let mut mask = 0u32;
        for lane in 0..BYTE_LANES {
            if byte_enable & (1 << lane) != 0 {
                mask |= 0xFF << (lane * 8);
            }
        }
        (old & !mask) | (new & mask)
    }
}

impl BackingMemory for SimMemory {
    fn cycle(&mut self, request: &MemRequest) -> MemResponse {
        let idle = MemResponse {
            rdata: IDLE_READ_DATA,
            ready: false,
            fault: false,
        };

        if !request.valid {
            self.held = 0;
            return idle;
        }
        if self.held < self.latency {
            self.held += 1;
            return idle;
        }
        self.held = 0;
        self.beats += 1;

        let idx = self.index(request.addr);
        let fault = self.faults.contains(&idx);
        let rdata = match request.op {
            MemOp::Read => self.words[idx],
            MemOp::Write => {
                self.words[idx] =
                    Self::merge_lanes(self.words[idx], request.wdata, request.byte_enable);
                request.wdata
            }
            MemOp::None => IDLE_READ_DATA,
        };
        trace!(addr = request.addr, op = ?request.op, rdata, fault, "memory beat");

        MemResponse {
            rdata,
            ready: true,
            fault,
        }
    }
}
