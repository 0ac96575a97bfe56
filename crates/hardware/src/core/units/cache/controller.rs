//! Instruction Cache Controller.
//!
//! A cycle-stepped finite-state machine that serves word reads from a
//! set-associative store and refills whole lines from backing memory on a miss.
//! Each call to [`CacheController::tick`] is one clock:
//!
//! 1. The backing-memory request is driven from registered state only.
//! 2. Backing memory is clocked and returns this cycle's response.
//! 3. The current state is evaluated against the requester's inputs.
//! 4. Next state, cursors and array writes are committed (the clock edge).
//!
//! ```text
//!   reset --> Flush --(set 0 cleared)--> FlushLast --+
//!               ^                                    |
//!               | invalidate                         v
//!             Check <----------------------------- Wait
//!               |                                    ^
//!               +--- miss ---> Fetch --(last beat)---+
//! ```
//!
//! Requests are completed strictly in order and no hit is served while a
//! refill is outstanding. A flush request seen mid-refill is latched and
//! honoured once the controller returns to `Check`.

use tracing::{debug, trace, warn};

use super::data_array::DataArray;
use super::plru::{PseudoLru, WayMask};
use super::tag_store::{TagEntry, TagLine, TagStore};
use crate::common::addr::{AddressLayout, CacheAddr};
use crate::common::constants::WORD_BYTES;
use crate::common::error::Result;
use crate::common::port::{CpuRequest, CpuResponse, MemRequest};
use crate::config::CacheGeometry;
use crate::soc::traits::BackingMemory;
use crate::stats::CacheStats;

/// Controller FSM state.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ControllerState {
    /// Lookup; the only state that serves hits and accepts new misses.
    Check,
    /// Refill beats are being requested from backing memory.
    Fetch,
    /// One-cycle settle that commits a finished refill.
    Wait,
    /// Sweeping sets from the highest index down to zero.
    Flush,
    /// Bubble after the final set has been cleared.
    FlushLast,
}

impl ControllerState {
    /// Whether the controller is unavailable for new lookups.
    #[inline(always)]
    pub const fn is_busy(self) -> bool {
        !matches!(self, Self::Check)
    }
}

/// In-flight line refill.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RefillCursor {
    /// Address of the next beat to request.
    pub address: u32,
    /// A refill is outstanding.
    pub active: bool,
    /// Victim way receiving the line.
    pub way: usize,
    /// Set receiving the line.
    pub set: usize,
    /// Tag of the line being fetched.
    pub tag: u32,
    /// At least one accepted beat reported a fault.
    pub faulted: bool,
}

/// Flush sweep position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct FlushCursor {
    /// Set cleared this cycle while flushing.
    pub set_index: usize,
    /// A sweep is in progress.
    pub write_enable: bool,
}

/// Cycle-accurate set-associative instruction cache.
#[derive(Clone, Debug)]
pub struct CacheController {
    layout: AddressLayout,
    lru: PseudoLru,
    tags: TagStore,
    data: DataArray,
    state: ControllerState,
    refill: RefillCursor,
    flush: FlushCursor,
    flush_pending: bool,
    completing_refill: bool,
    valid_q: bool,
    stats: CacheStats,
}

impl CacheController {
    /// Builds a controller for a validated geometry, in its reset state.
    ///
    /// Reset enters `Flush` at the highest set, so the controller is busy for
    /// `sets + 2` cycles before it serves its first lookup.
    ///
    /// # Errors
    ///
    /// Propagates a [`ConfigError`](crate::common::error::ConfigError) if the
    /// associativity is rejected by the replacement logic.
    pub fn new(geometry: &CacheGeometry) -> Result<Self> {
        let lru = PseudoLru::new(geometry.ways())?;
        let sets = geometry.sets();
        Ok(Self {
            layout: *geometry.layout(),
            lru,
            tags: TagStore::new(sets, geometry.ways()),
            data: DataArray::new(sets, geometry.ways(), geometry.words_per_line()),
            state: ControllerState::Flush,
            refill: RefillCursor::default(),
            flush: FlushCursor {
                set_index: sets - 1,
                write_enable: true,
            },
            flush_pending: false,
            completing_refill: false,
            valid_q: false,
            stats: CacheStats::default(),
        })
    }

    /// Current FSM state.
    pub const fn state(&self) -> ControllerState {
        self.state
    }

    /// Address field layout.
    pub const fn layout(&self) -> &AddressLayout {
        &self.layout
    }

    /// Associativity.
    pub const fn ways(&self) -> usize {
        self.lru.ways()
    }

    /// Outstanding refill, if any.
    pub const fn refill(&self) -> &RefillCursor {
        &self.refill
    }

    /// Flush sweep position.
    pub const fn flush(&self) -> &FlushCursor {
        &self.flush
    }

    /// Whether a flush request is waiting for the controller to reach `Check`.
    pub const fn flush_pending(&self) -> bool {
        self.flush_pending
    }

    /// Tag state of `set`.
    pub fn tag_line(&self, set: usize) -> &TagLine {
        self.tags.line(set)
    }

    /// Tag entry of one slot.
    pub fn tag_entry(&self, set: usize, way: usize) -> TagEntry {
        self.tags.line(set).entries()[way]
    }

    /// Line data held by `way` in `set`.
    pub fn line_data(&self, way: usize, set: usize) -> &[u32] {
        self.data.line(way, set)
    }

    /// Number of valid lines across the cache.
    pub fn valid_lines(&self) -> usize {
        self.tags.valid_count()
    }

    /// Replacement logic used by this controller.
    pub const fn lru(&self) -> &PseudoLru {
        &self.lru
    }

    /// Statistics accumulated since reset.
    pub const fn stats(&self) -> &CacheStats {
        &self.stats
    }

    /// Backing-memory request driven this cycle.
    ///
    /// Depends only on registered state: a read of the refill cursor while
    /// fetching, idle otherwise.
    pub fn memory_request(&self) -> MemRequest {
        if self.state == ControllerState::Fetch && self.refill.active {
            MemRequest::read(self.refill.address)
        } else {
            MemRequest::IDLE
        }
    }

    /// Advances the controller by one clock cycle.
    ///
    /// # Arguments
    ///
    /// * `request` - Requester bundle sampled this cycle.
    /// * `invalidate` - Flush request level.
    /// * `memory` - Backing memory, clocked exactly once.
    ///
    /// # Returns
    ///
    /// The requester response for this cycle.
    pub fn tick<M>(&mut self, request: &CpuRequest, invalidate: bool, memory: &mut M) -> CpuResponse
    where
        M: BackingMemory + ?Sized,
    {
        let mem_request = self.memory_request();
        let mem_response = memory.cycle(&mem_request);

        self.stats.cycles += 1;
        if self.state.is_busy() {
            self.stats.busy_cycles += 1;
        }

        let response = match self.state {
            ControllerState::Check => self.check(request, invalidate),
            ControllerState::Fetch => {
                self.latch_invalidate(invalidate);
                if mem_response.ready {
                    self.accept_beat(mem_response.rdata, mem_response.fault);
                }
                CpuResponse::IDLE
            }
            ControllerState::Wait => {
                self.latch_invalidate(invalidate);
                self.state = ControllerState::Check;
                self.commit_refill()
            }
            ControllerState::Flush => {
                self.latch_invalidate(invalidate);
                self.flush_step();
                CpuResponse::IDLE
            }
            ControllerState::FlushLast => {
                self.latch_invalidate(invalidate);
                self.flush.write_enable = false;
                self.stats.flushes += 1;
                debug!(sweeps = self.stats.flushes, "flush complete");
                self.state = ControllerState::Wait;
                CpuResponse::IDLE
            }
        };

        self.valid_q = request.valid;
        response
    }

    fn latch_invalidate(&mut self, invalidate: bool) {
        if invalidate && !self.flush_pending {
            debug!(state = ?self.state, "flush deferred");
            self.flush_pending = true;
        }
    }

    fn check(&mut self, request: &CpuRequest, invalidate: bool) -> CpuResponse {
        let completing = std::mem::take(&mut self.completing_refill);

        if self.flush_pending || invalidate {
            self.flush_pending = false;
            self.flush = FlushCursor {
                set_index: self.layout.sets() - 1,
                write_enable: true,
            };
            self.state = ControllerState::Flush;
            debug!("flush start");
            return CpuResponse::IDLE;
        }

        if request.is_write() {
            if self.valid_q {
                self.stats.rejected_writes += 1;
                debug!(addr = request.addr, "write rejected");
                return CpuResponse::faulted();
            }
            return CpuResponse::IDLE;
        }
        if !request.is_read() {
            return CpuResponse::IDLE;
        }

        let fields = self.layout.decode(request.addr);
        let line = self.tags.line(fields.set);
        let hits = line.hits(fields.tag);

        match hits.first() {
            Some(way) => {
                if !self.valid_q {
                    return CpuResponse::IDLE;
                }
                if !completing {
                    let outcome = self.lru.evaluate(line.history(), WayMask::one_hot(way));
                    self.tags.write_history(fields.set, outcome.history);
                    self.stats.hits += 1;
                }
                CpuResponse::data(self.data.read(way, fields.set, fields.word))
            }
            None => {
                self.start_refill(request.addr, fields);
                CpuResponse::IDLE
            }
        }
    }

    fn start_refill(&mut self, addr: u32, fields: CacheAddr) {
        let history = self.tags.line(fields.set).history();
        let way = self.lru.victim(history);
        self.refill = RefillCursor {
            address: self.layout.line_base(addr),
            active: true,
            way,
            set: fields.set,
            tag: fields.tag,
            faulted: false,
        };
        self.stats.misses += 1;
        self.state = ControllerState::Fetch;
        debug!(addr, set = fields.set, tag = fields.tag, victim = way, "miss");
    }

    fn accept_beat(&mut self, rdata: u32, fault: bool) {
        let refill = &mut self.refill;
        let word = self.layout.decode(refill.address).word;
        self.data.write(refill.way, refill.set, word, rdata);
        refill.faulted |= fault;
        self.stats.refill_beats += 1;
        trace!(addr = refill.address, word, rdata, fault, "refill beat");

        if self.layout.is_last_word(refill.address) {
            self.state = ControllerState::Wait;
        } else {
            refill.address = refill.address.wrapping_add(WORD_BYTES);
        }
    }

    fn commit_refill(&mut self) -> CpuResponse {
        if !self.refill.active {
            return CpuResponse::IDLE;
        }
        let RefillCursor { way, set, tag, faulted, .. } = self.refill;
        self.refill.active = false;

        if faulted {
            self.tags.write_entry(set, way, TagEntry::default());
            self.stats.refill_faults += 1;
            warn!(set, way, tag, "refill faulted; line left invalid");
            return CpuResponse::faulted();
        }

        self.tags.write_entry(set, way, TagEntry::valid(tag));
        let history = self.tags.line(set).history();
        let outcome = self.lru.evaluate(history, WayMask::one_hot(way));
        self.tags.write_history(set, outcome.history);
        self.completing_refill = true;
        debug!(set, way, tag, "refill complete");
        CpuResponse::IDLE
    }

    fn flush_step(&mut self) {
        let set = self.flush.set_index;
        self.tags.clear_set(set);
        if set == 0 {
            self.state = ControllerState::FlushLast;
        } else {
            self.flush.set_index = set - 1;
        }
    }
}
