//! Bus port signal bundles.
//!
//! The cache sits between two buses of identical shape: the requester (CPU
//! fetch) port and the backing-memory port. Each bus carries a request bundle
//! driven by the initiator and a response bundle driven by the target. Both are
//! sampled once per clock cycle.
//!
//! Handshake: the initiator holds `valid` and every request field stable until
//! it observes `ready` in the response. The cycle in which `ready` is high
//! accepts the transfer.

use super::constants::FULL_BYTE_ENABLE;
use super::data::MemOp;

/// Request bundle on the requester port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuRequest {
    /// Byte address.
    pub addr: u32,
    /// Requested operation.
    pub op: MemOp,
    /// Write data (ignored for reads).
    pub wdata: u32,
    /// Per-byte write enables, bit `n` selects byte lane `n`.
    pub byte_enable: u8,
    /// Request strobe.
    pub valid: bool,
}

impl CpuRequest {
    /// No request this cycle.
    pub const IDLE: Self = Self {
        addr: 0,
        op: MemOp::None,
        wdata: 0,
        byte_enable: 0,
        valid: false,
    };

    /// A valid word read of `addr`.
    pub const fn read(addr: u32) -> Self {
        Self {
            addr,
            op: MemOp::Read,
            wdata: 0,
            byte_enable: 0,
            valid: true,
        }
    }

    /// A valid write of `wdata` to `addr` with the given lane enables.
    pub const fn write(addr: u32, wdata: u32, byte_enable: u8) -> Self {
        Self {
            addr,
            op: MemOp::Write,
            wdata,
            byte_enable,
            valid: true,
        }
    }

    /// Whether this is a valid read.
    #[inline(always)]
    pub fn is_read(&self) -> bool {
        self.valid && self.op == MemOp::Read
    }

    /// Whether this is a valid write.
    #[inline(always)]
    pub fn is_write(&self) -> bool {
        self.valid && self.op == MemOp::Write
    }
}

/// Response bundle on the requester port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct CpuResponse {
    /// Read data; meaningful only while `ready` is high.
    pub rdata: u32,
    /// Transfer accepted this cycle.
    pub ready: bool,
    /// The accepted transfer failed.
    pub fault: bool,
}

impl CpuResponse {
    /// Nothing completes this cycle.
    pub const IDLE: Self = Self {
        rdata: 0,
        ready: false,
        fault: false,
    };

    /// A successful completion carrying `rdata`.
    pub const fn data(rdata: u32) -> Self {
        Self {
            rdata,
            ready: true,
            fault: false,
        }
    }

    /// A terminal fault completion.
    pub const fn faulted() -> Self {
        Self {
            rdata: 0,
            ready: true,
            fault: true,
        }
    }
}

/// Request bundle on the backing-memory port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemRequest {
    /// Byte address of the word.
    pub addr: u32,
    /// Requested operation.
    pub op: MemOp,
    /// Write data.
    pub wdata: u32,
    /// Per-byte write enables.
    pub byte_enable: u8,
    /// Request strobe.
    pub valid: bool,
}

impl MemRequest {
    /// No request this cycle.
    pub const IDLE: Self = Self {
        addr: 0,
        op: MemOp::None,
        wdata: 0,
        byte_enable: 0,
        valid: false,
    };

    /// A refill beat reading the word at `addr`.
    pub const fn read(addr: u32) -> Self {
        Self {
            addr,
            op: MemOp::Read,
            wdata: 0,
            byte_enable: 0,
            valid: true,
        }
    }

    /// A full-word write of `wdata` to `addr`.
    pub const fn write(addr: u32, wdata: u32) -> Self {
        Self {
            addr,
            op: MemOp::Write,
            wdata,
            byte_enable: FULL_BYTE_ENABLE,
            valid: true,
        }
    }
}

impl From<&CpuRequest> for MemRequest {
    fn from(req: &CpuRequest) -> Self {
        Self {
            addr: req.addr,
            op: req.op,
            wdata: req.wdata,
            byte_enable: req.byte_enable,
            valid: req.valid,
        }
    }
}

/// Response bundle on the backing-memory port.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MemResponse {
    /// Read data for the accepted beat.
    pub rdata: u32,
    /// Beat accepted this cycle.
    pub ready: bool,
    /// The accepted beat failed.
    pub fault: bool,
}

impl From<MemResponse> for CpuResponse {
    fn from(resp: MemResponse) -> Self {
        Self {
            rdata: resp.rdata,
            ready: resp.ready,
            fault: resp.fault,
        }
    }
}
