//! Bus Operation Types.
//!
//! This module defines the operation code carried on both the requester and
//! the backing-memory buses. It is used for the following:
//! 1. **Miss Detection:** Only reads can miss and trigger a refill.
//! 2. **Write Rejection:** The instruction cache answers writes with a fault.
//! 3. **Bypass Forwarding:** The disabled cache forwards the operation untouched.

/// Operation requested on a bus.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum MemOp {
    /// No operation; the request never completes.
    #[default]
    None,

    /// Word read.
    ///
    /// Instruction fetches and refill beats are reads.
    Read,

    /// Byte-enabled word write.
    Write,
}
