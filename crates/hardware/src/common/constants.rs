//! Global Cache Constants.
//!
//! This module defines the fixed-width constants shared by the cache and its
//! backing memory. It includes:
//! 1. **Word Constants:** Data bus width, byte lanes and the refill stride.
//! 2. **Associativity Limits:** The widest set the history word can encode.
//! 3. **Memory Constants:** Backing memory minimum size and bus filler patterns.

/// Data bus width in bits. The only supported width.
pub const WORD_BITS: u32 = 32;

/// Data bus width in bytes; also the refill address stride per beat.
pub const WORD_BYTES: u32 = WORD_BITS / 8;

/// Number of low address bits selecting a byte within a word.
pub const WORD_SHIFT: u32 = 2;

/// Number of byte lanes on the data bus (one write-enable bit per lane).
pub const BYTE_LANES: usize = WORD_BYTES as usize;

/// Byte-enable mask selecting every lane of a word.
pub const FULL_BYTE_ENABLE: u8 = (1 << BYTE_LANES) - 1;

/// Largest supported associativity.
///
/// A 16-way set needs 16 * 15 / 2 = 120 history bits, the widest encoding that
/// fits the fixed 128-bit history word.
pub const MAX_WAYS: usize = 16;

/// Widest supported address bus in bits.
pub const MAX_ADDRESS_WIDTH: u32 = 32;

/// Smallest backing memory accepted by the simulation memory (4 KiB).
pub const MIN_MEMORY_BYTES: usize = 4096;

/// Value driven on the memory read-data bus when no beat is being returned.
pub const IDLE_READ_DATA: u32 = 0xDEAD_F00D;
