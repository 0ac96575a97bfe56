//! Cache address decomposition.
//!
//! A requester address is split into three fields by the cache geometry:
//!
//! ```text
//! | tag (address_width - set_bits - offset_bits) | set index (set_bits) | block offset (offset_bits) |
//! ```
//!
//! The block offset is further split into a word index (upper bits) and a
//! byte-within-word index (the low two bits, ignored by the instruction path).

use super::constants::WORD_SHIFT;

/// Field layout of a cache address.
///
/// Built from a validated [`CacheGeometry`](crate::config::CacheGeometry);
/// the widths are trusted here and not re-checked.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AddressLayout {
    address_width: u32,
    offset_bits: u32,
    set_bits: u32,
}

/// An address split into its cache fields.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CacheAddr {
    /// Line owner identifier (high bits).
    pub tag: u32,
    /// Set selected by the middle bits.
    pub set: usize,
    /// Word index within the line.
    pub word: usize,
}

impl AddressLayout {
    /// Creates a layout from field widths in bits.
    ///
    /// # Arguments
    ///
    /// * `address_width` - Total significant address bits.
    /// * `offset_bits` - `log2(block_bytes)`; must be at least 2.
    /// * `set_bits` - `log2(sets)`.
    pub const fn new(address_width: u32, offset_bits: u32, set_bits: u32) -> Self {
        Self {
            address_width,
            offset_bits,
            set_bits,
        }
    }

    /// Total significant address bits.
    #[inline(always)]
    pub const fn address_width(&self) -> u32 {
        self.address_width
    }

    /// Width of the block offset field.
    #[inline(always)]
    pub const fn offset_bits(&self) -> u32 {
        self.offset_bits
    }

    /// Width of the set index field.
    #[inline(always)]
    pub const fn set_bits(&self) -> u32 {
        self.set_bits
    }

    /// Width of the tag field.
    #[inline(always)]
    pub const fn tag_bits(&self) -> u32 {
        self.address_width - self.set_bits - self.offset_bits
    }

    /// Number of 32-bit words in one line.
    #[inline(always)]
    pub const fn words_per_line(&self) -> usize {
        1 << (self.offset_bits - WORD_SHIFT)
    }

    /// Number of sets.
    #[inline(always)]
    pub const fn sets(&self) -> usize {
        1 << self.set_bits
    }

    /// Mask of the significant address bits.
    #[inline(always)]
    pub const fn address_mask(&self) -> u32 {
        low_mask(self.address_width) as u32
    }

    /// Splits an address into tag, set index and word index.
    #[inline]
    pub fn decode(&self, addr: u32) -> CacheAddr {
        let addr = u64::from(addr & self.address_mask());
        let tag = addr >> (self.offset_bits + self.set_bits);
        let set = (addr >> self.offset_bits) & low_mask(self.set_bits);
        let word = (addr & low_mask(self.offset_bits)) >> WORD_SHIFT;
        CacheAddr {
            tag: tag as u32,
            set: set as usize,
            word: word as usize,
        }
    }

    /// Rebuilds the byte address of a word from its cache fields.
    pub fn compose(&self, tag: u32, set: usize, word: usize) -> u32 {
        let addr = (u64::from(tag) << (self.offset_bits + self.set_bits))
            | ((set as u64 & low_mask(self.set_bits)) << self.offset_bits)
            | ((word as u64) << WORD_SHIFT);
        (addr as u32) & self.address_mask()
    }

    /// Returns the address with its block offset cleared.
    #[inline]
    pub fn line_base(&self, addr: u32) -> u32 {
        let offset_mask = low_mask(self.offset_bits) as u32;
        addr & self.address_mask() & !offset_mask
    }

    /// Whether `addr` selects the final word of its line.
    #[inline]
    pub fn is_last_word(&self, addr: u32) -> bool {
        self.decode(addr).word == self.words_per_line() - 1
    }
}

/// Mask with the low `bits` bits set. Valid for `bits <= 32`.
#[inline(always)]
const fn low_mask(bits: u32) -> u64 {
    (1u64 << bits) - 1
}
