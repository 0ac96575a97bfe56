//! Matrix Pseudo-LRU Replacement.
//!
//! Tracks recency in a set by storing, for every unordered pair of ways
//! `(i, j)` with `i < j`, one bit answering "is way `i` older than way `j`?".
//! Two ways are never equally old, so `j older than i` is the complement and
//! need not be stored, leaving `W * (W - 1) / 2` bits per set:
//!
//! ```text
//! W = 4:  | 0<1 | 0<2 | 0<3 | 1<2 | 1<3 | 2<3 |
//!   bit:     0     1     2     3     4     5
//! ```
//!
//! Row `i` owns a contiguous block of `W - 1 - i` bits, laid out row-major.
//!
//! Evaluating a set expands the packed word into a `W x W` matrix `M` with
//! `M[i][i] = 1`, `M[i][j]` from the word for `i < j`, and `M[i][j] = !M[j][i]`
//! for `i > j`. A way is least recently used exactly when its whole row is
//! ones (older than every other way). Recording an access to way `a` clears
//! row `a` off the diagonal and sets column `a`, making `a` the youngest.
//! The upper triangle is then packed back into the word.
//!
//! Unlike the tree PLRU this scheme is exact LRU; it trades `O(W^2)` storage
//! for a comparator-free update.
//!
//! # Performance
//!
//! - **Time Complexity:** `evaluate()`: O(W^2) bit operations
//! - **Space Complexity:** `W * (W - 1) / 2` bits per set (120 bits at 16 ways)

use std::fmt;

use crate::common::constants::MAX_WAYS;
use crate::common::error::{Result, require_power_of_two, require_range};

/// Bit vector over the ways of a set, usually one-hot or empty.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct WayMask(u16);

impl WayMask {
    /// No way selected.
    pub const NONE: Self = Self(0);

    /// Mask from raw bits (bit `n` = way `n`).
    #[inline(always)]
    pub const fn from_bits(bits: u16) -> Self {
        Self(bits)
    }

    /// Mask selecting only `way`.
    #[inline(always)]
    pub const fn one_hot(way: usize) -> Self {
        Self(1 << way)
    }

    /// Raw bits.
    #[inline(always)]
    pub const fn bits(self) -> u16 {
        self.0
    }

    /// Whether no way is selected.
    #[inline(always)]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Number of selected ways.
    #[inline(always)]
    pub const fn count(self) -> u32 {
        self.0.count_ones()
    }

    /// Whether `way` is selected.
    #[inline(always)]
    pub const fn contains(self, way: usize) -> bool {
        (self.0 >> way) & 1 != 0
    }

    /// The selected way when exactly one is selected.
    #[inline]
    pub const fn way(self) -> Option<usize> {
        if self.0.count_ones() == 1 {
            Some(self.0.trailing_zeros() as usize)
        } else {
            None
        }
    }

    /// Lowest selected way, if any.
    #[inline]
    pub const fn first(self) -> Option<usize> {
        if self.0 == 0 {
            None
        } else {
            Some(self.0.trailing_zeros() as usize)
        }
    }
}

impl fmt::Debug for WayMask {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "WayMask({:#b})", self.0)
    }
}

/// Packed pairwise-order history of one set.
///
/// Bit `pair_index(i, j)` is set when way `i` is older than way `j`.
/// The all-zero word orders the ways `W-1` (oldest) down to `0` (youngest).
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct HistoryWord(u128);

impl HistoryWord {
    /// Word from raw bits.
    #[inline(always)]
    pub const fn from_bits(bits: u128) -> Self {
        Self(bits)
    }

    /// Raw bits.
    #[inline(always)]
    pub const fn bits(self) -> u128 {
        self.0
    }

    #[inline(always)]
    const fn bit(self, index: usize) -> bool {
        (self.0 >> index) & 1 != 0
    }
}

impl fmt::Debug for HistoryWord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "HistoryWord({:#b})", self.0)
    }
}

/// Expanded `W x W` older-than matrix. Row `i`, bit `j` holds `M[i][j]`.
#[derive(Clone, Copy, PartialEq, Eq)]
pub struct OrderMatrix {
    rows: [u16; MAX_WAYS],
    ways: usize,
}

impl OrderMatrix {
    /// Entry `M[i][j]`: way `i` is older than (or equal to, on the diagonal) way `j`.
    #[inline(always)]
    pub const fn get(&self, i: usize, j: usize) -> bool {
        (self.rows[i] >> j) & 1 != 0
    }

    #[inline(always)]
    const fn full_row(&self) -> u16 {
        ((1u32 << self.ways) - 1) as u16
    }

    /// Ways whose row is all ones, i.e. older than every other way.
    pub fn row_and(&self) -> WayMask {
        let full = self.full_row();
        let mut mask = 0u16;
        for (i, row) in self.rows[..self.ways].iter().enumerate() {
            if *row & full == full {
                mask |= 1 << i;
            }
        }
        WayMask(mask)
    }

    /// Ways younger than every other way (row zero off the diagonal).
    pub fn youngest(&self) -> WayMask {
        let full = self.full_row();
        let mut mask = 0u16;
        for (i, row) in self.rows[..self.ways].iter().enumerate() {
            if *row & full == 1 << i {
                mask |= 1 << i;
            }
        }
        WayMask(mask)
    }

    /// Records an access to `way`: it becomes younger than every other way.
    pub fn touch(&mut self, way: usize) {
        self.rows[way] = 1 << way;
        for (j, row) in self.rows[..self.ways].iter_mut().enumerate() {
            if j != way {
                *row |= 1 << way;
            }
        }
    }

    /// Checks the strict-total-order properties: reflexive diagonal,
    /// complementary off-diagonal pairs, and transitivity.
    pub fn is_strict_total_order(&self) -> bool {
        let n = self.ways;
        for i in 0..n {
            if !self.get(i, i) {
                return false;
            }
            for j in 0..n {
                if i != j && self.get(i, j) == self.get(j, i) {
                    return false;
                }
            }
        }
        for i in 0..n {
            for j in 0..n {
                for k in 0..n {
                    if self.get(i, j) && self.get(j, k) && !self.get(i, k) {
                        return false;
                    }
                }
            }
        }
        true
    }
}

impl fmt::Debug for OrderMatrix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut list = f.debug_list();
        for row in &self.rows[..self.ways] {
            let bits = row.reverse_bits() >> (16 - self.ways);
            let _ = list.entry(&format_args!("{bits:0width$b}", width = self.ways));
        }
        list.finish()
    }
}

/// Result of evaluating one set's history against one access.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LruOutcome {
    /// Least recently used way before the access (the eviction victim).
    pub evict: WayMask,
    /// Least recently used way after the access.
    pub post: WayMask,
    /// Most recently used way after the access.
    pub mru: WayMask,
    /// History word with the access recorded.
    pub history: HistoryWord,
}

/// Stateless matrix PLRU evaluator for a fixed associativity.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PseudoLru {
    ways: usize,
}

impl PseudoLru {
    /// Creates an evaluator for `ways`-way sets.
    ///
    /// # Errors
    ///
    /// Rejects `ways` that is not a power of two or lies outside `2..=16`.
    pub fn new(ways: usize) -> Result<Self> {
        require_power_of_two("ways", ways as u64)?;
        require_range("ways", ways as u64, 2, MAX_WAYS as u64)?;
        Ok(Self { ways })
    }

    /// Associativity.
    #[inline(always)]
    pub const fn ways(&self) -> usize {
        self.ways
    }

    /// History bits per set: `W * (W - 1) / 2`.
    #[inline(always)]
    pub const fn history_bits(&self) -> usize {
        self.ways * (self.ways - 1) / 2
    }

    /// Position of pair `(i, j)`, `i < j`, in the packed word.
    #[inline(always)]
    pub const fn pair_index(&self, i: usize, j: usize) -> usize {
        debug_assert!(i < j && j < self.ways);
        i * (2 * self.ways - i - 1) / 2 + (j - i - 1)
    }

    /// Unpacks a history word into the full order matrix.
    pub fn expand(&self, history: HistoryWord) -> OrderMatrix {
        let mut rows = [0u16; MAX_WAYS];
        for i in 0..self.ways {
            let mut row = 1u16 << i;
            for (j, lower) in rows[..i].iter().enumerate() {
                if (*lower >> i) & 1 == 0 {
                    row |= 1 << j;
                }
            }
            for j in i + 1..self.ways {
                if history.bit(self.pair_index(i, j)) {
                    row |= 1 << j;
                }
            }
            rows[i] = row;
        }
        OrderMatrix {
            rows,
            ways: self.ways,
        }
    }

    /// Packs the upper triangle of a matrix back into a history word.
    pub fn compress(&self, matrix: &OrderMatrix) -> HistoryWord {
        let mut bits = 0u128;
        for i in 0..self.ways {
            for j in i + 1..self.ways {
                if matrix.get(i, j) {
                    bits |= 1 << self.pair_index(i, j);
                }
            }
        }
        HistoryWord(bits)
    }

    /// Evaluates a set: victim before the access, updated history, and the
    /// LRU / MRU ways after the access.
    ///
    /// `access` must be one-hot or empty; an empty mask leaves the history
    /// untouched.
    ///
    /// # Panics
    ///
    /// Panics if `access` selects more than one way or a way beyond the
    /// associativity.
    pub fn evaluate(&self, history: HistoryWord, access: WayMask) -> LruOutcome {
        assert!(
            access.count() <= 1,
            "access mask must be one-hot or empty, got {access:?}"
        );
        assert!(
            u32::from(access.bits()) >> self.ways == 0,
            "access mask {access:?} selects a way beyond {} ways",
            self.ways
        );

        let mut matrix = self.expand(history);
        let evict = matrix.row_and();
        if let Some(way) = access.way() {
            matrix.touch(way);
        }

        LruOutcome {
            evict,
            post: matrix.row_and(),
            mru: matrix.youngest(),
            history: self.compress(&matrix),
        }
    }

    /// Victim way for a set that is about to be refilled.
    pub fn victim(&self, history: HistoryWord) -> usize {
        let evict = self.expand(history).row_and();
        debug_assert!(evict.way().is_some(), "history {history:?} is not a total order");
        evict.first().unwrap_or(0)
    }
}
