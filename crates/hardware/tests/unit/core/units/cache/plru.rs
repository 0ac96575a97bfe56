//! Matrix Pseudo-LRU Tests.
//!
//! Verifies the pure replacement function `evaluate(history, access)` in
//! isolation: the packed pair layout, the documented worked example, exact LRU
//! behaviour against a reference recency stack, and the strict-total-order
//! invariant of every reachable history word.

use pretty_assertions::assert_eq;
use proptest::prelude::*;
use rstest::rstest;

use icache_core::common::error::ConfigError;
use icache_core::core::units::cache::plru::{HistoryWord, LruOutcome, PseudoLru, WayMask};

/// Reference recency stack: index 0 is the most recently used way.
///
/// Initialised to `[0, 1, .., W-1]`, which is the order an all-zero history
/// word encodes.
struct ReferenceLru {
    stack: Vec<usize>,
}

impl ReferenceLru {
    fn new(ways: usize) -> Self {
        Self {
            stack: (0..ways).collect(),
        }
    }

    fn touch(&mut self, way: usize) {
        let pos = self.stack.iter().position(|&w| w == way).unwrap();
        let _ = self.stack.remove(pos);
        self.stack.insert(0, way);
    }

    fn lru(&self) -> usize {
        *self.stack.last().unwrap()
    }

    fn mru(&self) -> usize {
        self.stack[0]
    }
}

fn replay(lru: &PseudoLru, accesses: &[usize]) -> HistoryWord {
    accesses.iter().fold(HistoryWord::default(), |h, &way| {
        lru.evaluate(h, WayMask::one_hot(way)).history
    })
}

// ══════════════════════════════════════════════════════════
// 1. Construction and Layout
// ══════════════════════════════════════════════════════════

/// Supported associativities and their history widths.
#[rstest]
#[case(2, 1)]
#[case(4, 6)]
#[case(8, 28)]
#[case(16, 120)]
fn history_width_is_pair_count(#[case] ways: usize, #[case] bits: usize) {
    let lru = PseudoLru::new(ways).unwrap();
    assert_eq!(lru.history_bits(), bits);
}

/// Associativities outside 2..=16 or not a power of two are rejected.
#[rstest]
#[case(1)]
#[case(3)]
#[case(6)]
#[case(32)]
fn unsupported_associativity_rejected(#[case] ways: usize) {
    let err = PseudoLru::new(ways).unwrap_err();
    assert!(matches!(
        err,
        ConfigError::NotPowerOfTwo { field: "ways", .. } | ConfigError::OutOfRange { field: "ways", .. }
    ));
}

/// Every pair maps to a distinct bit below `history_bits`.
#[test]
fn pair_indices_are_dense_and_unique() {
    let lru = PseudoLru::new(8).unwrap();
    let mut seen = vec![false; lru.history_bits()];
    for i in 0..8 {
        for j in i + 1..8 {
            let idx = lru.pair_index(i, j);
            assert!(!seen[idx], "pair ({i}, {j}) reuses bit {idx}");
            seen[idx] = true;
        }
    }
    assert!(seen.iter().all(|&s| s));
}

// ══════════════════════════════════════════════════════════
// 2. Worked Example (W = 4)
// ══════════════════════════════════════════════════════════

/// History `0b110100` orders the ways oldest-first as 2, 1, 0, 3. An access
/// to way 2 evicts way 2 (it was the LRU), makes it the MRU, and leaves way 1
/// as the new LRU.
#[test]
fn worked_example_four_ways() {
    let lru = PseudoLru::new(4).unwrap();
    let outcome = lru.evaluate(HistoryWord::from_bits(0b110100), WayMask::one_hot(2));

    assert_eq!(
        outcome,
        LruOutcome {
            evict: WayMask::one_hot(2),
            post: WayMask::one_hot(1),
            mru: WayMask::one_hot(2),
            history: HistoryWord::from_bits(0b011110),
        }
    );
}

/// Expanded matrix of the worked example: row `i` is all ones exactly for the LRU.
#[test]
fn worked_example_matrix_rows() {
    let lru = PseudoLru::new(4).unwrap();
    let m = lru.expand(HistoryWord::from_bits(0b110100));
    assert!(m.is_strict_total_order());
    // Way 2 is older than everyone.
    assert!((0..4).all(|j| m.get(2, j)));
    // Way 3 is younger than everyone.
    assert!((0..3).all(|j| !m.get(3, j)));
    assert_eq!(m.row_and(), WayMask::one_hot(2));
    assert_eq!(m.youngest(), WayMask::one_hot(3));
}

// ══════════════════════════════════════════════════════════
// 3. Exact LRU Behaviour
// ══════════════════════════════════════════════════════════

/// The reset history evicts the highest way and reports way 0 as MRU.
#[rstest]
#[case(2)]
#[case(4)]
#[case(8)]
#[case(16)]
fn reset_history_order(#[case] ways: usize) {
    let lru = PseudoLru::new(ways).unwrap();
    let outcome = lru.evaluate(HistoryWord::default(), WayMask::NONE);
    assert_eq!(outcome.evict, WayMask::one_hot(ways - 1));
    assert_eq!(outcome.mru, WayMask::one_hot(0));
}

/// Touching ways 0..W in order leaves way 0 as LRU; re-touching it moves the
/// LRU to way 1.
#[test]
fn sequential_access_then_reaccess() {
    let lru = PseudoLru::new(4).unwrap();
    let h = replay(&lru, &[0, 1, 2, 3]);
    assert_eq!(lru.victim(h), 0);

    let outcome = lru.evaluate(h, WayMask::one_hot(0));
    assert_eq!(outcome.evict, WayMask::one_hot(0));
    assert_eq!(outcome.post, WayMask::one_hot(1));
    assert_eq!(outcome.mru, WayMask::one_hot(0));
}

/// With two ways the single history bit simply names the other way.
#[test]
fn two_way_alternates() {
    let lru = PseudoLru::new(2).unwrap();
    let after_1 = lru.evaluate(HistoryWord::default(), WayMask::one_hot(1));
    assert_eq!(after_1.post, WayMask::one_hot(0));
    assert_eq!(after_1.history, HistoryWord::from_bits(1));

    let after_0 = lru.evaluate(after_1.history, WayMask::one_hot(0));
    assert_eq!(after_0.post, WayMask::one_hot(1));
    assert_eq!(after_0.history, HistoryWord::default());
}

/// An empty access mask leaves the history unchanged and reports the same
/// LRU before and after.
#[test]
fn empty_access_is_noop() {
    let lru = PseudoLru::new(8).unwrap();
    let h = replay(&lru, &[3, 7, 1, 0, 5]);
    let outcome = lru.evaluate(h, WayMask::NONE);
    assert_eq!(outcome.history, h);
    assert_eq!(outcome.evict, outcome.post);
}

/// Touching the current MRU again changes nothing.
#[test]
fn repeated_access_is_idempotent() {
    let lru = PseudoLru::new(4).unwrap();
    let h = replay(&lru, &[1, 3]);
    let once = lru.evaluate(h, WayMask::one_hot(3));
    assert_eq!(once.history, h);
}

/// A multi-hot access mask is a contract violation.
#[test]
#[should_panic(expected = "one-hot")]
fn multi_hot_access_panics() {
    let lru = PseudoLru::new(4).unwrap();
    let _ = lru.evaluate(HistoryWord::default(), WayMask::from_bits(0b0110));
}

/// An access beyond the configured ways is a contract violation.
#[test]
#[should_panic(expected = "beyond")]
fn out_of_range_access_panics() {
    let lru = PseudoLru::new(4).unwrap();
    let _ = lru.evaluate(HistoryWord::default(), WayMask::one_hot(4));
}

// ══════════════════════════════════════════════════════════
// 4. Properties
// ══════════════════════════════════════════════════════════

fn ways_and_accesses() -> impl Strategy<Value = (usize, Vec<usize>)> {
    prop_oneof![Just(2usize), Just(4), Just(8), Just(16)].prop_flat_map(|ways| {
        (Just(ways), prop::collection::vec(0..ways, 0..64))
    })
}

proptest! {
    /// Every history reachable from reset expands to a strict total order
    /// and survives an expand / compress round trip.
    #[test]
    fn reachable_histories_are_total_orders((ways, accesses) in ways_and_accesses()) {
        let lru = PseudoLru::new(ways).unwrap();
        let mut h = HistoryWord::default();
        for way in accesses {
            let outcome = lru.evaluate(h, WayMask::one_hot(way));
            prop_assert_eq!(outcome.evict.count(), 1);
            prop_assert_eq!(outcome.post.count(), 1);
            prop_assert_eq!(outcome.mru, WayMask::one_hot(way));
            h = outcome.history;

            let m = lru.expand(h);
            prop_assert!(m.is_strict_total_order());
            prop_assert_eq!(lru.compress(&m), h);
            prop_assert!(h.bits() >> lru.history_bits() == 0);
        }
    }

    /// The evaluator agrees with a reference recency stack on every access.
    #[test]
    fn matches_reference_stack((ways, accesses) in ways_and_accesses()) {
        let lru = PseudoLru::new(ways).unwrap();
        let mut reference = ReferenceLru::new(ways);
        let mut h = HistoryWord::default();
        for way in accesses {
            let outcome = lru.evaluate(h, WayMask::one_hot(way));
            prop_assert_eq!(outcome.evict, WayMask::one_hot(reference.lru()));
            reference.touch(way);
            prop_assert_eq!(outcome.post, WayMask::one_hot(reference.lru()));
            prop_assert_eq!(outcome.mru, WayMask::one_hot(reference.mru()));
            h = outcome.history;
        }
    }
}
