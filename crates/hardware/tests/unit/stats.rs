//! # Statistics Tests
//!
//! Verifies that `CacheStats` counters follow the controller's activity and
//! that derived metrics and the JSON form are consistent.

use pretty_assertions::assert_eq;

use icache_core::common::port::CpuRequest;
use icache_core::stats::{CacheStats, STATS_SECTIONS};

use crate::common::harness::CacheHarness;

#[test]
fn test_hit_rate_empty_is_zero() {
    let stats = CacheStats::default();
    assert_eq!(stats.accesses(), 0);
    assert_eq!(stats.hit_rate(), 0.0);
}

#[test]
fn test_hit_rate_ratio() {
    let stats = CacheStats {
        hits: 3,
        misses: 1,
        ..CacheStats::default()
    };
    assert_eq!(stats.accesses(), 4);
    assert!((stats.hit_rate() - 0.75).abs() < f64::EPSILON);
}

#[test]
fn test_counters_track_activity() {
    let mut h = CacheHarness::ready(16, 4, 2, 1);
    let reset = *h.cache.stats();
    assert_eq!(reset.cycles, 6);
    assert_eq!(reset.busy_cycles, 6);
    assert_eq!(reset.flushes, 1);

    let _ = h.fresh_read(0x0);
    let _ = h.fresh_read(0x4);
    let _ = h.fresh_read(0x8);
    let _ = h.idle();
    let _ = h.hold(&CpuRequest::write(0x0, 0, 0xF));

    let stats = *h.cache.stats();
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.hits, 2);
    assert_eq!(stats.refill_beats, 4);
    assert_eq!(stats.refill_faults, 0);
    assert_eq!(stats.rejected_writes, 1);
    // Refill: 4 beats x 2 cycles + Wait.
    assert_eq!(stats.busy_cycles, reset.busy_cycles + 9);
    assert!(stats.cycles > stats.busy_cycles);
}

#[test]
fn test_json_field_names() {
    let stats = CacheStats {
        cycles: 10,
        hits: 4,
        misses: 2,
        ..CacheStats::default()
    };
    let value = serde_json::to_value(stats).unwrap();
    assert_eq!(value["cycles"], 10);
    assert_eq!(value["hits"], 4);
    assert_eq!(value["misses"], 2);
    for key in [
        "refill_beats",
        "refill_faults",
        "flushes",
        "rejected_writes",
        "busy_cycles",
    ] {
        assert_eq!(value[key], 0, "{key}");
    }
}

#[test]
fn test_print_sections_accepts_every_section() {
    let stats = CacheStats::default();
    let sections: Vec<String> = STATS_SECTIONS.iter().map(ToString::to_string).collect();
    stats.print_sections(&sections);
    stats.print();
}
