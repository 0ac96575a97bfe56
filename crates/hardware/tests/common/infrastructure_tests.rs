use super::harness::{CacheHarness, cache_config, pattern};
use super::mocks::memory::RecordingMemory;
use icache_core::common::port::CpuRequest;
use icache_core::core::units::cache::controller::{CacheController, ControllerState};

// ─── CacheHarness ──────────────────────────────────────────────────────────

#[test]
fn harness_reset_flush_takes_sets_plus_two_cycles() {
    let mut h = CacheHarness::new(16, 8, 2, 0);
    assert_eq!(h.cache.state(), ControllerState::Flush);
    assert_eq!(h.settle(), 8 + 2);
    assert_eq!(h.cache.state(), ControllerState::Check);
}

#[test]
fn harness_fill_pattern_populates_memory() {
    let h = CacheHarness::ready(16, 4, 2, 0);
    assert_eq!(h.memory.read_word(0x0000), pattern(0x0000));
    assert_eq!(h.memory.read_word(0x1234), pattern(0x1234));
}

// ─── RecordingMemory ───────────────────────────────────────────────────────

#[test]
fn recording_memory_is_clocked_once_per_tick() {
    let geometry = cache_config(16, 4, 2).geometry().unwrap();
    let mut cache = CacheController::new(&geometry).unwrap();
    let mut mem = RecordingMemory::new();

    for _ in 0..10 {
        let _ = cache.tick(&CpuRequest::IDLE, false, &mut mem);
    }
    assert_eq!(mem.requests.len(), 10);
    assert!(mem.valid_requests().is_empty());
}
