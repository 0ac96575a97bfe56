//! # Backing Memory Tests
//!
//! Verifies the `SimMemory` handshake timing, byte-lane writes, address
//! aliasing, fault injection and construction checks.

use pretty_assertions::assert_eq;
use rstest::rstest;

use icache_core::common::error::ConfigError;
use icache_core::common::port::MemRequest;
use icache_core::soc::{BackingMemory, SimMemory};

/// Cycles until `request` is accepted when held from an idle start.
fn cycles_to_ready(mem: &mut SimMemory, request: &MemRequest) -> u32 {
    for cycle in 1..=100 {
        if mem.cycle(request).ready {
            return cycle;
        }
    }
    panic!("memory never answered");
}

// ══════════════════════════════════════════════════════════
// 1. Handshake Timing
// ══════════════════════════════════════════════════════════

/// A request held from idle is accepted on cycle `latency + 1`.
#[rstest]
#[case(0, 1)]
#[case(1, 2)]
#[case(4, 5)]
fn latency_counts_held_cycles(#[case] latency: u32, #[case] expected: u32) {
    let mut mem = SimMemory::new(4096, latency).unwrap();
    assert_eq!(cycles_to_ready(&mut mem, &MemRequest::read(0x10)), expected);
    // The counter restarts for the next beat.
    assert_eq!(cycles_to_ready(&mut mem, &MemRequest::read(0x14)), expected);
    assert_eq!(mem.beats(), 2);
}

/// Dropping `valid` before the response resets the wait.
#[test]
fn dropping_valid_restarts_latency() {
    let mut mem = SimMemory::new(4096, 2).unwrap();
    let request = MemRequest::read(0x0);
    assert!(!mem.cycle(&request).ready);
    assert!(!mem.cycle(&request).ready);
    assert!(!mem.cycle(&MemRequest::IDLE).ready);
    assert_eq!(cycles_to_ready(&mut mem, &request), 3);
}

/// Idle and waiting cycles drive the filler pattern on `rdata`.
#[test]
fn not_ready_drives_filler() {
    let mut mem = SimMemory::new(4096, 1).unwrap();
    mem.write_word(0x20, 0x1234_5678);
    assert_eq!(mem.cycle(&MemRequest::IDLE).rdata, 0xDEAD_F00D);
    assert_eq!(mem.cycle(&MemRequest::read(0x20)).rdata, 0xDEAD_F00D);
    assert_eq!(mem.cycle(&MemRequest::read(0x20)).rdata, 0x1234_5678);
}

// ══════════════════════════════════════════════════════════
// 2. Data
// ══════════════════════════════════════════════════════════

/// Writes merge the enabled byte lanes and echo `wdata`.
#[test]
fn write_merges_enabled_lanes() {
    let mut mem = SimMemory::new(4096, 0).unwrap();
    mem.write_word(0x40, 0x1122_3344);

    let request = MemRequest {
        byte_enable: 0b1010,
        ..MemRequest::write(0x40, 0xAABB_CCDD)
    };
    let resp = mem.cycle(&request);
    assert!(resp.ready);
    assert_eq!(resp.rdata, 0xAABB_CCDD);
    assert_eq!(mem.read_word(0x40), 0xAA22_CC44);

    let _ = mem.cycle(&MemRequest::write(0x40, 0x0BAD_CAFE));
    assert_eq!(mem.read_word(0x40), 0x0BAD_CAFE);
}

/// Address bits above the memory size alias; the low two bits are ignored.
#[test]
fn word_index_ignores_high_and_low_bits() {
    let mut mem = SimMemory::new(8192, 0).unwrap();
    mem.load_words(0x100, &[1, 2, 3]);
    assert_eq!(mem.read_word(0x104), 2);
    assert_eq!(mem.read_word(0x107), 2);
    assert_eq!(mem.read_word(0x2108), 3);
    assert_eq!(mem.cycle(&MemRequest::read(0xFFFF_E100)).rdata, 1);
}

/// Injected faults are reported on accepted beats only.
#[test]
fn injected_fault_reported_on_ready() {
    let mut mem = SimMemory::new(4096, 1).unwrap();
    mem.inject_fault(0x30);
    let request = MemRequest::read(0x30);

    let first = mem.cycle(&request);
    assert!(!first.ready && !first.fault);
    let second = mem.cycle(&request);
    assert!(second.ready && second.fault);

    assert!(!mem.cycle(&MemRequest::IDLE).fault);
    mem.clear_faults();
    let _ = mem.cycle(&request);
    assert!(!mem.cycle(&request).fault);
}

// ══════════════════════════════════════════════════════════
// 3. Construction
// ══════════════════════════════════════════════════════════

#[rstest]
#[case(1000, ConfigError::NotPowerOfTwo { field: "size_bytes", value: 1000 })]
#[case(2048, ConfigError::OutOfRange { field: "size_bytes", value: 2048, min: 4096, max: 1 << 32 })]
fn rejects_bad_sizes(#[case] size: usize, #[case] expected: ConfigError) {
    assert_eq!(SimMemory::new(size, 0).unwrap_err(), expected);
}

#[test]
fn reports_geometry() {
    let mem = SimMemory::new(1 << 20, 7).unwrap();
    assert_eq!(mem.size_bytes(), 1 << 20);
    assert_eq!(mem.latency(), 7);
    assert_eq!(mem.beats(), 0);
}
