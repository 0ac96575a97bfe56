//! Cache statistics collection and reporting.
//!
//! This module tracks performance metrics for the instruction cache. It provides:
//! 1. **Cycles:** Total clock cycles and cycles spent away from the lookup state.
//! 2. **Lookups:** Hit and miss counts and the derived hit rate.
//! 3. **Refills:** Accepted refill beats and refills that completed with a fault.
//! 4. **Maintenance:** Completed flush sweeps and rejected write requests.

use serde::Serialize;

/// Cache statistics counters.
///
/// Updated by the controller on every clock; serialisable for the CLI's
/// `--json` output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct CacheStats {
    /// Total clock cycles elapsed.
    pub cycles: u64,
    /// Requests served from a valid line.
    pub hits: u64,
    /// Requests that started a refill.
    pub misses: u64,
    /// Refill beats accepted from backing memory.
    pub refill_beats: u64,
    /// Refills in which at least one beat faulted.
    pub refill_faults: u64,
    /// Completed flush sweeps (including the one after reset).
    pub flushes: u64,
    /// Write requests answered with a fault.
    pub rejected_writes: u64,
    /// Cycles the controller spent outside the lookup state.
    pub busy_cycles: u64,
}

/// Section names for selective stats output.
///
/// Valid section identifiers: `"summary"`, `"lookup"`, `"refill"`.
/// Pass an empty slice to `print_sections` to print all sections.
pub const STATS_SECTIONS: &[&str] = &["summary", "lookup", "refill"];

impl CacheStats {
    /// Completed lookups (hits plus misses).
    pub const fn accesses(&self) -> u64 {
        self.hits + self.misses
    }

    /// Fraction of lookups that hit, in `0.0..=1.0`; zero before any lookup.
    pub fn hit_rate(&self) -> f64 {
        let total = self.accesses();
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }

    /// Prints only the requested statistics sections to stdout.
    ///
    /// Each element of `sections` should be one of `"summary"`, `"lookup"` or
    /// `"refill"`. Pass an empty slice to print all sections (same as `print()`).
    ///
    /// # Arguments
    ///
    /// * `sections` - Slice of section names to print, or empty for all.
    pub fn print_sections(&self, sections: &[String]) {
        let want = |s: &str| sections.is_empty() || sections.iter().any(|x| x == s);
        let cyc = self.cycles.max(1);

        if want("summary") {
            println!("\n==========================================================");
            println!("INSTRUCTION CACHE SIMULATION STATISTICS");
            println!("==========================================================");
            println!("sim_cycles               {}", self.cycles);
            println!(
                "busy_cycles              {} ({:.2}%)",
                self.busy_cycles,
                (self.busy_cycles as f64 / cyc as f64) * 100.0
            );
            println!("----------------------------------------------------------");
        }
        if want("lookup") {
            println!("LOOKUP");
            println!("  icache.accesses        {}", self.accesses());
            println!("  icache.hits            {}", self.hits);
            println!("  icache.misses          {}", self.misses);
            println!("  icache.hit_rate        {:.2}%", self.hit_rate() * 100.0);
            println!("  icache.rejected_writes {}", self.rejected_writes);
            println!("----------------------------------------------------------");
        }
        if want("refill") {
            println!("REFILL");
            println!("  refill.beats           {}", self.refill_beats);
            println!("  refill.faults          {}", self.refill_faults);
            println!("  flush.sweeps           {}", self.flushes);
        }
        println!("==========================================================");
    }

    /// Prints all statistics sections to stdout.
    ///
    /// Equivalent to `print_sections(&[])`.
    pub fn print(&self) {
        self.print_sections(&[]);
    }
}
