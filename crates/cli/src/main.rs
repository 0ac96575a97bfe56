//! Instruction cache simulator CLI.
//!
//! This binary drives the cache model against a memory image. It performs:
//! 1. **Setup:** Loads a JSON configuration (or defaults) and a hex memory image.
//! 2. **Replay:** Fetches every address from a trace file, or a linear run of
//!    `count` words from `start`, holding each read until the cache answers.
//! 3. **Report:** Prints the statistics sections, or the counters as JSON.
//!
//! Logging goes through `tracing`; set `RUST_LOG=icache_core=debug` to see
//! misses, refills and flushes.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::EnvFilter;

use icache_core::config::Config;
use icache_core::sim::Simulator;

#[derive(Parser, Debug)]
#[command(
    name = "icache-sim",
    author,
    version,
    about = "Cycle-stepped instruction cache simulator",
    long_about = "Replay an instruction fetch trace through a set-associative instruction cache with matrix pseudo-LRU replacement.\n\nExamples:\n  icache-sim run --image prog.hex --start 0x0 --count 256\n  icache-sim run --image prog.hex --trace fetch.trace --config icache.json --json"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Load an image and replay fetches through the cache.
    Run {
        /// Hex memory image loaded at address zero.
        #[arg(short, long)]
        image: PathBuf,

        /// JSON configuration file; built-in defaults when absent.
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Fetch trace: one hex address per line.
        #[arg(short, long, conflicts_with_all = ["start", "count"])]
        trace: Option<PathBuf>,

        /// First address of a linear fetch run.
        #[arg(long, value_parser = parse_addr, default_value = "0")]
        start: u32,

        /// Number of words in a linear fetch run.
        #[arg(long, default_value_t = 1024)]
        count: u32,

        /// Print statistics as JSON instead of the text report.
        #[arg(long)]
        json: bool,

        /// Statistics sections to print (summary, lookup, refill); all when omitted.
        #[arg(long = "section")]
        sections: Vec<String>,
    },
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Run {
            image,
            config,
            trace,
            start,
            count,
            json,
            sections,
        } => {
            let config = load_config(config.as_deref())?;
            let addrs = match trace {
                Some(path) => load_trace(&path)?,
                None => (0..count).map(|i| start.wrapping_add(i << 2)).collect(),
            };
            cmd_run(&config, &image, &addrs, json, &sections)
        }
    }
}

/// Builds the simulator, replays `addrs` and prints the statistics.
fn cmd_run(
    config: &Config,
    image: &Path,
    addrs: &[u32],
    json: bool,
    sections: &[String],
) -> Result<()> {
    let mut sim = Simulator::new(config).context("invalid configuration")?;
    let words = sim
        .load_image(image)
        .with_context(|| format!("loading {}", image.display()))?;
    info!(words, fetches = addrs.len(), "starting replay");

    let reset_cycles = sim.settle()?;
    info!(reset_cycles, "cache ready");
    let _ = sim.run_trace(addrs.iter().copied())?;

    if json {
        println!("{}", serde_json::to_string_pretty(sim.stats())?);
    } else {
        sim.stats().print_sections(sections);
    }
    Ok(())
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let text =
        fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("parsing {}", path.display()))
}

fn load_trace(path: &Path) -> Result<Vec<u32>> {
    let text = fs::read_to_string(path).with_context(|| format!("reading {}", path.display()))?;
    let mut addrs = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = raw.split('#').next().unwrap_or_default().trim();
        if line.is_empty() {
            continue;
        }
        match parse_addr(line) {
            Ok(addr) => addrs.push(addr),
            Err(e) => bail!("{}:{}: {e}", path.display(), idx + 1),
        }
    }
    Ok(addrs)
}

fn parse_addr(s: &str) -> std::result::Result<u32, String> {
    let digits = s
        .strip_prefix("0x")
        .or_else(|| s.strip_prefix("0X"))
        .unwrap_or(s);
    u32::from_str_radix(digits, 16).map_err(|e| format!("bad address {s:?}: {e}"))
}
