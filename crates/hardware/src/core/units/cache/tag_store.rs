//! Tag memory.
//!
//! One tag line per set holds a `{valid, tag}` entry for every way plus the
//! set's LRU history word. The controller reads the line for the requested set
//! every cycle and is its only writer.

use super::plru::{HistoryWord, WayMask};

/// Validity and owner tag of one (set, way) slot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TagEntry {
    /// Slot holds a complete line.
    pub valid: bool,
    /// Tag of the line held in the slot.
    pub tag: u32,
}

impl TagEntry {
    /// A valid entry owned by `tag`.
    pub const fn valid(tag: u32) -> Self {
        Self { valid: true, tag }
    }

    /// Whether this entry holds the line owned by `tag`.
    #[inline(always)]
    pub const fn matches(&self, tag: u32) -> bool {
        self.valid && self.tag == tag
    }
}

/// All tag state of one set.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TagLine {
    entries: Vec<TagEntry>,
    history: HistoryWord,
}

impl TagLine {
    fn new(ways: usize) -> Self {
        Self {
            entries: vec![TagEntry::default(); ways],
            history: HistoryWord::default(),
        }
    }

    /// Per-way entries.
    pub fn entries(&self) -> &[TagEntry] {
        &self.entries
    }

    /// LRU history word.
    pub const fn history(&self) -> HistoryWord {
        self.history
    }

    /// Ways holding the line owned by `tag`.
    pub fn hits(&self, tag: u32) -> WayMask {
        let bits = self
            .entries
            .iter()
            .enumerate()
            .filter(|(_, entry)| entry.matches(tag))
            .fold(0u16, |acc, (way, _)| acc | (1 << way));
        WayMask::from_bits(bits)
    }
}

/// Tag memory for every set of the cache.
#[derive(Clone, Debug)]
pub struct TagStore {
    lines: Vec<TagLine>,
}

impl TagStore {
    /// Creates a tag store with every entry invalid and every history reset.
    pub fn new(sets: usize, ways: usize) -> Self {
        Self {
            lines: vec![TagLine::new(ways); sets],
        }
    }

    /// Number of sets.
    pub fn sets(&self) -> usize {
        self.lines.len()
    }

    /// Tag line of `set`.
    #[inline(always)]
    pub fn line(&self, set: usize) -> &TagLine {
        &self.lines[set]
    }

    /// Ways of `set` holding the line owned by `tag`; the complement is the
    /// per-way miss vector.
    #[inline]
    pub fn lookup(&self, set: usize, tag: u32) -> WayMask {
        self.lines[set].hits(tag)
    }

    /// Overwrites one entry.
    pub fn write_entry(&mut self, set: usize, way: usize, entry: TagEntry) {
        self.lines[set].entries[way] = entry;
    }

    /// Overwrites the history word of `set`.
    pub fn write_history(&mut self, set: usize, history: HistoryWord) {
        self.lines[set].history = history;
    }

    /// Zeroes every entry and the history of `set`.
    pub fn clear_set(&mut self, set: usize) {
        let line = &mut self.lines[set];
        line.entries.fill(TagEntry::default());
        line.history = HistoryWord::default();
    }

    /// Number of valid entries across the whole store.
    pub fn valid_count(&self) -> usize {
        self.lines
            .iter()
            .flat_map(|line| line.entries.iter())
            .filter(|entry| entry.valid)
            .count()
    }
}
