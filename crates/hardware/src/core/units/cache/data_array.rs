//! Line data storage.
//!
//! One word-addressable array per way, indexed by `(set, word)`. All ways are
//! read in parallel on a lookup; only the refill path writes, and only into
//! the way chosen as victim.

/// Data memory of every way.
#[derive(Clone, Debug)]
pub struct DataArray {
    ways: Vec<Vec<u32>>,
    words_per_line: usize,
}

impl DataArray {
    /// Creates zero-filled storage for `sets` lines of `words_per_line` words per way.
    pub fn new(sets: usize, ways: usize, words_per_line: usize) -> Self {
        Self {
            ways: vec![vec![0; sets * words_per_line]; ways],
            words_per_line,
        }
    }

    #[inline(always)]
    const fn index(&self, set: usize, word: usize) -> usize {
        set * self.words_per_line + word
    }

    /// Word `word` of the line held by `way` in `set`.
    #[inline(always)]
    pub fn read(&self, way: usize, set: usize, word: usize) -> u32 {
        self.ways[way][self.index(set, word)]
    }

    /// Stores one refill word.
    #[inline(always)]
    pub fn write(&mut self, way: usize, set: usize, word: usize, value: u32) {
        let idx = self.index(set, word);
        self.ways[way][idx] = value;
    }

    /// Whole line held by `way` in `set`.
    pub fn line(&self, way: usize, set: usize) -> &[u32] {
        let start = self.index(set, 0);
        &self.ways[way][start..start + self.words_per_line]
    }
}
