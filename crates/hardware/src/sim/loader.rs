//! Hex Memory Image Loader.
//!
//! This module reads memory images written one memory row per text line. It performs:
//! 1. **Parsing:** Each non-empty line holds `2 * bytes_per_line` hex digits; the
//!    rightmost eight digits are the lowest-addressed word of the row.
//! 2. **Validation:** Malformed lines are reported with their 1-based line number.
//! 3. **Sizing:** Images larger than the target memory are rejected before loading.
//!
//! Blank lines and `//` comments are skipped; underscores inside a row are ignored.

use std::fs;
use std::path::Path;

use thiserror::Error;
use tracing::debug;

use crate::common::constants::WORD_BYTES;

/// Hex digits per 32-bit word.
const DIGITS_PER_WORD: usize = 8;

/// Errors produced while reading a memory image.
#[derive(Debug, Error)]
pub enum LoaderError {
    /// The image file could not be read.
    #[error("could not read image: {0}")]
    Io(#[from] std::io::Error),

    /// A row is malformed.
    #[error("line {line}: {reason}")]
    BadLine {
        /// 1-based line number.
        line: usize,
        /// What is wrong with the row.
        reason: String,
    },

    /// The image does not fit in the target memory.
    #[error("image of {image_bytes} bytes does not fit in {memory_bytes} bytes of memory")]
    ImageTooLarge {
        /// Bytes described by the image.
        image_bytes: usize,
        /// Capacity of the target memory.
        memory_bytes: usize,
    },

    /// The configured row width is not a power-of-two multiple of the word size.
    #[error("bytes per line must be a power of two and a multiple of 4, got {0}")]
    BadLineWidth(usize),
}

/// Parses a hex image into words in ascending address order.
///
/// # Arguments
///
/// * `text` - Image contents.
/// * `bytes_per_line` - Bytes encoded by each row.
///
/// # Errors
///
/// [`LoaderError::BadLineWidth`] for an unusable row width and
/// [`LoaderError::BadLine`] for a row of the wrong length or with non-hex digits.
pub fn parse_hex_image(text: &str, bytes_per_line: usize) -> Result<Vec<u32>, LoaderError> {
    let word_bytes = WORD_BYTES as usize;
    if !bytes_per_line.is_power_of_two() || bytes_per_line < word_bytes {
        return Err(LoaderError::BadLineWidth(bytes_per_line));
    }
    let words_per_row = bytes_per_line / word_bytes;
    let digits_per_row = bytes_per_line * 2;

    let mut words = Vec::new();
    for (idx, raw) in text.lines().enumerate() {
        let line = idx + 1;
        let content = raw.split("//").next().unwrap_or_default().trim();
        if content.is_empty() {
            continue;
        }
        let digits: String = content.chars().filter(|&c| c != '_').collect();
        if digits.len() != digits_per_row {
            return Err(LoaderError::BadLine {
                line,
                reason: format!("expected {digits_per_row} hex digits, found {}", digits.len()),
            });
        }
        if let Some(bad) = digits.chars().find(|c| !c.is_ascii_hexdigit()) {
            return Err(LoaderError::BadLine {
                line,
                reason: format!("invalid hex digit {bad:?}"),
            });
        }

        for k in 0..words_per_row {
            let end = digits_per_row - k * DIGITS_PER_WORD;
            let chunk = &digits[end - DIGITS_PER_WORD..end];
            let word = u32::from_str_radix(chunk, 16).map_err(|e| LoaderError::BadLine {
                line,
                reason: e.to_string(),
            })?;
            words.push(word);
        }
    }
    Ok(words)
}

/// Reads and parses a hex image file, checking it fits in `size_bytes` of memory.
///
/// # Errors
///
/// Any [`LoaderError`]; [`LoaderError::ImageTooLarge`] when the image exceeds
/// `size_bytes`.
pub fn load_hex_file(
    path: impl AsRef<Path>,
    bytes_per_line: usize,
    size_bytes: usize,
) -> Result<Vec<u32>, LoaderError> {
    let path = path.as_ref();
    let text = fs::read_to_string(path)?;
    let words = parse_hex_image(&text, bytes_per_line)?;
    let image_bytes = words.len() * WORD_BYTES as usize;
    if image_bytes > size_bytes {
        return Err(LoaderError::ImageTooLarge {
            image_bytes,
            memory_bytes: size_bytes,
        });
    }
    debug!(path = %path.display(), words = words.len(), "image loaded");
    Ok(words)
}
