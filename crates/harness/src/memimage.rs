//! Memory image preparation.
//!
//! The model's memory is initialised from a text file with one 32-bit word per
//! line. Test binaries are dumped with `objdump -s`, whose section contents look
//! like:
//!
//! ```text
//!  80000000 97020000 93820202 73905230 f3222034  ........s.R0."  4
//!  80000010 6f000000                             o...
//! ```
//!
//! The dump lists bytes in memory order, so each word is byte-swapped into its
//! little-endian value. Holes between dumped ranges (alignment padding between
//! sections) are filled with zero words so every word lands at its address.

use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::common::{HarnessError, Result};

/// Lines of interest start with a RAM address.
const DATA_LINE_PREFIX: &str = " 800";

/// Everything after this section header is not loaded.
const END_MARKER: &str = "Contents of section .comment:";

/// Builds the memory image words from an `objdump -s` dump.
///
/// # Errors
///
/// Returns `HarnessError::Parse` with the 1-based line number when a data line
/// holds a non-hexadecimal address or word, or a word longer than 8 digits.
pub fn memory_image(dump: &str) -> Result<Vec<u32>> {
    let mut words = Vec::new();
    let mut next_addr: Option<u64> = None;

    for (idx, line) in dump.lines().enumerate() {
        if line.contains(END_MARKER) {
            break;
        }
        if !line.starts_with(DATA_LINE_PREFIX) {
            continue;
        }
        let lineno = idx + 1;

        let hex_area = line.trim_start().split("  ").next().unwrap_or_default();
        let mut fields = hex_area.split_whitespace();
        let addr_text = fields.next().unwrap_or_default();
        let addr = u64::from_str_radix(addr_text, 16)
            .map_err(|e| HarnessError::parse(lineno, format!("bad address {addr_text:?}: {e}")))?;

        if let Some(expected) = next_addr {
            if addr > expected {
                let gap = (addr - expected) / 4;
                debug!(line = lineno, from = expected, to = addr, gap, "zero-filling gap");
                words.extend(std::iter::repeat_n(0, gap as usize));
            } else if addr < expected {
                warn!(line = lineno, addr, expected, "dump address goes backwards");
            }
        }

        let mut count = 0u64;
        for word in fields {
            words.push(parse_word(word, lineno)?);
            count += 1;
        }
        next_addr = Some(addr + 4 * count);
    }

    Ok(words)
}

/// Parses one dumped word: bytes in memory order, right-padded to four bytes.
fn parse_word(text: &str, lineno: usize) -> Result<u32> {
    if text.len() > 8 {
        return Err(HarnessError::parse(lineno, format!("word too long: {text:?}")));
    }
    let padded = format!("{text:0<8}");
    u32::from_str_radix(&padded, 16)
        .map(u32::swap_bytes)
        .map_err(|e| HarnessError::parse(lineno, format!("bad word {text:?}: {e}")))
}

/// Renders image words, one 8-digit hex word per line.
pub fn render_image(words: &[u32]) -> String {
    words.iter().map(|w| format!("{w:08x}\n")).collect()
}

/// Converts the dump at `input` and writes the image to `output`.
///
/// Returns the number of words written.
///
/// # Errors
///
/// Fails when either file cannot be accessed or the dump is malformed.
pub fn convert_file(input: &Path, output: &Path) -> Result<usize> {
    let words = memory_image(&fs::read_to_string(input)?)?;
    fs::write(output, render_image(&words))?;
    Ok(words.len())
}

/// Converts every `.txt` dump in `input_dir` into a same-named image in `output_dir`.
///
/// `output_dir` is created if missing. Returns the number of files converted.
///
/// # Errors
///
/// Stops at the first file that cannot be read, parsed or written.
pub fn convert_dir(input_dir: &Path, output_dir: &Path) -> Result<usize> {
    fs::create_dir_all(output_dir)?;
    let mut converted = 0;
    for entry in fs::read_dir(input_dir)? {
        let path = entry?.path();
        if path.extension().is_none_or(|ext| ext != "txt") {
            continue;
        }
        let Some(name) = path.file_name() else {
            continue;
        };
        let words = convert_file(&path, &output_dir.join(name))?;
        debug!(file = %path.display(), words, "memory image written");
        converted += 1;
    }
    Ok(converted)
}
