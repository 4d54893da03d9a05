//! Dictionary file loading: lines in a hex-escape grammar, one pattern each.
//!
//! A line is literal bytes outside `|...|` blocks; inside a block,
//! whitespace-separated hex-nibble pairs each decode to one byte. A
//! malformed escape (odd nibble count, unterminated block, non-hex digit)
//! drops that line to length zero and is logged, not fatal — only an I/O
//! failure opening or reading the file aborts the whole load.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{HarnessError, Result};

/// One accepted dictionary entry, before it enters the patterns tree.
#[derive(Clone, Debug)]
pub struct DictEntry {
    pub file_index: u32,
    pub line_index: u32,
    pub bytes: Vec<u8>,
}

/// Load every dictionary file in `paths`, tagging entries with their
/// `file_index` (position in `paths`) and 1-based `line_index`.
pub fn load_files(paths: &[impl AsRef<Path>]) -> Result<Vec<DictEntry>> {
    let mut entries = Vec::new();
    for (file_index, path) in paths.iter().enumerate() {
        load_file(path.as_ref(), file_index as u32, &mut entries)?;
    }
    Ok(entries)
}

fn load_file(path: &Path, file_index: u32, out: &mut Vec<DictEntry>) -> Result<()> {
    let file = File::open(path).map_err(|source| HarnessError::Io { path: path.to_path_buf(), source })?;
    let reader = BufReader::new(file);

    for (line_no, line) in reader.split(b'\n').enumerate() {
        let raw = line.map_err(|source| HarnessError::Io { path: path.to_path_buf(), source })?;
        let line_index = line_no as u32 + 1;
        match decode_line(&raw) {
            Some(bytes) => out.push(DictEntry { file_index, line_index, bytes }),
            None => {
                log::warn!("dictbench: malformed escape sequence in {} line {line_index}, dropped", path.display());
                out.push(DictEntry { file_index, line_index, bytes: Vec::new() });
            }
        }
    }
    Ok(())
}

/// Decode one dictionary line. Returns `None` on a malformed escape, which
/// the caller records as a dropped (zero-length) entry.
fn decode_line(raw: &[u8]) -> Option<Vec<u8>> {
    let line = raw.strip_suffix(b"\r").unwrap_or(raw);
    let mut out = Vec::with_capacity(line.len());
    let mut in_escape = false;
    let mut nibbles: Vec<u8> = Vec::new();

    let mut i = 0;
    while i < line.len() {
        let c = line[i];
        if c == b'|' {
            if in_escape {
                if nibbles.len() % 2 != 0 {
                    return None;
                }
                in_escape = false;
            } else {
                in_escape = true;
                nibbles.clear();
            }
            i += 1;
            continue;
        }

        if in_escape {
            if c.is_ascii_whitespace() {
                i += 1;
                continue;
            }
            let nibble = (c as char).to_digit(16)?;
            nibbles.push(nibble as u8);
            if nibbles.len() == 2 {
                out.push(nibbles[0] << 4 | nibbles[1]);
                nibbles.clear();
            }
            i += 1;
        } else {
            out.push(c);
            i += 1;
        }
    }

    if in_escape {
        return None;
    }
    Some(out)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn literal_bytes_pass_through() {
        assert_eq!(decode_line(b"hello"), Some(b"hello".to_vec()));
    }

    #[test]
    fn hex_escape_block_decodes() {
        // "|41 42 43|" decodes to "ABC".
        assert_eq!(decode_line(b"|41 42 43|"), Some(b"ABC".to_vec()));
    }

    #[test]
    fn mixed_literal_and_escape() {
        assert_eq!(decode_line(b"xx|00|yy"), Some(b"xx\0yy".to_vec()));
    }

    #[test]
    fn unterminated_escape_is_malformed() {
        assert_eq!(decode_line(b"|41 42"), None);
    }

    #[test]
    fn odd_nibble_count_is_malformed() {
        assert_eq!(decode_line(b"|4|"), None);
    }

    #[test]
    fn non_hex_digit_is_malformed() {
        assert_eq!(decode_line(b"|zz|"), None);
    }

    #[test]
    fn empty_line_decodes_to_empty_pattern() {
        assert_eq!(decode_line(b""), Some(Vec::new()));
    }
}
