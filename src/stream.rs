//! Stream sources: a 100 KiB chunked file reader, plus an in-memory
//! variant for tests.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{HarnessError, Result};

pub const CHUNK_BYTES: usize = 100 * 1024;

pub enum StreamSource {
    File { reader: BufReader<File>, chunk: Vec<u8>, len: usize, pos: usize },
    Memory { bytes: Vec<u8>, pos: usize },
}

impl StreamSource {
    pub fn open_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|source| HarnessError::Io { path: path.to_path_buf(), source })?;
        Ok(StreamSource::File { reader: BufReader::new(file), chunk: vec![0u8; CHUNK_BYTES], len: 0, pos: 0 })
    }

    pub fn from_bytes(bytes: Vec<u8>) -> Self {
        StreamSource::Memory { bytes, pos: 0 }
    }

    /// Pull the next byte, refilling the chunk buffer from disk as needed.
    /// Returns `Ok(None)` at end of stream.
    pub fn next_byte(&mut self) -> Result<Option<u8>> {
        match self {
            StreamSource::Memory { bytes, pos } => {
                if *pos < bytes.len() {
                    let b = bytes[*pos];
                    *pos += 1;
                    Ok(Some(b))
                } else {
                    Ok(None)
                }
            }
            StreamSource::File { reader, chunk, len, pos } => {
                if *pos >= *len {
                    let n = reader.read(chunk).map_err(|source| HarnessError::Io {
                        path: std::path::PathBuf::from("<stream>"),
                        source,
                    })?;
                    *len = n;
                    *pos = 0;
                    if n == 0 {
                        return Ok(None);
                    }
                }
                let b = chunk[*pos];
                *pos += 1;
                Ok(Some(b))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn memory_stream_yields_every_byte_in_order() {
        let mut s = StreamSource::from_bytes(b"abc".to_vec());
        let mut out = Vec::new();
        while let Some(b) = s.next_byte().unwrap() {
            out.push(b);
        }
        assert_eq!(out, b"abc");
    }

    #[test]
    fn empty_stream_yields_nothing() {
        let mut s = StreamSource::from_bytes(Vec::new());
        assert_eq!(s.next_byte().unwrap(), None);
    }
}
