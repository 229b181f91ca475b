//! Buffered document reader
//!
//! Drains any `Read` source through a fixed-size buffer into memory. Parsing
//! needs the whole document, so nothing is parsed until the source is
//! exhausted.

use std::io::{self, ErrorKind, Read};

use crate::core::encoding::decode_to_string;
use crate::error::ReadError;

/// Buffer size for reading chunks
const DEFAULT_BUFFER_SIZE: usize = 8192;

/// Chunked reader that accumulates everything it reads
pub struct BufferedReader<R: Read> {
    reader: R,
    buffer: Vec<u8>,
    data: Vec<u8>,
    eof: bool,
}

impl<R: Read> BufferedReader<R> {
    /// Create a new buffered reader
    pub fn new(reader: R) -> Self {
        Self::with_capacity(reader, DEFAULT_BUFFER_SIZE)
    }

    /// Create a new buffered reader with specified chunk size
    pub fn with_capacity(reader: R, capacity: usize) -> Self {
        BufferedReader {
            reader,
            buffer: vec![0u8; capacity.max(1)],
            data: Vec::new(),
            eof: false,
        }
    }

    /// Read one chunk; `Ok(false)` once the source is exhausted
    ///
    /// Interrupted reads are retried.
    pub fn fill_buffer(&mut self) -> io::Result<bool> {
        if self.eof {
            return Ok(false);
        }

        loop {
            match self.reader.read(&mut self.buffer) {
                Ok(0) => {
                    self.eof = true;
                    return Ok(false);
                }
                Ok(read) => {
                    self.data.extend_from_slice(&self.buffer[..read]);
                    return Ok(true);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Everything read so far
    pub fn buffered(&self) -> &[u8] {
        &self.data
    }

    /// Check if the source is exhausted
    pub fn is_eof(&self) -> bool {
        self.eof
    }

    /// Read all remaining content and hand back every byte read
    pub fn read_to_end(mut self) -> io::Result<Vec<u8>> {
        while self.fill_buffer()? {}
        Ok(self.data)
    }
}

/// Read a whole document from `reader` and decode it to text
///
/// # Errors
///
/// `ReadError::Io` for failed reads, `ReadError::Encoding` for undecodable
/// bytes.
pub fn read_document<R: Read>(reader: R) -> Result<String, ReadError> {
    let bytes = BufferedReader::new(reader).read_to_end()?;
    log::trace!("read {} bytes of document input", bytes.len());
    decode_to_string(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    /// Hands out at most `step` bytes per read, interrupting every other call
    struct Trickle {
        data: Vec<u8>,
        pos: usize,
        step: usize,
        interrupt: bool,
    }

    impl Read for Trickle {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.interrupt = !self.interrupt;
            if self.interrupt {
                return Err(io::Error::from(ErrorKind::Interrupted));
            }
            let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
            buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
            self.pos += n;
            Ok(n)
        }
    }

    #[test]
    fn test_fill_buffer() {
        let data = b"<root>content</root>";
        let mut reader = BufferedReader::new(Cursor::new(data.to_vec()));

        assert!(reader.fill_buffer().unwrap());
        assert_eq!(reader.buffered(), data);
        assert!(!reader.fill_buffer().unwrap());
        assert!(reader.is_eof());
    }

    #[test]
    fn test_small_chunks() {
        let data = b"<root>content</root>".to_vec();
        let reader = BufferedReader::with_capacity(Cursor::new(data.clone()), 3);
        assert_eq!(reader.read_to_end().unwrap(), data);
    }

    #[test]
    fn test_interrupted_reads_retried() {
        let source = Trickle {
            data: "<a>ünïcode</a>".as_bytes().to_vec(),
            pos: 0,
            step: 2,
            interrupt: false,
        };
        assert_eq!(read_document(source).unwrap(), "<a>ünïcode</a>");
    }

    #[test]
    fn test_read_error() {
        struct Broken;
        impl Read for Broken {
            fn read(&mut self, _: &mut [u8]) -> io::Result<usize> {
                Err(io::Error::new(ErrorKind::UnexpectedEof, "cut"))
            }
        }
        assert!(matches!(read_document(Broken), Err(ReadError::Io(_))));
    }
}
