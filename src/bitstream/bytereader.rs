//! ByteReader: buffered byte cursor over any `Read` source.
//!
//! Backs both the frequency count pass and the bit reader. It also implements `Read`, so the
//! archive header can be parsed from the same buffer that later feeds the bitstream.

use std::io::{self, ErrorKind, Read};

use super::CHUNK_SIZE;

/// Reads bytes one at a time from a chunk buffer that is refilled from the source.
#[derive(Debug)]
pub struct ByteReader<R> {
    buffer: Vec<u8>,
    cursor: usize,
    filled: usize,
    source: R,
}

impl<R: Read> ByteReader<R> {
    /// Creates a new ByteReader with a buffer of CHUNK_SIZE bytes.
    pub fn new(source: R) -> Self {
        Self::with_capacity(CHUNK_SIZE, source)
    }

    /// Creates a new ByteReader with a buffer of `size` bytes (at least one).
    pub fn with_capacity(size: usize, source: R) -> Self {
        Self {
            buffer: vec![0; size.max(1)],
            cursor: 0,
            filled: 0,
            source,
        }
    }

    /// Check (and refill) the buffer. Returns true if at least one unread byte is available.
    fn have_data(&mut self) -> io::Result<bool> {
        if self.cursor < self.filled {
            return Ok(true);
        }
        loop {
            match self.source.read(&mut self.buffer) {
                Ok(size) => {
                    self.cursor = 0;
                    self.filled = size;
                    return Ok(size > 0);
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// True when every byte of the source has been consumed.
    pub fn at_end(&mut self) -> io::Result<bool> {
        Ok(!self.have_data()?)
    }

    /// Return the next byte. Fails with `UnexpectedEof` when the source is exhausted.
    pub fn next_byte(&mut self) -> io::Result<u8> {
        if !self.have_data()? {
            return Err(io::Error::new(
                ErrorKind::UnexpectedEof,
                "byte source exhausted",
            ));
        }
        let byte = self.buffer[self.cursor];
        self.cursor += 1;
        Ok(byte)
    }

    /// Give back the source. Any buffered but unread bytes are lost.
    pub fn into_inner(self) -> R {
        self.source
    }
}

impl<R: Read> Read for ByteReader<R> {
    fn read(&mut self, out: &mut [u8]) -> io::Result<usize> {
        if out.is_empty() || !self.have_data()? {
            return Ok(0);
        }
        let n = out.len().min(self.filled - self.cursor);
        out[..n].copy_from_slice(&self.buffer[self.cursor..self.cursor + n]);
        self.cursor += n;
        Ok(n)
    }
}
