//! BitReader: reads the packed payload of a chrigizip file.
//!
//! Bits come out of each byte least significant bit first, bytes in stream order. This is the
//! exact order BitWriter puts them in.
//!
//! NOTE: This module can read from any I/O source that supports the read() call.
//!

use std::io::{self, ErrorKind, Read};

use super::bytereader::ByteReader;

/// Reads single bits from a buffered byte source.
#[derive(Debug)]
pub struct BitReader<R> {
    bytes: ByteReader<R>,
    /// Unread bits of the current byte, shifted down so the next one is bit 0.
    current: u8,
    /// How many bits of `current` are still unread.
    bits_left: u8,
}

impl<R: Read> BitReader<R> {
    /// Creates a new BitReader with its own chunk buffer.
    pub fn new(source: R) -> Self {
        Self::from(ByteReader::new(source))
    }

    /// True when no unread bit remains, in the current byte or in the source.
    pub fn at_end(&mut self) -> io::Result<bool> {
        if self.bits_left > 0 {
            return Ok(false);
        }
        self.bytes.at_end()
    }

    /// Return the next bit (true for 1). Fails with `UnexpectedEof` once the source is exhausted.
    pub fn next_bit(&mut self) -> io::Result<bool> {
        if self.bits_left == 0 {
            self.current = self.bytes.next_byte().map_err(|e| {
                if e.kind() == ErrorKind::UnexpectedEof {
                    io::Error::new(ErrorKind::UnexpectedEof, "bit source exhausted")
                } else {
                    e
                }
            })?;
            self.bits_left = 8;
        }
        let bit = self.current & 1 == 1;
        self.current >>= 1;
        self.bits_left -= 1;
        Ok(bit)
    }
}

impl<R> From<ByteReader<R>> for BitReader<R> {
    /// Continue reading bits where a ByteReader left off, keeping its buffered bytes.
    fn from(bytes: ByteReader<R>) -> Self {
        Self {
            bytes,
            current: 0,
            bits_left: 0,
        }
    }
}

#[cfg(test)]
mod test {
    use super::BitReader;
    use crate::bitstream::bytereader::ByteReader;
    use std::io::{ErrorKind, Read};

    #[test]
    fn basic_test() {
        let x = [0b1000_0011_u8].as_slice();
        let mut br = BitReader::new(x);
        assert!(br.next_bit().unwrap());
        assert!(br.next_bit().unwrap());
        for _ in 0..5 {
            assert!(!br.next_bit().unwrap());
        }
        assert!(!br.at_end().unwrap());
        assert!(br.next_bit().unwrap());
        assert!(br.at_end().unwrap());
        assert_eq!(br.next_bit().unwrap_err().kind(), ErrorKind::UnexpectedEof);
    }

    #[test]
    fn byte_order_test() {
        // Second byte is only touched after all eight bits of the first
        let x = [0xff_u8, 0x00].as_slice();
        let mut br = BitReader::new(x);
        let bits: Vec<bool> = (0..16).map(|_| br.next_bit().unwrap()).collect();
        assert!(bits[..8].iter().all(|&b| b));
        assert!(bits[8..].iter().all(|&b| !b));
    }

    #[test]
    fn after_header_test() {
        let mut bytes = ByteReader::with_capacity(3, [b'H', b'D', 0b0000_0010].as_slice());
        let mut head = [0_u8; 2];
        bytes.read_exact(&mut head).unwrap();
        assert_eq!(&head, b"HD");
        let mut br = BitReader::from(bytes);
        assert!(!br.next_bit().unwrap());
        assert!(br.next_bit().unwrap());
    }
}
