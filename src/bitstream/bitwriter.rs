use std::io::{self, Write};

use log::trace;

use super::CHUNK_SIZE;

/// Writes a bitstream for output. Bits are packed into each byte least significant bit first
/// and the finished bytes are written to the sink one chunk at a time.
pub struct BitWriter<W: Write> {
    /// Output buffer holding full bytes that are waiting to be written.
    output: Vec<u8>,
    /// Private queue to hold bits that are waiting to be put as a byte into the output buffer.
    queue: u8,
    /// Count of valid bits in the queue.
    q_bits: u8,
    /// Total number of bits put on the stream so far.
    bits_written: u64,
    /// Handle to the output stream
    writer: W,
}

impl<W: Write> BitWriter<W> {
    /// Create a new BitWriter with an output buffer of CHUNK_SIZE bytes. Call finish() to flush
    /// the last partial byte before dropping the writer.
    pub fn new(writer: W) -> Self {
        Self {
            output: Vec::with_capacity(CHUNK_SIZE),
            queue: 0,
            q_bits: 0,
            bits_written: 0,
            writer,
        }
    }

    /// Put one bit on the stream.
    pub fn put_bit(&mut self, bit: bool) -> io::Result<()> {
        self.queue |= (bit as u8) << self.q_bits;
        self.q_bits += 1;
        self.bits_written += 1;
        if self.q_bits == 8 {
            self.output.push(self.queue);
            self.queue = 0;
            self.q_bits = 0;
            if self.output.len() == CHUNK_SIZE {
                self.write_out()?;
            }
        }
        Ok(())
    }

    /// Put a sequence of bits on the stream, first element first.
    pub fn put_bits(&mut self, bits: &[bool]) -> io::Result<()> {
        bits.iter().try_for_each(|&bit| self.put_bit(bit))
    }

    /// Number of bits put so far, padding not included.
    pub fn bits_written(&self) -> u64 {
        self.bits_written
    }

    /// Write the buffered full bytes to the sink.
    fn write_out(&mut self) -> io::Result<()> {
        self.writer.write_all(&self.output)?;
        self.output.clear();
        Ok(())
    }

    /// Flushes the remaining bits (1-7) as a final byte, zero in the unused high bits, and hands
    /// back the sink. Finish MUST be called or the tail of the stream is lost.
    pub fn finish(mut self) -> io::Result<W> {
        if self.q_bits > 0 {
            trace!("Padding last byte with {} bits.", 8 - self.q_bits);
            self.output.push(self.queue);
            self.queue = 0;
            self.q_bits = 0;
        }
        self.write_out()?;
        self.writer.flush()?;
        Ok(self.writer)
    }
}
