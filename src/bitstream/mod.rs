//! The bitstream module forms the I/O subsystem of chrigizip.
//!
//! The payload of a chrigizip file is a plain run of variable length codes with no block
//! structure. Bits are packed least significant bit first: the first bit written lands in bit 0
//! of the first byte. The last byte is padded, and the padding is never read back because the
//! decoder stops at the byte count stored in the header.
//!
//! Each cursor owns a bounded chunk buffer. The buffer size affects throughput only, never the
//! order of the bits.
//!
pub mod bitreader;
pub mod bitwriter;
pub mod bytereader;

/// Size of the read and write chunk buffers.
pub const CHUNK_SIZE: usize = 64 * 1024;
