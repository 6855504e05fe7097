//! chrigizip: a single file compressor built on a weight-split prefix code.
//!
//! The bytes of a file are counted, the byte values are sorted by frequency, and the sorted list
//! is cut recursively where the running weight is closest to half. The resulting binary tree is
//! stored in the output header and every byte is replaced by its path through the tree.
//!
//! Basic usage to compress a file is as follows:
//!
//! `$> chrigizip -e test.txt`
//!
//! This will create test.txt.chrigi in the current directory. `chrigizip -x test.txt.chrigi`
//! restores test.txt.
//!
//! The same pipeline works in memory:
//!
//! ```
//! use chrigizip::compression::{compress::compress_bytes, decompress::decompress_bytes};
//!
//! let packed = compress_bytes("note.txt", b"hello hello hello")?;
//! let (header, data) = decompress_bytes(&packed)?;
//! assert_eq!(header.name, b"note.txt");
//! assert_eq!(data, b"hello hello hello");
//! # Ok::<(), chrigizip::error::ZipError>(())
//! ```
//!
pub mod bitstream;
pub mod compression;
pub mod error;
pub mod prefix_coding;
pub mod tools;

pub use error::{Result, ZipError};
