//! The compression module drives whole-file compression and decompression for chrigizip.
//!
//! A chrigizip file is laid out as:
//! - Header: the 9 byte tag `chrigizip`, the original file name (u16 length then bytes) and the
//!   original length in bytes (u64). Integers are little-endian.
//! - Tree: node count, node fields and the two leaf masks (see prefix_coding::tree_codec).
//! - Payload: every input byte replaced by its code, bits packed least significant first.
//!
//! Compression reads the input twice: once to count bytes and build the tree, once to encode.
//! Decompression reads header and tree, then walks the tree once per output byte until the
//! stored length has been produced.
//!
//! Outputs are staged in a temporary file and renamed into place when complete.
//!

pub mod compress;
pub mod decompress;
pub mod header;
pub mod staging;
pub mod transcode;
