//! The two payload loops. Both stop at a byte count fixed before they start, never at the end
//! of their input.

use std::io::{ErrorKind, Read, Write};

use log::{debug, trace};

use crate::bitstream::{bitreader::BitReader, bitwriter::BitWriter, bytereader::ByteReader};
use crate::error::{Result, ZipError};
use crate::prefix_coding::code_table::CodeTable;
use crate::prefix_coding::split_tree::{Child, SplitTree};

/// Encode exactly `count` bytes from `source` onto `sink`.
pub fn encode<R: Read, W: Write>(
    table: &CodeTable,
    source: &mut ByteReader<R>,
    sink: &mut BitWriter<W>,
    count: u64,
) -> Result<()> {
    for done in 0..count {
        let byte = source.next_byte().map_err(|e| truncated(e, count, done))?;
        let code = table.get(byte).ok_or(ZipError::MissingCode(byte))?;
        sink.put_bits(code.bits())?;
    }
    debug!("Encoded {} bytes into {} bits.", count, sink.bits_written());
    Ok(())
}

/// Decode exactly `count` bytes from `source` into `sink` by walking the tree from the root
/// once per byte.
pub fn decode<R: Read, W: Write>(
    tree: &SplitTree,
    source: &mut BitReader<R>,
    sink: &mut W,
    count: u64,
) -> Result<()> {
    if count == 0 {
        return Ok(());
    }
    let root = tree
        .root()
        .ok_or_else(|| ZipError::CorruptHeader(format!("{} bytes declared but the tree is empty", count)))?;
    let nodes = tree.len();

    for done in 0..count {
        let mut index = root;
        let byte = loop {
            let bit = source.next_bit().map_err(|e| truncated(e, count, done))?;
            match tree.child(index, bit) {
                Child::Leaf(byte) => break byte,
                Child::Node(next) if (next as usize) < nodes => index = next,
                Child::Node(next) => {
                    return Err(ZipError::CorruptHeader(format!(
                        "node {} points at missing node {}",
                        index, next
                    )))
                }
            }
        };
        sink.write_all(&[byte])?;
    }
    trace!("Decoded {} bytes.", count);
    Ok(())
}

/// Running out of input is reported with how far the loop got. Other source failures are kept
/// apart from sink failures so the caller can name the right file.
fn truncated(e: std::io::Error, expected: u64, produced: u64) -> ZipError {
    if e.kind() == ErrorKind::UnexpectedEof {
        ZipError::Truncated { expected, produced }
    } else {
        ZipError::Read(e)
    }
}
