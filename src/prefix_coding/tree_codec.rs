//! On-disk form of the code tree:
//!
//! - node count: 1 byte
//! - (left, right) field bytes for each node
//! - left leaf mask: 32 bytes
//! - right leaf mask: 32 bytes
//!
//! A field holds a literal byte or a node index; only the masks tell which.

use std::io::{ErrorKind, Read, Write};

use log::trace;

use super::split_tree::{LeafMask, Node, SplitTree};
use crate::error::{Result, ZipError};

/// Write the tree section.
pub fn write_tree<W: Write>(tree: &SplitTree, out: &mut W) -> Result<()> {
    let count = u8::try_from(tree.len()).map_err(|_| ZipError::TooManyNodes(tree.len()))?;
    out.write_all(&[count])?;
    let fields: Vec<u8> = tree
        .nodes()
        .iter()
        .flat_map(|n| [n.left, n.right])
        .collect();
    out.write_all(&fields)?;
    out.write_all(&tree.left_leaf.0)?;
    out.write_all(&tree.right_leaf.0)?;
    trace!("Wrote tree section of {} bytes.", 1 + fields.len() + 64);
    Ok(())
}

/// Read the tree section. Only checks that every declared byte is there; node references are
/// not verified.
pub fn read_tree<R: Read>(input: &mut R) -> Result<SplitTree> {
    let mut count = [0_u8; 1];
    read_section(input, &mut count, "node count")?;

    let mut fields = vec![0_u8; count[0] as usize * 2];
    read_section(input, &mut fields, "tree nodes")?;

    let mut left_leaf = LeafMask::default();
    let mut right_leaf = LeafMask::default();
    read_section(input, &mut left_leaf.0, "left leaf mask")?;
    read_section(input, &mut right_leaf.0, "right leaf mask")?;

    let nodes = fields
        .chunks_exact(2)
        .map(|pair| Node {
            left: pair[0],
            right: pair[1],
        })
        .collect();
    Ok(SplitTree {
        nodes,
        left_leaf,
        right_leaf,
    })
}

impl SplitTree {
    /// The tree section as bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let mut out = Vec::with_capacity(1 + 2 * self.len() + 64);
        write_tree(self, &mut out)?;
        Ok(out)
    }

    /// Parse a tree section from the start of `bytes`.
    pub fn from_bytes(mut bytes: &[u8]) -> Result<Self> {
        read_tree(&mut bytes)
    }
}

fn read_section<R: Read>(input: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    input.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            ZipError::CorruptHeader(format!("file ends inside the {}", what))
        } else {
            ZipError::Stream(e)
        }
    })
}
