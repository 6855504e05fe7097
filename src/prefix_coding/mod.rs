//! The prefix_coding module holds the code tree of chrigizip and everything derived from it.
//!
//! One tree covers the whole file. It is built from the byte histogram by recursively cutting
//! the sorted byte list where the running weight comes closest to half, which yields a valid
//! prefix code in O(n log n), though not always as short as a Huffman code.
//!
//! - split_tree: the flat node vector and its construction.
//! - tree_codec: the binary form of the tree stored in the file header.
//! - code_table: byte -> bit path table used while compressing.
//!

pub mod code_table;
pub mod split_tree;
pub mod tree_codec;
