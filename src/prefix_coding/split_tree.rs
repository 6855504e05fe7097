//! The code tree, kept as a flat vector of nodes addressed by 8 bit indices.
//!
//! Construction is a top-down weight-balanced split of the sorted histogram (Shannon-Fano
//! style) rather than Huffman's bottom-up merge. Each node is pushed only after both of its
//! children exist, so a child index is always smaller than its parent's and the root is the
//! last node.

use log::{debug, trace};

use crate::error::{Result, ZipError};
use crate::tools::freq_count::{ByteCount, Histogram};

/// One side of a node: a literal byte, or the index of an earlier node.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Child {
    Leaf(u8),
    Node(u8),
}

/// Raw node fields. Whether a field is a byte or an index lives in the leaf masks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Node {
    pub left: u8,
    pub right: u8,
}

/// 256 flags, one per node index. Bit i is bit (i % 8) of byte (i / 8).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LeafMask(pub [u8; 32]);

impl LeafMask {
    pub fn get(&self, index: u8) -> bool {
        self.0[index as usize / 8] >> (index % 8) & 1 == 1
    }

    pub fn set(&mut self, index: u8) {
        self.0[index as usize / 8] |= 1 << (index % 8);
    }
}

impl Default for LeafMask {
    fn default() -> Self {
        LeafMask([0; 32])
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct SplitTree {
    pub(crate) nodes: Vec<Node>,
    pub(crate) left_leaf: LeafMask,
    pub(crate) right_leaf: LeafMask,
}

/// Work items for the explicit stack used by `build`.
enum Step {
    /// Split entries[start..end], which weigh `weight` in total.
    Split { start: usize, end: usize, weight: u64 },
    /// Pop the two resolved children and push their parent node.
    Join,
}

impl SplitTree {
    /// Build the tree from a histogram of one or more byte values.
    pub fn build(hist: &Histogram) -> Result<Self> {
        let entries = hist.entries();
        let mut tree = SplitTree::default();
        match entries.len() {
            0 => return Err(ZipError::EmptyHistogram),
            1 => {
                // One byte value: both sides are that byte, so both bit values decode to it
                let byte = entries[0].byte;
                tree.push(Child::Leaf(byte), Child::Leaf(byte));
            }
            n => {
                let mut steps = vec![Step::Split {
                    start: 0,
                    end: n,
                    weight: hist.total(),
                }];
                let mut resolved: Vec<Child> = Vec::with_capacity(n);

                while let Some(step) = steps.pop() {
                    match step {
                        Step::Split { start, end, weight } => {
                            if end - start == 1 {
                                resolved.push(Child::Leaf(entries[start].byte));
                                continue;
                            }
                            let (len, left_weight) = split_point(&entries[start..end], weight);
                            trace!(
                                "Split {}..{} (weight {}) at {} (left weight {})",
                                start,
                                end,
                                weight,
                                start + len,
                                left_weight
                            );
                            // Popped in reverse: left run, right run, then the join
                            steps.push(Step::Join);
                            steps.push(Step::Split {
                                start: start + len,
                                end,
                                weight: weight - left_weight,
                            });
                            steps.push(Step::Split {
                                start,
                                end: start + len,
                                weight: left_weight,
                            });
                        }
                        Step::Join => {
                            let right = resolved.pop();
                            let left = resolved.pop();
                            if let (Some(left), Some(right)) = (left, right) {
                                let index = tree.push(left, right);
                                resolved.push(Child::Node(index));
                            }
                        }
                    }
                }
            }
        }
        debug_assert!(tree.is_well_formed());
        debug!(
            "Built a tree of {} nodes for {} byte values.",
            tree.len(),
            entries.len()
        );
        Ok(tree)
    }

    /// Append a node and return its index.
    fn push(&mut self, left: Child, right: Child) -> u8 {
        let index = self.nodes.len() as u8;
        let mut node = Node::default();
        node.left = match left {
            Child::Leaf(byte) => {
                self.left_leaf.set(index);
                byte
            }
            Child::Node(i) => i,
        };
        node.right = match right {
            Child::Leaf(byte) => {
                self.right_leaf.set(index);
                byte
            }
            Child::Node(i) => i,
        };
        self.nodes.push(node);
        index
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Index of the root node, None for the empty tree.
    pub fn root(&self) -> Option<u8> {
        self.nodes.len().checked_sub(1).map(|i| i as u8)
    }

    /// Left side of node `index`.
    pub fn left(&self, index: u8) -> Child {
        let field = self.nodes[index as usize].left;
        if self.left_leaf.get(index) {
            Child::Leaf(field)
        } else {
            Child::Node(field)
        }
    }

    /// Right side of node `index`.
    pub fn right(&self, index: u8) -> Child {
        let field = self.nodes[index as usize].right;
        if self.right_leaf.get(index) {
            Child::Leaf(field)
        } else {
            Child::Node(field)
        }
    }

    /// Side of node `index` selected by a payload bit: false is left, true is right.
    pub fn child(&self, index: u8, bit: bool) -> Child {
        if bit {
            self.right(index)
        } else {
            self.left(index)
        }
    }

    /// True when every node references only nodes before it. Always true for built trees; a
    /// tree read from disk is not checked.
    pub fn is_well_formed(&self) -> bool {
        self.nodes.len() <= 256
            && (0..self.nodes.len()).all(|i| {
                let i = i as u8;
                [self.left(i), self.right(i)].iter().all(|c| match c {
                    Child::Leaf(_) => true,
                    Child::Node(j) => *j < i,
                })
            })
    }
}

/// Find where to cut a sorted run of two or more entries. Returns the length of the left part
/// and its weight.
fn split_point(run: &[ByteCount], weight: u64) -> (usize, u64) {
    let half = weight / 2;
    let mut len = 1;
    let mut sum = run[0].count;
    if sum < half {
        while len < run.len() {
            let next = sum + run[len].count;
            if next > half {
                // Take the boundary entry only if that lands strictly closer to half
                if next - half < half - sum {
                    sum = next;
                    len += 1;
                }
                break;
            }
            sum = next;
            len += 1;
        }
    }
    (len, sum)
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::freq_count::freqs_par;

    fn tree_of(data: &[u8]) -> SplitTree {
        SplitTree::build(&Histogram::from_counts(&freqs_par(data))).unwrap()
    }

    #[test]
    fn empty_histogram_test() {
        assert!(matches!(
            SplitTree::build(&Histogram::default()),
            Err(ZipError::EmptyHistogram)
        ));
    }

    #[test]
    fn single_symbol_test() {
        let tree = tree_of(&[0x41; 1000]);
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.nodes()[0], Node { left: 0x41, right: 0x41 });
        assert_eq!(tree.left(0), Child::Leaf(0x41));
        assert_eq!(tree.right(0), Child::Leaf(0x41));
        assert_eq!(tree.root(), Some(0));
    }

    #[test]
    fn two_symbols_test() {
        let tree = tree_of(b"aab");
        assert_eq!(tree.len(), 1);
        assert_eq!(tree.left(0), Child::Leaf(b'a'));
        assert_eq!(tree.right(0), Child::Leaf(b'b'));
    }

    #[test]
    fn abracadabra_test() {
        // a:5 b:2 r:2 c:1 d:1, total 11, half 5
        // a alone reaches half -> [a] | [b r c d]
        // [b r c d] weight 6, half 3: b=2, +r=4 > 3, 4-3 < 3-2 is false -> [b] | [r c d]
        // [r c d] weight 4, half 2: r=2 reaches half -> [r] | [c d]
        let tree = tree_of(b"abracadabra");
        assert_eq!(tree.len(), 4);
        assert_eq!(tree.left(0), Child::Leaf(b'c'));
        assert_eq!(tree.right(0), Child::Leaf(b'd'));
        assert_eq!(tree.left(1), Child::Leaf(b'r'));
        assert_eq!(tree.right(1), Child::Node(0));
        assert_eq!(tree.left(2), Child::Leaf(b'b'));
        assert_eq!(tree.right(2), Child::Node(1));
        assert_eq!(tree.left(3), Child::Leaf(b'a'));
        assert_eq!(tree.right(3), Child::Node(2));
        assert_eq!(tree.root(), Some(3));
        assert!(tree.is_well_formed());
    }

    #[test]
    fn split_takes_closer_side_test() {
        let run = [
            ByteCount { byte: 0, count: 4 },
            ByteCount { byte: 1, count: 3 },
            ByteCount { byte: 2, count: 3 },
            ByteCount { byte: 3, count: 2 },
        ];
        // weight 12, half 6: 4 < 6, 4+3 = 7 > 6, 7-6 < 6-4 -> take it
        assert_eq!(split_point(&run, 12), (2, 7));

        let run = [
            ByteCount { byte: 0, count: 2 },
            ByteCount { byte: 1, count: 2 },
            ByteCount { byte: 2, count: 2 },
        ];
        // weight 6, half 3: 2+2 = 4, 4-3 == 3-2 -> tie stays right
        assert_eq!(split_point(&run, 6), (1, 2));
    }

    #[test]
    fn all_bytes_test() {
        let data: Vec<u8> = (0..=255).collect();
        let tree = tree_of(&data);
        assert_eq!(tree.len(), 255);
        assert_eq!(tree.root(), Some(254));
        assert!(tree.is_well_formed());
    }

    #[test]
    fn skewed_weights_test() {
        // Doubling counts make a chain as deep as the alphabet
        let mut counts = [0_u64; 256];
        for (i, c) in counts.iter_mut().enumerate().take(40) {
            *c = 1 << (40 - i);
        }
        let tree = SplitTree::build(&Histogram::from_counts(&counts)).unwrap();
        assert_eq!(tree.len(), 39);
        assert!(tree.is_well_formed());
    }
}
