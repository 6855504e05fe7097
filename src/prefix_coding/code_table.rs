//! Byte to bit sequence table used on the compression side.

use std::fmt::Write as _;

use rustc_hash::FxHashMap;

use super::split_tree::{Child, SplitTree};
use crate::tools::freq_count::Histogram;

/// Root to leaf path of one byte, root bit first. false is left, true is right.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Code(pub Vec<bool>);

impl Code {
    pub fn bits(&self) -> &[bool] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// The path as a string of '0' and '1', root first.
    pub fn to_bit_string(&self) -> String {
        self.0.iter().fold(String::with_capacity(self.0.len()), |mut s, &b| {
            let _ = s.write_char(if b { '1' } else { '0' });
            s
        })
    }
}

#[derive(Debug, Clone, Default)]
pub struct CodeTable {
    codes: FxHashMap<u8, Code>,
}

impl CodeTable {
    /// Walk the tree once, depth first, and record the path to every leaf. The first path found
    /// for a byte is kept, so the single node tree maps its byte to the left path `0`.
    pub fn from_tree(tree: &SplitTree) -> Self {
        let mut codes = FxHashMap::default();
        let root = match tree.root() {
            Some(root) => root,
            None => return Self { codes },
        };

        let mut stack: Vec<(u8, Vec<bool>)> = vec![(root, Vec::new())];
        while let Some((index, path)) = stack.pop() {
            let mut pending = Vec::with_capacity(2);
            for (bit, side) in [(false, tree.left(index)), (true, tree.right(index))] {
                let mut code = path.clone();
                code.push(bit);
                match side {
                    Child::Leaf(byte) => {
                        codes.entry(byte).or_insert(Code(code));
                    }
                    Child::Node(child) => pending.push((child, code)),
                }
            }
            // Left subtree goes on top so it is walked first
            stack.extend(pending.into_iter().rev());
        }
        Self { codes }
    }

    pub fn get(&self, byte: u8) -> Option<&Code> {
        self.codes.get(&byte)
    }

    /// Number of bytes with a code.
    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    /// Payload size in bits for an input with this histogram.
    pub fn encoded_bits(&self, hist: &Histogram) -> u64 {
        hist.entries()
            .iter()
            .map(|e| e.count * self.get(e.byte).map_or(0, |c| c.len() as u64))
            .sum()
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::tools::freq_count::freqs_par;

    fn table_of(data: &[u8]) -> (Histogram, CodeTable) {
        let hist = Histogram::from_counts(&freqs_par(data));
        let tree = SplitTree::build(&hist).unwrap();
        (hist, CodeTable::from_tree(&tree))
    }

    #[test]
    fn abracadabra_codes_test() {
        let (hist, table) = table_of(b"abracadabra");
        let code = |b: u8| table.get(b).unwrap().to_bit_string();
        assert_eq!(code(b'a'), "0");
        assert_eq!(code(b'b'), "10");
        assert_eq!(code(b'r'), "110");
        assert_eq!(code(b'c'), "1110");
        assert_eq!(code(b'd'), "1111");
        assert_eq!(table.len(), 5);
        // 5*1 + 2*2 + 2*3 + 4 + 4
        assert_eq!(table.encoded_bits(&hist), 23);
    }

    #[test]
    fn single_symbol_keeps_left_test() {
        let (_, table) = table_of(&[7; 3]);
        assert_eq!(table.len(), 1);
        assert_eq!(table.get(7), Some(&Code(vec![false])));
    }

    #[test]
    fn prefix_free_test() {
        let data: Vec<u8> = (0..5000_u32).map(|i| ((i * i) % 97) as u8).collect();
        let (hist, table) = table_of(&data);
        assert_eq!(table.len(), hist.len());
        let codes: Vec<&Code> = hist.entries().iter().map(|e| table.get(e.byte).unwrap()).collect();
        for (i, a) in codes.iter().enumerate() {
            for (j, b) in codes.iter().enumerate() {
                if i != j {
                    assert!(!b.bits().starts_with(a.bits()), "{:?} prefixes {:?}", a, b);
                }
            }
        }
    }

    #[test]
    fn absent_byte_test() {
        let (_, table) = table_of(b"xyz");
        assert!(table.get(b'a').is_none());
        assert!(CodeTable::from_tree(&SplitTree::default()).is_empty());
    }
}
