use std::io::Read;

use rayon::prelude::*;

use crate::bitstream::bytereader::ByteReader;

/// One surviving histogram entry: a byte value and how often it occurs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteCount {
    pub byte: u8,
    pub count: u64,
}

/// Byte values that occur in the input, most frequent first. Equal counts keep ascending byte
/// order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Histogram {
    entries: Vec<ByteCount>,
    total: u64,
}

impl Histogram {
    /// Drop the zero counts and sort the rest.
    pub fn from_counts(counts: &[u64; 256]) -> Self {
        let mut entries: Vec<ByteCount> = counts
            .iter()
            .enumerate()
            .filter(|(_, &count)| count > 0)
            .map(|(byte, &count)| ByteCount {
                byte: byte as u8,
                count,
            })
            .collect();
        // Stable, so ties stay in ascending byte order
        entries.sort_by(|a, b| b.count.cmp(&a.count));
        let total = entries.iter().map(|e| e.count).sum();
        Self { entries, total }
    }

    pub fn entries(&self) -> &[ByteCount] {
        &self.entries
    }

    /// Number of distinct byte values present.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Sum of all counts, i.e. the length of the input.
    pub fn total(&self) -> u64 {
        self.total
    }
}

/// Returns a frequency count of every byte left in the source. Single pass, read only.
pub fn freqs<R: Read>(source: &mut ByteReader<R>) -> std::io::Result<[u64; 256]> {
    let mut freqs = [0_u64; 256];
    while !source.at_end()? {
        freqs[source.next_byte()? as usize] += 1;
    }
    Ok(freqs)
}

/// Returns a frequency count of the input data. Uses parallelism when data set is over 64k.
pub fn freqs_par(data: &[u8]) -> [u64; 256] {
    if data.len() > 64_000 {
        // 16k is pretty much the sweet spot for chunk size.
        data.par_chunks(16_000)
            .fold(
                || [0_u64; 256],
                |mut freqs, chunk| {
                    chunk.iter().for_each(|&el| freqs[el as usize] += 1);
                    freqs
                },
            )
            .reduce(
                || [0_u64; 256],
                |mut s, f| {
                    s.iter_mut().zip(f.iter()).for_each(|(a, b)| *a += b);
                    s
                },
            )
    } else {
        let mut freqs = [0_u64; 256];
        data.iter().for_each(|&el| freqs[el as usize] += 1);
        freqs
    }
}
