use std::fmt::Write as _;
use std::fs::File;
use std::io::{BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use log::{debug, error, info};

use super::header::{write_header, Header, EXTENSION};
use super::staging::{check_input, check_output, persist, stage};
use super::transcode::encode;
use crate::bitstream::{bitwriter::BitWriter, bytereader::ByteReader};
use crate::error::{IoContext, Result, ZipError};
use crate::prefix_coding::code_table::CodeTable;
use crate::prefix_coding::split_tree::SplitTree;
use crate::prefix_coding::tree_codec::write_tree;
use crate::tools::cli::{Verbosity, ZipOpts};
use crate::tools::freq_count::{freqs, freqs_par, Histogram};
use crate::tools::report::Report;

/*
    Compression makes two passes over the input. The first counts the bytes so the tree and
    code table can be built; the second encodes them. The header records how many bytes the
    first pass saw, and the second pass encodes exactly that many.
*/

/// Compress every file named in opts.
pub fn compress(opts: &ZipOpts, report: &mut dyn Report) -> Result<()> {
    for file in &opts.files {
        if let Err(e) = compress_file(file, opts.output.as_deref(), opts.force_overwrite, report) {
            error!("Could not compress {}.", file.display());
            return Err(e);
        }
    }
    Ok(())
}

/// Compress one file. The output goes to `output`, or to `<file name>.chrigi` in the current
/// directory. Returns the path written.
pub fn compress_file(
    input: &Path,
    output: Option<&Path>,
    force: bool,
    report: &mut dyn Report,
) -> Result<PathBuf> {
    check_input(input)?;
    let name = input
        .file_name()
        .ok_or_else(|| ZipError::BadName(input.display().to_string()))?;
    let out_path = output.map(Path::to_path_buf).unwrap_or_else(|| {
        let mut packed = name.to_os_string();
        packed.push(".");
        packed.push(EXTENSION);
        PathBuf::from(packed)
    });
    check_output(&out_path, force)?;

    // Pass one: count
    report.report(Verbosity::Normal, "analyzing file... ");
    let mut source = ByteReader::new(File::open(input).with_path(input)?);
    let hist = Histogram::from_counts(&freqs(&mut source).with_path(input)?);
    report.report(
        Verbosity::Normal,
        &format!("done! found {} unique bytes\n", hist.len()),
    );

    let (tree, table) = plan(&hist)?;
    if report.verbosity() >= Verbosity::Chatty {
        report.emit(&statistics(&hist, &table));
    }

    // Pass two: encode into a staged file
    let header = Header::for_file(name, hist.total())?;
    let mut source = ByteReader::new(File::open(input).with_path(input)?);
    let staged = stage(&out_path)?;
    {
        let sink = BufWriter::new(staged.as_file());
        write_archive(&header, &tree, &table, &mut source, sink)
            .map_err(|e| e.at_paths(input, staged.path()))?;
    }
    persist(staged, &out_path, force)?;

    info!(
        "Compressed {} ({} bytes) into {}.",
        input.display(),
        header.original_len,
        out_path.display()
    );
    Ok(out_path)
}

/// Compress an in-memory buffer, storing `name` as the original file name.
pub fn compress_bytes(name: impl AsRef<[u8]>, data: &[u8]) -> Result<Vec<u8>> {
    let hist = Histogram::from_counts(&freqs_par(data));
    let (tree, table) = plan(&hist)?;
    let header = Header::new(name.as_ref(), data.len() as u64)?;
    let mut source = ByteReader::new(data);
    write_archive(&header, &tree, &table, &mut source, Vec::new())
}

/// Tree and code table for a histogram. An empty input gets the empty tree, which is never
/// walked because its header declares zero bytes.
pub fn plan(hist: &Histogram) -> Result<(SplitTree, CodeTable)> {
    if hist.is_empty() {
        debug!("Empty input, writing an empty tree.");
        return Ok((SplitTree::default(), CodeTable::default()));
    }
    let tree = SplitTree::build(hist)?;
    let table = CodeTable::from_tree(&tree);
    Ok((tree, table))
}

/// Header, tree section, then the payload of `header.original_len` bytes read from `source`.
pub fn write_archive<R: Read, W: Write>(
    header: &Header,
    tree: &SplitTree,
    table: &CodeTable,
    source: &mut ByteReader<R>,
    mut sink: W,
) -> Result<W> {
    write_header(header, &mut sink)?;
    write_tree(tree, &mut sink)?;
    let mut bw = BitWriter::new(sink);
    encode(table, source, &mut bw, header.original_len)?;
    Ok(bw.finish()?)
}

/// Per byte table of counts and codes, then the compression factor.
pub fn statistics(hist: &Histogram, table: &CodeTable) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "stats are:\n{:>12}{:>12}{:>16}{:>24}",
        "occurrence", "byte", "byte[binary]", "translation"
    );
    for entry in hist.entries() {
        let code = table
            .get(entry.byte)
            .map(|c| c.to_bit_string())
            .unwrap_or_default();
        let _ = writeln!(
            out,
            "{:>12}{:>12}{:>16}{:>24}",
            entry.count,
            entry.byte,
            format!("{:08b}", entry.byte),
            code
        );
    }
    let original_bits = hist.total() * 8;
    if original_bits > 0 {
        let factor = table.encoded_bits(hist) as f64 / original_bits as f64 * 100.0;
        let _ = writeln!(out, "compression factor of {:.2}%", factor);
    }
    out
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn empty_input_test() {
        let out = compress_bytes("empty", &[]).unwrap();
        let header_len = Header::new("empty", 0).unwrap().encoded_len();
        // Header, zero nodes, two masks, no payload
        assert_eq!(out.len(), header_len + 1 + 64);
        assert_eq!(&out[header_len - 8..header_len], &[0; 8]);
        assert_eq!(out[header_len], 0);
    }

    #[test]
    fn degenerate_layout_test() {
        let out = compress_bytes("a", &[0x41; 1000]).unwrap();
        let header_len = Header::new("a", 1000).unwrap().encoded_len();
        assert_eq!(&out[header_len..header_len + 3], &[1, 0x41, 0x41]);
        assert_eq!(out[header_len + 3], 1);
        assert_eq!(out[header_len + 3 + 32], 1);
        assert_eq!(out.len(), header_len + 3 + 64 + 125);
    }

    #[test]
    fn statistics_test() {
        let hist = Histogram::from_counts(&freqs_par(b"aab"));
        let (_, table) = plan(&hist).unwrap();
        let stats = statistics(&hist, &table);
        let lines: Vec<&str> = stats.lines().collect();
        assert_eq!(lines[0], "stats are:");
        assert!(lines[2].trim_start().starts_with("2"));
        assert!(lines[2].ends_with(&format!("01100001{:>24}", "0")));
        // 3 bits for 24 bits of input
        assert_eq!(lines[4], "compression factor of 12.50%");
    }
}
