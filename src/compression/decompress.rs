use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use log::{error, info};

use super::header::{read_header, Header};
use super::staging::{check_input, check_output, persist, stage};
use super::transcode::decode;
use crate::bitstream::{bitreader::BitReader, bytereader::ByteReader};
use crate::error::{IoContext, Result};
use crate::prefix_coding::tree_codec::read_tree;
use crate::tools::cli::{Verbosity, ZipOpts};
use crate::tools::report::Report;

/// Decompress every file named in opts.
pub fn decompress(opts: &ZipOpts, report: &mut dyn Report) -> Result<()> {
    for file in &opts.files {
        if let Err(e) = decompress_file(file, opts.output.as_deref(), opts.force_overwrite, report) {
            error!("Could not decompress {}.", file.display());
            return Err(e);
        }
    }
    Ok(())
}

/// Decompress one chrigizip file. The output goes to `output`, or to the stored file name in the
/// current directory. Returns the path written.
pub fn decompress_file(
    input: &Path,
    output: Option<&Path>,
    force: bool,
    report: &mut dyn Report,
) -> Result<PathBuf> {
    check_input(input)?;
    let mut source = ByteReader::new(File::open(input).with_path(input)?);

    // Look for a valid signature before anything else.
    let header = read_header(&mut source).map_err(|e| e.at_paths(input, input))?;
    info!(
        "Found a valid chrigizip header for '{}' ({} bytes).",
        header.display_name(),
        header.original_len
    );
    let tree = read_tree(&mut source).map_err(|e| e.at_paths(input, input))?;

    let out_path = match output {
        Some(path) => path.to_path_buf(),
        None => header.file_name()?,
    };
    check_output(&out_path, force)?;

    report.report(
        Verbosity::Normal,
        &format!("extracting {}... ", out_path.display()),
    );
    let staged = stage(&out_path)?;
    {
        let mut sink = BufWriter::new(staged.as_file());
        decode(
            &tree,
            &mut BitReader::from(source),
            &mut sink,
            header.original_len,
        )
        .map_err(|e| e.at_paths(input, staged.path()))?;
        sink.flush().with_path(staged.path())?;
    }
    persist(staged, &out_path, force)?;
    report.report(
        Verbosity::Normal,
        &format!("done! wrote {} bytes\n", header.original_len),
    );

    info!("Wrote {} bytes to {}.", header.original_len, out_path.display());
    Ok(out_path)
}

/// Decompress an in-memory chrigizip file into its header and contents.
pub fn decompress_bytes(data: &[u8]) -> Result<(Header, Vec<u8>)> {
    let mut source = ByteReader::new(data);
    let header = read_header(&mut source)?;
    let tree = read_tree(&mut source)?;

    // Every output byte costs at least one payload bit, so a corrupt count cannot blow up the
    // allocation
    let capacity = header.original_len.min(data.len() as u64 * 8) as usize;
    let mut out = Vec::with_capacity(capacity);
    decode(&tree, &mut BitReader::from(source), &mut out, header.original_len)?;
    Ok((header, out))
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::error::ZipError;
    use crate::compression::compress::compress_bytes;

    #[test]
    fn round_trip_test() {
        let data = b"It was the best of times, it was the worst of times.";
        let packed = compress_bytes("dickens.txt", data).unwrap();
        let (header, out) = decompress_bytes(&packed).unwrap();
        assert_eq!(header.name, b"dickens.txt");
        assert_eq!(header.original_len, data.len() as u64);
        assert_eq!(out, data);
    }

    #[test]
    fn empty_round_trip_test() {
        let packed = compress_bytes("empty", &[]).unwrap();
        let (header, out) = decompress_bytes(&packed).unwrap();
        assert_eq!(header.original_len, 0);
        assert!(out.is_empty());
    }

    #[test]
    fn not_chrigizip_test() {
        let err = decompress_bytes(b"BZh91AY&SY").unwrap_err();
        assert!(matches!(err, ZipError::BadMagic { .. }));
    }

    #[test]
    fn truncated_file_test() {
        let data = vec![b'x', b'y', b'z', b'x', b'x'].repeat(100);
        let packed = compress_bytes("xyz", &data).unwrap();
        let err = decompress_bytes(&packed[..packed.len() - 1]).unwrap_err();
        assert!(matches!(err, ZipError::Truncated { expected: 500, .. }));
    }
}
