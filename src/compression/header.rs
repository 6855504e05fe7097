//! File meta header: magic tag, original file name and original length. All integers are
//! little-endian.
//!
//! The name is kept as the raw bytes of the file name, so any name the filesystem accepts
//! survives a round trip.

use std::borrow::Cow;
use std::ffi::OsStr;
use std::io::{ErrorKind, Read, Write};
use std::path::{is_separator, PathBuf};

use crate::error::{Result, ZipError};

/// Tag at the start of every chrigizip file.
pub const MAGIC: &[u8; 9] = b"chrigizip";

/// Extension added to compressed files.
pub const EXTENSION: &str = "chrigi";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Original file name, no directories.
    pub name: Vec<u8>,
    /// Number of bytes decompression must produce (the original file size).
    pub original_len: u64,
}

impl Header {
    pub fn new(name: impl Into<Vec<u8>>, original_len: u64) -> Result<Self> {
        let header = Self {
            name: name.into(),
            original_len,
        };
        check_name(&header.name)?;
        Ok(header)
    }

    /// Header for a file, storing the last component of its path.
    pub fn for_file(file_name: &OsStr, original_len: u64) -> Result<Self> {
        Self::new(os_to_bytes(file_name)?, original_len)
    }

    /// The stored name as a path relative to the current directory.
    pub fn file_name(&self) -> Result<PathBuf> {
        bytes_to_os(&self.name)
    }

    /// The stored name for messages. Bytes that are not UTF-8 are replaced.
    pub fn display_name(&self) -> Cow<'_, str> {
        String::from_utf8_lossy(&self.name)
    }

    /// Size of the header on disk.
    pub fn encoded_len(&self) -> usize {
        MAGIC.len() + 2 + self.name.len() + 8
    }
}

#[cfg(unix)]
fn os_to_bytes(name: &OsStr) -> Result<Vec<u8>> {
    use std::os::unix::ffi::OsStrExt;
    Ok(name.as_bytes().to_vec())
}

#[cfg(not(unix))]
fn os_to_bytes(name: &OsStr) -> Result<Vec<u8>> {
    name.to_str()
        .map(|n| n.as_bytes().to_vec())
        .ok_or_else(|| ZipError::BadName(name.to_string_lossy().into_owned()))
}

#[cfg(unix)]
fn bytes_to_os(name: &[u8]) -> Result<PathBuf> {
    use std::os::unix::ffi::OsStrExt;
    Ok(PathBuf::from(OsStr::from_bytes(name)))
}

#[cfg(not(unix))]
fn bytes_to_os(name: &[u8]) -> Result<PathBuf> {
    std::str::from_utf8(name)
        .map(PathBuf::from)
        .map_err(|_| ZipError::BadName(String::from_utf8_lossy(name).into_owned()))
}

/// Write magic, name and length.
pub fn write_header<W: Write>(header: &Header, out: &mut W) -> Result<()> {
    let name = header.name.as_slice();
    let name_len = u16::try_from(name.len()).map_err(|_| ZipError::NameTooLong(name.len()))?;
    out.write_all(MAGIC)?;
    out.write_all(&name_len.to_le_bytes())?;
    out.write_all(name)?;
    out.write_all(&header.original_len.to_le_bytes())?;
    Ok(())
}

/// Read and check magic, name and length. Nothing past the header is consumed.
pub fn read_header<R: Read>(input: &mut R) -> Result<Header> {
    let mut magic = [0_u8; 9];
    let got = read_up_to(input, &mut magic)?;
    if got < magic.len() || &magic != MAGIC {
        return Err(ZipError::BadMagic {
            found: magic[..got].to_vec(),
        });
    }

    let mut name_len = [0_u8; 2];
    read_field(input, &mut name_len, "name length")?;
    let mut name = vec![0_u8; u16::from_le_bytes(name_len) as usize];
    read_field(input, &mut name, "file name")?;
    check_name(&name)?;

    let mut original_len = [0_u8; 8];
    read_field(input, &mut original_len, "byte count")?;

    Ok(Header {
        name,
        original_len: u64::from_le_bytes(original_len),
    })
}

/// A stored name must be a plain file name so it cannot point outside the output directory.
/// Only the separators of the host platform count; a `\\` is an ordinary byte on Unix.
fn check_name(name: &[u8]) -> Result<()> {
    if name.is_empty()
        || name == b"."
        || name == b".."
        || name.iter().any(|&b| b == 0 || (b.is_ascii() && is_separator(b as char)))
    {
        return Err(ZipError::BadName(String::from_utf8_lossy(name).into_owned()));
    }
    if name.len() > u16::MAX as usize {
        return Err(ZipError::NameTooLong(name.len()));
    }
    Ok(())
}

/// Like read_exact but reports how much arrived instead of failing on a short input.
fn read_up_to<R: Read>(input: &mut R, buf: &mut [u8]) -> Result<usize> {
    let mut got = 0;
    while got < buf.len() {
        match input.read(&mut buf[got..]) {
            Ok(0) => break,
            Ok(n) => got += n,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) => return Err(e.into()),
        }
    }
    Ok(got)
}

fn read_field<R: Read>(input: &mut R, buf: &mut [u8], what: &str) -> Result<()> {
    input.read_exact(buf).map_err(|e| {
        if e.kind() == ErrorKind::UnexpectedEof {
            ZipError::CorruptHeader(format!("file ends inside the {}", what))
        } else {
            ZipError::Stream(e)
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn layout_test() {
        let header = Header::new("a.txt", 0x0102).unwrap();
        let mut out = vec![];
        write_header(&header, &mut out).unwrap();
        assert_eq!(out.len(), header.encoded_len());
        assert_eq!(&out[..9], b"chrigizip");
        assert_eq!(&out[9..11], &[5, 0]);
        assert_eq!(&out[11..16], b"a.txt");
        assert_eq!(&out[16..], &[2, 1, 0, 0, 0, 0, 0, 0]);
        assert_eq!(read_header(&mut out.as_slice()).unwrap(), header);
    }

    #[test]
    fn bad_magic_test() {
        let err = read_header(&mut "chrigizap and more".as_bytes()).unwrap_err();
        assert!(matches!(err, ZipError::BadMagic { ref found } if found == b"chrigizap"));

        let err = read_header(&mut "chr".as_bytes()).unwrap_err();
        assert!(matches!(err, ZipError::BadMagic { ref found } if found == b"chr"));
    }

    #[test]
    fn short_header_test() {
        let mut out = vec![];
        write_header(&Header::new("name", 9).unwrap(), &mut out).unwrap();
        out.truncate(out.len() - 3);
        assert!(matches!(
            read_header(&mut out.as_slice()),
            Err(ZipError::CorruptHeader(_))
        ));
    }

    #[test]
    fn path_names_rejected_test() {
        for name in ["", ".", "..", "../etc/passwd", "dir/file", "nul\0byte"] {
            assert!(matches!(Header::new(name, 1), Err(ZipError::BadName(_))), "{:?}", name);
        }
        assert_eq!(
            Header::new("c:\\x", 1).is_ok(),
            !cfg!(windows),
            "backslash only separates on windows"
        );
    }

    #[test]
    fn raw_name_bytes_test() {
        let name = b"caf\xe9.txt".to_vec();
        let header = Header::new(name.clone(), 7).unwrap();
        let mut out = vec![];
        write_header(&header, &mut out).unwrap();
        assert_eq!(&out[11..19], name.as_slice());
        let back = read_header(&mut out.as_slice()).unwrap();
        assert_eq!(back.name, name);
        assert_eq!(back.display_name(), "caf\u{fffd}.txt");
    }

    #[test]
    fn stored_traversal_rejected_test() {
        let mut out = vec![];
        write_header(&Header::new("ok", 1).unwrap(), &mut out).unwrap();
        // Patch the stored name to ".."
        out[11..13].copy_from_slice(b"..");
        assert!(matches!(
            read_header(&mut out.as_slice()),
            Err(ZipError::BadName(_))
        ));
    }
}
