//! Output files are written to a temporary file next to their destination and only renamed
//! into place once complete, so a failed run never leaves a half written file under the final
//! name.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::debug;
use tempfile::{Builder, NamedTempFile};

use crate::error::{IoContext, Result, ZipError};

/// Check an input path names an existing regular file.
pub fn check_input(path: &Path) -> Result<()> {
    let meta = fs::metadata(path).with_path(path)?;
    if !meta.is_file() {
        return Err(ZipError::NotARegularFile(path.to_path_buf()));
    }
    Ok(())
}

/// Refuse an existing output unless overwriting was asked for.
pub fn check_output(path: &Path, force: bool) -> Result<()> {
    if !force && path.exists() {
        return Err(ZipError::OutputExists(path.to_path_buf()));
    }
    Ok(())
}

/// Create the temporary file in the destination's directory.
pub fn stage(path: &Path) -> Result<NamedTempFile> {
    let dir = match path.parent() {
        Some(dir) if !dir.as_os_str().is_empty() => dir.to_path_buf(),
        _ => PathBuf::from("."),
    };
    let staged = Builder::new()
        .prefix(".chrigizip-")
        .suffix(".part")
        .tempfile_in(&dir)
        .with_path(&dir)?;
    debug!("Staging {} as {}", path.display(), staged.path().display());
    Ok(staged)
}

/// Move a finished temporary file to its final name. Dropping `staged` on an error path
/// deletes it.
pub fn persist(staged: NamedTempFile, path: &Path, force: bool) -> Result<()> {
    staged.as_file().sync_all().with_path(staged.path())?;
    let result = if force {
        staged.persist(path)
    } else {
        staged.persist_noclobber(path)
    };
    result.map(|_| ()).map_err(|e| {
        if e.error.kind() == io::ErrorKind::AlreadyExists {
            ZipError::OutputExists(path.to_path_buf())
        } else {
            ZipError::io(path, e.error)
        }
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use std::io::Write;

    #[test]
    fn persist_test() {
        let dir = tempfile::tempdir().unwrap();
        let target = dir.path().join("out.bin");
        let mut staged = stage(&target).unwrap();
        staged.write_all(b"payload").unwrap();
        persist(staged, &target, false).unwrap();
        assert_eq!(fs::read(&target).unwrap(), b"payload");

        // Second time around the file exists
        assert!(matches!(check_output(&target, false), Err(ZipError::OutputExists(_))));
        let staged = stage(&target).unwrap();
        assert!(matches!(persist(staged, &target, false), Err(ZipError::OutputExists(_))));
        // and the failed attempt left nothing behind
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn check_input_test() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(check_input(dir.path()), Err(ZipError::NotARegularFile(_))));
        assert!(matches!(
            check_input(&dir.path().join("missing")),
            Err(ZipError::Io { .. })
        ));
    }
}
