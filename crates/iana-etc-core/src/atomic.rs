//! Atomic file replacement.
//!
//! [`AtomicFile`] writes a destination file's full contents to a temporary
//! sibling, forces it to stable storage, then renames it into place. The
//! destination is never observed in a partial state: until [`AtomicFile::commit`]
//! succeeds it keeps its previous content (or stays absent), and any failure
//! or early drop removes the temporary file.
//!
//! The temporary file is created in the destination's own directory; the
//! final rename must not cross a filesystem boundary or it stops being
//! atomic on POSIX.

use crate::error::{Error, Result};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::trace;

/// A file handle whose contents only become visible at the destination on commit
#[derive(Debug)]
pub struct AtomicFile {
    temp: NamedTempFile,
    dest: PathBuf,
}

impl AtomicFile {
    /// Opens a temporary sibling of `dest` for writing.
    ///
    /// Fails if the destination's directory does not exist or is not writable.
    pub fn create(dest: impl Into<PathBuf>) -> Result<Self> {
        let dest = dest.into();
        let dir = match dest.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };
        let temp = NamedTempFile::new_in(&dir).map_err(|e| Error::file_write(&dest, e))?;
        trace!("Staging {} at {}", dest.display(), temp.path().display());
        Ok(Self { temp, dest })
    }

    /// The destination this file will be renamed to on commit
    pub fn dest(&self) -> &Path {
        &self.dest
    }

    /// Flushes, syncs, and renames the temporary file over the destination.
    ///
    /// The rename is the last action; everything before it leaves the
    /// destination untouched on failure.
    pub fn commit(self) -> Result<()> {
        let Self { mut temp, dest } = self;
        temp.flush()
            .and_then(|_| temp.as_file().sync_all())
            .map_err(|e| Error::file_write(&dest, e))?;
        temp.persist(&dest)
            .map_err(|e| Error::file_write(&dest, e.error))?;
        trace!("Committed {}", dest.display());
        Ok(())
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.temp.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.temp.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_commit_writes_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.txt");

        let mut file = AtomicFile::create(&dest).unwrap();
        file.write_all(b"hello").unwrap();
        file.commit().unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "hello");
    }

    #[test]
    fn test_commit_replaces_existing() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.txt");
        fs::write(&dest, "old").unwrap();

        let mut file = AtomicFile::create(&dest).unwrap();
        file.write_all(b"new").unwrap();
        file.commit().unwrap();

        assert_eq!(fs::read_to_string(&dest).unwrap(), "new");
    }

    #[test]
    fn test_drop_without_commit_leaves_destination() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.txt");
        fs::write(&dest, "old").unwrap();

        let mut file = AtomicFile::create(&dest).unwrap();
        file.write_all(b"new content that must never land").unwrap();
        drop(file);

        assert_eq!(fs::read_to_string(&dest).unwrap(), "old");
        // the temporary sibling is gone too
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }

    #[test]
    fn test_drop_without_commit_leaves_destination_absent() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.txt");

        let mut file = AtomicFile::create(&dest).unwrap();
        file.write_all(b"partial").unwrap();
        drop(file);

        assert!(!dest.exists());
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_missing_directory_is_an_error() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("missing").join("out.txt");

        let err = AtomicFile::create(&dest).unwrap_err();
        assert!(err.to_string().contains("out.txt"));
    }

    #[test]
    fn test_no_temp_file_survives_commit() {
        let dir = TempDir::new().unwrap();
        let dest = dir.path().join("out.txt");

        let mut file = AtomicFile::create(&dest).unwrap();
        file.write_all(b"data").unwrap();
        file.commit().unwrap();

        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 1);
    }
}
