//! File-system boundary used by file-based encode/decode.

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;

/// A write that only becomes visible at its destination once committed.
///
/// Dropping an uncommitted write discards everything written so far.
pub trait PendingWrite: Write {
    /// Makes the written bytes visible at the destination path.
    fn commit(self: Box<Self>) -> io::Result<()>;
}

/// Opens byte streams for reading and atomic writing.
pub trait FileSystem: Send + Sync {
    /// Opens `path` for reading.
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>>;

    /// Starts a write that replaces `path` on commit.
    fn create_pending(&self, path: &Path) -> io::Result<Box<dyn PendingWrite + '_>>;
}

/// The local disk. Writes go to a temp file next to the destination and are
/// renamed over it on commit.
#[derive(Debug, Clone, Copy, Default)]
pub struct LocalFileSystem;

impl FileSystem for LocalFileSystem {
    fn open_read(&self, path: &Path) -> io::Result<Box<dyn Read + '_>> {
        Ok(Box::new(BufReader::new(File::open(path)?)))
    }

    fn create_pending(&self, path: &Path) -> io::Result<Box<dyn PendingWrite + '_>> {
        let dir = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        let temp = NamedTempFile::new_in(dir)?;
        Ok(Box::new(TempFileWrite {
            writer: BufWriter::new(temp),
            target: path.to_path_buf(),
        }))
    }
}

struct TempFileWrite {
    writer: BufWriter<NamedTempFile>,
    target: PathBuf,
}

impl Write for TempFileWrite {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.writer.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.writer.flush()
    }
}

impl PendingWrite for TempFileWrite {
    fn commit(self: Box<Self>) -> io::Result<()> {
        let TempFileWrite { writer, target } = *self;
        let temp = writer.into_inner().map_err(|e| e.into_error())?;
        temp.as_file().sync_all()?;
        temp.persist(&target).map_err(|e| e.error)?;
        Ok(())
    }
}
