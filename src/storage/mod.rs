pub mod format;
pub mod index_log;
pub mod value_file;

use std::fs::{DirBuilder, File, OpenOptions};
use std::path::Path;

use crate::constants::INDEX_LOG_SUFFIX;
use crate::error::Result;

use index_log::IndexLog;
use value_file::ValueFile;

/// The two files backing one store: values at `path`, the index log at
/// `path + ".idx"`. The index log is the sole source of structure; the value
/// file is an opaque byte container.
pub struct FilePair {
    pub values: ValueFile,
    pub log: IndexLog,
}

impl FilePair {
    /// Open or create both files, creating missing parent directories with
    /// `dir_mode` and new files with `file_mode`.
    pub fn open(path: &str, file_mode: u32, dir_mode: u32) -> Result<Self> {
        create_parent_dirs(path, dir_mode)?;
        let values = open_rw(path, file_mode)?;
        let log = open_rw(&format!("{path}{INDEX_LOG_SUFFIX}"), file_mode)?;
        Ok(Self {
            values: ValueFile::new(values),
            log: IndexLog::new(log),
        })
    }

    /// Fsync the index log, then the value file.
    pub fn sync_all(&self) -> Result<()> {
        self.log.sync()?;
        self.values.sync()?;
        Ok(())
    }

    /// Combined on-disk size of both files.
    pub fn total_size(&self) -> Result<u64> {
        Ok(self.log.size()? + self.values.size()?)
    }
}

fn open_rw(path: &str, file_mode: u32) -> Result<File> {
    let mut opts = OpenOptions::new();
    opts.read(true).write(true).create(true);
    #[cfg(unix)]
    {
        use std::os::unix::fs::OpenOptionsExt;
        opts.mode(file_mode);
    }
    #[cfg(not(unix))]
    let _ = file_mode;
    Ok(opts.open(path)?)
}

fn create_parent_dirs(path: &str, dir_mode: u32) -> Result<()> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            let mut builder = DirBuilder::new();
            builder.recursive(true);
            #[cfg(unix)]
            {
                use std::os::unix::fs::DirBuilderExt;
                builder.mode(dir_mode);
            }
            #[cfg(not(unix))]
            let _ = dir_mode;
            builder.create(parent)?;
        }
    }
    Ok(())
}

/// Positional write that does not disturb concurrent positional reads.
pub(crate) fn write_all_at(file: &File, offset: u64, data: &[u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileExt;
        file.write_all_at(data, offset)?;
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::FileExt;
        let mut written = 0usize;
        while written < data.len() {
            let n = file.seek_write(&data[written..], offset + written as u64)?;
            written += n;
        }
    }
    Ok(())
}

/// Positional read of exactly `buf.len()` bytes, usable from many readers at
/// once on a shared handle.
pub(crate) fn read_exact_at(file: &File, offset: u64, buf: &mut [u8]) -> Result<()> {
    #[cfg(unix)]
    {
        use std::os::unix::fs::FileExt;
        file.read_exact_at(buf, offset)?;
    }
    #[cfg(windows)]
    {
        use std::os::windows::fs::FileExt;
        let mut read = 0usize;
        while read < buf.len() {
            let n = file.seek_read(&mut buf[read..], offset + read as u64)?;
            if n == 0 {
                return Err(std::io::Error::new(
                    std::io::ErrorKind::UnexpectedEof,
                    "value file ended before the slot",
                )
                .into());
            }
            read += n;
        }
    }
    Ok(())
}
