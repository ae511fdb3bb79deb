//! Append-only file of put/delete records describing the key set.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};

use crate::error::{Result, WharfError};

pub struct IndexLog {
    file: File,
}

impl IndexLog {
    pub fn new(file: File) -> Self {
        Self { file }
    }

    /// Append an encoded record and return the offset it was written at.
    pub fn append(&mut self, record: &[u8]) -> Result<u32> {
        let end = self.file.seek(SeekFrom::End(0))?;
        let offset = u32::try_from(end).map_err(|_| WharfError::StoreFull)?;
        super::write_all_at(&self.file, end, record)?;
        Ok(offset)
    }

    /// Rewrite the record at `offset` in place. Records are rewritten only
    /// for the same key, so the footprint never changes.
    pub fn rewrite_at(&mut self, offset: u32, record: &[u8]) -> Result<()> {
        super::write_all_at(&self.file, u64::from(offset), record)
    }

    /// Read the whole log for a recovery scan.
    pub fn read_all(&mut self) -> Result<Vec<u8>> {
        self.file.seek(SeekFrom::Start(0))?;
        let mut buf = Vec::new();
        self.file.read_to_end(&mut buf)?;
        Ok(buf)
    }

    pub fn size(&self) -> Result<u64> {
        Ok(self.file.metadata()?.len())
    }

    pub fn sync(&self) -> Result<()> {
        self.file.sync_all()?;
        Ok(())
    }
}
