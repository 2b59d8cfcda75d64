//! Sequential writer for `<destination>.part` files.

use anyhow::{Context, Result};
use std::fs::File;
use std::io::{Seek, SeekFrom, Write};
use std::path::{Path, PathBuf};

use super::temp_path;

/// Temp file receiving one transfer. Not shared across threads; the curl
/// write callback owns it for the duration of a request.
pub struct PartFile {
    file: File,
    temp_path: PathBuf,
    final_path: PathBuf,
    written: u64,
}

impl PartFile {
    /// Create (or truncate) `<final_path>.part`. The parent directory must exist.
    pub fn create(final_path: &Path) -> Result<Self> {
        let temp_path = temp_path(final_path);
        let file = File::options()
            .write(true)
            .create(true)
            .truncate(true)
            .open(&temp_path)
            .with_context(|| format!("failed to create temp file: {}", temp_path.display()))?;
        Ok(PartFile {
            file,
            temp_path,
            final_path: final_path.to_path_buf(),
            written: 0,
        })
    }

    /// Append `data` at the current end of the part file.
    pub fn write(&mut self, data: &[u8]) -> Result<()> {
        self.file
            .write_all(data)
            .context("storage write failed")?;
        self.written += data.len() as u64;
        Ok(())
    }

    /// Drop everything written so far (e.g. an HTML interstitial) and start over at offset 0.
    pub fn reset(&mut self) -> Result<()> {
        self.file.set_len(0).context("failed to truncate temp file")?;
        self.file.seek(SeekFrom::Start(0))?;
        self.written = 0;
        Ok(())
    }

    /// Bytes written since creation or the last `reset`.
    pub fn written(&self) -> u64 {
        self.written
    }

    pub fn temp_path(&self) -> &Path {
        &self.temp_path
    }

    /// Sync and atomically rename the temp file over the destination, replacing
    /// any existing file. Consumes the writer and closes the file.
    pub fn finalize(self) -> Result<PathBuf> {
        self.file.sync_all().context("storage sync failed")?;
        drop(self.file);

        std::fs::rename(&self.temp_path, &self.final_path).with_context(|| {
            format!(
                "failed to rename {} to {}",
                self.temp_path.display(),
                self.final_path.display()
            )
        })?;
        Ok(self.final_path)
    }
}
