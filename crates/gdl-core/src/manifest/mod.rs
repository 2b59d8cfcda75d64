//! Download manifest: an ordered JSON array of `{ "url", "path", "name" }` records.
//!
//! The manifest is read once at startup and never mutated. Only the first
//! [`MAX_ENTRIES`] records are ever processed.

mod descriptor;
mod error;

pub use descriptor::FileDescriptor;
pub use error::ManifestError;

use std::fs;
use std::path::Path;

/// Number of leading manifest entries a run processes; the rest are ignored.
pub const MAX_ENTRIES: usize = 30;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Manifest {
    files: Vec<FileDescriptor>,
}

impl Manifest {
    pub fn new(files: Vec<FileDescriptor>) -> Self {
        Self { files }
    }

    /// Read and parse a manifest file. A missing field in any record fails the whole load.
    pub fn load(path: &Path) -> Result<Self, ManifestError> {
        let data = fs::read(path).map_err(|source| ManifestError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let files: Vec<FileDescriptor> =
            serde_json::from_slice(&data).map_err(|source| ManifestError::Parse {
                path: path.to_path_buf(),
                source,
            })?;
        tracing::debug!(path = %path.display(), entries = files.len(), "loaded manifest");
        Ok(Self { files })
    }

    /// Parse an in-memory manifest document.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        Ok(Self {
            files: serde_json::from_str(json)?,
        })
    }

    /// Total number of records in the document (including ignored ones).
    pub fn len(&self) -> usize {
        self.files.len()
    }

    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Records a run processes: the first [`MAX_ENTRIES`], in document order.
    pub fn entries(&self) -> &[FileDescriptor] {
        &self.files[..self.files.len().min(MAX_ENTRIES)]
    }

    /// Number of records past [`MAX_ENTRIES`].
    pub fn skipped(&self) -> usize {
        self.files.len().saturating_sub(MAX_ENTRIES)
    }

    /// All records, including those beyond the processing limit.
    pub fn all(&self) -> &[FileDescriptor] {
        &self.files
    }
}
