//! Batch fetcher: download every manifest entry, in order, one at a time.
//!
//! For each of the first [`MAX_ENTRIES`] records the destination directory is
//! created (recursively, idempotent) and then the file is downloaded through
//! the [`DownloadHelper`], overwriting whatever is there. The first failure
//! aborts the run; later entries are never touched.

use std::path::{Path, PathBuf};

use crate::downloader::DownloadHelper;
use crate::manifest::{FileDescriptor, Manifest, ManifestError, MAX_ENTRIES};

/// Outcome of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FetchReport {
    /// Entries downloaded.
    pub processed: usize,
    /// Manifest entries beyond the limit that were ignored.
    pub skipped: usize,
}

#[derive(Debug, thiserror::Error)]
pub enum FetchError {
    #[error(transparent)]
    Manifest(#[from] ManifestError),

    #[error("entry {index}: failed to create directory {}", .directory.display())]
    CreateDir {
        index: usize,
        directory: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("entry {index}: failed to download {url} to {}", .destination.display())]
    Download {
        index: usize,
        url: String,
        destination: PathBuf,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync + 'static>,
    },
}

impl FetchError {
    /// 1-based manifest position of the failing entry, if the run got that far.
    pub fn index(&self) -> Option<usize> {
        match self {
            FetchError::Manifest(_) => None,
            FetchError::CreateDir { index, .. } | FetchError::Download { index, .. } => {
                Some(*index)
            }
        }
    }
}

/// Load the manifest at `manifest_path` and fetch it. Nothing is created if the manifest is invalid.
pub fn fetch_manifest_file(
    manifest_path: &Path,
    helper: &mut dyn DownloadHelper,
) -> Result<FetchReport, FetchError> {
    let manifest = Manifest::load(manifest_path)?;
    fetch_all(&manifest, helper)
}

/// Fetch the first [`MAX_ENTRIES`] entries of `manifest` in document order.
pub fn fetch_all(
    manifest: &Manifest,
    helper: &mut dyn DownloadHelper,
) -> Result<FetchReport, FetchError> {
    let skipped = manifest.skipped();
    if skipped > 0 {
        tracing::warn!(
            total = manifest.len(),
            skipped,
            "manifest has more than {} entries; ignoring the rest",
            MAX_ENTRIES
        );
    }

    let entries = manifest.entries();
    for (i, descriptor) in entries.iter().enumerate() {
        fetch_entry(i + 1, descriptor, helper)?;
    }

    tracing::info!(processed = entries.len(), skipped, "fetch run complete");
    Ok(FetchReport {
        processed: entries.len(),
        skipped,
    })
}

/// Create the entry's directory, then download it. An empty `path` is a
/// directory error, never the working directory. `index` is 1-based and only used for errors.
pub fn fetch_entry(
    index: usize,
    descriptor: &FileDescriptor,
    helper: &mut dyn DownloadHelper,
) -> Result<PathBuf, FetchError> {
    let destination = descriptor.destination();
    // A `name` with subdirectories lands deeper than `path`; create those too.
    let directory = destination
        .parent()
        .filter(|p| p.starts_with(descriptor.directory()))
        .map(Path::to_path_buf)
        .unwrap_or_else(|| descriptor.directory());
    let created = if descriptor.path.is_empty() {
        Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "manifest entry has an empty path",
        ))
    } else {
        std::fs::create_dir_all(&directory)
    };
    created.map_err(|source| FetchError::CreateDir {
        index,
        directory: directory.clone(),
        source,
    })?;

    tracing::debug!(index, url = %descriptor.url, path = %destination.display(), "fetching entry");
    helper
        .download(&descriptor.url, &destination)
        .map_err(|e| FetchError::Download {
            index,
            url: descriptor.url.clone(),
            destination: destination.clone(),
            source: e.into(),
        })?;
    Ok(destination)
}
