//! Errors raised while loading a manifest.

use std::path::PathBuf;

/// Manifest could not be turned into a list of [`FileDescriptor`](super::FileDescriptor)s.
/// Always fatal: the run stops before any directory is created.
#[derive(Debug, thiserror::Error)]
pub enum ManifestError {
    #[error("failed to read manifest {}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
