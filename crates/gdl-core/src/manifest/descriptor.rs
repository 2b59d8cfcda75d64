//! One manifest record.

use serde::{Deserialize, Serialize};
use std::path::{Component, Path, PathBuf};

/// A remote file and where to put it: `<path>/<name>`.
///
/// All three fields are required; extra keys in the JSON object are ignored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileDescriptor {
    pub url: String,
    pub path: String,
    pub name: String,
}

impl FileDescriptor {
    /// Directory the file is written into.
    pub fn directory(&self) -> PathBuf {
        PathBuf::from(&self.path)
    }

    /// Full destination path, `<path>/<name>`.
    ///
    /// `name` is always taken relative to `path`: root, drive prefix and `..`
    /// components are dropped, so the result never leaves `path`.
    pub fn destination(&self) -> PathBuf {
        let mut dest = self.directory();
        dest.extend(
            Path::new(&self.name)
                .components()
                .filter(|c| matches!(c, Component::Normal(_))),
        );
        dest
    }
}
