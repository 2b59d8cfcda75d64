//! Google Drive folder lister: walks a folder tree through the Drive v3 API
//! and produces the manifest the batch fetcher consumes.

mod http;
mod rules;

pub use http::{HttpDriveApi, RequestError, DRIVE_API_BASE};
pub use rules::SkipRules;

use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::Path;

use crate::drive;
use crate::manifest::FileDescriptor;

/// One child of a Drive folder, as returned by `files.list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct DriveFile {
    pub id: String,
    #[serde(rename = "mimeType")]
    pub mime_type: String,
    pub name: String,
}

impl DriveFile {
    pub fn is_folder(&self) -> bool {
        self.mime_type == drive::FOLDER_MIME_TYPE
    }
}

/// Source of folder listings.
pub trait DriveApi {
    /// All direct children of `folder_id`, in API order.
    fn list_children(&self, folder_id: &str) -> Result<Vec<DriveFile>>;
}

/// Lists every file under `root_id`, depth-first in API order.
///
/// Files land in `<root_path>/<subfolder names...>`; names matched by `rules`
/// are skipped (a skipped folder is not descended into).
pub fn list_tree(
    api: &dyn DriveApi,
    root_id: &str,
    root_path: &str,
    rules: &SkipRules,
) -> Result<Vec<FileDescriptor>> {
    let mut out = Vec::new();
    walk(api, root_id, root_path, rules, &mut out)?;
    Ok(out)
}

fn walk(
    api: &dyn DriveApi,
    folder_id: &str,
    folder_path: &str,
    rules: &SkipRules,
    out: &mut Vec<FileDescriptor>,
) -> Result<()> {
    let children = api
        .list_children(folder_id)
        .with_context(|| format!("list folder {} ({})", folder_path, folder_id))?;
    for file in children {
        if rules.skips(&file.name) {
            tracing::debug!(name = %file.name, "skipped by name rule");
            continue;
        }
        if file.is_folder() {
            let sub = format!("{}/{}", folder_path, file.name);
            walk(api, &file.id, &sub, rules, out)?;
        } else {
            println!("added {}/{}", folder_path, file.name);
            out.push(FileDescriptor {
                url: drive::download_url(&file.id),
                name: file.name,
                path: folder_path.to_string(),
            });
        }
    }
    Ok(())
}

/// Writes `entries` as a pretty-printed (2-space) JSON manifest.
pub fn write_manifest(path: &Path, entries: &[FileDescriptor]) -> Result<()> {
    let json = serde_json::to_string_pretty(entries)?;
    std::fs::write(path, json).with_context(|| format!("write manifest {}", path.display()))?;
    tracing::info!(path = %path.display(), entries = entries.len(), "wrote manifest");
    Ok(())
}
