//! Google Drive link handling.
//!
//! Share links come in several shapes (`/file/d/<id>/view`, `/open?id=<id>`,
//! `/uc?id=<id>`). All of them are rewritten to the direct download endpoint
//! so the downloader only has to deal with one URL form plus the large-file
//! confirmation page (see [`confirm`]).

pub mod confirm;

use anyhow::{Context, Result};

/// Direct download endpoint; the file id is appended.
pub const DOWNLOAD_URL_PREFIX: &str = "https://drive.google.com/uc?export=download&id=";

/// Mime type Drive uses for folders.
pub const FOLDER_MIME_TYPE: &str = "application/vnd.google-apps.folder";

/// Hosts serving Drive share links.
pub const DRIVE_HOSTS: &[&str] = &["drive.google.com", "docs.google.com"];

/// Direct download URL for a Drive file id.
pub fn download_url(file_id: &str) -> String {
    format!("{}{}", DOWNLOAD_URL_PREFIX, file_id)
}

/// Extracts the file id from a Drive share or download link.
///
/// Returns `None` for non-Drive URLs and Drive URLs without an id (e.g. folder views).
pub fn file_id(url: &str) -> Option<String> {
    let parsed = url::Url::parse(url).ok()?;
    let host = parsed.host_str()?;
    if !DRIVE_HOSTS.contains(&host) {
        return None;
    }

    let segments: Vec<&str> = parsed
        .path_segments()
        .map(|s| s.filter(|p| !p.is_empty()).collect())
        .unwrap_or_default();
    if let Some(pos) = segments.iter().position(|s| *s == "d") {
        if segments.get(pos.saturating_sub(1)) == Some(&"file") || host == "docs.google.com" {
            if let Some(id) = segments.get(pos + 1) {
                return Some((*id).to_string());
            }
        }
    }

    parsed
        .query_pairs()
        .find(|(k, _)| k == "id")
        .map(|(_, v)| v.into_owned())
        .filter(|v| !v.is_empty())
}

/// Rewrites Drive share links to the direct download endpoint.
/// Non-Drive URLs are returned unchanged; unparseable URLs are an error.
pub fn resolve_download_url(url: &str) -> Result<String> {
    url::Url::parse(url).with_context(|| format!("invalid URL: {}", url))?;
    match file_id(url) {
        Some(id) => {
            let direct = download_url(&id);
            if direct != url {
                tracing::debug!(from = url, to = %direct, "rewrote Drive link");
            }
            Ok(direct)
        }
        None => Ok(url.to_string()),
    }
}
