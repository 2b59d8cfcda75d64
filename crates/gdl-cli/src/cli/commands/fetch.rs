//! `gdl fetch` (and bare `gdl`) – download the manifest entries.

use anyhow::Result;
use gdl_core::config::GdlConfig;
use gdl_core::downloader::{CurlDownloader, CurlOptions};
use gdl_core::fetcher;
use std::path::Path;

pub fn run_fetch(cfg: &GdlConfig, manifest: Option<&Path>) -> Result<()> {
    let manifest = manifest.unwrap_or(cfg.manifest_path.as_path());
    tracing::info!("fetch manifest={}", manifest.display());

    let mut downloader = CurlDownloader::new(CurlOptions::from(cfg));
    let report = fetcher::fetch_manifest_file(manifest, &mut downloader)?;

    if report.processed == 0 {
        println!("Manifest is empty.");
    }
    Ok(())
}
