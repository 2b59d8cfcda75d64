//! Download helper: fetch one URL into one destination file.
//!
//! The batch fetcher only depends on [`DownloadHelper`]; [`CurlDownloader`]
//! is the libcurl implementation that understands Google Drive links and the
//! large-file confirmation page. Tests substitute their own helpers.

mod response;
mod transfer;

pub use response::ResponseHeaders;

use anyhow::{Context, Result};
use std::path::Path;
use std::time::Duration;

use crate::config::GdlConfig;
use crate::drive::{self, confirm};
use crate::storage::PartFile;

/// Maximum number of confirmation pages followed for one file.
pub const MAX_CONFIRM_HOPS: usize = 2;

/// Capability the batch fetcher downloads through.
pub trait DownloadHelper {
    /// Download `url` to `destination`, replacing any existing file.
    /// Returns the number of bytes written.
    fn download(&mut self, url: &str, destination: &Path) -> Result<u64>;
}

/// libcurl tuning shared by every transfer.
#[derive(Debug, Clone, Copy)]
pub struct CurlOptions {
    pub connect_timeout: Duration,
    pub low_speed_limit: u32,
    pub low_speed_time: Duration,
    pub progress_interval: Duration,
    /// Print human-readable progress on stderr.
    pub show_progress: bool,
}

impl Default for CurlOptions {
    fn default() -> Self {
        Self::from(&GdlConfig::default())
    }
}

impl From<&GdlConfig> for CurlOptions {
    fn from(cfg: &GdlConfig) -> Self {
        Self {
            connect_timeout: cfg.connect_timeout(),
            low_speed_limit: cfg.low_speed_limit_bytes,
            low_speed_time: cfg.low_speed_time(),
            progress_interval: cfg.progress_interval(),
            show_progress: true,
        }
    }
}

/// Blocking downloader built on the curl easy interface.
#[derive(Debug, Clone)]
pub struct CurlDownloader {
    opts: CurlOptions,
    /// Hosts whose HTML responses are checked for a confirmation page.
    drive_hosts: Vec<String>,
}

impl Default for CurlDownloader {
    fn default() -> Self {
        Self::new(CurlOptions::default())
    }
}

impl CurlDownloader {
    pub fn new(opts: CurlOptions) -> Self {
        Self {
            opts,
            drive_hosts: drive::DRIVE_HOSTS.iter().map(|h| h.to_string()).collect(),
        }
    }

    /// Also treat `host` as a Drive front end (mirrors, local test servers).
    pub fn with_drive_host(mut self, host: impl Into<String>) -> Self {
        self.drive_hosts.push(host.into());
        self
    }

    pub fn options(&self) -> &CurlOptions {
        &self.opts
    }

    fn is_drive_host(&self, url: &str) -> bool {
        url::Url::parse(url)
            .ok()
            .and_then(|u| u.host_str().map(|h| self.drive_hosts.iter().any(|d| d == h)))
            .unwrap_or(false)
    }
}

impl DownloadHelper for CurlDownloader {
    fn download(&mut self, url: &str, destination: &Path) -> Result<u64> {
        let drive_link = self.is_drive_host(url);
        let mut target = drive::resolve_download_url(url)?;

        if self.opts.show_progress {
            eprintln!("Downloading...");
            eprintln!("From: {}", url);
            eprintln!("To: {}", destination.display());
        }

        let mut part = PartFile::create(destination)?;
        let mut easy = curl::easy::Easy::new();
        // Empty path enables the in-memory cookie engine for this handle.
        easy.cookie_file("")?;

        for hop in 0..=MAX_CONFIRM_HOPS {
            part.reset()?;
            let headers = transfer::get_into(&mut easy, &target, &mut part, &self.opts)?;

            let interstitial = drive_link
                && confirm::is_interstitial(
                    headers.content_type.as_deref(),
                    headers.content_disposition.as_deref(),
                );
            if !interstitial {
                if let Some(expected) = headers.content_length {
                    if part.written() != expected {
                        anyhow::bail!("partial transfer: wrote {} of {}", part.written(), expected);
                    }
                }
                let written = part.written();
                let final_path = part.finalize()?;
                tracing::info!(url, path = %final_path.display(), bytes = written, "download complete");
                return Ok(written);
            }

            if hop == MAX_CONFIRM_HOPS {
                break;
            }
            let page = std::fs::read_to_string(part.temp_path())
                .with_context(|| format!("read confirmation page for {}", url))?;
            target = confirm::find_confirmed_url(&page).with_context(|| {
                format!(
                    "{}: Google Drive returned a web page instead of the file \
                     (not shared publicly, or download quota exceeded)",
                    url
                )
            })?;
            tracing::debug!(url, confirmed = %target, "following Drive confirmation page");
        }

        anyhow::bail!(
            "{}: still on a confirmation page after {} attempts",
            url,
            MAX_CONFIRM_HOPS + 1
        )
    }
}
