//! Drive v3 `files.list` over libcurl.

use anyhow::Result;
use serde::Deserialize;
use std::fmt;
use std::time::Duration;

use super::{DriveApi, DriveFile};
use crate::retry::{run_with_retry, ErrorKind, RetryPolicy};

/// Default API origin.
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com";

const PAGE_SIZE: &str = "1000";
const FIELDS: &str = "nextPageToken, files(id, mimeType, name)";

/// Error from a single `files.list` request.
#[derive(Debug)]
pub enum RequestError {
    /// Curl reported an error (timeout, connection, etc.). Retried.
    Curl(curl::Error),
    /// HTTP response had a non-2xx status.
    Http(u32),
    /// Body was not a `files.list` response.
    Decode(serde_json::Error),
}

impl RequestError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            RequestError::Curl(_) => ErrorKind::Transport,
            RequestError::Http(_) | RequestError::Decode(_) => ErrorKind::Other,
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Curl(e) => write!(f, "{}", e),
            RequestError::Http(code) => write!(f, "HTTP {}", code),
            RequestError::Decode(e) => write!(f, "unexpected response body: {}", e),
        }
    }
}

impl std::error::Error for RequestError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RequestError::Curl(e) => Some(e),
            RequestError::Decode(e) => Some(e),
            RequestError::Http(_) => None,
        }
    }
}

impl From<curl::Error> for RequestError {
    fn from(e: curl::Error) -> Self {
        RequestError::Curl(e)
    }
}

#[derive(Debug, Deserialize)]
struct FileListPage {
    #[serde(default)]
    files: Vec<DriveFile>,
    #[serde(rename = "nextPageToken")]
    next_page_token: Option<String>,
}

/// `DriveApi` backed by the public REST endpoint, authenticated with an API key.
#[derive(Debug, Clone)]
pub struct HttpDriveApi {
    base: String,
    api_key: String,
    retry: RetryPolicy,
    connect_timeout: Duration,
}

impl HttpDriveApi {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            base: DRIVE_API_BASE.to_string(),
            api_key: api_key.into(),
            retry: RetryPolicy::default(),
            connect_timeout: Duration::from_secs(30),
        }
    }

    /// Point at a different origin (e.g. a local test server).
    pub fn with_base_url(mut self, base: impl Into<String>) -> Self {
        self.base = base.into().trim_end_matches('/').to_string();
        self
    }

    pub fn with_retry(mut self, retry: RetryPolicy) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_connect_timeout(mut self, timeout: Duration) -> Self {
        self.connect_timeout = timeout;
        self
    }

    fn page_url(&self, folder_id: &str, page_token: Option<&str>) -> Result<String> {
        let query = format!("'{}' in parents", folder_id);
        let mut params = vec![
            ("q", query.as_str()),
            ("fields", FIELDS),
            ("pageSize", PAGE_SIZE),
            ("key", self.api_key.as_str()),
        ];
        if let Some(token) = page_token {
            params.push(("pageToken", token));
        }
        let url = url::Url::parse_with_params(&format!("{}/drive/v3/files", self.base), &params)?;
        Ok(url.to_string())
    }

    fn get_page(&self, url: &str) -> Result<FileListPage, RequestError> {
        let mut body = Vec::new();
        let mut easy = curl::easy::Easy::new();
        easy.url(url)?;
        easy.follow_location(true)?;
        easy.connect_timeout(self.connect_timeout)?;
        easy.timeout(Duration::from_secs(120))?;
        {
            let mut transfer = easy.transfer();
            transfer.write_function(|data| {
                body.extend_from_slice(data);
                Ok(data.len())
            })?;
            transfer.perform()?;
        }
        let code = easy.response_code()?;
        if !(200..300).contains(&code) {
            return Err(RequestError::Http(code));
        }
        serde_json::from_slice(&body).map_err(RequestError::Decode)
    }
}

impl DriveApi for HttpDriveApi {
    fn list_children(&self, folder_id: &str) -> Result<Vec<DriveFile>> {
        let mut files = Vec::new();
        let mut token: Option<String> = None;
        loop {
            let url = self.page_url(folder_id, token.as_deref())?;
            let page = run_with_retry(&self.retry, RequestError::kind, || self.get_page(&url))?;
            files.extend(page.files);
            match page.next_page_token {
                Some(next) if !next.is_empty() => token = Some(next),
                _ => break,
            }
        }
        tracing::debug!(folder_id, children = files.len(), "listed folder");
        Ok(files)
    }
}
