//! One blocking GET into a part file.

use anyhow::{Context, Result};
use std::str;

use super::response::{parse_headers, ResponseHeaders};
use super::CurlOptions;
use crate::progress::ProgressPrinter;
use crate::storage::PartFile;

/// Performs a GET of `url` on `easy`, streaming the body into `part`.
///
/// The handle is reused across the hops of one download so cookies set by the
/// confirmation page are sent with the confirmed request.
pub(super) fn get_into(
    easy: &mut curl::easy::Easy,
    url: &str,
    part: &mut PartFile,
    opts: &CurlOptions,
) -> Result<ResponseHeaders> {
    let mut header_lines: Vec<String> = Vec::new();
    let mut write_error: Option<anyhow::Error> = None;
    let mut progress = ProgressPrinter::new(opts.progress_interval);

    easy.url(url).context("invalid URL")?;
    easy.get(true)?;
    easy.follow_location(true)?;
    easy.max_redirections(10)?;
    easy.connect_timeout(opts.connect_timeout)?;
    easy.low_speed_limit(opts.low_speed_limit)?;
    easy.low_speed_time(opts.low_speed_time)?;
    easy.progress(opts.show_progress)?;

    let performed = {
        let mut transfer = easy.transfer();
        transfer.header_function(|data| {
            if let Ok(s) = str::from_utf8(data) {
                header_lines.push(s.trim_end().to_string());
            }
            true
        })?;
        transfer.write_function(|data| match part.write(data) {
            Ok(()) => Ok(data.len()),
            Err(e) => {
                tracing::warn!("download write failed: {:#}", e);
                write_error = Some(e);
                Ok(0) // abort transfer
            }
        })?;
        transfer.progress_function(|dltotal, dlnow, _, _| {
            progress.update(dlnow as u64, dltotal as u64);
            true
        })?;
        transfer.perform()
    };
    if opts.show_progress {
        progress.finish();
    }

    if let Some(e) = write_error {
        return Err(e);
    }
    performed.with_context(|| format!("GET {} failed", url))?;

    let code = easy.response_code().context("no response code")?;
    if !(200..300).contains(&code) {
        anyhow::bail!("GET {} returned HTTP {}", url, code);
    }

    Ok(parse_headers(&header_lines))
}
