//! Large-file confirmation page ("Google Drive can't scan this file for viruses").
//!
//! For files above the virus-scan size limit Drive answers the direct
//! download URL with an HTML page instead of the file. The page links to the
//! real download, either as a `download-form` with hidden inputs, an anchor
//! carrying a `confirm=` token, or a `"downloadUrl"` JSON fragment.

const DRIVE_ORIGIN: &str = "https://drive.google.com";

/// True if a response is the confirmation page rather than the file itself:
/// an HTML body with no attachment disposition.
pub fn is_interstitial(content_type: Option<&str>, content_disposition: Option<&str>) -> bool {
    let html = content_type
        .map(|ct| ct.trim().to_ascii_lowercase().starts_with("text/html"))
        .unwrap_or(false);
    html && content_disposition.is_none()
}

/// Finds the confirmed download URL in a confirmation page.
/// Returns `None` if the page has no usable link (private file, quota exceeded).
pub fn find_confirmed_url(html: &str) -> Option<String> {
    from_download_form(html)
        .or_else(|| from_confirm_href(html))
        .or_else(|| from_download_url_json(html))
}

fn from_download_form(html: &str) -> Option<String> {
    let (form_tag, form_body) = tags(html, "<form")
        .find(|(tag, _)| attr(tag, "id").as_deref() == Some("download-form"))?;
    let action = decode_entities(&attr(form_tag, "action")?);
    let mut url = url::Url::parse(&absolute(&action)).ok()?;

    let inner = match form_body.find("</form>") {
        Some(end) => &form_body[..end],
        None => form_body,
    };
    {
        let mut pairs = url.query_pairs_mut();
        for (input, _) in tags(inner, "<input") {
            if attr(input, "type").as_deref() != Some("hidden") {
                continue;
            }
            if let Some(name) = attr(input, "name") {
                let value = attr(input, "value").unwrap_or_default();
                pairs.append_pair(&decode_entities(&name), &decode_entities(&value));
            }
        }
    }
    Some(url.to_string())
}

fn from_confirm_href(html: &str) -> Option<String> {
    let mut rest = html;
    while let Some(pos) = rest.find("href=\"") {
        rest = &rest[pos + 6..];
        let end = rest.find('"')?;
        let href = decode_entities(&rest[..end]);
        if href.contains("export=download") && href.contains("confirm=") {
            return Some(absolute(&href));
        }
        rest = &rest[end..];
    }
    None
}

fn from_download_url_json(html: &str) -> Option<String> {
    const KEY: &str = "\"downloadUrl\":\"";
    let start = html.find(KEY)? + KEY.len();
    let end = html[start..].find('"')?;
    let raw = &html[start..start + end];
    let decoded = raw
        .replace("\\u003d", "=")
        .replace("\\u0026", "&")
        .replace("\\/", "/");
    if decoded.is_empty() {
        None
    } else {
        Some(decoded)
    }
}

/// Iterates `(tag, rest_after_tag)` for every tag starting with `open` (e.g. `<form`).
fn tags<'a>(html: &'a str, open: &'a str) -> impl Iterator<Item = (&'a str, &'a str)> + 'a {
    let mut rest = html;
    std::iter::from_fn(move || {
        let start = rest.find(open)?;
        let after = &rest[start..];
        let end = after.find('>')?;
        let tag = &after[..=end];
        rest = &after[end + 1..];
        Some((tag, rest))
    })
}

/// Value of a double-quoted attribute inside a single tag.
fn attr(tag: &str, name: &str) -> Option<String> {
    let needle = format!(" {}=\"", name);
    let start = tag.find(&needle)? + needle.len();
    let end = tag[start..].find('"')?;
    Some(tag[start..start + end].to_string())
}

fn decode_entities(s: &str) -> String {
    s.replace("&amp;", "&")
        .replace("&#39;", "'")
        .replace("&quot;", "\"")
}

fn absolute(href: &str) -> String {
    if href.starts_with('/') {
        format!("{}{}", DRIVE_ORIGIN, href)
    } else {
        href.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn interstitial_detection() {
        assert!(is_interstitial(Some("text/html; charset=utf-8"), None));
        assert!(!is_interstitial(
            Some("text/html"),
            Some("attachment; filename=\"page.html\"")
        ));
        assert!(!is_interstitial(Some("application/octet-stream"), None));
        assert!(!is_interstitial(None, None));
    }

    #[test]
    fn download_form_with_hidden_inputs() {
        let html = r#"<html><body>
            <p>Google Drive can't scan this file for viruses.</p>
            <form id="download-form" action="https://drive.usercontent.google.com/download" method="get">
              <input type="submit" id="uc-download-link" value="Download anyway"/>
              <input type="hidden" name="id" value="1AbC">
              <input type="hidden" name="export" value="download">
              <input type="hidden" name="confirm" value="t">
              <input type="hidden" name="uuid" value="a1-b2">
            </form></body></html>"#;
        assert_eq!(
            find_confirmed_url(html).as_deref(),
            Some("https://drive.usercontent.google.com/download?id=1AbC&export=download&confirm=t&uuid=a1-b2")
        );
    }

    #[test]
    fn other_forms_are_ignored() {
        let html = r#"<form id="search" action="https://example.com/s"><input type="hidden" name="q" value="x"></form>"#;
        assert_eq!(find_confirmed_url(html), None);
    }

    #[test]
    fn confirm_href_relative() {
        let html = r#"<a id="uc-download-link" class="goog-inline-block jfk-button" href="/uc?export=download&amp;confirm=Xy12&amp;id=1AbC">Download anyway</a>"#;
        assert_eq!(
            find_confirmed_url(html).as_deref(),
            Some("https://drive.google.com/uc?export=download&confirm=Xy12&id=1AbC")
        );
    }

    #[test]
    fn href_without_confirm_is_skipped() {
        let html = r#"<a href="/uc?export=download&amp;id=1AbC">retry</a>"#;
        assert_eq!(find_confirmed_url(html), None);
    }

    #[test]
    fn download_url_json_fragment() {
        let html = r#"<script>var x = {"downloadUrl":"https://doc-0s.googleusercontent.com/docs/abc?e=download&id=1"};</script>"#;
        assert_eq!(
            find_confirmed_url(html).as_deref(),
            Some("https://doc-0s.googleusercontent.com/docs/abc?e=download&id=1")
        );
    }

    #[test]
    fn quota_page_has_no_link() {
        let html = "<html><title>Google Drive - Quota exceeded</title><body>Too many users have viewed or downloaded this file recently.</body></html>";
        assert_eq!(find_confirmed_url(html), None);
    }
}
