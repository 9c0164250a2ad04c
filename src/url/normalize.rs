use crate::UrlError;
use url::Url;

/// Query parameters that never change which catalog page is served
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "mc_eid",
];

/// Normalizes a URL into the form used for visited-set and identity keys
///
/// # Normalization Steps
///
/// 1. Parse the URL; reject if malformed
/// 2. Require an HTTP(S) scheme and a host
/// 3. Remove fragment (everything after #)
/// 4. Remove tracking query parameters, keeping the rest as written
/// 5. Remove empty query string (trailing ?)
///
/// Paths are left as the catalog serves them: trailing slashes are
/// significant on catalog detail pages.
///
/// # Examples
///
/// ```
/// use sumi_catalog::url::normalize_url;
///
/// let url = normalize_url("https://example.com/catalog/?start=12&utm_source=x#top").unwrap();
/// assert_eq!(url.as_str(), "https://example.com/catalog/?start=12");
/// ```
pub fn normalize_url(url_str: &str) -> Result<Url, UrlError> {
    let url = Url::parse(url_str).map_err(|e| UrlError::Parse(e.to_string()))?;
    normalize_parsed(url)
}

/// Normalizes an already parsed URL
pub fn normalize_parsed(mut url: Url) -> Result<Url, UrlError> {
    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(format!(
            "Only HTTP and HTTPS schemes are supported, got: {}",
            url.scheme()
        )));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);

    if let Some(query) = url.query().map(str::to_owned) {
        let segments: Vec<&str> = query.split('&').collect();
        let kept: Vec<&str> = segments
            .iter()
            .copied()
            .filter(|segment| !segment.is_empty() && !is_tracking_segment(segment))
            .collect();

        // Untouched queries keep their exact encoding
        if kept.len() != segments.len() {
            if kept.is_empty() {
                url.set_query(None);
            } else {
                url.set_query(Some(&kept.join("&")));
            }
        }
    }

    Ok(url)
}

/// True if a raw `key=value` query segment carries a tracking parameter
fn is_tracking_segment(segment: &str) -> bool {
    url::form_urlencoded::parse(segment.as_bytes())
        .next()
        .is_some_and(|(key, _)| is_tracking_param(&key))
}

fn is_tracking_param(key: &str) -> bool {
    TRACKING_PARAMS.contains(&key) || key.starts_with("utm_")
}
