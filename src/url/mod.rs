//! URL handling module for Sumi-Catalog
//!
//! This module resolves links found in catalog markup against the page they
//! were found on and normalizes them into the keys used for the visited set
//! and for record identity.

mod normalize;

pub use normalize::{normalize_parsed, normalize_url};

use url::Url;

/// Resolves a link href to a normalized absolute URL
///
/// Returns None if the link should be excluded:
/// - empty or fragment-only hrefs
/// - javascript:, mailto:, tel: schemes
/// - data: URIs
/// - hrefs that do not resolve to an HTTP(S) URL
///
/// # Examples
///
/// ```
/// use sumi_catalog::url::resolve_link;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/catalog/").unwrap();
/// let link = resolve_link("view/verify-g/", &base).unwrap();
/// assert_eq!(link.as_str(), "https://example.com/catalog/view/verify-g/");
/// ```
pub fn resolve_link(href: &str, base_url: &Url) -> Option<Url> {
    let href = href.trim();

    if href.is_empty() || href.starts_with('#') {
        return None;
    }

    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("javascript:")
        || lowered.starts_with("mailto:")
        || lowered.starts_with("tel:")
        || lowered.starts_with("data:")
    {
        return None;
    }

    let absolute = base_url.join(href).ok()?;
    normalize_parsed(absolute).ok()
}
