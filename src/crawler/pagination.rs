//! Pagination discovery
//!
//! Finds follow-up listing pages in rendered markup.
//!
//! **Include:**
//! - `<a href>` inside `nav.pagination`, `.pagination`, `.pager`, `.paging`
//! - `data-url` (or `href`) of "load more" triggers: `button.load-more`,
//!   `.load-more`, `.show-more`
//!
//! **Exclude:**
//! - links marked as the current or active page, by class on the link or its
//!   parent, or by their text
//! - `javascript:`, `mailto:`, `tel:` and data links
//! - URLs already visited
//!
//! Candidates come back in document order with duplicates collapsed to their
//! first appearance.

use crate::url::resolve_link;
use scraper::{ElementRef, Html, Selector};
use std::collections::HashSet;
use std::sync::LazyLock;
use url::Url;

static PAGER_LINKS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(
        "nav.pagination a[href], .pagination a[href], .pager a[href], .paging a[href], \
         button.load-more, .load-more, .show-more",
    )
    .unwrap()
});

const CURRENT_MARKERS: &[&str] = &["current", "active"];

/// Returns unvisited follow-up page URLs found in `markup`
///
/// `visited` is only read, never modified.
///
/// # Example
///
/// ```
/// use sumi_catalog::crawler::discover;
/// use std::collections::HashSet;
/// use url::Url;
///
/// let html = r#"<ul class="pagination">
///   <li class="active"><a href="?start=0">1</a></li>
///   <li><a href="?start=12">2</a></li>
/// </ul>"#;
/// let base = Url::parse("https://example.com/catalog/").unwrap();
///
/// let pages = discover(html, &base, &HashSet::new());
/// assert_eq!(pages.len(), 1);
/// assert_eq!(pages[0].as_str(), "https://example.com/catalog/?start=12");
/// ```
pub fn discover(markup: &str, base_url: &Url, visited: &HashSet<Url>) -> Vec<Url> {
    let document = Html::parse_document(markup);
    let mut seen = HashSet::new();
    let mut candidates = Vec::new();

    for element in document.select(&PAGER_LINKS) {
        if is_current(element) {
            continue;
        }

        let Some(target) = link_target(element) else {
            continue;
        };

        let Some(url) = resolve_link(target, base_url) else {
            tracing::trace!("Ignoring pagination target: {}", target);
            continue;
        };

        if visited.contains(&url) || !seen.insert(url.clone()) {
            continue;
        }

        candidates.push(url);
    }

    tracing::debug!("Discovered {} pagination candidates on {}", candidates.len(), base_url);
    candidates
}

/// Target of a pager link or load-more trigger
fn link_target<'a>(element: ElementRef<'a>) -> Option<&'a str> {
    let value = element.value();
    value.attr("data-url").or_else(|| value.attr("href"))
}

/// True if the element marks the page currently shown
fn is_current(element: ElementRef<'_>) -> bool {
    let has_marker_class = |el: ElementRef<'_>| {
        el.value()
            .classes()
            .any(|class| CURRENT_MARKERS.iter().any(|m| class.eq_ignore_ascii_case(m)))
    };

    if has_marker_class(element) {
        return true;
    }

    if element.value().attr("aria-current").is_some() {
        return true;
    }

    if element
        .parent()
        .and_then(ElementRef::wrap)
        .is_some_and(has_marker_class)
    {
        return true;
    }

    let text = element.text().collect::<String>().to_lowercase();
    text.split(|c: char| !c.is_alphanumeric())
        .any(|word| CURRENT_MARKERS.contains(&word))
}
