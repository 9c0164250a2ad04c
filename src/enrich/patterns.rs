//! Duration resolution from a detail page's markup
//!
//! Sources are tried in decreasing confidence:
//! - duration-labelled elements
//! - the full page text
//! - the meta description
//! - a default guessed from the page title

use crate::extract::parse_minutes;
use regex::Regex;
use scraper::{Html, Selector};
use std::sync::LazyLock;

static DURATION_ELEMENTS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse(".duration, .assessment-duration, .time-duration").unwrap()
});
static META_DESCRIPTION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(r#"meta[name="description"]"#).unwrap());
static TITLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("h1, .product-title").unwrap());

/// Textual duration patterns, most specific first
static DURATION_PATTERNS: LazyLock<Vec<Regex>> = LazyLock::new(|| {
    [
        r"(?i)(\d+)\s*minutes",
        r"(?i)(\d+)\s*min",
        r"(?i)Duration:?\s*(\d+)",
        r"(?i)Time:?\s*(\d+)",
        r"(?i)approximately (\d+)",
        r"(?i)takes (\d+) min",
        r"(?i)completed in (\d+)",
        r"(?i)length: (\d+)",
    ]
    .into_iter()
    .map(|pattern| Regex::new(pattern).unwrap())
    .collect()
});

/// Title keywords and the default duration they imply
const TITLE_DEFAULTS: &[(&[&str], u32)] = &[
    (&["personality", "questionnaire", "behavior"], 25),
    (&["ability", "aptitude", "reasoning"], 30),
    (&["situational", "judgment"], 20),
];

/// Where a resolved duration came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DurationSource {
    Element,
    PageText,
    MetaDescription,
    TitleHeuristic,
}

impl DurationSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            DurationSource::Element => "element",
            DurationSource::PageText => "page_text",
            DurationSource::MetaDescription => "meta_description",
            DurationSource::TitleHeuristic => "title_heuristic",
        }
    }
}

/// A resolved duration and its source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DurationEstimate {
    pub minutes: u32,
    pub source: DurationSource,
}

/// Resolves a duration from detail-page markup
///
/// # Example
///
/// ```
/// use sumi_catalog::enrich::{resolve_from_markup, DurationSource};
///
/// let estimate = resolve_from_markup("<p>Duration: 45</p>").unwrap();
/// assert_eq!(estimate.minutes, 45);
/// assert_eq!(estimate.source, DurationSource::PageText);
/// ```
pub fn resolve_from_markup(markup: &str) -> Option<DurationEstimate> {
    let document = Html::parse_document(markup);

    let estimate = |minutes, source| DurationEstimate { minutes, source };

    if let Some(minutes) = document
        .select(&DURATION_ELEMENTS)
        .find_map(|el| parse_minutes(&el.text().collect::<String>()))
    {
        return Some(estimate(minutes, DurationSource::Element));
    }

    let page_text = document
        .root_element()
        .text()
        .collect::<Vec<_>>()
        .join(" ");
    if let Some(minutes) = match_patterns(&page_text) {
        return Some(estimate(minutes, DurationSource::PageText));
    }

    if let Some(minutes) = document
        .select(&META_DESCRIPTION)
        .next()
        .and_then(|meta| meta.value().attr("content"))
        .and_then(match_patterns)
    {
        return Some(estimate(minutes, DurationSource::MetaDescription));
    }

    document
        .select(&TITLE)
        .next()
        .and_then(|title| title_default(&title.text().collect::<String>()))
        .map(|minutes| estimate(minutes, DurationSource::TitleHeuristic))
}

/// Applies the textual patterns in order
///
/// The first pattern with a positive match wins; zero never counts.
pub fn match_patterns(text: &str) -> Option<u32> {
    DURATION_PATTERNS.iter().find_map(|pattern| {
        pattern
            .captures_iter(text)
            .filter_map(|caps| caps[1].parse::<u32>().ok())
            .find(|minutes| *minutes > 0)
    })
}

/// Guesses a duration from keywords in a page title
pub fn title_default(title: &str) -> Option<u32> {
    let title = title.to_lowercase();
    TITLE_DEFAULTS
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| title.contains(k)))
        .map(|(_, minutes)| *minutes)
}
