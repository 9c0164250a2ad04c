//! Product card parsing
//!
//! Grid layouts render each product as a card. Cards are the only place a
//! duration can be read during extraction.

use crate::record::RawRecord;
use crate::url::resolve_link;
use regex::Regex;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

pub(crate) static CARD: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".product-card, .assessment-card, .test-card").unwrap());
static TITLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("h2, h3, .product-title, .assessment-title").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static TYPE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".test-type, .assessment-type, .product-type").unwrap());
static DURATION: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".duration, .time, .length").unwrap());
static REMOTE_HINT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".remote, .online, .virtual").unwrap());
static ADAPTIVE_HINT: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse(".adaptive, .irt, .smart").unwrap());

static MINUTES: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?i)(\d+)\s*min").unwrap());

/// Parses every card inside a container element
pub fn parse_cards(container: ElementRef<'_>, base_url: &Url) -> Vec<RawRecord> {
    container
        .select(&CARD)
        .filter_map(|card| parse_card(card, base_url))
        .collect()
}

/// Parses a single product card
///
/// Returns None when the card lacks a title or a resolvable link.
pub fn parse_card(card: ElementRef<'_>, base_url: &Url) -> Option<RawRecord> {
    let name = card.select(&TITLE).next()?.text().collect::<String>();

    let href = card.select(&ANCHOR).next()?.value().attr("href")?;
    let url = resolve_link(href, base_url)?;

    let mut record = RawRecord::new(&name, url)?;

    if let Some(type_elem) = card.select(&TYPE).next() {
        record.categories = type_elem
            .text()
            .collect::<String>()
            .split(',')
            .map(str::trim)
            .filter(|part| !part.is_empty())
            .map(str::to_string)
            .collect();
    }

    record.duration = card
        .select(&DURATION)
        .next()
        .and_then(|elem| parse_minutes(&elem.text().collect::<String>()));

    record.remote_testing = card.select(&REMOTE_HINT).next().is_some();
    record.adaptive_irt = card.select(&ADAPTIVE_HINT).next().is_some();

    Some(record)
}

/// Reads the first `<number> min` occurrence as a positive minute count
pub(crate) fn parse_minutes(text: &str) -> Option<u32> {
    MINUTES
        .captures(text)
        .and_then(|caps| caps[1].parse::<u32>().ok())
        .filter(|minutes| *minutes > 0)
}
