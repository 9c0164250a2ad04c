//! Table row parsing
//!
//! Catalog tables follow a fixed column contract:
//!
//! | Column | Content                                   |
//! |--------|-------------------------------------------|
//! | 0      | product name, linking to its detail page  |
//! | 1      | remote testing indicator                  |
//! | 2      | adaptive/IRT indicator                    |
//! | 3      | category codes                            |

use super::categories::{apply_tech_keywords, parse_category_cell};
use crate::record::RawRecord;
use crate::url::resolve_link;
use scraper::{ElementRef, Selector};
use std::sync::LazyLock;
use url::Url;

static TH: LazyLock<Selector> = LazyLock::new(|| Selector::parse("th").unwrap());
static TR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static TD: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static ANCHOR: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a[href]").unwrap());
static CHECK_ICON: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("img, i.fa-check, .check-icon").unwrap());

/// Header tokens that mark a table worth parsing at all
const TABLE_HEADER_TOKENS: &[&str] = &["name", "product", "remote", "test type"];

const CHECK_GLYPHS: &[char] = &['✓', '✔'];

const MIN_COLUMNS: usize = 4;

/// Returns the lowercased header texts of a table joined by spaces
pub(crate) fn header_text(table: ElementRef<'_>) -> String {
    table
        .select(&TH)
        .map(|th| th.text().collect::<String>().trim().to_lowercase())
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses every data row of a catalog table
///
/// Tables whose headers mention none of the catalog columns are skipped
/// entirely. Rows with fewer than four cells or without a link in the first
/// cell are dropped.
pub fn parse_table(table: ElementRef<'_>, base_url: &Url) -> Vec<RawRecord> {
    let headers = header_text(table);
    if !TABLE_HEADER_TOKENS.iter().any(|t| headers.contains(t)) {
        tracing::debug!("Skipping table with headers: {:?}", headers);
        return Vec::new();
    }

    table
        .select(&TR)
        .filter_map(|row| parse_row(row, base_url))
        .collect()
}

/// Parses a single table row into a raw record
pub fn parse_row(row: ElementRef<'_>, base_url: &Url) -> Option<RawRecord> {
    let cells: Vec<ElementRef<'_>> = row.select(&TD).collect();
    if cells.len() < MIN_COLUMNS {
        return None;
    }

    let link = cells[0].select(&ANCHOR).next()?;
    let url = resolve_link(link.value().attr("href")?, base_url)?;
    let name = link.text().collect::<String>();

    let mut record = RawRecord::new(&name, url)?;
    record.remote_testing = has_check(cells[1]);
    record.adaptive_irt = has_check(cells[2]);

    let mut categories = parse_category_cell(&cells[3].text().collect::<String>());
    apply_tech_keywords(&record.name, &mut categories);
    record.categories = categories;

    Some(record)
}

/// True if a cell holds a check icon, an image, or a checkmark glyph
fn has_check(cell: ElementRef<'_>) -> bool {
    cell.select(&CHECK_ICON).next().is_some()
        || cell.text().any(|t| t.contains(CHECK_GLYPHS))
}
