//! Record extraction from catalog listing markup
//!
//! The catalog's markup is an unversioned contract, so extraction runs an
//! ordered chain of strategies and keeps the first one that produces records:
//!
//! 1. [`Strategy::KnownStructure`] - elements carrying the catalog's own
//!    table or grid class names
//! 2. [`Strategy::HeaderHeuristic`] - the first generic table whose headers
//!    name both a product and a catalog attribute
//! 3. [`Strategy::CardHeuristic`] - product cards anywhere in the page
//! 4. [`Strategy::AllTables`] - every table in the document
//!
//! Every strategy is a pure function of the markup and base URL.

mod card;
mod categories;
mod table;

pub use card::{parse_card, parse_cards};
pub use categories::{
    apply_tech_keywords, category_for_code, parse_category_cell, CATEGORY_CODES, TECH_KEYWORDS,
};
pub use table::{parse_row, parse_table};

pub(crate) use card::parse_minutes;

use crate::record::RawRecord;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;
use url::Url;

static KNOWN_REGIONS: LazyLock<Selector> = LazyLock::new(|| {
    Selector::parse("table.products-table, table.product-catalog, .product-grid, .assessment-grid")
        .unwrap()
});
static TABLE: LazyLock<Selector> = LazyLock::new(|| Selector::parse("table").unwrap());

/// Header tokens naming the product column
const NAME_TOKENS: &[&str] = &["name", "product", "assessment"];

/// Header tokens naming a catalog attribute column
const ATTRIBUTE_TOKENS: &[&str] = &["remote", "type", "duration"];

/// One step of the extraction cascade
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Strategy {
    KnownStructure,
    HeaderHeuristic,
    CardHeuristic,
    AllTables,
}

impl Strategy {
    /// Strategies in the order they are tried
    pub const CASCADE: [Strategy; 4] = [
        Strategy::KnownStructure,
        Strategy::HeaderHeuristic,
        Strategy::CardHeuristic,
        Strategy::AllTables,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::KnownStructure => "known_structure",
            Self::HeaderHeuristic => "header_heuristic",
            Self::CardHeuristic => "card_heuristic",
            Self::AllTables => "all_tables",
        }
    }

    /// Runs this strategy against a parsed document
    ///
    /// Returns None when the strategy finds no region or its region yields
    /// no records.
    pub fn apply(&self, document: &Html, base_url: &Url) -> Option<Vec<RawRecord>> {
        let records = match self {
            Self::KnownStructure => known_structure(document, base_url),
            Self::HeaderHeuristic => header_heuristic(document, base_url),
            Self::CardHeuristic => parse_cards(document.root_element(), base_url),
            Self::AllTables => document
                .select(&TABLE)
                .flat_map(|t| parse_table(t, base_url))
                .collect(),
        };

        if records.is_empty() {
            None
        } else {
            Some(records)
        }
    }
}

/// Result of running the extraction cascade on one page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Strategy that produced the records, None on a miss
    pub strategy: Option<Strategy>,
    pub records: Vec<RawRecord>,
}

impl Extraction {
    /// True when no strategy produced a record
    pub fn is_miss(&self) -> bool {
        self.records.is_empty()
    }
}

/// Extracts raw records from listing markup
///
/// # Example
///
/// ```
/// use sumi_catalog::extract::{extract, Strategy};
/// use url::Url;
///
/// let html = r#"<table class="products-table">
///   <tr><th>Product Name</th><th>Remote</th><th>Adaptive</th><th>Test Type</th></tr>
///   <tr><td><a href="/view/opq32r/">OPQ32r</a></td><td>✓</td><td></td><td>P</td></tr>
/// </table>"#;
/// let base = Url::parse("https://example.com/catalog/").unwrap();
///
/// let extraction = extract(html, &base);
/// assert_eq!(extraction.strategy, Some(Strategy::KnownStructure));
/// assert_eq!(extraction.records[0].name, "OPQ32r");
/// ```
pub fn extract(markup: &str, base_url: &Url) -> Extraction {
    let document = Html::parse_document(markup);

    for strategy in Strategy::CASCADE {
        if let Some(records) = strategy.apply(&document, base_url) {
            tracing::debug!(
                "Strategy {} produced {} records",
                strategy.as_str(),
                records.len()
            );
            return Extraction {
                strategy: Some(strategy),
                records,
            };
        }
    }

    Extraction {
        strategy: None,
        records: Vec::new(),
    }
}

/// Parses every element carrying a recognized catalog class
///
/// Tables are parsed row by row; grid containers are parsed card by card.
fn known_structure(document: &Html, base_url: &Url) -> Vec<RawRecord> {
    document
        .select(&KNOWN_REGIONS)
        .flat_map(|region| parse_region(region, base_url))
        .collect()
}

fn parse_region(region: ElementRef<'_>, base_url: &Url) -> Vec<RawRecord> {
    if region.value().name() == "table" {
        parse_table(region, base_url)
    } else {
        parse_cards(region, base_url)
    }
}

/// Parses the first table whose headers look like a product listing
fn header_heuristic(document: &Html, base_url: &Url) -> Vec<RawRecord> {
    let candidate = document.select(&TABLE).find(|t| {
        let headers = table::header_text(*t);
        NAME_TOKENS.iter().any(|tok| headers.contains(tok))
            && ATTRIBUTE_TOKENS.iter().any(|tok| headers.contains(tok))
    });

    match candidate {
        Some(t) => {
            tracing::info!("Found product table with headers: {}", table::header_text(t));
            parse_table(t, base_url)
        }
        None => Vec::new(),
    }
}
