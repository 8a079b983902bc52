//! Parsing of the search results listing.
//!
//! Kept apart from the HTTP exchange so the matching strategy can change
//! without touching the locator's callers.

use std::sync::LazyLock;

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use url::Url;

/// Journal name (lowercased) of the regular Section 3 edition.
pub const SECTION_NAME: &str = "diário oficial da união - seção 3";

/// Marker of supplementary editions, which are ignored.
pub const EXTRA_MARKER: &str = "extra";

/// Title (lowercased) of the full-edition download link.
pub const DOWNLOAD_TITLE: &str = "download da edição completa";

static TABLE: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table#ResultadoConsulta").unwrap());
static ROW: LazyLock<Selector> = LazyLock::new(|| Selector::parse("tr").unwrap());
static CELL: LazyLock<Selector> = LazyLock::new(|| Selector::parse("td").unwrap());
static LINK: LazyLock<Selector> = LazyLock::new(|| Selector::parse("a").unwrap());
static TRIGGER_LINK: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("a[onclick][title]").unwrap());
static REDIRECT_CALL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"redirecionaSelect\('(.*?)'\);").unwrap());

/// What the listing told us about the requested edition.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListingOutcome {
    Found(Url),
    /// The results table is not in the page.
    TableMissing,
    /// No Section 3 row carried a usable download link.
    NoMatch {
        /// Raw HTML of the last cell of each matching row, for diagnostics.
        inspected_cells: Vec<String>,
    },
}

/// Finds the full-edition download URL in a results page.
///
/// Relative URLs are resolved against `base`.
pub fn find_edition_url(html: &str, base: &Url) -> ListingOutcome {
    let document = Html::parse_document(html);
    let Some(table) = document.select(&TABLE).next() else {
        return ListingOutcome::TableMissing;
    };

    let mut inspected_cells = Vec::new();
    for row in table.select(&ROW) {
        let cells: Vec<ElementRef> = row.select(&CELL).collect();
        if cells.len() < 2 {
            continue;
        }
        if !is_section_row(cells[0]) {
            continue;
        }

        let download_cell = cells[cells.len() - 1];
        if let Some(url) = download_link(download_cell).and_then(|raw| resolve(&raw, base)) {
            return ListingOutcome::Found(url);
        }
        inspected_cells.push(download_cell.html());
    }

    ListingOutcome::NoMatch { inspected_cells }
}

fn is_section_row(name_cell: ElementRef) -> bool {
    let Some(link) = name_cell.select(&LINK).next() else {
        return false;
    };
    let name = link.text().map(str::trim).collect::<String>().to_lowercase();
    name.contains(SECTION_NAME) && !name.contains(EXTRA_MARKER)
}

fn download_link(cell: ElementRef) -> Option<String> {
    cell.select(&TRIGGER_LINK)
        .filter(|a| {
            a.value()
                .attr("title")
                .is_some_and(|t| t.to_lowercase().contains(DOWNLOAD_TITLE))
        })
        .find_map(|a| a.value().attr("onclick").and_then(extract_redirect_target))
}

/// Pulls the URL out of a `redirecionaSelect('...');` call.
pub fn extract_redirect_target(onclick: &str) -> Option<String> {
    REDIRECT_CALL
        .captures(onclick)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().replace("&amp;", "&"))
}

fn resolve(raw: &str, base: &Url) -> Option<Url> {
    if raw.starts_with("http") {
        Url::parse(raw).ok()
    } else {
        base.join(raw).ok()
    }
}
