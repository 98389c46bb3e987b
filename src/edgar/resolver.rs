// src/edgar/resolver.rs
//! Finds the primary filing document behind an EDGAR filing index page.

use crate::edgar::client::EdgarClient;
use crate::edgar::models::{FilingDescriptor, ResolvedDocument};
use crate::utils::error::EdgarError;
use once_cell::sync::Lazy;
use reqwest::Url;
use scraper::{ElementRef, Html, Selector};

/// Every real filing document lives under this archive path.
const ARCHIVE_PATH_SEGMENT: &str = "/Archives/edgar/data/";

// Column positions in EDGAR's "Document Format Files" table:
// Seq | Description | Document | Type | Size
const FILE_TABLE_DOCUMENT_COL: usize = 2;
const FILE_TABLE_TYPE_COL: usize = 3;

static ANCHOR_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("a[href]").expect("Failed to compile ANCHOR_SELECTOR")
});

static FILE_TABLE_ROW_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("table.tableFile tr").expect("Failed to compile FILE_TABLE_ROW_SELECTOR")
});

static CELL_SELECTOR: Lazy<Selector> = Lazy::new(|| {
    Selector::parse("td").expect("Failed to compile CELL_SELECTOR")
});

/// Fetches the index page for `filing` and returns the URL of its main document.
pub async fn resolve_document_url(
    client: &EdgarClient,
    filing: &FilingDescriptor,
) -> Result<String, EdgarError> {
    let index_html = client.fetch_index_page(&filing.filing_index_url).await?;

    find_document_link(&index_html, &filing.filing_index_url, &filing.form_type)
        .ok_or_else(|| EdgarError::DocumentLinkNotFound(filing.filing_index_url.clone()))
}

/// Resolves and downloads the filing document in one step.
pub async fn fetch_document(
    client: &EdgarClient,
    filing: &FilingDescriptor,
) -> Result<ResolvedDocument, EdgarError> {
    let document_url = resolve_document_url(client, filing).await?;
    tracing::info!("Fetching {} document for {}: {}", filing.form_type, filing.company_name, document_url);

    let raw_markup = client.download_filing_doc(&document_url).await?;

    Ok(ResolvedDocument {
        source: filing.clone(),
        document_url,
        raw_markup,
    })
}

/// Picks the filing document link out of an index page.
///
/// First pass: any anchor whose text or href mentions the form type and whose
/// href points into the filing archive. Fallback: the structured file table,
/// preferring a row typed as the form, else the first row carrying a link.
pub fn find_document_link(index_html: &str, index_url: &str, form_type: &str) -> Option<String> {
    let document = Html::parse_document(index_html);
    let form = form_type.to_lowercase();

    for anchor in document.select(&ANCHOR_SELECTOR) {
        let href = anchor.value().attr("href").unwrap_or_default();
        let text = anchor.text().collect::<String>().to_lowercase();

        let mentions_form = text.contains(&form) || href.to_lowercase().contains(&form);
        if mentions_form && href.contains(ARCHIVE_PATH_SEGMENT) {
            tracing::debug!("Document link from anchor scan: {}", href);
            return absolutize(index_url, href);
        }
    }

    let rows: Vec<Vec<ElementRef>> = document
        .select(&FILE_TABLE_ROW_SELECTOR)
        .map(|row| row.select(&CELL_SELECTOR).collect::<Vec<_>>())
        .filter(|cells| cells.len() >= 3)
        .collect();

    let typed_row = rows.iter().find(|cells| {
        cells
            .get(FILE_TABLE_TYPE_COL)
            .map(|cell| cell.text().collect::<String>().to_lowercase().contains(&form))
            .unwrap_or(false)
            && row_link(cells).is_some()
    });

    let chosen = typed_row.or_else(|| rows.iter().find(|cells| row_link(cells).is_some()))?;
    let href = row_link(chosen)?;
    tracing::debug!("Document link from file table: {}", href);
    absolutize(index_url, href)
}

/// The document-column anchor if present, else the first anchor anywhere in the row.
fn row_link<'a>(cells: &[ElementRef<'a>]) -> Option<&'a str> {
    let first_href = |cell: &ElementRef<'a>| {
        cell.select(&ANCHOR_SELECTOR)
            .next()
            .and_then(|a| a.value().attr("href"))
    };

    cells
        .get(FILE_TABLE_DOCUMENT_COL)
        .and_then(first_href)
        .or_else(|| cells.iter().find_map(first_href))
}

fn absolutize(base: &str, href: &str) -> Option<String> {
    match Url::parse(base).and_then(|b| b.join(href)) {
        Ok(url) => Some(url.to_string()),
        Err(e) => {
            tracing::warn!("Could not build absolute URL from base '{}' and '{}': {}", base, href, e);
            None
        }
    }
}
