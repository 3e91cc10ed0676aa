// src/specs/documents.rs
//! Document-link extraction from one company page.
//!
//! Heuristics run independently, in priority order, and their results are
//! concatenated lazily:
//! 1. `direct_pdf_link` – every `<a href>` whose target ends in `.pdf` (any case).
//!    Title is the link's visible text, or the placeholder when empty.
//!    The href is kept verbatim; absolutizing is the caller's concern.
//! 2. `document_section` – every non-anchor element whose class contains "document".
//! 3. `card_section` – every non-anchor element whose class contains "card" or "download".
//!
//! Section matches are reported, not link-extracted: the record carries the
//! element's class as title and the page URL as url.
//!
//! Adding a heuristic means adding a row to [`HEURISTICS`].

use std::sync::LazyLock;

use scraper::{ ElementRef, Html, Selector };
use tracing::info;

use crate::config::consts::{ PDF_EXT, UNTITLED_DOCUMENT };
use crate::core::html::{ self, ANCHORS, CLASSED };
use crate::core::sanitize::normalize_ws;
use crate::data::{ DiscoveredVia, DocumentRecord };

pub struct Heuristic {
    pub via: DiscoveredVia,
    selector: &'static LazyLock<Selector>,
    accept: fn(&ElementRef<'_>) -> bool,
}

pub static HEURISTICS: [Heuristic; 3] = [
    Heuristic { via: DiscoveredVia::DirectPdfLink, selector: &ANCHORS, accept: is_pdf_link },
    Heuristic { via: DiscoveredVia::DocumentSection, selector: &CLASSED, accept: is_document_section },
    Heuristic { via: DiscoveredVia::CardSection, selector: &CLASSED, accept: is_card_section },
];

fn is_pdf_link(el: &ElementRef<'_>) -> bool {
    html::attr(el, "href").is_some_and(|href| html::ends_with_ci(href, PDF_EXT))
}

fn is_document_section(el: &ElementRef<'_>) -> bool {
    !html::is_anchor(el) && html::class_contains_any(el, &["document"])
}

fn is_card_section(el: &ElementRef<'_>) -> bool {
    !html::is_anchor(el) && html::class_contains_any(el, &["card", "download"])
}

impl Heuristic {
    fn record(&self, el: &ElementRef<'_>, page_url: &str) -> DocumentRecord {
        match self.via {
            DiscoveredVia::DirectPdfLink => DocumentRecord::new(
                html::visible_text(el),
                html::attr(el, "href").unwrap_or_default(),
                self.via,
            ),
            DiscoveredVia::DocumentSection | DiscoveredVia::CardSection => DocumentRecord::new(
                normalize_ws(html::attr(el, "class").unwrap_or(UNTITLED_DOCUMENT)),
                page_url,
                self.via,
            ),
        }
    }
}

/// Lazy, finite sequence of records for one parsed page. `page_url` is the
/// final URL the page was served from.
pub fn extract<'a>(doc: &'a Html, page_url: &'a str) -> impl Iterator<Item = DocumentRecord> + 'a {
    HEURISTICS.iter().flat_map(move |h| {
        doc.select(&**h.selector)
            .filter(move |el| (h.accept)(el))
            .map(move |el| h.record(&el, page_url))
    })
}

/// Where a page actually came from, when it was not where we asked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RedirectTrace {
    pub chain: Vec<String>,
    pub resolved: String,
}

/// Records the redirect chain for diagnostics. Extraction itself only ever
/// looks at the final document.
pub fn trace_redirects(final_url: &str, chain: &[String]) -> Option<RedirectTrace> {
    if chain.is_empty() {
        return None;
    }
    info!("Redirected: {} -> {}", chain.join(" -> "), final_url);
    Some(RedirectTrace { chain: chain.to_vec(), resolved: s!(final_url) })
}

/// Per-heuristic hit counts for a batch of records.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Counts {
    pub pdf_links: usize,
    pub document_sections: usize,
    pub card_sections: usize,
}

impl Counts {
    pub fn of(records: &[DocumentRecord]) -> Self {
        let mut c = Counts::default();
        for r in records {
            match r.discovered_via {
                DiscoveredVia::DirectPdfLink => c.pdf_links += 1,
                DiscoveredVia::DocumentSection => c.document_sections += 1,
                DiscoveredVia::CardSection => c.card_sections += 1,
            }
        }
        c
    }
}
