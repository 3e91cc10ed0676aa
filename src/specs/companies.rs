// src/specs/companies.rs
//! Company listing page → URL-cache records.
//!
//! Prefers real anchors (`a[href]` pointing at a profile page); falls back to a raw
//! `href="…"` scan only when the parsed document yields nothing, which happens with
//! pages saved mid-render where the listing lives in inline script.

use std::sync::LazyLock;

use regex::Regex;
use scraper::ElementRef;
use tracing::{ debug, info };
use url::Url;

use crate::config::consts::{ LEGACY_PROFILE_SEGMENT, PROFILE_SEGMENT };
use crate::core::html::{ self, ANCHORS, IMAGES };
use crate::core::sanitize::title_from_slug;
use crate::data::{ CompanyRecord, UrlCache };

static RAW_HREF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r##"href="([^"]*/(?:lending-companies|loan-originators)/[^"#]*)""##).expect("static regex")
});

pub fn extract(doc: &str, base_url: &str) -> UrlCache {
    // Trailing slash so relative hrefs resolve under the base path, not beside it.
    let base = Url::parse(&join!(base_url.trim_end_matches('/'), "/")).ok();

    // 1) Anchors in the parsed document.
    let mut out = from_anchors(doc, base.as_ref());

    // 2) Fallback: raw href scan.
    if out.is_empty() {
        info!("No company anchors found, scanning raw hrefs");
        out = from_raw_hrefs(doc, base.as_ref());
    }

    info!("Extracted {} companies from listing", out.len());
    out
}

fn from_anchors(doc: &str, base: Option<&Url>) -> UrlCache {
    let parsed = html::parse(doc);
    let mut out = UrlCache::new();

    for a in parsed.select(&ANCHORS) {
        let Some(href) = html::attr(&a, "href") else { continue };
        if href.contains("#details") {
            continue;
        }
        let Some(id) = company_id(href) else { continue };
        if out.contains_key(&id) {
            continue;
        }
        let name = anchor_name(&a).unwrap_or_else(|| title_from_slug(&id));
        debug!("Found company: {name} ({id})");
        out.insert(id, CompanyRecord::new(name, absolute(href, base)));
    }
    out
}

fn from_raw_hrefs(doc: &str, base: Option<&Url>) -> UrlCache {
    let mut out = UrlCache::new();
    for cap in RAW_HREF.captures_iter(doc) {
        let href = &cap[1];
        let Some(id) = company_id(href) else { continue };
        out.entry(id.clone())
            .or_insert_with(|| CompanyRecord::new(title_from_slug(&id), absolute(href, base)));
    }
    out
}

/// Last non-empty path segment after a profile segment; `None` for the category
/// pages themselves and for non-profile links.
fn company_id(href: &str) -> Option<String> {
    let path = href.split(['?', '#']).next().unwrap_or_default();
    let mut segments = path.split('/').filter(|s| !s.is_empty());
    segments.position(|s| s == PROFILE_SEGMENT || s == LEGACY_PROFILE_SEGMENT)?;
    let id = segments.last()?;
    match id {
        "details" => None,
        id => Some(id.to_string()),
    }
}

/// Link text if it is at least two chars, else the first `img[alt]` inside it.
fn anchor_name(a: &ElementRef<'_>) -> Option<String> {
    let text = html::visible_text(a);
    if text.chars().count() >= 2 {
        return Some(text);
    }
    a.select(&IMAGES)
        .filter_map(|img| html::attr(&img, "alt"))
        .map(str::trim)
        .find(|alt| !alt.is_empty())
        .map(String::from)
}

fn absolute(href: &str, base: Option<&Url>) -> String {
    match base.and_then(|b| b.join(href).ok()) {
        Some(u) => u.into(),
        None => s!(href),
    }
}
