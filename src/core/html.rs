// src/core/html.rs
// Small helpers over `scraper` element references.
// Matching on attribute values is ASCII case-insensitive throughout.

use std::sync::LazyLock;

use scraper::{ ElementRef, Html, Selector };

pub static ANCHORS: LazyLock<Selector> = LazyLock::new(|| sel("a[href]"));
pub static CLASSED: LazyLock<Selector> = LazyLock::new(|| sel("[class]"));
pub static IMAGES: LazyLock<Selector> = LazyLock::new(|| sel("img[alt]"));

fn sel(css: &str) -> Selector {
    Selector::parse(css).expect("static selector")
}

pub fn parse(doc: &str) -> Html {
    Html::parse_document(doc)
}

/// Visible text of an element, trimmed at both ends. Inner whitespace is kept as written.
pub fn visible_text(el: &ElementRef<'_>) -> String {
    el.text().collect::<String>().trim().to_string()
}

pub fn attr<'a>(el: &ElementRef<'a>, name: &str) -> Option<&'a str> {
    el.value().attr(name)
}

pub fn to_lower(s: &str) -> String {
    s.to_ascii_lowercase()
}

/// True when the raw `class` attribute contains any of `needles` (lowercase) as a substring.
/// Substring, not token, match: `loan-originator-info__documents` counts as "document".
pub fn class_contains_any(el: &ElementRef<'_>, needles: &[&str]) -> bool {
    match attr(el, "class") {
        Some(class) => {
            let lc = to_lower(class);
            needles.iter().any(|n| lc.contains(n))
        }
        None => false,
    }
}

pub fn ends_with_ci(s: &str, suffix: &str) -> bool {
    s.len() >= suffix.len()
        && s.is_char_boundary(s.len() - suffix.len())
        && s[s.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

pub fn is_anchor(el: &ElementRef<'_>) -> bool {
    el.value().name().eq_ignore_ascii_case("a")
}
